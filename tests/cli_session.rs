use std::path::PathBuf;

use bikeshare_explorer::cli::{run, OutputFormat, Prompter};
use bikeshare_explorer::config::ExplorerConfig;
use bikeshare_explorer::ingestion::LoadOptions;
use bikeshare_explorer::session::Explorer;

fn explorer_at(dir: PathBuf) -> Explorer {
    let config = ExplorerConfig {
        data_dir: dir,
        ..ExplorerConfig::default()
    };
    Explorer::new(config, LoadOptions::default())
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn script(explorer: &Explorer, input: &str, format: OutputFormat) -> String {
    let mut prompter = Prompter::new(input.as_bytes(), Vec::new());
    run(explorer, &mut prompter, format).unwrap();
    let (_, out) = prompter.into_inner();
    String::from_utf8(out).unwrap()
}

#[test]
fn report_then_sorted_browse_then_rewind() {
    let input = "chicago\nnone\nts\nrd\ntd\nd\ny\nrd\nn\n\nn\nq\n";
    let out = script(&explorer_at(fixtures()), input, OutputFormat::Text);

    assert!(out.contains("Loaded 6 trips (month=all day=all)."));
    assert!(out.contains("The month with the most travels is: January (3 trips)."));
    assert!(out.contains("This took"));

    // Descending by duration: the 1800s trip comes before the 1200s trip.
    let longest = out.find("2017-03-06 12:00:00").unwrap();
    let second = out.find("2017-01-03 17:00:00").unwrap();
    assert!(longest < second);

    assert_eq!(out.matches("You reached the end of the data.").count(), 1);
    assert_eq!(out.matches("continue from where you stopped").count(), 1);
    // Sort prompt shown for the first browse and again after declining to resume.
    assert_eq!(out.matches("How would you like to sort the rows?").count(), 2);
}

#[test]
fn invalid_answers_reprompt_and_restart_starts_over() {
    let input = "boston\nwashington\nmonth\njuly\napril\nus\nr\nyes\nnew york city\nday\nsunday\ntds\nq\n";
    let out = script(&explorer_at(fixtures()), input, OutputFormat::Text);

    assert!(out.contains("Invalid input (invalid city: 'boston')"));
    assert!(out.contains("Invalid input (invalid month: 'july')"));
    assert!(out.contains("Loaded 2 trips (month=april day=all)."));
    assert!(out.contains("Gender data not available."));
    assert!(out.contains("Birth year data not available."));

    assert!(out.contains("Loaded 1 trips (month=all day=sunday)."));
    assert!(out.contains("The total travel time is: 0:12:56"));
    assert!(out.contains("Details: 0d 0h 12m 56s"));
}

#[test]
fn unknown_menu_choice_reprompts() {
    let out = script(&explorer_at(fixtures()), "chicago\nnone\nxyz\nq\n", OutputFormat::Text);
    assert!(out.contains("Invalid input (invalid option: 'xyz')"));
    assert_eq!(out.matches("Enter your choice: ").count(), 2);
}

#[test]
fn empty_filter_result_is_reported() {
    let out = script(&explorer_at(fixtures()), "washington\nmonth\nfebruary\nss\nq\n", OutputFormat::Text);
    assert!(out.contains("Loaded 0 trips"));
    assert!(out.contains("Nothing to report: no trips match the current filters."));
}

#[test]
fn load_failure_offers_restart() {
    let out = script(
        &explorer_at(fixtures().join("missing")),
        "chicago\nnone\nno\n",
        OutputFormat::Text,
    );
    assert!(out.contains("Could not load data:"));
    assert!(out.contains("Would you like to restart?"));
}

#[test]
fn json_output() {
    let out = script(&explorer_at(fixtures()), "washington\nnone\nss\nq\n", OutputFormat::Json);
    assert!(out.contains("\"report\": \"station\""));
    assert!(out.contains("\"W1 to W2\"") || out.contains("\"start_station\": \"W1\""));
}

#[test]
fn end_of_input_ends_the_session() {
    let out = script(&explorer_at(fixtures()), "chicago\n", OutputFormat::Text);
    assert!(out.starts_with("Hello! Let's explore some US bikeshare data!"));
}
