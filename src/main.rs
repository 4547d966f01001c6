//! Interactive bikeshare explorer.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use bikeshare_explorer::cli::{self, OutputFormat, Prompter};
use bikeshare_explorer::config::ExplorerConfig;
use bikeshare_explorer::ingestion::{
    CompositeObserver, FileObserver, LoadObserver, LoadOptions, ParsePolicy, StdErrObserver,
};
use bikeshare_explorer::session::{Explorer, StdErrSessionObserver};
use bikeshare_explorer::ExplorerResult;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bikeshare-explorer")]
#[command(about = "Explore US bikeshare trip data from the terminal", long_about = None)]
struct Cli {
    /// Directory containing the city CSV files
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip rows with unparseable cells instead of aborting the load
    #[arg(long)]
    skip_bad_rows: bool,

    /// Also append load events to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// No load or session logging on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Print reports and pages as JSON
    #[arg(long)]
    json: bool,
}

fn build_explorer(args: &Cli) -> ExplorerResult<Explorer> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::from_json_path(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }

    let mut observers: Vec<Arc<dyn LoadObserver>> = Vec::new();
    if !args.quiet {
        observers.push(Arc::new(StdErrObserver));
    }
    if let Some(path) = &args.log_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    let composite = CompositeObserver::new(observers);

    let load_options = LoadOptions {
        on_parse_error: if args.skip_bad_rows {
            ParsePolicy::SkipRow
        } else {
            ParsePolicy::Abort
        },
        observer: (!composite.is_empty()).then(|| Arc::new(composite) as Arc<dyn LoadObserver>),
        ..LoadOptions::default()
    };

    let explorer = Explorer::new(config, load_options);
    Ok(if args.quiet {
        explorer
    } else {
        explorer.with_observer(Arc::new(StdErrSessionObserver))
    })
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let result = build_explorer(&args).and_then(|explorer| {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
        cli::run(&explorer, &mut prompter, format)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
