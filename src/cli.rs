//! Interactive menu loop.
//!
//! Everything here is generic over [`BufRead`] / [`Write`], so a whole session can be scripted
//! from a byte slice in tests. End of input at any prompt ends the session cleanly.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

use crate::browse::{parse_sort, SortSpec};
use crate::config::Vocabulary;
use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::FilterSpec;
use crate::render;
use crate::session::{Explorer, ReportKind, Session};
use crate::types::{parse_cities, weekday_name, CityId, TripTable};

/// How reports and pages are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Report(ReportKind),
    BrowseRaw,
    Restart,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rd" => Ok(MenuChoice::BrowseRaw),
            "r" => Ok(MenuChoice::Restart),
            "q" => Ok(MenuChoice::Quit),
            other => other
                .parse::<ReportKind>()
                .map(MenuChoice::Report)
                .map_err(|_| ExplorerError::invalid("option", s.trim())),
        }
    }
}

/// Which filters the user wants to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Month,
    Day,
    Both,
    None,
}

impl FromStr for FilterKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(FilterKind::Month),
            "day" => Ok(FilterKind::Day),
            "both" => Ok(FilterKind::Both),
            "none" | "" => Ok(FilterKind::None),
            _ => Err(ExplorerError::invalid("filter type", s.trim())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::Month => "month",
            FilterKind::Day => "day",
            FilterKind::Both => "both",
            FilterKind::None => "none",
        })
    }
}

/// Line-oriented question/answer channel.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Write `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> ExplorerResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Print `question` and read one trimmed line. `None` at end of input.
    pub fn ask(&mut self, question: &str) -> ExplorerResult<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer. Recoverable errors re-prompt; others propagate.
    pub fn ask_until<T>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> ExplorerResult<T>,
    ) -> ExplorerResult<Option<T>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) if e.is_recoverable() => self.say(&format!("Invalid input ({e}). Please try again."))?,
                Err(e) => return Err(e),
            }
        }
    }

    /// `true` only for an explicit yes.
    fn confirm(&mut self, question: &str, yes: &str) -> ExplorerResult<bool> {
        Ok(self
            .ask(question)?
            .is_some_and(|a| a.eq_ignore_ascii_case(yes)))
    }
}

fn city_question() -> String {
    let names: Vec<_> = CityId::ALL.iter().map(|c| render::title_case(c.name())).collect();
    format!(
        "Which city would you like to explore data for: {}? Type 'all' or a comma-separated list.\n> ",
        names.join(", ")
    )
}

fn month_question(vocab: &Vocabulary) -> String {
    let names: Vec<_> = vocab.months().iter().map(|m| render::title_case(m)).collect();
    format!("Which month - {}? Comma-separate several.\n> ", names.join(", "))
}

fn day_question() -> String {
    let names: Vec<_> = Vocabulary::WEEKDAYS
        .iter()
        .map(|d| render::title_case(weekday_name(*d)))
        .collect();
    format!("Which day - {}? Comma-separate several.\n> ", names.join(", "))
}

const FILTER_QUESTION: &str =
    "Would you like to filter the data by month, day, both, or not at all? Type 'none' for no filter.\n> ";

const MENU: &str = "\nPlease select the information you would like to obtain:\n\n\
[ts] Time Stats\n\
[ss] Station Stats\n\
[tds] Trip Duration Stats\n\
[us] User Stats\n\
[pr] Popular Routes by User Type\n\
[rd] Display Raw Data\n\
[r] Restart\n\
[q] Quit\n";

const SORT_QUESTION: &str = "\nHow would you like to sort the rows? Hit Enter to view unsorted.\n \
[st] Start Time\n [et] End Time\n [td] Trip Duration\n [ss] Start Station\n [es] End Station\n\n> ";

const DIRECTION_QUESTION: &str = "\nAscending or descending? [a] Ascending\n [d] Descending\n\n> ";

/// Ask for cities and filters. `None` at end of input.
pub fn ask_selection<R: BufRead, W: Write>(
    vocab: &Vocabulary,
    prompter: &mut Prompter<R, W>,
) -> ExplorerResult<Option<(Vec<CityId>, FilterSpec)>> {
    let Some(cities) = prompter.ask_until(&city_question(), parse_cities)? else {
        return Ok(None);
    };
    let Some(kind) = prompter.ask_until(FILTER_QUESTION, FilterKind::from_str)? else {
        return Ok(None);
    };

    let mut month = "all".to_string();
    let mut day = "all".to_string();
    if matches!(kind, FilterKind::Month | FilterKind::Both) {
        let Some(answer) = prompter.ask_until(&month_question(vocab), |a| {
            FilterSpec::parse(a, "all", vocab).map(|_| a.to_string())
        })?
        else {
            return Ok(None);
        };
        month = answer;
    }
    if matches!(kind, FilterKind::Day | FilterKind::Both) {
        let Some(answer) = prompter.ask_until(&day_question(), |a| {
            FilterSpec::parse("all", a, vocab).map(|_| a.to_string())
        })?
        else {
            return Ok(None);
        };
        day = answer;
    }

    let filter = FilterSpec::parse(&month, &day, vocab)?;
    prompter.say(render::RULE)?;
    Ok(Some((cities, filter)))
}

/// Run the interactive loop until the user quits, declines to restart or input ends.
pub fn run<R: BufRead, W: Write>(
    explorer: &Explorer,
    prompter: &mut Prompter<R, W>,
    format: OutputFormat,
) -> ExplorerResult<()> {
    prompter.say("Hello! Let's explore some US bikeshare data!")?;
    loop {
        let Some((cities, filter)) = ask_selection(explorer.vocabulary(), prompter)? else {
            return Ok(());
        };

        match explorer.open(&cities, filter) {
            Ok(mut session) => {
                prompter.say(&format!(
                    "Loaded {} trips ({}).",
                    session.table().row_count(),
                    session.filter()
                ))?;
                match menu_loop(&mut session, prompter, format)? {
                    MenuExit::Restart => {}
                    MenuExit::Quit => return Ok(()),
                }
            }
            Err(e) => prompter.say(&format!("Could not load data: {e}"))?,
        }

        if !prompter.confirm("\nWould you like to restart? Enter yes or no: ", "yes")? {
            return Ok(());
        }
    }
}

enum MenuExit {
    Restart,
    Quit,
}

fn menu_loop<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    format: OutputFormat,
) -> ExplorerResult<MenuExit> {
    loop {
        prompter.say(MENU)?;
        let Some(choice) = prompter.ask_until("Enter your choice: ", MenuChoice::from_str)? else {
            return Ok(MenuExit::Quit);
        };
        match choice {
            MenuChoice::Report(kind) => show_report(session, kind, prompter, format)?,
            MenuChoice::BrowseRaw => {
                if !browse(session, prompter, format)? {
                    return Ok(MenuExit::Quit);
                }
            }
            MenuChoice::Restart => return Ok(MenuExit::Restart),
            MenuChoice::Quit => return Ok(MenuExit::Quit),
        }
    }
}

fn show_report<R: BufRead, W: Write>(
    session: &Session,
    kind: ReportKind,
    prompter: &mut Prompter<R, W>,
    format: OutputFormat,
) -> ExplorerResult<()> {
    prompter.say(&format!("\nCalculating {}...\n", kind.title()))?;
    let start = Instant::now();
    match session.report(kind) {
        Ok(report) => match format {
            OutputFormat::Text => {
                prompter.say(render::render_report(&report).trim_end())?;
                prompter.say(&format!("\n{}", render::format_elapsed(start.elapsed())))?;
            }
            OutputFormat::Json => prompter.say(&render::to_json(&report)?)?,
        },
        Err(e) if e.is_recoverable() => prompter.say(&format!("Nothing to report: {e}."))?,
        Err(e) => return Err(e),
    }
    prompter.say(render::RULE)
}

/// Browse flow. Returns `false` when input ended.
fn browse<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    format: OutputFormat,
) -> ExplorerResult<bool> {
    prompter.say("\nYou opted to view raw data.")?;

    if !session.needs_sort_selection() {
        let Some(answer) =
            prompter.ask("\nWould you like to continue from where you stopped last time? [y/n]: ")?
        else {
            return Ok(false);
        };
        if answer.eq_ignore_ascii_case("n") {
            session.reset_browse();
        }
    }

    if session.needs_sort_selection() {
        let Some(sort) = ask_sort(session.table(), prompter)? else {
            return Ok(false);
        };
        session.select_sort(sort)?;
    }

    loop {
        let page = session.next_page();
        if page.is_empty() {
            prompter.say("No more raw data to display.")?;
            return Ok(true);
        }
        let end_of_table = page.end_of_table;
        match format {
            OutputFormat::Text => prompter.say(&format!("\n{}", render::render_page(&page)))?,
            OutputFormat::Json => prompter.say(&render::to_json(&page)?)?,
        }
        if end_of_table {
            prompter.say("You reached the end of the data.")?;
            return Ok(true);
        }
        match prompter.ask("Do you want to keep printing raw data? [y/n]: ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {}
            Some(_) => return Ok(true),
            None => return Ok(false),
        }
    }
}

/// Sort keys over a column the loaded files lack are re-asked.
fn ask_sort<R: BufRead, W: Write>(
    table: &TripTable,
    prompter: &mut Prompter<R, W>,
) -> ExplorerResult<Option<Option<SortSpec>>> {
    let Some(key) = prompter.ask_until(SORT_QUESTION, |a| match parse_sort(a, "")? {
        Some(spec) => table.require_column(spec.key.column()).map(|_| a.to_string()),
        None => Ok(String::new()),
    })?
    else {
        return Ok(None);
    };
    if key.is_empty() {
        return Ok(Some(None));
    }
    let Some(direction) = prompter.ask(DIRECTION_QUESTION)? else {
        return Ok(None);
    };
    parse_sort(&key, &direction).map(Some)
}
