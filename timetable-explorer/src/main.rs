use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timetable_explorer::filter::{CombineOperation, FilterState, MatchingMode};
use timetable_explorer::report::FilterReport;
use timetable_explorer::store::TimetableStore;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "timetable_explorer=info";

/// Filter the trains of a normalized RailML timetable.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Normalized timetable document (JSON)
    document: PathBuf,

    /// Filter state file (JSON); flags below override it
    #[arg(long)]
    filter: Option<PathBuf>,

    /// Train-number prefix; prefix with '!' to invert
    #[arg(long)]
    train_number: Option<String>,

    /// Do not expand matches to related trains
    #[arg(long)]
    no_related: bool,

    /// Select a calendar by id (repeatable)
    #[arg(long = "calendar", value_name = "ID")]
    calendars: Vec<String>,

    /// Restrict to one date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// How selected calendars are combined: union or intersect
    #[arg(long)]
    combine: Option<CombineOperation>,

    /// Calendar test for train parts: any or all
    #[arg(long = "match")]
    matching_mode: Option<MatchingMode>,

    /// Hide failing trains and parts instead of greying them out
    #[arg(long)]
    hide: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Apply command-line overrides on top of `base`.
    fn filter_state(&self, base: FilterState) -> FilterState {
        let mut state = base;
        if let Some(text) = &self.train_number {
            state.train_number = text.clone();
        }
        if self.no_related {
            state.show_related = false;
        }
        if !self.calendars.is_empty() {
            state = state.with_calendars(self.calendars.iter().cloned());
        }
        if self.date.is_some() {
            state.single_date = self.date;
        }
        if self.combine.is_some() {
            state.combine = self.combine;
        }
        if let Some(mode) = self.matching_mode {
            state.matching_mode = mode;
        }
        if self.hide {
            state.grey_out = false;
        }
        state
    }
}

fn read_filter_file(path: &Path) -> Result<FilterState, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let base = match &args.filter {
        Some(path) => read_filter_file(path)?,
        None => FilterState::default(),
    };
    let state = args.filter_state(base);

    let store = TimetableStore::new();
    store.load_path(&args.document)?;

    let evaluation = store
        .evaluate(&state)
        .ok_or("no timetable loaded")?;
    info!(
        listed = evaluation.result.len(),
        matched = evaluation.result.direct_matches.len(),
        "filter applied"
    );

    let report = FilterReport::new(&evaluation.model, &evaluation.result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
