use log::{debug, info, warn};

use election_setup::timezone::{self, IanaCalendar};
use election_setup::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::authority::config_reader::*;

pub mod config_reader;

#[derive(Debug, Snafu)]
pub enum AuthorityError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing JSON"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No setup file given (use --config)"))]
    MissingConfig {},
    #[snafu(display("Unknown tab {key:?}"))]
    UnknownTab { key: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AuthorityResult<T> = Result<T, AuthorityError>;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StageStatus {
    pub stage: String,
    pub label: String,
    pub done: bool,
}

/// A phase of the election, resolved to UTC.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPhase {
    pub phase: String,
    pub opens: Option<String>,
    pub closes: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub election: String,
    #[serde(rename = "activeStage")]
    pub active_stage: String,
    #[serde(rename = "selectedTab")]
    pub selected_tab: String,
    pub ready: bool,
    pub completed: Vec<String>,
    pub stages: Vec<StageStatus>,
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduledPhase>>,
}

/// Resolves all the windows in the zone of the election.
///
/// Only meaningful once the timing stage is complete.
fn build_schedule(t: &Timing) -> Vec<ScheduledPhase> {
    let resolve = |phase: Phase, value: &Option<String>| -> Option<String> {
        let civil = value.as_deref().and_then(timezone::parse_civil)?;
        let res = timezone::resolve_local(&t.time_zone, &civil);
        if res.is_none() {
            warn!(
                "The {} time {} does not exist in {}",
                phase, civil, t.time_zone
            );
        }
        res.map(|dt| dt.with_timezone(&Utc).to_rfc3339())
    };
    Phase::ALL
        .iter()
        .map(|phase| {
            let w = t.window(*phase).cloned().unwrap_or_default();
            ScheduledPhase {
                phase: phase.key().to_string(),
                opens: resolve(*phase, &w.opens),
                closes: resolve(*phase, &w.closes),
            }
        })
        .collect()
}

pub fn build_report(
    document: &SetupDocument,
    rules: &SetupRules,
    tab: TabSelection,
) -> ProgressReport {
    let (progress, reason) = introspect(document, rules, &IanaCalendar);
    info!(
        "Setup of {:?}: active stage {}, {} stage(s) complete",
        document.name,
        progress.active.key(),
        progress.completed.len()
    );
    if let Some(r) = &reason {
        info!("Stage {} is incomplete: {}", progress.active.key(), r);
    }

    let schedule = match &document.timing {
        Some(t) if progress.is_complete(Stage::Timing) => Some(build_schedule(t)),
        _ => None,
    };

    ProgressReport {
        election: document.name.clone(),
        active_stage: progress.active.key().to_string(),
        selected_tab: tab.resolve(&progress).key().to_string(),
        ready: progress.is_ready(),
        completed: progress
            .completed
            .iter()
            .map(|s| s.key().to_string())
            .collect(),
        stages: Stage::ALL
            .iter()
            .map(|s| StageStatus {
                stage: s.key().to_string(),
                label: s.label().to_string(),
                done: progress.is_complete(*s),
            })
            .collect(),
        reason: reason.map(|r| r.to_string()),
        schedule,
    }
}

fn read_reference(path: &str) -> AuthorityResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

fn check_reference(reference_path: &str, pretty_report: &str) -> AuthorityResult<()> {
    let reference = read_reference(reference_path)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(WritingJsonSnafu {})?;
    if pretty_reference != pretty_report {
        warn!("Found differences with the reference report");
        print_diff(pretty_reference.as_str(), pretty_report, "\n");
        whatever!("Difference detected between the progress report and the reference report")
    }
    info!("Progress report matches the reference {}", reference_path);
    Ok(())
}

fn write_output(out: Option<&str>, pretty_report: &str) -> AuthorityResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty_report);
        }
        Some(path) => {
            fs::write(path, pretty_report).context(WritingFileSnafu { path })?;
            info!("Progress report written to {}", path);
        }
    }
    Ok(())
}

fn tab_selection(tab: &Option<String>) -> AuthorityResult<TabSelection> {
    match tab.as_deref() {
        None | Some("") => Ok(TabSelection::Auto),
        Some(key) => Stage::from_key(key)
            .map(TabSelection::Explicit)
            .context(UnknownTabSnafu { key }),
    }
}

pub fn run(args: &Args) -> AuthorityResult<()> {
    if let Some(prefix) = &args.zones {
        for zone in timezone::prefix_search(prefix) {
            println!("{}", zone);
        }
        return Ok(());
    }

    let config_path = args.config.as_deref().context(MissingConfigSnafu {})?;
    let tab = tab_selection(&args.tab)?;
    let rules = SetupRules {
        candidate_names: if args.lenient_candidate_names {
            NameCheck::Lenient
        } else {
            NameCheck::Strict
        },
        ..SetupRules::DEFAULT_RULES
    };

    let data = read_document(config_path)?.unwrap_or_default();
    debug!("run: setup data: {:?}", data);
    if args.save {
        save_document(config_path, &data)?;
        info!("Saved setup data to {}", config_path);
    }

    let report = build_report(&data.to_document(), &rules, tab);
    // Through a JSValue so that the keys are ordered like in the reference.
    let report_js = serde_json::to_value(&report).context(WritingJsonSnafu {})?;
    let pretty_report = serde_json::to_string_pretty(&report_js).context(WritingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_report)?;

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_report)?;
    }
    Ok(())
}
