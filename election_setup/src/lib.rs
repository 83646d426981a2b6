mod config;
use log::debug;
use url::Url;

pub mod builder;
pub mod manual;
pub mod timezone;

pub use crate::config::*;
use crate::timezone::{Calendar, IanaCalendar};

// The stages with a check of their own, in the order they are checked.
const CHECKED_STAGES: [Stage; 5] = [
    Stage::BasicInfo,
    Stage::Timing,
    Stage::Candidates,
    Stage::Trustees,
    Stage::Registrar,
];

/// Evaluates how far the setup of an election has progressed.
///
/// The stages are checked in order and the evaluation stops at the first
/// stage that is not complete. That stage becomes the active one.
///
/// This never fails: an incomplete document is the normal state of a setup
/// being edited.
pub fn evaluate(document: &SetupDocument) -> Progress {
    evaluate_with(document, &SetupRules::DEFAULT_RULES, &IanaCalendar)
}

/// Same as [evaluate], with explicit rules and calendar.
pub fn evaluate_with<C: Calendar>(
    document: &SetupDocument,
    rules: &SetupRules,
    calendar: &C,
) -> Progress {
    introspect(document, rules, calendar).0
}

/// Evaluates the progress and also returns why the active stage is not
/// complete. The reason is `None` when the setup is ready for the genesis.
pub fn introspect<C: Calendar>(
    document: &SetupDocument,
    rules: &SetupRules,
    calendar: &C,
) -> (Progress, Option<SetupIncomplete>) {
    let mut progress = Progress {
        active: Stage::BasicInfo,
        completed: Vec::new(),
    };
    for stage in CHECKED_STAGES {
        progress.active = stage;
        if let Err(reason) = check_stage(stage, document, rules, calendar) {
            debug!("introspect: stage {:?} incomplete: {}", stage, reason);
            return (progress, Some(reason));
        }
        debug!("introspect: stage {:?} complete", stage);
        progress.completed.push(stage);
    }
    progress.active = Stage::Genesis;
    (progress, None)
}

fn check_stage<C: Calendar>(
    stage: Stage,
    document: &SetupDocument,
    rules: &SetupRules,
    calendar: &C,
) -> Result<(), SetupIncomplete> {
    match stage {
        Stage::BasicInfo => check_basic_info(document),
        Stage::Timing => check_timing(document, calendar),
        Stage::Candidates => check_candidates(document, rules),
        Stage::Trustees => check_trustees(document, rules),
        Stage::Registrar => check_registrar(document),
        // Reached once everything else passed.
        Stage::Genesis => Ok(()),
    }
}

fn check_basic_info(document: &SetupDocument) -> Result<(), SetupIncomplete> {
    if document.encryption_parameters.is_none() {
        return Err(SetupIncomplete::MissingEncryptionParameters);
    }
    if document.name.is_empty() {
        return Err(SetupIncomplete::MissingName);
    }
    Ok(())
}

fn check_timing<C: Calendar>(
    document: &SetupDocument,
    calendar: &C,
) -> Result<(), SetupIncomplete> {
    let timing = document
        .timing
        .as_ref()
        .ok_or(SetupIncomplete::MissingTiming)?;
    if !calendar.is_valid_time_zone(&timing.time_zone) {
        return Err(SetupIncomplete::UnknownTimeZone(timing.time_zone.clone()));
    }

    // Each phase must not open before the previous one closed.
    let mut floor: Option<C::Instant> = None;
    for phase in Phase::ALL {
        let closes = check_window(phase, timing.window(phase), floor.as_ref(), calendar)?;
        floor = Some(closes);
    }
    Ok(())
}

/// Checks a single window against the closing time of the previous phase.
/// Returns the closing time of this window.
fn check_window<C: Calendar>(
    phase: Phase,
    window: Option<&TimeWindow>,
    floor: Option<&C::Instant>,
    calendar: &C,
) -> Result<C::Instant, SetupIncomplete> {
    let (opens, closes) = match window {
        Some(TimeWindow {
            opens: Some(o),
            closes: Some(c),
        }) if !o.is_empty() && !c.is_empty() => (o, c),
        _ => return Err(SetupIncomplete::MissingWindow(phase)),
    };

    let opens_t = parse_time(phase, opens, calendar)?;
    if let Some(prev_closes) = floor {
        if opens_t < *prev_closes {
            return Err(SetupIncomplete::OpensBeforePreviousCloses(phase));
        }
    }
    let closes_t = parse_time(phase, closes, calendar)?;
    if closes_t < opens_t {
        return Err(SetupIncomplete::ClosesBeforeOpens(phase));
    }
    Ok(closes_t)
}

fn parse_time<C: Calendar>(
    phase: Phase,
    value: &str,
    calendar: &C,
) -> Result<C::Instant, SetupIncomplete> {
    calendar
        .parse_timestamp(value)
        .ok_or_else(|| SetupIncomplete::MalformedTimestamp {
            phase,
            value: value.to_string(),
        })
}

fn check_candidates(document: &SetupDocument, rules: &SetupRules) -> Result<(), SetupIncomplete> {
    let candidates = document
        .candidates
        .as_deref()
        .ok_or(SetupIncomplete::MissingCandidates)?;
    if candidates.len() < rules.min_candidates {
        return Err(SetupIncomplete::TooFewCandidates {
            found: candidates.len(),
            required: rules.min_candidates,
        });
    }
    if rules.candidate_names == NameCheck::Strict {
        if let Some(index) = candidates.iter().position(|c| c.name.trim().is_empty()) {
            return Err(SetupIncomplete::BlankCandidateName { index });
        }
    }
    Ok(())
}

fn check_trustees(document: &SetupDocument, rules: &SetupRules) -> Result<(), SetupIncomplete> {
    let trustees = document
        .trustees
        .as_deref()
        .ok_or(SetupIncomplete::MissingTrustees)?;
    if trustees.len() < rules.min_trustees {
        return Err(SetupIncomplete::TooFewTrustees {
            found: trustees.len(),
            required: rules.min_trustees,
        });
    }
    // The keys and signatures of the trustees are verified remotely, so
    // only the names are checked here.
    if let Some(index) = trustees.iter().position(|t| t.name.trim().is_empty()) {
        return Err(SetupIncomplete::BlankTrusteeName { index });
    }
    Ok(())
}

fn check_registrar(document: &SetupDocument) -> Result<(), SetupIncomplete> {
    let registrar = document
        .registrar
        .as_ref()
        .ok_or(SetupIncomplete::MissingRegistrar)?;
    if registrar.name.trim().is_empty() {
        return Err(SetupIncomplete::BlankRegistrarName);
    }
    let raw = registrar.registration_url.as_deref().unwrap_or("");
    let parsed = Url::parse(raw)
        .map_err(|_| SetupIncomplete::InvalidRegistrationUrl(raw.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SetupIncomplete::UnsupportedUrlScheme(scheme.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::builder::SetupBuilder;
    use super::*;

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn with_basic_info() -> SetupBuilder {
        SetupBuilder::new("Town Vote").encryption_parameters("Ag", "Aw", "AQ")
    }

    fn with_timing() -> SetupBuilder {
        with_basic_info()
            .time_zone("Europe/London")
            .window(
                Phase::ParameterConfirmation,
                "2025-01-01T00:00:00",
                "2025-01-05T00:00:00",
            )
            .window(
                Phase::VoterRegistration,
                "2025-01-05T00:00:00",
                "2025-02-01T00:00:00",
            )
            .window(
                Phase::VoteCasting,
                "2025-02-02T08:00:00",
                "2025-02-02T20:00:00",
            )
            .window(
                Phase::TallyDecryption,
                "2025-02-02T20:00:00",
                "2025-02-09T20:00:00",
            )
    }

    fn complete() -> SetupBuilder {
        with_timing()
            .candidates(&names(&["Anna", "Bob"]))
            .trustees(&names(&["Tara", "Tom", "Tess"]))
            .registrar("Town Hall", "https://x.com/register")
    }

    fn reason(document: &SetupDocument) -> Option<SetupIncomplete> {
        introspect(document, &SetupRules::DEFAULT_RULES, &IanaCalendar).1
    }

    #[test]
    fn empty_document() {
        let progress = evaluate(&SetupDocument::default());
        assert_eq!(progress.active, Stage::BasicInfo);
        assert!(progress.completed.is_empty());
    }

    #[test]
    fn basic_info_needs_parameters_and_name() {
        let no_params = SetupBuilder::new("Town Vote").build();
        assert_eq!(evaluate(&no_params).active, Stage::BasicInfo);
        assert_eq!(
            reason(&no_params),
            Some(SetupIncomplete::MissingEncryptionParameters)
        );

        let no_name = with_basic_info().name("").build();
        assert_eq!(evaluate(&no_name).active, Stage::BasicInfo);
        assert_eq!(reason(&no_name), Some(SetupIncomplete::MissingName));
    }

    #[test]
    fn missing_timing_stops_after_basic_info() {
        let progress = evaluate(&with_basic_info().build());
        assert_eq!(progress.completed, vec![Stage::BasicInfo]);
        assert_eq!(progress.active, Stage::Timing);
    }

    #[test]
    fn unknown_time_zone() {
        let doc = with_timing().time_zone("Mars/Olympus").build();
        assert_eq!(evaluate(&doc).active, Stage::Timing);
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::UnknownTimeZone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn registration_opens_before_confirmation_closes() {
        let doc = with_timing()
            .window(
                Phase::VoterRegistration,
                "2025-01-04T00:00:00",
                "2025-02-01T00:00:00",
            )
            .build();
        let progress = evaluate(&doc);
        assert_eq!(progress.completed, vec![Stage::BasicInfo]);
        assert_eq!(progress.active, Stage::Timing);
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::OpensBeforePreviousCloses(
                Phase::VoterRegistration
            ))
        );
    }

    #[test]
    fn first_window_closing_before_opening() {
        let doc = with_timing()
            .window(
                Phase::ParameterConfirmation,
                "2025-01-05T00:00:00",
                "2025-01-01T00:00:00",
            )
            .build();
        assert_eq!(evaluate(&doc).active, Stage::Timing);
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::ClosesBeforeOpens(Phase::ParameterConfirmation))
        );
    }

    #[test]
    fn empty_window_is_missing() {
        let doc = with_timing()
            .window(Phase::VoteCasting, "", "2025-02-02T20:00:00")
            .build();
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::MissingWindow(Phase::VoteCasting))
        );

        let mut doc = with_timing().build();
        if let Some(t) = doc.timing.as_mut() {
            t.tally_decryption = None;
        }
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::MissingWindow(Phase::TallyDecryption))
        );
    }

    #[test]
    fn malformed_time() {
        let doc = with_timing()
            .window(Phase::VoteCasting, "2025-02-02T08:00:00", "soon")
            .build();
        assert_eq!(
            reason(&doc),
            Some(SetupIncomplete::MalformedTimestamp {
                phase: Phase::VoteCasting,
                value: "soon".to_string()
            })
        );
    }

    #[test]
    fn windows_may_touch() {
        // Closing and opening at the same instant is allowed, as is an empty window.
        let doc = with_timing()
            .window(
                Phase::VoteCasting,
                "2025-02-01T00:00:00",
                "2025-02-01T00:00:00",
            )
            .window(
                Phase::TallyDecryption,
                "2025-02-01T00:00:00",
                "2025-02-03T00:00:00",
            )
            .build();
        assert!(evaluate(&doc).is_complete(Stage::Timing));
    }

    #[test]
    fn two_candidates_advance_to_trustees() {
        let doc = with_timing().candidates(&names(&["A", "B"])).build();
        let progress = evaluate(&doc);
        assert_eq!(
            progress.completed,
            vec![Stage::BasicInfo, Stage::Timing, Stage::Candidates]
        );
        assert_eq!(progress.active, Stage::Trustees);
    }

    #[test]
    fn candidates_count_and_names() {
        let one = with_timing().candidates(&names(&["A"])).build();
        assert_eq!(evaluate(&one).active, Stage::Candidates);
        assert_eq!(
            reason(&one),
            Some(SetupIncomplete::TooFewCandidates {
                found: 1,
                required: 2
            })
        );

        let blank = with_timing().candidates(&names(&["A", "  "])).build();
        assert_eq!(evaluate(&blank).active, Stage::Candidates);
        assert_eq!(
            reason(&blank),
            Some(SetupIncomplete::BlankCandidateName { index: 1 })
        );

        let lenient = SetupRules {
            candidate_names: NameCheck::Lenient,
            ..SetupRules::DEFAULT_RULES
        };
        let progress = evaluate_with(&blank, &lenient, &IanaCalendar);
        assert!(progress.is_complete(Stage::Candidates));
        assert_eq!(progress.active, Stage::Trustees);
    }

    #[test]
    fn trustees_count_and_names() {
        let base = with_timing().candidates(&names(&["A", "B"]));
        let two = base.clone().trustees(&names(&["T1", "T2"])).build();
        assert_eq!(evaluate(&two).active, Stage::Trustees);

        let blank = base.clone().trustees(&names(&["T1", "", "T3"])).build();
        assert_eq!(evaluate(&blank).active, Stage::Trustees);
        assert_eq!(
            reason(&blank),
            Some(SetupIncomplete::BlankTrusteeName { index: 1 })
        );

        // Keys are not checked locally.
        let ok = base.trustees(&names(&["T1", "T2", "T3"])).build();
        assert_eq!(evaluate(&ok).active, Stage::Registrar);
    }

    #[test]
    fn registration_urls() {
        for bad in ["", "ftp://x.com", "not a url", "/register"] {
            let doc = complete().registrar("Town Hall", bad).build();
            let progress = evaluate(&doc);
            assert_eq!(progress.active, Stage::Registrar, "url {:?}", bad);
            assert!(!progress.is_complete(Stage::Registrar));
        }
        let doc = complete()
            .registrar("Town Hall", "http://x.com/register")
            .build();
        assert!(evaluate(&doc).is_ready());

        let mut unset = complete().build();
        if let Some(r) = unset.registrar.as_mut() {
            r.registration_url = None;
        }
        assert_eq!(
            reason(&unset),
            Some(SetupIncomplete::InvalidRegistrationUrl("".to_string()))
        );
    }

    #[test]
    fn registrar_needs_a_name() {
        let doc = complete().registrar(" ", "https://x.com/register").build();
        assert_eq!(evaluate(&doc).active, Stage::Registrar);
        assert_eq!(reason(&doc), Some(SetupIncomplete::BlankRegistrarName));
    }

    #[test]
    fn complete_setup_is_ready() {
        let doc = complete().build();
        let (progress, why) = introspect(&doc, &SetupRules::DEFAULT_RULES, &IanaCalendar);
        assert_eq!(progress.active, Stage::Genesis);
        assert_eq!(
            progress.completed,
            vec![
                Stage::BasicInfo,
                Stage::Timing,
                Stage::Candidates,
                Stage::Trustees,
                Stage::Registrar
            ]
        );
        assert!(!progress.is_complete(Stage::Genesis));
        assert_eq!(why, None);
    }

    #[test]
    fn later_stages_are_not_checked_after_a_failure() {
        // Everything after the timing is valid, but the timing is not.
        let doc = complete().time_zone("").build();
        let progress = evaluate(&doc);
        assert_eq!(progress.completed, vec![Stage::BasicInfo]);
        assert_eq!(progress.active, Stage::Timing);
    }

    #[test]
    fn tab_selection() {
        let progress = evaluate(&with_basic_info().build());
        assert_eq!(TabSelection::Auto.resolve(&progress), Stage::Timing);
        assert_eq!(
            TabSelection::Explicit(Stage::Registrar).resolve(&progress),
            Stage::Registrar
        );
    }

    #[test]
    fn stage_keys() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_key(stage.key()), Some(stage));
        }
        assert_eq!(Stage::from_key("__auto__"), None);
        assert_eq!(Stage::Registrar.next(), Some(Stage::Genesis));
        assert_eq!(Stage::Genesis.next(), None);
    }
}
