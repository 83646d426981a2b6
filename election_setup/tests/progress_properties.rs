//! Property tests for the setup progress evaluation.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use election_setup::builder::SetupBuilder;
use election_setup::{evaluate, Phase, SetupDocument, Stage};
use proptest::array::uniform5;
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

fn civil(hours: i64) -> String {
    (base_time() + Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn names(l: &[&str]) -> Vec<String> {
    l.iter().map(|s| s.to_string()).collect()
}

/// The state of one section of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Absent,
    Valid,
    Invalid,
}

fn section() -> impl Strategy<Value = Section> {
    prop_oneof![
        Just(Section::Absent),
        Just(Section::Valid),
        Just(Section::Invalid)
    ]
}

/// Builds a document from the state of its five sections, in stage order.
fn document(sections: &[Section; 5]) -> SetupDocument {
    let mut b = SetupBuilder::new("");
    b = match sections[0] {
        Section::Absent => b,
        Section::Valid => b.name("Town Vote").encryption_parameters("Ag", "Aw", "AQ"),
        Section::Invalid => b.encryption_parameters("Ag", "Aw", "AQ"),
    };
    b = match sections[1] {
        Section::Absent => b,
        Section::Valid | Section::Invalid => {
            let mut t = b.time_zone("Europe/London");
            for (i, phase) in Phase::ALL.iter().enumerate() {
                let start = 48 * i as i64;
                t = t.window(*phase, &civil(start), &civil(start + 24));
            }
            if sections[1] == Section::Invalid {
                t = t.window(Phase::VoteCasting, &civil(0), &civil(1));
            }
            t
        }
    };
    b = match sections[2] {
        Section::Absent => b,
        Section::Valid => b.candidates(&names(&["Anna", "Bob"])),
        Section::Invalid => b.candidates(&names(&["Anna"])),
    };
    b = match sections[3] {
        Section::Absent => b,
        Section::Valid => b.trustees(&names(&["Tara", "Tom", "Tess"])),
        Section::Invalid => b.trustees(&names(&["Tara", "Tom"])),
    };
    b = match sections[4] {
        Section::Absent => b,
        Section::Valid => b.registrar("Town Hall", "https://x.com/register"),
        Section::Invalid => b.registrar("Town Hall", "ftp://x.com"),
    };
    b.build()
}

fn sections() -> impl Strategy<Value = [Section; 5]> {
    uniform5(section())
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Evaluating the same document twice gives the same progress.
    #[test]
    fn evaluation_is_idempotent(s in sections()) {
        let doc = document(&s);
        prop_assert_eq!(evaluate(&doc), evaluate(&doc));
    }

    /// The completed stages are exactly the stages before the active one.
    #[test]
    fn completed_is_prefix_before_active(s in sections()) {
        let progress = evaluate(&document(&s));
        let expected: Vec<Stage> = Stage::ALL
            .iter()
            .copied()
            .take_while(|st| *st != progress.active)
            .collect();
        prop_assert_eq!(&progress.completed, &expected);
        prop_assert!(!progress.is_complete(progress.active));

        let first_bad = s.iter().position(|sec| *sec != Section::Valid);
        let expected_active = first_bad.map(|i| Stage::ALL[i]).unwrap_or(Stage::Genesis);
        prop_assert_eq!(progress.active, expected_active);
    }

    /// Filling a missing section never loses progress.
    #[test]
    fn filling_a_section_is_monotone(s in sections(), idx in 0usize..5) {
        let mut missing = s;
        missing[idx] = Section::Absent;
        let mut filled = s;
        filled[idx] = Section::Valid;
        let before = evaluate(&document(&missing));
        let after = evaluate(&document(&filled));
        prop_assert!(after.active >= before.active);
        for stage in before.completed.iter() {
            prop_assert!(after.is_complete(*stage));
        }
    }

    /// The timing passes exactly when the eight boundaries are in order.
    #[test]
    fn window_chain_is_ordered(offsets in vec(0i64..200, 8)) {
        let mut b = SetupBuilder::new("Town Vote")
            .encryption_parameters("Ag", "Aw", "AQ")
            .time_zone("America/New_York");
        for (i, phase) in Phase::ALL.iter().enumerate() {
            b = b.window(*phase, &civil(offsets[2 * i]), &civil(offsets[2 * i + 1]));
        }
        let progress = evaluate(&b.build());
        let ordered = offsets.windows(2).all(|w| w[0] <= w[1]);
        prop_assert_eq!(progress.is_complete(Stage::Timing), ordered);
    }
}
