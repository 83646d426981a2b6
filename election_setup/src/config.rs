// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The shared group parameters used for encryption in the election.
///
/// Only their presence matters for the setup progress. The values are kept
/// as the encoded strings given by the document.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct EncryptionParameters {
    pub g: String,
    pub p: String,
    pub q: String,
}

/// A window of time for one phase of the election.
///
/// The timestamps are civil times without an offset ("2025-01-01T09:00:00").
/// They are resolved against the time zone of the enclosing [Timing].
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TimeWindow {
    pub opens: Option<String>,
    pub closes: Option<String>,
}

impl TimeWindow {
    pub fn new(opens: &str, closes: &str) -> TimeWindow {
        TimeWindow {
            opens: Some(opens.to_string()),
            closes: Some(closes.to_string()),
        }
    }
}

/// The phases of an election, in the order they happen.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Phase {
    /// The trustees confirm the shared parameters and publish their keys.
    ParameterConfirmation,
    VoterRegistration,
    VoteCasting,
    /// The trustees jointly decrypt the tally.
    TallyDecryption,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::ParameterConfirmation,
        Phase::VoterRegistration,
        Phase::VoteCasting,
        Phase::TallyDecryption,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Phase::ParameterConfirmation => "parameterConfirmation",
            Phase::VoterRegistration => "voterRegistration",
            Phase::VoteCasting => "voteCasting",
            Phase::TallyDecryption => "tallyDecryption",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::ParameterConfirmation => "trustee confirmation",
            Phase::VoterRegistration => "voter registration",
            Phase::VoteCasting => "vote casting",
            Phase::TallyDecryption => "trustee tallying",
        };
        write!(f, "{}", name)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Timing {
    /// IANA name of the zone all the windows are expressed in.
    pub time_zone: String,
    pub parameter_confirmation: Option<TimeWindow>,
    pub voter_registration: Option<TimeWindow>,
    pub vote_casting: Option<TimeWindow>,
    pub tally_decryption: Option<TimeWindow>,
}

impl Timing {
    pub fn window(&self, phase: Phase) -> Option<&TimeWindow> {
        match phase {
            Phase::ParameterConfirmation => self.parameter_confirmation.as_ref(),
            Phase::VoterRegistration => self.voter_registration.as_ref(),
            Phase::VoteCasting => self.vote_casting.as_ref(),
            Phase::TallyDecryption => self.tally_decryption.as_ref(),
        }
    }

    pub fn window_mut(&mut self, phase: Phase) -> &mut Option<TimeWindow> {
        match phase {
            Phase::ParameterConfirmation => &mut self.parameter_confirmation,
            Phase::VoterRegistration => &mut self.voter_registration,
            Phase::VoteCasting => &mut self.vote_casting,
            Phase::TallyDecryption => &mut self.tally_decryption,
        }
    }
}

/// An encoded public key.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PublicKey {
    pub y: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Signature {
    pub c: String,
    pub r: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

/// A trustee holding a share of the election key.
///
/// The key material is checked by a remote verifier, not here. Missing
/// values are accepted while the setup is in progress.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Trustee {
    pub id: String,
    pub name: String,
    pub verification_key: Option<PublicKey>,
    pub public_exponents: Vec<String>,
    pub signature: Option<Signature>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Registrar {
    pub id: String,
    pub name: String,
    pub registration_url: Option<String>,
    pub verification_key: Option<PublicKey>,
    pub eligibility_data_url: Option<String>,
    pub eligibility_data_hash: Option<String>,
}

/// The election setup, as edited by the authority.
///
/// Every section is optional: the document is filled in incrementally.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SetupDocument {
    pub name: String,
    pub encryption_parameters: Option<EncryptionParameters>,
    pub timing: Option<Timing>,
    pub candidates: Option<Vec<Candidate>>,
    pub trustees: Option<Vec<Trustee>>,
    pub registrar: Option<Registrar>,
}

// ******** Output data structures *********

/// The sections of the setup, in the order they must be completed.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Stage {
    BasicInfo,
    Timing,
    Candidates,
    Trustees,
    Registrar,
    /// Ready to publish the genesis record. It has no check of its own.
    Genesis,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::BasicInfo,
        Stage::Timing,
        Stage::Candidates,
        Stage::Trustees,
        Stage::Registrar,
        Stage::Genesis,
    ];

    /// The stable identifier, as used by the setup interface.
    pub fn key(&self) -> &'static str {
        match self {
            Stage::BasicInfo => "basic",
            Stage::Timing => "timing",
            Stage::Candidates => "candidates",
            Stage::Trustees => "trustees",
            Stage::Registrar => "registrar",
            Stage::Genesis => "genesis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::BasicInfo => "Info",
            Stage::Timing => "Timing",
            Stage::Candidates => "Candidates",
            Stage::Trustees => "Trustees",
            Stage::Registrar => "Registrar",
            Stage::Genesis => "Genesis",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::BasicInfo => Some(Stage::Timing),
            Stage::Timing => Some(Stage::Candidates),
            Stage::Candidates => Some(Stage::Trustees),
            Stage::Trustees => Some(Stage::Registrar),
            Stage::Registrar => Some(Stage::Genesis),
            Stage::Genesis => None,
        }
    }

    pub fn from_key(key: &str) -> Option<Stage> {
        Stage::ALL.iter().copied().find(|s| s.key() == key)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The result of evaluating a setup document.
///
/// `completed` lists the stages that passed, in stage order. `active` is the
/// first stage that did not pass, or [Stage::Genesis] when all of them did.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Progress {
    pub active: Stage,
    pub completed: Vec<Stage>,
}

impl Progress {
    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    /// All the stages before the genesis passed.
    pub fn is_ready(&self) -> bool {
        self.active == Stage::Genesis
    }
}

/// The tab shown by the setup interface.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TabSelection {
    /// Follow the progress: show the first stage that is not complete.
    Auto,
    /// The user picked a tab.
    Explicit(Stage),
}

impl TabSelection {
    pub fn resolve(&self, progress: &Progress) -> Stage {
        match self {
            TabSelection::Auto => progress.active,
            TabSelection::Explicit(stage) => *stage,
        }
    }
}

/// The reason why a stage of the setup is not complete.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SetupIncomplete {
    MissingEncryptionParameters,
    MissingName,
    MissingTiming,
    UnknownTimeZone(String),
    MissingWindow(Phase),
    MalformedTimestamp { phase: Phase, value: String },
    /// The phase opens before the previous phase closes.
    OpensBeforePreviousCloses(Phase),
    ClosesBeforeOpens(Phase),
    MissingCandidates,
    TooFewCandidates { found: usize, required: usize },
    BlankCandidateName { index: usize },
    MissingTrustees,
    TooFewTrustees { found: usize, required: usize },
    BlankTrusteeName { index: usize },
    MissingRegistrar,
    BlankRegistrarName,
    InvalidRegistrationUrl(String),
    UnsupportedUrlScheme(String),
}

impl Error for SetupIncomplete {}

impl Display for SetupIncomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupIncomplete::MissingEncryptionParameters => {
                write!(f, "the encryption parameters are not set")
            }
            SetupIncomplete::MissingName => write!(f, "the election has no name"),
            SetupIncomplete::MissingTiming => write!(f, "the election timing is not set"),
            SetupIncomplete::UnknownTimeZone(tz) => write!(f, "unknown time zone {:?}", tz),
            SetupIncomplete::MissingWindow(phase) => {
                write!(f, "the {} window needs an opening and a closing time", phase)
            }
            SetupIncomplete::MalformedTimestamp { phase, value } => {
                write!(f, "cannot read the time {:?} of the {} window", value, phase)
            }
            SetupIncomplete::OpensBeforePreviousCloses(phase) => write!(
                f,
                "the {} window opens before the previous phase closes",
                phase
            ),
            SetupIncomplete::ClosesBeforeOpens(phase) => {
                write!(f, "the {} window closes before it opens", phase)
            }
            SetupIncomplete::MissingCandidates => write!(f, "no candidates are listed"),
            SetupIncomplete::TooFewCandidates { found, required } => write!(
                f,
                "{} candidate(s) listed, at least {} are required",
                found, required
            ),
            SetupIncomplete::BlankCandidateName { index } => {
                write!(f, "candidate #{} has no name", index + 1)
            }
            SetupIncomplete::MissingTrustees => write!(f, "no trustees are listed"),
            SetupIncomplete::TooFewTrustees { found, required } => write!(
                f,
                "{} trustee(s) listed, at least {} are required",
                found, required
            ),
            SetupIncomplete::BlankTrusteeName { index } => {
                write!(f, "trustee #{} has no name", index + 1)
            }
            SetupIncomplete::MissingRegistrar => write!(f, "the registrar is not configured"),
            SetupIncomplete::BlankRegistrarName => write!(f, "the registrar has no name"),
            SetupIncomplete::InvalidRegistrationUrl(u) => {
                write!(f, "the registration URL {:?} is not a valid URL", u)
            }
            SetupIncomplete::UnsupportedUrlScheme(s) => write!(
                f,
                "the registration URL must use http or https, not {:?}",
                s
            ),
        }
    }
}

// ********* Configuration **********

/// How strictly the names of the candidates are checked.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NameCheck {
    /// A candidate with a blank name keeps the stage incomplete.
    Strict,
    /// Candidate names are not checked. This is how earlier versions of the
    /// setup interface behaved.
    Lenient,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SetupRules {
    pub min_candidates: usize,
    pub min_trustees: usize,
    pub candidate_names: NameCheck,
}

impl SetupRules {
    pub const DEFAULT_RULES: SetupRules = SetupRules {
        min_candidates: 2,
        min_trustees: 3,
        candidate_names: NameCheck::Strict,
    };
}
