pub use crate::config::*;

/// A builder for setup documents.
///
/// Every call consumes the builder and returns the edited one, so a document
/// that has been handed out is never changed behind its holder's back.
///
/// ```
/// use election_setup::builder::SetupBuilder;
/// use election_setup::{evaluate, Stage};
///
/// let setup = SetupBuilder::new("Town Vote")
///     .encryption_parameters("Ag", "Aw", "AQ")
///     .build();
///
/// let progress = evaluate(&setup);
/// assert_eq!(progress.completed, vec![Stage::BasicInfo]);
/// assert_eq!(progress.active, Stage::Timing);
/// ```
#[derive(Debug, Clone)]
pub struct SetupBuilder {
    pub(crate) _document: SetupDocument,
}

impl SetupBuilder {
    pub fn new(name: &str) -> SetupBuilder {
        SetupBuilder {
            _document: SetupDocument {
                name: name.to_string(),
                ..SetupDocument::default()
            },
        }
    }

    /// Starts from a copy of an existing document.
    pub fn from_document(document: &SetupDocument) -> SetupBuilder {
        SetupBuilder {
            _document: document.clone(),
        }
    }

    pub fn name(mut self, name: &str) -> SetupBuilder {
        self._document.name = name.to_string();
        self
    }

    pub fn encryption_parameters(mut self, g: &str, p: &str, q: &str) -> SetupBuilder {
        self._document.encryption_parameters = Some(EncryptionParameters {
            g: g.to_string(),
            p: p.to_string(),
            q: q.to_string(),
        });
        self
    }

    pub fn time_zone(mut self, time_zone: &str) -> SetupBuilder {
        self.timing_mut().time_zone = time_zone.to_string();
        self
    }

    /// Sets the window of one phase. The timing section is created with an
    /// empty time zone if it does not exist yet.
    pub fn window(mut self, phase: Phase, opens: &str, closes: &str) -> SetupBuilder {
        *self.timing_mut().window_mut(phase) = Some(TimeWindow::new(opens, closes));
        self
    }

    pub fn candidates(mut self, names: &[String]) -> SetupBuilder {
        self._document.candidates = Some(
            names
                .iter()
                .enumerate()
                .map(|(idx, name)| Candidate {
                    id: format!("candidate-{}", idx + 1),
                    name: name.clone(),
                })
                .collect(),
        );
        self
    }

    /// Sets the trustees by name. Their key material is left empty until the
    /// trustees provide it.
    pub fn trustees(mut self, names: &[String]) -> SetupBuilder {
        self._document.trustees = Some(
            names
                .iter()
                .enumerate()
                .map(|(idx, name)| Trustee {
                    id: format!("trustee-{}", idx + 1),
                    name: name.clone(),
                    ..Trustee::default()
                })
                .collect(),
        );
        self
    }

    pub fn registrar(mut self, name: &str, registration_url: &str) -> SetupBuilder {
        self._document.registrar = Some(Registrar {
            id: "registrar".to_string(),
            name: name.to_string(),
            registration_url: Some(registration_url.to_string()),
            ..Registrar::default()
        });
        self
    }

    pub fn build(self) -> SetupDocument {
        self._document
    }

    fn timing_mut(&mut self) -> &mut Timing {
        self._document.timing.get_or_insert_with(Timing::default)
    }
}
