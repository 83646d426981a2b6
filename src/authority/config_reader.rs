// The JSON representation of the election setup, as exchanged with the setup interface.

use crate::authority::*;

use election_setup::{
    Candidate, EncryptionParameters, PublicKey, Registrar, SetupDocument, Signature, TimeWindow,
    Timing, Trustee,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Base64url encoded integers.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EGParams {
    pub g: String,
    pub p: String,
    pub q: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyData {
    pub y: String,
}

/// Proof of knowledge of a secret key.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PoKData {
    pub m: String,
    pub c: String,
    pub r: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SigData {
    pub c: String,
    pub r: String,
}

/// Times are "YYYY-mm-ddTHH:MM:SS" without a time zone.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeWindowData {
    pub opens: Option<String>,
    pub closes: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingData {
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "parameterConfirmation")]
    pub parameter_confirmation: Option<TimeWindowData>,
    #[serde(rename = "voterRegistration")]
    pub voter_registration: Option<TimeWindowData>,
    #[serde(rename = "voteCasting")]
    pub vote_casting: Option<TimeWindowData>,
    #[serde(rename = "tallyDecryption")]
    pub tally_decryption: Option<TimeWindowData>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateData {
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrusteeData {
    #[serde(rename = "trusteeId")]
    pub trustee_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "verificationKey")]
    pub verification_key: Option<PublicKeyData>,
    #[serde(rename = "publicExponents")]
    pub public_exponents: Option<Vec<String>>,
    pub signature: Option<SigData>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrarData {
    #[serde(rename = "registrarId")]
    pub registrar_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "verificationKey")]
    pub verification_key: Option<PublicKeyData>,
    #[serde(rename = "encryptionKey")]
    pub encryption_key: Option<PublicKeyData>,
    #[serde(rename = "encryptionProof")]
    pub encryption_proof: Option<PoKData>,
    #[serde(rename = "eligibilityDataURL")]
    pub eligibility_data_url: Option<String>,
    #[serde(rename = "eligibilityDataHash")]
    pub eligibility_data_hash: Option<String>,
    #[serde(rename = "registrationURL")]
    pub registration_url: Option<String>,
}

/// The election setup file. All the fields may be missing while the setup is in progress.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesisData {
    pub name: Option<String>,
    #[serde(rename = "encryptionSharedParams")]
    pub encryption_shared_params: Option<EGParams>,
    #[serde(rename = "trusteesRequired")]
    pub trustees_required: Option<u32>,
    pub registrar: Option<RegistrarData>,
    pub candidates: Option<Vec<CandidateData>>,
    pub trustees: Option<Vec<TrusteeData>>,
    pub timing: Option<TimingData>,
}

impl GenesisData {
    /// Converts the file representation into the document checked by the evaluator.
    pub fn to_document(&self) -> SetupDocument {
        SetupDocument {
            name: self.name.clone().unwrap_or_default(),
            encryption_parameters: self.encryption_shared_params.as_ref().map(|eg| {
                EncryptionParameters {
                    g: eg.g.clone(),
                    p: eg.p.clone(),
                    q: eg.q.clone(),
                }
            }),
            timing: self.timing.as_ref().map(|t| Timing {
                time_zone: t.time_zone.clone().unwrap_or_default(),
                parameter_confirmation: t.parameter_confirmation.as_ref().map(to_window),
                voter_registration: t.voter_registration.as_ref().map(to_window),
                vote_casting: t.vote_casting.as_ref().map(to_window),
                tally_decryption: t.tally_decryption.as_ref().map(to_window),
            }),
            candidates: self.candidates.as_ref().map(|cs| {
                cs.iter()
                    .map(|c| Candidate {
                        id: c.candidate_id.clone().unwrap_or_default(),
                        name: c.name.clone().unwrap_or_default(),
                    })
                    .collect()
            }),
            trustees: self.trustees.as_ref().map(|ts| {
                ts.iter()
                    .map(|t| Trustee {
                        id: t.trustee_id.clone().unwrap_or_default(),
                        name: t.name.clone().unwrap_or_default(),
                        verification_key: t.verification_key.as_ref().map(to_key),
                        public_exponents: t.public_exponents.clone().unwrap_or_default(),
                        signature: t.signature.as_ref().map(|s| Signature {
                            c: s.c.clone(),
                            r: s.r.clone(),
                        }),
                    })
                    .collect()
            }),
            registrar: self.registrar.as_ref().map(|r| Registrar {
                id: r.registrar_id.clone().unwrap_or_default(),
                name: r.name.clone().unwrap_or_default(),
                registration_url: r.registration_url.clone(),
                verification_key: r.verification_key.as_ref().map(to_key),
                eligibility_data_url: r.eligibility_data_url.clone(),
                eligibility_data_hash: r.eligibility_data_hash.clone(),
            }),
        }
    }
}

fn to_window(w: &TimeWindowData) -> TimeWindow {
    TimeWindow {
        opens: w.opens.clone(),
        closes: w.closes.clone(),
    }
}

fn to_key(k: &PublicKeyData) -> PublicKey {
    PublicKey { y: k.y.clone() }
}

/// Reads the setup file.
///
/// Returns `None` if the file does not exist yet: this is a new election.
pub fn read_document(path: &str) -> AuthorityResult<Option<GenesisData>> {
    if !Path::new(path).exists() {
        debug!("read_document: {} missing", path);
        info!("No setup data file: starting a new election");
        return Ok(None);
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let data: GenesisData =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    info!("Loaded setup data from {}", path);
    Ok(Some(data))
}

/// Replaces the content of the setup file.
pub fn save_document(path: &str, data: &GenesisData) -> AuthorityResult<()> {
    let js = serde_json::to_string_pretty(data).context(WritingJsonSnafu {})?;
    fs::write(path, js).context(WritingFileSnafu { path })?;
    debug!("save_document: saved setup data to {}", path);
    Ok(())
}
