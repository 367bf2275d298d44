use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failed operation, used by frontends to pick
/// how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service could not be reached or the exchange broke mid-flight.
    Transport,
    /// The service answered but refused or failed the request.
    Rejected,
    /// The failure happened before anything was sent (e.g. reading a file).
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
