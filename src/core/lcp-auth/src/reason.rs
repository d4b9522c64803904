//! Authentication reasons.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseReasonError;

/// Why a passphrase is being requested.
///
/// Authenticators should use it to phrase their prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationReason {
    /// No matching passphrase was found.
    PassphraseNotFound,
    /// The provided passphrase was invalid.
    InvalidPassphrase,
}

impl AuthenticationReason {
    /// Returns the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassphraseNotFound => "passphrase_not_found",
            Self::InvalidPassphrase => "invalid_passphrase",
        }
    }
}

impl std::fmt::Display for AuthenticationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PassphraseNotFound => f.write_str("no matching passphrase was found"),
            Self::InvalidPassphrase => f.write_str("the provided passphrase was invalid"),
        }
    }
}

impl FromStr for AuthenticationReason {
    type Err = ParseReasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passphrase_not_found" | "not-found" => Ok(Self::PassphraseNotFound),
            "invalid_passphrase" | "invalid" => Ok(Self::InvalidPassphrase),
            other => Err(ParseReasonError(other.to_string())),
        }
    }
}
