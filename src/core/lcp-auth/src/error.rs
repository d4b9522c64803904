//! Error types.
//!
//! Authentication itself never fails: an authenticator that cannot supply a
//! passphrase answers `None`. The errors here only cover parsing inputs.

use thiserror::Error;

/// Error returned when parsing an [`AuthenticationReason`](crate::AuthenticationReason).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown authentication reason: {0}")]
pub struct ParseReasonError(pub String);
