//! # LCP Auth
//!
//! Passphrase authentication for LCP protected publications.
//!
//! When a license is opened and no stored passphrase decrypts its user key,
//! the reading system asks an [`Authenticator`] for one.
//!
//! ## Provided Authenticators
//!
//! - [`PassphraseAuthenticator`] - a fixed clear or hashed passphrase, with an
//!   optional fallback used when that passphrase turns out to be invalid
//! - [`CallbackAuthenticator`] - adapts a closure (prompt, keychain lookup,
//!   web service...) into an authenticator

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authenticator;
pub mod callback;
pub mod error;
pub mod license;
pub mod passphrase;
pub mod reason;

pub use authenticator::{Authenticator, Sender};
pub use callback::{CallbackAuthenticator, PassphraseFn};
pub use error::ParseReasonError;
pub use license::AuthenticatedLicense;
pub use passphrase::PassphraseAuthenticator;
pub use reason::AuthenticationReason;
