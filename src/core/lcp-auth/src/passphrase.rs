//! Static passphrase authenticator.
//!
//! Supplies a passphrase known in advance, for example one delivered along
//! with the publication or stored by the app in its own keychain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{AuthenticatedLicense, AuthenticationReason, Authenticator, Sender};

/// An [`Authenticator`] which directly uses a provided clear or hashed passphrase.
///
/// The passphrase is only offered when no stored passphrase was found. Once
/// it has been rejected ([`AuthenticationReason::InvalidPassphrase`]), the
/// request goes unchanged to the `fallback` authenticator, or gets `None`
/// when there is none. Offering the same value again would never succeed.
///
/// A fallback which is itself a `PassphraseAuthenticator` receives
/// `InvalidPassphrase` too and so never answers with its own passphrase.
/// Only a fallback able to ask someone (see
/// [`CallbackAuthenticator`](crate::CallbackAuthenticator)) can recover.
pub struct PassphraseAuthenticator {
    passphrase: String,
    fallback: Option<Arc<dyn Authenticator>>,
}

impl PassphraseAuthenticator {
    /// Creates an authenticator without fallback.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
            fallback: None,
        }
    }

    /// Sets the authenticator used when the passphrase is invalid.
    pub fn with_fallback(mut self, fallback: Arc<dyn Authenticator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Returns the fallback authenticator, if any.
    pub fn fallback(&self) -> Option<&Arc<dyn Authenticator>> {
        self.fallback.as_ref()
    }
}

impl std::fmt::Debug for PassphraseAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassphraseAuthenticator")
            .field("passphrase", &"[REDACTED]")
            .field("fallback", &self.fallback.as_ref().map(|a| a.name()))
            .finish()
    }
}

#[async_trait]
impl Authenticator for PassphraseAuthenticator {
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        sender: Sender<'_>,
    ) -> Option<String> {
        if reason == AuthenticationReason::PassphraseNotFound {
            return Some(self.passphrase.clone());
        }

        match &self.fallback {
            Some(fallback) => {
                debug!(
                    license_id = %license.document().id,
                    reason = reason.as_str(),
                    fallback = fallback.name(),
                    "Static passphrase rejected, delegating to fallback"
                );
                fallback
                    .request_passphrase(license, reason, allow_user_interaction, sender)
                    .await
            },
            None => {
                debug!(
                    license_id = %license.document().id,
                    reason = reason.as_str(),
                    "Static passphrase rejected, no fallback configured"
                );
                None
            },
        }
    }

    fn name(&self) -> &'static str {
        "static-passphrase"
    }
}
