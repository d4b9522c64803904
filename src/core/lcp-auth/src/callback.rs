//! Closure-backed authenticator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{AuthenticatedLicense, AuthenticationReason, Authenticator, Sender};

/// Callback producing a passphrase for a license.
///
/// This allows the app to plug a prompt, a keychain lookup or any other
/// source into an authenticator chain without implementing the trait.
pub type PassphraseFn =
    Arc<dyn Fn(&AuthenticatedLicense<'_>, AuthenticationReason) -> Option<String> + Send + Sync>;

/// An [`Authenticator`] delegating to a [`PassphraseFn`].
///
/// The callback runs inline while the request is polled, so it must not
/// block: a caller-side timeout cannot fire before it returns. A prompt
/// waiting on user input belongs in its own [`Authenticator`] that awaits.
pub struct CallbackAuthenticator {
    callback: PassphraseFn,
    requires_interaction: bool,
}

impl CallbackAuthenticator {
    /// Creates an authenticator whose callback never needs the user.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&AuthenticatedLicense<'_>, AuthenticationReason) -> Option<String>
            + Send
            + Sync
            + 'static,
    {
        Self::from_fn(Arc::new(callback), false)
    }

    /// Creates an authenticator whose callback prompts the user.
    ///
    /// The callback is skipped, and `None` returned, when user interaction
    /// is not allowed.
    pub fn interactive<F>(callback: F) -> Self
    where
        F: Fn(&AuthenticatedLicense<'_>, AuthenticationReason) -> Option<String>
            + Send
            + Sync
            + 'static,
    {
        Self::from_fn(Arc::new(callback), true)
    }

    /// Creates an authenticator from a shared callback.
    pub fn from_fn(callback: PassphraseFn, requires_interaction: bool) -> Self {
        Self {
            callback,
            requires_interaction,
        }
    }

    /// Returns true if the callback prompts the user.
    pub fn requires_interaction(&self) -> bool {
        self.requires_interaction
    }
}

#[async_trait]
impl Authenticator for CallbackAuthenticator {
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        _sender: Sender<'_>,
    ) -> Option<String> {
        if self.requires_interaction && !allow_user_interaction {
            debug!(
                license_id = %license.document().id,
                "User interaction not allowed, skipping passphrase prompt"
            );
            return None;
        }

        (self.callback)(license, reason)
    }

    fn name(&self) -> &'static str {
        if self.requires_interaction {
            "interactive-callback"
        } else {
            "callback"
        }
    }
}
