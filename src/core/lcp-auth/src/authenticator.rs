//! Authenticator trait.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{AuthenticatedLicense, AuthenticationReason};

/// Free-form context given by the caller, forwarded untouched to authenticators.
///
/// Reading apps can use it to give some UX context when presenting a
/// dialog, for example a handle on the host window.
pub type Sender<'a> = Option<&'a (dyn Any + Send + Sync)>;

/// Trait for passphrase authenticators.
///
/// The reading app can prompt the user to enter the passphrase, or retrieve
/// it by any other means (keychain, web service...).
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Requests a passphrase to decrypt the given license.
    ///
    /// # Arguments
    ///
    /// * `license` - Information to show to the user about the license being
    ///   opened. Only valid for the duration of the call.
    /// * `reason` - Why the passphrase is requested.
    /// * `allow_user_interaction` - Whether the user can be prompted. An
    ///   implementation that needs to prompt must return `None` quickly when
    ///   this is false.
    /// * `sender` - Caller context, see [`Sender`].
    ///
    /// # Returns
    ///
    /// * `Some(passphrase)` - A clear or already hashed passphrase
    /// * `None` - The user cancelled or no passphrase is available
    ///
    /// There is no timeout: callers that cannot wait forever must bound the
    /// returned future themselves.
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        sender: Sender<'_>,
    ) -> Option<String>;

    /// Returns the name of this authenticator for logging/debugging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

#[async_trait]
impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        sender: Sender<'_>,
    ) -> Option<String> {
        (**self)
            .request_passphrase(license, reason, allow_user_interaction, sender)
            .await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait]
impl<A: Authenticator + ?Sized> Authenticator for Box<A> {
    async fn request_passphrase(
        &self,
        license: &AuthenticatedLicense<'_>,
        reason: AuthenticationReason,
        allow_user_interaction: bool,
        sender: Sender<'_>,
    ) -> Option<String> {
        (**self)
            .request_passphrase(license, reason, allow_user_interaction, sender)
            .await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
