//! Integration tests for LCP passphrase authentication.
//!
//! These tests drive authenticator chains the way a reading system opening a
//! license does: ask for a passphrase, try it, and ask again when it fails.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::time::Duration;

use tracing::{debug, info};

use lcp_auth::{AuthenticatedLicense, AuthenticationReason, Authenticator, Sender};
use lcp_license::LicenseDocument;

// ============================================================================
// License Opener
// ============================================================================

/// Result of trying to open a license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A passphrase decrypted the user key.
    Unlocked {
        /// The accepted passphrase.
        passphrase: String,
        /// Number of passphrase requests made.
        attempts: usize,
    },
    /// The authenticator gave up (user cancelled, nothing stored...).
    NoPassphrase {
        /// Number of passphrase requests made.
        attempts: usize,
    },
    /// The authenticator did not answer in time.
    TimedOut {
        /// Number of passphrase requests made.
        attempts: usize,
    },
    /// Every offered passphrase was rejected.
    TooManyAttempts,
}

/// Opens licenses by asking an [`Authenticator`] until a passphrase works.
///
/// The `check` function stands in for user key decryption.
pub struct LicenseOpener<A> {
    authenticator: A,
    max_attempts: usize,
    timeout: Option<Duration>,
}

impl<A: Authenticator> LicenseOpener<A> {
    /// Creates an opener allowing 5 attempts and no timeout.
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            max_attempts: 5,
            timeout: None,
        }
    }

    /// Sets the maximum number of passphrase requests.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Bounds each passphrase request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Requests passphrases until `check` accepts one or the authenticator gives up.
    pub async fn open<F>(
        &self,
        document: &LicenseDocument,
        check: F,
        allow_user_interaction: bool,
        sender: Sender<'_>,
    ) -> OpenOutcome
    where
        F: Fn(&str) -> bool,
    {
        let license = AuthenticatedLicense::new(document);
        let mut reason = AuthenticationReason::PassphraseNotFound;

        for attempt in 1..=self.max_attempts {
            let request = self.authenticator.request_passphrase(
                &license,
                reason,
                allow_user_interaction,
                sender,
            );

            let answer = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, request).await {
                    Ok(answer) => answer,
                    Err(_) => return OpenOutcome::TimedOut { attempts: attempt },
                },
                None => request.await,
            };

            let Some(passphrase) = answer else {
                debug!(license_id = %document.id, attempt, "No passphrase obtained");
                return OpenOutcome::NoPassphrase { attempts: attempt };
            };

            if check(&passphrase) {
                info!(license_id = %document.id, attempt, "License unlocked");
                return OpenOutcome::Unlocked {
                    passphrase,
                    attempts: attempt,
                };
            }

            reason = AuthenticationReason::InvalidPassphrase;
        }

        OpenOutcome::TooManyAttempts
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use lcp_auth::{CallbackAuthenticator, PassphraseAuthenticator};
    use lcp_license::{Link, LinkRelation, User};

    fn pet_license() -> LicenseDocument {
        LicenseDocument::builder("license-pet", "https://provider.example")
            .text_hint("my pet's name")
            .link(Link::new("https://provider.example/support", LinkRelation::Support))
            .link(Link::new("mailto:support@provider.example", LinkRelation::Support))
            .user(User {
                id: Some("user-1".to_string()),
                email: Some("reader@example.com".to_string()),
                name: None,
            })
            .build()
    }

    /// Never answers.
    struct PendingAuthenticator;

    #[async_trait]
    impl Authenticator for PendingAuthenticator {
        async fn request_passphrase(
            &self,
            _license: &AuthenticatedLicense<'_>,
            _reason: AuthenticationReason,
            _allow_user_interaction: bool,
            _sender: Sender<'_>,
        ) -> Option<String> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_pet_name_scenario() {
        let doc = pet_license();
        let license = AuthenticatedLicense::new(&doc);
        let auth = PassphraseAuthenticator::new("secret123");

        assert_eq!(license.hint(), "my pet's name");
        assert_eq!(license.support_links().len(), 2);
        assert_eq!(license.provider(), "https://provider.example");

        let found = auth
            .request_passphrase(&license, AuthenticationReason::PassphraseNotFound, true, None)
            .await;
        let invalid = auth
            .request_passphrase(&license, AuthenticationReason::InvalidPassphrase, true, None)
            .await;

        assert_eq!(found.as_deref(), Some("secret123"));
        assert!(invalid.is_none());
    }

    #[tokio::test]
    async fn test_static_fallback_does_not_answer_invalid() {
        let doc = pet_license();
        let license = AuthenticatedLicense::new(&doc);
        let auth = PassphraseAuthenticator::new("secret123")
            .with_fallback(Arc::new(PassphraseAuthenticator::new("backup456")));

        let result = auth
            .request_passphrase(&license, AuthenticationReason::InvalidPassphrase, true, None)
            .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_opener_accepts_correct_static_passphrase() {
        let doc = pet_license();
        let opener = LicenseOpener::new(PassphraseAuthenticator::new("secret123"));

        let outcome = opener.open(&doc, |p| p == "secret123", true, None).await;

        assert_eq!(
            outcome,
            OpenOutcome::Unlocked {
                passphrase: "secret123".to_string(),
                attempts: 1
            }
        );
    }

    #[tokio::test]
    async fn test_opener_stops_when_static_passphrase_is_wrong() {
        let doc = pet_license();
        let opener = LicenseOpener::new(
            PassphraseAuthenticator::new("wrong")
                .with_fallback(Arc::new(PassphraseAuthenticator::new("secret123"))),
        );

        let outcome = opener.open(&doc, |p| p == "secret123", true, None).await;

        assert_eq!(outcome, OpenOutcome::NoPassphrase { attempts: 2 });
    }

    #[tokio::test]
    async fn test_interactive_fallback_recovers() {
        let doc = pet_license();
        let prompted = Arc::new(Mutex::new(Vec::new()));
        let seen = prompted.clone();
        let prompt = CallbackAuthenticator::interactive(move |license, reason| {
            seen.lock().unwrap().push((license.hint().to_string(), reason));
            Some("secret123".to_string())
        });
        let opener = LicenseOpener::new(
            PassphraseAuthenticator::new("wrong").with_fallback(Arc::new(prompt)),
        );

        let outcome = opener.open(&doc, |p| p == "secret123", true, None).await;

        assert_eq!(
            outcome,
            OpenOutcome::Unlocked {
                passphrase: "secret123".to_string(),
                attempts: 2
            }
        );
        assert_eq!(
            *prompted.lock().unwrap(),
            vec![(
                "my pet's name".to_string(),
                AuthenticationReason::InvalidPassphrase
            )]
        );
    }

    #[tokio::test]
    async fn test_interactive_fallback_respects_no_interaction() {
        let doc = pet_license();
        let prompts = Arc::new(AtomicUsize::new(0));
        let counter = prompts.clone();
        let prompt = CallbackAuthenticator::interactive(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("secret123".to_string())
        });
        let opener = LicenseOpener::new(
            PassphraseAuthenticator::new("wrong").with_fallback(Arc::new(prompt)),
        );

        let outcome = opener.open(&doc, |p| p == "secret123", false, None).await;

        assert_eq!(outcome, OpenOutcome::NoPassphrase { attempts: 2 });
        assert_eq!(prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_user_keeps_typing_wrong_passphrase() {
        let doc = pet_license();
        let prompt = CallbackAuthenticator::interactive(|_, _| Some("nope".to_string()));
        let opener = LicenseOpener::new(prompt).with_max_attempts(3);

        let outcome = opener.open(&doc, |p| p == "secret123", true, None).await;

        assert_eq!(outcome, OpenOutcome::TooManyAttempts);
    }

    #[tokio::test]
    async fn test_caller_side_timeout() {
        let doc = pet_license();
        let opener = LicenseOpener::new(
            PassphraseAuthenticator::new("wrong").with_fallback(Arc::new(PendingAuthenticator)),
        )
        .with_timeout(Duration::from_millis(50));

        let outcome = opener.open(&doc, |p| p == "secret123", true, None).await;

        assert_eq!(outcome, OpenOutcome::TimedOut { attempts: 2 });
    }

    #[tokio::test]
    async fn test_sender_reaches_custom_fallback() {
        struct SenderEcho;

        #[async_trait]
        impl Authenticator for SenderEcho {
            async fn request_passphrase(
                &self,
                _license: &AuthenticatedLicense<'_>,
                _reason: AuthenticationReason,
                _allow_user_interaction: bool,
                sender: Sender<'_>,
            ) -> Option<String> {
                sender
                    .and_then(|s| s.downcast_ref::<String>())
                    .cloned()
            }
        }

        let doc = pet_license();
        let window = "secret123".to_string();
        let opener = LicenseOpener::new(
            PassphraseAuthenticator::new("wrong").with_fallback(Arc::new(SenderEcho)),
        );

        let outcome = opener
            .open(
                &doc,
                |p| p == "secret123",
                true,
                Some(&window as &(dyn Any + Send + Sync)),
            )
            .await;

        assert_eq!(
            outcome,
            OpenOutcome::Unlocked {
                passphrase: "secret123".to_string(),
                attempts: 2
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_authenticator() {
        let auth: Arc<dyn Authenticator> = Arc::new(PassphraseAuthenticator::new("secret123"));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let auth = auth.clone();
                tokio::spawn(async move {
                    let doc =
                        LicenseDocument::builder(format!("license-{}", i), "https://provider.example")
                            .build();
                    let license = AuthenticatedLicense::new(&doc);
                    let reason = if i % 2 == 0 {
                        AuthenticationReason::PassphraseNotFound
                    } else {
                        AuthenticationReason::InvalidPassphrase
                    };
                    (reason, auth.request_passphrase(&license, reason, false, None).await)
                })
            })
            .collect();

        for task in tasks {
            let (reason, result) = task.await.unwrap();
            match reason {
                AuthenticationReason::PassphraseNotFound => {
                    assert_eq!(result.as_deref(), Some("secret123"))
                },
                AuthenticationReason::InvalidPassphrase => assert!(result.is_none()),
            }
        }
    }
}
