//! License information handed to authenticators.

use lcp_license::{LicenseDocument, Link, LinkRelation, User};

/// Information about the license being opened, to show to the user.
///
/// This is a borrowed view: every accessor reads the current state of the
/// underlying [`LicenseDocument`], and the view cannot outlive it.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedLicense<'a> {
    document: &'a LicenseDocument,
}

impl<'a> AuthenticatedLicense<'a> {
    /// Creates a view over the given License Document.
    pub fn new(document: &'a LicenseDocument) -> Self {
        Self { document }
    }

    /// A hint to be displayed to the user to help them remember their passphrase.
    pub fn hint(&self) -> &'a str {
        &self.document.encryption.user_key.text_hint
    }

    /// Location where the user can find additional information about their passphrase.
    pub fn hint_link(&self) -> Option<&'a Link> {
        self.document.link(&LinkRelation::Hint)
    }

    /// Support resources for the user (website, email or telephone number).
    pub fn support_links(&self) -> Vec<&'a Link> {
        self.document.links(&LinkRelation::Support)
    }

    /// URI of the license provider.
    pub fn provider(&self) -> &'a str {
        &self.document.provider
    }

    /// Information about the user owning the license.
    pub fn user(&self) -> Option<&'a User> {
        self.document.user.as_ref()
    }

    /// The License Document being opened.
    pub fn document(&self) -> &'a LicenseDocument {
        self.document
    }
}

impl<'a> From<&'a LicenseDocument> for AuthenticatedLicense<'a> {
    fn from(document: &'a LicenseDocument) -> Self {
        Self::new(document)
    }
}
