//! License Document.

use serde::{Deserialize, Serialize};

use crate::{Link, LinkRelation, User};

/// Default LCP encryption profile.
pub const BASIC_PROFILE: &str = "http://readium.org/lcp/basic-profile";

/// User key metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKey {
    /// Hint displayed to the user to help them remember their passphrase.
    pub text_hint: String,
}

/// Encryption metadata of a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encryption {
    /// Encryption profile URI.
    pub profile: String,
    /// User key metadata.
    pub user_key: UserKey,
}

impl Default for Encryption {
    fn default() -> Self {
        Self {
            profile: BASIC_PROFILE.to_string(),
            user_key: UserKey::default(),
        }
    }
}

/// An LCP License Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDocument {
    /// License identifier.
    pub id: String,
    /// URI of the license provider.
    pub provider: String,
    /// Encryption metadata.
    pub encryption: Encryption,
    /// Links, in document order.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Owner of the license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl LicenseDocument {
    /// Starts building a license for the given identifier and provider.
    pub fn builder(id: impl Into<String>, provider: impl Into<String>) -> LicenseDocumentBuilder {
        LicenseDocumentBuilder {
            document: Self {
                id: id.into(),
                provider: provider.into(),
                encryption: Encryption::default(),
                links: Vec::new(),
                user: None,
            },
        }
    }

    /// Returns the first link carrying the given relation.
    pub fn link(&self, rel: &LinkRelation) -> Option<&Link> {
        self.links.iter().find(|link| link.has_rel(rel))
    }

    /// Returns all links carrying the given relation, in document order.
    pub fn links(&self, rel: &LinkRelation) -> Vec<&Link> {
        self.links.iter().filter(|link| link.has_rel(rel)).collect()
    }

    /// Appends a link.
    pub fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Replaces the user information.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Replaces the passphrase hint.
    pub fn set_text_hint(&mut self, hint: impl Into<String>) {
        self.encryption.user_key.text_hint = hint.into();
    }
}

/// Builder for [`LicenseDocument`].
#[derive(Debug, Clone)]
pub struct LicenseDocumentBuilder {
    document: LicenseDocument,
}

impl LicenseDocumentBuilder {
    /// Sets the encryption profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.document.encryption.profile = profile.into();
        self
    }

    /// Sets the passphrase hint.
    pub fn text_hint(mut self, hint: impl Into<String>) -> Self {
        self.document.set_text_hint(hint);
        self
    }

    /// Adds a link.
    pub fn link(mut self, link: Link) -> Self {
        self.document.push_link(link);
        self
    }

    /// Sets the user.
    pub fn user(mut self, user: User) -> Self {
        self.document.user = Some(user);
        self
    }

    /// Finishes the document.
    pub fn build(self) -> LicenseDocument {
        self.document
    }
}
