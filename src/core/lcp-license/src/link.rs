//! License links.

use serde::{Deserialize, Serialize};

/// Relation of a link inside a License Document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkRelation {
    /// Page helping the user remember their passphrase.
    Hint,
    /// Support resource (website, email or telephone number).
    Support,
    /// The protected publication.
    Publication,
    /// The License Status Document.
    Status,
    /// The license itself.
    SelfLink,
    /// Any relation not known to this crate.
    Other(String),
}

impl LinkRelation {
    /// Returns the relation name as it appears in a License Document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hint => "hint",
            Self::Support => "support",
            Self::Publication => "publication",
            Self::Status => "status",
            Self::SelfLink => "self",
            Self::Other(rel) => rel,
        }
    }
}

impl From<&str> for LinkRelation {
    fn from(rel: &str) -> Self {
        match rel {
            "hint" => Self::Hint,
            "support" => Self::Support,
            "publication" => Self::Publication,
            "status" => Self::Status,
            "self" => Self::SelfLink,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LinkRelation {
    fn from(rel: String) -> Self {
        Self::from(rel.as_str())
    }
}

impl From<LinkRelation> for String {
    fn from(rel: LinkRelation) -> Self {
        rel.as_str().to_string()
    }
}

impl std::fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link to an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URI (may be `mailto:` or `tel:` for support links).
    pub href: String,

    /// Relations of this link.
    #[serde(rename = "rel")]
    pub rels: Vec<LinkRelation>,

    /// Expected media type of the target.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Creates a link with a single relation.
    pub fn new(href: impl Into<String>, rel: LinkRelation) -> Self {
        Self {
            href: href.into(),
            rels: vec![rel],
            media_type: None,
            title: None,
        }
    }

    /// Sets the media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Checks if this link carries the given relation.
    pub fn has_rel(&self, rel: &LinkRelation) -> bool {
        self.rels.iter().any(|r| r == rel)
    }
}
