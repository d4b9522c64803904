//! # LCP License
//!
//! In-memory model of an LCP License Document.
//!
//! This crate only holds the data a reading system needs once a license has
//! been obtained and validated:
//! - Encryption metadata (profile, user key hint)
//! - Links (hint page, support contacts, publication, status)
//! - Provider and user information
//!
//! Documents are built programmatically with [`LicenseDocument::builder`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod link;
pub mod user;

pub use document::{Encryption, LicenseDocument, LicenseDocumentBuilder, UserKey};
pub use link::{Link, LinkRelation};
pub use user::User;
