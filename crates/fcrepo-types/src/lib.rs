//! Foundation types for the fcrepo adapter.
//!
//! This crate provides the value types shared by the transport, the adapter
//! and the CLI. It performs no I/O.
//!
//! # Key Types
//!
//! - [`ObjectKind`] -- Record or Resource; selects path segment and wording
//! - [`ActionContext`] -- The operation being performed, used in error messages
//! - [`RepositoryPath`] -- Canonical URL of an object plus its tombstone and metadata variants
//! - [`ResourceMetadata`] -- File size and SHA-512 checksum reported by the repository
//! - [`ResourceMetadataToUpdate`] -- Original file name and mime type to store on a resource
//!
//! The [`vocab`] module holds the RDF IRIs shared by the metadata parser and
//! the in-memory repository.

pub mod error;
pub mod kind;
pub mod metadata;
pub mod path;
pub mod vocab;

pub use error::TypeError;
pub use kind::{ActionContext, ObjectKind, TEXT_PLAIN_UTF_8};
pub use metadata::{ResourceMetadata, ResourceMetadataToUpdate};
pub use path::{RepositoryPath, METADATA_SUFFIX, TOMBSTONE_SUFFIX};
