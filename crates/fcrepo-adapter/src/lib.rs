//! Record and resource lifecycle adapter for a Fedora/LDP repository.
//!
//! Maps create, read, update and delete of two object kinds onto the
//! repository's HTTP protocol:
//!
//! - **records** -- text payloads stored under `{base}{container}/record/{id}`
//! - **resources** -- binaries stored under `{base}{container}/resource/{id}`,
//!   with technical metadata under `.../fcr:metadata`
//!
//! # Protocol
//!
//! 1. Create and update probe the object with HEAD first. Create requires the
//!    object to be absent, update requires it to be present.
//! 2. Delete is two-phase: DELETE the object, then DELETE its `fcr:tombstone`.
//!    A failing purge is reported and nothing is rolled back.
//! 3. Metadata is read as JSON-LD and written with a SPARQL update.
//! 4. Every status is interpreted per operation into a [`FedoraError`]:
//!    `NotFound`, `Conflict`, `Generic` (carrying the status) or `Internal`
//!    (wrapping the transport failure).
//!
//! The adapter never retries and does no logging of its own.

pub mod adapter;
pub mod config;
pub mod error;
pub mod factory;
pub mod metadata;
pub mod sparql;
pub mod status;
pub mod traits;

pub use adapter::FedoraAdapter;
pub use config::{FedoraConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{FedoraError, FedoraResult};
pub use factory::FedoraFactory;
pub use metadata::{JsonLdMetadataParser, MetadataParseError, ParseCause, ResourceMetadataParser};
pub use sparql::sparql_update_body;
pub use status::{classify, ErrorContext, Existence, Outcome};
pub use traits::RepositoryAdapter;

// Re-export the types that appear in the adapter API.
pub use fcrepo_transport::{ByteStream, TransportConfig, TransportError};
pub use fcrepo_types::{ActionContext, ObjectKind, ResourceMetadata, ResourceMetadataToUpdate};
