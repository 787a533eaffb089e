//! HTTP transport seam for the fcrepo adapter.
//!
//! The adapter never talks to a network client directly. It builds an
//! [`HttpRequest`] per call and hands it to an [`HttpTransport`], which yields
//! an [`HttpResponse`] (status plus lazily consumed body) or a
//! [`TransportError`] when no status could be obtained.
//!
//! # Transports
//!
//! - [`ReqwestTransport`] -- production client over `reqwest`
//! - [`InMemoryRepository`] -- in-process Fedora/LDP emulation for tests and embedding
//!
//! # Design Rules
//!
//! 1. A transport is shared and `Send + Sync`; each `send` builds fresh per-call state.
//! 2. Non-2xx statuses are data, not errors. Only failures that prevent a status are `Err`.
//! 3. Transports never retry. Timeouts, if any, are the transport's own configuration.

pub mod error;
pub mod http_client;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{TransportError, TransportResult};
pub use http_client::{ReqwestTransport, TransportConfig};
pub use memory::{InMemoryRepository, RecordedRequest, ScriptedResponse};
pub use traits::HttpTransport;
pub use types::{
    collect_stream, stream_from_bytes, ByteStream, HttpRequest, HttpResponse, Method, RequestBody,
};
