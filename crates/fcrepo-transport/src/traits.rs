use async_trait::async_trait;

use crate::error::TransportResult;
use crate::types::{HttpRequest, HttpResponse};

/// Sends one request to the repository and yields its status and body.
///
/// Implementations must be thread-safe (`Send + Sync`). Every call to `send`
/// is independent: no per-call state may leak from one request to the next,
/// so a single transport can be shared by any number of adapters.
///
/// A returned `Err` means no status code was obtained (connection refused,
/// body stream failure, timeout). Non-2xx statuses are returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
}
