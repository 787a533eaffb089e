use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TransportError, TransportResult};
use crate::traits::HttpTransport;
use crate::types::{HttpRequest, HttpResponse, Method, RequestBody};

/// Settings for [`ReqwestTransport`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("fcrepo/", env!("CARGO_PKG_VERSION")).into(),
            request_timeout_secs: None,
        }
    }
}

/// Production transport backed by a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> TransportResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// Use an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Head => reqwest::Method::HEAD,
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(to_reqwest_method(method), url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Stream(stream) => builder.body(reqwest::Body::wrap_stream(stream)),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = TransportError::from(err);
                warn!(%method, %url, error = %err, "request failed");
                return Err(err);
            }
        };
        let status = response.status().as_u16();
        debug!(%method, %url, status, "received response");

        let stream = response.bytes_stream().map_err(TransportError::from).boxed();
        Ok(HttpResponse::new(status, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stream_from_bytes;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method as AxumMethod, StatusCode};
    use axum::Router;

    async fn echo(method: AxumMethod, headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let status = match method.as_str() {
            "PUT" => StatusCode::CREATED,
            "DELETE" => StatusCode::NO_CONTENT,
            "HEAD" => StatusCode::NOT_FOUND,
            _ => StatusCode::OK,
        };
        let reply = format!(
            "{} {} {}",
            method,
            content_type,
            String::from_utf8_lossy(&body)
        );
        (status, reply)
    }

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(echo);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/fcrepo/rest/")
    }

    #[test]
    fn default_config() {
        let c = TransportConfig::default();
        assert!(c.user_agent.starts_with("fcrepo/"));
        assert!(c.request_timeout_secs.is_none());
    }

    #[test]
    fn method_mapping() {
        assert_eq!(to_reqwest_method(Method::Head), reqwest::Method::HEAD);
        assert_eq!(to_reqwest_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest_method(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn builds_with_timeout() {
        let config = TransportConfig {
            request_timeout_secs: Some(5),
            ..TransportConfig::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn put_text_body() {
        let base = spawn_server().await;
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let request = HttpRequest::new(Method::Put, format!("{base}div/record/r1"))
            .header("Content-Type", "text/plain;charset=utf-8")
            .text_body("<a/>");
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.text().await.unwrap(), "PUT text/plain;charset=utf-8 <a/>");
    }

    #[tokio::test]
    async fn put_streamed_body() {
        let base = spawn_server().await;
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let request = HttpRequest::new(Method::Put, format!("{base}div/resource/b1"))
            .header("Content-Type", "image/jpeg")
            .stream_body(stream_from_bytes(&b"jpegdata"[..]));
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.text().await.unwrap(), "PUT image/jpeg jpegdata");
    }

    #[tokio::test]
    async fn head_and_delete_statuses() {
        let base = spawn_server().await;
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let head = transport
            .send(HttpRequest::new(Method::Head, format!("{base}x")))
            .await
            .unwrap();
        assert_eq!(head.status(), 404);
        let delete = transport
            .send(HttpRequest::new(Method::Delete, format!("{base}x")))
            .await
            .unwrap();
        assert_eq!(delete.status(), 204);
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let err = transport
            .send(HttpRequest::new(Method::Head, format!("http://{addr}/")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let err = transport
            .send(HttpRequest::new(Method::Get, "not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)), "got {err:?}");
    }
}
