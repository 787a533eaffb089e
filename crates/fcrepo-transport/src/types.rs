use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::{TransportError, TransportResult};

/// A boxed stream of body chunks.
pub type ByteStream = BoxStream<'static, TransportResult<Bytes>>;

/// Wrap an in-memory buffer as a single-chunk stream.
pub fn stream_from_bytes(data: impl Into<Bytes>) -> ByteStream {
    let data = data.into();
    stream::once(async move { Ok(data) }).boxed()
}

/// Drain a stream into one contiguous buffer.
pub async fn collect_stream(mut stream: ByteStream) -> TransportResult<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.try_next().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// HTTP methods used by the repository protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Head,
    Get,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
pub enum RequestBody {
    Empty,
    Text(String),
    Stream(ByteStream),
}

impl RequestBody {
    /// Drain the body into memory.
    pub async fn into_bytes(self) -> TransportResult<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Text(text) => Ok(Bytes::from(text)),
            Self::Stream(stream) => collect_stream(stream).await,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A single outbound call. Built fresh for every request.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.body = RequestBody::Text(text.into());
        self
    }

    pub fn stream_body(mut self, stream: ByteStream) -> Self {
        self.body = RequestBody::Stream(stream);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Status code plus a lazily consumed body.
pub struct HttpResponse {
    status: u16,
    body: ByteStream,
}

impl HttpResponse {
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// Response without a body (HEAD, 204, scripted statuses).
    pub fn empty(status: u16) -> Self {
        Self::new(status, stream::empty().boxed())
    }

    pub fn with_bytes(status: u16, data: impl Into<Bytes>) -> Self {
        Self::new(status, stream_from_bytes(data))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Consume the body as UTF-8 text.
    pub async fn text(self) -> TransportResult<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| TransportError::Body(e.to_string()))
    }

    pub async fn bytes(self) -> TransportResult<Bytes> {
        collect_stream(self.body).await
    }

    pub fn into_stream(self) -> ByteStream {
        self.body
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!(Method::Head.as_str(), "HEAD");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn request_builder_collects_headers() {
        let req = HttpRequest::new(Method::Put, "http://x/a")
            .header("Content-Type", "text/plain;charset=utf-8")
            .text_body("<xml/>");
        assert_eq!(req.header_value("content-type"), Some("text/plain;charset=utf-8"));
        assert_eq!(req.header_value("Accept"), None);
        assert!(matches!(req.body, RequestBody::Text(ref t) if t == "<xml/>"));
    }

    #[tokio::test]
    async fn collect_multi_chunk_stream() {
        let chunks = vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
        let data = collect_stream(stream::iter(chunks).boxed()).await.unwrap();
        assert_eq!(&data[..], b"abcd");
    }

    #[tokio::test]
    async fn collect_stops_at_first_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"ab")),
            Err(TransportError::Body("broken pipe".into())),
        ];
        let err = collect_stream(stream::iter(chunks).boxed()).await.unwrap_err();
        assert_eq!(err, TransportError::Body("broken pipe".into()));
    }

    #[tokio::test]
    async fn response_text_and_empty() {
        let resp = HttpResponse::with_bytes(200, "hello");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "hello");

        let resp = HttpResponse::empty(204);
        assert!(resp.bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn response_rejects_invalid_utf8() {
        let resp = HttpResponse::with_bytes(200, vec![0xff, 0xfe]);
        assert!(matches!(resp.text().await, Err(TransportError::Body(_))));
    }

    #[tokio::test]
    async fn request_body_into_bytes() {
        assert!(RequestBody::Empty.into_bytes().await.unwrap().is_empty());
        let text = RequestBody::Text("x".into()).into_bytes().await.unwrap();
        assert_eq!(&text[..], b"x");
        let streamed = RequestBody::Stream(stream_from_bytes("yz")).into_bytes().await.unwrap();
        assert_eq!(&streamed[..], b"yz");
    }
}
