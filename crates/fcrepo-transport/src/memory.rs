use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use fcrepo_types::vocab::{
    EBUCORE_FILENAME, EBUCORE_HAS_MIME_TYPE, PREMIS_HAS_MESSAGE_DIGEST, PREMIS_HAS_SIZE,
    SHA512_URN_PREFIX, SPARQL_UPDATE, XSD_LONG,
};
use fcrepo_types::{METADATA_SUFFIX, TOMBSTONE_SUFFIX};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha512};
use tracing::debug;

use crate::error::{TransportError, TransportResult};
use crate::traits::HttpTransport;
use crate::types::{find_header, HttpRequest, HttpResponse, Method};

const OK: u16 = 200;
const CREATED: u16 = 201;
const NO_CONTENT: u16 = 204;
const NOT_FOUND: u16 = 404;
const METHOD_NOT_ALLOWED: u16 = 405;
const GONE: u16 = 410;
const UNSUPPORTED_MEDIA_TYPE: u16 = 415;

/// A request as the repository received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A canned reply consumed before normal request handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedResponse {
    /// Answer with this status and an empty body.
    Status(u16),
    /// Answer with this status and body.
    Body(u16, Bytes),
    /// Fail the call as if the transport broke.
    Fail(TransportError),
}

#[derive(Clone, Debug)]
struct StoredObject {
    content_type: String,
    data: Bytes,
    file_name: Option<String>,
    declared_mime_type: Option<String>,
}

#[derive(Clone, Debug)]
enum Slot {
    Live(StoredObject),
    Tombstone,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Slot>,
    requests: Vec<RecordedRequest>,
    script: VecDeque<ScriptedResponse>,
}

/// In-process emulation of a Fedora/LDP repository.
///
/// Intended for tests and embedding. Objects are keyed by their full URL.
/// Deleting an object leaves a tombstone that answers `410 Gone` until it is
/// purged through `DELETE {url}/fcr:tombstone`. Binaries expose a JSON-LD
/// description under `{url}/fcr:metadata` that accepts SPARQL-update patches.
///
/// Every request is recorded in arrival order, and scripted responses can be
/// queued to simulate failures. A request whose body stream fails does not
/// take a scripted response.
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("lock poisoned")
    }

    /// Queue a reply for the next unscripted request.
    pub fn push_response(&self, response: ScriptedResponse) {
        self.state().script.push_back(response);
    }

    /// Store an object directly, bypassing the request log.
    pub fn insert(
        &self,
        url: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) {
        let object = StoredObject {
            content_type: content_type.into(),
            data: data.into(),
            file_name: None,
            declared_mime_type: None,
        };
        self.state().objects.insert(url.into(), Slot::Live(object));
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Returns `true` if a live object is stored at `url`.
    pub fn contains(&self, url: &str) -> bool {
        matches!(self.state().objects.get(url), Some(Slot::Live(_)))
    }

    /// Returns `true` if `url` was deleted but not yet purged.
    pub fn is_tombstoned(&self, url: &str) -> bool {
        matches!(self.state().objects.get(url), Some(Slot::Tombstone))
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.state()
            .objects
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored bytes of the live object at `url`.
    pub fn data(&self, url: &str) -> Option<Bytes> {
        match self.state().objects.get(url) {
            Some(Slot::Live(object)) => Some(object.data.clone()),
            _ => None,
        }
    }

    fn record(&self, request: RecordedRequest) {
        self.state().requests.push(request);
    }

    fn handle(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: Bytes,
    ) -> HttpResponse {
        if let Some(target) = url.strip_suffix(TOMBSTONE_SUFFIX) {
            return match method {
                Method::Delete => self.purge(target),
                _ => HttpResponse::empty(METHOD_NOT_ALLOWED),
            };
        }
        if let Some(target) = url.strip_suffix(METADATA_SUFFIX) {
            return match method {
                Method::Get => self.describe(target),
                Method::Head => HttpResponse::empty(self.presence_status(target)),
                Method::Patch => self.patch_metadata(target, headers, &body),
                _ => HttpResponse::empty(METHOD_NOT_ALLOWED),
            };
        }
        match method {
            Method::Head => HttpResponse::empty(self.presence_status(url)),
            Method::Get => self.get(url),
            Method::Put => self.put(url, headers, body),
            Method::Delete => self.delete(url),
            Method::Patch => HttpResponse::empty(METHOD_NOT_ALLOWED),
        }
    }

    fn presence_status(&self, url: &str) -> u16 {
        match self.state().objects.get(url) {
            Some(Slot::Live(_)) => OK,
            Some(Slot::Tombstone) => GONE,
            None => NOT_FOUND,
        }
    }

    fn get(&self, url: &str) -> HttpResponse {
        match self.state().objects.get(url) {
            Some(Slot::Live(object)) => HttpResponse::with_bytes(OK, object.data.clone()),
            Some(Slot::Tombstone) => HttpResponse::empty(GONE),
            None => HttpResponse::empty(NOT_FOUND),
        }
    }

    fn put(&self, url: &str, headers: &[(String, String)], body: Bytes) -> HttpResponse {
        let content_type = find_header(headers, "content-type")
            .unwrap_or("application/octet-stream")
            .to_string();
        let mut state = self.state();
        match state.objects.get_mut(url) {
            Some(Slot::Tombstone) => HttpResponse::empty(GONE),
            Some(Slot::Live(object)) => {
                object.content_type = content_type;
                object.data = body;
                HttpResponse::empty(NO_CONTENT)
            }
            None => {
                let object = StoredObject {
                    content_type,
                    data: body,
                    file_name: None,
                    declared_mime_type: None,
                };
                state.objects.insert(url.to_string(), Slot::Live(object));
                HttpResponse::empty(CREATED)
            }
        }
    }

    fn delete(&self, url: &str) -> HttpResponse {
        let mut state = self.state();
        match state.objects.get(url) {
            Some(Slot::Live(_)) => {
                state.objects.insert(url.to_string(), Slot::Tombstone);
                debug!(%url, "object tombstoned");
                HttpResponse::empty(NO_CONTENT)
            }
            Some(Slot::Tombstone) => HttpResponse::empty(GONE),
            None => HttpResponse::empty(NOT_FOUND),
        }
    }

    fn purge(&self, url: &str) -> HttpResponse {
        let mut state = self.state();
        match state.objects.get(url) {
            Some(Slot::Tombstone) => {
                state.objects.remove(url);
                debug!(%url, "tombstone purged");
                HttpResponse::empty(NO_CONTENT)
            }
            _ => HttpResponse::empty(NOT_FOUND),
        }
    }

    fn describe(&self, url: &str) -> HttpResponse {
        let object = match self.state().objects.get(url) {
            Some(Slot::Live(object)) => object.clone(),
            Some(Slot::Tombstone) => return HttpResponse::empty(GONE),
            None => return HttpResponse::empty(NOT_FOUND),
        };
        let digest = hex::encode(Sha512::digest(&object.data));
        let mime_type = object
            .declared_mime_type
            .clone()
            .unwrap_or(object.content_type.clone());

        let mut description = Map::new();
        description.insert("@id".into(), json!(url));
        description.insert(EBUCORE_HAS_MIME_TYPE.into(), json!([{ "@value": mime_type }]));
        if let Some(name) = &object.file_name {
            description.insert(EBUCORE_FILENAME.into(), json!([{ "@value": name }]));
        }
        description.insert(
            PREMIS_HAS_MESSAGE_DIGEST.into(),
            json!([{ "@id": format!("{SHA512_URN_PREFIX}{digest}") }]),
        );
        description.insert(
            PREMIS_HAS_SIZE.into(),
            json!([{ "@type": XSD_LONG, "@value": object.data.len().to_string() }]),
        );
        let document = Value::Array(vec![Value::Object(description)]);
        HttpResponse::with_bytes(OK, document.to_string())
    }

    fn patch_metadata(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> HttpResponse {
        if find_header(headers, "content-type") != Some(SPARQL_UPDATE) {
            return HttpResponse::empty(UNSUPPORTED_MEDIA_TYPE);
        }
        let update = String::from_utf8_lossy(body);
        let mut state = self.state();
        match state.objects.get_mut(url) {
            Some(Slot::Live(object)) => {
                if let Some(name) = sparql_literal(&update, "ebucore:filename") {
                    object.file_name = Some(name);
                }
                if let Some(mime) = sparql_literal(&update, "ebucore:hasMimeType") {
                    object.declared_mime_type = Some(mime);
                }
                HttpResponse::empty(NO_CONTENT)
            }
            Some(Slot::Tombstone) => HttpResponse::empty(GONE),
            None => HttpResponse::empty(NOT_FOUND),
        }
    }
}

/// Value of the first string literal following `predicate` in a SPARQL update.
fn sparql_literal(update: &str, predicate: &str) -> Option<String> {
    let start = update.find(predicate)? + predicate.len();
    let rest = &update[start..];
    let open = rest.find('"')?;
    let mut value = String::new();
    let mut chars = rest[open + 1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            '"' => return Some(value),
            other => value.push(other),
        }
    }
    None
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("InMemoryRepository")
            .field("object_count", &state.objects.len())
            .field("request_count", &state.requests.len())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for InMemoryRepository {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let body = match body.into_bytes().await {
            Ok(body) => body,
            Err(err) => {
                self.record(RecordedRequest {
                    method,
                    url,
                    headers,
                    body: Bytes::new(),
                });
                return Err(err);
            }
        };
        self.record(RecordedRequest {
            method,
            url: url.clone(),
            headers: headers.clone(),
            body: body.clone(),
        });

        let scripted = self.state().script.pop_front();
        match scripted {
            Some(ScriptedResponse::Fail(err)) => Err(err),
            Some(ScriptedResponse::Status(status)) => Ok(HttpResponse::empty(status)),
            Some(ScriptedResponse::Body(status, data)) => {
                Ok(HttpResponse::with_bytes(status, data))
            }
            None => Ok(self.handle(method, &url, &headers, body)),
        }
    }
}
