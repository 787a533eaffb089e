use fcrepo_types::vocab::{PREMIS_HAS_MESSAGE_DIGEST, PREMIS_HAS_SIZE, SHA512_URN_PREFIX};
use fcrepo_types::ResourceMetadata;
use serde_json::{Map, Value};
use thiserror::Error;

/// Turns a JSON-LD description of a binary into [`ResourceMetadata`].
pub trait ResourceMetadataParser: Send + Sync {
    fn parse(&self, json: &str) -> Result<ResourceMetadata, MetadataParseError>;
}

/// A metadata document that could not be turned into [`ResourceMetadata`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Failed to parse resource metadata")]
pub struct MetadataParseError {
    #[source]
    cause: ParseCause,
}

impl MetadataParseError {
    pub fn new(cause: ParseCause) -> Self {
        Self { cause }
    }

    pub fn cause(&self) -> &ParseCause {
        &self.cause
    }
}

/// The specific reason a metadata document was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseCause {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing element: {0}")]
    Missing(String),

    #[error("digest {0:?} is not a urn:sha-512 identifier")]
    BadDigest(String),
}

/// Parser for the JSON-LD served under `fcr:metadata`.
///
/// Reads the first description in the top-level array, takes the size from
/// `premis:hasSize[0].@value` and the checksum from
/// `premis:hasMessageDigest[0].@id`, stripping the `urn:sha-512:` prefix.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLdMetadataParser;

impl ResourceMetadataParser for JsonLdMetadataParser {
    fn parse(&self, json: &str) -> Result<ResourceMetadata, MetadataParseError> {
        parse_description(json).map_err(MetadataParseError::new)
    }
}

fn parse_description(json: &str) -> Result<ResourceMetadata, ParseCause> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| ParseCause::InvalidJson(e.to_string()))?;
    let description = document
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .ok_or_else(|| ParseCause::Missing("[0]".into()))?;

    let file_size = inner_string(description, PREMIS_HAS_SIZE, "@value")?;
    let digest = inner_string(description, PREMIS_HAS_MESSAGE_DIGEST, "@id")?;
    let checksum = digest
        .strip_prefix(SHA512_URN_PREFIX)
        .ok_or_else(|| ParseCause::BadDigest(digest.to_string()))?;

    Ok(ResourceMetadata::new(file_size, checksum))
}

fn inner_string<'a>(
    description: &'a Map<String, Value>,
    predicate: &str,
    key: &str,
) -> Result<&'a str, ParseCause> {
    description
        .get(predicate)
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .ok_or_else(|| ParseCause::Missing(format!("[0].{predicate}[0].{key}")))
}
