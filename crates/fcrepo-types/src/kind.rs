use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of object kept in the repository.
///
/// The kind decides the path segment an object lives under, the default
/// content negotiation, and the noun used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Structured text payload, typically XML.
    Record,
    /// Opaque binary payload with a caller-declared mime type.
    Resource,
}

impl ObjectKind {
    /// Path segment (without slashes) under the container.
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Resource => "resource",
        }
    }

    /// Accept header used when reading the payload back.
    pub fn accept(&self) -> &'static str {
        match self {
            Self::Record => TEXT_PLAIN_UTF_8,
            Self::Resource => "application/octet-stream",
        }
    }
}

/// Content type used for record bodies.
pub const TEXT_PLAIN_UTF_8: &str = "text/plain;charset=utf-8";

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// The operation an error occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionContext {
    Creating,
    Reading,
    ReadingMetadata,
    Updating,
    UpdatingMetadata,
    Deleting,
}

impl ActionContext {
    /// Noun used as the prefix of user-facing error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Creating => "Creation",
            Self::Reading => "Read",
            Self::ReadingMetadata => "Metadata read",
            Self::Updating => "Update",
            Self::UpdatingMetadata => "Metadata update",
            Self::Deleting => "Deletion",
        }
    }

    /// Status code the primary call of this action answers with on success.
    pub fn expected_status(&self) -> u16 {
        match self {
            Self::Creating => 201,
            Self::Reading | Self::ReadingMetadata => 200,
            Self::Updating | Self::UpdatingMetadata | Self::Deleting => 204,
        }
    }
}

impl fmt::Display for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
