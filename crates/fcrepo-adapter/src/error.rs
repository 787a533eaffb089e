use fcrepo_transport::TransportError;
use thiserror::Error;

use crate::metadata::MetadataParseError;

/// Errors raised by repository operations.
///
/// The first four variants make up the protocol taxonomy. Every message is
/// fully formatted, so `Display` alone is enough to report the failure.
#[derive(Debug, Error)]
pub enum FedoraError {
    /// The object is absent where presence was required.
    #[error("{0}")]
    NotFound(String),

    /// The object already exists where absence was required.
    #[error("{0}")]
    Conflict(String),

    /// The repository answered with an unexpected status.
    #[error("{message}")]
    Generic { message: String, status: u16 },

    /// The transport failed before a status code was obtained.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: TransportError,
    },

    /// The metadata description could not be parsed.
    #[error(transparent)]
    Metadata(#[from] MetadataParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl FedoraError {
    /// Status code behind a [`FedoraError::Generic`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Generic { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

pub type FedoraResult<T> = Result<T, FedoraError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = FedoraError::Generic {
            message: "Read error: record id r1 failed due to error 500 returned from Fedora."
                .into(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "Read error: record id r1 failed due to error 500 returned from Fedora."
        );
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn internal_keeps_cause() {
        let cause = TransportError::Connect("refused".into());
        let err = FedoraError::Internal {
            message: "boom".into(),
            source: cause.clone(),
        };
        let source = err.source().unwrap().downcast_ref::<TransportError>().unwrap();
        assert_eq!(source, &cause);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn predicates() {
        assert!(FedoraError::NotFound("x".into()).is_not_found());
        assert!(FedoraError::Conflict("x".into()).is_conflict());
        assert!(!FedoraError::Config("x".into()).is_not_found());
    }
}
