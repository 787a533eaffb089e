use fcrepo_transport::TransportError;
use fcrepo_types::{ActionContext, ObjectKind};

use crate::error::{FedoraError, FedoraResult};

const OK: u16 = 200;
const NOT_FOUND: u16 = 404;
const CONFLICT: u16 = 409;

/// How a single response status reads for the operation that received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    NotFound(String),
    Conflict(String),
    Generic { message: String, status: u16 },
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn into_result(self) -> FedoraResult<()> {
        match self {
            Self::Ok => Ok(()),
            Self::NotFound(message) => Err(FedoraError::NotFound(message)),
            Self::Conflict(message) => Err(FedoraError::Conflict(message)),
            Self::Generic { message, status } => Err(FedoraError::Generic { message, status }),
        }
    }
}

/// Interpret `status` as the answer to the primary call of `action`.
///
/// The expected success code of the action yields [`Outcome::Ok`]. A create
/// answered with 409 is a conflict. A read, metadata call or delete answered
/// with 404 is a missing object. Everything else is generic, including a 404
/// on the PUT of an update.
pub fn classify(status: u16, kind: ObjectKind, action: ActionContext, id: &str) -> Outcome {
    ErrorContext::new(kind, action, id).classify(status)
}

/// Result of a HEAD existence probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Existence {
    Exists,
    NotExists,
}

/// The object and operation a message is written about.
#[derive(Clone, Copy, Debug)]
pub struct ErrorContext<'a> {
    kind: ObjectKind,
    action: ActionContext,
    id: &'a str,
}

impl<'a> ErrorContext<'a> {
    pub fn new(kind: ObjectKind, action: ActionContext, id: &'a str) -> Self {
        Self { kind, action, id }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn action(&self) -> ActionContext {
        self.action
    }

    pub fn conflict_message(&self) -> String {
        format!(
            "{} error: {} with id {} already exists in Fedora.",
            self.action.noun(),
            self.kind,
            self.id
        )
    }

    pub fn not_found_message(&self) -> String {
        format!(
            "{} error: {} with id {} does not exist in Fedora.",
            self.action.noun(),
            self.kind,
            self.id
        )
    }

    pub fn generic_message(&self, status: u16) -> String {
        format!(
            "{} error: {} id {} failed due to error {} returned from Fedora.",
            self.action.noun(),
            self.kind,
            self.id,
            status
        )
    }

    pub fn internal_message(&self) -> String {
        format!(
            "{} error: an internal error has been thrown for {} id {}.",
            self.action.noun(),
            self.kind,
            self.id
        )
    }

    pub fn classify(&self, status: u16) -> Outcome {
        if status == self.action.expected_status() {
            return Outcome::Ok;
        }
        match (self.action, status) {
            (ActionContext::Creating, CONFLICT) => Outcome::Conflict(self.conflict_message()),
            (ActionContext::Creating | ActionContext::Updating, _) => self.generic_outcome(status),
            (_, NOT_FOUND) => Outcome::NotFound(self.not_found_message()),
            _ => self.generic_outcome(status),
        }
    }

    /// Interpret the status of a HEAD probe. Only 200 and 404 are answers.
    pub fn existence(&self, status: u16) -> FedoraResult<Existence> {
        match status {
            OK => Ok(Existence::Exists),
            NOT_FOUND => Ok(Existence::NotExists),
            other => Err(self.generic(other)),
        }
    }

    pub fn not_found(&self) -> FedoraError {
        FedoraError::NotFound(self.not_found_message())
    }

    pub fn conflict(&self) -> FedoraError {
        FedoraError::Conflict(self.conflict_message())
    }

    pub fn generic(&self, status: u16) -> FedoraError {
        FedoraError::Generic {
            message: self.generic_message(status),
            status,
        }
    }

    pub fn internal(&self, source: TransportError) -> FedoraError {
        FedoraError::Internal {
            message: self.internal_message(),
            source,
        }
    }

    fn generic_outcome(&self, status: u16) -> Outcome {
        Outcome::Generic {
            message: self.generic_message(status),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_ACTIONS: [ActionContext; 6] = [
        ActionContext::Creating,
        ActionContext::Reading,
        ActionContext::ReadingMetadata,
        ActionContext::Updating,
        ActionContext::UpdatingMetadata,
        ActionContext::Deleting,
    ];

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    #[test]
    fn conflict_message_shape() {
        let ctx = ErrorContext::new(ObjectKind::Record, ActionContext::Creating, "book:001");
        assert_eq!(
            ctx.conflict_message(),
            "Creation error: record with id book:001 already exists in Fedora."
        );
    }

    #[test]
    fn not_found_message_shape() {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::Deleting, "res1");
        assert_eq!(
            ctx.not_found_message(),
            "Deletion error: resource with id res1 does not exist in Fedora."
        );
    }

    #[test]
    fn generic_message_shape() {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::UpdatingMetadata, "r");
        assert_eq!(
            ctx.generic_message(418),
            "Metadata update error: resource id r failed due to error 418 returned from Fedora."
        );
    }

    #[test]
    fn internal_message_shape() {
        let ctx = ErrorContext::new(ObjectKind::Record, ActionContext::Reading, "r1");
        assert_eq!(
            ctx.internal_message(),
            "Read error: an internal error has been thrown for record id r1."
        );
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn expected_status_is_ok() {
        for action in ALL_ACTIONS {
            let status = action.expected_status();
            assert!(classify(status, ObjectKind::Record, action, "x").is_ok());
        }
    }

    #[test]
    fn create_maps_409_to_conflict_and_404_to_generic() {
        let conflict = classify(409, ObjectKind::Record, ActionContext::Creating, "r1");
        assert!(matches!(conflict, Outcome::Conflict(_)));
        let missing = classify(404, ObjectKind::Record, ActionContext::Creating, "r1");
        assert!(matches!(missing, Outcome::Generic { status: 404, .. }));
    }

    #[test]
    fn not_found_for_read_metadata_and_delete_actions() {
        for action in [
            ActionContext::Reading,
            ActionContext::ReadingMetadata,
            ActionContext::UpdatingMetadata,
            ActionContext::Deleting,
        ] {
            let outcome = classify(404, ObjectKind::Resource, action, "r1");
            assert!(matches!(outcome, Outcome::NotFound(_)), "{action:?}");
        }
    }

    #[test]
    fn update_put_404_is_generic() {
        let outcome = classify(404, ObjectKind::Record, ActionContext::Updating, "r1");
        assert!(matches!(outcome, Outcome::Generic { status: 404, .. }));
    }

    #[test]
    fn update_rejects_201() {
        let outcome = classify(201, ObjectKind::Record, ActionContext::Updating, "r1");
        assert!(matches!(outcome, Outcome::Generic { status: 201, .. }));
    }

    #[test]
    fn outcome_into_result() {
        assert!(Outcome::Ok.into_result().is_ok());
        let err = Outcome::Generic {
            message: "m".into(),
            status: 500,
        }
        .into_result()
        .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(Outcome::NotFound("m".into()).into_result().unwrap_err().is_not_found());
        assert!(Outcome::Conflict("m".into()).into_result().unwrap_err().is_conflict());
    }

    #[test]
    fn existence_probe() {
        let ctx = ErrorContext::new(ObjectKind::Record, ActionContext::Updating, "r1");
        assert_eq!(ctx.existence(200).unwrap(), Existence::Exists);
        assert_eq!(ctx.existence(404).unwrap(), Existence::NotExists);
        let err = ctx.existence(503).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            err.to_string(),
            "Update error: record id r1 failed due to error 503 returned from Fedora."
        );
    }

    #[test]
    fn internal_wraps_source() {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::Creating, "b1");
        let err = ctx.internal(TransportError::Timeout("30s".into()));
        match err {
            FedoraError::Internal { message, source } => {
                assert_eq!(
                    message,
                    "Creation error: an internal error has been thrown for resource id b1."
                );
                assert_eq!(source, TransportError::Timeout("30s".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn unexpected_status_is_generic(status in 100u16..600, action_index in 0usize..6) {
            let action = ALL_ACTIONS[action_index];
            prop_assume!(status != action.expected_status());
            prop_assume!(status != 404 && status != 409);
            let outcome = classify(status, ObjectKind::Record, action, "id");
            match outcome {
                Outcome::Generic { message, status: carried } => {
                    prop_assert_eq!(carried, status);
                    prop_assert!(message.starts_with(action.noun()));
                    prop_assert!(message.contains(&status.to_string()));
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
