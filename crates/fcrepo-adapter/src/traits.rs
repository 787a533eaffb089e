use async_trait::async_trait;
use fcrepo_transport::ByteStream;
use fcrepo_types::{ResourceMetadata, ResourceMetadataToUpdate};

use crate::error::FedoraResult;

/// Lifecycle operations on records and resources kept in a repository.
///
/// Objects are addressed by a container (the data divider) and an id. Every
/// failure is returned as a [`FedoraError`](crate::FedoraError); nothing is
/// retried and partial multi-step operations are not rolled back.
#[async_trait]
pub trait RepositoryAdapter: Send + Sync {
    // ---- Records ----

    /// Store a new record. Fails with `Conflict` if the id is taken.
    async fn create_record(&self, container: &str, id: &str, record: &str) -> FedoraResult<()>;

    async fn read_record(&self, container: &str, id: &str) -> FedoraResult<String>;

    /// Replace an existing record. Fails with `NotFound` if there is none.
    async fn update_record(&self, container: &str, id: &str, record: &str) -> FedoraResult<()>;

    /// Delete a record and purge its tombstone.
    async fn delete_record(&self, container: &str, id: &str) -> FedoraResult<()>;

    // ---- Resources ----

    async fn create_resource(
        &self,
        container: &str,
        id: &str,
        resource: ByteStream,
        mime_type: &str,
    ) -> FedoraResult<()>;

    /// Open the stored binary. Errors while draining the stream surface as
    /// transport errors from the stream itself.
    async fn read_resource(&self, container: &str, id: &str) -> FedoraResult<ByteStream>;

    async fn update_resource(
        &self,
        container: &str,
        id: &str,
        resource: ByteStream,
        mime_type: &str,
    ) -> FedoraResult<()>;

    async fn delete_resource(&self, container: &str, id: &str) -> FedoraResult<()>;

    async fn read_resource_metadata(
        &self,
        container: &str,
        id: &str,
    ) -> FedoraResult<ResourceMetadata>;

    /// Store the original file name and mime type on a binary.
    async fn update_resource_metadata(
        &self,
        container: &str,
        id: &str,
        metadata: &ResourceMetadataToUpdate,
    ) -> FedoraResult<()>;
}
