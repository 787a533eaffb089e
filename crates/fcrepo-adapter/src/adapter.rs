use std::sync::Arc;

use async_trait::async_trait;
use fcrepo_transport::{ByteStream, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody};
use fcrepo_types::vocab::{LD_JSON, SPARQL_UPDATE};
use fcrepo_types::{
    ActionContext, ObjectKind, RepositoryPath, ResourceMetadata, ResourceMetadataToUpdate,
    TEXT_PLAIN_UTF_8,
};

use crate::error::FedoraResult;
use crate::metadata::{JsonLdMetadataParser, ResourceMetadataParser};
use crate::sparql::sparql_update_body;
use crate::status::{ErrorContext, Existence};
use crate::traits::RepositoryAdapter;

/// HTTP implementation of [`RepositoryAdapter`].
///
/// Holds only immutable configuration: the base URL and the shared transport
/// and parser. Cloning is cheap and clones may be used from any task.
///
/// Create and update probe the object with HEAD before sending the PUT.
/// Delete removes the object, then purges the tombstone it leaves behind.
#[derive(Clone)]
pub struct FedoraAdapter {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    parser: Arc<dyn ResourceMetadataParser>,
}

impl FedoraAdapter {
    /// `base_url` is used verbatim as the path prefix and should end with `/`.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        parser: Arc<dyn ResourceMetadataParser>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            parser,
        }
    }

    /// Adapter using the JSON-LD metadata parser.
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(base_url, transport, Arc::new(JsonLdMetadataParser))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn path(&self, container: &str, kind: ObjectKind, id: &str) -> RepositoryPath {
        RepositoryPath::new(&self.base_url, container, kind, id)
    }

    async fn call(
        &self,
        request: HttpRequest,
        ctx: &ErrorContext<'_>,
    ) -> FedoraResult<HttpResponse> {
        self.transport
            .send(request)
            .await
            .map_err(|err| ctx.internal(err))
    }

    async fn exists(
        &self,
        path: &RepositoryPath,
        ctx: &ErrorContext<'_>,
    ) -> FedoraResult<Existence> {
        let response = self.call(HttpRequest::new(Method::Head, path.as_str()), ctx).await?;
        ctx.existence(response.status())
    }

    async fn put(
        &self,
        path: &RepositoryPath,
        content_type: &str,
        body: RequestBody,
        ctx: &ErrorContext<'_>,
    ) -> FedoraResult<()> {
        let mut request =
            HttpRequest::new(Method::Put, path.as_str()).header("Content-Type", content_type);
        request.body = body;
        let response = self.call(request, ctx).await?;
        ctx.classify(response.status()).into_result()
    }

    async fn create(
        &self,
        container: &str,
        id: &str,
        kind: ObjectKind,
        content_type: &str,
        body: RequestBody,
    ) -> FedoraResult<()> {
        let ctx = ErrorContext::new(kind, ActionContext::Creating, id);
        let path = self.path(container, kind, id);
        if self.exists(&path, &ctx).await? == Existence::Exists {
            return Err(ctx.conflict());
        }
        self.put(&path, content_type, body, &ctx).await
    }

    async fn update(
        &self,
        container: &str,
        id: &str,
        kind: ObjectKind,
        content_type: &str,
        body: RequestBody,
    ) -> FedoraResult<()> {
        let ctx = ErrorContext::new(kind, ActionContext::Updating, id);
        let path = self.path(container, kind, id);
        if self.exists(&path, &ctx).await? == Existence::NotExists {
            return Err(ctx.not_found());
        }
        self.put(&path, content_type, body, &ctx).await
    }

    async fn get(
        &self,
        url: &str,
        accept: &str,
        ctx: &ErrorContext<'_>,
    ) -> FedoraResult<HttpResponse> {
        let request = HttpRequest::new(Method::Get, url).header("Accept", accept);
        let response = self.call(request, ctx).await?;
        ctx.classify(response.status()).into_result()?;
        Ok(response)
    }

    async fn delete_at(&self, url: &str, ctx: &ErrorContext<'_>) -> FedoraResult<()> {
        let response = self.call(HttpRequest::new(Method::Delete, url), ctx).await?;
        ctx.classify(response.status()).into_result()
    }

    async fn delete(&self, container: &str, id: &str, kind: ObjectKind) -> FedoraResult<()> {
        let ctx = ErrorContext::new(kind, ActionContext::Deleting, id);
        let path = self.path(container, kind, id);
        self.delete_at(path.as_str(), &ctx).await?;
        self.delete_at(&path.tombstone(), &ctx).await
    }
}

#[async_trait]
impl RepositoryAdapter for FedoraAdapter {
    async fn create_record(&self, container: &str, id: &str, record: &str) -> FedoraResult<()> {
        let body = RequestBody::Text(record.to_string());
        self.create(container, id, ObjectKind::Record, TEXT_PLAIN_UTF_8, body)
            .await
    }

    async fn read_record(&self, container: &str, id: &str) -> FedoraResult<String> {
        let ctx = ErrorContext::new(ObjectKind::Record, ActionContext::Reading, id);
        let path = self.path(container, ObjectKind::Record, id);
        let response = self.get(path.as_str(), ObjectKind::Record.accept(), &ctx).await?;
        response.text().await.map_err(|err| ctx.internal(err))
    }

    async fn update_record(&self, container: &str, id: &str, record: &str) -> FedoraResult<()> {
        let body = RequestBody::Text(record.to_string());
        self.update(container, id, ObjectKind::Record, TEXT_PLAIN_UTF_8, body)
            .await
    }

    async fn delete_record(&self, container: &str, id: &str) -> FedoraResult<()> {
        self.delete(container, id, ObjectKind::Record).await
    }

    async fn create_resource(
        &self,
        container: &str,
        id: &str,
        resource: ByteStream,
        mime_type: &str,
    ) -> FedoraResult<()> {
        let body = RequestBody::Stream(resource);
        self.create(container, id, ObjectKind::Resource, mime_type, body)
            .await
    }

    async fn read_resource(&self, container: &str, id: &str) -> FedoraResult<ByteStream> {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::Reading, id);
        let path = self.path(container, ObjectKind::Resource, id);
        let response = self.get(path.as_str(), ObjectKind::Resource.accept(), &ctx).await?;
        Ok(response.into_stream())
    }

    async fn update_resource(
        &self,
        container: &str,
        id: &str,
        resource: ByteStream,
        mime_type: &str,
    ) -> FedoraResult<()> {
        let body = RequestBody::Stream(resource);
        self.update(container, id, ObjectKind::Resource, mime_type, body)
            .await
    }

    async fn delete_resource(&self, container: &str, id: &str) -> FedoraResult<()> {
        self.delete(container, id, ObjectKind::Resource).await
    }

    async fn read_resource_metadata(
        &self,
        container: &str,
        id: &str,
    ) -> FedoraResult<ResourceMetadata> {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::ReadingMetadata, id);
        let path = self.path(container, ObjectKind::Resource, id);
        let response = self.get(&path.metadata(), LD_JSON, &ctx).await?;
        let json = response.text().await.map_err(|err| ctx.internal(err))?;
        Ok(self.parser.parse(&json)?)
    }

    async fn update_resource_metadata(
        &self,
        container: &str,
        id: &str,
        metadata: &ResourceMetadataToUpdate,
    ) -> FedoraResult<()> {
        let ctx = ErrorContext::new(ObjectKind::Resource, ActionContext::UpdatingMetadata, id);
        let path = self.path(container, ObjectKind::Resource, id);
        let request = HttpRequest::new(Method::Patch, path.metadata())
            .header("Content-Type", SPARQL_UPDATE)
            .text_body(sparql_update_body(metadata));
        let response = self.call(request, &ctx).await?;
        ctx.classify(response.status()).into_result()
    }
}

impl std::fmt::Debug for FedoraAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedoraAdapter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
