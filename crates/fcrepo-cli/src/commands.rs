use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use colored::Colorize;
use fcrepo_adapter::{
    ByteStream, FedoraConfig, FedoraFactory, RepositoryAdapter, ResourceMetadata,
    ResourceMetadataToUpdate,
};
use fcrepo_transport::TransportError;
use futures::{StreamExt, TryStreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::cli::*;

const CHUNK_SIZE: usize = 64 * 1024;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.base_url.as_deref())?;
    let factory = FedoraFactory::new(config).context("invalid repository configuration")?;
    info!(base_url = factory.base_url(), "using repository");
    let adapter = factory.factor_adapter();

    match cli.command {
        Command::Record(args) => cmd_record(&adapter, args.action).await,
        Command::Resource(args) => cmd_resource(&adapter, args.action, cli.format).await,
    }
}

/// Config file (or defaults), then `FCREPO_BASE_URL`, then `--base-url`.
fn load_config(path: Option<&Path>, base_url: Option<&str>) -> anyhow::Result<FedoraConfig> {
    let config = match path {
        Some(path) => FedoraConfig::load(path)?,
        None => FedoraConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(base_url) = base_url {
        config.base_url = base_url.to_string();
    }
    Ok(config)
}

async fn cmd_record(adapter: &dyn RepositoryAdapter, action: RecordAction) -> anyhow::Result<()> {
    match action {
        RecordAction::Create(args) => {
            let record = read_payload(&args.payload).await?;
            let ObjectArgs { container, id } = args.object;
            debug!(%container, %id, bytes = record.len(), "creating record");
            adapter.create_record(&container, &id, &record).await?;
            println!("{} Created record {}", "✓".green().bold(), id.yellow());
        }
        RecordAction::Read(ObjectArgs { container, id }) => {
            let record = adapter.read_record(&container, &id).await?;
            println!("{record}");
        }
        RecordAction::Update(args) => {
            let record = read_payload(&args.payload).await?;
            let ObjectArgs { container, id } = args.object;
            debug!(%container, %id, bytes = record.len(), "updating record");
            adapter.update_record(&container, &id, &record).await?;
            println!("{} Updated record {}", "✓".green().bold(), id.yellow());
        }
        RecordAction::Delete(ObjectArgs { container, id }) => {
            adapter.delete_record(&container, &id).await?;
            println!("{} Deleted record {}", "✓".green().bold(), id.yellow());
        }
    }
    Ok(())
}

async fn cmd_resource(
    adapter: &dyn RepositoryAdapter,
    action: ResourceAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        ResourceAction::Create(args) => {
            let body = file_stream(&args.file).await?;
            let ObjectArgs { container, id } = args.object;
            debug!(%container, %id, file = %args.file.display(), "creating resource");
            adapter
                .create_resource(&container, &id, body, &args.mime_type)
                .await?;
            println!(
                "{} Created resource {} ({})",
                "✓".green().bold(),
                id.yellow(),
                args.mime_type.cyan()
            );
        }
        ResourceAction::Read(args) => {
            let ObjectArgs { container, id } = args.object;
            let stream = adapter.read_resource(&container, &id).await?;
            match &args.output {
                Some(path) => {
                    let file = tokio::fs::File::create(path)
                        .await
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    let written = copy_stream(stream, file).await?;
                    println!(
                        "{} Wrote {} bytes to {}",
                        "✓".green().bold(),
                        written,
                        path.display()
                    );
                }
                None => {
                    copy_stream(stream, tokio::io::stdout()).await?;
                }
            }
        }
        ResourceAction::Update(args) => {
            let body = file_stream(&args.file).await?;
            let ObjectArgs { container, id } = args.object;
            debug!(%container, %id, file = %args.file.display(), "updating resource");
            adapter
                .update_resource(&container, &id, body, &args.mime_type)
                .await?;
            println!("{} Updated resource {}", "✓".green().bold(), id.yellow());
        }
        ResourceAction::Delete(ObjectArgs { container, id }) => {
            adapter.delete_resource(&container, &id).await?;
            println!("{} Deleted resource {}", "✓".green().bold(), id.yellow());
        }
        ResourceAction::Metadata(ObjectArgs { container, id }) => {
            let metadata = adapter.read_resource_metadata(&container, &id).await?;
            print_metadata(&id, &metadata, format)?;
        }
        ResourceAction::SetMetadata(args) => {
            let ObjectArgs { container, id } = args.object;
            let update = ResourceMetadataToUpdate::new(args.file_name, args.mime_type);
            adapter
                .update_resource_metadata(&container, &id, &update)
                .await?;
            println!(
                "{} Set metadata on {}: {} ({})",
                "✓".green().bold(),
                id.yellow(),
                update.original_file_name(),
                update.mime_type().cyan()
            );
        }
    }
    Ok(())
}

fn print_metadata(
    id: &str,
    metadata: &ResourceMetadata,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(metadata)?),
        OutputFormat::Text => {
            println!("Resource {}", id.yellow().bold());
            println!("  Size:    {} bytes", metadata.file_size().bold());
            println!("  SHA-512: {}", metadata.checksum_sha512().dimmed());
        }
    }
    Ok(())
}

async fn read_payload(payload: &Payload) -> anyhow::Result<String> {
    match (&payload.data, &payload.file) {
        (Some(data), _) => Ok(data.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {}", path.display())),
        (None, None) => anyhow::bail!("either --data or --file is required"),
    }
}

/// Open `path` as a chunked body stream.
async fn file_stream(path: &Path) -> anyhow::Result<ByteStream> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    let stream = futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let n = match file.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => return Err(TransportError::Body(e.to_string())),
        };
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), file)))
    });
    Ok(stream.boxed())
}

async fn copy_stream<W>(mut stream: ByteStream, mut out: W) -> anyhow::Result<u64>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = stream.try_next().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fcrepo_adapter::{FedoraAdapter, FedoraError};
    use fcrepo_transport::{collect_stream, InMemoryRepository};

    use super::*;

    const BASE: &str = "http://localhost:38088/fcrepo/rest/";

    fn setup() -> (Arc<InMemoryRepository>, FedoraAdapter) {
        let repo = Arc::new(InMemoryRepository::new());
        let adapter = FedoraAdapter::with_transport(BASE, repo.clone());
        (repo, adapter)
    }

    fn object(id: &str) -> ObjectArgs {
        ObjectArgs {
            container: "div".into(),
            id: id.into(),
        }
    }

    #[test]
    fn base_url_flag_wins() {
        let config = load_config(None, Some("http://flag:1/rest/")).unwrap();
        assert_eq!(config.base_url, "http://flag:1/rest/");
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcrepo.toml");
        std::fs::write(&path, "[transport]\nrequest_timeout_secs = 9\n").unwrap();
        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.transport.request_timeout_secs, Some(9));
    }

    #[tokio::test]
    async fn payload_from_file_or_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.xml");
        std::fs::write(&path, "<rec/>").unwrap();

        let from_file = Payload {
            file: Some(path),
            data: None,
        };
        assert_eq!(read_payload(&from_file).await.unwrap(), "<rec/>");
        let inline = Payload {
            file: None,
            data: Some("<x/>".into()),
        };
        assert_eq!(read_payload(&inline).await.unwrap(), "<x/>");
    }

    #[tokio::test]
    async fn file_stream_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let stream = file_stream(&path).await.unwrap();
        assert_eq!(collect_stream(stream).await.unwrap().to_vec(), data);
    }

    #[tokio::test]
    async fn record_commands_round_trip() {
        let (repo, adapter) = setup();
        let create = RecordWriteArgs {
            object: object("r1"),
            payload: Payload {
                file: None,
                data: Some("<a/>".into()),
            },
        };
        cmd_record(&adapter, RecordAction::Create(create)).await.unwrap();
        assert!(repo.contains(&format!("{BASE}div/record/r1")));

        cmd_record(&adapter, RecordAction::Delete(object("r1"))).await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn resource_commands_round_trip() {
        let (repo, adapter) = setup();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pic.jpg");
        let output = dir.path().join("copy.jpg");
        std::fs::write(&input, b"jpegbytes").unwrap();

        let create = ResourceWriteArgs {
            object: object("b1"),
            file: input,
            mime_type: "image/jpeg".into(),
        };
        cmd_resource(&adapter, ResourceAction::Create(create), OutputFormat::Text)
            .await
            .unwrap();
        let set = SetMetadataArgs {
            object: object("b1"),
            file_name: "pic.jpg".into(),
            mime_type: "image/jpeg".into(),
        };
        cmd_resource(&adapter, ResourceAction::SetMetadata(set), OutputFormat::Text)
            .await
            .unwrap();
        cmd_resource(&adapter, ResourceAction::Metadata(object("b1")), OutputFormat::Json)
            .await
            .unwrap();

        let read = ResourceReadArgs {
            object: object("b1"),
            output: Some(output.clone()),
        };
        cmd_resource(&adapter, ResourceAction::Read(read), OutputFormat::Text)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"jpegbytes");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn adapter_errors_propagate() {
        let (_repo, adapter) = setup();
        let err = cmd_record(&adapter, RecordAction::Read(object("missing")))
            .await
            .unwrap_err();
        let fedora = err.downcast_ref::<FedoraError>().unwrap();
        assert!(fedora.is_not_found());
        assert_eq!(
            err.to_string(),
            "Read error: record with id missing does not exist in Fedora."
        );
    }
}
