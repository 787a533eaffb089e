use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fcrepo",
    about = "Store, read and delete records and binary resources in a Fedora repository",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository base URL, overriding config and FCREPO_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, read, update or delete a text record
    Record(RecordArgs),
    /// Create, read, update or delete a binary resource and its metadata
    Resource(ResourceArgs),
}

#[derive(Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub action: RecordAction,
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Store a new record
    Create(RecordWriteArgs),
    /// Print a record
    Read(ObjectArgs),
    /// Replace an existing record
    Update(RecordWriteArgs),
    /// Delete a record and purge its tombstone
    Delete(ObjectArgs),
}

#[derive(Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub action: ResourceAction,
}

#[derive(Subcommand)]
pub enum ResourceAction {
    /// Upload a new binary
    Create(ResourceWriteArgs),
    /// Download a binary
    Read(ResourceReadArgs),
    /// Replace an existing binary
    Update(ResourceWriteArgs),
    /// Delete a binary and purge its tombstone
    Delete(ObjectArgs),
    /// Show file size and SHA-512 checksum
    Metadata(ObjectArgs),
    /// Store the original file name and mime type
    SetMetadata(SetMetadataArgs),
}

#[derive(Args)]
pub struct ObjectArgs {
    /// Container (data divider) the object lives in
    pub container: String,
    pub id: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Payload {
    /// Read the record from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Record text given inline
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(Args)]
pub struct RecordWriteArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    #[command(flatten)]
    pub payload: Payload,
}

#[derive(Args)]
pub struct ResourceWriteArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    /// File to upload
    pub file: PathBuf,
    #[arg(long)]
    pub mime_type: String,
}

#[derive(Args)]
pub struct ResourceReadArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SetMetadataArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    #[arg(long)]
    pub file_name: String,
    #[arg(long)]
    pub mime_type: String,
}
