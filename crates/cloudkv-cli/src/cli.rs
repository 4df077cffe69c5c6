use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cloudkv",
    about = "Eventually consistent key-value store over a synced folder",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Blob directory [default: .cloudkv]
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Blobs seen by a load before they are compacted (0 disables)
    #[arg(long, global = true)]
    pub compaction_threshold: Option<usize>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the values stored under a key
    Get(GetArgs),
    /// Write a record and commit it as a new blob
    Put(PutArgs),
    /// Print the number of keys
    Size,
    /// Merge all blobs and report what was read
    Load,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    /// Values as field=value pairs
    #[arg(required = true, value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, _)) if field.is_empty() => Err(format!("empty field name in `{raw}`")),
        Some((field, value)) => Ok((field.to_string(), value.to_string())),
        None => Err(format!("expected field=value, got `{raw}`")),
    }
}
