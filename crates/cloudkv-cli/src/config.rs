use std::path::{Path, PathBuf};

use anyhow::Context;
use cloudkv_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_DIR: &str = ".cloudkv";

/// Contents of a `--config` file.
///
/// ```toml
/// dir = "/home/me/Dropbox/cloudkv"
///
/// [engine]
/// compaction_threshold = 20
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub dir: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl CliConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub async fn read(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Effective settings after flags are layered over the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub dir: PathBuf,
    pub engine: EngineConfig,
}

impl Settings {
    pub fn resolve(file: CliConfig, cli: &Cli) -> Self {
        let dir = cli
            .dir
            .clone()
            .or(file.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));
        let mut engine = file.engine;
        if let Some(threshold) = cli.compaction_threshold {
            engine = engine.with_compaction_threshold(threshold);
        }
        Self { dir, engine }
    }

    pub async fn load(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => CliConfig::read(path).await?,
            None => CliConfig::default(),
        };
        Ok(Self::resolve(file, cli))
    }
}
