use anyhow::{bail, Context};
use cloudkv_engine::{KvStore, LoadReport, Values};
use cloudkv_resolve::LwwResolver;
use cloudkv_store::{BlobHandle, DirectoryBlobStore};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::Settings;

pub type CliStore = KvStore<DirectoryBlobStore, LwwResolver>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(&cli).await?;
    debug!(dir = %settings.dir.display(), threshold = settings.engine.compaction_threshold, "settings resolved");
    let (mut kv, report) = open_store(&settings).await?;
    let output = match cli.command {
        Command::Get(args) => cmd_get(&kv, &args.key, cli.format)?,
        Command::Put(args) => cmd_put(&mut kv, args, cli.format).await?,
        Command::Size => render_size(kv.size(), cli.format),
        Command::Load => render_report(&report, kv.size(), cli.format),
    };
    println!("{output}");
    Ok(())
}

/// Open the blob directory and merge every blob in it.
pub async fn open_store(settings: &Settings) -> anyhow::Result<(CliStore, LoadReport)> {
    let blobs = DirectoryBlobStore::open(&settings.dir)
        .await
        .with_context(|| format!("opening blob directory {}", settings.dir.display()))?;
    let mut kv = KvStore::with_config(blobs, LwwResolver::new(), settings.engine.clone());
    let report = kv
        .load()
        .await
        .with_context(|| format!("loading {}", settings.dir.display()))?;
    Ok((kv, report))
}

fn cmd_get(kv: &CliStore, key: &str, format: OutputFormat) -> anyhow::Result<String> {
    match kv.get(key) {
        Some(values) => Ok(render_values(values, format)),
        None => bail!("key not found: {key}"),
    }
}

async fn cmd_put(kv: &mut CliStore, args: PutArgs, format: OutputFormat) -> anyhow::Result<String> {
    let values: Values = args.fields.into_iter().collect();
    kv.put(args.key.clone(), values);
    let handle = kv
        .commit()
        .await
        .context("committing write")?
        .context("nothing to commit")?;
    Ok(render_put(&args.key, &handle, format))
}

fn render_values(values: &Values, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!(values).to_string(),
        OutputFormat::Text => values
            .iter()
            .map(|(field, value)| format!("{} = {}", field.cyan(), value))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_put(key: &str, handle: &BlobHandle, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({ "key": key, "blob": handle }).to_string(),
        OutputFormat::Text => format!(
            "{} Stored {} in blob {}",
            "✓".green().bold(),
            key.yellow(),
            handle.as_str().dimmed()
        ),
    }
}

fn render_size(size: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({ "size": size }).to_string(),
        OutputFormat::Text => format!("{} keys", size.to_string().bold()),
    }
}

fn render_report(report: &LoadReport, size: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({ "report": report, "size": size }).to_string(),
        OutputFormat::Text => {
            let mut lines = vec![
                format!("{} Loaded {} keys", "✓".green().bold(), size.to_string().bold()),
                format!("  Blobs read: {}", report.blobs_read),
                format!("  Records read: {}", report.records_read),
                format!("  Conflicts resolved: {}", report.conflicts_resolved),
            ];
            match &report.compacted {
                Some(handle) => lines.push(format!(
                    "  Compacted into: {}",
                    handle.as_str().yellow()
                )),
                None => lines.push(format!("  Compacted: {}", "no".dimmed())),
            }
            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudkv_engine::EngineConfig;
    use cloudkv_store::BlobStore;

    fn settings(dir: &std::path::Path, threshold: usize) -> Settings {
        Settings {
            dir: dir.to_path_buf(),
            engine: EngineConfig::default().with_compaction_threshold(threshold),
        }
    }

    fn put_args(key: &str, fields: &[(&str, &str)]) -> PutArgs {
        PutArgs {
            key: key.to_string(),
            fields: fields
                .iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn put_then_get_across_invocations() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), 10);

        let (mut kv, _) = open_store(&settings).await.unwrap();
        let out = cmd_put(&mut kv, put_args("user:1", &[("name", "ada")]), OutputFormat::Json)
            .await
            .unwrap();
        let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(printed["key"], "user:1");
        assert!(printed["blob"].as_str().unwrap().ends_with(".json"));

        let (kv, report) = open_store(&settings).await.unwrap();
        assert_eq!(report.blobs_read, 1);
        let got = cmd_get(&kv, "user:1", OutputFormat::Json).unwrap();
        assert_eq!(got, r#"{"name":"ada"}"#);
    }

    #[tokio::test]
    async fn missing_key_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let (kv, _) = open_store(&settings(tmp.path(), 10)).await.unwrap();
        let err = cmd_get(&kv, "nope", OutputFormat::Text).unwrap_err();
        assert_eq!(err.to_string(), "key not found: nope");
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("kv");
        let (kv, report) = open_store(&settings(&dir, 10)).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(kv.size(), 0);
        assert_eq!(report, LoadReport::default());
    }

    #[tokio::test]
    async fn load_compacts_once_threshold_is_reached() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), 3);
        for i in 0..3 {
            let (mut kv, _) = open_store(&settings).await.unwrap();
            let key = format!("k{i}");
            cmd_put(&mut kv, put_args(&key, &[("i", "x")]), OutputFormat::Text)
                .await
                .unwrap();
        }

        let (kv, report) = open_store(&settings).await.unwrap();
        assert_eq!(report.blobs_read, 3);
        assert!(report.did_compact());
        assert_eq!(kv.size(), 3);
        assert_eq!(kv.blob_store().list().await.unwrap().len(), 1);

        let rendered = render_report(&report, kv.size(), OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["size"], 3);
        assert_eq!(json["report"]["blobs_read"], 3);
        assert!(json["report"]["compacted"].is_string());
    }

    #[tokio::test]
    async fn later_put_overrides_earlier() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path(), 10);
        for name in ["ada", "grace"] {
            let (mut kv, _) = open_store(&settings).await.unwrap();
            cmd_put(&mut kv, put_args("user:1", &[("name", name)]), OutputFormat::Text)
                .await
                .unwrap();
            // Keep the two timestamps distinct at millisecond precision.
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let (kv, _) = open_store(&settings).await.unwrap();
        assert_eq!(kv.get("user:1").unwrap()["name"], "grace");
    }

    #[test]
    fn size_rendering() {
        assert_eq!(render_size(4, OutputFormat::Json), r#"{"size":4}"#);
        assert!(render_size(4, OutputFormat::Text).contains("keys"));
    }
}
