//! Wiring shared by the command handlers: store, source and pipeline.

use crate::config::{AppConfig, OutputFormat};
use crate::error::{FetchErrorKind, TrackerError};
use crate::notify::{build_alert_sinks, ConsoleHost, HostAlertSink};
use crate::pipeline::{ChangePipeline, JsonFileSource, OrderSource};
use crate::store::{FileStore, SnapshotStore};
use anyhow::{Context, Result};
use std::sync::Arc;

/// The pipeline type the CLI runs.
pub type CliPipeline = ChangePipeline<Arc<FileStore>, Box<dyn OrderSource>>;

/// Open the file store under the configured data directory.
pub fn open_store(config: &AppConfig) -> Result<Arc<FileStore>> {
    let dir = config.data_dir();
    let store = FileStore::new(&dir)
        .with_context(|| format!("failed to open data directory {}", dir.display()))?;
    tracing::debug!("Using data directory {}", dir.display());
    Ok(Arc::new(store))
}

pub fn snapshot_store(config: &AppConfig, store: Arc<FileStore>) -> SnapshotStore<Arc<FileStore>> {
    SnapshotStore::new(store)
        .with_key_prefix(config.store.key_prefix.clone())
        .with_max_snapshots(config.store.max_snapshots)
}

/// The configured order source: a JSON file wins over a URL.
pub fn build_source(config: &AppConfig) -> Result<Box<dyn OrderSource>> {
    if let Some(path) = &config.source.orders_file {
        return Ok(Box::new(JsonFileSource::new(path)));
    }
    if let Some(url) = &config.source.url {
        return http_source(url, config.source.timeout_secs);
    }
    Err(TrackerError::fetch(
        "pass --orders-file or --url, or set source.orders_file / source.url in the config file",
        FetchErrorKind::NotConfigured,
    )
    .into())
}

#[cfg(feature = "http")]
fn http_source(url: &str, timeout_secs: u64) -> Result<Box<dyn OrderSource>> {
    Ok(Box::new(crate::pipeline::HttpOrderSource::new(
        url,
        std::time::Duration::from_secs(timeout_secs),
    )))
}

#[cfg(not(feature = "http"))]
fn http_source(url: &str, _timeout_secs: u64) -> Result<Box<dyn OrderSource>> {
    anyhow::bail!("cannot fetch {url}: built without the `http` feature")
}

/// A pipeline with console and host alert sinks attached.
///
/// With JSON output, change events go to stdout as NDJSON when `ndjson` is
/// set; otherwise they are printed as text on stderr.
pub fn build_pipeline(config: &AppConfig, store: &Arc<FileStore>, ndjson: bool) -> Result<CliPipeline> {
    let source = build_source(config)?;
    let labels = config.display_labels();
    let writer: Option<Box<dyn std::io::Write + Send>> =
        if ndjson && config.output.format == OutputFormat::Json {
            Some(Box::new(std::io::stdout()))
        } else {
            None
        };

    let mut pipeline = ChangePipeline::new(snapshot_store(config, Arc::clone(store)), source)
        .with_engine(config.diff_engine())
        .with_reference_pointer(config.source.reference_pointer.clone());
    for sink in build_alert_sinks(writer, config.behavior.quiet, &labels) {
        pipeline.add_sink(sink);
    }
    pipeline.add_sink(Box::new(HostAlertSink::new(
        ConsoleHost::new(Arc::clone(store)),
        Arc::clone(store),
        config.notification_policy(),
    )));
    Ok(pipeline)
}
