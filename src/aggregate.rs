//! Aggregation and output of the resume collection.

use crate::config::PipelineConfig;
use crate::error::WriteError;
use crate::load::LoadedDocument;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, trace};

/// Drop failed loads and keep only the parsed values, in input order.
pub fn collect(results: Vec<Option<LoadedDocument>>) -> Vec<Value> {
    results
        .into_iter()
        .flatten()
        .map(|doc| {
            trace!(name = %doc.name, "collected resume");
            doc.value
        })
        .collect()
}

/// Serialize the collection as 2-space-indented JSON, no trailing newline.
pub fn render(values: &[Value]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(values)
}

/// Write `<output_dir>/<output_name>.json`, creating directories as needed.
///
/// The file is overwritten in place; a crash mid-write can leave it truncated.
pub async fn write_collection(
    values: &[Value],
    output_dir: &Path,
    output_name: &str,
) -> Result<PathBuf, WriteError> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|source| WriteError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let path = output_dir.join(format!("{output_name}.json"));
    let json = render(values)?;
    fs::write(&path, json)
        .await
        .map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;

    info!("Created JSON file: {}", path.display());
    Ok(path)
}

/// Write the collection according to `config`.
///
/// Unless `strict_write` is set, a write failure is logged and reported as
/// `Ok(None)` so the run still counts as successful.
pub async fn publish(
    values: &[Value],
    config: &PipelineConfig,
) -> Result<Option<PathBuf>, WriteError> {
    debug!(count = values.len(), path = %config.output_path().display(), "writing resumes");
    match write_collection(values, &config.output_dir, &config.output_name).await {
        Ok(path) => Ok(Some(path)),
        Err(err) if !config.strict_write => {
            error!("Error writing JSON file: {:#}", anyhow::Error::new(err));
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
