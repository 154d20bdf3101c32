//! Document loader: read, parse and normalize one resume file.
//!
//! Every failure here is local to its file: it is logged and the file is
//! reported as absent, so one bad resume never aborts the batch.

use crate::convert::yaml_to_json;
use crate::error::ParseError;
use futures::future;
use futures::stream::{self, StreamExt};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::future::Future;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A successfully parsed resume.
#[derive(Debug)]
pub struct LoadedDocument {
    /// File stem, lower-cased (`Team/Ada.Lovelace.YAML` → `ada.lovelace`).
    /// Not part of the generated JSON.
    pub name: String,
    pub value: JsonValue,
}

/// Where document text comes from.
pub trait DocumentSource {
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>>;
}

/// Reads documents from the local filesystem.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD instead of
/// failing the read.
#[derive(Debug)]
pub struct FsSource;

impl DocumentSource for FsSource {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Load every path, returning one slot per input in input order.
///
/// With no limit all loads run at once; with `Some(n)` at most `n` are in
/// flight. Either way the output order follows `paths`, not completion order.
pub async fn load_all<S: DocumentSource>(
    source: &S,
    paths: &[PathBuf],
    max_concurrency: Option<NonZeroUsize>,
) -> Vec<Option<LoadedDocument>> {
    let loads = paths.iter().map(|path| load_document(source, path));
    match max_concurrency {
        Some(limit) => stream::iter(loads).buffered(limit.get()).collect().await,
        None => future::join_all(loads).await,
    }
}

/// Load a single document, or `None` if it cannot be read, does not parse,
/// or parses to a falsy value.
pub async fn load_document<S: DocumentSource>(source: &S, path: &Path) -> Option<LoadedDocument> {
    let text = match source.read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            error!("Error loading YAML file \"{}\": {}", path.display(), e);
            return None;
        }
    };

    let value = match parse_document(&text) {
        Ok(value) => value,
        Err(e) => {
            error!("Error loading YAML file \"{}\": {}", path.display(), e);
            return None;
        }
    };

    if is_falsy(&value) {
        error!("YAML parsing failed for file: {}", path.display());
        return None;
    }

    let name = normalized_name(path);
    debug!(name = %name, path = %path.display(), "loaded resume");
    Some(LoadedDocument {
        name,
        value: yaml_to_json(value),
    })
}

/// Parse one YAML document, resolving `<<` merge keys.
///
/// Tagged nodes (`!date 2021-04-01`) are rejected: no custom tags are known.
pub fn parse_document(text: &str) -> Result<YamlValue, ParseError> {
    // A stream with no document at all is null
    if text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    }) {
        return Ok(YamlValue::Null);
    }

    let mut value: YamlValue = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    if let Some(tag) = find_tag(&value) {
        return Err(ParseError::UnknownTag(tag));
    }
    Ok(value)
}

/// First tag found anywhere in the tree, keys included.
fn find_tag(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::Tagged(tagged) => Some(tagged.tag.to_string()),
        YamlValue::Sequence(seq) => seq.iter().find_map(find_tag),
        YamlValue::Mapping(mapping) => mapping
            .iter()
            .find_map(|(key, value)| find_tag(key).or_else(|| find_tag(value))),
        _ => None,
    }
}

/// Null, `false`, zero, NaN and the empty string. Empty collections are not
/// falsy.
pub fn is_falsy(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => true,
        YamlValue::Bool(b) => !b,
        YamlValue::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        YamlValue::String(s) => s.is_empty(),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => false,
        YamlValue::Tagged(tagged) => is_falsy(&tagged.value),
    }
}

/// Base name without its last extension, lower-cased.
pub fn normalized_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
