//! ENVI header parsing.
//!
//! Headers are plain text: an optional `ENVI` magic line followed by
//! `key = value` entries. Values wrapped in braces may span several lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::view_pipeline::common::error::{Result, ViewVectorError};

#[derive(Debug, Clone, Default)]
pub struct EnviHeader {
    fields: HashMap<String, String>,
}

impl EnviHeader {
    pub fn parse(text: &str) -> Self {
        let mut fields = HashMap::new();
        let mut pending: Option<(String, String)> = None;

        for line in text.lines() {
            if let Some((key, mut value)) = pending.take() {
                value.push(' ');
                value.push_str(line.trim());
                if line.contains('}') {
                    fields.insert(key, strip_braces(&value));
                } else {
                    pending = Some((key, value));
                }
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = normalize_key(key);
            let value = value.trim().to_string();
            if value.starts_with('{') && !value.contains('}') {
                pending = Some((key, value));
            } else {
                fields.insert(key, strip_braces(&value));
            }
        }

        // Unterminated list at end of file: keep what was read.
        if let Some((key, value)) = pending {
            fields.insert(key, strip_braces(&value));
        }

        Self { fields }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ViewVectorError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        let header = Self::parse(&text);
        debug!("Parsed {} header fields from {}", header.len(), path.display());
        Ok(header)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Finds the header belonging to a data file: `<file>.hdr` first, then the
/// data file's extension swapped for `.hdr`.
pub fn header_path_for(data_path: &Path) -> Option<PathBuf> {
    let mut appended = data_path.as_os_str().to_owned();
    appended.push(".hdr");
    let appended = PathBuf::from(appended);
    if appended.is_file() {
        return Some(appended);
    }

    let swapped = data_path.with_extension("hdr");
    swapped.is_file().then_some(swapped)
}

fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn strip_braces(value: &str) -> String {
    let value = value.trim();
    let value = value.strip_prefix('{').unwrap_or(value);
    let value = value.strip_suffix('}').unwrap_or(value);
    value.trim().to_string()
}
