use std::fs;
use std::path::Path;

use anyhow::Result;
use encoding_rs::UTF_8;
use regex::{Captures, Regex};
use tracing::debug;

/// Read a configuration file, tolerating a byte order mark
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let bytes = fs::read(config_path)?;
    let content = decode_config_bytes(&bytes);
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }
    Ok(content)
}

/// Decode raw bytes as text. A UTF-8 or UTF-16 BOM picks the encoding and is
/// stripped; invalid sequences are replaced rather than rejected.
pub fn decode_config_bytes(bytes: &[u8]) -> String {
    let (cow, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        debug!("Configuration contained invalid {} sequences", encoding.name());
    }
    cow.into_owned()
}

/// Replace `${VAR_NAME}` references using `lookup`.
///
/// References that `lookup` cannot resolve are left untouched.
pub fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Split a comma-separated language list, trimming and lower-casing each entry
/// and dropping empty ones. Order is preserved.
pub fn parse_language_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
        .collect()
}
