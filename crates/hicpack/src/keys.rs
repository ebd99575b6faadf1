//! Key list loading.
//!
//! The key list fixes both the key set and its order, and therefore every
//! index in the key map and the payload layout. Two file forms are accepted:
//!
//! - a JSON array of strings (`["ADNP", "AFF4", ...]`)
//! - plain text, one key per line; blank lines and `#` comments are skipped

use crate::error::KeyListError;
use hicpack_formats::container::KeyMap;
use std::path::Path;
use tracing::debug;

/// Load a key list file and build the key map.
///
/// # Errors
///
/// Returns `KeyListError` if the file cannot be read, the JSON form is
/// invalid, or the keys contain duplicates or are empty.
pub fn load_keys(path: &Path) -> Result<KeyMap, KeyListError> {
    let text = std::fs::read_to_string(path).map_err(|source| KeyListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let keys = parse_key_list(&text)?;
    debug!("Loaded {} keys from {}", keys.len(), path.display());
    Ok(keys)
}

/// Parse key list text in either accepted form.
///
/// # Errors
///
/// Returns `KeyListError` on malformed JSON or an invalid key set.
pub fn parse_key_list(text: &str) -> Result<KeyMap, KeyListError> {
    let keys: Vec<String> = if text.trim_start().starts_with('[') {
        serde_json::from_str(text)?
    } else {
        text.lines()
            .map(|line| line.split_once('#').map_or(line, |(key, _)| key).trim())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    };
    Ok(KeyMap::new(keys)?)
}
