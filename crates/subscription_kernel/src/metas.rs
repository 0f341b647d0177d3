//! JSON-encoded meta maps
//!
//! Records carry a free-form `metas` column holding a flat string map as
//! JSON. Every accessor decodes the column, works on the map, and re-encodes
//! it, so the column stays the single source of truth.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// A flat string-to-string meta map
pub type Metas = BTreeMap<String, String>;

/// Decodes a stored meta string
///
/// An empty string or JSON `null` decodes to an empty map.
///
/// # Errors
///
/// Returns `CoreError::Serialization` for any other malformed input
pub fn decode_metas(raw: &str) -> Result<Metas, CoreError> {
    if raw.trim().is_empty() {
        return Ok(Metas::new());
    }
    let decoded: Option<Metas> = serde_json::from_str(raw)?;
    Ok(decoded.unwrap_or_default())
}

/// Encodes a meta map for storage
pub fn encode_metas(metas: &Metas) -> Result<String, CoreError> {
    Ok(serde_json::to_string(metas)?)
}

/// Meta accessors over a record's raw `metas` column
///
/// Concurrent mutation of the same record is not synchronized; a record has a
/// single owner at a time.
pub trait HasMetas {
    /// The raw JSON stored in the `metas` column
    fn metas_raw(&self) -> &str;

    /// Replaces the raw JSON and marks the column changed
    fn replace_metas_raw(&mut self, raw: String);

    fn metas(&self) -> Result<Metas, CoreError> {
        decode_metas(self.metas_raw())
    }

    fn set_metas(&mut self, metas: &Metas) -> Result<&mut Self, CoreError> {
        let encoded = encode_metas(metas)?;
        self.replace_metas_raw(encoded);
        Ok(self)
    }

    fn has_meta(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.metas()?.contains_key(key))
    }

    /// Returns the meta value for `key`, `None` when absent
    fn meta(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.metas()?.remove(key))
    }

    fn set_meta(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, CoreError> {
        let mut metas = self.metas()?;
        metas.insert(key.into(), value.into());
        self.set_metas(&metas)
    }

    /// Removes `key`; removing an absent key still rewrites the column
    fn delete_meta(&mut self, key: &str) -> Result<&mut Self, CoreError> {
        let mut metas = self.metas()?;
        metas.remove(key);
        self.set_metas(&metas)
    }
}
