//! Request DTOs for the maintenance API

use serde::Deserialize;

const MAX_KEY_LEN: usize = 256;

/// Query of `DELETE /cache/objects`
///
/// Without `key` the whole object cache is cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectQuery {
    /// Single rendered cache key to remove
    #[serde(default)]
    pub key: Option<String>,
}

impl ObjectQuery {
    /// Returns an error message if the query is unusable, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.key.as_deref() {
            Some("") => Some("Key cannot be empty".to_string()),
            Some(key) if key.len() > MAX_KEY_LEN => Some(format!(
                "Key exceeds maximum length of {MAX_KEY_LEN} characters"
            )),
            _ => None,
        }
    }
}
