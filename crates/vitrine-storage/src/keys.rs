//! Storage Path Allocator.
//!
//! New uploads are placed at `YYYY/MM/DD/{uuid}.{ext}`. The user-supplied filename only
//! contributes its extension, and only when that extension is short and alphanumeric.

use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 16;

/// A freshly generated name and the relative path it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedKey {
    pub stored_name: String,
    pub relative_path: String,
}

/// Allocate a unique relative path for an upload received at `now`.
pub fn allocate_key(original_name: &str, now: DateTime<Utc>) -> AllocatedKey {
    let id = Uuid::new_v4();
    let stored_name = match safe_extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    };
    let relative_path = format!("{}/{}", now.format("%Y/%m/%d"), stored_name);
    AllocatedKey {
        stored_name,
        relative_path,
    }
}

fn safe_extension(original_name: &str) -> Option<&str> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}
