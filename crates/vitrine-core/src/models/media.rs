use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppError;

/// Broad media category, derived from the declared content type at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME string by its top-level type. Anything other than
    /// `image/*` or `video/*` is unsupported.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let normalized = content_type.trim().to_ascii_lowercase();
        if normalized.starts_with("image/") {
            Some(MediaKind::Image)
        } else if normalized.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(AppError::InvalidInput(format!(
                "Invalid media type '{}': expected 'image' or 'video'",
                other
            ))),
        }
    }
}

/// One stored file and its metadata. `relative_path` is unique across live records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaRecord {
    pub id: i64,
    pub owner_id: i64,
    pub stored_name: String,
    pub original_name: String,
    pub relative_path: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub kind: MediaKind,
    pub sort_rank: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaRecord {
    /// Swap in a new backing file, keeping identity, owner and rank.
    pub fn with_file(mut self, file: StoredFile) -> Self {
        self.stored_name = file.stored_name;
        self.original_name = file.original_name;
        self.relative_path = file.relative_path;
        self.size_bytes = file.size_bytes;
        self.content_type = file.content_type;
        self.kind = file.kind;
        self
    }

    /// The file-related half of the record.
    pub fn file(&self) -> StoredFile {
        StoredFile {
            stored_name: self.stored_name.clone(),
            original_name: self.original_name.clone(),
            relative_path: self.relative_path.clone(),
            size_bytes: self.size_bytes,
            content_type: self.content_type.clone(),
            kind: self.kind,
        }
    }
}

/// File-related fields of a record, as produced by a completed disk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub stored_name: String,
    pub original_name: String,
    pub relative_path: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub kind: MediaKind,
}

/// Insert payload; id, rank and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaRecord {
    pub owner_id: i64,
    pub file: StoredFile,
}
