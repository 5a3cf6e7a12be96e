//! Shared limits and defaults.

/// Hard ceiling for a single uploaded file.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub const MIN_PASSWORD_LENGTH: usize = 6;
