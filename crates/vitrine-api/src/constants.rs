//! API constants

/// Prefix of every versioned route
pub const API_PREFIX: &str = "/api/v1";

/// Headroom above the upload ceiling for multipart framing and the `size` field.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Readiness and health probes give up after this many seconds.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;
