//! Vitrine Core Library
//!
//! Domain models, the error taxonomy, configuration and password hashing shared by
//! every Vitrine crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod password;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LibraryConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ListScope, MediaKind, MediaRecord, NewMediaRecord, OrderKey, PageRequest, PageResult, Principal,
    StoredFile, User,
};
