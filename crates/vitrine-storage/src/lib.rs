//! Vitrine Storage Library
//!
//! File storage for uploaded media: the [`Storage`] trait, the local filesystem backend
//! and the path allocator that decides where a new upload lands.
//!
//! # Storage key format
//!
//! Keys are relative paths below the storage root: `YYYY/MM/DD/{uuid}.{ext}`, dated at
//! ingestion time. Keys must not contain `..`, backslashes or a leading `/`.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{allocate_key, AllocatedKey};
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
