//! Vitrine Services Library
//!
//! The media lifecycle: ingestion (validate, place on disk, record, roll back),
//! listing, and owner-defined ordering. Every operation receives the caller's
//! [`Principal`](vitrine_core::Principal) explicitly and talks only to the
//! [`MediaStore`](vitrine_db::MediaStore) and [`Storage`](vitrine_storage::Storage)
//! traits.

pub mod cleanup;
pub mod ingestion;
pub mod listing;
pub mod reorder;

pub use cleanup::{discard_file, CleanupOutcome};
pub use ingestion::{DeleteOutcome, IncomingUpload, IngestError, MediaIngestionService, ReplaceOutcome};
pub use listing::ListingEngine;
pub use reorder::SortOrderReconciler;
