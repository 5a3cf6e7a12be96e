//! Database repositories for data access layer
//
// Media records (owner-scoped CRUD, listing, reordering)
pub mod media;
//
// User accounts
pub mod user;
//
// Transaction utilities
pub mod transaction;
//
// In-memory stores for tests
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use media::{order_by_clause, MediaRepository, MediaStore};
pub use transaction::TransactionGuard;
pub use user::{UserRepository, UserStore};
