pub mod listing;
pub mod media;
pub mod principal;
pub mod user;

pub use listing::{ListScope, OrderKey, PageRequest, PageResult};
pub use media::{MediaKind, MediaRecord, NewMediaRecord, StoredFile};
pub use principal::Principal;
pub use user::User;
