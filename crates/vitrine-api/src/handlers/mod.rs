pub mod auth;
pub mod files;
pub mod gallery;
pub mod media_delete;
pub mod media_get;
pub mod media_replace;
pub mod media_sort;
pub mod media_update;
pub mod media_upload;
pub mod responses;
