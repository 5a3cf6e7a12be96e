//! Vitrine API Library
//!
//! HTTP handlers, authentication, middleware and application setup for the media
//! library server.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use error::ErrorResponse;
