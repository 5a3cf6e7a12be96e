//! Vitrine DB Library
//!
//! Persistence for media records and user accounts. Callers depend on the
//! [`MediaStore`] and [`UserStore`] traits; the Postgres repositories implement them
//! and the `test-helpers` feature adds in-memory versions for tests.

pub mod db;

pub use db::*;
