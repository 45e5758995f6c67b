//! Libreria application library
//!
//! Catalog modules (categories, books), the server bootstrap, and the
//! dashboard client.

pub mod dashboard;
pub mod modules;
pub mod server;

pub use modules::{register_all, Stores};
