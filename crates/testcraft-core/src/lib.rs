//! testcraft-core: Document store, scoring, and analytics.
//!
//! This crate holds the test/question data model, the in-memory document
//! store that owns tests and submitted responses, and the scoring and
//! dashboard analytics built on top of them.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod patch;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod store;
pub mod template;

pub use error::StoreError;
pub use store::DocumentStore;
