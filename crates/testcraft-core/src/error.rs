//! Document store error types.
//!
//! Unknown ids are not errors inside the store: mutations on a missing test
//! or question are no-ops. These variants cover the few conditions a caller
//! has to be told about.

use thiserror::Error;

/// Errors reported by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A test was created with a blank title.
    #[error("test title is required")]
    EmptyTitle,

    /// A lookup that requires the test to exist did not find it.
    #[error("test not found: {0}")]
    TestNotFound(String),
}
