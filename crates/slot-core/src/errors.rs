//! Error types for lazyslot.
//!
//! Construction is the only thing that can fail, so the hierarchy collapses to
//! a single `thiserror`-derived enum with one variant.  Initializers written
//! against foreign error types convert through [`Error::construction`] or
//! bail out early with the [`construction_failed!`](crate::construction_failed) macro.

use std::fmt::Display;

use thiserror::Error;

/// The top-level error type used throughout lazyslot.
///
/// `Clone` is required so that a cached failure can be handed to every
/// caller of a [`FallibleSingleton`](crate::patterns::fallible::FallibleSingleton)
/// configured with [`FailurePolicy::Cache`](crate::settings::FailurePolicy::Cache).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The payload's initializer reported an error.
    #[error("construction failed: {0}")]
    ConstructionFailed(String),
}

impl Error {
    /// Wrap any displayable error as [`Error::ConstructionFailed`].
    pub fn construction(cause: impl Display) -> Self {
        Self::ConstructionFailed(cause.to_string())
    }
}

/// Shorthand `Result` type used throughout lazyslot.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::ConstructionFailed(...))` from the enclosing initializer.
///
/// # Example
/// ```
/// use slot_core::{construction_failed, errors::Result};
///
/// fn open_pool(size: usize) -> Result<Vec<u8>> {
///     if size == 0 {
///         construction_failed!("pool size must be non-zero");
///     }
///     Ok(vec![0; size])
/// }
/// assert!(open_pool(4).is_ok());
/// assert!(open_pool(0).is_err());
/// ```
#[macro_export]
macro_rules! construction_failed {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::ConstructionFailed(format!($($msg)*)))
    };
}
