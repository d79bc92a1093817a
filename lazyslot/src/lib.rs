//! # lazyslot
//!
//! Lazily-initialised singleton holders that construct their payload at most
//! once, even under concurrent first access.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates.  Application code should depend on this crate
//! rather than on `slot-core` directly.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! lazyslot = "0.1"
//! ```
//!
//! ```rust
//! use lazyslot::Singleton;
//!
//! static NAMES: Singleton<Vec<&'static str>> = Singleton::new(|| vec!["ada", "grace"]);
//!
//! assert_eq!(NAMES.instance().len(), 2);
//! assert!(std::ptr::eq(NAMES.instance(), NAMES.instance()));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Holders, options, and error definitions.
pub use slot_core as core;

pub use slot_core::{
    construction_failed, define_singleton, Error, FailurePolicy, FallibleSingleton, Result,
    Singleton, SingletonObject, SingletonRegistry, SlotOptions, SlotState,
};
