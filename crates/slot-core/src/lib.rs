//! # slot-core
//!
//! Singleton holders, slot options, and error definitions for lazyslot.
//!
//! This crate provides the building blocks re-exported by the `lazyslot`
//! façade: the lazily-constructed [`Singleton`], its fallible sibling
//! [`FallibleSingleton`], the type-keyed [`SingletonRegistry`], the
//! [`SlotOptions`] that configure them, and the error hierarchy.
//!
//! Every holder guarantees that its payload is constructed at most once, even
//! when many threads race on an empty slot, and that an occupied slot is
//! never cleared or replaced.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `construction_failed!` macro.
pub mod errors;

/// Holder types: singleton, fallible singleton, registry.
pub mod patterns;

/// Per-slot options (label, failure policy).
pub mod settings;

/// The textbook `SingletonObject`.
pub mod singleton_object;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use patterns::fallible::FallibleSingleton;
pub use patterns::registry::SingletonRegistry;
pub use patterns::singleton::{Singleton, SlotState};
pub use settings::{FailurePolicy, SlotOptions};
pub use singleton_object::SingletonObject;
