//! Patterns sub-module: singleton, fallible, registry.

pub mod fallible;
pub mod registry;
pub mod singleton;
