//! Per-slot settings.
//!
//! [`SlotOptions`] carries the label a holder reports in log events and the
//! [`FailurePolicy`] that decides what a failed construction leaves behind.
//! Every constructor is `const` so options can be built inside `static`
//! initializers.

use std::fmt;

/// What a [`FallibleSingleton`](crate::patterns::fallible::FallibleSingleton)
/// does after its initializer returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailurePolicy {
    /// Leave the slot empty; the next access runs the initializer again.
    #[default]
    Retry,
    /// Memoize the error; every later access returns it without retrying.
    Cache,
}

impl FailurePolicy {
    /// Short lowercase name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Cache => "cache",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by every holder type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotOptions {
    /// Name reported in log events and `Debug` output.
    pub label: &'static str,
    /// Behaviour after a failed construction (fallible holders only).
    pub failure_policy: FailurePolicy,
}

impl SlotOptions {
    /// Options used when none are supplied.
    pub const DEFAULT: Self = Self::new("singleton");

    /// Options with the given label and the default failure policy.
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            failure_policy: FailurePolicy::Retry,
        }
    }

    /// Replace the failure policy.
    pub const fn with_failure_policy(self, failure_policy: FailurePolicy) -> Self {
        Self {
            failure_policy,
            ..self
        }
    }
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
