//! Singleton whose construction may fail.
//!
//! The slot stores the *outcome* of construction.  Under
//! [`FailurePolicy::Retry`] only successes are ever stored, so an error leaves
//! the slot empty for the next caller.  Under [`FailurePolicy::Cache`] the
//! first outcome is stored whatever it is, and a stored error is replayed to
//! every later caller.
//!
//! `std::sync::OnceLock` has no stable fallible initialiser, so the slot is a
//! `once_cell::sync::OnceCell`, which provides `get_or_try_init` with the same
//! blocking guarantees.

use std::fmt;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::patterns::singleton::SlotState;
use crate::settings::{FailurePolicy, SlotOptions};

/// A slot holding at most one instance of `T`, built by a fallible `F`.
///
/// # Example
/// ```
/// use slot_core::patterns::fallible::FallibleSingleton;
/// use slot_core::settings::{FailurePolicy, SlotOptions};
/// use slot_core::Error;
///
/// static PORT: FallibleSingleton<u16> = FallibleSingleton::with_options(
///     SlotOptions::new("port").with_failure_policy(FailurePolicy::Cache),
///     || "not-a-port".parse::<u16>().map_err(Error::construction),
/// );
///
/// let first = PORT.try_instance().unwrap_err();
/// assert_eq!(PORT.try_instance().unwrap_err(), first);
/// ```
pub struct FallibleSingleton<T, F = fn() -> Result<T>> {
    outcome: OnceCell<Result<T>>,
    init: F,
    options: SlotOptions,
}

impl<T, F> FallibleSingleton<T, F> {
    /// Return the instance if it has been constructed successfully.
    pub fn get(&self) -> Option<&T> {
        self.outcome.get().and_then(|outcome| outcome.as_ref().ok())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        match self.outcome.get() {
            None => SlotState::Empty,
            Some(Ok(_)) => SlotState::Occupied,
            Some(Err(_)) => SlotState::Failed,
        }
    }

    /// Options the slot was created with.
    pub fn options(&self) -> &SlotOptions {
        &self.options
    }
}

impl<T, F: Fn() -> Result<T>> FallibleSingleton<T, F> {
    /// Create an empty slot with default [`SlotOptions`] (retry on failure).
    pub const fn new(init: F) -> Self {
        Self::with_options(SlotOptions::DEFAULT, init)
    }

    /// Create an empty slot with explicit options.
    pub const fn with_options(options: SlotOptions, init: F) -> Self {
        Self {
            outcome: OnceCell::new(),
            init,
            options,
        }
    }

    /// Return the shared instance, constructing it if needed.
    ///
    /// Once the slot is occupied the initializer never runs again.  What an
    /// error does depends on the slot's [`FailurePolicy`].
    pub fn try_instance(&self) -> Result<&T> {
        let outcome = match self.options.failure_policy {
            FailurePolicy::Retry => self.outcome.get_or_try_init(|| self.construct().map(Ok))?,
            FailurePolicy::Cache => self.outcome.get_or_init(|| self.construct()),
        };
        outcome.as_ref().map_err(Clone::clone)
    }

    fn construct(&self) -> Result<T> {
        let label = self.options.label;
        debug!(slot = label, "constructing singleton instance");
        match (self.init)() {
            Ok(value) => {
                debug!(slot = label, "singleton instance constructed");
                Ok(value)
            }
            Err(err) => {
                warn!(
                    slot = label,
                    policy = self.options.failure_policy.as_str(),
                    error = %err,
                    "singleton construction failed"
                );
                Err(err)
            }
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for FallibleSingleton<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallibleSingleton")
            .field("label", &self.options.label)
            .field("policy", &self.options.failure_policy)
            .field("state", &self.state())
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Initializer that fails for the first `failures` attempts.
    fn flaky(attempts: &AtomicUsize, failures: usize) -> Result<String> {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        if n < failures {
            crate::construction_failed!("attempt {n} refused");
        }
        Ok(format!("ready after {n}"))
    }

    #[test]
    fn success_is_memoized() {
        let attempts = AtomicUsize::new(0);
        let slot = FallibleSingleton::new(|| flaky(&attempts, 0));
        assert_eq!(slot.state(), SlotState::Empty);

        let first = slot.try_instance().unwrap();
        let second = slot.try_instance().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, "ready after 0");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(slot.state(), SlotState::Occupied);
    }

    #[test]
    fn retry_policy_reruns_after_failure() {
        let attempts = AtomicUsize::new(0);
        let slot = FallibleSingleton::new(|| flaky(&attempts, 2));

        assert_eq!(
            slot.try_instance(),
            Err(Error::ConstructionFailed("attempt 0 refused".into()))
        );
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.get().is_none());
        assert!(slot.try_instance().is_err());

        assert_eq!(slot.try_instance().unwrap(), "ready after 2");
        assert_eq!(slot.try_instance().unwrap(), "ready after 2");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn cache_policy_replays_first_error() {
        let attempts = AtomicUsize::new(0);
        let slot = FallibleSingleton::with_options(
            SlotOptions::new("flaky").with_failure_policy(FailurePolicy::Cache),
            || flaky(&attempts, 1),
        );

        let first = slot.try_instance().unwrap_err();
        let second = slot.try_instance().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(slot.state(), SlotState::Failed);
        assert!(slot.get().is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_mentions_policy() {
        let slot: FallibleSingleton<u8> = FallibleSingleton::new(|| Ok(1));
        let text = format!("{slot:?}");
        assert!(text.contains("Retry"));
        assert!(text.contains("Empty"));
    }
}
