//! Lazily-constructed, single-instance holder.
//!
//! A [`Singleton`] owns one slot.  The slot starts empty, is filled by the
//! first call to [`Singleton::instance`], and is never cleared or replaced
//! afterwards.  Initialisation is guarded by `std::sync::OnceLock`, so any
//! number of concurrent first callers observe exactly one construction and
//! the same, fully-initialised value.
//!
//! Holders are ordinary values: place one in a `static` for process-wide
//! scope (see [`define_singleton!`](crate::define_singleton)) or own it
//! locally when isolation matters, e.g. in tests.

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use tracing::debug;

use crate::settings::SlotOptions;

/// Observable lifecycle of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Nothing has been constructed yet.
    Empty,
    /// The instance exists and will be returned by every access.
    Occupied,
    /// A construction failed and the failure was cached
    /// ([`FailurePolicy::Cache`](crate::settings::FailurePolicy::Cache) only).
    Failed,
}

/// A slot holding at most one instance of `T`, built on first access by `F`.
///
/// The initializer is an `Fn` rather than an `FnOnce`: if it panics the slot
/// stays [`SlotState::Empty`] and the next caller runs it again.
///
/// # Example
/// ```
/// use slot_core::patterns::singleton::{Singleton, SlotState};
///
/// static GREETING: Singleton<String> = Singleton::new(|| "hello".to_owned());
///
/// assert_eq!(GREETING.state(), SlotState::Empty);
/// let first: *const String = GREETING.instance();
/// let second: *const String = GREETING.instance();
/// assert_eq!(first, second);
/// assert_eq!(GREETING.len(), 5); // `Deref` goes through `instance()`
/// ```
pub struct Singleton<T, F = fn() -> T> {
    cell: OnceLock<T>,
    init: F,
    options: SlotOptions,
}

impl<T, F> Singleton<T, F> {
    /// Return the instance if it has already been constructed.
    ///
    /// Never runs the initializer.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Return `true` once the slot is occupied.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Current lifecycle state.  Never [`SlotState::Failed`].
    pub fn state(&self) -> SlotState {
        if self.is_initialized() {
            SlotState::Occupied
        } else {
            SlotState::Empty
        }
    }

    /// Options the slot was created with.
    pub fn options(&self) -> &SlotOptions {
        &self.options
    }
}

impl<T, F: Fn() -> T> Singleton<T, F> {
    /// Create an empty slot with default [`SlotOptions`].
    pub const fn new(init: F) -> Self {
        Self::with_options(SlotOptions::DEFAULT, init)
    }

    /// Create an empty slot whose log events carry `label`.
    pub const fn with_label(label: &'static str, init: F) -> Self {
        Self::with_options(SlotOptions::new(label), init)
    }

    /// Create an empty slot with explicit options.
    ///
    /// The failure policy is ignored here since construction cannot fail.
    pub const fn with_options(options: SlotOptions, init: F) -> Self {
        Self {
            cell: OnceLock::new(),
            init,
            options,
        }
    }

    /// Return the shared instance, constructing it on the first call.
    ///
    /// Every call returns a reference to the same object.  When several
    /// threads race on an empty slot one of them runs the initializer while
    /// the others block until it completes.
    pub fn instance(&self) -> &T {
        self.cell.get_or_init(|| {
            debug!(slot = self.options.label, "constructing singleton instance");
            let value = (self.init)();
            debug!(slot = self.options.label, "singleton instance constructed");
            value
        })
    }

    /// Construct the instance now if it is not already there.
    ///
    /// Call this during start-up to trade laziness for a predictable
    /// construction point.  Written as an associated function, like
    /// `LazyLock::force`, so it never shadows a method on `T`.
    pub fn force(this: &Self) -> &T {
        this.instance()
    }
}

impl<T, F: Fn() -> T> Deref for Singleton<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        self.instance()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Singleton<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("label", &self.options.label)
            .field("state", &self.state())
            .field("value", &self.get())
            .finish()
    }
}

/// Declare a process-wide singleton of type `$ty`.
///
/// Expands to a `static` [`Singleton`] labelled with the static's own name.
/// The instance is constructed from `$init` on first access.
///
/// # Example
/// ```
/// use slot_core::define_singleton;
///
/// struct Registry { data: Vec<String> }
/// define_singleton!(pub REGISTRY, Registry, Registry { data: Vec::new() });
///
/// assert!(REGISTRY.data.is_empty());
/// assert_eq!(REGISTRY.options().label, "REGISTRY");
/// ```
#[macro_export]
macro_rules! define_singleton {
    ($vis:vis $name:ident, $ty:ty, $init:expr) => {
        /// Lazily-initialised global singleton.
        $vis static $name: $crate::patterns::singleton::Singleton<$ty> =
            $crate::patterns::singleton::Singleton::with_label(stringify!($name), || $init);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl Fn() -> Vec<u32> {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3]
        }
    }

    #[test]
    fn lazy_until_first_access() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slot = Singleton::new(counting(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(slot.get().is_none());

        slot.instance();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(slot.state(), SlotState::Occupied);
    }

    #[test]
    fn same_instance_every_call() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slot = Singleton::new(counting(&counter));
        let first = slot.instance();
        for _ in 0..10 {
            assert!(std::ptr::eq(first, slot.instance()));
        }
        assert!(std::ptr::eq(first, slot.get().unwrap()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deref_and_force_share_the_slot() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slot = Singleton::with_label("numbers", counting(&counter));
        let forced = Singleton::force(&slot);
        assert_eq!(slot.len(), 3);
        assert!(std::ptr::eq(forced, &*slot));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_initializer_leaves_slot_empty() {
        let attempts = AtomicUsize::new(0);
        let slot = Singleton::new(|| {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first attempt fails");
            }
            7_u8
        });

        let outcome = catch_unwind(AssertUnwindSafe(|| *slot.instance()));
        assert!(outcome.is_err());
        assert_eq!(slot.state(), SlotState::Empty);

        assert_eq!(*slot.instance(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_output() {
        let slot: Singleton<u8> = Singleton::with_label("answer", || 42);
        let before = format!("{slot:?}");
        assert!(before.contains("answer"));
        assert!(before.contains("Empty"));
        slot.instance();
        let after = format!("{slot:?}");
        assert!(after.contains("Occupied"));
        assert!(after.contains("42"));
    }

    define_singleton!(LOCAL_TABLE, Vec<&'static str>, vec!["a", "b"]);

    #[test]
    fn macro_declares_labelled_static() {
        assert_eq!(LOCAL_TABLE.options().label, "LOCAL_TABLE");
        assert_eq!(LOCAL_TABLE.instance().as_slice(), ["a", "b"]);
    }
}
