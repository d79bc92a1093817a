//! Type-keyed registry of singletons.
//!
//! A [`SingletonRegistry`] keeps one slot per Rust type, so unrelated
//! singleton types share the same construct-once machinery without each
//! declaring its own `static`.  Slots are created on demand and never
//! removed.
//!
//! The map lock is only held while a slot is looked up or inserted.  The
//! payload is built afterwards under that slot's own once-cell, so an
//! initializer may itself ask the registry for a *different* type.  Asking
//! for its own type from inside its initializer deadlocks.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::errors::Result;
use crate::patterns::singleton::Singleton;

type Instance = Arc<dyn Any + Send + Sync>;
type Slot = Arc<OnceCell<Instance>>;

static GLOBAL: Singleton<SingletonRegistry> =
    Singleton::with_label("global-registry", SingletonRegistry::new);

/// At most one instance per type, shared as `Arc<T>`.
///
/// # Example
/// ```
/// use slot_core::patterns::registry::SingletonRegistry;
///
/// struct Config { verbose: bool }
///
/// let registry = SingletonRegistry::new();
/// let a = registry.instance(|| Config { verbose: true });
/// let b = registry.instance(|| Config { verbose: false });
/// assert!(b.verbose);
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Default)]
pub struct SingletonRegistry {
    slots: RwLock<HashMap<TypeId, Slot>>,
}

impl SingletonRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, itself held in a [`Singleton`].
    pub fn global() -> &'static Self {
        GLOBAL.instance()
    }

    /// Return the `T` instance, constructing it with `init` if absent.
    ///
    /// `init` is dropped unused when another caller got there first.
    pub fn instance<T, F>(&self, init: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let slot = self.slot::<T>();
        let erased = slot.get_or_init(|| {
            debug!(slot = type_name::<T>(), "constructing singleton instance");
            Arc::new(init()) as Instance
        });
        downcast(erased)
    }

    /// Fallible variant of [`instance`](Self::instance).
    ///
    /// Failures are never cached: the slot stays empty and a later call may
    /// try again.
    pub fn try_instance<T, F>(&self, init: F) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T>,
    {
        let slot = self.slot::<T>();
        let erased = slot.get_or_try_init(|| {
            debug!(slot = type_name::<T>(), "constructing singleton instance");
            match init() {
                Ok(value) => Ok(Arc::new(value) as Instance),
                Err(err) => {
                    warn!(
                        slot = type_name::<T>(),
                        policy = "retry",
                        error = %err,
                        "singleton construction failed"
                    );
                    Err(err)
                }
            }
        })?;
        Ok(downcast(erased))
    }

    /// Return the `T` instance if it has been constructed.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let slots = self.slots.read();
        slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.get())
            .map(downcast)
    }

    /// Return `true` if a `T` instance has been constructed.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.slots
            .read()
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of constructed instances.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Return `true` if nothing has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot<T: Any>(&self) -> Slot {
        let key = TypeId::of::<T>();
        if let Some(slot) = self.slots.read().get(&key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        let slot = slots.entry(key).or_insert_with(|| {
            trace!(slot = type_name::<T>(), "registering singleton slot");
            Slot::default()
        });
        Arc::clone(slot)
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("occupied", &self.len())
            .finish()
    }
}

fn downcast<T: Any + Send + Sync>(erased: &Instance) -> Arc<T> {
    match Arc::clone(erased).downcast::<T>() {
        Ok(instance) => instance,
        Err(_) => unreachable!("registry slot for {} holds another type", type_name::<T>()),
    }
}
