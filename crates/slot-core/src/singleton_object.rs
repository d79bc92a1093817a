//! The classic `SingletonObject`.
//!
//! A type whose only constructor is private and whose single instance is
//! reached through [`SingletonObject::instance`].  Every construction bumps a
//! process-wide counter so callers can check that the constructor really ran
//! only once.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::patterns::singleton::Singleton;

static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

static OBJECT: Singleton<SingletonObject> =
    Singleton::with_label("SingletonObject", SingletonObject::construct);

/// Generic implementation of a singleton.
#[derive(Debug)]
pub struct SingletonObject {
    serial: usize,
}

impl SingletonObject {
    // Private: the only way to obtain a `SingletonObject` is `instance()`.
    fn construct() -> Self {
        let serial = CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst) + 1;
        Self { serial }
    }

    /// Returns the singleton instance.
    pub fn instance() -> &'static SingletonObject {
        OBJECT.instance()
    }

    /// Number of times the private constructor has run in this process.
    pub fn constructions() -> usize {
        CONSTRUCTIONS.load(Ordering::SeqCst)
    }

    /// Which construction produced this object (1 for the first).
    pub fn serial(&self) -> usize {
        self.serial
    }
}
