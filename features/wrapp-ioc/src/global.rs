use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::container::Container;

// Created on first access, torn down by `reset_current`
static CURRENT: Mutex<Option<Arc<Container>>> = Mutex::new(None);

fn current_slot() -> MutexGuard<'static, Option<Arc<Container>>> {
    CURRENT.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Container {
    /// The process wide container
    ///
    /// Created on first access, every later call returns the same container
    /// until [Container::reset_current] is called.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use wrapp_ioc::Container;
    ///
    /// assert!(Arc::ptr_eq(&Container::current(), &Container::current()));
    /// ```
    pub fn current() -> Arc<Container> {
        current_slot()
            .get_or_insert_with(|| {
                tracing::debug!("Created the global container");
                Arc::new(Container::new())
            })
            .clone()
    }

    /// Drops the process wide container, the next [Container::current] creates a new one
    ///
    /// Returns the container which was torn down, if there was one.
    pub fn reset_current() -> Option<Arc<Container>> {
        let previous = current_slot().take();
        if previous.is_some() {
            tracing::debug!("Reset the global container");
        }
        previous
    }
}
