use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{registration::RegistrationId, types::Instance};

/// Caches singleton instances per registration
///
/// Instances are built outside of the lock so a constructor can resolve other singletons.
/// If two threads build the same singleton at once, the first one to finish is kept
/// and every caller gets that instance, the other one is dropped.
#[derive(Default)]
pub(crate) struct LifetimeManager {
    instances: Mutex<HashMap<RegistrationId, Instance>>,
}

impl LifetimeManager {
    fn lock(&self) -> MutexGuard<'_, HashMap<RegistrationId, Instance>> {
        // No user code runs while locked, a poisoned map is still consistent
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: RegistrationId) -> Option<Instance> {
        self.lock().get(&id).cloned()
    }

    /// Returns the cached instance or creates and caches it
    ///
    /// `is_live` is checked while the cache is locked. A registration replaced or cleared during
    /// creation hands out its instance once without caching it, so no unreachable entry is left.
    pub fn get_or_create<E>(
        &self,
        id: RegistrationId,
        is_live: impl FnOnce() -> bool,
        create: impl FnOnce() -> Result<Instance, E>,
    ) -> Result<Instance, E> {
        if let Some(instance) = self.get(id) {
            tracing::trace!("Singleton {id:?} served from cache");
            return Ok(instance);
        }

        let created = create()?;

        let mut instances = self.lock();
        if !is_live() {
            tracing::debug!("Registration {id:?} was replaced while building, not caching");
            return Ok(created);
        }
        let cached = instances.entry(id).or_insert_with(|| {
            tracing::debug!("Cached singleton {:?} of {}", id, created.info.type_name);
            created.clone()
        });
        Ok(cached.clone())
    }

    pub fn invalidate(&self, id: RegistrationId) {
        self.lock().remove(&id);
    }

    pub fn clear_all(&self) {
        self.lock().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
