use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::registration::{Registration, RegistrationKey};

type Registrations = HashMap<RegistrationKey, Arc<Registration>>;

/// Registrations by requested type and name
///
/// Holds no resolution logic, lookups and mutations are serialized by a single RwLock.
#[derive(Default)]
pub(crate) struct RegistrationStore {
    registrations: RwLock<Registrations>,
}

impl RegistrationStore {
    fn read(&self) -> RwLockReadGuard<'_, Registrations> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registrations> {
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts the registration, returning the one it replaced
    pub fn register(&self, registration: Registration) -> Option<Arc<Registration>> {
        let key = registration.key().clone();
        self.write().insert(key, Arc::new(registration))
    }

    /// Inserts the registration only if its key is free
    ///
    /// Hands the registration back if the key is taken.
    pub fn try_register(&self, registration: Registration) -> Result<(), Registration> {
        let mut registrations = self.write();
        if registrations.contains_key(registration.key()) {
            return Err(registration);
        }

        registrations.insert(registration.key().clone(), Arc::new(registration));
        Ok(())
    }

    pub fn lookup(&self, key: &RegistrationKey) -> Option<Arc<Registration>> {
        self.read().get(key).cloned()
    }

    /// True if `registration` is still the one stored under its key
    pub fn is_current(&self, registration: &Registration) -> bool {
        self.read()
            .get(registration.key())
            .is_some_and(|stored| stored.id() == registration.id())
    }

    /// Removes all registrations, returning how many there were
    pub fn clear(&self) -> usize {
        let mut registrations = self.write();
        let count = registrations.len();
        registrations.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Snapshot of all registrations, ordered by key for stable output
    pub fn all(&self) -> Vec<Arc<Registration>> {
        let mut all: Vec<_> = self.read().values().cloned().collect();
        all.sort_by(|a, b| {
            (a.key().type_info.type_name, &a.key().name)
                .cmp(&(b.key().type_info.type_name, &b.key().name))
        });
        all
    }
}
