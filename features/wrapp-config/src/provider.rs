use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use wrapp_ioc::{types::TypeInfo, Container, Injectable, Registration};

use crate::{config::Config, errors::ConfigError};

type AnyConfig = Arc<dyn Any + Send + Sync + 'static>;

struct ConfigEntry {
    info: TypeInfo,
    value: AnyConfig,
    /// Builds the `Config<T>` registration for the erased value
    registration: fn(&AnyConfig) -> Option<Registration>,
}

fn config_registration<T: Injectable>(value: &AnyConfig) -> Option<Registration> {
    let config = value.clone().downcast::<T>().ok()?;
    Some(Registration::instance(Arc::new(Config::new(config))))
}

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, ConfigEntry>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    ///
    /// Returns `Ok(None)` if no config of that type was added
    pub fn get_config<T: Injectable>(&self) -> Result<Option<Arc<T>>, ConfigError> {
        self.configs
            .get(&TypeId::of::<T>())
            .map(|entry| {
                entry
                    .value
                    .clone()
                    .downcast::<T>()
                    .map_err(|_| ConfigError::TypeMismatch(TypeInfo::of::<T>()))
            })
            .transpose()
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Injectable>(&mut self, config: T) -> Result<&mut Self, ConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info.type_id) {
            return Err(ConfigError::AlreadyRegistered(info));
        }

        tracing::debug!("Added config {info}");
        self.configs.insert(
            info.type_id,
            ConfigEntry {
                info,
                value: Arc::new(config),
                registration: config_registration::<T>,
            },
        );
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Injectable>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    /// Registers every config as a singleton `Config<T>` in `container`
    ///
    /// Configs installed earlier are replaced.
    pub fn install(&self, container: &Container) {
        for entry in self.configs.values() {
            match (entry.registration)(&entry.value) {
                Some(registration) => container.register(registration),
                None => tracing::warn!("Config {} could not be installed", entry.info),
            }
        }
        tracing::debug!("Installed {} configs", self.configs.len());
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
