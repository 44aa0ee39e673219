use std::{ops::Deref, sync::Arc};

use wrapp_ioc::{Injectable, Parameter};

/// A wrapper type to allow for config injections
///
/// Once a [ConfigProvider](crate::provider::ConfigProvider) is installed into a container,
/// every config it holds can be requested as `Config<T>` by a constructor.
///
/// # Example
/// ```rust
/// use wrapp_config::{config::Config, provider::ConfigProvider};
/// use wrapp_ioc::{Constructible, Constructor, Container, Registration};
///
/// pub struct MyModuleConfig {
///     enabled: bool,
/// }
///
/// pub struct MyModule {
///     config: Config<MyModuleConfig>,
/// }
/// impl Constructible for MyModule {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(
///             vec![Config::<MyModuleConfig>::parameter("config")],
///             |args| {
///                 Ok(MyModule {
///                     config: args.value("config")?,
///                 })
///             },
///         )]
///     }
/// }
///
/// let mut config_provider = ConfigProvider::new();
/// config_provider.add_config(MyModuleConfig { enabled: true }).unwrap();
///
/// let container = Container::new();
/// config_provider.install(&container);
/// container.register(Registration::implementation::<MyModule>());
///
/// assert!(container.resolve::<MyModule>().unwrap().config.enabled);
/// ```
pub struct Config<T: ?Sized> {
    inner: Arc<T>,
}
impl<T: ?Sized> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T: ?Sized> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T: ?Sized> Config<T> {
    pub(crate) fn new(inner: Arc<T>) -> Self {
        Config { inner }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: ?Sized + Injectable> Config<T> {
    /// A constructor parameter receiving this config
    pub fn parameter(name: &'static str) -> Parameter {
        Parameter::new::<Config<T>>(name)
    }
}
