//! Wrapp Config provides a registry of configs that can be injected in the rest of the
//! modules.
//!
//! Wrapp Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs and install it into a container
//! 2. Config<T>: A wrapper type constructors depend on to receive a config
//!
//! # Examples
//!
//! ```rust
//! use wrapp_config::{config::Config, provider::ConfigProvider};
//! use wrapp_ioc::Container;
//!
//! #[derive(Clone)]
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//!     app_name: String,
//! }
//!
//! let app_config = AppConfig {
//!     host: "localhost".to_string(),
//!     port: 8080_u16,
//!     app_name: "My Awesome App".to_string(),
//! };
//!
//! let mut config_provider = ConfigProvider::new();
//! if let Err(e) = config_provider.add_config(app_config.clone()) {
//!     panic!("{e}");
//! }
//!
//! let retrieved_config = match config_provider.get_config::<AppConfig>() {
//!     Ok(Some(c)) => c,
//!     Ok(None) => panic!("Could not find config type"),
//!     Err(e) => panic!("{e}"),
//! };
//! assert_eq!(app_config.host, retrieved_config.host);
//! assert_eq!(app_config.port, retrieved_config.port);
//!
//! let container = Container::new();
//! config_provider.install(&container);
//!
//! let injected = container.resolve::<Config<AppConfig>>().unwrap();
//! assert_eq!(app_config.app_name, injected.app_name);
//! ```
//!
//! Wrapp Config consists of the following components:
//!
//! 1. Config - for receiving a config as a constructor parameter
//! 2. Provider - for creating a registry of configs, adding and retrieving configs
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;
