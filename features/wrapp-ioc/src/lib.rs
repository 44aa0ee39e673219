//! Wrapp IoC is a runtime service registry and dependency resolver.
//!
//! Types are registered with a [Container] describing how they are produced,
//! later they are requested and the container builds the whole object graph:
//! it finds registrations, picks constructors, resolves their parameters recursively,
//! caches singletons and detects circular dependencies.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use wrapp_ioc::{Constructible, Constructor, Container, Overrides, Parameter, Registration};
//!
//! trait Storage: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! #[derive(Default)]
//! struct MemoryStorage;
//! impl Storage for MemoryStorage {
//!     fn name(&self) -> &str {
//!         "memory"
//!     }
//! }
//! impl Constructible for MemoryStorage {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::from_default()]
//!     }
//! }
//!
//! struct UserService {
//!     storage: Arc<dyn Storage>,
//!     page_size: u32,
//! }
//! impl Constructible for UserService {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(
//!             vec![
//!                 Parameter::new::<dyn Storage>("storage"),
//!                 Parameter::new::<u32>("page_size"),
//!             ],
//!             |args| {
//!                 Ok(UserService {
//!                     storage: args.get("storage")?,
//!                     page_size: args.value("page_size")?,
//!                 })
//!             },
//!         )]
//!     }
//! }
//!
//! let container = Container::new();
//! container.register(Registration::implementation_as::<dyn Storage, MemoryStorage>(|it| it).singleton());
//! container.register(Registration::implementation::<UserService>());
//!
//! // `page_size` can't be resolved by type, the caller has to supply it
//! assert!(!container.can_resolve::<UserService>());
//!
//! let overrides = Overrides::new().with("page_size", 50_u32);
//! let service = container.resolve_with::<UserService>(None, &overrides).unwrap();
//! assert_eq!(service.storage.name(), "memory");
//! assert_eq!(service.page_size, 50);
//! ```
//!
//! Wrapp IoC consists of the following components:
//!
//! 1. Registration - describes how a type is produced and how long instances live
//! 2. Constructor - the constructors a concrete type declares, replacing runtime reflection
//! 3. Container - stores registrations and resolves types, see also [ResolveHandle] for factories
//! 4. Overrides - named values the caller hands to the requested type's constructor
//! 5. Errors - for resolution, registration and validation errors

pub mod constructor;
pub mod container;
pub mod errors;
mod global;
mod lifetime;
pub mod overrides;
pub mod registration;
mod selector;
mod store;
pub mod types;
mod validation;

pub use constructor::{Arguments, Constructible, Constructor, Implementation, Parameter};
pub use container::{Container, ResolveHandle};
pub use errors::{
    ArgumentError, RegistrationError, ResolutionError, UnresolvedParameter, ValidationError,
    ValidationErrors,
};
pub use overrides::Overrides;
pub use registration::{Lifetime, Producer, Registration, RegistrationId, RegistrationKey};
pub use types::{DynError, Injectable, Instance, TypeInfo};
