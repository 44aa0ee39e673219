use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    constructor::{Constructible, Implementation},
    container::ResolveHandle,
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// Policy governing instance reuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// A new instance is produced for every resolution
    #[default]
    PerCall,
    /// The first successfully produced instance is cached and handed out from then on
    Singleton,
}

/// Requested type plus an optional name
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RegistrationKey {
    pub type_info: TypeInfo,
    pub name: Option<String>,
}
impl std::fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (named '{}')", self.type_info, name),
            None => write!(f, "{}", self.type_info),
        }
    }
}
impl RegistrationKey {
    pub fn new(type_info: TypeInfo, name: Option<&str>) -> Self {
        RegistrationKey {
            type_info,
            name: name.map(str::to_string),
        }
    }

    pub fn of<T: ?Sized + 'static>(name: Option<&str>) -> Self {
        Self::new(TypeInfo::of::<T>(), name)
    }

    /// The same type without a name
    pub fn unnamed(&self) -> Self {
        RegistrationKey {
            type_info: self.type_info,
            name: None,
        }
    }
}

/// Identity of a single registration, a replacement gets a new one
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegistrationId(u64);
impl RegistrationId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        RegistrationId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Type erased factory stored in a registration
pub type FactoryFn =
    dyn Fn(&mut ResolveHandle<'_>) -> Result<Instance, DynError> + Send + Sync;

fn erase_factory<F>(factory: F) -> Arc<FactoryFn>
where
    F: Fn(&mut ResolveHandle<'_>) -> Result<Instance, DynError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// How a registration produces its instances
#[derive(Clone)]
pub enum Producer {
    /// Construct an implementation type through one of its constructors
    Implementation(Arc<Implementation>),
    /// The factory fully owns construction, no parameters are injected
    Factory(Arc<FactoryFn>),
}
impl Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Producer::Implementation(implementation) => f
                .debug_tuple("Implementation")
                .field(&implementation.info().type_name)
                .finish(),
            Producer::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// Describes how a requested type is produced and how long its instances live
///
/// ```rust
/// use std::sync::Arc;
/// use wrapp_ioc::{Constructible, Constructor, Container, Registration};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "Hello".to_string()
///     }
/// }
/// impl Constructible for English {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
///
/// let container = Container::new();
/// container.register(Registration::implementation_as::<dyn Greeter, English>(|it| it).singleton());
///
/// let greeter = container.resolve::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "Hello");
/// ```
#[derive(Debug)]
pub struct Registration {
    id: RegistrationId,
    key: RegistrationKey,
    producer: Producer,
    lifetime: Lifetime,
}

/// A clone is a separate registration with its own identity, so it never shares a cached singleton
impl Clone for Registration {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.producer.clone(), self.lifetime)
    }
}

impl Registration {
    fn new(key: RegistrationKey, producer: Producer, lifetime: Lifetime) -> Self {
        Registration {
            id: RegistrationId::next(),
            key,
            producer,
            lifetime,
        }
    }

    /// Registers a concrete type as itself
    pub fn implementation<T: Constructible>() -> Self {
        Self::new(
            RegistrationKey::of::<T>(None),
            Producer::Implementation(Arc::new(Implementation::of::<T>())),
            Lifetime::default(),
        )
    }

    /// Registers the concrete type `T` as the producer of `I`
    ///
    /// `upcast` turns the constructed `Arc<T>` into an `Arc<I>`, for trait objects `|it| it` is enough.
    pub fn implementation_as<I, T>(
        upcast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    ) -> Self
    where
        I: ?Sized + Injectable,
        T: Constructible,
    {
        Self::new(
            RegistrationKey::of::<I>(None),
            Producer::Implementation(Arc::new(Implementation::of_as::<I, T>(upcast))),
            Lifetime::default(),
        )
    }

    /// Registers a factory producing `I`
    ///
    /// The factory receives a [ResolveHandle] to resolve its own dependencies.
    pub fn factory<I: ?Sized + Injectable>(
        factory: impl Fn(&mut ResolveHandle<'_>) -> Result<Arc<I>, DynError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            RegistrationKey::of::<I>(None),
            Producer::Factory(erase_factory(move |handle| {
                factory(handle).map(Instance::new)
            })),
            Lifetime::default(),
        )
    }

    /// Registers an already created instance, always handed out as a singleton
    pub fn instance<I: ?Sized + Injectable>(instance: Arc<I>) -> Self {
        Self::from_instance(Instance::new(instance))
    }

    /// Registers a type erased instance under the type it carries
    pub fn from_instance(instance: Instance) -> Self {
        let key = RegistrationKey::new(instance.info, None);
        let factory = erase_factory(move |_| Ok(instance.clone()));
        Self::new(key, Producer::Factory(factory), Lifetime::Singleton)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.key.name = Some(name.into());
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn singleton(self) -> Self {
        self.with_lifetime(Lifetime::Singleton)
    }

    pub fn per_call(self) -> Self {
        self.with_lifetime(Lifetime::PerCall)
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn key(&self) -> &RegistrationKey {
        &self.key
    }

    pub fn producer(&self) -> &Producer {
        &self.producer
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}
