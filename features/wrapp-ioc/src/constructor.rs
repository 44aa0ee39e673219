use std::{fmt::Debug, sync::Arc};

use crate::{
    errors::ArgumentError,
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// A concrete type the container can build on its own
///
/// Rust has no runtime reflection, so a type declares its constructors up front:
/// which parameters each one needs and how to build the type from the resolved arguments.
/// Constructors are returned in declaration order, which breaks ties between
/// constructors with the same number of parameters.
///
/// ```rust
/// use std::sync::Arc;
/// use wrapp_ioc::{Constructible, Constructor, Container, Parameter};
///
/// #[derive(Default)]
/// struct Clock;
/// impl Constructible for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
///
/// struct Scheduler {
///     clock: Arc<Clock>,
/// }
/// impl Constructible for Scheduler {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(
///             vec![Parameter::concrete::<Clock>("clock")],
///             |args| Ok(Scheduler { clock: args.get("clock")? }),
///         )]
///     }
/// }
///
/// let scheduler = Container::new().build::<Scheduler>().unwrap();
/// # let _ = &scheduler.clock;
/// ```
pub trait Constructible: Injectable + Sized {
    fn constructors() -> Vec<Constructor<Self>>;
}

type BuildFn<T> = dyn Fn(&Arguments) -> Result<T, DynError> + Send + Sync;

/// One way of constructing `T`
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    build: Box<BuildFn<T>>,
}
impl<T> Debug for Constructor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl<T: Injectable> Constructor<T> {
    pub fn new(
        parameters: Vec<Parameter>,
        build: impl Fn(&Arguments) -> Result<T, DynError> + Send + Sync + 'static,
    ) -> Self {
        Constructor {
            parameters,
            build: Box::new(build),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}
impl<T: Injectable + Default> Constructor<T> {
    /// Parameterless constructor using [Default]
    pub fn from_default() -> Self {
        Self::new(Vec::new(), |_| Ok(T::default()))
    }
}

/// A named constructor parameter and its declared type
#[derive(Clone)]
pub struct Parameter {
    name: &'static str,
    type_info: TypeInfo,
    /// Set if the type can be built without a registration
    implementation: Option<fn() -> Implementation>,
    /// Injected if the type can not be resolved
    default: Option<Instance>,
}
impl Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("type", &self.type_info.type_name)
            .field("concrete", &self.implementation.is_some())
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

impl Parameter {
    /// A parameter which has to be registered or supplied as an override
    pub fn new<T: ?Sized + Injectable>(name: &'static str) -> Self {
        Parameter {
            name,
            type_info: TypeInfo::of::<T>(),
            implementation: None,
            default: None,
        }
    }

    /// A parameter which falls back to `T`'s own constructors if `T` is not registered
    pub fn concrete<T: Constructible>(name: &'static str) -> Self {
        Parameter {
            implementation: Some(Implementation::of::<T>),
            ..Self::new::<T>(name)
        }
    }

    /// A parameter using `default` whenever `T` can not be resolved
    pub fn optional<T: Injectable>(name: &'static str, default: T) -> Self {
        Parameter {
            default: Some(Instance::new(Arc::new(default))),
            ..Self::new::<T>(name)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    pub(crate) fn implementation(&self) -> Option<fn() -> Implementation> {
        self.implementation
    }

    pub(crate) fn default_value(&self) -> Option<&Instance> {
        self.default.as_ref()
    }
}

/// The resolved arguments handed to a constructor, looked up by parameter name
#[derive(Debug, Default)]
pub struct Arguments {
    values: Vec<(&'static str, Instance)>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<(&'static str, Instance)>) -> Self {
        Arguments { values }
    }

    /// The shared value of the argument `name`
    pub fn get<T: ?Sized + Injectable>(&self, name: &str) -> Result<Arc<T>, ArgumentError> {
        let (_, instance) = self
            .values
            .iter()
            .find(|(parameter, _)| *parameter == name)
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))?;

        instance
            .downcast::<T>()
            .map_err(|actual_type| ArgumentError::WrongType {
                name: name.to_string(),
                expected_type: std::any::type_name::<T>(),
                actual_type,
            })
    }

    /// An owned copy of the argument `name`, mostly for plain values like numbers and strings
    pub fn value<T: Injectable + Clone>(&self, name: &str) -> Result<T, ArgumentError> {
        self.get::<T>(name).map(|value| T::clone(&value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A constructor with its result type erased
pub(crate) struct Candidate {
    parameters: Vec<Parameter>,
    build: Box<dyn Fn(&Arguments) -> Result<Instance, DynError> + Send + Sync>,
}
impl Candidate {
    pub(crate) fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

/// All constructors of a concrete type, producing instances of the requested type
pub struct Implementation {
    info: TypeInfo,
    candidates: Vec<Candidate>,
}
impl Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation")
            .field("type", &self.info.type_name)
            .field("constructors", &self.candidates.len())
            .finish()
    }
}

impl Implementation {
    /// Constructs `T` and hands it out as `T`
    pub fn of<T: Constructible>() -> Self {
        Self::erase(|value: T| Instance::new(Arc::new(value)))
    }

    /// Constructs `T` and hands it out as `I`
    pub fn of_as<I, T>(upcast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
    where
        I: ?Sized + Injectable,
        T: Constructible,
    {
        Self::erase(move |value: T| Instance::new(upcast(Arc::new(value))))
    }

    fn erase<T: Constructible>(wrap: impl Fn(T) -> Instance + Send + Sync + 'static) -> Self {
        let wrap = Arc::new(wrap);
        let candidates = T::constructors()
            .into_iter()
            .map(|Constructor { parameters, build }| {
                let wrap = wrap.clone();
                Candidate {
                    parameters,
                    build: Box::new(move |arguments: &Arguments| build(arguments).map(&*wrap)),
                }
            })
            .collect();

        Implementation {
            info: TypeInfo::of::<T>(),
            candidates,
        }
    }

    /// The concrete type being constructed
    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub(crate) fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Invokes the constructor at `index` with already resolved arguments
    pub(crate) fn construct(&self, index: usize, arguments: &Arguments) -> Result<Instance, DynError> {
        let candidate = self
            .candidates
            .get(index)
            .ok_or_else(|| format!("'{}' has no constructor #{index}", self.info))?;

        (candidate.build)(arguments)
    }
}
