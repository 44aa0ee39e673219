use std::{fmt::Debug, sync::Arc};

use crate::{
    constructor::{Arguments, Constructible, Implementation},
    errors::{RegistrationError, ResolutionError},
    lifetime::LifetimeManager,
    overrides::Overrides,
    registration::{Lifetime, Producer, Registration, RegistrationKey},
    selector,
    store::RegistrationStore,
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// Registry of how types are produced, resolving them into fully built object graphs
///
/// The container is meant to be shared, every operation takes `&self` and is thread safe.
#[derive(Default)]
pub struct Container {
    pub(crate) store: RegistrationStore,
    pub(crate) lifetimes: LifetimeManager,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        for registration in self.store.all() {
            let lifetime = match registration.lifetime() {
                Lifetime::PerCall => "per call",
                Lifetime::Singleton => "singleton",
            };
            map.field(registration.key().type_info.type_name, &lifetime);
        }
        map.finish()
    }
}

/// A type to resolve, and how to build it if nothing is registered
#[derive(Clone)]
pub(crate) struct Request {
    pub key: RegistrationKey,
    pub fallback: Option<fn() -> Implementation>,
}
impl Request {
    fn of<T: ?Sized + Injectable>(name: Option<&str>) -> Self {
        Request {
            key: RegistrationKey::of::<T>(name),
            fallback: None,
        }
    }

    fn constructible<T: Constructible>(name: Option<&str>) -> Self {
        Request {
            key: RegistrationKey::of::<T>(name),
            fallback: Some(Implementation::of::<T>),
        }
    }
}

/// State of one top level resolution
///
/// Never shared, so concurrent resolutions of the same type can't trip each other's cycle detection.
#[derive(Debug, Default)]
pub(crate) struct ResolutionContext {
    /// Keys currently being resolved, outermost first
    visiting: Vec<RegistrationKey>,
}
impl ResolutionContext {
    /// Marks `key` as being resolved for the duration of `f`
    fn visit<R>(
        &mut self,
        key: &RegistrationKey,
        f: impl FnOnce(&mut Self) -> Result<R, ResolutionError>,
    ) -> Result<R, ResolutionError> {
        if self.visiting.contains(key) {
            let mut chain = self.visiting.clone();
            chain.push(key.clone());
            return Err(ResolutionError::CircularDependency {
                requested: key.clone(),
                chain,
            });
        }

        self.visiting.push(key.clone());
        let result = f(self);
        self.visiting.pop();
        result
    }
}

/// Validated way of producing an instance - nothing has been constructed yet
#[derive(Debug)]
pub(crate) enum Plan {
    /// A singleton which is already cached
    Cached(Instance),
    /// An override or a parameter default
    Provided(Instance),
    Factory {
        registration: Arc<Registration>,
    },
    Construct {
        key: RegistrationKey,
        registration: Option<Arc<Registration>>,
        implementation: Arc<Implementation>,
        candidate: usize,
        arguments: Vec<(&'static str, Plan)>,
    },
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers how a type is produced, replacing any registration with the same type and name
    pub fn register(&self, registration: Registration) {
        let key = registration.key().clone();
        let lifetime = registration.lifetime();

        match self.store.register(registration) {
            Some(replaced) => {
                self.lifetimes.invalidate(replaced.id());
                tracing::debug!("Replaced registration of {key} ({lifetime:?})");
            }
            None => tracing::debug!("Registered {key} ({lifetime:?})"),
        }
    }

    /// Registers how a type is produced, failing if the type and name are already taken
    pub fn try_register(&self, registration: Registration) -> Result<(), RegistrationError> {
        let key = registration.key().clone();
        self.store.try_register(registration).map_err(|_| {
            tracing::debug!("Refused duplicate registration of {key}");
            RegistrationError::AlreadyRegistered(key.clone())
        })?;

        tracing::debug!("Registered {key}");
        Ok(())
    }

    pub fn is_registered<T: ?Sized + Injectable>(&self, name: Option<&str>) -> bool {
        self.store.lookup(&RegistrationKey::of::<T>(name)).is_some()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all registrations and drops all cached singletons
    pub fn clear_types(&self) {
        let removed = self.store.clear();
        self.lifetimes.clear_all();
        tracing::debug!("Cleared {removed} registrations");
    }

    /// Resolves a registered type
    ///
    /// Unregistered types fail with [ResolutionError::UnregisteredAbstractType], concrete ones included.
    /// Use [Container::build] to construct an unregistered [Constructible] type from its own constructors.
    pub fn resolve<T: ?Sized + Injectable>(&self) -> Result<Arc<T>, ResolutionError> {
        self.resolve_with(None, &Overrides::default())
    }

    pub fn resolve_named<T: ?Sized + Injectable>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, ResolutionError> {
        self.resolve_with(Some(name), &Overrides::default())
    }

    /// Resolves a registered type, passing `overrides` to its constructor
    pub fn resolve_with<T: ?Sized + Injectable>(
        &self,
        name: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Arc<T>, ResolutionError> {
        let instance = self.resolve_request(&Request::of::<T>(name), overrides)?;
        downcast(instance)
    }

    /// Resolves `T`, constructing it from its own constructors if it is not registered
    pub fn build<T: Constructible>(&self) -> Result<Arc<T>, ResolutionError> {
        self.build_with(None, &Overrides::default())
    }

    pub fn build_with<T: Constructible>(
        &self,
        name: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Arc<T>, ResolutionError> {
        let instance = self.resolve_request(&Request::constructible::<T>(name), overrides)?;
        downcast(instance)
    }

    /// True exactly if [Container::resolve] would succeed, without constructing anything
    pub fn can_resolve<T: ?Sized + Injectable>(&self) -> bool {
        self.can_resolve_with::<T>(None, &Overrides::default())
    }

    pub fn can_resolve_with<T: ?Sized + Injectable>(
        &self,
        name: Option<&str>,
        overrides: &Overrides,
    ) -> bool {
        self.check_request(&Request::of::<T>(name), overrides)
    }

    /// True exactly if [Container::build] would succeed, without constructing anything
    pub fn can_build<T: Constructible>(&self) -> bool {
        self.can_build_with::<T>(None, &Overrides::default())
    }

    pub fn can_build_with<T: Constructible>(
        &self,
        name: Option<&str>,
        overrides: &Overrides,
    ) -> bool {
        self.check_request(&Request::constructible::<T>(name), overrides)
    }

    fn resolve_request(
        &self,
        request: &Request,
        overrides: &Overrides,
    ) -> Result<Instance, ResolutionError> {
        let mut context = ResolutionContext::default();
        let result = self.resolve_in(request, Some(overrides), &mut context);

        match &result {
            Ok(_) => tracing::debug!("Resolved {}", request.key),
            Err(error) => tracing::debug!("Failed to resolve {}: {error}", request.key),
        }
        result
    }

    fn check_request(&self, request: &Request, overrides: &Overrides) -> bool {
        let mut context = ResolutionContext::default();
        self.plan(request, Some(overrides), &mut context).is_ok()
    }

    /// Plans and executes a request within an existing resolution
    pub(crate) fn resolve_in(
        &self,
        request: &Request,
        overrides: Option<&Overrides>,
        context: &mut ResolutionContext,
    ) -> Result<Instance, ResolutionError> {
        let plan = self.plan(request, overrides, context)?;
        self.execute(plan, context)
    }
}

// Planning - decides how everything will be built without building anything
impl Container {
    pub(crate) fn plan(
        &self,
        request: &Request,
        overrides: Option<&Overrides>,
        context: &mut ResolutionContext,
    ) -> Result<Plan, ResolutionError> {
        context.visit(&request.key, |context| {
            self.plan_visiting(request, overrides, context)
        })
    }

    fn plan_visiting(
        &self,
        request: &Request,
        overrides: Option<&Overrides>,
        context: &mut ResolutionContext,
    ) -> Result<Plan, ResolutionError> {
        let registration = self.store.lookup(&request.key).or_else(|| {
            // A missing name falls back to the unnamed registration
            request
                .key
                .name
                .as_ref()
                .and_then(|_| self.store.lookup(&request.key.unnamed()))
        });

        let Some(registration) = registration else {
            return match request.fallback {
                Some(implementation) => self.plan_construction(
                    &request.key,
                    None,
                    Arc::new(implementation()),
                    overrides,
                    context,
                ),
                None => Err(ResolutionError::UnregisteredAbstractType(
                    request.key.clone(),
                )),
            };
        };

        if registration.lifetime() == Lifetime::Singleton {
            if let Some(instance) = self.lifetimes.get(registration.id()) {
                return Ok(Plan::Cached(instance));
            }
        }

        match registration.producer() {
            Producer::Factory(_) => Ok(Plan::Factory { registration }),
            Producer::Implementation(implementation) => {
                let implementation = implementation.clone();
                self.plan_construction(
                    &request.key,
                    Some(registration),
                    implementation,
                    overrides,
                    context,
                )
            }
        }
    }

    fn plan_construction(
        &self,
        key: &RegistrationKey,
        registration: Option<Arc<Registration>>,
        implementation: Arc<Implementation>,
        overrides: Option<&Overrides>,
        context: &mut ResolutionContext,
    ) -> Result<Plan, ResolutionError> {
        let selection = selector::select(&implementation, |parameter| {
            if let Some(value) = overrides.and_then(|overrides| overrides.matching(parameter)) {
                return Ok(Plan::Provided(value.clone()));
            }

            // Overrides are only meant for the requested type, never for its dependencies
            let dependency = Request {
                key: RegistrationKey::new(parameter.type_info(), None),
                fallback: parameter.implementation(),
            };
            match (self.plan(&dependency, None, context), parameter.default_value()) {
                (Err(error), Some(default)) if !error.is_circular() => {
                    Ok(Plan::Provided(default.clone()))
                }
                (result, _) => result,
            }
        })?;

        Ok(Plan::Construct {
            key: key.clone(),
            registration,
            implementation,
            candidate: selection.candidate,
            arguments: selection.arguments,
        })
    }
}

// Execution - builds what was planned
impl Container {
    fn execute(&self, plan: Plan, context: &mut ResolutionContext) -> Result<Instance, ResolutionError> {
        match plan {
            Plan::Cached(instance) | Plan::Provided(instance) => Ok(instance),
            Plan::Factory { registration } => self.apply_lifetime(&registration, || {
                context.visit(registration.key(), |context| {
                    self.invoke_factory(&registration, context)
                })
            }),
            Plan::Construct {
                key,
                registration,
                implementation,
                candidate,
                arguments,
            } => {
                let construct = || {
                    context.visit(&key, |context| {
                        let mut values = Vec::with_capacity(arguments.len());
                        for (name, argument) in arguments {
                            values.push((name, self.execute(argument, context)?));
                        }

                        implementation
                            .construct(candidate, &Arguments::new(values))
                            .map_err(|error| factory_failed(&key, error))
                    })
                };

                match &registration {
                    Some(registration) => self.apply_lifetime(registration, construct),
                    None => construct(),
                }
            }
        }
    }

    fn apply_lifetime(
        &self,
        registration: &Registration,
        create: impl FnOnce() -> Result<Instance, ResolutionError>,
    ) -> Result<Instance, ResolutionError> {
        match registration.lifetime() {
            Lifetime::PerCall => create(),
            Lifetime::Singleton => self.lifetimes.get_or_create(
                registration.id(),
                || self.store.is_current(registration),
                create,
            ),
        }
    }

    fn invoke_factory(
        &self,
        registration: &Registration,
        context: &mut ResolutionContext,
    ) -> Result<Instance, ResolutionError> {
        let Producer::Factory(factory) = registration.producer() else {
            return Err(factory_failed(
                registration.key(),
                "registration has no factory".into(),
            ));
        };

        let mut handle = ResolveHandle {
            container: self,
            context,
        };
        factory(&mut handle).map_err(|error| factory_failed(registration.key(), error))
    }
}

/// A factory error caused by a failed nested resolution is passed on unchanged
fn factory_failed(key: &RegistrationKey, error: DynError) -> ResolutionError {
    match error.downcast::<ResolutionError>() {
        Ok(inner) => *inner,
        Err(error) => ResolutionError::FactoryFailed {
            product: key.clone(),
            error: Arc::new(error),
        },
    }
}

fn downcast<T: ?Sized + Injectable>(instance: Instance) -> Result<Arc<T>, ResolutionError> {
    instance
        .downcast::<T>()
        .map_err(|actual_type| ResolutionError::TypeMismatch {
            requested: TypeInfo::of::<T>(),
            actual_type,
        })
}

/// Handle passed to factories for resolving their own dependencies
///
/// Resolutions through the handle belong to the resolution which invoked the factory,
/// so cycles running through factories are detected as well.
pub struct ResolveHandle<'a> {
    container: &'a Container,
    context: &'a mut ResolutionContext,
}
impl ResolveHandle<'_> {
    pub fn container(&self) -> &Container {
        self.container
    }

    pub fn resolve<T: ?Sized + Injectable>(&mut self) -> Result<Arc<T>, ResolutionError> {
        self.resolve_request(Request::of::<T>(None))
    }

    pub fn resolve_named<T: ?Sized + Injectable>(
        &mut self,
        name: &str,
    ) -> Result<Arc<T>, ResolutionError> {
        self.resolve_request(Request::of::<T>(Some(name)))
    }

    pub fn build<T: Constructible>(&mut self) -> Result<Arc<T>, ResolutionError> {
        self.resolve_request(Request::constructible::<T>(None))
    }

    fn resolve_request<T: ?Sized + Injectable>(
        &mut self,
        request: Request,
    ) -> Result<Arc<T>, ResolutionError> {
        let instance = self.container.resolve_in(&request, None, self.context)?;
        downcast(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constructor::Constructor, Parameter};

    #[derive(Default)]
    struct Leaf;
    impl Constructible for Leaf {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }

    struct Branch {
        #[allow(dead_code)]
        leaf: Arc<Leaf>,
    }
    impl Constructible for Branch {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(
                vec![Parameter::concrete::<Leaf>("leaf")],
                |args| Ok(Branch { leaf: args.get("leaf")? }),
            )]
        }
    }

    #[test]
    fn plan_describes_the_graph_without_building_it() {
        let container = Container::new();
        let mut context = ResolutionContext::default();

        let plan = container
            .plan(&Request::constructible::<Branch>(None), None, &mut context)
            .unwrap();

        match plan {
            Plan::Construct {
                arguments,
                registration,
                ..
            } => {
                assert!(registration.is_none());
                assert_eq!(arguments.len(), 1);
                assert!(matches!(arguments[0], ("leaf", Plan::Construct { .. })));
            }
            other => panic!("expected a construction plan, got {other:?}"),
        }
        assert!(context.visiting.is_empty());
    }

    #[test]
    fn cached_singleton_plans_as_cached() {
        let container = Container::new();
        container.register(Registration::implementation::<Leaf>().singleton());
        container.resolve::<Leaf>().unwrap();

        let plan = container
            .plan(&Request::of::<Leaf>(None), None, &mut ResolutionContext::default())
            .unwrap();

        assert!(matches!(plan, Plan::Cached(_)));
    }

    #[test]
    fn visiting_is_cleaned_up_after_failure() {
        let container = Container::new();
        let mut context = ResolutionContext::default();

        let result = container.plan(&Request::of::<dyn Debug + Send + Sync>(None), None, &mut context);

        assert!(matches!(result, Err(ResolutionError::UnregisteredAbstractType(_))));
        assert!(context.visiting.is_empty());
    }

    #[test]
    fn singleton_replaced_while_building_is_not_cached() {
        let container = Container::new();
        let stale = Registration::factory::<u32>(|handle| {
            handle
                .container()
                .register(Registration::factory::<u32>(|_| Ok(Arc::new(2))).singleton());
            Ok(Arc::new(1))
        })
        .singleton();
        let stale_id = stale.id();
        container.register(stale);

        assert_eq!(*container.resolve::<u32>().unwrap(), 1);
        assert!(container.lifetimes.get(stale_id).is_none());
        assert_eq!(*container.resolve::<u32>().unwrap(), 2);
    }

    #[test]
    fn replacing_a_singleton_drops_its_cached_instance() {
        let container = Container::new();
        container.register(Registration::implementation::<Leaf>().singleton());
        let first = container.resolve::<Leaf>().unwrap();

        container.register(Registration::implementation::<Leaf>().singleton());
        let second = container.resolve::<Leaf>().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
    }
}
