use crate::{
    container::{Container, Request, ResolutionContext},
    errors::{ValidationError, ValidationErrors},
    overrides::Overrides,
};

impl Container {
    /// Checks that every registration can be resolved without overrides
    ///
    /// Nothing is constructed and factories are not invoked.
    /// Returns a list of all issues.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let registrations = self.store.all();
        tracing::debug!("Validating {} registrations", registrations.len());

        let mut errors = Vec::new();
        let no_overrides = Overrides::default();
        for registration in registrations {
            let request = Request {
                key: registration.key().clone(),
                fallback: None,
            };

            let mut context = ResolutionContext::default();
            if let Err(error) = self.plan(&request, Some(&no_overrides), &mut context) {
                errors.push(ValidationError {
                    key: request.key,
                    error,
                });
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors { errors });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        Constructible, Constructor, Container, Parameter, Registration, ResolutionError,
    };

    trait Repository: Send + Sync {}

    struct Service {
        #[allow(dead_code)]
        repository: Arc<dyn Repository>,
    }
    impl Constructible for Service {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(
                vec![Parameter::new::<dyn Repository>("repository")],
                |args| Ok(Service { repository: args.get("repository")? }),
            )]
        }
    }

    #[derive(Default)]
    struct InMemory;
    impl Repository for InMemory {}
    impl Constructible for InMemory {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }

    #[test]
    fn complete_registry_is_valid() {
        let container = Container::new();
        container.register(Registration::implementation::<Service>());
        container.register(Registration::implementation_as::<dyn Repository, InMemory>(|it| it));

        assert!(container.validate().is_ok());
    }

    #[test]
    fn missing_dependency_is_reported() {
        let container = Container::new();
        container.register(Registration::implementation::<Service>());
        container.register(Registration::instance(Arc::new(3_u8)));

        let errors = container.validate().unwrap_err().errors;

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key.type_info.type_name, std::any::type_name::<Service>());
        assert!(matches!(
            &errors[0].error,
            ResolutionError::NoViableConstructor { unresolved, .. }
                if unresolved.len() == 1 && unresolved[0].name == "repository"
        ));
    }

    #[test]
    fn validation_does_not_run_factories() {
        let container = Container::new();
        container.register(Registration::factory::<u8>(|_| Err("never called".into())));

        assert!(container.validate().is_ok());
        assert!(container.resolve::<u8>().is_err());
    }
}
