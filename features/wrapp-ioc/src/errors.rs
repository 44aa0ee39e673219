use std::sync::Arc;

use thiserror::Error;

use crate::{
    registration::RegistrationKey,
    types::{DynError, TypeInfo},
};

/// Errors when trying to resolve a type
#[derive(Error, Debug, Clone)]
pub enum ResolutionError {
    /// Nothing is registered for the requested type
    ///
    /// Concrete types requested through `resolve` need a registration too,
    /// only `build` constructs them on their own.
    #[error("'{0}' is not registered")]
    UnregisteredAbstractType(RegistrationKey),

    /// None of the constructors can be satisfied
    ///
    /// `unresolved` lists the parameters of the richest constructor which could not be resolved,
    /// each with the failure that stopped it.
    #[error("No constructor of '{product}' can be satisfied - unresolved parameters: {}", display_unresolved(.unresolved))]
    NoViableConstructor {
        product: TypeInfo,
        unresolved: Vec<UnresolvedParameter>,
    },

    /// A type was requested again while it was still being constructed
    #[error("A Circular Dependency exists for '{requested}' through {}", display_chain(.chain))]
    CircularDependency {
        requested: RegistrationKey,
        chain: Vec<RegistrationKey>,
    },

    /// A registered factory or a constructor failed to build
    #[error("Factory for '{product}' failed - error: {error}")]
    FactoryFailed {
        product: RegistrationKey,
        error: Arc<DynError>,
    },

    #[error("Resolved '{actual_type}' but '{requested}' was required")]
    TypeMismatch {
        requested: TypeInfo,
        actual_type: &'static str,
    },
}
impl ResolutionError {
    pub fn is_circular(&self) -> bool {
        matches!(self, ResolutionError::CircularDependency { .. })
    }

    /// The failure at the bottom of the dependency chain
    ///
    /// Follows the first unresolved parameter of every [ResolutionError::NoViableConstructor]
    /// down to the error which started it, e.g. the missing registration.
    pub fn innermost(&self) -> &ResolutionError {
        match self {
            ResolutionError::NoViableConstructor { unresolved, .. } => unresolved
                .first()
                .map_or(self, |parameter| parameter.error.innermost()),
            _ => self,
        }
    }
}

/// A constructor parameter which could not be resolved, and why
#[derive(Error, Debug, Clone)]
#[error("'{name}' ({error})")]
pub struct UnresolvedParameter {
    pub name: &'static str,
    pub error: ResolutionError,
}

fn display_unresolved(unresolved: &[UnresolvedParameter]) -> String {
    unresolved
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_chain(chain: &[RegistrationKey]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors when reading resolved arguments inside a constructor
#[derive(Error, Debug, Clone)]
pub enum ArgumentError {
    #[error("The constructor has no argument named '{0}'")]
    Missing(String),
    #[error("Argument '{name}' is a '{actual_type}', not a '{expected_type}'")]
    WrongType {
        name: String,
        expected_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors when trying to register a type
#[derive(Error, Debug, Clone)]
pub enum RegistrationError {
    #[error("'{0}' is already registered")]
    AlreadyRegistered(RegistrationKey),
}

/// A registration which can not be resolved without help from the caller
#[derive(Error, Debug, Clone)]
#[error("'{key}': {error}")]
pub struct ValidationError {
    pub key: RegistrationKey,
    pub error: ResolutionError,
}

#[derive(Error, Debug, Clone)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}
impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The registry had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}
