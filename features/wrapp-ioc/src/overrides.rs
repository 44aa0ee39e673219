use std::{collections::HashMap, sync::Arc};

use crate::{
    constructor::Parameter,
    types::{Injectable, Instance},
};

/// Named values the caller supplies for constructor parameters
///
/// Only the constructor of the requested type consumes overrides, they never reach its dependencies.
/// A value is used for a parameter with the same name if it is of the parameter's declared type,
/// anything else is ignored.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: HashMap<String, Instance>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Injectable>(self, name: impl Into<String>, value: T) -> Self {
        self.with_shared(name, Arc::new(value))
    }

    /// Supply an already shared value, e.g. an `Arc<dyn Trait>`
    pub fn with_shared<T: ?Sized + Injectable>(
        mut self,
        name: impl Into<String>,
        value: Arc<T>,
    ) -> Self {
        self.values.insert(name.into(), Instance::new(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    /// The override which can stand in for `parameter`
    pub(crate) fn matching(&self, parameter: &Parameter) -> Option<&Instance> {
        self.get(parameter.name())
            .filter(|value| value.info.type_id == parameter.type_info().type_id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
