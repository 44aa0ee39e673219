use std::{
    any::{Any, TypeId},
    fmt::Debug,
    sync::Arc,
};

/// All errors must be Send + Sync so they can cross threads with the container
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The container is shared between threads, so anything it hands out
/// needs to be Send + Sync + 'static.
///
/// Unsized types are allowed, which is how trait objects (`dyn Service`)
/// become requestable "interfaces".
pub trait Injectable: Send + Sync + 'static {}
impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Type erased instance produced by the container
///
/// Always wraps an `Arc<T>` where `T` is the type described by `info`.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    instance: Arc<dyn Any + Send + Sync + 'static>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

impl Instance {
    pub fn new<T: ?Sized + Injectable>(instance: Arc<T>) -> Self {
        Instance {
            info: TypeInfo::of::<T>(),
            instance: Arc::new(instance),
        }
    }

    /// Returns the shared instance, or the name of the type actually held
    pub fn downcast<T: ?Sized + Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match self.instance.downcast_ref::<Arc<T>>() {
            Some(downcasted) => Ok(downcasted.clone()),
            None => Err(self.info.type_name),
        }
    }

    /// True if both carriers point at the same shared value
    pub fn same_as(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: Send + Sync {
        fn corners(&self) -> u32;
    }
    struct Square;
    impl Shape for Square {
        fn corners(&self) -> u32 {
            4
        }
    }

    #[test]
    fn instance_downcasts_to_trait_object() {
        let shape: Arc<dyn Shape> = Arc::new(Square);
        let instance = Instance::new(shape);

        assert_eq!(instance.info, TypeInfo::of::<dyn Shape>());
        assert_eq!(instance.downcast::<dyn Shape>().unwrap().corners(), 4);
    }

    #[test]
    fn instance_downcast_reports_held_type() {
        let instance = Instance::new(Arc::new(12_i32));

        assert_eq!(instance.downcast::<String>().unwrap_err(), "i32");
    }

    #[test]
    fn clones_share_the_same_value() {
        let instance = Instance::new(Arc::new(String::from("shared")));
        let clone = instance.clone();

        assert!(instance.same_as(&clone));
        assert!(Arc::ptr_eq(
            &instance.downcast::<String>().unwrap(),
            &clone.downcast::<String>().unwrap()
        ));
    }
}
