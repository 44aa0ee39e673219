#![allow(dead_code)]

use std::{any::Any, sync::Arc};

use wrapp_ioc::{Constructible, Constructor, Parameter};

pub trait TestInterface: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn prop1(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Default)]
pub struct TestClassDefaultCtor {
    pub prop1: String,
}
impl TestInterface for TestClassDefaultCtor {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl Constructible for TestClassDefaultCtor {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}

/// Only ever created by factories
pub struct CustomInstance {
    pub prop1: String,
}
impl TestInterface for CustomInstance {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn prop1(&self) -> Option<&str> {
        Some(&self.prop1)
    }
}

pub struct TestClassWithDependency {
    pub dependency: Arc<dyn TestInterface>,
    pub param: Option<i32>,
}
impl Constructible for TestClassWithDependency {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(
                vec![Parameter::new::<dyn TestInterface>("dependency")],
                |args| {
                    Ok(TestClassWithDependency {
                        dependency: args.get("dependency")?,
                        param: None,
                    })
                },
            ),
            Constructor::new(
                vec![
                    Parameter::new::<dyn TestInterface>("dependency"),
                    Parameter::new::<i32>("param"),
                ],
                |args| {
                    Ok(TestClassWithDependency {
                        dependency: args.get("dependency")?,
                        param: Some(args.value("param")?),
                    })
                },
            ),
        ]
    }
}

pub struct TestClassWithDependencyAndParameters {
    pub dependency: Arc<TestClassDefaultCtor>,
    pub param1: i32,
    pub param2: String,
}
impl Constructible for TestClassWithDependencyAndParameters {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![
                Parameter::concrete::<TestClassDefaultCtor>("dependency"),
                Parameter::new::<i32>("param1"),
                Parameter::new::<String>("param2"),
            ],
            |args| {
                Ok(TestClassWithDependencyAndParameters {
                    dependency: args.get("dependency")?,
                    param1: args.value("param1")?,
                    param2: args.value("param2")?,
                })
            },
        )]
    }
}

/// Requires itself
pub struct SelfReferencing;
impl Constructible for SelfReferencing {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![Parameter::concrete::<SelfReferencing>("me")],
            |_| Ok(SelfReferencing),
        )]
    }
}

/// Requires [CycleB], which requires [CycleA] again
pub struct CycleA;
impl Constructible for CycleA {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![Parameter::concrete::<CycleB>("b")],
            |_| Ok(CycleA),
        )]
    }
}

pub struct CycleB;
impl Constructible for CycleB {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![Parameter::concrete::<CycleA>("a")],
            |_| Ok(CycleB),
        )]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retries(pub u8);

pub struct WithDefault {
    pub retries: Retries,
}
impl Constructible for WithDefault {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![Parameter::optional::<Retries>("retries", Retries(3))],
            |args| {
                Ok(WithDefault {
                    retries: args.value("retries")?,
                })
            },
        )]
    }
}
