use std::{any::Any, sync::Arc};

use crate::extensions::ExtensionSlot;

/// Error type returned by unit factories
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The finished registry may be shared between threads,
/// so anything a unit produces needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type erased value produced by a unit, or contributed to a slot
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub fn new<Value: Injectable>(value: Value) -> Self {
        Instance {
            type_name: std::any::type_name::<Value>(),
            value: Arc::new(value),
        }
    }

    /// Name of the concrete type behind this instance
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the shared value, or the actual type name if `T` does not match
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.value.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.type_name),
        }
    }

    /// True if both handles point to the same value
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.type_name).finish()
    }
}

/// How a unit depends on something else
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// The instance of the unit with this name
    Reference(String),
    /// Every contribution registered units make to this slot, in declaration order
    ContributionRequest(ExtensionSlot),
}

impl Dependency {
    /// Name of the referenced unit, `None` for contribution requests
    pub fn reference(&self) -> Option<&str> {
        match self {
            Dependency::Reference(name) => Some(name),
            Dependency::ContributionRequest(_) => None,
        }
    }
}

impl From<&str> for Dependency {
    fn from(unit: &str) -> Self {
        Dependency::Reference(unit.to_string())
    }
}
impl From<String> for Dependency {
    fn from(unit: String) -> Self {
        Dependency::Reference(unit)
    }
}
impl From<&String> for Dependency {
    fn from(unit: &String) -> Self {
        Dependency::Reference(unit.clone())
    }
}
