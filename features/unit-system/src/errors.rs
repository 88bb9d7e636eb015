use std::sync::Arc;

use thiserror::Error;

use crate::types::DynError;

/// Malformed input, raised by the call that received it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("Unit entry #{position} has an empty name")]
    EmptyUnitName { position: usize },
    #[error("The dependency map contains an empty local name")]
    EmptyLocalName,
    #[error("Dependency '{local}' does not name a unit")]
    EmptyTarget { local: String },
    #[error("'{slot}' is not a declared extension slot, its contributions can't be collected")]
    UnknownSlot { slot: String },
    #[error("A unit has been declared twice: '{0}'")]
    DuplicateUnit(String),
}

/// Problems found while ordering the units
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unsatisfied dependency '{dependency}' of unit '{unit}'. Unit '{missing}' not found.")]
    UnsatisfiedDependency {
        unit: String,
        dependency: String,
        missing: String,
    },
    #[error("Circular dependency (->: depends on): {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },
}

/// Errors while assembling a system
#[derive(Error, Debug, Clone)]
pub enum AssemblyError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The dependency graph can't be ordered
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A factory failed to build
    #[error("Factory for '{unit}' failed - error: {error}")]
    FactoryFailed { unit: String, error: Arc<DynError> },
}

/// Errors when trying to access a resolved dependency or a registry entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequireError {
    /// No unit with this name is in the registry
    #[error("The required unit '{0}' is not known.")]
    UnitMissing(String),
    /// The factory did not declare a dependency under this local name
    #[error("No dependency was declared as '{0}'.")]
    DependencyMissing(String),
    #[error("Dependency '{0}' is a contribution list, not a unit.")]
    NotAUnit(String),
    #[error("Dependency '{0}' is a unit, not a contribution list.")]
    NotContributions(String),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}
