use indexmap::{map::Entry, IndexMap};

use crate::{
    errors::InvalidArgument,
    extensions::SlotId,
    factories::{boxed_factory, constant_factory, Factory, UnitDescriptor},
    initiator::Dependencies,
    types::{Dependency, DynError, Injectable, Instance},
};

/// What a unit can be declared as before it is normalized
pub enum RawUnit {
    /// Called with an empty dependency map
    Factory(Factory),
    /// Built by [`using_deps`](crate::using_deps) or [`UnitDescriptor::new`]
    Unit(UnitDescriptor),
    /// Used as is
    Value(Instance),
}
impl RawUnit {
    pub fn value<T: Injectable>(value: T) -> Self {
        RawUnit::Value(Instance::new(value))
    }

    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&Dependencies) -> Result<T, DynError> + Send + Sync + 'static,
    {
        RawUnit::Factory(boxed_factory(factory))
    }
}
impl From<UnitDescriptor> for RawUnit {
    fn from(descriptor: UnitDescriptor) -> Self {
        RawUnit::Unit(descriptor)
    }
}
impl From<Instance> for RawUnit {
    fn from(instance: Instance) -> Self {
        RawUnit::Value(instance)
    }
}

/// Canonical description of a unit, ready to be ordered and instantiated
pub struct UnitDefinition {
    name: String,
    factory: Factory,
    dependencies: IndexMap<String, Dependency>,
    contributions: Vec<(SlotId, Instance)>,
}

impl UnitDefinition {
    /// Normalizes a single entry
    pub fn new(name: impl Into<String>, raw: impl Into<RawUnit>) -> Self {
        let name = name.into();
        match raw.into() {
            RawUnit::Factory(factory) => UnitDefinition {
                name,
                factory,
                dependencies: IndexMap::new(),
                contributions: Vec::new(),
            },
            RawUnit::Unit(UnitDescriptor {
                factory,
                dependencies,
                contributions,
            }) => UnitDefinition {
                name,
                factory,
                dependencies,
                contributions,
            },
            RawUnit::Value(value) => UnitDefinition {
                name,
                factory: constant_factory(value),
                dependencies: IndexMap::new(),
                contributions: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &IndexMap<String, Dependency> {
        &self.dependencies
    }

    /// The value this unit contributes to the slot with `id`
    pub fn contribution(&self, id: SlotId) -> Option<&Instance> {
        self.contributions
            .iter()
            .find(|(slot, _)| *slot == id)
            .map(|(_, value)| value)
    }

    pub(crate) fn construct(&self, deps: &Dependencies) -> Result<Instance, DynError> {
        (self.factory)(deps)
    }
}

impl std::fmt::Debug for UnitDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitDefinition")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("contributions", &self.contributions)
            .finish_non_exhaustive()
    }
}

/// What happens when two entries share a name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later entry replaces the earlier one, keeping its position
    #[default]
    LastWins,
    /// Duplicates are an [`InvalidArgument::DuplicateUnit`]
    Reject,
}

/// Turns the raw entries into definitions, keeping declaration order
pub fn normalize(
    entries: impl IntoIterator<Item = (String, RawUnit)>,
    duplicates: DuplicatePolicy,
) -> Result<Vec<UnitDefinition>, InvalidArgument> {
    let mut definitions: IndexMap<String, UnitDefinition> = IndexMap::new();

    for (name, raw) in entries {
        let definition = UnitDefinition::new(name.clone(), raw);
        match definitions.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(definition);
            }
            Entry::Occupied(entry) if duplicates == DuplicatePolicy::Reject => {
                return Err(InvalidArgument::DuplicateUnit(entry.key().clone()));
            }
            Entry::Occupied(mut entry) => {
                tracing::warn!("Unit '{}' declared again, replacing it", entry.key());
                entry.insert(definition);
            }
        }
    }

    Ok(definitions.into_values().collect())
}
