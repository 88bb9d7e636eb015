use std::{collections::HashMap, sync::Arc};

use indexmap::IndexMap;

use crate::{
    definition::UnitDefinition,
    errors::{AssemblyError, GraphError, RequireError},
    extensions::{ExtensionSlot, Extensions},
    resolver::Resolver,
    types::{Dependency, Injectable, Instance},
};

/// A dependency after resolution
#[derive(Debug, Clone)]
pub enum Resolved {
    Unit(Instance),
    Contributions(Vec<Instance>),
}

/// The resolved dependency map handed to a factory, keyed by local name
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    resolved: IndexMap<String, Resolved>,
}
impl Dependencies {
    /// Resolves the dependency declared as `name` into `R`
    pub fn resolve<R: Resolver>(&self, name: &str) -> Result<R, RequireError> {
        R::resolve(self, name)
    }

    /// The unit instance declared as `name`
    pub fn get<T: Injectable>(&self, name: &str) -> Result<Arc<T>, RequireError> {
        self.resolve(name)
    }

    /// The contributions collected for the request declared as `name`
    pub fn contributions<T: Injectable>(&self, name: &str) -> Result<Vec<Arc<T>>, RequireError> {
        self.resolve(name)
    }

    pub fn raw(&self, name: &str) -> Option<&Resolved> {
        self.resolved.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolved.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl FromIterator<(String, Resolved)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (String, Resolved)>>(iter: I) -> Self {
        Dependencies {
            resolved: iter.into_iter().collect(),
        }
    }
}

/// A definition together with the instance its factory produced
#[derive(Debug)]
pub struct InstantiatedUnit<'a> {
    pub definition: &'a UnitDefinition,
    pub instance: Instance,
}

/// Instantiates the units of one assembly
pub(crate) struct Initiator<'a, E: Extensions + ?Sized> {
    /// All definitions in declaration order - contributions are collected from these
    definitions: &'a [UnitDefinition],
    extensions: &'a E,

    /// Every instance produced so far
    instances: HashMap<&'a str, Instance>,
}
impl<'a, E: Extensions + ?Sized> Initiator<'a, E> {
    pub(crate) fn new(definitions: &'a [UnitDefinition], extensions: &'a E) -> Self {
        Initiator {
            definitions,
            extensions,
            instances: HashMap::with_capacity(definitions.len()),
        }
    }

    /// Runs each factory once, in the given order
    ///
    /// `order` must place every referenced unit before the units referencing it.
    pub(crate) fn initiate(
        mut self,
        order: &[&'a UnitDefinition],
    ) -> Result<Vec<InstantiatedUnit<'a>>, AssemblyError> {
        tracing::debug!("Instantiating {} units", order.len());

        let mut units = Vec::with_capacity(order.len());
        for &definition in order {
            let deps = self.collect_dependencies(definition)?;

            let instance = definition.construct(&deps).map_err(|error| {
                tracing::error!("Factory for unit '{}' failed: {}", definition.name(), error);
                AssemblyError::FactoryFailed {
                    unit: definition.name().to_string(),
                    error: Arc::new(error),
                }
            })?;

            tracing::debug!(
                "Constructed unit '{}' ({})",
                definition.name(),
                instance.type_name()
            );

            self.instances.insert(definition.name(), instance.clone());
            units.push(InstantiatedUnit {
                definition,
                instance,
            });
        }

        Ok(units)
    }

    fn collect_dependencies(
        &self,
        definition: &UnitDefinition,
    ) -> Result<Dependencies, GraphError> {
        let mut resolved = IndexMap::with_capacity(definition.dependencies().len());

        for (local, dependency) in definition.dependencies() {
            let value = match dependency {
                Dependency::Reference(target) => {
                    let Some(instance) = self.instances.get(target.as_str()) else {
                        // Only reachable if `order` was not produced by toposort
                        return Err(GraphError::UnsatisfiedDependency {
                            unit: definition.name().to_string(),
                            dependency: local.clone(),
                            missing: target.clone(),
                        });
                    };
                    Resolved::Unit(instance.clone())
                }
                Dependency::ContributionRequest(slot) => {
                    Resolved::Contributions(self.collect_contributions(slot))
                }
            };
            resolved.insert(local.clone(), value);
        }

        Ok(Dependencies { resolved })
    }

    /// Scans every definition, not just the instantiated ones
    fn collect_contributions(&self, slot: &ExtensionSlot) -> Vec<Instance> {
        self.definitions
            .iter()
            .filter_map(|definition| self.extensions.collect(slot, definition))
            .collect()
    }
}
