use std::{any::type_name, fmt::Debug, sync::Arc};

use indexmap::IndexMap;

use crate::{
    errors::RequireError,
    initiator::InstantiatedUnit,
    types::{Injectable, Instance},
};

/// Read only registry holding every instantiated unit by name
///
/// Iterates in instantiation order. Cloning is cheap, clones share the instances.
#[derive(Clone)]
pub struct Registry(Arc<RegistryInner>);
struct RegistryInner {
    instances: IndexMap<String, Instance>,
}
impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Registry");
        for (name, instance) in &self.0.instances {
            map.field(name, &instance.type_name());
        }
        map.finish()
    }
}

impl Registry {
    /// Projects the instantiated units, a later unit with the same name replaces an earlier one
    pub(crate) fn from_units<'a>(units: impl IntoIterator<Item = InstantiatedUnit<'a>>) -> Self {
        let instances = units
            .into_iter()
            .map(|unit| (unit.definition.name().to_string(), unit.instance))
            .collect();

        Self(Arc::new(RegistryInner { instances }))
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.0.instances.get(name)
    }

    /// Attempts to get the unit as the requested type
    pub fn require<T: Injectable>(&self, name: &str) -> Result<Arc<T>, RequireError> {
        match self.0.instances.get(name) {
            Some(instance) => {
                instance
                    .downcast()
                    .map_err(|actual_type| RequireError::DowncastFailed {
                        required_type: type_name::<T>(),
                        actual_type,
                    })
            }
            None => Err(RequireError::UnitMissing(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.instances.contains_key(name)
    }

    /// Unit names in instantiation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.instances.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.0
            .instances
            .iter()
            .map(|(name, instance)| (name.as_str(), instance))
    }

    pub fn len(&self) -> usize {
        self.0.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::definition::{RawUnit, UnitDefinition};

    fn registry(definitions: &[UnitDefinition]) -> Registry {
        Registry::from_units(definitions.iter().enumerate().map(|(i, definition)| {
            InstantiatedUnit {
                definition,
                instance: Instance::new(i),
            }
        }))
    }

    #[test]
    fn require_downcasts_by_name() {
        let definitions = vec![UnitDefinition::new("only", RawUnit::value(()))];
        let registry = registry(&definitions);

        assert_eq!(*registry.require::<usize>("only").unwrap(), 0);
        assert_eq!(
            registry.require::<u8>("only").unwrap_err(),
            RequireError::DowncastFailed {
                required_type: "u8",
                actual_type: "usize",
            }
        );
        assert_eq!(
            registry.require::<usize>("other").unwrap_err(),
            RequireError::UnitMissing("other".to_string())
        );
    }

    #[test]
    fn last_writer_wins() {
        let definitions = vec![
            UnitDefinition::new("a", RawUnit::value(())),
            UnitDefinition::new("b", RawUnit::value(())),
            UnitDefinition::new("a", RawUnit::value(())),
        ];
        let registry = registry(&definitions);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(*registry.require::<usize>("a").unwrap(), 2);
    }

    #[test]
    fn debug_lists_units_with_types() {
        let definitions = vec![UnitDefinition::new("port", RawUnit::value(()))];

        assert_eq!(
            format!("{:?}", registry(&definitions)),
            r#"Registry { port: "usize" }"#
        );
    }
}
