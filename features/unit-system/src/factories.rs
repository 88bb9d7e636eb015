use indexmap::IndexMap;

use crate::{
    errors::InvalidArgument,
    extensions::{ExtensionSlot, SlotId},
    initiator::Dependencies,
    types::{Dependency, DynError, Injectable, Instance},
};

/// Type erased factory of a unit
pub type Factory = Box<dyn Fn(&Dependencies) -> Result<Instance, DynError> + Send + Sync>;

/// Boxes a typed factory, erasing its product
pub fn boxed_factory<T, F>(factory: F) -> Factory
where
    T: Injectable,
    F: Fn(&Dependencies) -> Result<T, DynError> + Send + Sync + 'static,
{
    Box::new(move |deps| factory(deps).map(Instance::new))
}

/// Factory returning the same shared value every time
pub(crate) fn constant_factory(value: Instance) -> Factory {
    Box::new(move |_| Ok(value.clone()))
}

/// A unit that has not been given a name yet
pub struct UnitDescriptor {
    pub(crate) factory: Factory,
    pub(crate) dependencies: IndexMap<String, Dependency>,
    pub(crate) contributions: Vec<(SlotId, Instance)>,
}

impl UnitDescriptor {
    /// A unit without dependencies
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&Dependencies) -> Result<T, DynError> + Send + Sync + 'static,
    {
        UnitDescriptor {
            factory: boxed_factory(factory),
            dependencies: IndexMap::new(),
            contributions: Vec::new(),
        }
    }

    /// Contributes `value` to `slot`
    ///
    /// Contributing to the same slot twice keeps the last value.
    pub fn contribute<T: Injectable>(mut self, slot: &ExtensionSlot, value: T) -> Self {
        self.contributions.retain(|(id, _)| *id != slot.id());
        self.contributions.push((slot.id(), Instance::new(value)));
        self
    }

    pub fn dependencies(&self) -> &IndexMap<String, Dependency> {
        &self.dependencies
    }
}

impl std::fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("dependencies", &self.dependencies)
            .field("contributions", &self.contributions)
            .finish_non_exhaustive()
    }
}

/// Anything that describes a dependency map
///
/// A list of unit names is shorthand for "the local name is the unit name",
/// a list of pairs maps local names to dependencies.
pub trait IntoDependencyMap {
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument>;
}

impl<const N: usize> IntoDependencyMap for [&str; N] {
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        self.as_slice().into_dependency_map()
    }
}
impl IntoDependencyMap for &[&str] {
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        named_dependencies(
            self.iter()
                .map(|name| (name.to_string(), Dependency::from(*name))),
        )
    }
}
impl IntoDependencyMap for Vec<&str> {
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        self.as_slice().into_dependency_map()
    }
}
impl IntoDependencyMap for Vec<String> {
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        named_dependencies(
            self.into_iter()
                .map(|name| (name.clone(), Dependency::Reference(name))),
        )
    }
}
impl<L, D, const N: usize> IntoDependencyMap for [(L, D); N]
where
    L: Into<String>,
    D: Into<Dependency>,
{
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        named_dependencies(self.into_iter().map(|(l, d)| (l.into(), d.into())))
    }
}
impl<L, D> IntoDependencyMap for Vec<(L, D)>
where
    L: Into<String>,
    D: Into<Dependency>,
{
    fn into_dependency_map(self) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
        named_dependencies(self.into_iter().map(|(l, d)| (l.into(), d.into())))
    }
}

fn named_dependencies(
    entries: impl Iterator<Item = (String, Dependency)>,
) -> Result<IndexMap<String, Dependency>, InvalidArgument> {
    let mut map = IndexMap::new();
    for (local, dependency) in entries {
        if local.is_empty() {
            return Err(InvalidArgument::EmptyLocalName);
        }
        if dependency.reference() == Some("") {
            return Err(InvalidArgument::EmptyTarget { local });
        }
        map.insert(local, dependency);
    }

    Ok(map)
}

/// Declares a unit whose factory receives the listed dependencies
///
/// ```
/// use unit_system::{using_deps, SlotRegistry, SystemBuilder};
///
/// let registry = SystemBuilder::new()
///     .add_value("base", 1_i32)
///     .add("next", using_deps(["base"], |deps| Ok(*deps.get::<i32>("base")? + 1)).unwrap())
///     .build(&SlotRegistry::new())
///     .unwrap();
///
/// assert_eq!(*registry.require::<i32>("next").unwrap(), 2);
/// ```
pub fn using_deps<T, F>(
    deps: impl IntoDependencyMap,
    factory: F,
) -> Result<UnitDescriptor, InvalidArgument>
where
    T: Injectable,
    F: Fn(&Dependencies) -> Result<T, DynError> + Send + Sync + 'static,
{
    Ok(UnitDescriptor {
        dependencies: deps.into_dependency_map()?,
        ..UnitDescriptor::new(factory)
    })
}

/// Alias of [`using_deps`], reads better for units that only need to run after others
pub use self::using_deps as after;
