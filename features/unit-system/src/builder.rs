use crate::{
    container::Registry,
    definition::{normalize, DuplicatePolicy, RawUnit},
    dependency_graph::toposort,
    errors::{AssemblyError, InvalidArgument},
    extensions::Extensions,
    initiator::{Dependencies, Initiator},
    types::{DynError, Injectable},
};

//////////////////////////////////////////////////////////////////////
///
/// Assembly runs in four steps, all inside [SystemBuilder::build]
/// 1. Entries are normalized into unit definitions
/// 2. The definitions are ordered so dependencies come first
/// 3. Each factory runs once, in that order
/// 4. The instances are collected into the [Registry]

#[derive(Default)]
pub struct SystemBuilder {
    /// Declared units, in declaration order
    entries: Vec<(String, RawUnit)>,
    duplicates: DuplicatePolicy,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `(name, unit)` pairs
    pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (N, RawUnit)>) -> Self {
        SystemBuilder {
            entries: pairs
                .into_iter()
                .map(|(name, raw)| (name.into(), raw))
                .collect(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}
impl SystemBuilder {
    pub fn add(mut self, name: impl Into<String>, unit: impl Into<RawUnit>) -> Self {
        self.entries.push((name.into(), unit.into()));
        self
    }

    pub fn add_value<T: Injectable>(self, name: impl Into<String>, value: T) -> Self {
        self.add(name, RawUnit::value(value))
    }

    pub fn add_factory<T, F>(self, name: impl Into<String>, factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&Dependencies) -> Result<T, DynError> + Send + Sync + 'static,
    {
        self.add(name, RawUnit::factory(factory))
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Builds every unit, collecting contributions through `extensions`
    pub fn build<E: Extensions + ?Sized>(self, extensions: &E) -> Result<Registry, AssemblyError> {
        let SystemBuilder {
            entries,
            duplicates,
        } = self;

        validate_entries(&entries)?;

        tracing::debug!("Assembling system with {} unit entries", entries.len());

        let definitions = normalize(entries, duplicates)?;
        let order = toposort(&definitions)?;
        let units = Initiator::new(&definitions, extensions).initiate(&order)?;

        Ok(Registry::from_units(units))
    }
}

fn validate_entries(entries: &[(String, RawUnit)]) -> Result<(), InvalidArgument> {
    match entries.iter().position(|(name, _)| name.is_empty()) {
        Some(position) => Err(InvalidArgument::EmptyUnitName { position }),
        None => Ok(()),
    }
}
