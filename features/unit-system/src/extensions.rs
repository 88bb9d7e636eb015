//! Extension slots let units contribute values that another unit collects as a list.
//!
//! The engine only talks to the [`Extensions`] trait. [`SlotRegistry`] is the
//! implementation used when nothing else is plugged in: slots are declared on it
//! and units attach their contributions to their own definitions.

use std::{
    collections::HashMap,
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    definition::UnitDefinition, errors::InvalidArgument, types::Dependency, types::Instance,
};

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of an extension slot
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotId(u64);

/// Handle of an extension point units can contribute to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSlot {
    id: SlotId,
    name: &'static str,
}
impl ExtensionSlot {
    /// Creates a slot with a fresh, process unique id
    pub fn new(name: &'static str) -> Self {
        ExtensionSlot {
            id: SlotId(NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed)),
            name,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
impl Display for ExtensionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// The extension subsystem as seen by the assembler
pub trait Extensions {
    /// Identity of the slot, `None` if the handle is not a valid slot here
    fn slot_id(&self, slot: &ExtensionSlot) -> Option<SlotId>;

    /// The contribution `unit` makes to `slot`, if any
    fn collect(&self, slot: &ExtensionSlot, unit: &UnitDefinition) -> Option<Instance>;
}

/// Builds a dependency descriptor receiving every contribution made to `slot`
pub fn contribution_of<E: Extensions + ?Sized>(
    extensions: &E,
    slot: &ExtensionSlot,
) -> Result<Dependency, InvalidArgument> {
    if extensions.slot_id(slot).is_none() {
        return Err(InvalidArgument::UnknownSlot {
            slot: slot.name().to_string(),
        });
    }

    Ok(Dependency::ContributionRequest(slot.clone()))
}

/// Set of declared slots, reading contributions from the unit definitions
#[derive(Debug, Default, Clone)]
pub struct SlotRegistry {
    declared: HashMap<SlotId, &'static str>,
}
impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new slot and declares it
    pub fn declare(&mut self, name: &'static str) -> ExtensionSlot {
        let slot = ExtensionSlot::new(name);
        self.register(&slot);
        slot
    }

    /// Declares a slot created elsewhere
    pub fn register(&mut self, slot: &ExtensionSlot) -> &mut Self {
        self.declared.insert(slot.id(), slot.name());
        self
    }

    pub fn contains(&self, slot: &ExtensionSlot) -> bool {
        self.declared.contains_key(&slot.id())
    }

    /// Shorthand for [`contribution_of`] on this registry
    pub fn contributions(&self, slot: &ExtensionSlot) -> Result<Dependency, InvalidArgument> {
        contribution_of(self, slot)
    }
}
impl Extensions for SlotRegistry {
    fn slot_id(&self, slot: &ExtensionSlot) -> Option<SlotId> {
        self.contains(slot).then(|| slot.id())
    }

    fn collect(&self, slot: &ExtensionSlot, unit: &UnitDefinition) -> Option<Instance> {
        unit.contribution(slot.id()).cloned()
    }
}
