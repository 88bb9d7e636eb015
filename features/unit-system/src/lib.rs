//! Unit System assembles a read only registry out of named units.
//!
//! A unit is a factory plus the dependencies it declares. The system figures out the
//! order to build them in, runs each factory exactly once and hands back a [`Registry`].
//!
//! Units depend on each other in two ways:
//! 1. By reference - the factory receives the instance of another unit
//! 2. By contribution - the factory receives every value other units contributed to an
//!    [`ExtensionSlot`], in declaration order. Contributions never constrain the order.
//!
//! # Examples
//!
//! ```rust
//! use unit_system::{using_deps, SlotRegistry, SystemBuilder, UnitDescriptor};
//!
//! let mut slots = SlotRegistry::new();
//! let routes = slots.declare("routes");
//!
//! let router = using_deps(
//!     [("routes", slots.contributions(&routes).unwrap()), ("prefix", "prefix".into())],
//!     |deps| {
//!         let prefix = deps.get::<String>("prefix")?;
//!         let routes = deps.contributions::<&str>("routes")?;
//!         Ok(routes.iter().map(|r| format!("{prefix}{r}")).collect::<Vec<_>>())
//!     },
//! )
//! .unwrap();
//!
//! let registry = SystemBuilder::new()
//!     .add("router", router)
//!     .add("health", UnitDescriptor::new(|_| Ok(())).contribute(&routes, "/health"))
//!     .add("users", UnitDescriptor::new(|_| Ok(())).contribute(&routes, "/users"))
//!     .add_value("prefix", String::from("/api"))
//!     .build(&slots)
//!     .unwrap();
//!
//! let router = registry.require::<Vec<String>>("router").unwrap();
//! assert_eq!(*router, vec!["/api/health", "/api/users"]);
//! ```
//!
//! Unit System consists of the following components:
//!
//! 1. Builder - declaring units and running the assembly
//! 2. Definition - normalizing declared units
//! 3. Factories - descriptors with dependencies ([`using_deps`], [`after`])
//! 4. Dependency Graph - ordering units, detecting cycles and missing units
//! 5. Initiator - running the factories
//! 6. Container - the finished [`Registry`]
//! 7. Extensions - slots and contribution collection

pub mod builder;
pub mod container;
pub mod definition;
pub mod dependency_graph;
pub mod errors;
pub mod extensions;
pub mod factories;
pub mod initiator;
pub mod resolver;
pub mod types;

pub use builder::SystemBuilder;
pub use container::Registry;
pub use definition::{normalize, DuplicatePolicy, RawUnit, UnitDefinition};
pub use dependency_graph::toposort;
pub use errors::{AssemblyError, GraphError, InvalidArgument, RequireError};
pub use extensions::{contribution_of, ExtensionSlot, Extensions, SlotId, SlotRegistry};
pub use factories::{after, using_deps, UnitDescriptor};
pub use initiator::{Dependencies, Resolved};
pub use resolver::Resolver;
pub use types::{Dependency, DynError, Injectable, Instance};
