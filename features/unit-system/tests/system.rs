use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pretty_assertions::assert_eq;
use unit_system::{
    after, contribution_of, using_deps, AssemblyError, Dependencies, DuplicatePolicy, DynError,
    ExtensionSlot, GraphError, InvalidArgument, RawUnit, SlotRegistry, SystemBuilder,
    UnitDescriptor,
};

fn cycle_of(error: AssemblyError) -> Vec<String> {
    match error {
        AssemblyError::Graph(GraphError::CircularDependency { cycle }) => cycle,
        other => panic!("expected a circular dependency, got {other:?}"),
    }
}

fn counting(
    calls: &Arc<AtomicUsize>,
    value: i32,
) -> impl Fn(&Dependencies) -> Result<i32, DynError> + Send + Sync + 'static {
    let calls = calls.clone();
    move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }
}

#[test]
fn direct_references() {
    let registry = SystemBuilder::new()
        .add_factory("a", |_| Ok(1))
        .add(
            "b",
            using_deps(["a"], |deps| Ok(*deps.get::<i32>("a")? + 1)).unwrap(),
        )
        .build(&SlotRegistry::new())
        .unwrap();

    assert_eq!(*registry.require::<i32>("a").unwrap(), 1);
    assert_eq!(*registry.require::<i32>("b").unwrap(), 2);
}

#[test]
fn cycle_is_fatal() {
    let error = SystemBuilder::new()
        .add("a", using_deps(["b"], |deps| Ok(*deps.get::<i32>("b")?)).unwrap())
        .add("b", using_deps(["a"], |deps| Ok(*deps.get::<i32>("a")?)).unwrap())
        .build(&SlotRegistry::new())
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Circular dependency (->: depends on): a -> b -> a"
    );
    assert_eq!(cycle_of(error), vec!["a", "b", "a"]);
}

#[test]
fn missing_dependency() {
    let error = SystemBuilder::new()
        .add("a", using_deps(["x"], |deps| Ok(*deps.get::<i32>("x")?)).unwrap())
        .build(&SlotRegistry::new())
        .unwrap_err();

    match error {
        AssemblyError::Graph(GraphError::UnsatisfiedDependency {
            unit,
            dependency,
            missing,
        }) => {
            assert_eq!(unit, "a");
            assert_eq!(dependency, "x");
            assert_eq!(missing, "x");
        }
        other => panic!("expected an unsatisfied dependency, got {other:?}"),
    }
}

#[test]
fn contributions_skip_units_without_one() {
    let mut slots = SlotRegistry::new();
    let slot = slots.declare("S");

    let registry = SystemBuilder::new()
        .add("first", UnitDescriptor::new(|_| Ok(1_u8)).contribute(&slot, "x"))
        .add_value("plain", 2_u8)
        .add("third", UnitDescriptor::new(|_| Ok(3_u8)).contribute(&slot, "y"))
        .add(
            "collector",
            using_deps([("items", slots.contributions(&slot).unwrap())], |deps| {
                let items = deps.contributions::<&str>("items")?;
                Ok(items.iter().map(|item| **item).collect::<Vec<_>>())
            })
            .unwrap(),
        )
        .build(&slots)
        .unwrap();

    assert_eq!(*registry.require::<Vec<&str>>("collector").unwrap(), vec!["x", "y"]);
}

#[test]
fn contributor_may_depend_on_its_collector() {
    let mut slots = SlotRegistry::new();
    let slot = slots.declare("listeners");

    let registry = SystemBuilder::new()
        .add(
            "listener",
            after(["bus"], |_| Ok("listener"))
                .unwrap()
                .contribute(&slot, "on_start"),
        )
        .add(
            "bus",
            using_deps([("listeners", contribution_of(&slots, &slot).unwrap())], |deps| {
                Ok(deps.contributions::<&str>("listeners")?.len())
            })
            .unwrap(),
        )
        .build(&slots)
        .unwrap();

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["bus", "listener"]);
    assert_eq!(*registry.require::<usize>("bus").unwrap(), 1);
}

#[test]
fn each_factory_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));

    let registry = SystemBuilder::new()
        .add("top", using_deps(["left", "right"], counting(&calls, 0)).unwrap())
        .add("left", using_deps(["base"], counting(&calls, 1)).unwrap())
        .add("right", using_deps(["base"], counting(&calls, 2)).unwrap())
        .add("base", RawUnit::factory(counting(&calls, 3)))
        .build(&SlotRegistry::new())
        .unwrap();

    assert_eq!(registry.len(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn values_are_shared_not_copied() {
    let registry = SystemBuilder::new()
        .add_value("config", String::from("shared"))
        .add(
            "holder",
            using_deps(["config"], |deps| {
                deps.get::<String>("config").map_err(Into::into)
            })
            .unwrap(),
        )
        .build(&SlotRegistry::new())
        .unwrap();

    let config = registry.require::<String>("config").unwrap();
    let held = registry.require::<Arc<String>>("holder").unwrap();
    assert!(Arc::ptr_eq(&config, &*held));
}

#[test]
fn pairs_form_with_duplicates() {
    let pairs = vec![
        ("a", RawUnit::value(1)),
        ("b", RawUnit::value(2)),
        ("a", RawUnit::value(3)),
    ];

    let registry = SystemBuilder::from_pairs(pairs)
        .build(&SlotRegistry::new())
        .unwrap();
    assert_eq!(*registry.require::<i32>("a").unwrap(), 3);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);

    let rejected = SystemBuilder::from_pairs([("a", RawUnit::value(1)), ("a", RawUnit::value(2))])
        .duplicate_policy(DuplicatePolicy::Reject)
        .build(&SlotRegistry::new())
        .unwrap_err();
    assert!(matches!(
        rejected,
        AssemblyError::InvalidArgument(InvalidArgument::DuplicateUnit(_))
    ));
}

#[test]
fn foreign_slot_is_invalid() {
    let slots = SlotRegistry::new();
    let foreign = ExtensionSlot::new("foreign");

    assert_eq!(
        contribution_of(&slots, &foreign).unwrap_err(),
        InvalidArgument::UnknownSlot {
            slot: "foreign".to_string()
        }
    );
}

#[test]
fn factory_error_fails_the_whole_system() {
    let error = SystemBuilder::new()
        .add_value("port", 0_u16)
        .add(
            "server",
            using_deps(["port"], |deps| {
                let port = deps.get::<u16>("port")?;
                if *port == 0 {
                    return Err("port must not be 0".into());
                }
                Ok(*port)
            })
            .unwrap(),
        )
        .build(&SlotRegistry::new())
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Factory for 'server' failed - error: port must not be 0"
    );
}

#[test]
fn wrong_dependency_type_surfaces_as_factory_error() {
    let error = SystemBuilder::new()
        .add_value("port", 8080_u16)
        .add("server", using_deps(["port"], |deps| Ok(*deps.get::<u32>("port")?)).unwrap())
        .build(&SlotRegistry::new())
        .unwrap_err();

    assert!(matches!(error, AssemblyError::FactoryFailed { unit, .. } if unit == "server"));
}
