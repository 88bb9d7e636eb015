use std::collections::{HashMap, HashSet};

use crate::{definition::UnitDefinition, errors::GraphError, types::Dependency};

/// Orders the definitions so every referenced unit comes before the units referencing it
///
/// Only [`Dependency::Reference`] edges count, contribution requests never constrain
/// the order. Traversal starts from each definition in input order, so the result
/// is deterministic for a given input.
pub fn toposort(definitions: &[UnitDefinition]) -> Result<Vec<&UnitDefinition>, GraphError> {
    let by_name: HashMap<&str, &UnitDefinition> = definitions
        .iter()
        .map(|definition| (definition.name(), definition))
        .collect();

    let mut visited = HashSet::new();
    let mut sorted = Vec::with_capacity(definitions.len());
    for definition in definitions {
        if visited.insert(definition.name()) {
            visit(&by_name, &mut visited, &mut sorted, definition)?;
        }
    }

    tracing::debug!(
        "Resolved unit order: {:?}",
        sorted.iter().map(|d| d.name()).collect::<Vec<_>>()
    );

    return Ok(sorted);

    /// Depth first walk from `root` with an explicit stack, so deep chains can't overflow
    fn visit<'a>(
        by_name: &HashMap<&'a str, &'a UnitDefinition>,
        visited: &mut HashSet<&'a str>,
        sorted: &mut Vec<&'a UnitDefinition>,
        root: &'a UnitDefinition,
    ) -> Result<(), GraphError> {
        // The dependency chain currently walked, and the position of each unit on it
        let mut dependency_chain = vec![Frame::new(root)];
        let mut on_chain = HashMap::from([(root.name(), 0)]);

        while let Some(frame) = dependency_chain.last_mut() {
            let definition = frame.definition;
            let Some((local, dependency)) = definition.dependencies().get_index(frame.next) else {
                dependency_chain.pop();
                on_chain.remove(definition.name());
                sorted.push(definition);
                continue;
            };
            frame.next += 1;

            let Dependency::Reference(target) = dependency else {
                continue;
            };

            let Some(&next) = by_name.get(target.as_str()) else {
                return Err(GraphError::UnsatisfiedDependency {
                    unit: definition.name().to_string(),
                    dependency: local.clone(),
                    missing: target.clone(),
                });
            };

            // Circular Dependency Check - report only the part of the chain that loops
            if let Some(&start) = on_chain.get(next.name()) {
                let mut cycle: Vec<String> = dependency_chain[start..]
                    .iter()
                    .map(|frame| frame.definition.name().to_string())
                    .collect();
                cycle.push(next.name().to_string());

                return Err(GraphError::CircularDependency { cycle });
            }

            if !visited.insert(next.name()) {
                continue;
            }

            on_chain.insert(next.name(), dependency_chain.len());
            dependency_chain.push(Frame::new(next));
        }

        Ok(())
    }

    struct Frame<'a> {
        definition: &'a UnitDefinition,
        /// Index of the next dependency to look at
        next: usize,
    }
    impl<'a> Frame<'a> {
        fn new(definition: &'a UnitDefinition) -> Self {
            Frame {
                definition,
                next: 0,
            }
        }
    }
}
