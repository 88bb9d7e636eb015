use crate::{errors::RequireError, initiator::Dependencies};

pub mod arc;
pub mod contributions;

/// Allows custom behaviour when a factory pulls a dependency out of its resolved map
pub trait Resolver {
    fn resolve(deps: &Dependencies, name: &str) -> Result<Self, RequireError>
    where
        Self: Sized;
}

impl<Resolvable: Resolver> Resolver for Option<Resolvable> {
    fn resolve(deps: &Dependencies, name: &str) -> Result<Self, RequireError>
    where
        Self: Sized,
    {
        match Resolvable::resolve(deps, name) {
            Ok(resolved) => Ok(Some(resolved)),
            // If nothing was declared under this name Option does not fail
            Err(RequireError::DependencyMissing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
