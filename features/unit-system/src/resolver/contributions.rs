use std::{any::type_name, sync::Arc};

use crate::{
    errors::RequireError,
    initiator::{Dependencies, Resolved},
    resolver::Resolver,
    types::Injectable,
};

/// All contributions must be of type `T`
impl<T: Injectable> Resolver for Vec<Arc<T>> {
    fn resolve(deps: &Dependencies, name: &str) -> Result<Self, RequireError> {
        let contributions = match deps.raw(name) {
            Some(Resolved::Contributions(contributions)) => contributions,
            Some(Resolved::Unit(_)) => {
                return Err(RequireError::NotContributions(name.to_string()))
            }
            None => return Err(RequireError::DependencyMissing(name.to_string())),
        };

        contributions
            .iter()
            .map(|contribution| {
                contribution
                    .downcast::<T>()
                    .map_err(|actual_type| RequireError::DowncastFailed {
                        required_type: type_name::<T>(),
                        actual_type,
                    })
            })
            .collect()
    }
}
