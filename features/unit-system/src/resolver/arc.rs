use std::{any::type_name, sync::Arc};

use crate::{
    errors::RequireError,
    initiator::{Dependencies, Resolved},
    resolver::Resolver,
    types::Injectable,
};

impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(deps: &Dependencies, name: &str) -> Result<Self, RequireError> {
        let resolved = match deps.raw(name) {
            Some(Resolved::Unit(instance)) => instance,
            Some(Resolved::Contributions(_)) => {
                return Err(RequireError::NotAUnit(name.to_string()));
            }
            None => return Err(RequireError::DependencyMissing(name.to_string())),
        };

        resolved
            .downcast::<T>()
            .map_err(|actual_type| RequireError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }
}
