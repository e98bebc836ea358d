//! Tasting descriptor operations.
//!
//! Descriptors form a parent-linked tree; reparenting walks the
//! ancestor chain so no update can introduce a cycle.

use std::collections::HashSet;

use tracing::info;

use models::{descriptor, Descriptor, DescriptorPatch};

use crate::errors::ServiceError;
use crate::store::{EntityStore, NewDescriptor};

pub async fn list_descriptors(store: &dyn EntityStore) -> Result<Vec<Descriptor>, ServiceError> {
    Ok(store.list_descriptors().await?)
}

pub async fn get_descriptor(store: &dyn EntityStore, id: i64) -> Result<Descriptor, ServiceError> {
    store.get_descriptor(id).await?.ok_or_else(|| ServiceError::not_found("descriptor"))
}

pub async fn create_descriptor(
    store: &dyn EntityStore,
    input: NewDescriptor,
) -> Result<Descriptor, ServiceError> {
    descriptor::validate_name(&input.name)?;
    descriptor::validate_description(&input.description)?;
    descriptor::validate_color(&input.color)?;
    let created = store.create_descriptor(input).await?;
    info!(descriptor_id = created.id, name = %created.name, "descriptor_created");
    Ok(created)
}

pub async fn update_descriptor(
    store: &dyn EntityStore,
    id: i64,
    patch: DescriptorPatch,
) -> Result<Descriptor, ServiceError> {
    patch.validate()?;
    if let Some(Some(parent)) = patch.parent {
        ensure_no_cycle(store, id, parent).await?;
    }
    let updated = store.update_descriptor(id, patch).await?;
    info!(descriptor_id = updated.id, "descriptor_updated");
    Ok(updated)
}

/// Walk the ancestor chain starting at `new_parent`; if it reaches
/// `id`, the reparent would close a loop.
async fn ensure_no_cycle(
    store: &dyn EntityStore,
    id: i64,
    new_parent: i64,
) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(ancestor) = current {
        if ancestor == id {
            return Err(ServiceError::Validation("descriptor parent would form a cycle".into()));
        }
        if !seen.insert(ancestor) {
            // Pre-existing loop in stored data; refuse rather than spin.
            return Err(ServiceError::Validation("descriptor ancestry is cyclic".into()));
        }
        current = store
            .get_descriptor(ancestor)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("unknown descriptor {ancestor}")))?
            .parent;
    }
    Ok(())
}
