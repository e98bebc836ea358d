//! Review operations.
//!
//! Reviews are listed per drink, created with their author set up
//! front, and updated only through field-presence patches.

use tracing::info;

use models::{Review, ReviewPatch};

use crate::errors::ServiceError;
use crate::store::{EntityStore, NewReview};

pub async fn list_for_drink(store: &dyn EntityStore, drink: i64) -> Result<Vec<Review>, ServiceError> {
    Ok(store.list_reviews_by_drink(drink).await?)
}

pub async fn get_review(store: &dyn EntityStore, id: i64) -> Result<Review, ServiceError> {
    store.get_review(id).await?.ok_or_else(|| ServiceError::not_found("review"))
}

/// Create a review. Referenced descriptors must exist; the store
/// rejects unknown drinks and authors.
pub async fn create_review(store: &dyn EntityStore, input: NewReview) -> Result<Review, ServiceError> {
    for descriptor in &input.descriptors {
        store
            .get_descriptor(*descriptor)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("unknown descriptor {descriptor}")))?;
    }
    let created = store.create_review(input).await?;
    info!(review_id = created.id, drink = ?created.drink, author = ?created.author, "review_created");
    Ok(created)
}

pub async fn update_review(
    store: &dyn EntityStore,
    id: i64,
    patch: ReviewPatch,
) -> Result<Review, ServiceError> {
    if let Some(descriptors) = &patch.descriptors {
        for descriptor in descriptors {
            store
                .get_descriptor(*descriptor)
                .await?
                .ok_or_else(|| ServiceError::Validation(format!("unknown descriptor {descriptor}")))?;
        }
    }
    let updated = store.update_review(id, patch).await?;
    info!(review_id = updated.id, "review_updated");
    Ok(updated)
}
