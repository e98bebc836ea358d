//! Profile operations for the authenticated user.

use tracing::info;

use models::{user, User, UserPatch};

use crate::errors::ServiceError;
use crate::store::EntityStore;

pub async fn get_profile(store: &dyn EntityStore, id: i64) -> Result<User, ServiceError> {
    store.get_user(id).await?.ok_or_else(|| ServiceError::not_found("user"))
}

pub async fn update_profile(
    store: &dyn EntityStore,
    id: i64,
    patch: UserPatch,
) -> Result<User, ServiceError> {
    if let Some(education) = &patch.education {
        user::validate_education(education)?;
    }
    let updated = store.update_user(id, patch).await?;
    info!(user_id = updated.id, "profile_updated");
    Ok(updated)
}

/// Delete the account. The user's reviews survive with their author
/// cleared.
pub async fn delete_account(store: &dyn EntityStore, id: i64) -> Result<(), ServiceError> {
    if !store.delete_user(id).await? {
        return Err(ServiceError::not_found("user"));
    }
    info!(user_id = id, "account_deleted");
    Ok(())
}

/// Store uploaded photo bytes and point the profile at them.
pub async fn attach_photo(
    store: &dyn EntityStore,
    id: i64,
    bytes: Vec<u8>,
) -> Result<User, ServiceError> {
    if bytes.is_empty() {
        return Err(ServiceError::Validation("empty photo upload".into()));
    }
    store.get_user(id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    let path = store.put_blob(bytes).await?;
    info!(user_id = id, photo = %path, "profile_photo_attached");
    Ok(store.set_user_photo(id, path).await?)
}
