//! Drink operations.

use tracing::info;

use models::{drink, CoffeeDrink, DrinkPatch};

use crate::errors::ServiceError;
use crate::store::{EntityStore, NewDrink};

pub async fn get_drink(store: &dyn EntityStore, id: i64) -> Result<CoffeeDrink, ServiceError> {
    store.get_drink(id).await?.ok_or_else(|| ServiceError::not_found("drink"))
}

/// Create a drink under an existing shop.
pub async fn create_drink(store: &dyn EntityStore, input: NewDrink) -> Result<CoffeeDrink, ServiceError> {
    drink::validate_name(&input.name)?;
    let created = store.create_drink(input).await?;
    info!(drink_id = created.id, shop_id = created.shop, name = %created.name, "drink_created");
    Ok(created)
}

pub async fn update_drink(
    store: &dyn EntityStore,
    id: i64,
    patch: DrinkPatch,
) -> Result<CoffeeDrink, ServiceError> {
    patch.validate()?;
    let updated = store.update_drink(id, patch).await?;
    info!(drink_id = updated.id, "drink_updated");
    Ok(updated)
}

/// Store uploaded photo bytes and point the drink at them.
pub async fn attach_photo(
    store: &dyn EntityStore,
    id: i64,
    bytes: Vec<u8>,
) -> Result<CoffeeDrink, ServiceError> {
    if bytes.is_empty() {
        return Err(ServiceError::Validation("empty photo upload".into()));
    }
    // Ensure the drink exists before persisting the blob.
    store.get_drink(id).await?.ok_or_else(|| ServiceError::not_found("drink"))?;
    let path = store.put_blob(bytes).await?;
    info!(drink_id = id, photo = %path, "drink_photo_attached");
    let updated = store.set_drink_photo(id, path).await?;
    Ok(updated)
}
