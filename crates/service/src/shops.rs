//! Shop operations: filtered/ordered listing with embedded drinks,
//! creation and partial update.

use serde::Serialize;
use tracing::info;

use models::{shop, CoffeeDrink, CoffeeShop, ShopPatch};

use crate::errors::ServiceError;
use crate::store::EntityStore;

/// Exact-match filter on the whitelisted shop fields.
#[derive(Clone, Debug, Default)]
pub struct ShopFilter {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl ShopFilter {
    fn matches(&self, shop: &CoffeeShop) -> bool {
        self.name.as_ref().is_none_or(|n| *n == shop.name)
            && self.address.as_ref().is_none_or(|a| *a == shop.address)
    }
}

/// Shop with its drinks embedded as full objects.
#[derive(Debug, Serialize)]
pub struct ShopWithDrinks {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub drinks: Vec<CoffeeDrink>,
}

async fn embed_drinks(store: &dyn EntityStore, shop: CoffeeShop) -> Result<ShopWithDrinks, ServiceError> {
    let drinks = store.list_drinks_by_shop(shop.id).await?;
    Ok(ShopWithDrinks { id: shop.id, name: shop.name, address: shop.address, drinks })
}

/// Order shops by `ordering` ("field" or "-field"); ties always break
/// by ascending id.
fn order_shops(shops: &mut [CoffeeShop], ordering: Option<&str>) -> Result<(), ServiceError> {
    let Some(spec) = ordering else {
        shops.sort_by_key(|s| s.id);
        return Ok(());
    };
    let (field, descending) = match spec.strip_prefix('-') {
        Some(field) => (field, true),
        None => (spec, false),
    };
    match field {
        "id" => shops.sort_by(|a, b| {
            let ord = a.id.cmp(&b.id);
            if descending { ord.reverse() } else { ord }
        }),
        "name" => shops.sort_by(|a, b| {
            let ord = a.name.cmp(&b.name);
            let ord = if descending { ord.reverse() } else { ord };
            ord.then(a.id.cmp(&b.id))
        }),
        "address" => shops.sort_by(|a, b| {
            let ord = a.address.cmp(&b.address);
            let ord = if descending { ord.reverse() } else { ord };
            ord.then(a.id.cmp(&b.id))
        }),
        other => {
            return Err(ServiceError::Validation(format!("unknown ordering field {other:?}")));
        }
    }
    Ok(())
}

/// List shops matching `filter`, ordered per `ordering`, each with its
/// drinks embedded.
pub async fn list_shops(
    store: &dyn EntityStore,
    filter: &ShopFilter,
    ordering: Option<&str>,
) -> Result<Vec<ShopWithDrinks>, ServiceError> {
    let mut shops: Vec<CoffeeShop> =
        store.list_shops().await?.into_iter().filter(|s| filter.matches(s)).collect();
    order_shops(&mut shops, ordering)?;

    let mut out = Vec::with_capacity(shops.len());
    for s in shops {
        out.push(embed_drinks(store, s).await?);
    }
    Ok(out)
}

/// Fetch one shop with its drinks embedded.
pub async fn get_shop(store: &dyn EntityStore, id: i64) -> Result<ShopWithDrinks, ServiceError> {
    let shop = store.get_shop(id).await?.ok_or_else(|| ServiceError::not_found("shop"))?;
    embed_drinks(store, shop).await
}

pub async fn create_shop(
    store: &dyn EntityStore,
    name: &str,
    address: &str,
) -> Result<CoffeeShop, ServiceError> {
    shop::validate_name(name)?;
    shop::validate_address(address)?;
    let created = store.create_shop(name, address).await?;
    info!(shop_id = created.id, name = %created.name, "shop_created");
    Ok(created)
}

pub async fn update_shop(
    store: &dyn EntityStore,
    id: i64,
    patch: ShopPatch,
) -> Result<CoffeeShop, ServiceError> {
    patch.validate()?;
    let updated = store.update_shop(id, patch).await?;
    info!(shop_id = updated.id, "shop_updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewDrink};

    async fn seed(store: &MemoryStore) -> anyhow::Result<()> {
        store.create_shop("test1", "test_addr1").await?;
        store.create_shop("test2", "test_addr2").await?;
        store.create_shop("test3", "test_addr1").await?;
        store
            .create_drink(NewDrink { name: "test1".into(), price: "99.99".parse()?, shop: 1, volume: 300 })
            .await?;
        store
            .create_drink(NewDrink { name: "test2".into(), price: "19.99".parse()?, shop: 1, volume: 100 })
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn filter_is_exact_match_on_both_fields() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        seed(&store).await?;

        let all = list_shops(store.as_ref(), &ShopFilter::default(), None).await?;
        assert_eq!(all.len(), 3);

        let none = list_shops(
            store.as_ref(),
            &ShopFilter { name: Some("test1111".into()), ..Default::default() },
            None,
        )
        .await?;
        assert!(none.is_empty());

        let both = list_shops(
            store.as_ref(),
            &ShopFilter { name: Some("test1".into()), address: Some("test_addr1".into()) },
            None,
        )
        .await?;
        assert_eq!(both.len(), 1);

        let mismatch = list_shops(
            store.as_ref(),
            &ShopFilter { name: Some("test1".into()), address: Some("test_addr2".into()) },
            None,
        )
        .await?;
        assert!(mismatch.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ordering_descending_with_id_tiebreak() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        seed(&store).await?;

        let shops = list_shops(store.as_ref(), &ShopFilter::default(), Some("-name")).await?;
        let names: Vec<&str> = shops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["test3", "test2", "test1"]);

        // Equal addresses: tie broken by ascending id even when descending.
        let shops = list_shops(store.as_ref(), &ShopFilter::default(), Some("-address")).await?;
        let ids: Vec<i64> = shops.iter().map(|s| s.id).collect();
        assert_eq!(ids, [2, 1, 3]);

        let err = list_shops(store.as_ref(), &ShopFilter::default(), Some("bogus")).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn single_shop_embeds_full_drinks() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        seed(&store).await?;

        let shop = get_shop(store.as_ref(), 1).await?;
        assert_eq!(shop.drinks.len(), 2);
        assert_eq!(shop.drinks[0].name, "test1");
        assert_eq!(shop.drinks[0].price.to_string(), "99.99");
        assert_eq!(shop.drinks[0].volume, 300);

        let empty = get_shop(store.as_ref(), 2).await?;
        assert!(empty.drinks.is_empty());

        let missing = get_shop(store.as_ref(), 1111).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_supplied_subset() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        seed(&store).await?;

        let patch = ShopPatch { name: Some("renamed".into()), address: None };
        let updated = update_shop(store.as_ref(), 1, patch).await?;
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.address, "test_addr1");

        let missing = update_shop(store.as_ref(), 1111, ShopPatch::default()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
