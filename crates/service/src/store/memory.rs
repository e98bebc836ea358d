use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::{
    CoffeeDrink, CoffeeShop, Descriptor, DescriptorPatch, DrinkPatch, Review, ReviewPatch,
    ShopPatch, User, UserPatch,
};

use super::{EntityStore, NewDescriptor, NewDrink, NewReview, NewUser, StoreError};

/// In-memory entity store.
///
/// `BTreeMap` keys double as primary keys and give iteration in id
/// order; per-table sequences start at 1 like the original database.
#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    shops: BTreeMap<i64, CoffeeShop>,
    drinks: BTreeMap<i64, CoffeeDrink>,
    descriptors: BTreeMap<i64, Descriptor>,
    reviews: BTreeMap<i64, Review>,
    blobs: HashMap<String, Vec<u8>>,

    next_user: i64,
    next_shop: i64,
    next_drink: i64,
    next_descriptor: i64,
    next_review: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict("username"));
        }
        let id = next_id(&mut inner.next_user);
        let user = User {
            id,
            username: input.username,
            password_hash: input.password_hash,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            education: String::new(),
            photo: None,
            groups: input.groups,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("user"))?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let existed = inner.users.remove(&id).is_some();
        if existed {
            // Set-null cascade: the reviews stay, authorless.
            for review in inner.reviews.values_mut() {
                if review.author == Some(id) {
                    review.author = None;
                }
            }
        }
        Ok(existed)
    }

    async fn add_user_to_group(&self, id: i64, group: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("user"))?;
        if !user.in_group(group) {
            user.groups.push(group.to_string());
        }
        Ok(user.clone())
    }

    async fn set_user_photo(&self, id: i64, photo: String) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("user"))?;
        user.photo = Some(photo);
        Ok(user.clone())
    }

    async fn list_shops(&self) -> Result<Vec<CoffeeShop>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.shops.values().cloned().collect())
    }

    async fn get_shop(&self, id: i64) -> Result<Option<CoffeeShop>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.shops.get(&id).cloned())
    }

    async fn create_shop(&self, name: &str, address: &str) -> Result<CoffeeShop, StoreError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.next_shop);
        let shop = CoffeeShop { id, name: name.to_string(), address: address.to_string() };
        inner.shops.insert(id, shop.clone());
        Ok(shop)
    }

    async fn update_shop(&self, id: i64, patch: ShopPatch) -> Result<CoffeeShop, StoreError> {
        let mut inner = self.inner.write().await;
        let shop = inner.shops.get_mut(&id).ok_or(StoreError::NotFound("shop"))?;
        patch.apply(shop);
        Ok(shop.clone())
    }

    async fn get_drink(&self, id: i64) -> Result<Option<CoffeeDrink>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.drinks.get(&id).cloned())
    }

    async fn list_drinks_by_shop(&self, shop: i64) -> Result<Vec<CoffeeDrink>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.drinks.values().filter(|d| d.shop == shop).cloned().collect())
    }

    async fn create_drink(&self, input: NewDrink) -> Result<CoffeeDrink, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.shops.contains_key(&input.shop) {
            return Err(StoreError::NotFound("shop"));
        }
        let id = next_id(&mut inner.next_drink);
        let drink = CoffeeDrink {
            id,
            name: input.name,
            price: input.price,
            shop: input.shop,
            volume: input.volume,
            photo: None,
        };
        inner.drinks.insert(id, drink.clone());
        Ok(drink)
    }

    async fn update_drink(&self, id: i64, patch: DrinkPatch) -> Result<CoffeeDrink, StoreError> {
        let mut inner = self.inner.write().await;
        let drink = inner.drinks.get_mut(&id).ok_or(StoreError::NotFound("drink"))?;
        patch.apply(drink);
        Ok(drink.clone())
    }

    async fn set_drink_photo(&self, id: i64, photo: String) -> Result<CoffeeDrink, StoreError> {
        let mut inner = self.inner.write().await;
        let drink = inner.drinks.get_mut(&id).ok_or(StoreError::NotFound("drink"))?;
        drink.photo = Some(photo);
        Ok(drink.clone())
    }

    async fn list_descriptors(&self) -> Result<Vec<Descriptor>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.descriptors.values().cloned().collect())
    }

    async fn get_descriptor(&self, id: i64) -> Result<Option<Descriptor>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.descriptors.get(&id).cloned())
    }

    async fn create_descriptor(&self, input: NewDescriptor) -> Result<Descriptor, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(parent) = input.parent {
            if !inner.descriptors.contains_key(&parent) {
                return Err(StoreError::NotFound("descriptor"));
            }
        }
        let id = next_id(&mut inner.next_descriptor);
        let descriptor = Descriptor {
            id,
            name: input.name,
            description: input.description,
            color: input.color,
            parent: input.parent,
        };
        inner.descriptors.insert(id, descriptor.clone());
        Ok(descriptor)
    }

    async fn update_descriptor(&self, id: i64, patch: DescriptorPatch) -> Result<Descriptor, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(Some(parent)) = patch.parent {
            if !inner.descriptors.contains_key(&parent) {
                return Err(StoreError::NotFound("descriptor"));
            }
        }
        let descriptor = inner.descriptors.get_mut(&id).ok_or(StoreError::NotFound("descriptor"))?;
        patch.apply(descriptor);
        Ok(descriptor.clone())
    }

    async fn list_reviews_by_drink(&self, drink: i64) -> Result<Vec<Review>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.values().filter(|r| r.drink == Some(drink)).cloned().collect())
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.get(&id).cloned())
    }

    async fn create_review(&self, input: NewReview) -> Result<Review, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.drinks.contains_key(&input.drink) {
            return Err(StoreError::NotFound("drink"));
        }
        if !inner.users.contains_key(&input.author) {
            return Err(StoreError::NotFound("user"));
        }
        let id = next_id(&mut inner.next_review);
        let review = Review {
            id,
            drink: Some(input.drink),
            author: Some(input.author),
            notes: input.notes,
            descriptors: input.descriptors,
            overall_rating: input.overall_rating,
        };
        inner.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, id: i64, patch: ReviewPatch) -> Result<Review, StoreError> {
        let mut inner = self.inner.write().await;
        let review = inner.reviews.get_mut(&id).ok_or(StoreError::NotFound("review"))?;
        patch.apply(review);
        Ok(review.clone())
    }

    async fn put_blob(&self, bytes: Vec<u8>) -> Result<String, StoreError> {
        let mut inner = self.inner.write().await;
        let reference = format!("media/{}", Uuid::new_v4());
        inner.blobs.insert(reference.clone(), bytes);
        Ok(reference)
    }

    async fn get_blob(&self, reference: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.blobs.get(reference).cloned())
    }
}
