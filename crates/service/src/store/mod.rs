//! Entity store abstraction.
//!
//! The application treats persistence as an external collaborator with
//! a CRUD contract; `EntityStore` is that contract and `MemoryStore`
//! the in-process implementation backing the server and its tests.

use async_trait::async_trait;
use thiserror::Error;

use models::{
    CoffeeDrink, CoffeeShop, Descriptor, DescriptorPatch, DrinkPatch, Price, Rating, Review,
    ReviewPatch, ShopPatch, User, UserPatch,
};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("duplicate {0}")]
    Conflict(&'static str),
}

/// Constructor input for a user record.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub groups: Vec<String>,
}

/// Constructor input for a drink record.
#[derive(Clone, Debug)]
pub struct NewDrink {
    pub name: String,
    pub price: Price,
    pub shop: i64,
    pub volume: i16,
}

/// Constructor input for a descriptor record.
#[derive(Clone, Debug)]
pub struct NewDescriptor {
    pub name: String,
    pub description: String,
    pub color: String,
    pub parent: Option<i64>,
}

/// Constructor input for a review record; the author is part of the
/// constructor so a review is never momentarily authorless.
#[derive(Clone, Debug)]
pub struct NewReview {
    pub drink: i64,
    pub author: i64,
    pub notes: Option<String>,
    pub descriptors: Vec<i64>,
    pub overall_rating: Rating,
}

/// CRUD contract over the five entity kinds plus uploaded binaries.
///
/// Single-record operations are atomic; records are returned by value.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // users
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, input: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, StoreError>;
    /// Removes the account and clears the author reference on the
    /// user's reviews; the reviews themselves are retained.
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;
    async fn add_user_to_group(&self, id: i64, group: &str) -> Result<User, StoreError>;
    async fn set_user_photo(&self, id: i64, photo: String) -> Result<User, StoreError>;

    // shops
    async fn list_shops(&self) -> Result<Vec<CoffeeShop>, StoreError>;
    async fn get_shop(&self, id: i64) -> Result<Option<CoffeeShop>, StoreError>;
    async fn create_shop(&self, name: &str, address: &str) -> Result<CoffeeShop, StoreError>;
    async fn update_shop(&self, id: i64, patch: ShopPatch) -> Result<CoffeeShop, StoreError>;

    // drinks
    async fn get_drink(&self, id: i64) -> Result<Option<CoffeeDrink>, StoreError>;
    async fn list_drinks_by_shop(&self, shop: i64) -> Result<Vec<CoffeeDrink>, StoreError>;
    async fn create_drink(&self, input: NewDrink) -> Result<CoffeeDrink, StoreError>;
    async fn update_drink(&self, id: i64, patch: DrinkPatch) -> Result<CoffeeDrink, StoreError>;
    async fn set_drink_photo(&self, id: i64, photo: String) -> Result<CoffeeDrink, StoreError>;

    // descriptors
    async fn list_descriptors(&self) -> Result<Vec<Descriptor>, StoreError>;
    async fn get_descriptor(&self, id: i64) -> Result<Option<Descriptor>, StoreError>;
    async fn create_descriptor(&self, input: NewDescriptor) -> Result<Descriptor, StoreError>;
    async fn update_descriptor(&self, id: i64, patch: DescriptorPatch) -> Result<Descriptor, StoreError>;

    // reviews
    async fn list_reviews_by_drink(&self, drink: i64) -> Result<Vec<Review>, StoreError>;
    async fn get_review(&self, id: i64) -> Result<Option<Review>, StoreError>;
    async fn create_review(&self, input: NewReview) -> Result<Review, StoreError>;
    async fn update_review(&self, id: i64, patch: ReviewPatch) -> Result<Review, StoreError>;

    // uploaded binaries: store bytes, return an opaque reference
    async fn put_blob(&self, bytes: Vec<u8>) -> Result<String, StoreError>;
    async fn get_blob(&self, reference: &str) -> Result<Option<Vec<u8>>, StoreError>;
}
