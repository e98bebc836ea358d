//! Domain entities for the coffee-shop review application.
//! - Plain structs with serde derives; persistence lives behind the
//!   store trait in the `service` crate.
//! - Field validation helpers sit next to the entity they validate.

pub mod errors;
pub mod fixed;

pub mod descriptor;
pub mod drink;
pub mod review;
pub mod shop;
pub mod user;

pub use descriptor::{Descriptor, DescriptorPatch};
pub use drink::{CoffeeDrink, DrinkPatch};
pub use fixed::{Price, Rating};
pub use review::{Review, ReviewPatch};
pub use shop::{CoffeeShop, ShopPatch};
pub use user::{User, UserPatch, GROUP_SHOP_OWNER};
