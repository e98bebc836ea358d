use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::fixed::Price;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoffeeDrink {
    pub id: i64,
    pub name: String,
    pub price: Price,
    /// Owning shop id.
    pub shop: i64,
    /// Serving size in millilitres.
    pub volume: i16,
    pub photo: Option<String>,
}

/// Partial drink update; only present fields are applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DrinkPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub volume: Option<i16>,
}

impl DrinkPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    pub fn apply(&self, drink: &mut CoffeeDrink) {
        if let Some(v) = &self.name {
            drink.name = v.clone();
        }
        if let Some(v) = self.price {
            drink.price = v;
        }
        if let Some(v) = self.volume {
            drink.volume = v;
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("drink name required".into()));
    }
    if name.len() > 31 {
        return Err(ModelError::Validation("drink name too long (<=31)".into()));
    }
    Ok(())
}
