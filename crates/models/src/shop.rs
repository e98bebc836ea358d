use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoffeeShop {
    pub id: i64,
    pub name: String,
    pub address: String,
}

/// Partial shop update; only present fields are applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ShopPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl ShopPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(address) = &self.address {
            validate_address(address)?;
        }
        Ok(())
    }

    pub fn apply(&self, shop: &mut CoffeeShop) {
        if let Some(v) = &self.name {
            shop.name = v.clone();
        }
        if let Some(v) = &self.address {
            shop.address = v.clone();
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("shop name required".into()));
    }
    if name.len() > 63 {
        return Err(ModelError::Validation("shop name too long (<=63)".into()));
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), ModelError> {
    if address.trim().is_empty() {
        return Err(ModelError::Validation("shop address required".into()));
    }
    if address.len() > 255 {
        return Err(ModelError::Validation("shop address too long (<=255)".into()));
    }
    Ok(())
}
