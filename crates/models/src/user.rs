use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Members of this group may create and update shops and drinks.
pub const GROUP_SHOP_OWNER: &str = "shop owner";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 hash; never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub education: String,
    pub photo: Option<String>,
    pub groups: Vec<String>,
}

impl User {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Partial profile update; only present fields are applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub education: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.education {
            user.education = v.clone();
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    if username.len() > 150 {
        return Err(ModelError::Validation("username too long (<=150)".into()));
    }
    Ok(())
}

pub fn validate_education(education: &str) -> Result<(), ModelError> {
    if education.len() > 63 {
        return Err(ModelError::Validation("education too long (<=63)".into()));
    }
    Ok(())
}
