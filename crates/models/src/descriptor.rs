use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Named, colored tag applied to reviews; descriptors form a tree via
/// the nullable parent reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Hex color, e.g. "#7f4f24".
    pub color: String,
    pub parent: Option<i64>,
}

/// Partial descriptor update; only present fields are applied.
/// `parent` distinguishes "absent" from an explicit null (detach).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DescriptorPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(default, with = "double_option")]
    pub parent: Option<Option<i64>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(Some)
    }
}

impl DescriptorPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }

    pub fn apply(&self, descriptor: &mut Descriptor) {
        if let Some(v) = &self.name {
            descriptor.name = v.clone();
        }
        if let Some(v) = &self.description {
            descriptor.description = v.clone();
        }
        if let Some(v) = &self.color {
            descriptor.color = v.clone();
        }
        if let Some(v) = self.parent {
            descriptor.parent = v;
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("descriptor name required".into()));
    }
    if name.len() > 31 {
        return Err(ModelError::Validation("descriptor name too long (<=31)".into()));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ModelError> {
    if description.len() > 127 {
        return Err(ModelError::Validation("descriptor description too long (<=127)".into()));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ModelError> {
    let hex = color.strip_prefix('#');
    let ok = matches!(hex, Some(h) if (h.len() == 3 || h.len() == 6) && h.bytes().all(|b| b.is_ascii_hexdigit()));
    if !ok {
        return Err(ModelError::Validation(format!("invalid color {color:?}, expected #rgb or #rrggbb")));
    }
    Ok(())
}
