use serde::{Deserialize, Serialize};

use crate::fixed::Rating;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    /// Reviewed drink; nullable to survive drink deletion.
    pub drink: Option<i64>,
    /// Authoring user; cleared when the account is deleted.
    pub author: Option<i64>,
    pub notes: Option<String>,
    /// Descriptor ids attached to this review.
    pub descriptors: Vec<i64>,
    pub overall_rating: Rating,
}

/// Partial review update; only present fields are applied.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewPatch {
    pub notes: Option<String>,
    pub descriptors: Option<Vec<i64>>,
    pub overall_rating: Option<Rating>,
}

impl ReviewPatch {
    pub fn apply(&self, review: &mut Review) {
        if let Some(v) = &self.notes {
            review.notes = Some(v.clone());
        }
        if let Some(v) = &self.descriptors {
            review.descriptors = v.clone();
        }
        if let Some(v) = self.overall_rating {
            review.overall_rating = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_serializes_with_one_digit() {
        let review = Review {
            id: 1,
            drink: Some(2),
            author: Some(3),
            notes: Some("balanced".into()),
            descriptors: vec![1, 4],
            overall_rating: "4.5".parse().unwrap(),
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["overall_rating"], "4.5");
        assert_eq!(json["descriptors"], serde_json::json!([1, 4]));
    }

    #[test]
    fn patch_merges_supplied_subset() {
        let mut review = Review {
            id: 1,
            drink: Some(2),
            author: Some(3),
            notes: None,
            descriptors: vec![],
            overall_rating: "3.0".parse().unwrap(),
        };
        let patch: ReviewPatch = serde_json::from_str(r#"{"overall_rating": 4.5}"#).unwrap();
        patch.apply(&mut review);
        assert_eq!(review.overall_rating.to_string(), "4.5");
        assert_eq!(review.notes, None);
    }
}
