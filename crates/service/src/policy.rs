//! Authorization policy.
//!
//! A pure decision function over the caller (if any) and the attempted
//! action. Group membership comes from the caller's validated token,
//! so no store lookup happens here.

use models::GROUP_SHOP_OWNER;

use crate::auth::Caller;

/// Actions subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    ReadShops,
    MutateShop,
    ReadDrinks,
    MutateDrink,
    ReadReviews,
    CreateReview,
    /// Updating the review whose stored author is carried here.
    UpdateReview { author: Option<i64> },
    ReadDescriptors,
    MutateDescriptor,
    /// Read/update/delete of the caller's own profile.
    Profile,
}

/// Decide whether `caller` may perform `action`.
pub fn allow(caller: Option<&Caller>, action: Action) -> bool {
    match action {
        Action::ReadShops | Action::ReadDrinks | Action::ReadReviews | Action::ReadDescriptors => true,
        Action::MutateShop | Action::MutateDrink => {
            caller.is_some_and(|c| c.in_group(GROUP_SHOP_OWNER))
        }
        Action::CreateReview | Action::MutateDescriptor | Action::Profile => caller.is_some(),
        Action::UpdateReview { author } => match (caller, author) {
            (Some(c), Some(author)) => c.user_id == author,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i64, groups: &[&str]) -> Caller {
        Caller {
            user_id: id,
            username: format!("user{id}"),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn anonymous_may_read_everything() {
        for action in [Action::ReadShops, Action::ReadDrinks, Action::ReadReviews, Action::ReadDescriptors] {
            assert!(allow(None, action));
        }
    }

    #[test]
    fn shop_mutation_needs_shop_owner_group() {
        let plain = caller(1, &[]);
        let owner = caller(2, &[GROUP_SHOP_OWNER]);
        assert!(!allow(None, Action::MutateShop));
        assert!(!allow(Some(&plain), Action::MutateShop));
        assert!(allow(Some(&owner), Action::MutateShop));
        assert!(allow(Some(&owner), Action::MutateDrink));
    }

    #[test]
    fn review_update_is_author_only() {
        let author = caller(1, &[]);
        let other = caller(2, &[GROUP_SHOP_OWNER]);
        assert!(allow(Some(&author), Action::UpdateReview { author: Some(1) }));
        assert!(!allow(Some(&other), Action::UpdateReview { author: Some(1) }));
        // Orphaned review (author cleared) is not updatable by anyone.
        assert!(!allow(Some(&author), Action::UpdateReview { author: None }));
        assert!(!allow(None, Action::UpdateReview { author: Some(1) }));
    }

    #[test]
    fn authenticated_only_actions() {
        let plain = caller(1, &[]);
        assert!(allow(Some(&plain), Action::CreateReview));
        assert!(allow(Some(&plain), Action::Profile));
        assert!(!allow(None, Action::CreateReview));
        assert!(!allow(None, Action::Profile));
    }
}
