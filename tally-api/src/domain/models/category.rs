use serde::Serialize;

use super::{CategoryId, UserId};

pub const MAX_CATEGORY_NAME_LEN: usize = 100;

pub const CATEGORY_IN_USE: &str = "Category is still used by expenses or budgets";

/// A user-scoped expense category. `(user_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
}

/// Normalize a user supplied category name, rejecting blank or oversized names.
pub fn normalize_category_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_are_trimmed() {
        assert_eq!(normalize_category_name("  Food "), Some("Food".to_string()));
        assert_eq!(normalize_category_name("   "), None);
        assert_eq!(normalize_category_name(&"x".repeat(101)), None);
    }
}
