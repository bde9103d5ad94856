use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::Date;

use super::{BudgetId, CategoryId, UserId};
use crate::utils::date_format::iso_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum BudgetStatus {
    Active,
    Completed,
    Exceeded,
}

impl BudgetStatus {
    /// Status is derived, never set directly: exceeded wins over an elapsed
    /// period.
    pub fn derive(spent: f64, budgeted: f64, end_date: Date, today: Date) -> Self {
        if spent >= budgeted {
            Self::Exceeded
        } else if today > end_date {
            Self::Completed
        } else {
            Self::Active
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub budgeted_amount: f64,
    pub spent_amount: f64,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub is_fixed: bool,
    pub status: BudgetStatus,
}

impl Budget {
    /// Whether `date` falls inside the inclusive budget period.
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    pub fn remaining_amount(&self) -> f64 {
        self.budgeted_amount - self.spent_amount
    }

    pub fn utilization_percentage(&self) -> i64 {
        if self.budgeted_amount <= 0.0 {
            return 0;
        }
        (self.spent_amount / self.budgeted_amount * 100.0).round() as i64
    }
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub budgeted_amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub is_fixed: bool,
    pub status: BudgetStatus,
}

/// Caller supplied budget fields; the category arrives by name.
#[derive(Debug, Clone)]
pub struct CreateBudgetRequest {
    pub category_name: String,
    pub budgeted_amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetRequest {
    pub category_name: Option<String>,
    pub budgeted_amount: Option<f64>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub is_fixed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetFilter {
    pub start_from: Option<Date>,
    pub start_to: Option<Date>,
}

/// Result of applying a signed delta to a budget's spent amount.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub budget: Budget,
    /// `spent_amount` before the delta was applied.
    pub previous_spent: f64,
}

impl LedgerEntry {
    /// True when the delta would have driven the spent amount below zero.
    pub fn was_clamped(&self, delta: f64) -> bool {
        self.previous_spent + delta < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn exceeded_takes_precedence_over_completed() {
        let end = date!(2024 - 01 - 31);
        assert_eq!(
            BudgetStatus::derive(1000.0, 1000.0, end, date!(2024 - 03 - 01)),
            BudgetStatus::Exceeded
        );
        assert_eq!(
            BudgetStatus::derive(10.0, 1000.0, end, date!(2024 - 03 - 01)),
            BudgetStatus::Completed
        );
        assert_eq!(
            BudgetStatus::derive(10.0, 1000.0, end, date!(2024 - 01 - 31)),
            BudgetStatus::Active
        );
    }

    #[test]
    fn utilization_handles_zero_budget() {
        let budget = Budget {
            id: BudgetId::new(1),
            user_id: UserId::new(1),
            category_id: CategoryId::new(1),
            budgeted_amount: 0.0,
            spent_amount: 50.0,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 01 - 31),
            is_fixed: false,
            status: BudgetStatus::Exceeded,
        };
        assert_eq!(budget.utilization_percentage(), 0);
        assert_eq!(budget.remaining_amount(), -50.0);
    }
}
