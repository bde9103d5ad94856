use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::Date;

use super::{BudgetId, CategoryId, ExpenseId, UserId};
use crate::utils::date_format::iso_date;

pub const MAX_BILL_NO_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    #[strum(serialize = "UPI")]
    Upi,
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    #[strum(serialize = "Debit Card")]
    DebitCard,
    Cash,
    Wallet,
    #[serde(rename = "Net Banking")]
    #[strum(serialize = "Net Banking")]
    NetBanking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub amount: f64,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub category_id: CategoryId,
    pub payment_method: PaymentMethod,
    pub bill_no: Option<String>,
    pub description: Option<String>,
    /// Linked once when the expense is written; see the expense coordinator.
    pub budget_id: Option<BudgetId>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: UserId,
    pub amount: f64,
    pub date: Date,
    pub category_id: CategoryId,
    pub payment_method: PaymentMethod,
    pub bill_no: Option<String>,
    pub description: Option<String>,
    pub budget_id: Option<BudgetId>,
}

#[derive(Debug, Clone)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub date: Option<Date>,
    pub category_name: String,
    pub payment_method: PaymentMethod,
    pub bill_no: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub date: Option<Date>,
    pub category_name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub bill_no: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl ExpenseFilter {
    pub fn between(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    pub fn matches(&self, date: Date) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn payment_methods_use_display_names() {
        assert_eq!(
            PaymentMethod::from_str("Net Banking").unwrap(),
            PaymentMethod::NetBanking
        );
        assert_eq!(PaymentMethod::CreditCard.to_string(), "Credit Card");
        assert!(PaymentMethod::from_str("Cheque").is_err());
    }
}
