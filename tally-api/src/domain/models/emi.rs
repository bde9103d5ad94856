use serde::Serialize;
use time::Date;

use super::{EmiId, UserId};
use crate::utils::date_format::iso_date;

/// A loan repaid in equated monthly instalments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Emi {
    pub id: EmiId,
    pub user_id: UserId,
    pub loan_name: String,
    pub principal: f64,
    /// Annual interest rate in percent.
    pub roi: f64,
    pub tenure_months: i32,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub emi_amount: f64,
    pub is_preclosed: bool,
}

/// Monthly instalment from the standard amortization formula, rounded to a
/// whole unit. A zero rate degrades to an even split of the principal.
pub fn monthly_instalment(principal: f64, roi: f64, tenure_months: i32) -> f64 {
    if tenure_months <= 0 {
        return 0.0;
    }
    let n = tenure_months as f64;
    let r = roi / 12.0 / 100.0;
    let growth = (1.0 + r).powf(n);
    if r == 0.0 || growth == 1.0 || !growth.is_finite() {
        return (principal / n).round();
    }
    (principal * r * growth / (growth - 1.0)).round()
}

#[derive(Debug, Clone)]
pub struct NewEmi {
    pub user_id: UserId,
    pub loan_name: String,
    pub principal: f64,
    pub roi: f64,
    pub tenure_months: i32,
    pub due_date: Date,
    pub emi_amount: f64,
    pub is_preclosed: bool,
}

#[derive(Debug, Clone)]
pub struct CreateEmiRequest {
    pub loan_name: String,
    pub principal: f64,
    pub roi: f64,
    pub tenure_months: i32,
    pub due_date: Date,
    pub is_preclosed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEmiRequest {
    pub loan_name: Option<String>,
    pub principal: Option<f64>,
    pub roi: Option<f64>,
    pub tenure_months: Option<i32>,
    pub due_date: Option<Date>,
    pub is_preclosed: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmiFilter {
    pub is_preclosed: Option<bool>,
    pub due_before: Option<Date>,
    pub due_after: Option<Date>,
}

impl EmiFilter {
    pub fn active() -> Self {
        Self {
            is_preclosed: Some(false),
            ..Self::default()
        }
    }

    pub fn matches(&self, emi: &Emi) -> bool {
        self.is_preclosed.map_or(true, |p| emi.is_preclosed == p)
            && self.due_before.map_or(true, |d| emi.due_date <= d)
            && self.due_after.map_or(true, |d| emi.due_date >= d)
    }
}
