use serde::Serialize;
use time::Date;

use super::{InvestmentId, UserId};
use crate::utils::date_format::iso_date;

pub const MAX_INVESTMENT_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: InvestmentId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub investment_type: String,
    pub investment_name: String,
    pub amount_invested: f64,
    pub current_value: f64,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    pub roi: f64,
    pub duration_months: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub user_id: UserId,
    pub investment_type: String,
    pub investment_name: String,
    pub amount_invested: f64,
    pub current_value: f64,
    pub start_date: Date,
    pub roi: f64,
    pub duration_months: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CreateInvestmentRequest {
    pub investment_type: String,
    pub investment_name: String,
    pub amount_invested: f64,
    pub current_value: f64,
    pub start_date: Date,
    pub roi: f64,
    pub duration_months: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateInvestmentRequest {
    pub investment_type: Option<String>,
    pub investment_name: Option<String>,
    pub amount_invested: Option<f64>,
    pub current_value: Option<f64>,
    pub start_date: Option<Date>,
    pub roi: Option<f64>,
    pub duration_months: Option<i32>,
}

/// Projection of a systematic investment plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipProjection {
    pub monthly_amount: f64,
    pub duration_months: i32,
    pub roi: f64,
    pub future_value: f64,
}

impl SipProjection {
    /// Future value of an annuity due with monthly compounding.
    pub fn calculate(monthly_amount: f64, duration_months: i32, roi: f64) -> Self {
        let r = roi / 12.0 / 100.0;
        let n = duration_months as f64;
        let future_value = monthly_amount * ((1.0 + r).powf(n) - 1.0) * (1.0 + r) / r;

        Self {
            monthly_amount,
            duration_months,
            roi,
            future_value: future_value.round(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sip_future_value() {
        let projection = SipProjection::calculate(1000.0, 12, 12.0);
        assert_eq!(projection.future_value, 12809.0);
    }
}
