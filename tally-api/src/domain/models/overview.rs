use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;
use strum::{Display, EnumString};
use time::{Date, Duration, Month};

use super::{Budget, CategoryId, Emi, Expense, ExpenseCategory, Investment};
use crate::utils::date_format::iso_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OverviewRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// An inclusive calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

impl TimeRange {
    /// The period of kind `range` containing `anchor`. Weeks start on Sunday.
    /// `None` when the period runs past the representable calendar.
    pub fn containing(range: OverviewRange, anchor: Date) -> Option<Self> {
        match range {
            OverviewRange::Daily => Some(Self {
                start_date: anchor,
                end_date: anchor,
            }),
            OverviewRange::Weekly => {
                let offset = i64::from(anchor.weekday().number_days_from_sunday());
                let start_date = anchor.checked_sub(Duration::days(offset))?;
                Some(Self {
                    start_date,
                    end_date: start_date.checked_add(Duration::days(6))?,
                })
            }
            OverviewRange::Monthly => Some(Self {
                start_date: anchor.replace_day(1).ok()?,
                end_date: anchor
                    .replace_day(anchor.month().length(anchor.year()))
                    .ok()?,
            }),
            OverviewRange::Yearly => Some(Self {
                start_date: Date::from_calendar_date(anchor.year(), Month::January, 1).ok()?,
                end_date: Date::from_calendar_date(anchor.year(), Month::December, 31).ok()?,
            }),
        }
    }

    /// The whole calendar period immediately before this one.
    pub fn previous(&self, range: OverviewRange) -> Option<Self> {
        let day_before = self.start_date.previous_day()?;
        Self::containing(range, day_before)
    }

    /// The period containing `anchor` together with the one before it.
    pub fn with_previous(range: OverviewRange, anchor: Date) -> Option<(Self, Self)> {
        let current = Self::containing(range, anchor)?;
        let previous = current.previous(range)?;
        Some((current, previous))
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpendingTrend {
    #[serde(rename = "increase")]
    Increase,
    #[serde(rename = "decrease")]
    Decrease,
    #[serde(rename = "no change")]
    NoChange,
    #[serde(rename = "no data")]
    NoData,
}

impl SpendingTrend {
    pub fn compare(current: f64, previous: f64) -> Self {
        if previous <= 0.0 {
            Self::NoData
        } else if current > previous {
            Self::Increase
        } else if current < previous {
            Self::Decrease
        } else {
            Self::NoChange
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: CategoryId,
    pub category_name: String,
    pub spent_amount: f64,
    pub budgeted_amount: f64,
    /// `None` when no budget covers the category in this period.
    pub percentage_of_budget_used: Option<i64>,
    pub percentage_of_total_spent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInvestmentTotal {
    pub year: i32,
    pub month: u8,
    pub total_invested: f64,
    pub total_current_value: f64,
    pub investments: Vec<Investment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_gain: f64,
    pub monthly_totals: Vec<MonthlyInvestmentTotal>,
}

impl InvestmentSummary {
    /// Totals plus a history bucketed by the month each investment started.
    pub fn from_investments(investments: Vec<Investment>) -> Self {
        let total_invested: f64 = investments.iter().map(|i| i.amount_invested).sum();
        let total_current_value: f64 = investments.iter().map(|i| i.current_value).sum();

        let monthly_totals = investments
            .into_iter()
            .into_group_map_by(|i| (i.start_date.year(), u8::from(i.start_date.month())))
            .into_iter()
            .sorted_by_key(|(key, _)| *key)
            .map(|((year, month), investments)| MonthlyInvestmentTotal {
                year,
                month,
                total_invested: investments.iter().map(|i| i.amount_invested).sum(),
                total_current_value: investments.iter().map(|i| i.current_value).sum(),
                investments,
            })
            .collect();

        Self {
            total_invested,
            total_current_value,
            total_gain: total_current_value - total_invested,
            monthly_totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub range: OverviewRange,
    pub time_range: TimeRange,
    pub previous_time_range: TimeRange,
    pub total_budget: f64,
    pub total_spent: f64,
    pub previous_total_spent: f64,
    pub current_savings: f64,
    #[serde(rename = "totalMonthlyEMI")]
    pub total_monthly_emi: f64,
    pub spending_trend: SpendingTrend,
    pub categories: Vec<CategoryBreakdown>,
    pub investments: InvestmentSummary,
}

/// Everything the overview reads, already scoped to one user.
#[derive(Debug, Clone, Default)]
pub struct OverviewInputs {
    pub categories: Vec<ExpenseCategory>,
    pub expenses: Vec<Expense>,
    pub previous_expenses: Vec<Expense>,
    /// Budgets overlapping the current period.
    pub budgets: Vec<Budget>,
    pub emis: Vec<Emi>,
    pub investments: Vec<Investment>,
}

fn rounded_percentage(part: f64, whole: f64) -> i64 {
    (part / whole * 100.0).round() as i64
}

impl FinancialOverview {
    /// Compose the overview. Budgets only count toward the total when their
    /// category has spending in the period.
    pub fn compute(
        range: OverviewRange,
        (time_range, previous_time_range): (TimeRange, TimeRange),
        inputs: OverviewInputs,
    ) -> Self {

        let names: HashMap<CategoryId, String> = inputs
            .categories
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut spent: HashMap<CategoryId, f64> = HashMap::new();
        for expense in inputs
            .expenses
            .iter()
            .filter(|e| time_range.contains(e.date))
        {
            *spent.entry(expense.category_id).or_default() += expense.amount;
        }
        let total_spent: f64 = spent.values().sum();

        let mut budgeted: HashMap<CategoryId, f64> = HashMap::new();
        for budget in inputs
            .budgets
            .iter()
            .filter(|b| b.overlaps(time_range.start_date, time_range.end_date))
            .filter(|b| spent.contains_key(&b.category_id))
        {
            *budgeted.entry(budget.category_id).or_default() += budget.budgeted_amount;
        }
        let total_budget: f64 = budgeted.values().sum();

        let categories = spent
            .into_iter()
            .map(|(category_id, spent_amount)| {
                let budgeted_amount = budgeted.get(&category_id).copied().unwrap_or_default();
                CategoryBreakdown {
                    category_id,
                    category_name: names.get(&category_id).cloned().unwrap_or_default(),
                    spent_amount,
                    budgeted_amount,
                    percentage_of_budget_used: (budgeted_amount > 0.0)
                        .then(|| rounded_percentage(spent_amount, budgeted_amount)),
                    percentage_of_total_spent: if total_spent > 0.0 {
                        rounded_percentage(spent_amount, total_spent)
                    } else {
                        0
                    },
                }
            })
            .sorted_by(|a, b| {
                b.spent_amount
                    .total_cmp(&a.spent_amount)
                    .then_with(|| a.category_name.cmp(&b.category_name))
            })
            .collect();

        let previous_total_spent: f64 = inputs
            .previous_expenses
            .iter()
            .filter(|e| previous_time_range.contains(e.date))
            .map(|e| e.amount)
            .sum();

        let total_monthly_emi = inputs
            .emis
            .iter()
            .filter(|e| !e.is_preclosed)
            .map(|e| e.emi_amount)
            .sum();

        Self {
            range,
            time_range,
            previous_time_range,
            total_budget,
            total_spent,
            previous_total_spent,
            current_savings: total_budget - total_spent,
            total_monthly_emi,
            spending_trend: SpendingTrend::compare(total_spent, previous_total_spent),
            categories,
            investments: InvestmentSummary::from_investments(inputs.investments),
        }
    }
}
