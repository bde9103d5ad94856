use std::sync::Arc;

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{
        EmiFilter, ExpenseFilter, FinancialOverview, OverviewInputs, OverviewRange, TimeRange,
        UserId,
    },
    ports::{
        inbound::OverviewService,
        outbound::{
            BudgetRepository, CategoryRepository, Clock, EmiRepository, ExpenseRepository,
            InvestmentRepository,
        },
    },
    FinanceError,
};

/// Read-only composition of budgets, expenses, EMIs and investments.
pub struct OverviewServiceImpl<C, B, E, M, I> {
    categories: Arc<C>,
    budgets: Arc<B>,
    expenses: Arc<E>,
    emis: Arc<M>,
    investments: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<C, B, E, M, I> OverviewServiceImpl<C, B, E, M, I> {
    pub fn new(
        categories: Arc<C>,
        budgets: Arc<B>,
        expenses: Arc<E>,
        emis: Arc<M>,
        investments: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            categories,
            budgets,
            expenses,
            emis,
            investments,
            clock,
        }
    }
}

#[async_trait]
impl<C, B, E, M, I> OverviewService for OverviewServiceImpl<C, B, E, M, I>
where
    C: CategoryRepository,
    B: BudgetRepository,
    E: ExpenseRepository,
    M: EmiRepository,
    I: InvestmentRepository,
{
    async fn financial_overview(
        &self,
        user_id: UserId,
        range: OverviewRange,
        anchor: Option<Date>,
    ) -> Result<FinancialOverview, FinanceError> {
        let anchor = anchor.unwrap_or_else(|| self.clock.today());
        let (current, previous) = TimeRange::with_previous(range, anchor)
            .ok_or_else(|| FinanceError::invalid("Date out of range"))?;
        let current_filter = ExpenseFilter::between(current.start_date, current.end_date);
        let previous_filter = ExpenseFilter::between(previous.start_date, previous.end_date);
        let active_emis = EmiFilter::active();

        let (categories, expenses, previous_expenses, budgets, emis, investments) = tokio::try_join!(
            self.categories.list(user_id),
            self.expenses.list(user_id, &current_filter),
            self.expenses.list(user_id, &previous_filter),
            self.budgets
                .list_overlapping(user_id, current.start_date, current.end_date),
            self.emis.list(user_id, &active_emis),
            self.investments.list(user_id),
        )?;

        Ok(FinancialOverview::compute(
            range,
            (current, previous),
            OverviewInputs {
                categories,
                expenses,
                previous_expenses,
                budgets,
                emis,
                investments,
            },
        ))
    }
}
