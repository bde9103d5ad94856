//! Storage ports for categories, budgets, expenses, EMIs and investments.

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{
        Budget, BudgetFilter, BudgetId, CategoryId, Emi, EmiFilter, EmiId, Expense,
        ExpenseCategory, ExpenseFilter, ExpenseId, Investment, InvestmentId, LedgerEntry,
        NewBudget, NewEmi, NewExpense, NewInvestment, UserId,
    },
    FinanceError,
};

#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    async fn find_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError>;

    /// Insert `(user_id, name)` unless it already exists.
    ///
    /// Returns `None` when the uniqueness constraint rejected the row, which
    /// means another writer created it first.
    async fn insert_if_absent(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError>;

    async fn get(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> Result<Option<ExpenseCategory>, FinanceError>;

    /// All of a user's categories, sorted by name.
    async fn list(&self, user_id: UserId) -> Result<Vec<ExpenseCategory>, FinanceError>;

    /// Whether any expense or budget still points at the category.
    async fn is_referenced(&self, id: CategoryId) -> Result<bool, FinanceError>;

    async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<bool, FinanceError>;
}

/// Budget fields a user may edit. `spent_amount` is only ever moved by
/// [`BudgetRepository::apply_delta`].
#[derive(Debug, Clone)]
pub struct BudgetTerms {
    pub category_id: CategoryId,
    pub budgeted_amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub is_fixed: bool,
}

#[async_trait]
pub trait BudgetRepository: Send + Sync + 'static {
    async fn create(&self, budget: &NewBudget) -> Result<Budget, FinanceError>;

    async fn get(&self, user_id: UserId, id: BudgetId) -> Result<Option<Budget>, FinanceError>;

    /// Budgets whose start date falls within the filter, newest first.
    async fn list(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, FinanceError>;

    /// The budget for `category_id` whose period contains `date`. When several
    /// overlap, the one with the latest start date wins.
    async fn find_covering(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        date: Date,
    ) -> Result<Option<Budget>, FinanceError>;

    /// Budgets whose period intersects `[start, end]`.
    async fn list_overlapping(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Budget>, FinanceError>;

    /// Replace the editable terms and re-derive the status against `today`.
    async fn update_terms(
        &self,
        user_id: UserId,
        id: BudgetId,
        terms: &BudgetTerms,
        today: Date,
    ) -> Result<Option<Budget>, FinanceError>;

    async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, FinanceError>;

    /// Atomically add `delta` to the spent amount, flooring at zero, and
    /// re-derive the status. Returns `None` if the budget no longer exists.
    async fn apply_delta(
        &self,
        id: BudgetId,
        delta: f64,
        today: Date,
    ) -> Result<Option<LedgerEntry>, FinanceError>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync + 'static {
    async fn create(&self, expense: &NewExpense) -> Result<Expense, FinanceError>;

    async fn get(&self, user_id: UserId, id: ExpenseId)
        -> Result<Option<Expense>, FinanceError>;

    /// Expenses within the filter, newest first.
    async fn list(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, FinanceError>;

    async fn update(&self, expense: &Expense) -> Result<Expense, FinanceError>;

    async fn delete(&self, user_id: UserId, id: ExpenseId) -> Result<bool, FinanceError>;
}

#[async_trait]
pub trait EmiRepository: Send + Sync + 'static {
    async fn create(&self, emi: &NewEmi) -> Result<Emi, FinanceError>;

    async fn get(&self, user_id: UserId, id: EmiId) -> Result<Option<Emi>, FinanceError>;

    /// EMIs matching the filter, by due date.
    async fn list(&self, user_id: UserId, filter: &EmiFilter) -> Result<Vec<Emi>, FinanceError>;

    async fn update(&self, emi: &Emi) -> Result<Emi, FinanceError>;

    async fn delete(&self, user_id: UserId, id: EmiId) -> Result<bool, FinanceError>;
}

#[async_trait]
pub trait InvestmentRepository: Send + Sync + 'static {
    async fn create(&self, investment: &NewInvestment) -> Result<Investment, FinanceError>;

    async fn get(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, FinanceError>;

    /// All investments, newest start date first.
    async fn list(&self, user_id: UserId) -> Result<Vec<Investment>, FinanceError>;

    async fn update(&self, investment: &Investment) -> Result<Investment, FinanceError>;

    async fn delete(&self, user_id: UserId, id: InvestmentId) -> Result<bool, FinanceError>;
}
