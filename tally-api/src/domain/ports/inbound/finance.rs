use async_trait::async_trait;

use crate::domain::{
    models::{
        Budget, BudgetFilter, BudgetId, CategoryId, CreateBudgetRequest, CreateEmiRequest,
        CreateExpenseRequest, CreateInvestmentRequest, Emi, EmiFilter, EmiId, Expense,
        ExpenseCategory, ExpenseFilter, ExpenseId, FinancialOverview, Investment, InvestmentId,
        OverviewRange, SipProjection, UpdateBudgetRequest, UpdateEmiRequest,
        UpdateExpenseRequest, UpdateInvestmentRequest, UserId,
    },
    FinanceError,
};
use time::Date;

/// Categories, budgets and the expenses that draw them down.
///
/// Every expense write keeps the linked budget's spent amount in step.
#[async_trait]
pub trait BudgetingService: Send + Sync + 'static {
    /// Find or create the category named `name`. Safe under concurrent calls.
    async fn resolve_category(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ExpenseCategory, FinanceError>;

    async fn list_categories(&self, user_id: UserId)
        -> Result<Vec<ExpenseCategory>, FinanceError>;

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<(), FinanceError>;

    async fn create_budget(
        &self,
        user_id: UserId,
        request: CreateBudgetRequest,
    ) -> Result<Budget, FinanceError>;

    async fn get_budget(&self, user_id: UserId, id: BudgetId) -> Result<Budget, FinanceError>;

    async fn list_budgets(
        &self,
        user_id: UserId,
        filter: BudgetFilter,
    ) -> Result<Vec<Budget>, FinanceError>;

    async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        request: UpdateBudgetRequest,
    ) -> Result<Budget, FinanceError>;

    async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Result<(), FinanceError>;

    /// Apply a signed delta to a budget's spent amount.
    async fn apply_budget_delta(&self, id: BudgetId, delta: f64)
        -> Result<Option<Budget>, FinanceError>;

    async fn create_expense(
        &self,
        user_id: UserId,
        request: CreateExpenseRequest,
    ) -> Result<Expense, FinanceError>;

    async fn get_expense(&self, user_id: UserId, id: ExpenseId)
        -> Result<Expense, FinanceError>;

    async fn list_expenses(
        &self,
        user_id: UserId,
        filter: ExpenseFilter,
    ) -> Result<Vec<Expense>, FinanceError>;

    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, FinanceError>;

    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<(), FinanceError>;
}

/// Loans and investments.
#[async_trait]
pub trait PortfolioService: Send + Sync + 'static {
    async fn create_emi(&self, user_id: UserId, request: CreateEmiRequest)
        -> Result<Emi, FinanceError>;

    async fn get_emi(&self, user_id: UserId, id: EmiId) -> Result<Emi, FinanceError>;

    async fn list_emis(&self, user_id: UserId, filter: EmiFilter)
        -> Result<Vec<Emi>, FinanceError>;

    async fn update_emi(
        &self,
        user_id: UserId,
        id: EmiId,
        request: UpdateEmiRequest,
    ) -> Result<Emi, FinanceError>;

    async fn delete_emi(&self, user_id: UserId, id: EmiId) -> Result<(), FinanceError>;

    async fn create_investment(
        &self,
        user_id: UserId,
        request: CreateInvestmentRequest,
    ) -> Result<Investment, FinanceError>;

    async fn get_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Investment, FinanceError>;

    async fn list_investments(&self, user_id: UserId) -> Result<Vec<Investment>, FinanceError>;

    async fn update_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
        request: UpdateInvestmentRequest,
    ) -> Result<Investment, FinanceError>;

    async fn delete_investment(&self, user_id: UserId, id: InvestmentId)
        -> Result<(), FinanceError>;

    fn calculate_sip(
        &self,
        monthly_amount: f64,
        duration_months: i32,
        roi: f64,
    ) -> Result<SipProjection, FinanceError>;
}

#[async_trait]
pub trait OverviewService: Send + Sync + 'static {
    /// Read-only summary of the period of `range` containing `anchor`
    /// (today when absent).
    async fn financial_overview(
        &self,
        user_id: UserId,
        range: OverviewRange,
        anchor: Option<Date>,
    ) -> Result<FinancialOverview, FinanceError>;
}
