use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{
    models::{
        normalize_category_name, Budget, BudgetFilter, BudgetId, BudgetStatus, CategoryId,
        CreateBudgetRequest, CreateExpenseRequest, Expense, ExpenseCategory, ExpenseFilter,
        ExpenseId, NewBudget, NewExpense, UpdateBudgetRequest, UpdateExpenseRequest, UserId,
        CATEGORY_IN_USE, MAX_BILL_NO_LEN, MAX_DESCRIPTION_LEN,
    },
    ports::{
        inbound::BudgetingService,
        outbound::{BudgetRepository, BudgetTerms, CategoryRepository, Clock, ExpenseRepository},
    },
    FinanceError,
};

/// Maps a category name to a stable category, creating it on first use.
pub struct CategoryResolver<C> {
    repo: Arc<C>,
}

impl<C: CategoryRepository> CategoryResolver<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    /// The unique `(user, name)` index is the authority: when a concurrent
    /// writer wins the insert, the row it created is returned.
    pub async fn resolve(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ExpenseCategory, FinanceError> {
        let name = normalize_category_name(name).ok_or_else(|| {
            FinanceError::invalid("Category name is required and must be at most 100 characters")
        })?;

        if let Some(category) = self.repo.find_by_name(user_id, &name).await? {
            return Ok(category);
        }
        if let Some(category) = self.repo.insert_if_absent(user_id, &name).await? {
            debug!(category_id = %category.id, %name, "created expense category");
            return Ok(category);
        }

        self.repo
            .find_by_name(user_id, &name)
            .await?
            .ok_or_else(|| {
                FinanceError::storage(format!("category '{name}' missing after conflicting insert"))
            })
    }
}

/// Owns `spent_amount` and the derived status of budgets.
pub struct BudgetLedger<B> {
    repo: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<B: BudgetRepository> BudgetLedger<B> {
    pub fn new(repo: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Add a signed amount to a budget. A result below zero is floored at
    /// zero and logged.
    pub async fn apply_delta(
        &self,
        id: BudgetId,
        delta: f64,
    ) -> Result<Option<Budget>, FinanceError> {
        let Some(entry) = self.repo.apply_delta(id, delta, self.clock.today()).await? else {
            warn!(budget_id = %id, delta, "budget disappeared before ledger update");
            return Ok(None);
        };

        if entry.was_clamped(delta) {
            warn!(
                budget_id = %id,
                previous_spent = entry.previous_spent,
                delta,
                "budget spent amount would go negative, clamped at zero"
            );
        }
        debug!(
            budget_id = %id,
            spent = entry.budget.spent_amount,
            status = %entry.budget.status,
            "applied budget delta"
        );
        Ok(Some(entry.budget))
    }
}

fn validate_amount(amount: f64, field: &str) -> Result<(), FinanceError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FinanceError::invalid(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

fn validate_text(value: Option<&str>, max: usize, field: &str) -> Result<(), FinanceError> {
    if value.is_some_and(|v| v.chars().count() > max) {
        return Err(FinanceError::invalid(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

/// Categories, budgets and expenses. Expense writes are coordinated with the
/// budget ledger so that a budget's spent amount always reflects the
/// expenses linked to it.
pub struct BudgetingServiceImpl<C, B, E> {
    resolver: CategoryResolver<C>,
    ledger: BudgetLedger<B>,
    categories: Arc<C>,
    budgets: Arc<B>,
    expenses: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<C, B, E> BudgetingServiceImpl<C, B, E>
where
    C: CategoryRepository,
    B: BudgetRepository,
    E: ExpenseRepository,
{
    pub fn new(
        categories: Arc<C>,
        budgets: Arc<B>,
        expenses: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver: CategoryResolver::new(categories.clone()),
            ledger: BudgetLedger::new(budgets.clone(), clock.clone()),
            categories,
            budgets,
            expenses,
            clock,
        }
    }

    async fn find_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, FinanceError> {
        self.expenses
            .get(user_id, id)
            .await?
            .ok_or(FinanceError::NotFound("Expense"))
    }
}

#[async_trait]
impl<C, B, E> BudgetingService for BudgetingServiceImpl<C, B, E>
where
    C: CategoryRepository,
    B: BudgetRepository,
    E: ExpenseRepository,
{
    async fn resolve_category(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ExpenseCategory, FinanceError> {
        self.resolver.resolve(user_id, name).await
    }

    async fn list_categories(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExpenseCategory>, FinanceError> {
        self.categories.list(user_id).await
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<(), FinanceError> {
        if self.categories.get(user_id, id).await?.is_none() {
            return Err(FinanceError::NotFound("Category"));
        }
        if self.categories.is_referenced(id).await? {
            return Err(FinanceError::invalid(CATEGORY_IN_USE));
        }
        self.categories.delete(user_id, id).await?;
        Ok(())
    }

    async fn create_budget(
        &self,
        user_id: UserId,
        request: CreateBudgetRequest,
    ) -> Result<Budget, FinanceError> {
        validate_amount(request.budgeted_amount, "Budgeted amount")?;
        if request.end_date <= request.start_date {
            return Err(FinanceError::invalid("End date must be after start date"));
        }

        let category = self.resolver.resolve(user_id, &request.category_name).await?;
        let budget = NewBudget {
            user_id,
            category_id: category.id,
            budgeted_amount: request.budgeted_amount,
            start_date: request.start_date,
            end_date: request.end_date,
            is_fixed: request.is_fixed,
            status: BudgetStatus::derive(
                0.0,
                request.budgeted_amount,
                request.end_date,
                self.clock.today(),
            ),
        };
        self.budgets.create(&budget).await
    }

    async fn get_budget(&self, user_id: UserId, id: BudgetId) -> Result<Budget, FinanceError> {
        self.budgets
            .get(user_id, id)
            .await?
            .ok_or(FinanceError::NotFound("Budget"))
    }

    async fn list_budgets(
        &self,
        user_id: UserId,
        filter: BudgetFilter,
    ) -> Result<Vec<Budget>, FinanceError> {
        self.budgets.list(user_id, &filter).await
    }

    async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        request: UpdateBudgetRequest,
    ) -> Result<Budget, FinanceError> {
        let existing = self.get_budget(user_id, id).await?;

        let category_id = match request.category_name.as_deref() {
            Some(name) => self.resolver.resolve(user_id, name).await?.id,
            None => existing.category_id,
        };
        let terms = BudgetTerms {
            category_id,
            budgeted_amount: request.budgeted_amount.unwrap_or(existing.budgeted_amount),
            start_date: request.start_date.unwrap_or(existing.start_date),
            end_date: request.end_date.unwrap_or(existing.end_date),
            is_fixed: request.is_fixed.unwrap_or(existing.is_fixed),
        };
        validate_amount(terms.budgeted_amount, "Budgeted amount")?;
        if terms.end_date <= terms.start_date {
            return Err(FinanceError::invalid("End date must be after start date"));
        }

        self.budgets
            .update_terms(user_id, id, &terms, self.clock.today())
            .await?
            .ok_or(FinanceError::NotFound("Budget"))
    }

    async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Result<(), FinanceError> {
        if !self.budgets.delete(user_id, id).await? {
            return Err(FinanceError::NotFound("Budget"));
        }
        Ok(())
    }

    async fn apply_budget_delta(
        &self,
        id: BudgetId,
        delta: f64,
    ) -> Result<Option<Budget>, FinanceError> {
        if !delta.is_finite() {
            return Err(FinanceError::invalid("delta must be a finite number"));
        }
        self.ledger.apply_delta(id, delta).await
    }

    async fn create_expense(
        &self,
        user_id: UserId,
        request: CreateExpenseRequest,
    ) -> Result<Expense, FinanceError> {
        validate_amount(request.amount, "Amount")?;
        validate_text(request.bill_no.as_deref(), MAX_BILL_NO_LEN, "Bill number")?;
        validate_text(request.description.as_deref(), MAX_DESCRIPTION_LEN, "Description")?;

        let date = request.date.unwrap_or_else(|| self.clock.today());
        let category = self.resolver.resolve(user_id, &request.category_name).await?;
        let budget = self
            .budgets
            .find_covering(user_id, category.id, date)
            .await?;

        let expense = self
            .expenses
            .create(&NewExpense {
                user_id,
                amount: request.amount,
                date,
                category_id: category.id,
                payment_method: request.payment_method,
                bill_no: request.bill_no,
                description: request.description,
                budget_id: budget.as_ref().map(|b| b.id),
            })
            .await?;

        if let Some(budget) = budget {
            self.ledger.apply_delta(budget.id, expense.amount).await?;
        }
        Ok(expense)
    }

    async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, FinanceError> {
        self.find_expense(user_id, id).await
    }

    async fn list_expenses(
        &self,
        user_id: UserId,
        filter: ExpenseFilter,
    ) -> Result<Vec<Expense>, FinanceError> {
        self.expenses.list(user_id, &filter).await
    }

    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, FinanceError> {
        let existing = self.find_expense(user_id, id).await?;

        if let Some(amount) = request.amount {
            validate_amount(amount, "Amount")?;
        }
        validate_text(request.bill_no.as_deref(), MAX_BILL_NO_LEN, "Bill number")?;
        validate_text(request.description.as_deref(), MAX_DESCRIPTION_LEN, "Description")?;

        let mut updated = existing.clone();
        if let Some(name) = request.category_name.as_deref() {
            updated.category_id = self.resolver.resolve(user_id, name).await?.id;
        }
        if let Some(amount) = request.amount {
            updated.amount = amount;
        }
        if let Some(date) = request.date {
            updated.date = date;
        }
        if let Some(method) = request.payment_method {
            updated.payment_method = method;
        }
        if let Some(bill_no) = request.bill_no {
            updated.bill_no = Some(bill_no);
        }
        if let Some(description) = request.description {
            updated.description = Some(description);
        }

        if updated.amount == existing.amount {
            return self.expenses.update(&updated).await;
        }

        // Roll back against the budget the expense was linked to, then charge
        // the budget covering the updated date and category.
        if let Some(old_budget) = existing.budget_id {
            self.ledger.apply_delta(old_budget, -existing.amount).await?;
        }
        let budget = self
            .budgets
            .find_covering(user_id, updated.category_id, updated.date)
            .await?;
        updated.budget_id = budget.as_ref().map(|b| b.id);

        let saved = self.expenses.update(&updated).await?;
        if let Some(budget) = budget {
            self.ledger.apply_delta(budget.id, saved.amount).await?;
        }
        Ok(saved)
    }

    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<(), FinanceError> {
        let expense = self.find_expense(user_id, id).await?;
        if !self.expenses.delete(user_id, id).await? {
            return Err(FinanceError::NotFound("Expense"));
        }
        if let Some(budget_id) = expense.budget_id {
            self.ledger.apply_delta(budget_id, -expense.amount).await?;
        }
        Ok(())
    }
}
