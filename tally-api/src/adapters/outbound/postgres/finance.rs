//! PostgreSQL implementation of the finance storage ports.

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use super::decode;
use crate::domain::{
    models::{
        Budget, BudgetFilter, BudgetId, BudgetStatus, CategoryId, Emi, EmiFilter, EmiId, Expense,
        ExpenseCategory, ExpenseFilter, ExpenseId, Investment, InvestmentId, LedgerEntry,
        NewBudget, NewEmi, NewExpense, NewInvestment, PaymentMethod, UserId, CATEGORY_IN_USE,
    },
    ports::outbound::{
        BudgetRepository, BudgetTerms, CategoryRepository, EmiRepository, ExpenseRepository,
        InvestmentRepository,
    },
    FinanceError,
};

const BUDGET_COLUMNS: &str = "id, user_id, category_id, budgeted_amount, spent_amount, \
     start_date, end_date, is_fixed, status";

const EXPENSE_COLUMNS: &str = "id, user_id, amount, expense_date, category_id, payment_method, \
     bill_no, description, budget_id";

const EMI_COLUMNS: &str =
    "id, user_id, loan_name, principal, roi, tenure_months, due_date, emi_amount, is_preclosed";

const INVESTMENT_COLUMNS: &str = "id, user_id, investment_type, investment_name, \
     amount_invested, current_value, start_date, roi, duration_months";

fn db_err(e: sqlx::Error) -> FinanceError {
    FinanceError::storage(e.to_string())
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    user_id: i32,
    name: String,
}

impl From<CategoryRow> for ExpenseCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: i32,
    user_id: i32,
    category_id: i32,
    budgeted_amount: f64,
    spent_amount: f64,
    start_date: Date,
    end_date: Date,
    is_fixed: bool,
    status: String,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = FinanceError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        let status: BudgetStatus =
            decode(&row.status, "budget status").map_err(FinanceError::Storage)?;
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            category_id: row.category_id.into(),
            budgeted_amount: row.budgeted_amount,
            spent_amount: row.spent_amount,
            start_date: row.start_date,
            end_date: row.end_date,
            is_fixed: row.is_fixed,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LedgerRow {
    #[sqlx(flatten)]
    budget: BudgetRow,
    previous_spent: f64,
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: i32,
    user_id: i32,
    amount: f64,
    expense_date: Date,
    category_id: i32,
    payment_method: String,
    bill_no: Option<String>,
    description: Option<String>,
    budget_id: Option<i32>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = FinanceError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let payment_method: PaymentMethod =
            decode(&row.payment_method, "payment method").map_err(FinanceError::Storage)?;
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            amount: row.amount,
            date: row.expense_date,
            category_id: row.category_id.into(),
            payment_method,
            bill_no: row.bill_no,
            description: row.description,
            budget_id: row.budget_id.map(BudgetId::new),
        })
    }
}

#[derive(sqlx::FromRow)]
struct EmiRow {
    id: i32,
    user_id: i32,
    loan_name: String,
    principal: f64,
    roi: f64,
    tenure_months: i32,
    due_date: Date,
    emi_amount: f64,
    is_preclosed: bool,
}

impl From<EmiRow> for Emi {
    fn from(row: EmiRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            loan_name: row.loan_name,
            principal: row.principal,
            roi: row.roi,
            tenure_months: row.tenure_months,
            due_date: row.due_date,
            emi_amount: row.emi_amount,
            is_preclosed: row.is_preclosed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InvestmentRow {
    id: i32,
    user_id: i32,
    investment_type: String,
    investment_name: String,
    amount_invested: f64,
    current_value: f64,
    start_date: Date,
    roi: f64,
    duration_months: Option<i32>,
}

impl From<InvestmentRow> for Investment {
    fn from(row: InvestmentRow) -> Self {
        Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            investment_type: row.investment_type,
            investment_name: row.investment_name,
            amount_invested: row.amount_invested,
            current_value: row.current_value,
            start_date: row.start_date,
            roi: row.roi,
            duration_months: row.duration_months,
        }
    }
}

fn budgets_from(rows: Vec<BudgetRow>) -> Result<Vec<Budget>, FinanceError> {
    rows.into_iter().map(Budget::try_from).collect()
}

fn expenses_from(rows: Vec<ExpenseRow>) -> Result<Vec<Expense>, FinanceError> {
    rows.into_iter().map(Expense::try_from).collect()
}

/// Every finance table lives in the same database, so one adapter serves all
/// five repository ports.
#[derive(Clone)]
pub struct PostgresFinanceStore {
    pool: PgPool,
}

impl PostgresFinanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresFinanceStore {
    async fn find_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name FROM expense_categories WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id.as_i32())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn insert_if_absent(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO expense_categories (user_id, name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, name) DO NOTHING
            RETURNING id, user_id, name
            "#,
        )
        .bind(user_id.as_i32())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn get(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name FROM expense_categories WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<ExpenseCategory>, FinanceError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name FROM expense_categories WHERE user_id = $1 ORDER BY name",
        )
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn is_referenced(&self, id: CategoryId) -> Result<bool, FinanceError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM expenses WHERE category_id = $1)
                OR EXISTS (SELECT 1 FROM budgets WHERE category_id = $1)
            "#,
        )
        .bind(id.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<bool, FinanceError> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // RESTRICT fired: a reference was added after the service checked.
                if e.as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation())
                {
                    FinanceError::invalid(CATEGORY_IN_USE)
                } else {
                    db_err(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BudgetRepository for PostgresFinanceStore {
    async fn create(&self, budget: &NewBudget) -> Result<Budget, FinanceError> {
        let row = sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            INSERT INTO budgets (user_id, category_id, budgeted_amount, start_date, end_date, is_fixed, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BUDGET_COLUMNS}
            "#
        ))
        .bind(budget.user_id.as_i32())
        .bind(budget.category_id.as_i32())
        .bind(budget.budgeted_amount)
        .bind(budget.start_date)
        .bind(budget.end_date)
        .bind(budget.is_fixed)
        .bind(budget.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn get(&self, user_id: UserId, id: BudgetId) -> Result<Option<Budget>, FinanceError> {
        let row = sqlx::query_as::<_, BudgetRow>(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Budget::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, FinanceError> {
        let rows = sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            SELECT {BUDGET_COLUMNS} FROM budgets
            WHERE user_id = $1
              AND ($2::date IS NULL OR start_date >= $2)
              AND ($3::date IS NULL OR start_date <= $3)
            ORDER BY start_date DESC, id DESC
            "#
        ))
        .bind(user_id.as_i32())
        .bind(filter.start_from)
        .bind(filter.start_to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        budgets_from(rows)
    }

    async fn find_covering(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        date: Date,
    ) -> Result<Option<Budget>, FinanceError> {
        let row = sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            SELECT {BUDGET_COLUMNS} FROM budgets
            WHERE user_id = $1 AND category_id = $2 AND start_date <= $3 AND end_date >= $3
            ORDER BY start_date DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.as_i32())
        .bind(category_id.as_i32())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Budget::try_from).transpose()
    }

    async fn list_overlapping(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Budget>, FinanceError> {
        let rows = sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            SELECT {BUDGET_COLUMNS} FROM budgets
            WHERE user_id = $1 AND start_date <= $3 AND end_date >= $2
            "#
        ))
        .bind(user_id.as_i32())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        budgets_from(rows)
    }

    async fn update_terms(
        &self,
        user_id: UserId,
        id: BudgetId,
        terms: &BudgetTerms,
        today: Date,
    ) -> Result<Option<Budget>, FinanceError> {
        let row = sqlx::query_as::<_, BudgetRow>(&format!(
            r#"
            UPDATE budgets
            SET category_id = $3,
                budgeted_amount = $4,
                start_date = $5,
                end_date = $6,
                is_fixed = $7,
                status = CASE
                    WHEN spent_amount >= $4 THEN 'Exceeded'
                    WHEN $8 > $6 THEN 'Completed'
                    ELSE 'Active'
                END
            WHERE user_id = $1 AND id = $2
            RETURNING {BUDGET_COLUMNS}
            "#
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .bind(terms.category_id.as_i32())
        .bind(terms.budgeted_amount)
        .bind(terms.start_date)
        .bind(terms.end_date)
        .bind(terms.is_fixed)
        .bind(today)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Budget::try_from).transpose()
    }

    async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, FinanceError> {
        let result = sqlx::query("DELETE FROM budgets WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_delta(
        &self,
        id: BudgetId,
        delta: f64,
        today: Date,
    ) -> Result<Option<LedgerEntry>, FinanceError> {
        // The row lock taken by the CTE serializes concurrent deltas on the
        // same budget, so each one sees the previous one's result.
        let row = sqlx::query_as::<_, LedgerRow>(
            r#"
            WITH previous AS (
                SELECT id, spent_amount FROM budgets WHERE id = $1 FOR UPDATE
            )
            UPDATE budgets b
            SET spent_amount = GREATEST(b.spent_amount + $2, 0),
                status = CASE
                    WHEN GREATEST(b.spent_amount + $2, 0) >= b.budgeted_amount THEN 'Exceeded'
                    WHEN $3 > b.end_date THEN 'Completed'
                    ELSE 'Active'
                END
            FROM previous
            WHERE b.id = previous.id
            RETURNING b.id, b.user_id, b.category_id, b.budgeted_amount, b.spent_amount,
                      b.start_date, b.end_date, b.is_fixed, b.status,
                      previous.spent_amount AS previous_spent
            "#,
        )
        .bind(id.as_i32())
        .bind(delta)
        .bind(today)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|row| {
            Ok(LedgerEntry {
                budget: row.budget.try_into()?,
                previous_spent: row.previous_spent,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ExpenseRepository for PostgresFinanceStore {
    async fn create(&self, expense: &NewExpense) -> Result<Expense, FinanceError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            INSERT INTO expenses (user_id, amount, expense_date, category_id, payment_method, bill_no, description, budget_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(expense.user_id.as_i32())
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.category_id.as_i32())
        .bind(expense.payment_method.to_string())
        .bind(&expense.bill_no)
        .bind(&expense.description)
        .bind(expense.budget_id.map(|b| b.as_i32()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn get(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, FinanceError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Expense::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, FinanceError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS} FROM expenses
            WHERE user_id = $1
              AND ($2::date IS NULL OR expense_date >= $2)
              AND ($3::date IS NULL OR expense_date <= $3)
            ORDER BY expense_date DESC, id DESC
            "#
        ))
        .bind(user_id.as_i32())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        expenses_from(rows)
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, FinanceError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            UPDATE expenses
            SET amount = $3, expense_date = $4, category_id = $5, payment_method = $6,
                bill_no = $7, description = $8, budget_id = $9
            WHERE user_id = $1 AND id = $2
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(expense.user_id.as_i32())
        .bind(expense.id.as_i32())
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.category_id.as_i32())
        .bind(expense.payment_method.to_string())
        .bind(&expense.bill_no)
        .bind(&expense.description)
        .bind(expense.budget_id.map(|b| b.as_i32()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(FinanceError::NotFound("Expense"))?;

        row.try_into()
    }

    async fn delete(&self, user_id: UserId, id: ExpenseId) -> Result<bool, FinanceError> {
        let result = sqlx::query("DELETE FROM expenses WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EmiRepository for PostgresFinanceStore {
    async fn create(&self, emi: &NewEmi) -> Result<Emi, FinanceError> {
        let row = sqlx::query_as::<_, EmiRow>(&format!(
            r#"
            INSERT INTO emis (user_id, loan_name, principal, roi, tenure_months, due_date, emi_amount, is_preclosed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EMI_COLUMNS}
            "#
        ))
        .bind(emi.user_id.as_i32())
        .bind(&emi.loan_name)
        .bind(emi.principal)
        .bind(emi.roi)
        .bind(emi.tenure_months)
        .bind(emi.due_date)
        .bind(emi.emi_amount)
        .bind(emi.is_preclosed)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn get(&self, user_id: UserId, id: EmiId) -> Result<Option<Emi>, FinanceError> {
        let row = sqlx::query_as::<_, EmiRow>(&format!(
            "SELECT {EMI_COLUMNS} FROM emis WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, user_id: UserId, filter: &EmiFilter) -> Result<Vec<Emi>, FinanceError> {
        let rows = sqlx::query_as::<_, EmiRow>(&format!(
            r#"
            SELECT {EMI_COLUMNS} FROM emis
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR is_preclosed = $2)
              AND ($3::date IS NULL OR due_date <= $3)
              AND ($4::date IS NULL OR due_date >= $4)
            ORDER BY due_date, id
            "#
        ))
        .bind(user_id.as_i32())
        .bind(filter.is_preclosed)
        .bind(filter.due_before)
        .bind(filter.due_after)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, emi: &Emi) -> Result<Emi, FinanceError> {
        let row = sqlx::query_as::<_, EmiRow>(&format!(
            r#"
            UPDATE emis
            SET loan_name = $3, principal = $4, roi = $5, tenure_months = $6,
                due_date = $7, emi_amount = $8, is_preclosed = $9
            WHERE user_id = $1 AND id = $2
            RETURNING {EMI_COLUMNS}
            "#
        ))
        .bind(emi.user_id.as_i32())
        .bind(emi.id.as_i32())
        .bind(&emi.loan_name)
        .bind(emi.principal)
        .bind(emi.roi)
        .bind(emi.tenure_months)
        .bind(emi.due_date)
        .bind(emi.emi_amount)
        .bind(emi.is_preclosed)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(FinanceError::NotFound("EMI"))?;

        Ok(row.into())
    }

    async fn delete(&self, user_id: UserId, id: EmiId) -> Result<bool, FinanceError> {
        let result = sqlx::query("DELETE FROM emis WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InvestmentRepository for PostgresFinanceStore {
    async fn create(&self, investment: &NewInvestment) -> Result<Investment, FinanceError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!(
            r#"
            INSERT INTO investments (user_id, investment_type, investment_name, amount_invested, current_value, start_date, roi, duration_months)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {INVESTMENT_COLUMNS}
            "#
        ))
        .bind(investment.user_id.as_i32())
        .bind(&investment.investment_type)
        .bind(&investment.investment_name)
        .bind(investment.amount_invested)
        .bind(investment.current_value)
        .bind(investment.start_date)
        .bind(investment.roi)
        .bind(investment.duration_months)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn get(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, FinanceError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Investment>, FinanceError> {
        let rows = sqlx::query_as::<_, InvestmentRow>(&format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE user_id = $1 ORDER BY start_date DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, investment: &Investment) -> Result<Investment, FinanceError> {
        let row = sqlx::query_as::<_, InvestmentRow>(&format!(
            r#"
            UPDATE investments
            SET investment_type = $3, investment_name = $4, amount_invested = $5,
                current_value = $6, start_date = $7, roi = $8, duration_months = $9
            WHERE user_id = $1 AND id = $2
            RETURNING {INVESTMENT_COLUMNS}
            "#
        ))
        .bind(investment.user_id.as_i32())
        .bind(investment.id.as_i32())
        .bind(&investment.investment_type)
        .bind(&investment.investment_name)
        .bind(investment.amount_invested)
        .bind(investment.current_value)
        .bind(investment.start_date)
        .bind(investment.roi)
        .bind(investment.duration_months)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(FinanceError::NotFound("Investment"))?;

        Ok(row.into())
    }

    async fn delete(&self, user_id: UserId, id: InvestmentId) -> Result<bool, FinanceError> {
        let result = sqlx::query("DELETE FROM investments WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
