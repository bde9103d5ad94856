use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{
        Budget, BudgetFilter, BudgetId, BudgetStatus, CategoryId, Emi, EmiFilter, EmiId,
        Expense, ExpenseCategory, ExpenseFilter, ExpenseId, Investment, InvestmentId,
        LedgerEntry, NewBudget, NewEmi, NewExpense, NewInvestment, UserId, CATEGORY_IN_USE,
    },
    ports::outbound::{
        BudgetRepository, BudgetTerms, CategoryRepository, EmiRepository, ExpenseRepository,
        InvestmentRepository,
    },
    FinanceError,
};

#[derive(Default)]
struct FinanceTables {
    next_id: i32,
    categories: Vec<ExpenseCategory>,
    budgets: Vec<Budget>,
    expenses: Vec<Expense>,
    emis: Vec<Emi>,
    investments: Vec<Investment>,
}

impl FinanceTables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Consume one pending injected fault, if any.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// In-memory finance storage implementing every finance repository port.
#[derive(Clone, Default)]
pub struct MemoryFinanceStore {
    tables: Arc<RwLock<FinanceTables>>,
    lookup_misses: Arc<AtomicUsize>,
    stale_reference_checks: Arc<AtomicUsize>,
}

impl MemoryFinanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` category lookups by name miss, as if a concurrent
    /// writer inserted the row right after the lookup ran.
    pub fn miss_next_lookups(&self, n: usize) {
        self.lookup_misses.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` reference checks report an unused category, as if
    /// an expense landed between the check and the delete.
    pub fn stale_next_reference_checks(&self, n: usize) {
        self.stale_reference_checks.store(n, Ordering::SeqCst);
    }

    pub fn budget(&self, id: BudgetId) -> Option<Budget> {
        let tables = self.tables.read().unwrap();
        tables.budgets.iter().find(|b| b.id == id).cloned()
    }

    pub fn categories(&self) -> Vec<ExpenseCategory> {
        self.tables.read().unwrap().categories.clone()
    }
}

#[async_trait]
impl CategoryRepository for MemoryFinanceStore {
    async fn find_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        if take_one(&self.lookup_misses) {
            return Ok(None);
        }
        let tables = self.tables.read().unwrap();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.name == name)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        if tables
            .categories
            .iter()
            .any(|c| c.user_id == user_id && c.name == name)
        {
            return Ok(None);
        }
        let category = ExpenseCategory {
            id: CategoryId::new(tables.next_id()),
            user_id,
            name: name.to_string(),
        };
        tables.categories.push(category.clone());
        Ok(Some(category))
    }

    async fn get(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> Result<Option<ExpenseCategory>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.id == id)
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<ExpenseCategory>, FinanceError> {
        let tables = self.tables.read().unwrap();
        let mut categories: Vec<_> = tables
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn is_referenced(&self, id: CategoryId) -> Result<bool, FinanceError> {
        if take_one(&self.stale_reference_checks) {
            return Ok(false);
        }
        let tables = self.tables.read().unwrap();
        Ok(tables.expenses.iter().any(|e| e.category_id == id)
            || tables.budgets.iter().any(|b| b.category_id == id))
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<bool, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        if tables.expenses.iter().any(|e| e.category_id == id)
            || tables.budgets.iter().any(|b| b.category_id == id)
        {
            return Err(FinanceError::invalid(CATEGORY_IN_USE));
        }
        let before = tables.categories.len();
        tables
            .categories
            .retain(|c| !(c.user_id == user_id && c.id == id));
        Ok(tables.categories.len() != before)
    }
}

#[async_trait]
impl BudgetRepository for MemoryFinanceStore {
    async fn create(&self, budget: &NewBudget) -> Result<Budget, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let created = Budget {
            id: BudgetId::new(tables.next_id()),
            user_id: budget.user_id,
            category_id: budget.category_id,
            budgeted_amount: budget.budgeted_amount,
            spent_amount: 0.0,
            start_date: budget.start_date,
            end_date: budget.end_date,
            is_fixed: budget.is_fixed,
            status: budget.status,
        };
        tables.budgets.push(created.clone());
        Ok(created)
    }

    async fn get(&self, user_id: UserId, id: BudgetId) -> Result<Option<Budget>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .budgets
            .iter()
            .find(|b| b.user_id == user_id && b.id == id)
            .cloned())
    }

    async fn list(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, FinanceError> {
        let tables = self.tables.read().unwrap();
        let mut budgets: Vec<_> = tables
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| filter.start_from.map_or(true, |d| b.start_date >= d))
            .filter(|b| filter.start_to.map_or(true, |d| b.start_date <= d))
            .cloned()
            .collect();
        budgets.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(budgets)
    }

    async fn find_covering(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        date: Date,
    ) -> Result<Option<Budget>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.category_id == category_id && b.contains(date))
            .max_by_key(|b| (b.start_date, b.id))
            .cloned())
    }

    async fn list_overlapping(
        &self,
        user_id: UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<Budget>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn update_terms(
        &self,
        user_id: UserId,
        id: BudgetId,
        terms: &BudgetTerms,
        today: Date,
    ) -> Result<Option<Budget>, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let Some(budget) = tables
            .budgets
            .iter_mut()
            .find(|b| b.user_id == user_id && b.id == id)
        else {
            return Ok(None);
        };
        budget.category_id = terms.category_id;
        budget.budgeted_amount = terms.budgeted_amount;
        budget.start_date = terms.start_date;
        budget.end_date = terms.end_date;
        budget.is_fixed = terms.is_fixed;
        budget.status = BudgetStatus::derive(
            budget.spent_amount,
            budget.budgeted_amount,
            budget.end_date,
            today,
        );
        Ok(Some(budget.clone()))
    }

    async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.budgets.len();
        tables.budgets.retain(|b| !(b.user_id == user_id && b.id == id));
        let deleted = tables.budgets.len() != before;
        if deleted {
            for expense in tables.expenses.iter_mut().filter(|e| e.budget_id == Some(id)) {
                expense.budget_id = None;
            }
        }
        Ok(deleted)
    }

    async fn apply_delta(
        &self,
        id: BudgetId,
        delta: f64,
        today: Date,
    ) -> Result<Option<LedgerEntry>, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let Some(budget) = tables.budgets.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        let previous_spent = budget.spent_amount;
        budget.spent_amount = (previous_spent + delta).max(0.0);
        budget.status = BudgetStatus::derive(
            budget.spent_amount,
            budget.budgeted_amount,
            budget.end_date,
            today,
        );
        Ok(Some(LedgerEntry {
            budget: budget.clone(),
            previous_spent,
        }))
    }
}

#[async_trait]
impl ExpenseRepository for MemoryFinanceStore {
    async fn create(&self, expense: &NewExpense) -> Result<Expense, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let created = Expense {
            id: ExpenseId::new(tables.next_id()),
            user_id: expense.user_id,
            amount: expense.amount,
            date: expense.date,
            category_id: expense.category_id,
            payment_method: expense.payment_method,
            bill_no: expense.bill_no.clone(),
            description: expense.description.clone(),
            budget_id: expense.budget_id,
        };
        tables.expenses.push(created.clone());
        Ok(created)
    }

    async fn get(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .expenses
            .iter()
            .find(|e| e.user_id == user_id && e.id == id)
            .cloned())
    }

    async fn list(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, FinanceError> {
        let tables = self.tables.read().unwrap();
        let mut expenses: Vec<_> = tables
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e.date))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or(FinanceError::NotFound("Expense"))?;
        *stored = expense.clone();
        Ok(expense.clone())
    }

    async fn delete(&self, user_id: UserId, id: ExpenseId) -> Result<bool, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.expenses.len();
        tables.expenses.retain(|e| !(e.user_id == user_id && e.id == id));
        Ok(tables.expenses.len() != before)
    }
}

#[async_trait]
impl EmiRepository for MemoryFinanceStore {
    async fn create(&self, emi: &NewEmi) -> Result<Emi, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let created = Emi {
            id: EmiId::new(tables.next_id()),
            user_id: emi.user_id,
            loan_name: emi.loan_name.clone(),
            principal: emi.principal,
            roi: emi.roi,
            tenure_months: emi.tenure_months,
            due_date: emi.due_date,
            emi_amount: emi.emi_amount,
            is_preclosed: emi.is_preclosed,
        };
        tables.emis.push(created.clone());
        Ok(created)
    }

    async fn get(&self, user_id: UserId, id: EmiId) -> Result<Option<Emi>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .emis
            .iter()
            .find(|e| e.user_id == user_id && e.id == id)
            .cloned())
    }

    async fn list(&self, user_id: UserId, filter: &EmiFilter) -> Result<Vec<Emi>, FinanceError> {
        let tables = self.tables.read().unwrap();
        let mut emis: Vec<_> = tables
            .emis
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        emis.sort_by_key(|e| e.due_date);
        Ok(emis)
    }

    async fn update(&self, emi: &Emi) -> Result<Emi, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .emis
            .iter_mut()
            .find(|e| e.id == emi.id)
            .ok_or(FinanceError::NotFound("EMI"))?;
        *stored = emi.clone();
        Ok(emi.clone())
    }

    async fn delete(&self, user_id: UserId, id: EmiId) -> Result<bool, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.emis.len();
        tables.emis.retain(|e| !(e.user_id == user_id && e.id == id));
        Ok(tables.emis.len() != before)
    }
}

#[async_trait]
impl InvestmentRepository for MemoryFinanceStore {
    async fn create(&self, investment: &NewInvestment) -> Result<Investment, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let created = Investment {
            id: InvestmentId::new(tables.next_id()),
            user_id: investment.user_id,
            investment_type: investment.investment_type.clone(),
            investment_name: investment.investment_name.clone(),
            amount_invested: investment.amount_invested,
            current_value: investment.current_value,
            start_date: investment.start_date,
            roi: investment.roi,
            duration_months: investment.duration_months,
        };
        tables.investments.push(created.clone());
        Ok(created)
    }

    async fn get(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, FinanceError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .investments
            .iter()
            .find(|i| i.user_id == user_id && i.id == id)
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Investment>, FinanceError> {
        let tables = self.tables.read().unwrap();
        let mut investments: Vec<_> = tables
            .investments
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        investments.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(investments)
    }

    async fn update(&self, investment: &Investment) -> Result<Investment, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .investments
            .iter_mut()
            .find(|i| i.id == investment.id)
            .ok_or(FinanceError::NotFound("Investment"))?;
        *stored = investment.clone();
        Ok(investment.clone())
    }

    async fn delete(&self, user_id: UserId, id: InvestmentId) -> Result<bool, FinanceError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.investments.len();
        tables
            .investments
            .retain(|i| !(i.user_id == user_id && i.id == id));
        Ok(tables.investments.len() != before)
    }
}
