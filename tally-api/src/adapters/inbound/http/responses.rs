//! HTTP response types that add derived fields to domain models.

use serde::Serialize;

use crate::domain::models::{Budget, ColumnId, Habit, KanbanColumn, ProjectTask};

/// A budget together with its remaining amount and utilization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    #[serde(flatten)]
    pub budget: Budget,
    pub remaining_amount: f64,
    /// Rounded percentage of the budget spent; 0 for a zero budget.
    pub utilization_percentage: i64,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        Self {
            remaining_amount: budget.remaining_amount(),
            utilization_percentage: budget.utilization_percentage(),
            budget,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    #[serde(flatten)]
    pub habit: Habit,
    pub goal_progress: i32,
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        Self {
            goal_progress: habit.goal.progress_percentage(),
            habit,
        }
    }
}

/// Tasks of one kanban column in board order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnTasksResponse {
    pub column_id: ColumnId,
    pub column_name: String,
    pub tasks: Vec<ProjectTask>,
}

impl From<(KanbanColumn, Vec<ProjectTask>)> for ColumnTasksResponse {
    fn from((column, tasks): (KanbanColumn, Vec<ProjectTask>)) -> Self {
        Self {
            column_id: column.id,
            column_name: column.name,
            tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BudgetId, BudgetStatus, CategoryId, UserId};
    use time::macros::date;

    #[test]
    fn budget_response_flattens_the_budget() {
        let budget = Budget {
            id: BudgetId::new(3),
            user_id: UserId::new(1),
            category_id: CategoryId::new(2),
            budgeted_amount: 1000.0,
            spent_amount: 250.0,
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 01 - 31),
            is_fixed: false,
            status: BudgetStatus::Active,
        };

        let json = serde_json::to_value(BudgetResponse::from(budget)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["remainingAmount"], 750.0);
        assert_eq!(json["utilizationPercentage"], 25);
        assert_eq!(json["status"], "Active");
    }
}
