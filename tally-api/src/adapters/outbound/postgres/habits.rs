//! PostgreSQL implementation of the habit storage port.

use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use super::decode;
use crate::domain::{
    models::{
        Frequency, Goal, Habit, HabitFilter, HabitId, HabitLog, HabitSort, NewHabit, PauseData,
        StreakData, UserId,
    },
    ports::outbound::HabitRepository,
    HabitError,
};

const HABIT_COLUMNS: &str = "id, user_id, title, description, category, frequency_type, \
     days_of_week, days_of_month, times_per_day, start_date, end_date, goal_type, goal_target, \
     goal_current, current_streak, longest_streak, last_completed_date, status, paused_at, \
     paused_until, pause_reason, streak_before_pause, version";

fn db_err(e: sqlx::Error) -> HabitError {
    HabitError::storage(e.to_string())
}

fn to_days(days: &[u8]) -> Vec<i32> {
    days.iter().map(|d| i32::from(*d)).collect()
}

fn from_days(days: Vec<i32>) -> Result<Vec<u8>, HabitError> {
    days.into_iter()
        .map(|d| u8::try_from(d).map_err(|_| HabitError::storage(format!("invalid day {d}"))))
        .collect()
}

#[derive(sqlx::FromRow)]
struct HabitRow {
    id: i32,
    user_id: i32,
    title: String,
    description: Option<String>,
    category: String,
    frequency_type: String,
    days_of_week: Vec<i32>,
    days_of_month: Vec<i32>,
    times_per_day: i32,
    start_date: Date,
    end_date: Option<Date>,
    goal_type: String,
    goal_target: i32,
    goal_current: i32,
    current_streak: i32,
    longest_streak: i32,
    last_completed_date: Option<Date>,
    status: String,
    paused_at: Option<OffsetDateTime>,
    paused_until: Option<Date>,
    pause_reason: Option<String>,
    streak_before_pause: Option<i32>,
    version: i32,
}

impl HabitRow {
    fn into_habit(self, logs: Vec<HabitLog>) -> Result<Habit, HabitError> {
        let pause_data = self.paused_at.map(|paused_at| PauseData {
            paused_at,
            paused_until: self.paused_until,
            pause_reason: self.pause_reason.clone().unwrap_or_default(),
            streak_before_pause: self.streak_before_pause.unwrap_or(0),
        });

        Ok(Habit {
            id: self.id.into(),
            user_id: self.user_id.into(),
            title: self.title,
            description: self.description,
            category: self.category,
            frequency: Frequency {
                kind: decode(&self.frequency_type, "frequency").map_err(HabitError::Storage)?,
                days_of_week: from_days(self.days_of_week)?,
                days_of_month: from_days(self.days_of_month)?,
                times_per_day: self.times_per_day,
            },
            start_date: self.start_date,
            end_date: self.end_date,
            goal: Goal {
                kind: decode(&self.goal_type, "goal type").map_err(HabitError::Storage)?,
                target: self.goal_target,
                current: self.goal_current,
            },
            logs,
            status: decode(&self.status, "habit status").map_err(HabitError::Storage)?,
            pause_data,
            streak_data: StreakData {
                current_streak: self.current_streak,
                longest_streak: self.longest_streak,
                last_completed_date: self.last_completed_date,
            },
            version: self.version,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LogRow {
    habit_id: i32,
    log_date: Date,
    completed: bool,
    notes: String,
}

impl From<LogRow> for HabitLog {
    fn from(row: LogRow) -> Self {
        Self {
            date: row.log_date,
            completed: row.completed,
            notes: row.notes,
        }
    }
}

#[derive(Clone)]
pub struct PostgresHabitRepository {
    pool: PgPool,
}

impl PostgresHabitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_logs(&self, rows: Vec<HabitRow>) -> Result<Vec<Habit>, HabitError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let logs = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT habit_id, log_date, completed, notes
            FROM habit_logs
            WHERE habit_id = ANY($1)
            ORDER BY log_date
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut logs: HashMap<i32, Vec<LogRow>> = logs.into_iter().into_group_map_by(|l| l.habit_id);
        rows.into_iter()
            .map(|row| {
                let habit_logs = logs
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(HabitLog::from)
                    .collect();
                row.into_habit(habit_logs)
            })
            .collect()
    }
}

#[async_trait]
impl HabitRepository for PostgresHabitRepository {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitError> {
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            r#"
            INSERT INTO habits (user_id, title, description, category, frequency_type, days_of_week,
                                days_of_month, times_per_day, start_date, end_date, goal_type,
                                goal_target, goal_current)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {HABIT_COLUMNS}
            "#
        ))
        .bind(habit.user_id.as_i32())
        .bind(&habit.title)
        .bind(&habit.description)
        .bind(&habit.category)
        .bind(habit.frequency.kind.to_string())
        .bind(to_days(&habit.frequency.days_of_week))
        .bind(to_days(&habit.frequency.days_of_month))
        .bind(habit.frequency.times_per_day)
        .bind(habit.start_date)
        .bind(habit.end_date)
        .bind(habit.goal.kind.to_string())
        .bind(habit.goal.target)
        .bind(habit.goal.current)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.into_habit(vec![])
    }

    async fn get(&self, id: HabitId) -> Result<Option<Habit>, HabitError> {
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Ok(self.with_logs(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: UserId, filter: &HabitFilter) -> Result<Vec<Habit>, HabitError> {
        let order_by = match filter.sort {
            HabitSort::Streak => "current_streak DESC, id",
            HabitSort::Created => "created_at DESC, id DESC",
            HabitSort::Title => "title, id",
        };
        let rows = sqlx::query_as::<_, HabitRow>(&format!(
            r#"
            SELECT {HABIT_COLUMNS} FROM habits
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY {order_by}
            "#
        ))
        .bind(user_id.as_i32())
        .bind(&filter.category)
        .bind(filter.status.map(|s| s.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        self.with_logs(rows).await
    }

    async fn save(&self, habit: &Habit) -> Result<Habit, HabitError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let pause = habit.pause_data.as_ref();

        let row = sqlx::query_as::<_, HabitRow>(&format!(
            r#"
            UPDATE habits
            SET title = $3, description = $4, category = $5, frequency_type = $6,
                days_of_week = $7, days_of_month = $8, times_per_day = $9, end_date = $10,
                goal_type = $11, goal_target = $12, goal_current = $13,
                current_streak = $14, longest_streak = $15, last_completed_date = $16,
                status = $17, paused_at = $18, paused_until = $19, pause_reason = $20,
                streak_before_pause = $21, version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {HABIT_COLUMNS}
            "#
        ))
        .bind(habit.id.as_i32())
        .bind(habit.version)
        .bind(&habit.title)
        .bind(&habit.description)
        .bind(&habit.category)
        .bind(habit.frequency.kind.to_string())
        .bind(to_days(&habit.frequency.days_of_week))
        .bind(to_days(&habit.frequency.days_of_month))
        .bind(habit.frequency.times_per_day)
        .bind(habit.end_date)
        .bind(habit.goal.kind.to_string())
        .bind(habit.goal.target)
        .bind(habit.goal.current)
        .bind(habit.streak_data.current_streak)
        .bind(habit.streak_data.longest_streak)
        .bind(habit.streak_data.last_completed_date)
        .bind(habit.status.to_string())
        .bind(pause.map(|p| p.paused_at))
        .bind(pause.and_then(|p| p.paused_until))
        .bind(pause.map(|p| p.pause_reason.clone()))
        .bind(pause.map(|p| p.streak_before_pause))
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM habits WHERE id = $1)")
                .bind(habit.id.as_i32())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;
            return Err(if exists {
                HabitError::Stale
            } else {
                HabitError::NotFound
            });
        };

        sqlx::query("DELETE FROM habit_logs WHERE habit_id = $1")
            .bind(habit.id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let dates: Vec<Date> = habit.logs.iter().map(|l| l.date).collect();
        let completed: Vec<bool> = habit.logs.iter().map(|l| l.completed).collect();
        let notes: Vec<String> = habit.logs.iter().map(|l| l.notes.clone()).collect();
        sqlx::query(
            r#"
            INSERT INTO habit_logs (habit_id, log_date, completed, notes)
            SELECT $1, * FROM UNNEST($2::date[], $3::boolean[], $4::text[])
            "#,
        )
        .bind(habit.id.as_i32())
        .bind(&dates)
        .bind(&completed)
        .bind(&notes)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        let mut logs = habit.logs.clone();
        logs.sort_by_key(|l| l.date);
        row.into_habit(logs)
    }

    async fn delete(&self, id: HabitId) -> Result<bool, HabitError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
