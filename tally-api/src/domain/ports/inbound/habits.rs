use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{CreateHabitRequest, Habit, HabitFilter, HabitId, UpdateHabitRequest, UserId},
    HabitError,
};

#[async_trait]
pub trait HabitService: Send + Sync + 'static {
    async fn create_habit(
        &self,
        user_id: UserId,
        request: CreateHabitRequest,
    ) -> Result<Habit, HabitError>;

    async fn list_habits(&self, user_id: UserId, filter: HabitFilter)
        -> Result<Vec<Habit>, HabitError>;

    async fn get_habit(&self, user_id: UserId, id: HabitId) -> Result<Habit, HabitError>;

    async fn update_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        request: UpdateHabitRequest,
    ) -> Result<Habit, HabitError>;

    async fn delete_habit(&self, user_id: UserId, id: HabitId) -> Result<(), HabitError>;

    /// Record a completion; `date` defaults to today.
    async fn record_completion(
        &self,
        user_id: UserId,
        id: HabitId,
        date: Option<Date>,
        notes: Option<String>,
        count: Option<i32>,
    ) -> Result<Habit, HabitError>;

    async fn unmark_completion(
        &self,
        user_id: UserId,
        id: HabitId,
        date: Date,
    ) -> Result<Habit, HabitError>;

    async fn record_count(
        &self,
        user_id: UserId,
        id: HabitId,
        count: i32,
        date: Option<Date>,
    ) -> Result<Habit, HabitError>;

    async fn pause_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        until: Option<Date>,
        reason: Option<String>,
    ) -> Result<Habit, HabitError>;

    async fn resume_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        keep_streak: bool,
    ) -> Result<Habit, HabitError>;
}
