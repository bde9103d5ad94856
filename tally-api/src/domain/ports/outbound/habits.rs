use async_trait::async_trait;

use crate::domain::{
    models::{Habit, HabitFilter, HabitId, NewHabit, UserId},
    HabitError,
};

#[async_trait]
pub trait HabitRepository: Send + Sync + 'static {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitError>;

    async fn get(&self, id: HabitId) -> Result<Option<Habit>, HabitError>;

    async fn list(&self, user_id: UserId, filter: &HabitFilter) -> Result<Vec<Habit>, HabitError>;

    /// Persist the habit and its logs if its `version` still matches storage.
    ///
    /// Returns the saved habit with the bumped version, or
    /// [`HabitError::Stale`] when someone else saved first.
    async fn save(&self, habit: &Habit) -> Result<Habit, HabitError>;

    async fn delete(&self, id: HabitId) -> Result<bool, HabitError>;
}
