use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};

use async_trait::async_trait;

use crate::domain::{
    models::{Habit, HabitFilter, HabitId, HabitSort, HabitStatus, NewHabit, StreakData, UserId},
    ports::outbound::HabitRepository,
    HabitError,
};

#[derive(Clone, Default)]
pub struct MemoryHabitRepository {
    habits: Arc<RwLock<Vec<Habit>>>,
    conflicts: Arc<AtomicUsize>,
}

impl MemoryHabitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` saves lose to a concurrent writer.
    pub fn conflict_next_saves(&self, n: usize) {
        self.conflicts.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl HabitRepository for MemoryHabitRepository {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitError> {
        let mut habits = self.habits.write().unwrap();
        let created = Habit {
            id: HabitId::new(habits.iter().map(|h| h.id.as_i32()).max().unwrap_or(0) + 1),
            user_id: habit.user_id,
            title: habit.title.clone(),
            description: habit.description.clone(),
            category: habit.category.clone(),
            frequency: habit.frequency.clone(),
            start_date: habit.start_date,
            end_date: habit.end_date,
            goal: habit.goal,
            logs: vec![],
            status: HabitStatus::Active,
            pause_data: None,
            streak_data: StreakData::default(),
            version: 0,
        };
        habits.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: HabitId) -> Result<Option<Habit>, HabitError> {
        let habits = self.habits.read().unwrap();
        Ok(habits.iter().find(|h| h.id == id).cloned())
    }

    async fn list(&self, user_id: UserId, filter: &HabitFilter) -> Result<Vec<Habit>, HabitError> {
        let habits = self.habits.read().unwrap();
        let mut found: Vec<_> = habits
            .iter()
            .filter(|h| h.user_id == user_id)
            .filter(|h| filter.category.as_ref().map_or(true, |c| &h.category == c))
            .filter(|h| filter.status.map_or(true, |s| h.status == s))
            .cloned()
            .collect();
        match filter.sort {
            HabitSort::Streak => found.sort_by(|a, b| {
                b.streak_data.current_streak.cmp(&a.streak_data.current_streak)
            }),
            HabitSort::Created => found.sort_by(|a, b| b.id.cmp(&a.id)),
            HabitSort::Title => found.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        Ok(found)
    }

    async fn save(&self, habit: &Habit) -> Result<Habit, HabitError> {
        let mut habits = self.habits.write().unwrap();
        let stored = habits
            .iter_mut()
            .find(|h| h.id == habit.id)
            .ok_or(HabitError::NotFound)?;
        let pending = self.conflicts.load(Ordering::SeqCst);
        if pending > 0 {
            self.conflicts.store(pending - 1, Ordering::SeqCst);
            stored.version += 1;
        }
        if stored.version != habit.version {
            return Err(HabitError::Stale);
        }
        *stored = Habit {
            version: habit.version + 1,
            ..habit.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: HabitId) -> Result<bool, HabitError> {
        let mut habits = self.habits.write().unwrap();
        let before = habits.len();
        habits.retain(|h| h.id != id);
        Ok(habits.len() != before)
    }
}
