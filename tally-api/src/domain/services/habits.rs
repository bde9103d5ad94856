use std::sync::Arc;

use async_trait::async_trait;
use time::Date;
use tracing::{debug, warn};

use crate::domain::{
    models::{
        CreateHabitRequest, Goal, GoalRequest, Habit, HabitFilter, HabitId, NewHabit,
        UpdateHabitRequest, UserId, DEFAULT_HABIT_CATEGORY,
    },
    ports::{
        inbound::HabitService,
        outbound::{Clock, HabitRepository},
    },
    HabitError,
};

/// Attempts at a read-modify-write before a version conflict is surfaced.
const MAX_SAVE_ATTEMPTS: usize = 3;

fn non_empty(value: &str, field: &str) -> Result<String, HabitError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HabitError::invalid(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn build_goal(request: Option<GoalRequest>) -> Result<Goal, HabitError> {
    match request {
        Some(goal) => Goal::new(goal.kind, goal.target),
        None => Ok(Goal::default()),
    }
}

pub struct HabitServiceImpl<H> {
    repo: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<H: HabitRepository> HabitServiceImpl<H> {
    pub fn new(repo: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    async fn load_owned(&self, user_id: UserId, id: HabitId) -> Result<Habit, HabitError> {
        let habit = self.repo.get(id).await?.ok_or(HabitError::NotFound)?;
        if habit.user_id != user_id {
            return Err(HabitError::Forbidden);
        }
        Ok(habit)
    }

    /// Load, apply `change` and save, reloading and reapplying when another
    /// writer saved in between. Rule violations from `change` are returned
    /// as is and never retried.
    async fn modify<F>(&self, user_id: UserId, id: HabitId, change: F) -> Result<Habit, HabitError>
    where
        F: Fn(&mut Habit) -> Result<(), HabitError> + Send + Sync,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let mut habit = self.load_owned(user_id, id).await?;
            change(&mut habit)?;
            match self.repo.save(&habit).await {
                Err(HabitError::Stale) => {
                    debug!(habit_id = %id, attempt, "habit changed concurrently, retrying");
                }
                result => return result,
            }
        }
        warn!(habit_id = %id, "giving up after repeated version conflicts");
        Err(HabitError::Stale)
    }
}

#[async_trait]
impl<H: HabitRepository> HabitService for HabitServiceImpl<H> {
    async fn create_habit(
        &self,
        user_id: UserId,
        request: CreateHabitRequest,
    ) -> Result<Habit, HabitError> {
        let title = non_empty(&request.title, "Title")?;
        let frequency = request.frequency.into_frequency()?;
        let goal = build_goal(request.goal)?;
        let start_date = self.clock.today();
        if request.end_date.is_some_and(|end| end < start_date) {
            return Err(HabitError::invalid("End date cannot be before start date"));
        }
        let category = request
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_HABIT_CATEGORY.to_string());

        self.repo
            .create(&NewHabit {
                user_id,
                title,
                description: request.description,
                category,
                frequency,
                start_date,
                end_date: request.end_date,
                goal,
            })
            .await
    }

    async fn list_habits(
        &self,
        user_id: UserId,
        filter: HabitFilter,
    ) -> Result<Vec<Habit>, HabitError> {
        self.repo.list(user_id, &filter).await
    }

    async fn get_habit(&self, user_id: UserId, id: HabitId) -> Result<Habit, HabitError> {
        self.load_owned(user_id, id).await
    }

    async fn update_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        request: UpdateHabitRequest,
    ) -> Result<Habit, HabitError> {
        let title = request
            .title
            .as_deref()
            .map(|t| non_empty(t, "Title"))
            .transpose()?;
        let frequency = request
            .frequency
            .map(|f| f.into_frequency())
            .transpose()?;
        let goal = request.goal.map(|g| Goal::new(g.kind, g.target)).transpose()?;
        let today = self.clock.today();

        self.modify(user_id, id, |habit| {
            if let Some(title) = &title {
                habit.title = title.clone();
            }
            if let Some(description) = &request.description {
                habit.description = Some(description.clone());
            }
            if let Some(category) = request.category.as_deref().map(str::trim) {
                if !category.is_empty() {
                    habit.category = category.to_string();
                }
            }
            if let Some(frequency) = &frequency {
                habit.frequency = frequency.clone();
            }
            if let Some(end) = request.end_date {
                if end < habit.start_date {
                    return Err(HabitError::invalid("End date cannot be before start date"));
                }
                habit.end_date = Some(end);
            }
            if let Some(goal) = &goal {
                // A count goal keeps its tally while its kind is unchanged.
                let current = if goal.kind == habit.goal.kind {
                    habit.goal.current
                } else {
                    0
                };
                habit.goal = Goal {
                    current,
                    ..*goal
                };
                habit.refresh_goal(today);
            }
            Ok(())
        })
        .await
    }

    async fn delete_habit(&self, user_id: UserId, id: HabitId) -> Result<(), HabitError> {
        self.load_owned(user_id, id).await?;
        if !self.repo.delete(id).await? {
            return Err(HabitError::NotFound);
        }
        Ok(())
    }

    async fn record_completion(
        &self,
        user_id: UserId,
        id: HabitId,
        date: Option<Date>,
        notes: Option<String>,
        count: Option<i32>,
    ) -> Result<Habit, HabitError> {
        let today = self.clock.today();
        let date = date.unwrap_or(today);
        let habit = self
            .modify(user_id, id, |habit| {
                habit.record_completion(date, notes.clone(), count, today)
            })
            .await?;
        debug!(
            habit_id = %id,
            %date,
            streak = habit.streak_data.current_streak,
            "recorded habit completion"
        );
        Ok(habit)
    }

    async fn unmark_completion(
        &self,
        user_id: UserId,
        id: HabitId,
        date: Date,
    ) -> Result<Habit, HabitError> {
        let today = self.clock.today();
        self.modify(user_id, id, |habit| habit.unmark(date, today))
            .await
    }

    async fn record_count(
        &self,
        user_id: UserId,
        id: HabitId,
        count: i32,
        date: Option<Date>,
    ) -> Result<Habit, HabitError> {
        let date = date.unwrap_or_else(|| self.clock.today());
        self.modify(user_id, id, |habit| habit.record_count(count, date))
            .await
    }

    async fn pause_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        until: Option<Date>,
        reason: Option<String>,
    ) -> Result<Habit, HabitError> {
        let now = self.clock.now();
        self.modify(user_id, id, |habit| habit.pause(now, until, reason.clone()))
            .await
    }

    async fn resume_habit(
        &self,
        user_id: UserId,
        id: HabitId,
        keep_streak: bool,
    ) -> Result<Habit, HabitError> {
        let today = self.clock.today();
        self.modify(user_id, id, |habit| habit.resume(keep_streak, today))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::memory::{FixedClock, MemoryHabitRepository},
        domain::models::{FrequencyRequest, FrequencyType, GoalType, HabitStatus},
    };
    use time::macros::date;

    const USER: UserId = UserId::new(1);
    const OTHER: UserId = UserId::new(2);

    fn service() -> (HabitServiceImpl<MemoryHabitRepository>, MemoryHabitRepository) {
        let repo = MemoryHabitRepository::new();
        let svc = HabitServiceImpl::new(
            Arc::new(repo.clone()),
            Arc::new(FixedClock(date!(2024 - 03 - 10))),
        );
        (svc, repo)
    }

    fn daily(goal: Option<GoalRequest>) -> CreateHabitRequest {
        CreateHabitRequest {
            title: "Read".to_string(),
            description: None,
            category: None,
            frequency: FrequencyRequest {
                kind: FrequencyType::Daily,
                days_of_week: None,
                days_of_month: None,
                times_per_day: None,
            },
            goal,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        assert_eq!(habit.category, DEFAULT_HABIT_CATEGORY);
        assert_eq!(habit.frequency.days_of_week, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(habit.goal.kind, GoalType::Streak);
        assert_eq!(habit.goal.target, 21);
        assert_eq!(habit.start_date, date!(2024 - 03 - 10));
        assert_eq!(habit.status, HabitStatus::Active);
    }

    #[tokio::test]
    async fn streak_resets_after_a_missed_day() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        for day in [date!(2024 - 03 - 01), date!(2024 - 03 - 02)] {
            svc.record_completion(USER, habit.id, Some(day), None, None)
                .await
                .unwrap();
        }
        let habit = svc
            .record_completion(USER, habit.id, Some(date!(2024 - 03 - 04)), None, None)
            .await
            .unwrap();

        assert_eq!(habit.streak_data.current_streak, 1);
        assert_eq!(habit.streak_data.longest_streak, 2);
        assert_eq!(habit.goal.current, 1);
    }

    #[tokio::test]
    async fn second_completion_on_the_same_day_is_rejected() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        svc.record_completion(USER, habit.id, None, None, None)
            .await
            .unwrap();
        let again = svc.record_completion(USER, habit.id, None, None, None).await;
        assert!(matches!(again, Err(HabitError::AlreadyCompleted)));
    }

    #[tokio::test]
    async fn count_goals_accumulate_on_the_same_day() {
        let (svc, _) = service();
        let goal = GoalRequest {
            kind: GoalType::TotalCount,
            target: 10,
        };
        let habit = svc.create_habit(USER, daily(Some(goal))).await.unwrap();

        svc.record_completion(USER, habit.id, None, None, Some(3))
            .await
            .unwrap();
        let habit = svc
            .record_completion(USER, habit.id, None, None, Some(2))
            .await
            .unwrap();
        assert_eq!(habit.goal.current, 5);
        assert_eq!(habit.logs.len(), 1);

        let habit = svc.record_count(USER, habit.id, 4, None).await.unwrap();
        assert_eq!(habit.goal.current, 9);
        assert_eq!(habit.logs[0].notes, "Updated count: 4");
    }

    #[tokio::test]
    async fn count_endpoint_requires_a_count_goal() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();
        let result = svc.record_count(USER, habit.id, 1, None).await;
        assert!(matches!(result, Err(HabitError::NotCountBased)));
    }

    #[tokio::test]
    async fn pause_keeps_the_first_snapshot() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();
        svc.record_completion(USER, habit.id, None, None, None)
            .await
            .unwrap();

        let paused = svc
            .pause_habit(USER, habit.id, None, None)
            .await
            .unwrap();
        assert_eq!(paused.status, HabitStatus::OnHold);
        assert_eq!(
            paused.pause_data.as_ref().map(|p| p.streak_before_pause),
            Some(1)
        );

        let again = svc.pause_habit(USER, habit.id, None, None).await;
        assert!(matches!(again, Err(HabitError::AlreadyPaused)));

        let resumed = svc.resume_habit(USER, habit.id, true).await.unwrap();
        assert_eq!(resumed.status, HabitStatus::Active);
        assert_eq!(resumed.streak_data.current_streak, 1);
        assert!(resumed.pause_data.is_none());

        let not_paused = svc.resume_habit(USER, habit.id, true).await;
        assert!(matches!(not_paused, Err(HabitError::NotPaused)));
    }

    #[tokio::test]
    async fn unmarking_the_last_completion_keeps_a_streak_of_one() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();
        for day in [
            date!(2024 - 03 - 07),
            date!(2024 - 03 - 08),
            date!(2024 - 03 - 09),
        ] {
            svc.record_completion(USER, habit.id, Some(day), None, None)
                .await
                .unwrap();
        }

        let habit = svc
            .unmark_completion(USER, habit.id, date!(2024 - 03 - 09))
            .await
            .unwrap();
        assert_eq!(habit.streak_data.current_streak, 1);
        assert_eq!(
            habit.streak_data.last_completed_date,
            Some(date!(2024 - 03 - 08))
        );

        let missing = svc
            .unmark_completion(USER, habit.id, date!(2024 - 01 - 01))
            .await;
        assert!(matches!(missing, Err(HabitError::LogNotFound)));
    }

    #[tokio::test]
    async fn stale_saves_are_retried() {
        let (svc, repo) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        repo.conflict_next_saves(2);
        let saved = svc
            .record_completion(USER, habit.id, None, None, None)
            .await
            .unwrap();
        assert_eq!(saved.streak_data.current_streak, 1);
        assert_eq!(saved.logs.len(), 1);

        repo.conflict_next_saves(MAX_SAVE_ATTEMPTS);
        let exhausted = svc.pause_habit(USER, habit.id, None, None).await;
        assert!(matches!(exhausted, Err(HabitError::Stale)));
        assert!(svc.get_habit(USER, habit.id).await.unwrap().pause_data.is_none());
    }

    #[tokio::test]
    async fn foreign_habits_are_forbidden() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        assert!(matches!(
            svc.get_habit(OTHER, habit.id).await,
            Err(HabitError::Forbidden)
        ));
        assert!(matches!(
            svc.get_habit(USER, HabitId::new(99)).await,
            Err(HabitError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_replaces_the_goal() {
        let (svc, _) = service();
        let habit = svc.create_habit(USER, daily(None)).await.unwrap();

        let updated = svc
            .update_habit(
                USER,
                habit.id,
                UpdateHabitRequest {
                    title: Some("Read more".to_string()),
                    goal: Some(GoalRequest {
                        kind: GoalType::Streak,
                        target: 30,
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Read more");
        assert_eq!(updated.goal.target, 30);

        let invalid = svc
            .update_habit(
                USER,
                habit.id,
                UpdateHabitRequest {
                    goal: Some(GoalRequest {
                        kind: GoalType::Streak,
                        target: 0,
                    }),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(HabitError::Invalid(_))));
    }
}
