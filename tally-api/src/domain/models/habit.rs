use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Date, Duration, Month, OffsetDateTime};

use super::{HabitId, UserId};
use crate::{domain::HabitError, utils::date_format::iso_date};

pub const DEFAULT_HABIT_CATEGORY: &str = "General";
pub const DEFAULT_STREAK_TARGET: i32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FrequencyType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// When a habit is scheduled. Weekdays count from Sunday (0) to Saturday (6),
/// month days from 1 to 31.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequency {
    #[serde(rename = "type")]
    pub kind: FrequencyType,
    pub days_of_week: Vec<u8>,
    pub days_of_month: Vec<u8>,
    pub times_per_day: i32,
}

impl Frequency {
    /// Build a frequency, filling in the default schedule when none is given:
    /// daily habits run every day and weekly habits on Mondays.
    pub fn new(
        kind: FrequencyType,
        days_of_week: Option<Vec<u8>>,
        days_of_month: Option<Vec<u8>>,
        times_per_day: Option<i32>,
    ) -> Result<Self, HabitError> {
        let (days_of_week, days_of_month) = match (days_of_week, days_of_month) {
            (None, None) => match kind {
                FrequencyType::Daily => ((0..=6).collect(), vec![]),
                FrequencyType::Weekly => (vec![1], vec![]),
                _ => (vec![], vec![]),
            },
            (week, month) => (week.unwrap_or_default(), month.unwrap_or_default()),
        };

        if days_of_week.iter().any(|d| *d > 6) {
            return Err(HabitError::invalid("daysOfWeek values must be between 0 and 6"));
        }
        if days_of_month.iter().any(|d| !(1..=31).contains(d)) {
            return Err(HabitError::invalid(
                "daysOfMonth values must be between 1 and 31",
            ));
        }
        let times_per_day = times_per_day.unwrap_or(1);
        if times_per_day < 1 {
            return Err(HabitError::invalid("timesPerDay must be at least 1"));
        }

        Ok(Self {
            kind,
            days_of_week,
            days_of_month,
            times_per_day,
        })
    }

    fn is_scheduled(&self, date: Date) -> bool {
        self.days_of_week
            .contains(&date.weekday().number_days_from_sunday())
            || self.days_of_month.contains(&date.day())
    }

    /// The occurrence a completion on `date` continues a streak from.
    pub fn predecessor(&self, date: Date) -> Option<Date> {
        match self.kind {
            FrequencyType::Daily => date.previous_day(),
            FrequencyType::Weekly => date.checked_sub(Duration::days(7)),
            FrequencyType::Monthly => same_day_previous_month(date),
            FrequencyType::Custom => {
                if self.days_of_week.is_empty() && self.days_of_month.is_empty() {
                    return date.previous_day();
                }
                // A schedule repeats within two months at most.
                let mut candidate = date.previous_day();
                for _ in 0..62 {
                    let day = candidate?;
                    if self.is_scheduled(day) {
                        return Some(day);
                    }
                    candidate = day.previous_day();
                }
                date.previous_day()
            }
        }
    }
}

fn same_day_previous_month(date: Date) -> Option<Date> {
    let (year, month) = match date.month() {
        Month::January => (date.year() - 1, Month::December),
        other => (date.year(), other.previous()),
    };
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GoalType {
    Streak,
    CompletionRate,
    TotalCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Goal {
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target: i32,
    pub current: i32,
}

impl Goal {
    pub fn new(kind: GoalType, target: i32) -> Result<Self, HabitError> {
        if target < 1 {
            return Err(HabitError::invalid("goal target must be at least 1"));
        }
        Ok(Self {
            kind,
            target,
            current: 0,
        })
    }

    pub fn progress_percentage(&self) -> i32 {
        if self.target <= 0 {
            return 0;
        }
        let pct = (f64::from(self.current) / f64::from(self.target) * 100.0).round();
        (pct as i32).min(100)
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            kind: GoalType::Streak,
            target: DEFAULT_STREAK_TARGET,
            current: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum HabitStatus {
    Active,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseData {
    #[serde(with = "time::serde::rfc3339")]
    pub paused_at: OffsetDateTime,
    #[serde(with = "iso_date::option")]
    pub paused_until: Option<Date>,
    pub pause_reason: String,
    pub streak_before_pause: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: i32,
    pub longest_streak: i32,
    #[serde(with = "iso_date::option")]
    pub last_completed_date: Option<Date>,
}

/// One log per habit per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitLog {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub completed: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub frequency: Frequency,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    pub goal: Goal,
    pub logs: Vec<HabitLog>,
    pub status: HabitStatus,
    pub pause_data: Option<PauseData>,
    pub streak_data: StreakData,
    #[serde(skip)]
    pub version: i32,
}

impl Habit {
    fn log_index(&self, date: Date) -> Option<usize> {
        self.logs.iter().position(|log| log.date == date)
    }

    fn completed_on(&self, date: Date) -> bool {
        self.logs.iter().any(|log| log.date == date && log.completed)
    }

    fn last_completed(&self) -> Option<Date> {
        self.logs
            .iter()
            .filter(|log| log.completed)
            .map(|log| log.date)
            .max()
    }

    fn upsert_completed_log(&mut self, date: Date, notes: String) {
        match self.log_index(date) {
            Some(idx) => {
                self.logs[idx].completed = true;
                self.logs[idx].notes = notes;
            }
            None => self.logs.push(HabitLog {
                date,
                completed: true,
                notes,
            }),
        }
    }

    /// Record a completion for `date`.
    ///
    /// Count goals accumulate `count` (default 1) and may be completed any
    /// number of times per day; every other goal accepts one completion per
    /// day. The streak continues when the previous scheduled occurrence was
    /// completed and restarts at 1 otherwise.
    pub fn record_completion(
        &mut self,
        date: Date,
        notes: Option<String>,
        count: Option<i32>,
        today: Date,
    ) -> Result<(), HabitError> {
        let already_completed = self.completed_on(date);

        if self.goal.kind == GoalType::TotalCount {
            let count = count.unwrap_or(1);
            if count < 1 {
                return Err(HabitError::invalid("count must be at least 1"));
            }
            self.add_to_count(count)?;
            if already_completed {
                return Ok(());
            }
        } else if already_completed {
            return Err(HabitError::AlreadyCompleted);
        }

        self.upsert_completed_log(date, notes.unwrap_or_default());
        self.streak_data.last_completed_date = self.last_completed();

        let continues = self
            .frequency
            .predecessor(date)
            .is_some_and(|prev| self.completed_on(prev));
        self.streak_data.current_streak = if continues {
            self.streak_data.current_streak + 1
        } else {
            1
        };
        self.streak_data.longest_streak = self
            .streak_data
            .longest_streak
            .max(self.streak_data.current_streak);

        self.refresh_goal(today);
        Ok(())
    }

    fn add_to_count(&mut self, count: i32) -> Result<(), HabitError> {
        self.goal.current = self
            .goal
            .current
            .checked_add(count)
            .ok_or_else(|| HabitError::invalid("Count too large"))?;
        Ok(())
    }

    /// Add to a count goal without touching the streak.
    pub fn record_count(&mut self, count: i32, date: Date) -> Result<(), HabitError> {
        if self.goal.kind != GoalType::TotalCount {
            return Err(HabitError::NotCountBased);
        }
        if count < 1 {
            return Err(HabitError::invalid("Valid count value is required"));
        }

        self.add_to_count(count)?;
        let notes = match self.log_index(date) {
            Some(_) => format!("Updated count: {count}"),
            None => format!("Count: {count}"),
        };
        self.upsert_completed_log(date, notes);
        Ok(())
    }

    /// Remove the log for `date`.
    ///
    /// Removing the most recent completion does not walk the history back:
    /// the streak becomes 1 if any completion remains and 0 otherwise.
    pub fn unmark(&mut self, date: Date, today: Date) -> Result<(), HabitError> {
        let idx = self.log_index(date).ok_or(HabitError::LogNotFound)?;
        self.logs.remove(idx);

        if self.streak_data.last_completed_date == Some(date) {
            let last = self.last_completed();
            self.streak_data.last_completed_date = last;
            self.streak_data.current_streak = i32::from(last.is_some());
        }

        self.refresh_goal(today);
        Ok(())
    }

    pub fn pause(
        &mut self,
        now: OffsetDateTime,
        until: Option<Date>,
        reason: Option<String>,
    ) -> Result<(), HabitError> {
        if self.pause_data.is_some() {
            return Err(HabitError::AlreadyPaused);
        }
        if until.is_some_and(|until| until < now.date()) {
            return Err(HabitError::invalid("pause end date is in the past"));
        }

        self.pause_data = Some(PauseData {
            paused_at: now,
            paused_until: until,
            pause_reason: reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Paused by user".to_string()),
            streak_before_pause: self.streak_data.current_streak,
        });
        self.status = HabitStatus::OnHold;
        Ok(())
    }

    pub fn resume(&mut self, keep_streak: bool, today: Date) -> Result<(), HabitError> {
        let pause = self.pause_data.take().ok_or(HabitError::NotPaused)?;
        if keep_streak && pause.streak_before_pause > 0 {
            self.streak_data.current_streak = pause.streak_before_pause;
        }
        self.status = HabitStatus::Active;
        self.refresh_goal(today);
        Ok(())
    }

    /// Recompute the goal's `current` from the log for goals that derive it.
    pub fn refresh_goal(&mut self, today: Date) {
        match self.goal.kind {
            GoalType::Streak => self.goal.current = self.streak_data.current_streak,
            GoalType::CompletionRate => self.goal.current = self.completion_rate(today),
            GoalType::TotalCount => {}
        }
    }

    /// Percentage of days since the start date (inclusive) with a completion.
    pub fn completion_rate(&self, today: Date) -> i32 {
        if today < self.start_date {
            return 0;
        }
        let days = (today - self.start_date).whole_days() + 1;
        let completed = self
            .logs
            .iter()
            .filter(|log| log.completed && log.date >= self.start_date && log.date <= today)
            .count() as i64;
        ((completed as f64 / days as f64) * 100.0).round() as i32
    }
}

#[derive(Debug, Clone)]
pub struct NewHabit {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub goal: Goal,
}

#[derive(Debug, Clone)]
pub struct FrequencyRequest {
    pub kind: FrequencyType,
    pub days_of_week: Option<Vec<u8>>,
    pub days_of_month: Option<Vec<u8>>,
    pub times_per_day: Option<i32>,
}

impl FrequencyRequest {
    pub fn into_frequency(self) -> Result<Frequency, HabitError> {
        Frequency::new(
            self.kind,
            self.days_of_week,
            self.days_of_month,
            self.times_per_day,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GoalRequest {
    pub kind: GoalType,
    pub target: i32,
}

#[derive(Debug, Clone)]
pub struct CreateHabitRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: FrequencyRequest,
    pub goal: Option<GoalRequest>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<FrequencyRequest>,
    pub goal: Option<GoalRequest>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HabitSort {
    Streak,
    Created,
    #[default]
    Title,
}

#[derive(Debug, Clone, Default)]
pub struct HabitFilter {
    pub category: Option<String>,
    pub status: Option<HabitStatus>,
    pub sort: HabitSort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn habit(kind: FrequencyType, goal: Goal) -> Habit {
        Habit {
            id: HabitId::new(1),
            user_id: UserId::new(1),
            title: "Read".to_string(),
            description: None,
            category: DEFAULT_HABIT_CATEGORY.to_string(),
            frequency: Frequency::new(kind, None, None, None).unwrap(),
            start_date: date!(2024 - 03 - 01),
            end_date: None,
            goal,
            logs: vec![],
            status: HabitStatus::Active,
            pause_data: None,
            streak_data: StreakData::default(),
            version: 0,
        }
    }

    #[test]
    fn daily_streak_resets_after_a_gap() {
        let mut h = habit(FrequencyType::Daily, Goal::default());
        let today = date!(2024 - 03 - 04);

        h.record_completion(date!(2024 - 03 - 01), None, None, today).unwrap();
        h.record_completion(date!(2024 - 03 - 02), None, None, today).unwrap();
        assert_eq!(h.streak_data.current_streak, 2);

        h.record_completion(date!(2024 - 03 - 04), None, None, today).unwrap();
        assert_eq!(h.streak_data.current_streak, 1);
        assert_eq!(h.streak_data.longest_streak, 2);
        assert_eq!(h.streak_data.last_completed_date, Some(date!(2024 - 03 - 04)));
        assert_eq!(h.goal.current, 1);
    }

    #[test]
    fn second_completion_same_day_is_rejected() {
        let mut h = habit(FrequencyType::Daily, Goal::default());
        let day = date!(2024 - 03 - 01);
        h.record_completion(day, None, None, day).unwrap();
        assert!(matches!(
            h.record_completion(day, None, None, day),
            Err(HabitError::AlreadyCompleted)
        ));
        assert_eq!(h.logs.len(), 1);
    }

    #[test]
    fn count_goal_accumulates_within_a_day() {
        let mut h = habit(
            FrequencyType::Daily,
            Goal::new(GoalType::TotalCount, 100).unwrap(),
        );
        let day = date!(2024 - 03 - 01);
        h.record_completion(day, None, Some(5), day).unwrap();
        h.record_completion(day, None, Some(3), day).unwrap();
        h.record_count(2, day).unwrap();

        assert_eq!(h.goal.current, 10);
        assert_eq!(h.logs.len(), 1);
        assert_eq!(h.logs[0].notes, "Updated count: 2");
        assert_eq!(h.goal.progress_percentage(), 10);
    }

    #[test]
    fn oversized_counts_are_rejected_without_changes() {
        let mut h = habit(
            FrequencyType::Daily,
            Goal::new(GoalType::TotalCount, 100).unwrap(),
        );
        let day = date!(2024 - 03 - 01);
        h.record_count(i32::MAX, day).unwrap();

        assert!(matches!(h.record_count(1, day), Err(HabitError::Invalid(_))));
        assert!(matches!(
            h.record_completion(day, None, Some(1), day),
            Err(HabitError::Invalid(_))
        ));
        assert_eq!(h.goal.current, i32::MAX);
        assert_eq!(h.logs.len(), 1);
    }

    #[test]
    fn record_count_requires_count_goal() {
        let mut h = habit(FrequencyType::Daily, Goal::default());
        assert!(matches!(
            h.record_count(1, date!(2024 - 03 - 01)),
            Err(HabitError::NotCountBased)
        ));
    }

    #[test]
    fn weekly_streak_looks_back_seven_days() {
        let mut h = habit(FrequencyType::Weekly, Goal::default());
        let today = date!(2024 - 03 - 20);
        h.record_completion(date!(2024 - 03 - 04), None, None, today).unwrap();
        h.record_completion(date!(2024 - 03 - 11), None, None, today).unwrap();
        assert_eq!(h.streak_data.current_streak, 2);
        h.record_completion(date!(2024 - 03 - 19), None, None, today).unwrap();
        assert_eq!(h.streak_data.current_streak, 1);
    }

    #[test]
    fn monthly_predecessor_clamps_to_month_end() {
        let freq = Frequency::new(FrequencyType::Monthly, None, None, None).unwrap();
        assert_eq!(
            freq.predecessor(date!(2024 - 03 - 31)),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            freq.predecessor(date!(2024 - 01 - 15)),
            Some(date!(2023 - 12 - 15))
        );
    }

    #[test]
    fn custom_predecessor_is_previous_scheduled_day() {
        // Mondays and Thursdays.
        let freq =
            Frequency::new(FrequencyType::Custom, Some(vec![1, 4]), None, None).unwrap();
        // 2024-03-11 is a Monday; the previous scheduled day is Thursday 03-07.
        assert_eq!(
            freq.predecessor(date!(2024 - 03 - 11)),
            Some(date!(2024 - 03 - 07))
        );
    }

    #[test]
    fn unmark_latest_uses_simplified_recount() {
        let mut h = habit(FrequencyType::Daily, Goal::default());
        let today = date!(2024 - 03 - 03);
        for day in [date!(2024 - 03 - 01), date!(2024 - 03 - 02), today] {
            h.record_completion(day, None, None, today).unwrap();
        }
        assert_eq!(h.streak_data.current_streak, 3);

        h.unmark(today, today).unwrap();
        assert_eq!(h.streak_data.current_streak, 1);
        assert_eq!(h.streak_data.last_completed_date, Some(date!(2024 - 03 - 02)));

        h.unmark(date!(2024 - 03 - 02), today).unwrap();
        h.unmark(date!(2024 - 03 - 01), today).unwrap();
        assert_eq!(h.streak_data.current_streak, 0);
        assert_eq!(h.streak_data.last_completed_date, None);

        assert!(matches!(
            h.unmark(today, today),
            Err(HabitError::LogNotFound)
        ));
    }

    #[test]
    fn pause_and_resume_restore_the_snapshot() {
        let mut h = habit(FrequencyType::Daily, Goal::default());
        h.streak_data.current_streak = 5;
        let now = datetime!(2024-03-10 08:00 UTC);

        h.pause(now, None, None).unwrap();
        assert_eq!(h.status, HabitStatus::OnHold);
        assert!(matches!(h.pause(now, None, None), Err(HabitError::AlreadyPaused)));

        h.streak_data.current_streak = 0;
        h.resume(true, now.date()).unwrap();
        assert_eq!(h.status, HabitStatus::Active);
        assert_eq!(h.streak_data.current_streak, 5);
        assert!(h.pause_data.is_none());
        assert!(matches!(h.resume(true, now.date()), Err(HabitError::NotPaused)));
    }

    #[test]
    fn completion_rate_counts_days_since_start() {
        let mut h = habit(
            FrequencyType::Daily,
            Goal::new(GoalType::CompletionRate, 80).unwrap(),
        );
        let today = date!(2024 - 03 - 04);
        h.record_completion(date!(2024 - 03 - 01), None, None, today).unwrap();
        h.record_completion(date!(2024 - 03 - 03), None, None, today).unwrap();
        assert_eq!(h.goal.current, 50);
    }

    #[test]
    fn default_schedules_follow_frequency() {
        let daily = Frequency::new(FrequencyType::Daily, None, None, None).unwrap();
        assert_eq!(daily.days_of_week, vec![0, 1, 2, 3, 4, 5, 6]);
        let weekly = Frequency::new(FrequencyType::Weekly, None, None, None).unwrap();
        assert_eq!(weekly.days_of_week, vec![1]);
        assert!(Frequency::new(FrequencyType::Custom, Some(vec![7]), None, None).is_err());
    }
}
