//! Daily tasks: free activities that pay a coin bonus once per calendar day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyTask {
    Walk,
    Clean,
    Training,
    Social,
}

impl DailyTask {
    pub const ALL: [DailyTask; 4] = [
        DailyTask::Walk,
        DailyTask::Clean,
        DailyTask::Training,
        DailyTask::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DailyTask::Walk => "walk",
            DailyTask::Clean => "clean",
            DailyTask::Training => "training",
            DailyTask::Social => "social",
        }
    }

    pub fn reward(&self) -> u64 {
        match self {
            DailyTask::Walk => 50,
            DailyTask::Clean => 30,
            DailyTask::Training => 40,
            DailyTask::Social => 35,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DailyTask::Walk => "Take a pet for a walk",
            DailyTask::Clean => "Clean up after a pet",
            DailyTask::Training => "Do some basic training",
            DailyTask::Social => "Let two pets play together",
        }
    }
}

impl fmt::Display for DailyTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyTask {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DailyTask::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| GameError::UnknownTask(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub completed: bool,
    pub reward: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTaskTracker {
    pub tasks: BTreeMap<DailyTask, TaskState>,
    pub last_refresh: DateTime<Utc>,
}

impl DailyTaskTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        let tasks = DailyTask::ALL
            .into_iter()
            .map(|task| {
                (
                    task,
                    TaskState {
                        completed: false,
                        reward: task.reward(),
                        description: task.description().to_string(),
                    },
                )
            })
            .collect();
        Self {
            tasks,
            last_refresh: now,
        }
    }

    /// Reset every task once a new calendar day (UTC) has started.
    /// Returns true when a reset happened.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let days = (now.date_naive() - self.last_refresh.date_naive()).num_days();
        if days < 1 {
            return false;
        }
        for state in self.tasks.values_mut() {
            state.completed = false;
        }
        self.last_refresh = now;
        log::debug!("Daily tasks reset after {} day(s)", days);
        true
    }

    /// Mark a task done and return its reward, or `None` if it was already
    /// completed today.
    pub fn complete(&mut self, task: DailyTask) -> Option<u64> {
        let state = self.tasks.get_mut(&task)?;
        if state.completed {
            return None;
        }
        state.completed = true;
        Some(state.reward)
    }

    /// Name-based entry point; unknown names are an error, repeats are `Ok(None)`
    pub fn complete_task(&mut self, name: &str) -> Result<Option<u64>, GameError> {
        let task: DailyTask = name.parse()?;
        Ok(self.complete(task))
    }

    pub fn is_completed(&self, task: DailyTask) -> bool {
        self.tasks.get(&task).is_some_and(|state| state.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_complete_pays_once_per_day() {
        let mut tracker = DailyTaskTracker::new(t0());
        assert_eq!(tracker.complete(DailyTask::Walk), Some(50));
        assert_eq!(tracker.complete(DailyTask::Walk), None);
        assert!(tracker.is_completed(DailyTask::Walk));
        assert!(!tracker.is_completed(DailyTask::Clean));
    }

    #[test]
    fn test_complete_task_by_name() {
        let mut tracker = DailyTaskTracker::new(t0());
        assert_eq!(tracker.complete_task("social"), Ok(Some(35)));
        assert_eq!(tracker.complete_task("social"), Ok(None));
        assert_eq!(
            tracker.complete_task("juggling"),
            Err(GameError::UnknownTask("juggling".into()))
        );
    }

    #[test]
    fn test_refresh_uses_calendar_days() {
        let mut tracker = DailyTaskTracker::new(t0());
        tracker.complete(DailyTask::Clean);

        // Same day, twelve hours later: 2024-03-01 23:59
        assert!(!tracker.refresh(t0() + Duration::minutes(719)));
        assert!(tracker.is_completed(DailyTask::Clean));

        // Past midnight, less than 24 hours after the last refresh
        let next_day = t0() + Duration::hours(13);
        assert!(tracker.refresh(next_day));
        assert!(!tracker.is_completed(DailyTask::Clean));
        assert_eq!(tracker.last_refresh, next_day);
        assert_eq!(tracker.complete(DailyTask::Clean), Some(30));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut tracker = DailyTaskTracker::new(t0());
        let later = t0() + Duration::days(2);
        assert!(tracker.refresh(later));
        tracker.complete(DailyTask::Training);
        assert!(!tracker.refresh(later));
        assert!(tracker.is_completed(DailyTask::Training));
    }

    #[test]
    fn test_rewards_table() {
        let tracker = DailyTaskTracker::new(t0());
        let total: u64 = tracker.tasks.values().map(|s| s.reward).sum();
        assert_eq!(total, 155);
    }
}
