//! Per-list statistics: daily pick/complete counts and completion progress.

use crate::model::{Task, TaskList, TaskStatus};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Events that happened on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub picked: usize,
    pub completed: usize,
}

/// Chart-ready activity for one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySeries {
    /// Only days with at least one event, ascending.
    pub points: Vec<DailyActivity>,
    /// List creation date through today.
    pub domain_start: NaiveDate,
    pub domain_end: NaiveDate,
}

/// Count picks and completions per day for the tasks of `list`.
///
/// A lone day gets a zero-count "yesterday" in front of it so a line chart
/// has two points to draw between.
pub fn daily_activity<'a>(
    list: &TaskList,
    tasks: impl IntoIterator<Item = &'a Task>,
    now: DateTime<Utc>,
) -> ActivitySeries {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for task in tasks.into_iter().filter(|t| t.belongs_to(&list.id)) {
        if let Some(picked_at) = task.picked_at {
            days.entry(picked_at.date_naive()).or_default().0 += 1;
        }
        if let Some(completed_at) = task.completed_at {
            days.entry(completed_at.date_naive()).or_default().1 += 1;
        }
    }

    let mut points: Vec<DailyActivity> = days
        .into_iter()
        .map(|(date, (picked, completed))| DailyActivity {
            date,
            picked,
            completed,
        })
        .collect();

    let today = now.date_naive();
    if let [only] = points.as_slice() {
        // Never on or after the real point, so dates stay strictly ascending.
        let yesterday = today.checked_sub_days(Days::new(1));
        let before_point = only.date.checked_sub_days(Days::new(1));
        if let Some(date) = yesterday.into_iter().chain(before_point).min() {
            points.insert(
                0,
                DailyActivity {
                    date,
                    picked: 0,
                    completed: 0,
                },
            );
        }
    }

    ActivitySeries {
        points,
        domain_start: list.created_at.date_naive(),
        domain_end: today,
    }
}

/// How far through a list the user is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub available: usize,
    pub picked: usize,
    pub completed: usize,
}

impl Progress {
    /// Completed share in percent; an empty list counts as 0%.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}

pub fn progress<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Progress {
    tasks.into_iter().fold(Progress::default(), |mut p, task| {
        p.total += 1;
        match task.status() {
            TaskStatus::Available => p.available += 1,
            TaskStatus::Picked => p.picked += 1,
            TaskStatus::Completed => p.completed += 1,
        }
        p
    })
}
