use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::datetime::format_deadline_long;
use crate::task::Task;

pub const DUE_WINDOW_DAYS: i64 = 3;

pub trait NotificationSink {
    fn notify(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// Fallback sink: deadlines land in the log instead of on the desktop.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, title: &str, body: &str) -> anyhow::Result<()> {
        info!(title, body, "deadline notification");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DeadlineScanner {
    seen: HashSet<(Uuid, NaiveDate)>,
}

impl DeadlineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending tasks due within the next three days, each (task, deadline
    /// date) pair reported once for the lifetime of the scanner.
    #[tracing::instrument(skip(self, tasks))]
    pub fn due(&mut self, tasks: &[Task], now: NaiveDateTime) -> Vec<Task> {
        let mut out = Vec::new();

        for task in tasks {
            if task.is_completed {
                continue;
            }

            let until = task.deadline - now;
            if until < Duration::zero() || until > Duration::days(DUE_WINDOW_DAYS) {
                continue;
            }

            if self.seen.insert((task.id, task.deadline.date())) {
                out.push(task.clone());
            }
        }

        debug!(due = out.len(), tracked = self.seen.len(), "deadline scan");
        out
    }
}

// Sink failures are swallowed here; a broken notifier must never stall the
// scan loop or the caller.
pub fn deliver(sink: &dyn NotificationSink, task: &Task, now: NaiveDateTime) {
    let mut body = format!("Due: {}", format_deadline_long(task.deadline));
    let days_left = (task.deadline - now).num_days();
    if days_left > 0 {
        body = format!("{days_left} days left. {body}");
    }

    let title = format!("Reminder: {}", task.title);
    if let Err(err) = sink.notify(&title, &body) {
        warn!(task = %task.id, error = %err, "notification sink failed");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::DeadlineScanner;
    use crate::task::{Priority, Task};

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn task_due(title: &str, deadline: NaiveDateTime) -> Task {
        Task::new(title.to_string(), String::new(), deadline, Priority::High)
    }

    #[test]
    fn reports_tasks_inside_the_three_day_window() {
        let now = at(2024, 3, 15, 9);
        let tasks = vec![
            task_due("right now", now),
            task_due("edge of window", now + Duration::days(3)),
            task_due("just outside", now + Duration::days(3) + Duration::seconds(1)),
            task_due("already past", now - Duration::seconds(1)),
        ];

        let mut scanner = DeadlineScanner::new();
        let due = scanner.due(&tasks, now);
        let titles: Vec<&str> = due.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["right now", "edge of window"]);
    }

    #[test]
    fn completed_tasks_never_trigger() {
        let now = at(2024, 3, 15, 9);
        let mut done = task_due("done", now + Duration::hours(1));
        done.is_completed = true;

        let mut scanner = DeadlineScanner::new();
        assert!(scanner.due(&[done], now).is_empty());
    }

    #[test]
    fn each_task_and_day_pair_is_reported_once() {
        let now = at(2024, 3, 15, 9);
        let tasks = vec![task_due("due soon", now + Duration::hours(4))];

        let mut scanner = DeadlineScanner::new();
        assert_eq!(scanner.due(&tasks, now).len(), 1);
        assert!(scanner.due(&tasks, now).is_empty());
        assert!(scanner.due(&tasks, now + Duration::hours(1)).is_empty());
    }

    #[test]
    fn moved_deadline_triggers_again() {
        let now = at(2024, 3, 15, 9);
        let mut task = task_due("slides", now + Duration::hours(4));

        let mut scanner = DeadlineScanner::new();
        assert_eq!(scanner.due(std::slice::from_ref(&task), now).len(), 1);

        task.deadline += Duration::days(1);
        assert_eq!(scanner.due(std::slice::from_ref(&task), now).len(), 1);
    }
}
