use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
}

pub type Week = [DayCell; 7];

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Monday-first week grid for one month. Leading cells carry the tail of the
/// previous month, trailing cells the head of the next; every week is full.
pub fn build_month_grid(year: i32, month: u32) -> Vec<Week> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let lead = u64::from(first.weekday().num_days_from_monday());
    let total = lead + u64::from(days_in_month(year, month));
    let week_count = total.div_ceil(7);

    let mut cursor = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
    let mut weeks = Vec::with_capacity(week_count as usize);

    for _ in 0..week_count {
        let mut cells = [DayCell {
            date: first,
            in_month: false,
        }; 7];

        for cell in &mut cells {
            *cell = DayCell {
                date: cursor,
                in_month: cursor.year() == year && cursor.month() == month,
            };
            cursor = cursor.succ_opt().unwrap_or(cursor);
        }

        weeks.push(cells);
    }

    weeks
}

#[derive(Debug)]
pub struct CalendarModel {
    year: i32,
    month: u32,
    today: NaiveDate,
    tasks: Vec<Task>,
    selected: Option<NaiveDate>,
    day_index: HashMap<NaiveDate, Vec<Task>>,
}

impl CalendarModel {
    pub fn new(today: NaiveDate, tasks: Vec<Task>) -> Self {
        let mut model = Self {
            year: today.year(),
            month: today.month(),
            today,
            tasks,
            selected: None,
            day_index: HashMap::new(),
        };
        model.reset_view();
        model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn grid(&self) -> Vec<Week> {
        build_month_grid(self.year, self.month)
    }

    // Today is only marked when it belongs to the displayed month; a
    // spillover cell for the same date stays unmarked.
    pub fn is_today(&self, cell: &DayCell) -> bool {
        cell.in_month && cell.date == self.today
    }

    pub fn tasks_on(&mut self, date: NaiveDate) -> &[Task] {
        let tasks = &self.tasks;
        self.day_index
            .entry(date)
            .or_insert_with(|| {
                tasks
                    .iter()
                    .filter(|task| !task.is_completed && task.deadline.date() == date)
                    .cloned()
                    .collect()
            })
            .as_slice()
    }

    pub fn select(&mut self, date: NaiveDate) -> NaiveDate {
        self.selected = Some(date);
        date
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.reset_view();
    }

    pub fn advance_month(&mut self, delta: i32) {
        let zero_based = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        self.year = zero_based.div_euclid(12) as i32;
        self.month = (zero_based.rem_euclid(12) + 1) as u32;
        debug!(year = self.year, month = self.month, "displayed month changed");
        self.reset_view();
    }

    fn month_contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    // Month change and collection replace both funnel into this one clear.
    fn reset_view(&mut self) {
        self.day_index.clear();
        self.selected = if self.month_contains(self.today) {
            Some(self.today)
        } else {
            None
        };
    }
}
