use std::io::{self, IsTerminal, Write};

use chrono::{Datelike, NaiveDate};
use unicode_width::UnicodeWidthStr;

use crate::calendar::CalendarModel;
use crate::color::task_color;
use crate::config::Config;
use crate::datetime::{format_deadline, month_name};
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self { color: cfg.color }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_task_table(&mut self, tasks: &[Task]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "Id".to_string(),
            "Due".to_string(),
            "Priority".to_string(),
            "Title".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let color = task_color(task);
            rows.push(vec![
                self.paint(&task.short_id(), "33"),
                format_deadline(task.deadline),
                self.paint(task.priority.label(), color.ansi),
                self.paint(&task.title, color.ansi),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_day_list(&mut self, tasks: &[Task], date: NaiveDate) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "Tasks on {date}:")?;

        let day_tasks: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.deadline.date() == date)
            .collect();

        if day_tasks.is_empty() {
            writeln!(out, "  (none)")?;
            return Ok(());
        }

        for task in day_tasks {
            let color = task_color(task);
            let marker = if task.is_completed { "x" } else { " " };
            let line = format!(
                "[{marker}] {} {} ({})",
                task.deadline.format("%H:%M"),
                task.title,
                task.priority.label()
            );
            writeln!(out, "  {}", self.paint(&line, color.ansi))?;
        }

        Ok(())
    }

    // Spillover days are dimmed, today is shown in reverse video, and days
    // with pending work take the color of their most urgent task.
    #[tracing::instrument(skip(self, model))]
    pub fn print_month(&mut self, model: &mut CalendarModel) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let header = format!("{} {}", month_name(model.month()), model.year());
        writeln!(out, "{header:^27}")?;

        for name in ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"] {
            write!(out, "{name:>3} ")?;
        }
        writeln!(out)?;

        for week in model.grid() {
            for cell in week {
                let text = format!("{:>3}", cell.date.day());
                let painted = if !cell.in_month {
                    self.paint(&text, "90")
                } else if model.is_today(&cell) {
                    self.paint(&text, "7")
                } else {
                    let day_tasks = model.tasks_on(cell.date);
                    match day_tasks.iter().min_by_key(|task| task.priority) {
                        Some(task) => {
                            let ansi = task_color(task).ansi;
                            self.paint(&text, ansi)
                        }
                        None => text,
                    }
                };
                write!(out, "{painted} ")?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
