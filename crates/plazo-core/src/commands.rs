pub mod io_and_views;
pub mod task_ops;

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

use crate::calendar::CalendarModel;
use crate::cli::Command;
use crate::config::Config;
use crate::render::Renderer;
use crate::store::TaskStore;
use crate::task::{Priority, Task};

#[instrument(skip(store, cfg, renderer, command))]
pub fn dispatch(
    store: &TaskStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    debug!(command = command_name(&command), "dispatching command");

    match command {
        Command::Add {
            title,
            due,
            priority,
            description,
        } => task_ops::cmd_add(store, renderer, title, &due, &priority, description, now),
        Command::Modify {
            id,
            title,
            due,
            priority,
            description,
            completed,
        } => task_ops::cmd_modify(
            store,
            renderer,
            &id,
            title,
            due.as_deref(),
            priority.as_deref(),
            description,
            completed,
            now,
        ),
        Command::Done { id } => task_ops::cmd_done(store, renderer, &id, now),
        Command::Delete { id } => task_ops::cmd_delete(store, renderer, &id, now),
        Command::List { date } => io_and_views::cmd_list(store, renderer, date.as_deref(), now),
        Command::Cal { month } => io_and_views::cmd_cal(store, renderer, month.as_deref(), now),
        Command::Due => io_and_views::cmd_due(store, renderer, now),
        Command::Export { path } => io_and_views::cmd_export(store, &path),
        Command::Import { path } => io_and_views::cmd_import(store, &path),
        Command::Watch => crate::shell::run_watch(store, cfg),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::Modify { .. } => "modify",
        Command::Done { .. } => "done",
        Command::Delete { .. } => "delete",
        Command::List { .. } => "list",
        Command::Cal { .. } => "cal",
        Command::Due => "due",
        Command::Export { .. } => "export",
        Command::Import { .. } => "import",
        Command::Watch => "watch",
    }
}

pub(crate) fn parse_priority_arg(raw: &str) -> anyhow::Result<Priority> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "high" | "h" => Ok(Priority::High),
        "medium" | "m" => Ok(Priority::Medium),
        "low" | "l" => Ok(Priority::Low),
        other => Err(anyhow!(
            "unknown priority: {other} (expected high, medium or low)"
        )),
    }
}

pub(crate) fn find_task_index(tasks: &[Task], id: &str) -> anyhow::Result<usize> {
    let needle = id.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(anyhow!("task id cannot be empty"));
    }

    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.id.to_string().starts_with(&needle))
        .map(|(idx, _)| idx)
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("no task matches id: {id}")),
        [idx] => Ok(*idx),
        _ => Err(anyhow!("task id is ambiguous: {id}")),
    }
}

// Tail of the shell's event sequence: the collection was already mutated and
// persisted; rebuild the calendar over it and show the affected day.
pub(crate) fn refresh_view(
    renderer: &mut Renderer,
    tasks: &[Task],
    focus: NaiveDate,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    let mut model = CalendarModel::new(now.date(), tasks.to_vec());

    let delta = month_delta(model.year(), model.month(), focus);
    if delta != 0 {
        model.advance_month(delta);
    }
    model.select(focus);

    renderer.print_month(&mut model)?;
    renderer.print_day_list(tasks, focus)
}

fn month_delta(year: i32, month: u32, target: NaiveDate) -> i32 {
    (target.year() - year) * 12 + target.month() as i32 - month as i32
}
