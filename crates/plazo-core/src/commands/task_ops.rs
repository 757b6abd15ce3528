use anyhow::anyhow;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::commands::{find_task_index, parse_priority_arg, refresh_view};
use crate::datetime::{parse_deadline, validate_deadline};
use crate::render::Renderer;
use crate::store::TaskStore;
use crate::task::Task;

#[instrument(skip(store, renderer, description, now))]
pub fn cmd_add(
    store: &TaskStore,
    renderer: &mut Renderer,
    title: String,
    due: &str,
    priority: &str,
    description: String,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command add");

    // All validation happens before the collection is touched.
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(anyhow!("title cannot be empty"));
    }
    let priority = parse_priority_arg(priority)?;
    let deadline = parse_deadline(due, now)?;
    validate_deadline(deadline, now)?;

    let mut tasks = store.load();
    let task = Task::new(title, description.trim().to_string(), deadline, priority);
    let short = task.short_id();
    let focus = task.deadline.date();
    tasks.push(task);

    store.save(&tasks)?;

    println!("Created task {short}.");
    refresh_view(renderer, &tasks, focus, now)
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(store, renderer, title, description, now))]
pub fn cmd_modify(
    store: &TaskStore,
    renderer: &mut Renderer,
    id: &str,
    title: Option<String>,
    due: Option<&str>,
    priority: Option<&str>,
    description: Option<String>,
    completed: Option<bool>,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command modify");

    let mut tasks = store.load();
    let idx = find_task_index(&tasks, id)?;

    let new_title = match title {
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            if trimmed.is_empty() {
                return Err(anyhow!("title cannot be empty"));
            }
            Some(trimmed)
        }
        None => None,
    };
    let new_deadline = match due {
        Some(raw) => {
            let deadline = parse_deadline(raw, now)?;
            validate_deadline(deadline, now)?;
            Some(deadline)
        }
        None => None,
    };
    let new_priority = match priority {
        Some(raw) => Some(parse_priority_arg(raw)?),
        None => None,
    };

    let task = &mut tasks[idx];
    if let Some(value) = new_title {
        task.title = value;
    }
    if let Some(value) = new_deadline {
        task.deadline = value;
    }
    if let Some(value) = new_priority {
        task.priority = value;
    }
    if let Some(value) = description {
        task.description = value.trim().to_string();
    }
    if let Some(value) = completed {
        task.is_completed = value;
    }

    let short = task.short_id();
    let focus = task.deadline.date();

    store.save(&tasks)?;

    println!("Modified task {short}.");
    refresh_view(renderer, &tasks, focus, now)
}

#[instrument(skip(store, renderer, now))]
pub fn cmd_done(
    store: &TaskStore,
    renderer: &mut Renderer,
    id: &str,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command done");

    let mut tasks = store.load();
    let idx = find_task_index(&tasks, id)?;

    let task = &mut tasks[idx];
    task.is_completed = true;
    let short = task.short_id();
    let focus = task.deadline.date();

    store.save(&tasks)?;

    println!("Completed task {short}.");
    refresh_view(renderer, &tasks, focus, now)
}

#[instrument(skip(store, renderer, now))]
pub fn cmd_delete(
    store: &TaskStore,
    renderer: &mut Renderer,
    id: &str,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command delete");

    let mut tasks = store.load();
    let idx = find_task_index(&tasks, id)?;

    let removed = tasks.remove(idx);
    let focus = removed.deadline.date();

    store.save(&tasks)?;

    println!("Deleted task {}.", removed.short_id());
    refresh_view(renderer, &tasks, focus, now)
}
