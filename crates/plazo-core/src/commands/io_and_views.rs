use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::calendar::CalendarModel;
use crate::commands::month_delta;
use crate::datetime::{parse_day, parse_year_month};
use crate::notify::DeadlineScanner;
use crate::render::Renderer;
use crate::store::TaskStore;

#[instrument(skip(store, renderer, now))]
pub fn cmd_list(
    store: &TaskStore,
    renderer: &mut Renderer,
    date: Option<&str>,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command list");

    let tasks = store.load();
    match date {
        Some(raw) => {
            let date = parse_day(raw, now)?;
            renderer.print_day_list(&tasks, date)
        }
        None => renderer.print_task_table(&tasks),
    }
}

#[instrument(skip(store, renderer, now))]
pub fn cmd_cal(
    store: &TaskStore,
    renderer: &mut Renderer,
    month: Option<&str>,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command cal");

    let tasks = store.load();
    let mut model = CalendarModel::new(now.date(), tasks.clone());

    if let Some(raw) = month {
        let (year, target_month) = parse_year_month(raw)?;
        let target = chrono::NaiveDate::from_ymd_opt(year, target_month, 1)
            .ok_or_else(|| anyhow::anyhow!("invalid month: {raw}"))?;
        let delta = month_delta(model.year(), model.month(), target);
        if delta != 0 {
            model.advance_month(delta);
        }
    }

    renderer.print_month(&mut model)?;

    if let Some(selected) = model.selected() {
        renderer.print_day_list(&tasks, selected)?;
    }

    Ok(())
}

#[instrument(skip(store, renderer, now))]
pub fn cmd_due(
    store: &TaskStore,
    renderer: &mut Renderer,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    info!("command due");

    let tasks = store.load();
    let mut scanner = DeadlineScanner::new();
    let due = scanner.due(&tasks, now);

    if due.is_empty() {
        println!("No deadlines within the next 3 days.");
        return Ok(());
    }

    renderer.print_task_table(&due)
}

#[instrument(skip(store))]
pub fn cmd_export(store: &TaskStore, path: &Path) -> anyhow::Result<()> {
    info!("command export");

    let tasks = store.load();
    store.export_to(path, &tasks)?;

    println!("Exported {} tasks to {}.", tasks.len(), path.display());
    Ok(())
}

#[instrument(skip(store))]
pub fn cmd_import(store: &TaskStore, path: &Path) -> anyhow::Result<()> {
    info!("command import");

    // A failed import returns before anything is written; the current
    // collection stays as it was.
    let tasks = store
        .import_from(path)
        .context("import failed; keeping current tasks")?;
    store.save(&tasks)?;

    println!("Imported {} tasks from {}.", tasks.len(), path.display());
    Ok(())
}
