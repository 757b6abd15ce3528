use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use crate::config::Config;
use crate::notify::{DeadlineScanner, LogSink, NotificationSink, deliver};
use crate::store::TaskStore;
use crate::task::Task;

pub type SharedTasks = Arc<Mutex<Vec<Task>>>;

// Foreground host for the two background services. The threads are
// detached; process exit is the only way they stop.
pub fn run_watch(store: &TaskStore, cfg: &Config) -> anyhow::Result<()> {
    let tasks: SharedTasks = Arc::new(Mutex::new(store.load()));

    spawn_deadline_scan(
        Arc::clone(&tasks),
        Arc::new(LogSink),
        Duration::from_secs(cfg.notify_interval_secs),
    );
    spawn_autosave(
        Arc::clone(&tasks),
        store.clone(),
        Duration::from_secs(cfg.autosave_interval_secs),
    );

    info!(
        notify_interval_secs = cfg.notify_interval_secs,
        autosave_interval_secs = cfg.autosave_interval_secs,
        file = %store.path.display(),
        "watch mode started"
    );
    println!("Watching {} (Ctrl-C to exit).", store.path.display());

    loop {
        thread::park();
    }
}

pub fn spawn_deadline_scan(
    tasks: SharedTasks,
    sink: Arc<dyn NotificationSink + Send + Sync>,
    interval: Duration,
) {
    thread::spawn(move || {
        let mut scanner = DeadlineScanner::new();
        loop {
            // Snapshot under a short-lived lock; the scan itself never
            // holds it.
            let snapshot = snapshot(&tasks);
            let now = Local::now().naive_local();
            for task in scanner.due(&snapshot, now) {
                deliver(sink.as_ref(), &task, now);
            }
            thread::sleep(interval);
        }
    });
}

pub fn spawn_autosave(tasks: SharedTasks, store: TaskStore, interval: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            let snapshot = snapshot(&tasks);
            if let Err(err) = store.save(&snapshot) {
                warn!(error = %err, "autosave failed; tasks stay in memory");
            }
        }
    });
}

fn snapshot(tasks: &SharedTasks) -> Vec<Task> {
    match tasks.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
