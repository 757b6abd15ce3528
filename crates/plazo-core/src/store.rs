use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

#[derive(Debug, Clone)]
pub struct TaskStore {
    pub path: PathBuf,
}

impl TaskStore {
    #[tracing::instrument(skip(path))]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        info!(file = %path.display(), "opened task store");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    // Missing or unreadable files degrade to an empty collection; a broken
    // task file must never take the application down with it.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(file = %self.path.display(), "task file missing; starting empty");
            return Vec::new();
        }

        match read_task_array(&self.path) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(file = %self.path.display(), error = %err, "failed loading task file; starting empty");
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        write_task_array(&self.path, tasks)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn export_to(&self, path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
        write_task_array(path, tasks)
            .with_context(|| format!("failed to export to {}", path.display()))
    }

    #[tracing::instrument(skip(self))]
    pub fn import_from(&self, path: &Path) -> anyhow::Result<Vec<Task>> {
        read_task_array(path)
            .with_context(|| format!("failed to import from {}", path.display()))
    }
}

fn read_task_array(path: &Path) -> anyhow::Result<Vec<Task>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;

    let entries: Vec<Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON task array", path.display()))?;

    let mut out = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Task>(entry) {
            Ok(task) => out.push(task),
            Err(err) => {
                // One bad record should not sink the rest of the file.
                warn!(
                    file = %path.display(),
                    entry = idx,
                    error = %err,
                    "skipping malformed task entry"
                );
            }
        }
    }

    debug!(file = %path.display(), count = out.len(), "loaded tasks");
    Ok(out)
}

fn write_task_array(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving tasks atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    let serialized = serde_json::to_string_pretty(tasks)?;
    temp.write_all(serialized.as_bytes())?;
    temp.write_all(b"\n")?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
