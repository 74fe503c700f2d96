// JSONL seed file loading

use crate::task::Task;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Read seed tasks from a JSONL file, one task per line, in file order
///
/// Blank lines are ignored. Lines that fail to read or parse are skipped with
/// a warning. Duplicate ids are left for the store to resolve.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let file = File::open(path).with_context(|| format!("Failed to open seed file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut tasks = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let task: Task = match serde_json::from_str(&line) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse task, skipping"
                );
                continue;
            }
        };

        tasks.push(task);
    }

    info!(file = ?path, count = tasks.len(), "Loaded seed tasks from JSONL");

    Ok(tasks)
}
