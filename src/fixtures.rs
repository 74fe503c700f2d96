// Built-in demo seed

use crate::task::Task;
use chrono::{Duration, Utc};

/// Three demo tasks, ids "1" to "3", the second one completed
pub fn demo_tasks() -> Vec<Task> {
    let now = Utc::now();
    vec![
        Task::with_id("1", "Write unit tests", false, now - Duration::days(1)),
        Task::with_id("2", "Set up the project", true, now - Duration::days(2)),
        Task::with_id("3", "Add browser tests", false, now - Duration::days(3)),
    ]
}
