// TaskList - In-memory task list store with filtered views and bulk operations

pub mod config;
pub mod filter;
pub mod fixtures;
pub mod jsonl;
pub mod session;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use filter::Filter;
pub use session::{Command, Flow, Session};
pub use store::{Change, Counts, SubscriptionId, TaskListStore};
pub use task::Task;
