// Line-oriented session over a single store

use crate::filter::Filter;
use crate::store::{Counts, TaskListStore};
use crate::task::Task;
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::io::Write;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "tasklist", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// A single session command
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task to the top of the list
    #[command(disable_help_flag = true)]
    Add {
        /// Everything after `add`, spacing kept
        #[arg(default_value = "", allow_hyphen_values = true)]
        title: String,
    },

    /// Remove a task by id
    #[command(alias = "rm")]
    Remove { id: String },

    /// Toggle a task between active and completed
    Toggle { id: String },

    /// Mark every task completed
    CompleteAll,

    /// Mark every task active
    UncompleteAll,

    /// Complete every task, or reopen them all when all are completed
    ToggleAll,

    /// Remove all completed tasks
    ClearCompleted,

    /// Switch the active filter
    Filter { filter: Filter },

    /// Show the current view
    #[command(alias = "ls")]
    List {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task counts
    Counts {
        /// Print counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line into a command
///
/// Returns `Ok(None)` for blank lines. The title of `add` is taken verbatim
/// from the rest of the line rather than from split words.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, clap::Error> {
    let line = line.trim_start();
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if keyword == "add" {
        return Ok(Some(Command::Add {
            title: rest.to_string(),
        }));
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    Line::try_parse_from(words).map(|l| Some(l.command))
}

/// Owns the store and the active filter, and renders after each change
pub struct Session {
    store: TaskListStore,
    filter: Filter,
}

impl Session {
    pub fn new(store: TaskListStore, filter: Filter) -> Self {
        Self { store, filter }
    }

    pub fn store(&self) -> &TaskListStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Parse and run one input line, writing all output to `out`
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(command, out),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                write!(out, "{}", e.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run a command against the store
    ///
    /// Commands that change the store or the filter, and plain `list`, are
    /// followed by the rendered view. `list --json` and `counts` print only
    /// their own output.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        debug!(?command, "Executing session command");

        match command {
            Command::Add { title } => {
                if self.store.add(&title).is_none() {
                    writeln!(out, "Nothing added: title is blank")?;
                }
            }
            Command::Remove { id } => {
                if !self.store.remove(&id) {
                    writeln!(out, "No task with id {}", id)?;
                }
            }
            Command::Toggle { id } => {
                if self.store.toggle(&id).is_none() {
                    writeln!(out, "No task with id {}", id)?;
                }
            }
            Command::CompleteAll => {
                self.store.set_all(true);
            }
            Command::UncompleteAll => {
                self.store.set_all(false);
            }
            Command::ToggleAll => {
                let completed = !self.store.all_completed();
                self.store.set_all(completed);
            }
            Command::ClearCompleted => {
                if self.store.clear_completed() == 0 {
                    writeln!(out, "No completed tasks to clear")?;
                }
            }
            Command::Filter { filter } => {
                self.filter = filter;
            }
            Command::List { json: true } => {
                let view = self.store.filtered_view(self.filter);
                writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
                return Ok(Flow::Continue);
            }
            Command::List { json: false } => {}
            Command::Counts { json } => {
                let counts = self.store.counts();
                if json {
                    writeln!(out, "{}", serde_json::to_string(&counts)?)?;
                } else {
                    writeln!(out, "{}", counts_line(counts, self.filter))?;
                }
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        self.render(out)?;
        Ok(Flow::Continue)
    }

    /// Print the current view and the counts line
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut shown = 0;
        for task in self.store.view(self.filter) {
            writeln!(out, "{}", task_line(task))?;
            shown += 1;
        }
        if shown == 0 {
            writeln!(out, "{}", self.filter.empty_message().italic())?;
        }
        writeln!(out, "{}", counts_line(self.store.counts(), self.filter))?;
        Ok(())
    }
}

fn task_line(task: &Task) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let title = if task.completed {
        task.title.dimmed().strikethrough().to_string()
    } else {
        task.title.clone()
    };
    format!(
        "{} {}  {}",
        checkbox,
        title,
        format!("({}, {})", task.id, task.created_at.format("%Y-%m-%d")).dimmed()
    )
}

fn counts_line(counts: Counts, filter: Filter) -> String {
    format!(
        "{} total, {} completed, {} active [{}]",
        counts.total,
        counts.completed,
        counts.active(),
        filter
    )
}
