use clap::Parser;
use eyre::Result;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tasklist::{Config, Filter, Flow, Session, TaskListStore, fixtures, jsonl};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "TaskList - interactive in-memory task list session")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSONL file with seed tasks
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Seed with the built-in demo tasks
    #[arg(long)]
    demo: bool,

    /// Filter active when the session starts
    #[arg(short, long, value_enum)]
    filter: Option<Filter>,
}

fn main() -> Result<()> {
    // Logs go to stderr so the session output stays clean
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let seed_path = cli.seed.or(config.seed);
    let seed = match seed_path {
        Some(path) => jsonl::read_tasks(&path)?,
        None if cli.demo || config.demo => fixtures::demo_tasks(),
        None => Vec::new(),
    };

    let mut store = TaskListStore::with_tasks(seed);
    store.subscribe(|change, tasks| debug!(?change, total = tasks.len(), "Store changed"));

    let filter = cli.filter.unwrap_or(config.default_filter);
    let mut session = Session::new(store, filter);
    info!(tasks = session.store().counts().total, %filter, "Session started");

    run(&mut session)?;

    info!("Session ended");
    Ok(())
}

fn run(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();

    session.render(&mut stdout)?;

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };

        if session.handle_line(&line?, &mut stdout)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}
