#![forbid(unsafe_code)]

//! Hacker Stories binary entry point.

use std::fs::File;
use std::sync::Mutex;

use hs_runtime::{FileStorage, Program, ProgramConfig, ValueStore};
use hs_stories::cli::{self, Command, Opts};
use hs_stories::seed::{self, APP_NAME};
use hs_stories::{AppConfig, ItemCollection, StoriesApp};
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = match Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("{}", cli::version_line());
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(2);
        }
    };

    init_logging(&opts);

    if let Err(e) = run(&opts) {
        eprintln!("hacker-stories: {e}");
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> hs_stories::Result<()> {
    let store = if opts.memory {
        ValueStore::in_memory()
    } else {
        let storage = match &opts.state_file {
            Some(path) => FileStorage::new(path),
            None => FileStorage::default_for_app(APP_NAME),
        };
        ValueStore::new(Box::new(storage))
    }
    .shared();
    tracing::info!(backend = store.backend_name(), "state store ready");

    let items = ItemCollection::new(seed::initial_stories())?;
    let model = StoriesApp::new(
        store.clone(),
        items,
        AppConfig {
            default_search: opts.default_search.clone(),
            focus_search: opts.focus_search,
        },
    );

    let config = ProgramConfig {
        mouse: opts.mouse,
        ..ProgramConfig::default()
    };
    let mut program = Program::with_config(model, config)?;
    program.run()?;

    let stats = store.stats();
    tracing::info!(
        reads = stats.reads,
        writes = stats.writes,
        failures = stats.failures,
        "session finished"
    );
    Ok(())
}

/// Logs go to a file only; the terminal belongs to the UI.
fn init_logging(opts: &Opts) {
    let Some(path) = &opts.log_file else {
        return;
    };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_new(&opts.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
    {
        eprintln!("cannot install logger for {}: {e}", path.display());
    }
}
