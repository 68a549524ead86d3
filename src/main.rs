mod app;
mod cli;
mod config;
mod constants;
mod domain;
mod logging;
mod storage;
mod store;

use clap::Parser;

use crate::{
    cli::{Cli, Command},
    config::AppConfig,
    constants::STORAGE_KEY,
    storage::{FileStore, KeyValueStore, MemoryStore},
    store::NoteStore,
};

fn run<S: KeyValueStore>(
    command: Option<Command>,
    mut store: NoteStore<S>,
) -> Result<NoteStore<S>, String> {
    match command {
        Some(command) => {
            cli::run_command(command, &mut store)?;
            Ok(store)
        }
        None => app::run_ui(store).map_err(|e| e.to_string()),
    }
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir.clone());
    let log_guard = logging::init(&config);

    let file_store = FileStore::new(&config.data_dir);

    let result = if cli.dry_run {
        let backend = match file_store.get(STORAGE_KEY) {
            Ok(Some(raw)) => MemoryStore::with_value(STORAGE_KEY, &raw),
            _ => MemoryStore::new(),
        };
        run(cli.command, NoteStore::initialize(backend)).map(|store| {
            eprintln!(
                "Dry run: {} write(s) discarded, {} left untouched",
                store.backend().writes,
                file_store.path_for(STORAGE_KEY).display()
            );
        })
    } else {
        run(cli.command, NoteStore::initialize(file_store)).map(|_| ())
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}
