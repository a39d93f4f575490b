use std::process;

mod cli;
mod commands;
mod database;
mod display;
mod logging;
mod prompt;
mod types;
mod utils;

use commands::{Context, execute_command};
use database::ListStore;
use logging::{EventSink, FileLog, NullLog};
use prompt::TerminalPrompt;

fn main() {
    process::exit(run());
}

/// Runs one command and returns the exit code; the logger is flushed and
/// dropped before the process exits.
fn run() -> i32 {
    let command = cli::parse_command();

    let store = match ListStore::from_env() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to locate the todo directory: {}", e);
            return 1;
        }
    };

    let file_log;
    let events: &dyn EventSink = match FileLog::start(store.dir()) {
        Ok(log) => {
            file_log = log;
            &file_log
        }
        Err(e) => {
            eprintln!("warning: events will not be logged: {}", e);
            &NullLog
        }
    };

    let mut prompt = TerminalPrompt;
    let mut ctx = Context {
        store: &store,
        events,
        prompt: &mut prompt,
    };

    execute_command(&mut ctx, command).exit_code()
}
