use crate::types::TodoError;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

const MAX_LIST_NAME_LENGTH: usize = 64;
const TODO_DIR_NAME: &str = ".todo";
const TODO_DIR_ENV: &str = "TODO_DIR";

pub fn validate_task_name(name: &str) -> Result<(), TodoError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation(
            "you should specify a name for the task".to_string(),
        ));
    }
    Ok(())
}

/// List names become file names inside the managed directory, so anything
/// that could escape it or hide the file is refused.
pub fn validate_list_name(name: &str) -> Result<(), TodoError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation(
            "you should select a list".to_string(),
        ));
    }
    if trimmed != name {
        return Err(TodoError::Validation(format!(
            "list name '{name}' has leading or trailing whitespace"
        )));
    }
    if name.chars().count() > MAX_LIST_NAME_LENGTH {
        return Err(TodoError::Validation(format!(
            "list name too long (max {MAX_LIST_NAME_LENGTH} characters)"
        )));
    }
    if name.starts_with('.') {
        return Err(TodoError::Validation(format!(
            "list name '{name}' cannot start with '.'"
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(TodoError::Validation(format!(
            "list name '{name}' cannot contain path separators"
        )));
    }

    Ok(())
}

/// `$TODO_DIR` when set, otherwise `~/.todo`. Does not create anything.
pub fn get_todo_dir() -> Result<PathBuf, TodoError> {
    resolve_todo_dir(env::var_os(TODO_DIR_ENV), env::var_os("HOME"))
}

fn resolve_todo_dir(
    todo_dir: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, TodoError> {
    if let Some(dir) = todo_dir.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let home = home.filter(|h| !h.is_empty()).ok_or_else(|| {
        TodoError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "HOME environment variable not found",
        ))
    })?;

    Ok(PathBuf::from(home).join(TODO_DIR_NAME))
}

pub fn join_words<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
