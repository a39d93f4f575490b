use colored::*;
use std::{fmt, io};

#[derive(Debug)]
pub enum TodoError {
    AlreadyExists(String),
    Database(rusqlite::Error),
    Declined(String),
    Io(io::Error),
    Logging(flexi_logger::FlexiLoggerError),
    NotFound(String),
    Validation(String),
}

impl TodoError {
    /// Missing lists, bad input and refused overwrites are normal user
    /// situations; everything else means the disk or database misbehaved.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TodoError::AlreadyExists(_)
                | TodoError::Declined(_)
                | TodoError::NotFound(_)
                | TodoError::Validation(_)
        )
    }

    /// The message without the colored label, as written to the log file.
    pub fn detail(&self) -> String {
        match self {
            TodoError::AlreadyExists(m)
            | TodoError::Declined(m)
            | TodoError::NotFound(m)
            | TodoError::Validation(m) => m.clone(),
            TodoError::Database(e) => e.to_string(),
            TodoError::Io(e) => e.to_string(),
            TodoError::Logging(e) => e.to_string(),
        }
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(err: rusqlite::Error) -> Self {
        TodoError::Database(err)
    }
}

impl From<io::Error> for TodoError {
    fn from(err: io::Error) -> Self {
        TodoError::Io(err)
    }
}

impl From<flexi_logger::FlexiLoggerError> for TodoError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        TodoError::Logging(err)
    }
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TodoError::Database(_) => "Database error:".bright_red(),
            TodoError::Io(_) => "IO error:".bright_red(),
            TodoError::Logging(_) => "Logging error:".bright_red(),
            TodoError::AlreadyExists(_) => "Already exists:".bright_yellow(),
            TodoError::NotFound(_) => "Not found:".bright_yellow(),
            TodoError::Validation(_) => "Invalid input:".bright_yellow(),
            TodoError::Declined(_) => "Cancelled:".bright_yellow(),
        };
        write!(f, "{} {}", label, self.detail())
    }
}

impl std::error::Error for TodoError {}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, PartialEq)]
pub enum TodoCommand {
    Add {
        name: String,
        list: String,
        description: Option<String>,
    },
    Completions {
        shell: String,
    },
    Create {
        name: String,
        force: bool,
    },
    Delete {
        name: String,
        force: bool,
    },
    Help,
    ListAll,
    Rename {
        old_name: String,
        new_name: String,
    },
    Show {
        list: String,
    },
}

/// Terminal state of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added,
    Aborted,
    Completions,
    Created,
    Declined,
    Deleted,
    HelpShown,
    Listed,
    Rejected,
    Renamed,
    Shown,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Aborted => 1,
            _ => 0,
        }
    }
}
