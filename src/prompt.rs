use crate::types::TodoError;
use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// `true` only when the user explicitly agreed.
    fn confirm(&mut self, question: &str) -> Result<bool, TodoError>;
}

/// Blocking yes/no question on the controlling terminal, defaulting to no.
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool, TodoError> {
        print!("{question} (y/N): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

pub fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
