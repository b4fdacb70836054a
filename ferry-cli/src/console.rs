//! Colored stderr console with stdin prompts.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use ferry_core::console::{is_yes, Console, MessageKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn emit(&self, kind: MessageKind, text: &str) {
        tracing::debug!("{kind}: {text}");
        match kind {
            MessageKind::Progress => eprintln!("{} {text}", "Task:".green().bold()),
            MessageKind::Info => eprintln!("{text}"),
            MessageKind::Warning => eprintln!("{} {text}", "WARN:".yellow().bold()),
            MessageKind::Error => eprintln!("{} {text}", "ERROR:".red().bold()),
            MessageKind::Prompt => eprintln!("{} {text}", "?".cyan().bold()),
        }
    }

    /// A closed stdin is an error, which callers treat as "no".
    fn prompt_yes_no(&self, question: &str) -> io::Result<bool> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{} {question} [y/n] ", "?".cyan().bold())?;
        stderr.flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(is_yes(&answer))
    }
}
