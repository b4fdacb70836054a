//! Operator-facing messages and yes/no prompts.
//!
//! The engine never prints directly; it talks to a [`Console`] passed in for
//! the duration of one run.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Progress,
    Info,
    Warning,
    Error,
    Prompt,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Progress => write!(f, "PROGRESS"),
            MessageKind::Info => write!(f, "INFO"),
            MessageKind::Warning => write!(f, "WARNING"),
            MessageKind::Error => write!(f, "ERROR"),
            MessageKind::Prompt => write!(f, "PROMPT"),
        }
    }
}

/// One message emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

/// Leveled output plus a blocking yes/no question.
pub trait Console: Send + Sync {
    fn emit(&self, kind: MessageKind, text: &str);

    /// Ask the operator a yes/no question. Blocks until answered.
    fn prompt_yes_no(&self, question: &str) -> io::Result<bool>;

    fn progress(&self, text: &str) {
        self.emit(MessageKind::Progress, text);
    }

    fn info(&self, text: &str) {
        self.emit(MessageKind::Info, text);
    }

    fn warn(&self, text: &str) {
        self.emit(MessageKind::Warning, text);
    }

    fn error(&self, text: &str) {
        self.emit(MessageKind::Error, text);
    }
}

/// Only `y` / `yes` (any case) count as consent.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ---------------------------------------------------------------------------
// LogConsole
// ---------------------------------------------------------------------------

/// Forwards messages to the `log` facade and reads answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn emit(&self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Progress | MessageKind::Info | MessageKind::Prompt => {
                tracing::info!("{text}")
            }
            MessageKind::Warning => tracing::warn!("{text}"),
            MessageKind::Error => tracing::error!("{text}"),
        }
    }

    fn prompt_yes_no(&self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} [y/n] ")?;
        stdout.flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

// ---------------------------------------------------------------------------
// RecordingConsole
// ---------------------------------------------------------------------------

/// Records every message and answers prompts from a scripted queue.
///
/// A prompt with no queued answer fails with `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    messages: Mutex<Vec<Message>>,
    answers: Mutex<VecDeque<bool>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a "yes" answer for the next unanswered prompt.
    pub fn respond_yes(self) -> Self {
        self.push_answer(true);
        self
    }

    /// Queue a "no" answer for the next unanswered prompt.
    pub fn respond_no(self) -> Self {
        self.push_answer(false);
        self
    }

    fn push_answer(&self, answer: bool) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Snapshot of all messages emitted so far, in order.
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of messages of `kind` whose text contains `needle`.
    pub fn times_in_log(&self, kind: MessageKind, needle: &str) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.kind == kind && m.text.contains(needle))
            .count()
    }

    /// Text of every message of `kind`, in order.
    pub fn texts(&self, kind: MessageKind) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.text.clone())
            .collect()
    }
}

impl Console for RecordingConsole {
    fn emit(&self, kind: MessageKind, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message {
                kind,
                text: text.to_owned(),
            });
    }

    fn prompt_yes_no(&self, question: &str) -> io::Result<bool> {
        self.emit(MessageKind::Prompt, question);
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("no scripted answer for prompt: {question}"),
                )
            })
    }
}
