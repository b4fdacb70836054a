//! Interactive confirmation between destination writes.

use ferry_core::{Console, Reference};

use crate::destination::WriterResult;
use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Running,
    AwaitingConfirmation,
    Aborted,
    Done,
}

/// Tracks operator consent across the units of one run.
#[derive(Debug)]
pub struct ConfirmationController {
    state: ConfirmState,
    total: usize,
}

impl ConfirmationController {
    pub fn new(total: usize) -> Self {
        Self {
            state: ConfirmState::Running,
            total,
        }
    }

    pub fn state(&self) -> ConfirmState {
        self.state
    }

    /// React to the write of the unit at 1-based `position`.
    pub fn after_write(
        &mut self,
        position: usize,
        reference: &Reference,
        result: WriterResult,
        console: &dyn Console,
    ) -> Result<(), WorkflowError> {
        let total = self.total;
        let message = move || {
            format!("Iterative workflow aborted by user after: Change {position} of {total} ({reference})")
        };
        self.confirm(result, console, message)
    }

    /// React to the only write of a SQUASH or CHANGE_REQUEST run.
    pub fn single(
        &mut self,
        reference: &Reference,
        result: WriterResult,
        console: &dyn Console,
    ) -> Result<(), WorkflowError> {
        let message =
            || format!("Workflow aborted by user: changes for {reference} were not confirmed");
        self.confirm(result, console, message)?;
        self.finish();
        Ok(())
    }

    /// Every unit has been handled.
    pub fn finish(&mut self) {
        if self.state == ConfirmState::Running {
            self.state = ConfirmState::Done;
        }
    }

    fn confirm(
        &mut self,
        result: WriterResult,
        console: &dyn Console,
        rejected: impl FnOnce() -> String,
    ) -> Result<(), WorkflowError> {
        if result == WriterResult::Ok {
            return Ok(());
        }
        self.state = ConfirmState::AwaitingConfirmation;
        let accepted = match console.prompt_yes_no("Continue?") {
            Ok(answer) => answer,
            Err(e) => {
                console.warn(&format!("Could not read an answer, assuming no: {e}"));
                false
            }
        };
        if accepted {
            self.state = ConfirmState::Running;
            Ok(())
        } else {
            self.state = ConfirmState::Aborted;
            Err(WorkflowError::ChangeRejected { message: rejected() })
        }
    }
}
