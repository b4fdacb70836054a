//! # ferry-workflow
//!
//! The migration engine. A [`Workflow`] reads changes from an [`Origin`],
//! runs them through a transformation pipeline in a checkout directory, and
//! records the result in a [`Destination`].
//!
//! ## Modes
//!
//! - **SQUASH** — everything since the last migrated revision becomes one write.
//! - **ITERATIVE** — one write per origin change, oldest first, with optional
//!   operator confirmation between writes.
//! - **CHANGE_REQUEST** — one change on top of a baseline, only when the
//!   pipeline can be reverted.
//!
//! ## Working directory
//!
//! ```text
//! <workdir>/
//! ├── checkout/     materialized + transformed files of the current unit
//! └── reverse/      CHANGE_REQUEST reversibility replay
//! ```

pub mod baseline;
pub mod checkout;
pub mod confirm;
pub mod destination;
pub mod error;
mod mode;
pub mod origin;
pub mod reversible;
pub mod walker;
pub mod workflow;

pub use confirm::{ConfirmState, ConfirmationController};
pub use destination::{Destination, WriteUnit, WriterResult};
pub use error::WorkflowError;
pub use mode::release_notes;
pub use origin::Origin;
pub use workflow::{BackendFactory, RunOptions, Workflow, WorkflowBuilder};
