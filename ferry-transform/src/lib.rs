//! # ferry-transform
//!
//! The transformation pipeline: a [`Transformation`] trait, structural
//! [`Sequence`] composition with flattened progress reporting, and the
//! built-in leaf steps ([`Replace`], [`Move`], [`FnTransform`]).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ferry_transform::{Move, Sequence, Transformation};
//!
//! let pipeline = Sequence::new(vec![
//!     Arc::new(Move::new("docs", "documentation").unwrap()) as Arc<dyn Transformation>,
//! ]);
//! assert!(pipeline.reverse().is_ok());
//! ```

pub mod build;
pub mod context;
pub mod error;
pub mod func;
pub mod moves;
pub mod replace;
pub mod sequence;
pub mod transformation;

pub use context::{Changes, MigrationContext};
pub use error::TransformError;
pub use func::FnTransform;
pub use moves::Move;
pub use replace::Replace;
pub use sequence::Sequence;
pub use transformation::{flatten, Transformation};
