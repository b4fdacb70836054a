//! Resolve [`TransformConfig`] entries into a runnable pipeline.

use std::sync::Arc;

use ferry_core::config::TransformConfig;
use ferry_core::{Glob, ValidationError};

use crate::moves::Move;
use crate::replace::Replace;
use crate::sequence::Sequence;
use crate::transformation::Transformation;

/// Build the top-level pipeline for a workflow.
pub fn pipeline(configs: &[TransformConfig]) -> Result<Sequence, ValidationError> {
    Ok(Sequence::new(steps(configs)?))
}

fn steps(configs: &[TransformConfig]) -> Result<Vec<Arc<dyn Transformation>>, ValidationError> {
    configs.iter().map(step).collect()
}

pub fn step(config: &TransformConfig) -> Result<Arc<dyn Transformation>, ValidationError> {
    Ok(match config {
        TransformConfig::Replace {
            before,
            after,
            regex_groups,
            multiline,
            paths,
        } => {
            let paths = match paths {
                Some(paths) => paths.compile()?,
                None => Glob::all(),
            };
            Arc::new(Replace::new(
                before.clone(),
                after.clone(),
                regex_groups.clone(),
                *multiline,
                paths,
            )?)
        }
        TransformConfig::Move { before, after } => Arc::new(Move::new(before, after)?),
        TransformConfig::Sequence { steps: inner, reversal } => match reversal {
            Some(reversal) => Arc::new(Sequence::with_reversal(steps(inner)?, steps(reversal)?)),
            None => Arc::new(Sequence::new(steps(inner)?)),
        },
    })
}
