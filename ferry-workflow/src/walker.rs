//! Change history walker: which origin changes does a run cover?

use ferry_core::{Change, Reference, RepositoryError};

use crate::destination::Destination;
use crate::origin::Origin;

/// Changes strictly after the previous migrated revision up to `target`,
/// oldest first.
///
/// The previous revision is the `last_rev` override when given, otherwise
/// whatever the destination recorded under the origin's label. With nothing
/// recorded the walk starts at the beginning of history, unless
/// `require_previous` is set.
pub fn walk(
    origin: &dyn Origin,
    destination: &dyn Destination,
    last_rev: Option<&str>,
    target: &Reference,
    require_previous: bool,
) -> Result<Vec<Change>, RepositoryError> {
    let previous = previous_ref(origin, destination, last_rev, require_previous)?;
    let changes = origin.changes(previous.as_ref(), target)?;
    tracing::debug!(
        "walked {} change(s) from {} to {target}",
        changes.len(),
        previous.as_ref().map_or("<start>", Reference::as_str),
    );
    Ok(changes)
}

/// Resolve the previous migrated revision without listing the range.
pub fn previous_ref(
    origin: &dyn Origin,
    destination: &dyn Destination,
    last_rev: Option<&str>,
    require_previous: bool,
) -> Result<Option<Reference>, RepositoryError> {
    if let Some(reference) = last_rev {
        return match origin.resolve(Some(reference)) {
            Ok(change) => Ok(Some(change.reference)),
            Err(e) => {
                tracing::debug!("--last-rev {reference} did not resolve: {e}");
                Err(RepositoryError::InvalidLastRev {
                    reference: reference.to_string(),
                })
            }
        };
    }
    let label = origin.label_name();
    match destination.previous_ref(&label)? {
        Some(reference) => Ok(Some(reference)),
        None if require_previous => Err(RepositoryError::LabelNotFound { label }),
        None => Ok(None),
    }
}
