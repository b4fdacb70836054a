//! The read side of a migration.

use ferry_core::{Change, Reference, RepositoryError};

/// A repository that changes are read from.
///
/// Implementations must be side-effect free: reading the same range twice
/// yields the same changes.
pub trait Origin: Send + Sync {
    /// Resolve a reference to its change. `None` means the current head.
    fn resolve(&self, reference: Option<&str>) -> Result<Change, RepositoryError>;

    /// Changes strictly after `previous` up to and including `target`,
    /// oldest first. `None` starts at the beginning of history.
    fn changes(
        &self,
        previous: Option<&Reference>,
        target: &Reference,
    ) -> Result<Vec<Change>, RepositoryError>;

    /// Label written into destination history to record the migrated revision.
    fn label_name(&self) -> String;
}
