//! Baseline resolution for CHANGE_REQUEST runs.

use ferry_core::Change;

/// Find the destination revision a change request should be based on.
///
/// `history` starts with the change itself and walks back through its
/// ancestors. The override wins outright. Otherwise the first message holding
/// a `<label>=<value>` line decides, and within that message the last such
/// line wins. No label anywhere is a valid outcome.
pub fn resolve(history: &[Change], explicit: Option<&str>, label: &str) -> Option<String> {
    if let Some(explicit) = explicit {
        return Some(explicit.to_string());
    }
    history
        .iter()
        .find_map(|change| label_value(&change.message, label))
}

/// Value of the last `<label>=<value>` line in `message`.
pub fn label_value(message: &str, label: &str) -> Option<String> {
    message
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            (key.trim() == label).then(|| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
        .last()
}
