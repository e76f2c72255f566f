//! Seam between the narrator and whatever supplies readable text

/// Supplies the text of the currently visible readable unit.
///
/// Implementations must be callable synchronously and side-effect-free;
/// an empty string means nothing is visible right now.
pub trait ContentSource: Send + Sync {
    fn current_text(&self) -> String;
}
