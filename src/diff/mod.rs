//! Rendering the change between two texts as a header-free unified diff.
//!
//! Engines are asked for enough context to cover the whole document, so
//! their output is a single hunk. [`render`] then drops the `---`, `+++` and
//! `@@` preamble, which only names temporary files and hunk offsets.

pub mod engine;

pub use crate::DiffError;

pub use engine::{BuiltinDiff, DiffEngine, MAX_CONTEXT, SystemDiff};

/// Render the difference between `before` and `after` with `engine`.
///
/// # Errors
///
/// Returns [`DiffError`] if the engine fails.
pub fn render(engine: &dyn DiffEngine, before: &str, after: &str) -> Result<String, DiffError> {
    let raw = engine.diff(before, after)?;
    Ok(strip_headers(&raw).to_string())
}

/// Render the difference between `before` and `after` with the system `diff`.
///
/// # Examples
///
/// ```no_run
/// # use diffprompt::diff::side_by_side_diff;
/// let diff = side_by_side_diff("a\nb\n", "a\nc\n").unwrap();
/// assert_eq!(diff, " a\n-b\n+c\n");
/// ```
///
/// # Errors
///
/// Returns [`DiffError`] if the temporary files cannot be written or the
/// `diff` program fails.
pub fn side_by_side_diff(before: &str, after: &str) -> Result<String, DiffError> {
    render(&SystemDiff::default(), before, after)
}

/// Remove the three unified diff header lines, if all are present.
///
/// Output lacking any of the `---`, `+++` or `@@` lines is returned as is.
#[must_use]
pub fn strip_headers(raw: &str) -> &str {
    let mut parts = raw.splitn(4, '\n');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(old), Some(new), Some(hunk))
            if old.starts_with("---") && new.starts_with("+++") && hunk.starts_with("@@") =>
        {
            parts.next().unwrap_or("")
        }
        _ => raw,
    }
}
