/// Token in a route note that marks the attempt as failed ("fejl").
pub const FAILED_MARKER: &str = "fejl";

/// A route counts as completed unless its note mentions [`FAILED_MARKER`]
/// (case-insensitive substring). No note means completed.
#[must_use]
pub fn is_completed(note: Option<&str>) -> bool {
    match note {
        Some(text) if !text.is_empty() => !text.to_lowercase().contains(FAILED_MARKER),
        _ => true,
    }
}
