use std::borrow::Cow;

/// Names at or above this many characters get shortened in channel topics.
pub const TOPIC_NAME_LIMIT: usize = 30;

/// Keep the first 29 characters of a long puzzle name and mark the cut with `…`.
///
/// Counts characters, not bytes, so names with emoji or accents are cut cleanly.
#[must_use]
pub fn truncate_display_name(name: &str) -> Cow<'_, str> {
    if name.chars().count() < TOPIC_NAME_LIMIT {
        return Cow::Borrowed(name);
    }
    let mut short: String = name.chars().take(TOPIC_NAME_LIMIT - 1).collect();
    short.push('\u{2026}');
    Cow::Owned(short)
}
