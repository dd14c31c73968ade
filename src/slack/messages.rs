//! Text of every message and topic the puzzle jobs post to Slack.

use crate::utils::text::truncate_display_name;

#[must_use]
pub fn answer_local_message(answer: &str) -> String {
    format!(":tada: Confirmed answer: {answer}")
}

#[must_use]
pub fn answer_global_message(name: &str, slug: &str, answer: &str) -> String {
    format!(":tada: Puzzle \"{name}\" (#{slug}) was solved! The answer is: {answer}")
}

#[must_use]
pub fn update_local_message(field: &str, value: &str) -> String {
    format!("{field} set to: {value}")
}

#[must_use]
pub fn update_global_message(name: &str, slug: &str, field: &str, value: &str) -> String {
    format!("\"{name}\" (#{slug}) now has these {field}: {value}")
}

/// Topic for a puzzle's channel. Long names are shortened so the links stay visible.
#[must_use]
pub fn channel_topic(name: &str, sheet_url: &str, hunt_url: &str) -> String {
    format!(
        "{} - Sheet: {sheet_url} - Puzzle: {hunt_url}",
        truncate_display_name(name)
    )
}

#[must_use]
pub fn new_puzzle_message(name: &str, slug: &str) -> String {
    format!("New puzzle created: \"{name}\" (#{slug})")
}

/// Title of the spreadsheet created for a puzzle, e.g. `3.14 Pear Shaped`.
#[must_use]
pub fn sheet_title(identifier: &str, name: &str) -> String {
    format!("{identifier} {name}")
}
