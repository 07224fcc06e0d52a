//! Character-budget accounting for the composed message
//!
//! Discord enforces [`COMPONENT_MAX_LENGTH`] over the combined text of a
//! Components V2 message, so the room left for the free-form changelog is
//! whatever the fixed parts (announcement, footer) and the header line leave
//! over. The header embeds the project name, version, and optional emoji
//! markup, which makes the changelog allowance a moving target: it must be
//! recomputed whenever project or version changes, never hard-coded.
//!
//! All functions are pure and total. Negative results are meaningful
//! ("over budget" / "zero allowed characters"), not errors.

use super::{project_header, ANNOUNCEMENT, COMPONENT_MAX_LENGTH, FOOTER_SECTIONS};

fn char_len(s: &str) -> i64 {
    s.chars().count() as i64
}

/// Length of the fixed announcement line.
pub fn announcement_length() -> i64 {
    char_len(ANNOUNCEMENT)
}

/// Length of the rendered header line for this project/version pair.
pub fn header_length(project: &str, version: &str) -> i64 {
    char_len(&project_header(project, version))
}

/// Combined length of the footer sections' text. Constant.
pub fn footer_length() -> i64 {
    FOOTER_SECTIONS.iter().map(|s| char_len(s.content)).sum()
}

/// Characters available to the changelog once every fixed and derived part is
/// accounted for. Negative for pathologically long project/version strings;
/// callers clamp to zero for display.
pub fn max_changelog_length(project: &str, version: &str) -> i64 {
    COMPONENT_MAX_LENGTH - announcement_length() - header_length(project, version) - footer_length()
}

/// Characters left before the ceiling is hit. Negative means over budget,
/// which is a displayable counter value, not a failure.
pub fn remaining_length(project: &str, version: &str, changelog: &str) -> i64 {
    max_changelog_length(project, version) - char_len(changelog)
}
