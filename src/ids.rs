//! Ticket identifier normalization and display.

use serde::{Deserialize, Deserializer};

/// Marker prepended to identifiers when they are shown to users.
pub const DISPLAY_MARKER: char = '#';

/// Strip surrounding whitespace and any leading display markers.
///
/// # Arguments
/// * `identifier` - Identifier in either representation (`#2024-001` or `2024-001`).
///
/// # Returns
/// Canonical identifier without the display marker.
pub fn normalize_ticket_id(identifier: &str) -> String {
    identifier
        .trim()
        .trim_start_matches(DISPLAY_MARKER)
        .trim()
        .to_string()
}

/// Produce the display form of a ticket identifier.
///
/// Accepts either representation and always yields exactly one marker.
pub fn format_ticket_id(identifier: &str) -> String {
    format!("{DISPLAY_MARKER}{}", normalize_ticket_id(identifier))
}

/// Serde adapter normalizing identifiers at the data-model boundary.
pub fn deserialize_ticket_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_ticket_id(&raw))
}
