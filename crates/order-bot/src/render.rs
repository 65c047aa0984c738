//! Plain text rendering of the catalog and the conversation.

use chrono::{DateTime, Local};
use order_bot_core::catalog::{Catalog, Product};
use order_bot_core::transcript::{Role, Transcript, Turn};

/// Formats one line of the conversation log, e.g.
/// `- 09:41 *User*: A laptop please`.
pub fn log_line(timestamp: DateTime<Local>, role: Role, text: &str) -> String {
    format!("- {} *{role}*: {text}", timestamp.format("%H:%M"))
}

/// Formats a stored turn as a log line.
#[inline]
pub fn turn_line(turn: &Turn) -> String {
    log_line(turn.timestamp(), turn.role(), turn.text())
}

/// Renders the visible scrollback, one line per turn.
pub fn transcript_log(transcript: &Transcript) -> Vec<String> {
    transcript.visible_turns().iter().map(turn_line).collect()
}

/// Returns the assistant greeting a transcript was seeded with.
pub fn greeting(transcript: &Transcript) -> Option<&str> {
    transcript
        .turns()
        .iter()
        .find(|turn| turn.role() == Role::Assistant)
        .map(Turn::text)
}

/// Formats a product as `Name: details`.
#[inline]
pub fn product_line(product: &Product) -> String {
    format!("{}: {}", product.name, product.details)
}

/// Renders the whole catalog, one product per line.
pub fn product_list(catalog: &Catalog) -> Vec<String> {
    catalog.products().iter().map(product_line).collect()
}
