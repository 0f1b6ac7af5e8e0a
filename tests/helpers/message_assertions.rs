//! Message assertion helpers.

use uht::{MessageKind, Session};

/// Texts of every message, ordered by file then line.
pub fn message_texts(session: &Session) -> Vec<String> {
    session.messages().into_iter().map(|m| m.text).collect()
}

pub fn headlines(session: &Session) -> Vec<String> {
    session.messages().iter().map(|m| m.headline()).collect()
}

pub fn errors(session: &Session) -> Vec<String> {
    session
        .messages()
        .into_iter()
        .filter(|m| m.kind == MessageKind::Error)
        .map(|m| m.text)
        .collect()
}

/// Assert a run reported no errors.
pub fn assert_no_errors(session: &Session) {
    let headlines = headlines(session);
    assert!(
        !session.has_errors(),
        "Expected no errors, got {}:\n{}",
        headlines.len(),
        headlines.join("\n")
    );
}

/// Assert some message contains `needle`.
pub fn assert_message_contains(session: &Session, needle: &str) {
    let texts = message_texts(session);
    assert!(
        texts.iter().any(|t| t.contains(needle)),
        "No message contains '{needle}':\n{}",
        texts.join("\n")
    );
}
