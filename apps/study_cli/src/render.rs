//! Plain-text rendering of session state for the terminal.

use std::fmt::Write as _;

use client_core::session::CHAT_FAILURE_MESSAGE;
use shared::domain::{ChatMessage, Citation, MessageRole};

pub fn message(message: &ChatMessage) -> String {
    format!(
        "[{}] {}:\n{}",
        message.sent_at.format("%H:%M:%S"),
        message.role.label(),
        message.text
    )
}

pub fn citations(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return "No citations yet.\n".to_string();
    }

    let mut out = String::from("Citations:\n");
    for (idx, citation) in citations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, citation.title());
        if !citation.snippet.is_empty() {
            let _ = writeln!(out, "     {}", citation.snippet);
        }
    }
    out
}

pub fn is_fallback_reply(messages: &[ChatMessage]) -> bool {
    messages
        .last()
        .is_some_and(|m| m.role == MessageRole::Assistant && m.text == CHAT_FAILURE_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::PageRef;

    #[test]
    fn empty_citation_list_has_placeholder() {
        assert_eq!(citations(&[]), "No citations yet.\n");
    }

    #[test]
    fn citations_are_numbered_with_snippets() {
        let rendered = citations(&[
            Citation {
                source: "cardio.pdf".to_string(),
                page: PageRef::Number(3),
                snippet: "Phase 0 depolarisation".to_string(),
            },
            Citation {
                source: "unknown".to_string(),
                page: PageRef::Label("?".to_string()),
                snippet: String::new(),
            },
        ]);
        assert_eq!(
            rendered,
            "Citations:\n  1. cardio.pdf — p.3\n     Phase 0 depolarisation\n  2. unknown — p.?\n"
        );
    }

    #[test]
    fn fallback_reply_is_detected() {
        let messages = vec![
            ChatMessage::user("hello"),
            ChatMessage::assistant(CHAT_FAILURE_MESSAGE),
        ];
        assert!(is_fallback_reply(&messages));
        assert!(!is_fallback_reply(&messages[..1]));
    }
}
