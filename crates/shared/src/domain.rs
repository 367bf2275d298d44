use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseEnumError::new($kind, s)),
                }
            }
        }
    };
}

/// Study interaction type sent with every chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Explain,
    Quiz,
    Flashcards,
    Grade,
}

wire_enum!(Mode, "mode", {
    Explain => "explain",
    Quiz => "quiz",
    Flashcards => "flashcards",
    Grade => "grade",
});

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Explain => "Explain",
            Mode::Quiz => "Quiz",
            Mode::Flashcards => "Flashcards",
            Mode::Grade => "Grade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

wire_enum!(Difficulty, "difficulty", {
    Easy => "easy",
    Medium => "medium",
    Hard => "hard",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn label(self) -> &'static str {
        match self {
            MessageRole::User => "You",
            MessageRole::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Page reference as reported by the retrieval index. Pages without
/// metadata come back as a placeholder label such as `"?"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRef {
    Number(u32),
    Label(String),
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRef::Number(page) => write!(f, "{page}"),
            PageRef::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: PageRef,
    pub snippet: String,
}

impl Citation {
    /// `"<source> — p.<page>"`, the heading shown above each snippet.
    pub fn title(&self) -> String {
        format!("{} — p.{}", self.source, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Grade".parse::<Mode>().expect("mode"), Mode::Grade);
        assert_eq!(" flashcards ".parse::<Mode>().expect("mode"), Mode::Flashcards);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let err = "brutal".parse::<Difficulty>().expect_err("must fail");
        assert_eq!(err.to_string(), "unknown difficulty 'brutal'");
    }

    #[test]
    fn defaults_match_fresh_session() {
        assert_eq!(Mode::default(), Mode::Explain);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn citation_page_accepts_number_or_placeholder() {
        let numbered: Citation =
            serde_json::from_str(r#"{"source":"cardio.pdf","page":12,"snippet":"SA node"}"#)
                .expect("numbered");
        assert_eq!(numbered.page, PageRef::Number(12));
        assert_eq!(numbered.title(), "cardio.pdf — p.12");

        let unknown: Citation =
            serde_json::from_str(r#"{"source":"unknown","page":"?","snippet":""}"#)
                .expect("placeholder");
        assert_eq!(unknown.page, PageRef::Label("?".to_string()));
        assert_eq!(unknown.title(), "unknown — p.?");
    }
}
