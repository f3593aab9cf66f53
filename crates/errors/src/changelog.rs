//! Changelog parsing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ChangelogError {
    #[error("changelog contains no entries")]
    Empty,

    #[error("malformed changelog header at line {line}: {content}")]
    MalformedHeader { line: usize, content: String },

    #[error("changelog entry starting at line {line} has no trailer line")]
    MissingTrailer { line: usize },

    #[error("malformed changelog trailer at line {line}: {content}")]
    MalformedTrailer { line: usize, content: String },
}

impl UserFacingError for ChangelogError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Check debian/changelog in the packaging template.")
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Empty => "changelog.empty",
            Self::MalformedHeader { .. } => "changelog.malformed_header",
            Self::MissingTrailer { .. } => "changelog.missing_trailer",
            Self::MalformedTrailer { .. } => "changelog.malformed_trailer",
        };
        Some(code)
    }
}
