//! Errors produced while turning source lines into a token graph (spec §7).

use nvylang_util::diagnostic::codes::DiagnosticCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid number literal {text:?} on line {line}")]
    InvalidNumber { text: String, line: u32 },

    #[error("unterminated string literal starting on line {line}")]
    UnterminatedString { line: u32 },
}

impl LexError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            LexError::InvalidNumber { .. } => DiagnosticCode::E_LEX_INVALID_NUMBER,
            LexError::UnterminatedString { .. } => DiagnosticCode::E_LEX_UNTERMINATED_STRING,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            LexError::InvalidNumber { line, .. } | LexError::UnterminatedString { line } => *line,
        }
    }
}

pub type LexResult<T> = std::result::Result<T, LexError>;
