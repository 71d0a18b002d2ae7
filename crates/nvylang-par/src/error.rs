//! Errors produced while turning a token graph into an AST (spec §7).

use nvylang_util::diagnostic::codes::DiagnosticCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing semicolon after statement on line {line}")]
    MissingSemicolon { line: u32 },

    #[error("unbalanced {kind} delimiter")]
    UnbalancedDelimiter { kind: &'static str },

    #[error("not enough operands for {op}")]
    InsufficientOperands { op: String },

    #[error("unknown statement starting with {token:?}")]
    UnknownStatement { token: String },
}

impl ParseError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseError::MissingSemicolon { .. } => DiagnosticCode::E_PARSE_MISSING_SEMICOLON,
            ParseError::UnbalancedDelimiter { .. } => DiagnosticCode::E_PARSE_UNBALANCED_DELIMITER,
            ParseError::InsufficientOperands { .. } => DiagnosticCode::E_PARSE_INSUFFICIENT_OPERANDS,
            ParseError::UnknownStatement { .. } => DiagnosticCode::E_PARSE_UNKNOWN_STATEMENT,
        }
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
