//! Errors raised while resolving names and types during emission (spec §7).

use nvylang_util::diagnostic::codes::DiagnosticCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },

    #[error("`{name}` is already declared in this scope")]
    Redeclaration { name: String },
}

impl ResolveError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ResolveError::UndefinedVariable { .. } => DiagnosticCode::E_RESOLVE_UNDEFINED_VARIABLE,
            ResolveError::UndefinedFunction { .. } => DiagnosticCode::E_RESOLVE_UNDEFINED_FUNCTION,
            ResolveError::Redeclaration { .. } => DiagnosticCode::E_RESOLVE_REDECLARATION,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("cannot cast from {from:?} to {to:?}")]
    IncompatibleCast { from: String, to: String },

    #[error("non-numeric operand to arithmetic operator: {found:?}")]
    NonNumericOperand { found: String },

    #[error("field access on `{name}` is not resolved by this emitter")]
    UnsupportedMemberAccess { name: String },
}

impl TypeError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            TypeError::IncompatibleCast { .. } => DiagnosticCode::E_TYPE_INCOMPATIBLE_CAST,
            TypeError::NonNumericOperand { .. } => DiagnosticCode::E_TYPE_NON_NUMERIC_OPERAND,
            TypeError::UnsupportedMemberAccess { .. } => DiagnosticCode::E_TYPE_UNSUPPORTED_MEMBER_ACCESS,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmitError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Type(#[from] TypeError),
}

pub type EmitResult<T> = std::result::Result<T, EmitError>;
