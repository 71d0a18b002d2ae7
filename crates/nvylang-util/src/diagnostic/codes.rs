//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! # Examples
//!
//! ```
//! use nvylang_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_LEX_INVALID_NUMBER;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E1001");
//! ```

/// A unique code identifying a diagnostic message, `{prefix}{number}` with
/// `number` zero-padded to four digits — `prefix` is `"E"` for the four
/// error kinds of spec §7, `"W"` for warnings (currently only the mangler's
/// name-collision warning).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub prefix: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // LexError (spec §7)
    pub const E_LEX_INVALID_NUMBER: Self = Self::new("E", 1001);
    pub const E_LEX_UNTERMINATED_STRING: Self = Self::new("E", 1002);

    // ParseError
    pub const E_PARSE_MISSING_SEMICOLON: Self = Self::new("E", 2001);
    pub const E_PARSE_UNBALANCED_DELIMITER: Self = Self::new("E", 2002);
    pub const E_PARSE_INSUFFICIENT_OPERANDS: Self = Self::new("E", 2003);
    pub const E_PARSE_UNKNOWN_STATEMENT: Self = Self::new("E", 2004);

    // ResolveError
    pub const E_RESOLVE_UNDEFINED_VARIABLE: Self = Self::new("E", 3001);
    pub const E_RESOLVE_UNDEFINED_FUNCTION: Self = Self::new("E", 3002);
    pub const E_RESOLVE_REDECLARATION: Self = Self::new("E", 3003);

    // TypeError
    pub const E_TYPE_INCOMPATIBLE_CAST: Self = Self::new("E", 4001);
    pub const E_TYPE_NON_NUMERIC_OPERAND: Self = Self::new("E", 4002);
    pub const E_TYPE_UNSUPPORTED_MEMBER_ACCESS: Self = Self::new("E", 4003);

    // Warnings
    pub const W_NAME_COLLISION: Self = Self::new("W", 1);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
