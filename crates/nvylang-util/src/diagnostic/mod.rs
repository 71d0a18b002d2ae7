//! Diagnostic reporting infrastructure shared by every pipeline stage.
//!
//! # Examples
//!
//! ```
//! use nvylang_util::diagnostic::{DiagnosticBuilder, Handler, Span, DiagnosticCode};
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("invalid number literal")
//!     .code(DiagnosticCode::E_LEX_INVALID_NUMBER)
//!     .span(Span::DUMMY)
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;
pub mod codes;
mod level;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::Level;

pub use crate::Span;

use std::cell::RefCell;

/// A single diagnostic message: severity, text, location, and optional
/// code/notes/helps/snippets accumulated by [`DiagnosticBuilder`].
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }
}

/// Collects diagnostics emitted during one compilation unit.
///
/// Spec §7: "no partial IR is emitted on failure" and "no error recovery
/// within a unit" — `nvylangc` calls [`Handler::has_errors`] after every
/// pipeline stage and aborts before handing output to the next one.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::error(message).span(span)
    }

    pub fn build_warning(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::warning(message).span(span)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Abort the current unit if any error-level diagnostic was recorded.
    /// Called after every stage of the `nvylangc` pipeline (spec §7).
    pub fn abort_if_errors(&self) -> Result<(), usize> {
        if self.has_errors() {
            Err(self.error_count())
        } else {
            Ok(())
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_error_sets_error_level() {
        let diag = Diagnostic::error("error message", Span::DUMMY);
        assert_eq!(diag.level, Level::Error);
    }

    #[test]
    fn handler_starts_clean() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
        assert_eq!(handler.warning_count(), 0);
    }

    #[test]
    fn handler_build_error_sets_code() {
        let handler = Handler::new();
        handler
            .build_error(Span::DUMMY, "test error")
            .code(DiagnosticCode::E_LEX_INVALID_NUMBER)
            .emit(&handler);

        assert!(handler.has_errors());
        let diags = handler.diagnostics();
        assert_eq!(diags[0].code, Some(DiagnosticCode::E_LEX_INVALID_NUMBER));
    }

    #[test]
    fn handler_build_warning_does_not_count_as_error() {
        let handler = Handler::new();
        handler
            .build_warning(Span::DUMMY, "name collision")
            .code(DiagnosticCode::W_NAME_COLLISION)
            .emit(&handler);

        assert!(!handler.has_errors());
        assert_eq!(handler.warning_count(), 1);
    }

    #[test]
    fn abort_if_errors_is_ok_until_an_error_is_emitted() {
        let handler = Handler::new();
        assert!(handler.abort_if_errors().is_ok());
        handler.emit_diagnostic(Diagnostic::error("boom", Span::DUMMY));
        assert_eq!(handler.abort_if_errors(), Err(1));
    }
}
