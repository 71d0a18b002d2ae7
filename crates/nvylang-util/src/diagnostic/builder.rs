//! Fluent diagnostic construction.

use super::{Diagnostic, DiagnosticCode, Level, Span};

/// A source line excerpt shown under a diagnostic, with an optional
/// caret-underlined range and label.
#[derive(Clone, Debug)]
pub struct SourceSnippet {
    pub line: String,
    pub line_number: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub label: Option<String>,
}

impl SourceSnippet {
    pub fn new(
        line: impl Into<String>,
        line_number: usize,
        start_column: usize,
        end_column: usize,
        label: Option<impl Into<String>>,
    ) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column,
            end_column,
            label: label.map(Into::into),
        }
    }

    pub fn point(line: impl Into<String>, line_number: usize, column: usize) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column: column,
            end_column: column,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Render the snippet as a source line followed by a caret line,
    /// `rustc`-style.
    pub fn format(&self) -> String {
        let width = self.line_number.to_string().len().max(3);
        let mut out = format!("{:>width$} | {}\n", self.line_number, self.line, width = width);
        out.push_str(&format!("{:>width$} | ", "", width = width));

        let underline_start = self.start_column.saturating_sub(1);
        let underline_len = (self.end_column - self.start_column).max(1);
        out.extend(std::iter::repeat(' ').take(underline_start));
        out.extend(std::iter::repeat('^').take(underline_len));

        if let Some(ref label) = self.label {
            out.push_str(&format!(" {label}"));
        }
        out
    }
}

/// Fluent builder for a [`Diagnostic`].
///
/// # Examples
///
/// ```
/// use nvylang_util::diagnostic::{DiagnosticBuilder, Span, DiagnosticCode};
///
/// let diag = DiagnosticBuilder::error("invalid number literal")
///     .code(DiagnosticCode::E_LEX_INVALID_NUMBER)
///     .span(Span::DUMMY)
///     .help("numeric literals use only digits, `.`, `e`/`E`, and `F`/`D`/`L` suffixes")
///     .build();
/// ```
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    notes: Vec<String>,
    helps: Vec<String>,
    snippets: Vec<SourceSnippet>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            notes: self.notes,
            helps: self.helps,
            snippets: self.snippets,
        }
    }

    /// Build and immediately hand the diagnostic to `handler`.
    pub fn emit(self, handler: &super::Handler) {
        handler.emit_diagnostic(self.build());
    }
}
