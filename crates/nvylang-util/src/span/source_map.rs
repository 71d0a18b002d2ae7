//! Source file storage backing the "source reader" collaborator (spec §1):
//! an ordered sequence of text lines, read eagerly here, with the
//! line/column lookups diagnostics need.

use std::sync::Arc;

use super::{FileId, Span};

/// One source file: its name, full content, and precomputed line starts.
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(id: usize, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self {
            id: FileId(id),
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Build a `SourceFile` from an already-split ordered sequence of
    /// lines, the shape the lexer's `Cursor` actually consumes.
    pub fn from_lines(id: usize, name: impl Into<String>, lines: &[String]) -> Self {
        Self::new(id, name, lines.join("\n"))
    }

    fn compute_line_starts(content: &str) -> Arc<[usize]> {
        let mut line_starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        line_starts.into()
    }

    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Ordered sequence of the file's lines, stripped of their `\n`.
    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    #[inline]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Byte offset to 1-based (line, column).
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => (line + 1, 1),
            Err(insert_point) => {
                let line = insert_point - 1;
                let line_start = self.line_starts.get(line).copied().unwrap_or(0);
                (line + 1, offset - line_start + 1)
            }
        }
    }

    /// A specific source line, 1-indexed, newline-trimmed.
    pub fn line_at(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line.checked_sub(1)?)?;
        let end = self.line_start(line).unwrap_or(self.content.len());
        Some(self.content[start..end].trim_end_matches(['\n', '\r']))
    }

    pub fn extract(&self, range: std::ops::Range<usize>) -> &str {
        &self.content[range]
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("line_count", &self.line_count())
            .finish()
    }
}

/// Owns every [`SourceFile`] for one compilation run, assigning [`FileId`]s
/// in addition order.
///
/// # Examples
///
/// ```
/// use nvylang_util::span::SourceMap;
///
/// let mut map = SourceMap::new();
/// let file_id = map.add_file("main.nvy", "func main() -> int32 { return 0; }");
/// assert_eq!(map.get(file_id).unwrap().name(), "main.nvy");
/// ```
#[derive(Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    #[inline]
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = self.files.len();
        let file = SourceFile::new(id, name, content);
        let file_id = file.id();
        self.files.push(Arc::new(file));
        file_id
    }

    #[inline]
    pub fn get(&self, id: FileId) -> Option<Arc<SourceFile>> {
        self.files.get(id.0).cloned()
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// `rustc`-style `--> file:line:col` plus the underlined source line.
    pub fn format_span(&self, span: Span) -> Option<String> {
        let file = self.get(span.file_id)?;
        let line = file.line_at(span.line as usize)?;
        let width = file.line_count().to_string().len().max(3);

        let mut out = format!("--> {}:{}:{}\n", file.name(), span.line, span.column);
        out.push_str(&format!("{:>width$} | {}\n", span.line, line, width = width));
        out.push_str(&format!("{:>width$} | ", "", width = width));

        let underline_start = (span.column as usize).saturating_sub(1);
        let underline_len = if span.is_empty() { 1 } else { span.len().max(1) };
        out.extend(std::iter::repeat(' ').take(underline_start));
        out.extend(std::iter::repeat('^').take(underline_len));
        Some(out)
    }
}
