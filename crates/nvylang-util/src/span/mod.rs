//! Source location tracking: byte offsets plus line/column, and a
//! per-compilation-unit [`FileId`].
//!
//! # Examples
//!
//! ```
//! use nvylang_util::span::{Span, FileId};
//!
//! let span = Span::new(10, 20, 1, 5);
//! let span = Span::with_file(10, 20, FileId(0), 1, 5);
//! ```

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies a source file within a [`SourceMap`]; assigned sequentially
/// as files are added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

impl FileId {
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    pub const DUMMY: FileId = FileId(0);
}

impl Default for FileId {
    #[inline]
    fn default() -> Self {
        Self::DUMMY
    }
}

/// A range in source code: byte offsets plus 1-based line/column for
/// human-readable diagnostics, and the file it belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file_id: FileId::DUMMY,
    };

    #[inline]
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
            file_id: FileId::DUMMY,
        }
    }

    #[inline]
    pub fn with_file(start: usize, end: usize, file_id: FileId, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
            file_id,
        }
    }

    #[inline]
    pub fn point(line: u32, column: u32) -> Self {
        Self {
            start: 0,
            end: 0,
            line,
            column,
            file_id: FileId::DUMMY,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both inputs; keeps `self`'s file id.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: self.column.min(other.column),
            file_id: self.file_id,
        }
    }

    #[inline]
    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = file_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_default_is_dummy() {
        assert_eq!(FileId::default(), FileId::DUMMY);
    }

    #[test]
    fn span_new_sets_all_fields() {
        let span = Span::new(10, 20, 1, 5);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 20);
        assert_eq!(span.line, 1);
        assert_eq!(span.column, 5);
    }

    #[test]
    fn span_contains_is_half_open() {
        let span = Span::new(10, 20, 1, 5);
        assert!(span.contains(10));
        assert!(!span.contains(20));
    }

    #[test]
    fn span_merge_takes_outer_bounds() {
        let merged = Span::new(10, 20, 1, 5).merge(Span::new(25, 35, 1, 10));
        assert_eq!(merged.start, 10);
        assert_eq!(merged.end, 35);
    }

    #[test]
    fn span_dummy_is_all_zero() {
        assert_eq!(Span::DUMMY.start, 0);
        assert_eq!(Span::DUMMY.end, 0);
        assert_eq!(Span::DUMMY, Span::default());
    }
}
