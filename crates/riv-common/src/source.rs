//! Source file registry with global position space.
//!
//! Each file added to a [`SourceMap`] is assigned a base offset:
//!
//! - file 0: positions `[0, len0)`
//! - file 1: positions `[len0 + 1, len0 + 1 + len1)`
//! - ...
//!
//! so any [`BytePos`] or [`Span`] identifies both the file and the location
//! within it, and nothing needs to carry a file id next to a span.
//!
//! The front-end works on in-memory buffers; reading files from disk is the
//! caller's business.

use std::fmt;
use std::sync::Arc;

use crate::span::{BytePos, Span};

/// The UTF-8 byte-order mark some editors prepend to files.
const BOM: &str = "\u{feff}";

/// A unique identifier for a source file within a [`SourceMap`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// A 1-indexed line and column. Columns count bytes, not grapheme clusters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source file: name, text, base offset, and a line-start table.
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: Arc<str>,
    source: Arc<str>,
    /// Base offset in global position space.
    base: u32,
    /// Byte offsets (relative to the file start) where each line begins.
    /// If the file opens with a BOM the first entry sits after it, so the
    /// marker counts toward neither line nor column.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(
        id: FileId,
        name: impl Into<Arc<str>>,
        source: impl Into<Arc<str>>,
        base: u32,
    ) -> Self {
        let source = source.into();
        let line_starts = Self::compute_line_starts(&source);
        Self {
            id,
            name: name.into(),
            source,
            base,
            line_starts,
        }
    }

    fn compute_line_starts(source: &str) -> Vec<u32> {
        let first = if source.starts_with(BOM) {
            BOM.len() as u32
        } else {
            0
        };
        let mut starts = vec![first];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push((i + 1) as u32);
            }
        }
        starts
    }

    #[inline]
    pub const fn id(&self) -> FileId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// One past the last global position of this file.
    #[inline]
    pub fn end_pos(&self) -> u32 {
        self.base + self.source.len() as u32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Content of the 0-indexed line, without its trailing newline.
    pub fn line_content(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)? as usize;
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next as usize - 1,
            None => self.source.len(),
        };
        Some(&self.source[start..end])
    }

    #[inline]
    pub fn contains_pos(&self, pos: BytePos) -> bool {
        let p = pos.0;
        p >= self.base && p < self.end_pos()
    }

    /// Converts a global position to an offset within this file.
    #[inline]
    pub fn local_offset(&self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.base)
    }

    /// Converts a global position to 1-indexed line/column.
    pub fn line_col(&self, pos: BytePos) -> LineCol {
        let offset = self.local_offset(pos);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let column = offset.saturating_sub(self.line_starts[line]) + 1;
        LineCol {
            line: (line + 1) as u32,
            column,
        }
    }

    /// The source text under a span.
    pub fn span_text(&self, span: Span) -> &str {
        let start = (self.local_offset(span.start) as usize).min(self.source.len());
        let end = (self.local_offset(span.end) as usize).min(self.source.len());
        &self.source[start..end]
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base", &self.base)
            .field("len", &self.source.len())
            .finish()
    }
}

/// The registry of all source files, owner of the global position space.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    next_base: u32,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buffer and returns its id. Bases are assigned with a
    /// one-byte gap between files so spans of adjacent files never touch.
    pub fn add_file(&mut self, name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> FileId {
        let source = source.into();
        let id = FileId::new(self.files.len() as u32);
        let base = self.next_base;
        self.next_base = base + source.len() as u32 + 1;
        self.files.push(SourceFile::new(id, name, source, base));
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// The file containing a global position.
    pub fn lookup_file(&self, pos: BytePos) -> Option<&SourceFile> {
        let p = pos.0;
        let idx = self.files.partition_point(|f| f.base <= p);
        if idx > 0 {
            let file = &self.files[idx - 1];
            if file.contains_pos(pos) {
                return Some(file);
            }
        }
        None
    }

    pub fn lookup_span(&self, span: Span) -> Option<&SourceFile> {
        self.lookup_file(span.start)
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// The base offset to hand the lexer for a file.
    pub fn file_base(&self, id: FileId) -> Option<u32> {
        self.get_file(id).map(|f| f.base())
    }

    pub fn line_col(&self, pos: BytePos) -> Option<LineCol> {
        self.lookup_file(pos).map(|f| f.line_col(pos))
    }

    pub fn span_text(&self, span: Span) -> Option<&str> {
        self.lookup_span(span).map(|f| f.span_text(span))
    }

    /// Renders a position as `file:line:col`.
    pub fn format_pos(&self, pos: BytePos) -> String {
        match self.lookup_file(pos) {
            Some(file) => {
                let lc = file.line_col(pos);
                format!("{}:{}:{}", file.name(), lc.line, lc.column)
            }
            None => format!("?:{}", pos.0),
        }
    }

    pub fn format_span(&self, span: Span) -> String {
        self.format_pos(span.start)
    }
}

impl fmt::Debug for SourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMap")
            .field("file_count", &self.files.len())
            .field("next_base", &self.next_base)
            .finish()
    }
}
