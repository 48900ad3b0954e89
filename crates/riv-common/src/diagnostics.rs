//! Structured diagnostics.
//!
//! Errors are values: a [`Diagnostic`] carries a severity, a numeric code,
//! a message, and labeled spans. Producers push them into a
//! [`DiagnosticSink`]; a [`DiagnosticEmitter`] renders them against a
//! [`SourceMap`] for the terminal. Spans are global, so labels need no file
//! id.

use std::fmt;

use codespan_reporting::diagnostic::{
    Diagnostic as CsDiagnostic, Label as CsLabel, LabelStyle, Severity as CsSeverity,
};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{
    self,
    termcolor::{ColorChoice, StandardStream, WriteColor},
    Config,
};

use crate::source::SourceMap;
use crate::span::Span;

/// Severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

impl From<Severity> for CsSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => CsSeverity::Error,
            Severity::Warning => CsSeverity::Warning,
            Severity::Note => CsSeverity::Note,
        }
    }
}

/// A labeled source location attached to a diagnostic.
#[derive(Clone, Debug)]
pub struct Label {
    pub style: LabelStyle,
    pub span: Span,
    pub message: Option<String>,
}

impl Label {
    /// The main location of the diagnostic.
    pub fn primary(span: Span) -> Self {
        Self {
            style: LabelStyle::Primary,
            span,
            message: None,
        }
    }

    /// Additional context.
    pub fn secondary(span: Span) -> Self {
        Self {
            style: LabelStyle::Secondary,
            span,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A diagnostic message with severity, code, and labeled locations.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<u16>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The span of the primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .map(|l| l.span)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

/// Collects diagnostics produced during a compilation stage.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the sink, resetting the counts.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    pub fn extend(&mut self, other: DiagnosticSink) {
        self.error_count += other.error_count;
        self.diagnostics.extend(other.diagnostics);
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("errors", &self.error_count)
            .field("total", &self.diagnostics.len())
            .finish()
    }
}

/// Renders diagnostics against a [`SourceMap`].
pub struct DiagnosticEmitter<'a> {
    source_map: &'a SourceMap,
    config: Config,
}

impl<'a> DiagnosticEmitter<'a> {
    pub fn new(source_map: &'a SourceMap) -> Self {
        Self {
            source_map,
            config: Config::default(),
        }
    }

    /// Emits a diagnostic to stderr.
    pub fn emit(&self, diagnostic: &Diagnostic) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer.lock(), diagnostic);
    }

    pub fn emit_to<W: WriteColor>(&self, writer: &mut W, diagnostic: &Diagnostic) {
        let files = self.build_files();
        let cs = self.to_codespan(diagnostic);
        let _ = term::emit(writer, &self.config, &files, &cs);
    }

    /// Renders a diagnostic without color, for tests and logs.
    pub fn emit_to_string(&self, diagnostic: &Diagnostic) -> String {
        let mut buffer = termcolor::Buffer::no_color();
        self.emit_to(&mut buffer, diagnostic);
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    pub fn emit_all(&self, sink: &DiagnosticSink) {
        for diagnostic in sink.iter() {
            self.emit(diagnostic);
        }
    }

    fn build_files(&self) -> SimpleFiles<&str, &str> {
        let mut files = SimpleFiles::new();
        for file in self.source_map.files() {
            files.add(file.name(), file.source());
        }
        files
    }

    fn to_codespan(&self, diagnostic: &Diagnostic) -> CsDiagnostic<usize> {
        let mut cs = CsDiagnostic::new(diagnostic.severity.into()).with_message(&diagnostic.message);

        if let Some(code) = diagnostic.code {
            cs = cs.with_code(format!("E{:04}", code));
        }

        let labels: Vec<CsLabel<usize>> = diagnostic
            .labels
            .iter()
            .filter_map(|label| {
                let file = self.source_map.lookup_span(label.span)?;
                let file_id = file.id().as_u32() as usize;
                let start = file.local_offset(label.span.start) as usize;
                let end = file.local_offset(label.span.end) as usize;
                let mut cs_label = CsLabel::new(label.style, file_id, start..end);
                if let Some(msg) = &label.message {
                    cs_label = cs_label.with_message(msg);
                }
                Some(cs_label)
            })
            .collect();

        cs.with_labels(labels).with_notes(diagnostic.notes.clone())
    }
}
