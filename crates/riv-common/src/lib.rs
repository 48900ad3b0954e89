//! # riv-common
//!
//! Shared infrastructure for the Riv compiler:
//!
//! - source file management and position tracking ([`source`], [`span`])
//! - structured diagnostics with terminal rendering ([`diagnostics`])
//! - identifier interning ([`symbol`])

pub mod diagnostics;
pub mod source;
pub mod span;
pub mod symbol;

pub use diagnostics::{Diagnostic, DiagnosticEmitter, DiagnosticSink, Label, Severity};
pub use source::{FileId, LineCol, SourceFile, SourceMap};
pub use span::{BytePos, Span};
pub use symbol::{Ident, Symbol, SymbolInterner};
