//! Interned identifier symbols.
//!
//! Identifiers are interned once and compared as u32s afterwards. Resolving
//! a [`Symbol`] back to text requires the [`SymbolInterner`] that produced
//! it.

use std::fmt;

use string_interner::{backend::StringBackend, DefaultSymbol, StringInterner};

use crate::span::Span;

/// An interned string. Copyable, comparable, hashable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Option<DefaultSymbol>);

impl Symbol {
    /// A placeholder for nodes that have no real name.
    pub const DUMMY: Symbol = Symbol(None);

    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        use string_interner::Symbol as _;
        self.0.map(|s| s.to_usize() as u32).unwrap_or(u32::MAX)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "Symbol(DUMMY)")
        } else {
            write!(f, "Symbol({})", self.as_u32())
        }
    }
}

/// The central string interner.
#[derive(Clone)]
pub struct SymbolInterner {
    interner: StringInterner<StringBackend<DefaultSymbol>>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        Self {
            interner: StringInterner::new(),
        }
    }

    /// Interns a string, returning the existing symbol if already seen.
    #[inline]
    pub fn intern(&mut self, string: &str) -> Symbol {
        Symbol(Some(self.interner.get_or_intern(string)))
    }

    /// Looks a string up without interning it.
    #[inline]
    pub fn get(&self, string: &str) -> Option<Symbol> {
        self.interner.get(string).map(|s| Symbol(Some(s)))
    }

    /// Resolves a symbol back to its text.
    #[inline]
    pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
        symbol.0.and_then(|s| self.interner.resolve(s))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.interner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolInterner")
            .field("len", &self.interner.len())
            .finish()
    }
}

/// An identifier: an interned name plus where it was written.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

impl Ident {
    #[inline]
    pub const fn new(sym: Symbol, span: Span) -> Self {
        Self { sym, span }
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({:?} @ {:?})", self.sym, self.span)
    }
}
