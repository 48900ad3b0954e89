//! # riv-syntax
//!
//! The front-end of the Riv compiler:
//!
//! - tokenization of source buffers ([`lexer`], [`token`])
//! - arena-allocated AST definitions ([`ast`])
//! - recursive descent parser with table-driven precedence climbing
//!   ([`parser`])
//! - diagnostic definitions ([`errors`]) and a naive printer ([`display`])
//!
//! ```
//! use riv_syntax::parser::parse;
//!
//! let (file, interner) = parse("func main() -> Int { return 0; }", 0);
//! assert!(file.is_ok());
//! let module = file.module.unwrap();
//! assert_eq!(module.decls.len(), 1);
//! ```

pub mod ast;
pub mod display;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use display::print_module;
pub use errors::SyntaxError;
pub use lexer::{lex, Lexer};
pub use parser::{parse, parse_with_interner, ParsedFile, Parser};
pub use token::{Token, TokenKind};
