//! SQL Lexer/Scanner
//!
//! A hand-written finite-state lexer for the PostgreSQL lexical grammar,
//! wrapped by [`Scanner`] which resolves lookahead-sensitive keywords.

pub mod keywords;
mod scanner;
mod span;
mod token;
mod tokenizer;
mod unicode;

pub use keywords::{Keyword, KeywordCategory, KeywordEntry};
pub use scanner::Scanner;
pub use span::Span;
pub use token::{Token, TokenKind};
pub use tokenizer::{Lexer, ScanOptions};
pub use unicode::{check_uescape, decode_unicode_escapes, Decoded};
