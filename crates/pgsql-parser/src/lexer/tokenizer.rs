//! The raw single-pass lexer.
//!
//! [`Lexer`] turns characters into tokens without looking past the token it
//! is building. Keyword lookahead and `U&` decoding happen one layer up, in
//! [`Scanner`](super::Scanner).

use std::borrow::Cow;

use super::unicode::{hex_prefix, EscapeBuffer};
use super::{keywords, Span, Token, TokenKind};
use crate::dialect::Dialect;
use crate::diagnostics::{ErrorSaveContext, LineIndex, Location};
use crate::numeric::{parse_integer_safe, parse_unsigned_long};

/// Characters that may appear in an operator.
const OP_CHARS: &str = "~!@#^&|`?+-*/%<>=";

/// Operator characters that keep a trailing `+` or `-` attached.
const OP_KEEP_SIGN: &str = "~!@#^&|`?";

/// Scanner settings captured from a [`Dialect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Backslashes are ordinary characters in `'...'`.
    pub standard_conforming_strings: bool,
    /// Warn about backslashes in `'...'` when they are escapes.
    pub escape_string_warning: bool,
    /// Identifier length limit in bytes.
    pub max_identifier_length: usize,
}

impl ScanOptions {
    /// Captures the settings of `dialect`.
    #[must_use]
    pub fn from_dialect(dialect: &dyn Dialect) -> Self {
        Self {
            standard_conforming_strings: dialect.standard_conforming_strings(),
            escape_string_warning: dialect.escape_string_warning(),
            max_identifier_length: dialect.max_identifier_length(),
        }
    }
}

/// How backslashes behave inside a quoted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringStyle {
    Standard,
    Escape,
    /// Backslash escapes in a plain literal, with the nonstandard warning.
    Legacy,
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_cont(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '$'
}

fn is_op_char(c: char) -> bool {
    OP_CHARS.contains(c)
}

/// Keeps the low eight bits of an escape's numeric value.
fn low_byte(value: i64) -> u8 {
    u8::try_from(value & 0xFF).unwrap_or_default()
}

/// Truncates `ident` to `max_len` bytes on a character boundary, warning if
/// anything was cut.
pub(crate) fn truncate_identifier(
    ident: &mut String,
    max_len: usize,
    ctx: &mut ErrorSaveContext,
    at: impl FnOnce() -> Location,
) {
    if ident.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !ident.is_char_boundary(cut) {
        cut -= 1;
    }
    let original = ident.clone();
    ident.truncate(cut);
    ctx.warning(
        format!("identifier \"{original}\" will be truncated to \"{ident}\""),
        Some(at()),
    );
}

/// A lexer that tokenizes SQL input.
#[derive(Debug)]
pub struct Lexer<'a> {
    /// The input source code.
    input: Cow<'a, str>,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    options: ScanOptions,
    lines: LineIndex,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub fn new(input: impl Into<Cow<'a, str>>, options: ScanOptions) -> Self {
        let input = input.into();
        let lines = LineIndex::new(&input);
        Self {
            input,
            pos: 0,
            start: 0,
            options,
            lines,
        }
    }

    /// Returns the full input text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.input
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one.
    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Returns the location of byte `offset` in the input.
    pub(crate) fn location(&self, offset: usize) -> Location {
        self.lines.locate(&self.input, offset)
    }

    /// Creates a span from start to current position.
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Consumes the rest of the input and returns EOF.
    fn bail_to_eof(&mut self) -> Token {
        self.pos = self.input.len();
        self.start = self.pos;
        self.make_token(TokenKind::Eof)
    }

    /// Skips whitespace and comments.
    ///
    /// Returns false if an unterminated block comment swallowed the input.
    fn skip_whitespace_and_comments(&mut self, ctx: &mut ErrorSaveContext) -> bool {
        loop {
            while self.peek().is_some_and(is_space) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let comment_start = self.pos;
                self.pos += 2;
                let mut depth = 1_usize;
                while depth > 0 {
                    match self.advance() {
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some(_) => {}
                        None => {
                            ctx.error(
                                "unterminated /* comment",
                                Some(self.location(comment_start)),
                            );
                            return false;
                        }
                    }
                }
                continue;
            }

            return true;
        }
    }

    /// Returns the next raw token.
    pub fn next_token(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        if !self.skip_whitespace_and_comments(ctx) {
            return self.bail_to_eof();
        }
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };
        let next = self.peek_next();

        match c {
            '\'' => {
                let style = if self.options.standard_conforming_strings {
                    StringStyle::Standard
                } else {
                    StringStyle::Legacy
                };
                self.scan_string(ctx, style)
            }
            '"' => self.scan_quoted_identifier(ctx),
            '$' => self.scan_dollar(ctx),
            'e' | 'E' if next == Some('\'') => {
                self.advance();
                self.scan_string(ctx, StringStyle::Escape)
            }
            'n' | 'N' if next == Some('\'') => {
                self.advance();
                self.scan_string(ctx, StringStyle::Standard)
            }
            'b' | 'B' if next == Some('\'') => self.scan_bit_string(ctx, 2),
            'x' | 'X' if next == Some('\'') => self.scan_bit_string(ctx, 16),
            'u' | 'U' if next == Some('&') && matches!(self.peek_nth(2), Some('\'' | '"')) => {
                self.scan_unicode_literal(ctx)
            }
            c if is_ident_start(c) => self.scan_identifier(ctx),
            '0'..='9' => self.scan_number(ctx),
            '.' if next.is_some_and(|d| d.is_ascii_digit()) => self.scan_number(ctx),
            '.' if next == Some('.') => {
                self.pos += 2;
                self.make_token(TokenKind::DotDot)
            }
            ':' if next == Some(':') => {
                self.pos += 2;
                self.make_token(TokenKind::Typecast)
            }
            ':' if next == Some('=') => {
                self.pos += 2;
                self.make_token(TokenKind::ColonEquals)
            }
            c if is_op_char(c) => self.scan_operator(),
            _ => {
                self.advance();
                let kind = match c {
                    '.' => TokenKind::Dot,
                    ':' => TokenKind::Colon,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    '[' => TokenKind::LeftBracket,
                    ']' => TokenKind::RightBracket,
                    other => TokenKind::Other(other),
                };
                self.make_token(kind)
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        while self.peek().is_some_and(is_ident_cont) {
            self.advance();
        }

        let mut ident = self.input[self.start..self.pos].to_ascii_lowercase();

        if let Some(entry) = keywords::lookup(&ident) {
            return self.make_token(TokenKind::Keyword(entry.keyword));
        }
        truncate_identifier(&mut ident, self.options.max_identifier_length, ctx, || {
            self.location(self.start)
        });
        self.make_token(TokenKind::Ident(ident))
    }

    /// Scans a quoted identifier; `""` stands for one `"`.
    fn scan_quoted_identifier(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        let Some(mut ident) = self.scan_delimited('"') else {
            ctx.error(
                "unterminated quoted identifier",
                Some(self.location(self.start)),
            );
            return self.bail_to_eof();
        };
        if ident.is_empty() {
            ctx.error(
                "zero-length delimited identifier",
                Some(self.location(self.start)),
            );
        }
        truncate_identifier(&mut ident, self.options.max_identifier_length, ctx, || {
            self.location(self.start)
        });
        self.make_token(TokenKind::Ident(ident))
    }

    /// Consumes `quote ... quote` with doubled quotes, returning the body.
    /// Returns `None` when the closing quote is missing.
    fn scan_delimited(&mut self, quote: char) -> Option<String> {
        self.advance();
        let mut body = String::new();
        loop {
            match self.advance()? {
                c if c == quote && self.peek() == Some(quote) => {
                    self.advance();
                    body.push(quote);
                }
                c if c == quote => return Some(body),
                c => body.push(c),
            }
        }
    }

    /// Scans `'...'` in the given style. The cursor sits on the opening quote.
    fn scan_string(&mut self, ctx: &mut ErrorSaveContext, style: StringStyle) -> Token {
        if style == StringStyle::Standard {
            return match self.scan_delimited('\'') {
                Some(body) => self.make_token(TokenKind::SConst(body)),
                None => {
                    ctx.error("unterminated quoted string", Some(self.location(self.start)));
                    self.bail_to_eof()
                }
            };
        }

        self.advance();
        let mut buf = EscapeBuffer::new();
        let mut warned = false;
        loop {
            let Some(c) = self.advance() else {
                self.report_decoding(ctx, buf.finish().errors);
                ctx.error("unterminated quoted string", Some(self.location(self.start)));
                return self.bail_to_eof();
            };
            match c {
                '\'' if self.peek() == Some('\'') => {
                    self.advance();
                    buf.push_char('\'');
                }
                '\'' => break,
                '\\' => {
                    if style == StringStyle::Legacy
                        && self.options.escape_string_warning
                        && !warned
                    {
                        warned = true;
                        ctx.warning(
                            "nonstandard use of \\ in a string literal; use the escape string syntax for backslashes, e.g., E'\\\\'",
                            Some(self.location(self.pos - 1)),
                        );
                    }
                    self.scan_backslash_escape(&mut buf);
                }
                c => buf.push_char(c),
            }
        }
        let decoded = buf.finish();
        self.report_decoding(ctx, decoded.errors);
        self.make_token(TokenKind::SConst(decoded.text))
    }

    /// Records decoding problems of the current token at its start.
    fn report_decoding(&self, ctx: &mut ErrorSaveContext, errors: Vec<&'static str>) {
        if errors.is_empty() {
            return;
        }
        let at = self.location(self.start);
        for message in errors {
            ctx.error(message, Some(at));
        }
    }

    /// Decodes one backslash escape. The backslash is already consumed.
    fn scan_backslash_escape(&mut self, buf: &mut EscapeBuffer) {
        let Some(c) = self.peek() else {
            // Unterminated: the caller reports it on the next read.
            return;
        };
        let escape_start = self.pos;
        self.advance();
        match c {
            'b' => buf.push_byte(0x08),
            'f' => buf.push_byte(0x0C),
            'n' => buf.push_byte(b'\n'),
            'r' => buf.push_byte(b'\r'),
            't' => buf.push_byte(b'\t'),
            'v' => buf.push_byte(0x0B),
            '0'..='7' => {
                while self.pos - escape_start < 3 && self.peek().is_some_and(|d| d.is_digit(8)) {
                    self.advance();
                }
                let value = parse_unsigned_long(&self.input[escape_start..self.pos], 0, 8);
                buf.push_byte(low_byte(value));
            }
            'x' if self.peek().is_some_and(|d| d.is_ascii_hexdigit()) => {
                let digits_start = self.pos;
                while self.pos - digits_start < 2 && self.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
                    self.advance();
                }
                let value = parse_unsigned_long(&self.input[escape_start..self.pos], 1, 16);
                buf.push_byte(low_byte(value));
            }
            'u' | 'U' => {
                let width = if c == 'u' { 4 } else { 8 };
                match hex_prefix(&self.input[self.pos..], width) {
                    Some(cp) => {
                        self.pos += width;
                        buf.push_code_point(cp);
                    }
                    None => buf.push_invalid_escape(),
                }
            }
            other => buf.push_char(other),
        }
    }

    /// Scans `B'...'` (radix 2) or `X'...'` (radix 16).
    fn scan_bit_string(&mut self, ctx: &mut ErrorSaveContext, radix: u32) -> Token {
        self.advance();
        let (kind_name, digit_name) = if radix == 2 {
            ("bit", "binary")
        } else {
            ("hexadecimal", "hexadecimal")
        };
        let Some(body) = self.scan_delimited('\'') else {
            ctx.error(
                format!("unterminated {kind_name} string literal"),
                Some(self.location(self.start)),
            );
            return self.bail_to_eof();
        };
        if let Some(bad) = body.chars().find(|c| !c.is_digit(radix)) {
            ctx.error(
                format!("\"{bad}\" is not a valid {digit_name} digit"),
                Some(self.location(self.start)),
            );
        }
        let kind = if radix == 2 {
            TokenKind::BConst(body)
        } else {
            TokenKind::XConst(body)
        };
        self.make_token(kind)
    }

    /// Scans `U&'...'` or `U&"..."`, leaving the escapes for the scanner.
    fn scan_unicode_literal(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        self.pos += 2;
        let is_ident = self.peek() == Some('"');
        let quote = if is_ident { '"' } else { '\'' };
        let Some(body) = self.scan_delimited(quote) else {
            let what = if is_ident {
                "unterminated quoted identifier"
            } else {
                "unterminated quoted string"
            };
            ctx.error(what, Some(self.location(self.start)));
            return self.bail_to_eof();
        };
        if !is_ident && !self.options.standard_conforming_strings {
            ctx.error(
                "unsafe use of string constant with Unicode escapes",
                Some(self.location(self.start)),
            );
        }
        let kind = if is_ident {
            TokenKind::UIdent(body)
        } else {
            TokenKind::UConst(body)
        };
        self.make_token(kind)
    }

    /// Scans `$n`, `$$...$$` or `$tag$...$tag$`.
    fn scan_dollar(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        self.advance();

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            let mut scratch = ErrorSaveContext::new();
            let number = parse_integer_safe(&self.input[self.start + 1..self.pos], &mut scratch);
            if scratch.error_occurred() {
                ctx.error("parameter number too large", Some(self.location(self.start)));
            }
            if self.peek().is_some_and(is_ident_cont) {
                while self.peek().is_some_and(is_ident_cont) {
                    self.advance();
                }
                ctx.error(
                    format!(
                        "trailing junk after parameter at or near \"{}\"",
                        &self.input[self.start..self.pos]
                    ),
                    Some(self.location(self.start)),
                );
            }
            return self.make_token(TokenKind::Param(number));
        }

        let tag_start = self.pos;
        if self.peek().is_some_and(|c| is_ident_start(c) && c != '$') {
            while self.peek().is_some_and(|c| is_ident_cont(c) && c != '$') {
                self.advance();
            }
        }
        if self.peek() != Some('$') {
            // Not a dollar quote: hand back the lone '$'.
            self.pos = tag_start;
            return self.make_token(TokenKind::Other('$'));
        }
        self.advance();

        let delimiter = self.input[self.start..self.pos].to_owned();
        match self.input[self.pos..].find(&delimiter) {
            Some(len) => {
                let body = self.input[self.pos..self.pos + len].to_owned();
                self.pos += len + delimiter.len();
                self.make_token(TokenKind::SConst(body))
            }
            None => {
                ctx.error(
                    "unterminated dollar-quoted string",
                    Some(self.location(self.start)),
                );
                self.bail_to_eof()
            }
        }
    }

    /// Consumes `digit (_? digit)*` for the given radix.
    fn consume_digits(&mut self, radix: u32) -> bool {
        let mut any = false;
        loop {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    any = true;
                    self.advance();
                }
                Some('_') if any && self.peek_next().is_some_and(|d| d.is_digit(radix)) => {
                    self.advance();
                }
                _ => return any,
            }
        }
    }

    /// Scans a numeric literal.
    fn scan_number(&mut self, ctx: &mut ErrorSaveContext) -> Token {
        let mut is_float = false;

        let prefix_radix = match (self.peek(), self.peek_next()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        let radix_digits = prefix_radix.filter(|&radix| {
            let mut ahead = self.input[self.pos + 2..].chars();
            match ahead.next() {
                Some('_') => ahead.next().is_some_and(|d| d.is_digit(radix)),
                Some(d) => d.is_digit(radix),
                None => false,
            }
        });

        if let Some(radix) = radix_digits {
            self.pos += 2;
            if self.peek() == Some('_') {
                self.advance();
            }
            self.consume_digits(radix);
        } else {
            self.consume_digits(10);
            if self.peek() == Some('.') && self.peek_next() != Some('.') {
                is_float = true;
                self.advance();
                self.consume_digits(10);
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let sign = matches!(self.peek_next(), Some('+' | '-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|d| d.is_ascii_digit()) {
                    is_float = true;
                    self.pos += digit_at;
                    self.consume_digits(10);
                }
            }
        }

        let number_end = self.pos;
        if self.peek().is_some_and(is_ident_cont) {
            while self.peek().is_some_and(is_ident_cont) {
                self.advance();
            }
            ctx.error(
                format!(
                    "trailing junk after numeric literal at or near \"{}\"",
                    &self.input[self.start..self.pos]
                ),
                Some(self.location(self.start)),
            );
        }

        let text = self.input[self.start..number_end].to_owned();
        let span = Span::new(self.start, self.pos);
        if is_float {
            return Token::new(TokenKind::FConst(text), span);
        }
        let mut scratch = ErrorSaveContext::new();
        let value = parse_integer_safe(&text, &mut scratch);
        let kind = if scratch.error_occurred() {
            TokenKind::FConst(text)
        } else {
            TokenKind::IConst(value)
        };
        Token::new(kind, span)
    }

    /// Scans an operator using the longest-match rule.
    fn scan_operator(&mut self) -> Token {
        let rest = &self.input[self.pos..];
        let mut len = rest
            .find(|c: char| !is_op_char(c))
            .unwrap_or(rest.len());

        // A comment start ends the operator.
        let run = &rest[..len];
        for marker in ["/*", "--"] {
            if let Some(i) = run.find(marker) {
                len = len.min(i.max(1));
            }
        }

        let run = &rest[..len];
        if len > 1 && !run.contains(|c: char| OP_KEEP_SIGN.contains(c)) {
            while len > 1 && matches!(rest.as_bytes()[len - 1], b'+' | b'-') {
                len -= 1;
            }
        }

        let op = rest[..len].to_owned();
        self.pos += len;

        let kind = match op.as_str() {
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Star,
            "/" => TokenKind::Slash,
            "%" => TokenKind::Percent,
            "^" => TokenKind::Caret,
            "=" => TokenKind::Eq,
            "<" => TokenKind::Lt,
            ">" => TokenKind::Gt,
            "<=" => TokenKind::LtEq,
            ">=" => TokenKind::GtEq,
            "<>" | "!=" => TokenKind::NotEq,
            "=>" => TokenKind::EqualsGreater,
            _ => TokenKind::Op(op),
        };
        self.make_token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::lexer::Keyword;

    fn lex_with(input: &str, options: ScanOptions) -> (Vec<TokenKind>, ErrorSaveContext) {
        let mut ctx = ErrorSaveContext::new();
        let mut lexer = Lexer::new(input, options);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token(&mut ctx);
            if token.is_eof() {
                break;
            }
            kinds.push(token.kind);
        }
        (kinds, ctx)
    }

    fn lex(input: &str) -> Vec<TokenKind> {
        let (kinds, ctx) = lex_with(input, ScanOptions::from_dialect(&PostgresDialect::new()));
        assert!(ctx.is_empty(), "unexpected diagnostics: {:?}", ctx.diagnostics());
        kinds
    }

    fn lex_errors(input: &str) -> (Vec<TokenKind>, Vec<String>) {
        let (kinds, ctx) = lex_with(input, ScanOptions::from_dialect(&PostgresDialect::new()));
        let messages = ctx.diagnostics().iter().map(|d| d.message.clone()).collect();
        (kinds, messages)
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(
            lex("select * from table_a"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Star,
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident("table_a".into()),
            ]
        );
    }

    #[test]
    fn test_identifier_case_folding() {
        assert_eq!(lex("FooBar"), vec![TokenKind::Ident("foobar".into())]);
        assert_eq!(lex("\"FooBar\""), vec![TokenKind::Ident("FooBar".into())]);
        assert_eq!(lex("a$1"), vec![TokenKind::Ident("a$1".into())]);
        assert_eq!(lex("café"), vec![TokenKind::Ident("café".into())]);
    }

    #[test]
    fn test_quoted_identifier_escape() {
        assert_eq!(
            lex("\"Iden\"\"ti\"\"fier\""),
            vec![TokenKind::Ident("Iden\"ti\"fier".into())]
        );
    }

    #[test]
    fn test_nested_comments() {
        assert!(lex("/* some /* nested */ comment */").is_empty());
        assert_eq!(lex("1 -- trailing\n2"), vec![TokenKind::IConst(1), TokenKind::IConst(2)]);
    }

    #[test]
    fn test_unterminated_comment() {
        let (kinds, errors) = lex_errors("select /* open /* */");
        assert_eq!(kinds, vec![TokenKind::Keyword(Keyword::Select)]);
        assert_eq!(errors, vec!["unterminated /* comment"]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex("'it''s'"), vec![TokenKind::SConst("it's".into())]);
        assert_eq!(lex("'a\\n'"), vec![TokenKind::SConst("a\\n".into())]);
        assert_eq!(lex("E'a\\nb'"), vec![TokenKind::SConst("a\nb".into())]);
        assert_eq!(lex("e'\\x41\\101\\''"), vec![TokenKind::SConst("AA'".into())]);
        assert_eq!(lex("E'\\u00e9'"), vec![TokenKind::SConst("é".into())]);
        assert_eq!(lex("E'\\303\\251'"), vec![TokenKind::SConst("é".into())]);
        assert_eq!(lex("N'abc'"), vec![TokenKind::SConst("abc".into())]);
    }

    #[test]
    fn test_nul_escapes_are_rejected() {
        for input in ["E'a\\x00b'", "E'a\\000b'", "E'a\\0b'"] {
            let (kinds, errors) = lex_errors(input);
            assert_eq!(kinds, vec![TokenKind::SConst("a\u{FFFD}b".into())], "{input}");
            assert_eq!(errors, vec!["invalid byte sequence for encoding \"UTF8\": 0x00"]);
        }
        let (_, errors) = lex_errors("E'\\u0000'");
        assert_eq!(errors, vec!["invalid Unicode escape value"]);
    }

    #[test]
    fn test_escape_errors_point_at_the_literal() {
        let (_, ctx) = lex_with(
            "select\n  E'\\xff', 1",
            ScanOptions::from_dialect(&PostgresDialect::new()),
        );
        let diagnostic = &ctx.diagnostics()[0];
        assert_eq!(
            diagnostic.message,
            "invalid byte sequence for encoding \"UTF8\" in string literal"
        );
        let at = diagnostic.location.unwrap();
        assert_eq!((at.offset, at.line, at.column), (9, 2, 3));
    }

    #[test]
    fn test_adjacent_strings_are_separate() {
        assert_eq!(
            lex("'a'\n'b'"),
            vec![TokenKind::SConst("a".into()), TokenKind::SConst("b".into())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (kinds, errors) = lex_errors("select 'abc");
        assert_eq!(kinds, vec![TokenKind::Keyword(Keyword::Select)]);
        assert_eq!(errors, vec!["unterminated quoted string"]);
    }

    #[test]
    fn test_nonstandard_strings() {
        let options = ScanOptions::from_dialect(
            &PostgresDialect::new().with_standard_conforming_strings(false),
        );
        let (kinds, ctx) = lex_with("'a\\tb'", options);
        assert_eq!(kinds, vec![TokenKind::SConst("a\tb".into())]);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert!(!ctx.error_occurred());
    }

    #[test]
    fn test_bit_strings() {
        assert_eq!(lex("B'0101'"), vec![TokenKind::BConst("0101".into())]);
        assert_eq!(lex("x'1F'"), vec![TokenKind::XConst("1F".into())]);
        let (_, errors) = lex_errors("b'012'");
        assert_eq!(errors, vec!["\"2\" is not a valid binary digit"]);
    }

    #[test]
    fn test_dollar_strings() {
        assert_eq!(lex("$$it's$$"), vec![TokenKind::SConst("it's".into())]);
        assert_eq!(
            lex("$fn$ select $$x$$ $fn$"),
            vec![TokenKind::SConst(" select $$x$$ ".into())]
        );
        let (_, errors) = lex_errors("$a$ never closed");
        assert_eq!(errors, vec!["unterminated dollar-quoted string"]);
    }

    #[test]
    fn test_params() {
        assert_eq!(
            lex("$1 + $23"),
            vec![TokenKind::Param(1), TokenKind::Plus, TokenKind::Param(23)]
        );
        let (_, errors) = lex_errors("$1abc");
        assert_eq!(errors, vec!["trailing junk after parameter at or near \"$1abc\""]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("42 4.2 .5 1e10 1.5E-3 1_000 0x1F 0o17 0b101"),
            vec![
                TokenKind::IConst(42),
                TokenKind::FConst("4.2".into()),
                TokenKind::FConst(".5".into()),
                TokenKind::FConst("1e10".into()),
                TokenKind::FConst("1.5E-3".into()),
                TokenKind::IConst(1000),
                TokenKind::IConst(31),
                TokenKind::IConst(15),
                TokenKind::IConst(5),
            ]
        );
    }

    #[test]
    fn test_integer_overflow_becomes_numeric() {
        assert_eq!(lex("9876543210"), vec![TokenKind::FConst("9876543210".into())]);
    }

    #[test]
    fn test_range_dots() {
        assert_eq!(
            lex("1..2"),
            vec![TokenKind::IConst(1), TokenKind::DotDot, TokenKind::IConst(2)]
        );
    }

    #[test]
    fn test_numeric_junk() {
        let (kinds, errors) = lex_errors("123abc");
        assert_eq!(kinds, vec![TokenKind::IConst(123)]);
        assert_eq!(
            errors,
            vec!["trailing junk after numeric literal at or near \"123abc\""]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("a<>b != c <= d >= e :: f := g => h"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::NotEq,
                TokenKind::Ident("b".into()),
                TokenKind::NotEq,
                TokenKind::Ident("c".into()),
                TokenKind::LtEq,
                TokenKind::Ident("d".into()),
                TokenKind::GtEq,
                TokenKind::Ident("e".into()),
                TokenKind::Typecast,
                TokenKind::Ident("f".into()),
                TokenKind::ColonEquals,
                TokenKind::Ident("g".into()),
                TokenKind::EqualsGreater,
                TokenKind::Ident("h".into()),
            ]
        );
    }

    #[test]
    fn test_operator_sign_stripping() {
        assert_eq!(
            lex("1*-2"),
            vec![
                TokenKind::IConst(1),
                TokenKind::Star,
                TokenKind::Minus,
                TokenKind::IConst(2)
            ]
        );
        assert_eq!(
            lex("a@-b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Op("@-".into()),
                TokenKind::Ident("b".into())
            ]
        );
        assert_eq!(lex("a||b").get(1), Some(&TokenKind::Op("||".into())));
    }

    #[test]
    fn test_operator_stops_at_comment() {
        assert_eq!(
            lex("a //* c */ b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Slash,
                TokenKind::Ident("b".into())
            ]
        );
        assert_eq!(
            lex("2 */ 3"),
            vec![
                TokenKind::IConst(2),
                TokenKind::Op("*/".into()),
                TokenKind::IConst(3)
            ]
        );
        assert_eq!(lex("1 +-- c\n2"), vec![TokenKind::IConst(1), TokenKind::Plus, TokenKind::IConst(2)]);
    }

    #[test]
    fn test_identifier_truncation() {
        let options = ScanOptions::from_dialect(&PostgresDialect::new().with_max_identifier_length(4));
        let (kinds, ctx) = lex_with("abcdefg", options);
        assert_eq!(kinds, vec![TokenKind::Ident("abcd".into())]);
        assert!(!ctx.error_occurred());
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_zero_length_identifier() {
        let (_, errors) = lex_errors("\"\"");
        assert_eq!(errors, vec!["zero-length delimited identifier"]);
    }

    #[test]
    fn test_other_character() {
        assert_eq!(lex("{"), vec![TokenKind::Other('{')]);
        assert_eq!(lex("$"), vec![TokenKind::Other('$')]);
    }
}
