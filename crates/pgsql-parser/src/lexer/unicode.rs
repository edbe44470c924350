//! Unicode escape decoding for `U&` literals and `E''` strings.
//!
//! Decoding is lenient: a bad escape or code point is recorded as an ERROR
//! and replaced with U+FFFD, and decoding carries on.

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

const INVALID_SURROGATE_PAIR: &str = "invalid Unicode surrogate pair";

/// Decoded literal text plus the problems found while decoding it, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded text, with U+FFFD in place of each bad escape.
    pub text: String,
    /// One ERROR message per problem.
    pub errors: Vec<&'static str>,
}

/// Byte buffer that accepts code points and pairs up UTF-16 surrogates.
#[derive(Debug, Default)]
pub(crate) struct EscapeBuffer {
    bytes: Vec<u8>,
    pending_high: Option<u32>,
    errors: Vec<&'static str>,
}

impl EscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a literal character.
    pub(crate) fn push_char(&mut self, c: char) {
        self.flush_pending();
        let mut buf = [0; 4];
        self.bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    /// Appends a raw byte from an octal or hex escape. NUL is rejected.
    pub(crate) fn push_byte(&mut self, b: u8) {
        self.flush_pending();
        if b == 0 {
            self.errors
                .push("invalid byte sequence for encoding \"UTF8\": 0x00");
            self.push_replacement();
            return;
        }
        self.bytes.push(b);
    }

    /// Appends a code point taken from a unicode escape.
    pub(crate) fn push_code_point(&mut self, cp: u32) {
        if let Some(high) = self.pending_high.take() {
            if LOW_SURROGATES.contains(&cp) {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (cp - 0xDC00);
                self.push_valid(combined);
                return;
            }
            self.errors.push(INVALID_SURROGATE_PAIR);
            self.push_replacement();
        }
        if HIGH_SURROGATES.contains(&cp) {
            self.pending_high = Some(cp);
        } else if LOW_SURROGATES.contains(&cp) {
            self.errors.push(INVALID_SURROGATE_PAIR);
            self.push_replacement();
        } else {
            self.push_valid(cp);
        }
    }

    /// Records a malformed escape sequence.
    pub(crate) fn push_invalid_escape(&mut self) {
        self.flush_pending();
        self.errors
            .push("invalid Unicode escape: Unicode escapes must be \\XXXX or \\+XXXXXX");
        self.push_replacement();
    }

    /// Finishes decoding, replacing invalid UTF-8 byte runs.
    pub(crate) fn finish(mut self) -> Decoded {
        self.flush_pending();
        let text = match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(err) => {
                self.errors
                    .push("invalid byte sequence for encoding \"UTF8\" in string literal");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Decoded {
            text,
            errors: self.errors,
        }
    }

    fn flush_pending(&mut self) {
        if self.pending_high.take().is_some() {
            self.errors.push(INVALID_SURROGATE_PAIR);
            self.push_replacement();
        }
    }

    fn push_valid(&mut self, cp: u32) {
        match char::from_u32(cp).filter(|&c| c != '\0') {
            Some(c) => {
                let mut buf = [0; 4];
                self.bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            None => {
                self.errors.push("invalid Unicode escape value");
                self.push_replacement();
            }
        }
    }

    fn push_replacement(&mut self) {
        self.bytes
            .extend_from_slice(char::REPLACEMENT_CHARACTER.encode_utf8(&mut [0; 4]).as_bytes());
    }
}

/// Validates the operand of a `UESCAPE` clause.
///
/// The escape must be a single character that is not a hex digit, `+`, a
/// quote, or whitespace.
#[must_use]
pub fn check_uescape(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let c = chars.next()?;
    if chars.next().is_some()
        || c.is_ascii_hexdigit()
        || matches!(c, '+' | '\'' | '"')
        || c.is_whitespace()
    {
        return None;
    }
    Some(c)
}

/// Decodes the body of a `U&` literal using `escape` as the escape character.
///
/// `\XXXX` takes four hex digits and `\+XXXXXX` takes six. A doubled escape
/// character stands for itself.
pub fn decode_unicode_escapes(body: &str, escape: char) -> Decoded {
    let mut out = EscapeBuffer::new();
    let mut rest = body;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        if c != escape {
            out.push_char(c);
            continue;
        }
        if rest.starts_with(escape) {
            out.push_char(escape);
            rest = &rest[escape.len_utf8()..];
            continue;
        }
        let (digits, width) = match rest.strip_prefix('+') {
            Some(tail) => (tail, 6),
            None => (rest, 4),
        };
        match hex_prefix(digits, width) {
            Some(cp) => {
                out.push_code_point(cp);
                rest = &digits[width..];
            }
            None => out.push_invalid_escape(),
        }
    }
    out.finish()
}

/// Parses exactly `width` leading hex digits of `text`.
pub(crate) fn hex_prefix(text: &str, width: usize) -> Option<u32> {
    let digits = text.get(..width)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
