//! Numeric conversion primitives used when scanning literals.
//!
//! [`parse_unsigned_long`] follows C `strtoul` and never fails.
//! [`parse_integer_safe`] is the strict `int4` conversion: problems are
//! recorded in an [`ErrorSaveContext`] and a sentinel is returned.

use crate::diagnostics::ErrorSaveContext;

/// Value returned by [`parse_integer_safe`] when conversion fails.
pub const INTEGER_SENTINEL: i32 = 0;

/// Converts `text[start_offset..]` with `strtoul` semantics.
///
/// Leading whitespace is skipped and an optional sign is accepted; a minus
/// sign negates the magnitude. A `radix` of 0 picks 16 for a `0x` prefix, 8
/// for a leading `0` and 10 otherwise. Radix 16 also accepts an explicit
/// `0x` prefix. Parsing stops at the first character that is not a digit of
/// the radix. A magnitude that does not fit in 64 bits saturates to
/// `u64::MAX` before the sign is applied.
///
/// Returns 0 for an invalid radix, an out-of-range offset, or when no digit
/// could be read.
#[must_use]
pub fn parse_unsigned_long(text: &str, start_offset: usize, radix: u32) -> i64 {
    if radix == 1 || radix > 36 {
        return 0;
    }
    let Some(rest) = text.as_bytes().get(start_offset..) else {
        return 0;
    };

    let mut pos = 0;
    while rest.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }

    let mut negative = false;
    match rest.get(pos) {
        Some(b'-') => {
            negative = true;
            pos += 1;
        }
        Some(b'+') => pos += 1,
        _ => {}
    }

    let has_hex_prefix = rest.get(pos) == Some(&b'0')
        && matches!(rest.get(pos + 1), Some(b'x' | b'X'))
        && rest
            .get(pos + 2)
            .is_some_and(|&b| char::from(b).is_ascii_hexdigit());

    let radix = match radix {
        0 if has_hex_prefix => {
            pos += 2;
            16
        }
        0 if rest.get(pos) == Some(&b'0') => 8,
        0 => 10,
        16 if has_hex_prefix => {
            pos += 2;
            16
        }
        r => r,
    };

    let mut value: u64 = 0;
    let mut overflow = false;
    for &b in &rest[pos..] {
        let Some(digit) = char::from(b).to_digit(radix) else {
            break;
        };
        match value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => value = v,
            None => overflow = true,
        }
    }
    if overflow {
        value = u64::MAX;
    }

    // Reinterpreting the bits matches the C conversion to a signed long.
    #[allow(clippy::cast_possible_wrap)]
    let value = value as i64;
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Converts `text` to an `i32`, recording failures in `ctx`.
///
/// Accepts surrounding whitespace, an optional sign, decimal digits or a
/// `0x`/`0o`/`0b` prefixed magnitude. Single underscores may separate
/// digits. The full `i32` range is accepted, both bounds included.
///
/// On failure an ERROR is recorded and [`INTEGER_SENTINEL`] is returned.
pub fn parse_integer_safe(text: &str, ctx: &mut ErrorSaveContext) -> i32 {
    match convert_int4(text) {
        Ok(value) => value,
        Err(IntError::Syntax) => {
            ctx.error(
                format!("invalid input syntax for type integer: \"{text}\""),
                None,
            );
            INTEGER_SENTINEL
        }
        Err(IntError::Range) => {
            ctx.error(
                format!("value \"{text}\" is out of range for type integer"),
                None,
            );
            INTEGER_SENTINEL
        }
    }
}

enum IntError {
    Syntax,
    Range,
}

fn convert_int4(text: &str) -> Result<i32, IntError> {
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let magnitude = accumulate(digits, radix)?;
    let value = if negative {
        -i64::from(magnitude.ok_or(IntError::Range)?)
    } else {
        i64::from(magnitude.ok_or(IntError::Range)?)
    };
    i32::try_from(value).map_err(|_| IntError::Range)
}

/// Returns `Ok(None)` when the digits are well formed but do not fit in
/// 33 bits, which is out of range for any `i32`.
fn accumulate(digits: &str, radix: u32) -> Result<Option<u32>, IntError> {
    if digits.is_empty() {
        return Err(IntError::Syntax);
    }
    let mut value: u64 = 0;
    let mut too_big = false;
    let mut prev_underscore = true;
    for c in digits.chars() {
        if c == '_' {
            if prev_underscore {
                return Err(IntError::Syntax);
            }
            prev_underscore = true;
            continue;
        }
        let digit = c.to_digit(radix).ok_or(IntError::Syntax)?;
        prev_underscore = false;
        value = value * u64::from(radix) + u64::from(digit);
        if value > u64::from(u32::MAX) {
            too_big = true;
            value = u64::from(u32::MAX);
        }
    }
    if prev_underscore {
        return Err(IntError::Syntax);
    }
    if too_big {
        return Ok(None);
    }
    Ok(u32::try_from(value).ok())
}
