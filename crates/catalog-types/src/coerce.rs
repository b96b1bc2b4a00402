// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Lenient numeric coercion for query strings and stored prices
//!
//! Catalog clients send numbers as free-form text and prices are stored as
//! strings, so numbers are read the way a browser reads them: leading
//! whitespace is skipped, the longest numeric prefix is taken, and trailing
//! garbage is ignored (`"12.5 USD"` reads as `12.5`). Text with no numeric
//! prefix yields `None`, which callers treat as "not supplied".

/// Parse the longest decimal floating-point prefix of `input`
///
/// Accepts an optional sign, digits with an optional fractional part, an
/// optional exponent, and the literal `Infinity`. Returns `None` when no
/// numeric prefix exists.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if text[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..], 10);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..], 10);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..], 10);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Parse the longest integer prefix of `input`
///
/// Accepts an optional sign and either decimal digits or a `0x`-prefixed
/// hexadecimal number. Fractions and exponents stop the scan (`"2.9"` reads
/// as `2`). Values beyond the `i64` range saturate.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();

    let (negative, mut start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let mut radix = 10;
    if bytes.len() > start + 1
        && bytes[start] == b'0'
        && matches!(bytes[start + 1], b'x' | b'X')
    {
        radix = 16;
        start += 2;
    }

    let digits = count_digits(&bytes[start..], radix);
    if digits == 0 {
        return None;
    }

    let magnitude = bytes[start..start + digits]
        .iter()
        .filter_map(|b| char::from(*b).to_digit(radix))
        .fold(0_i64, |acc, digit| {
            acc.saturating_mul(i64::from(radix))
                .saturating_add(i64::from(digit))
        });

    Some(if negative { -magnitude } else { magnitude })
}

fn count_digits(bytes: &[u8], radix: u32) -> usize {
    bytes
        .iter()
        .take_while(|b| char::from(**b).is_digit(radix))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_plain_values() {
        assert_eq!(parse_float_prefix("10"), Some(10.0));
        assert_eq!(parse_float_prefix("19.99"), Some(19.99));
        assert_eq!(parse_float_prefix("-3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix("+7"), Some(7.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
    }

    #[test]
    fn float_takes_numeric_prefix() {
        assert_eq!(parse_float_prefix("  42abc"), Some(42.0));
        assert_eq!(parse_float_prefix("12.5 USD"), Some(12.5));
        assert_eq!(parse_float_prefix("1.2.3"), Some(1.2));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("2E-2x"), Some(0.02));
    }

    #[test]
    fn float_infinity_literal() {
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("-Infinityx"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn float_rejects_non_numeric() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("$10"), None);
        assert_eq!(parse_float_prefix("NaN"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn int_plain_and_prefixed_values() {
        assert_eq!(parse_int_prefix("3"), Some(3));
        assert_eq!(parse_int_prefix(" 12 "), Some(12));
        assert_eq!(parse_int_prefix("2.9"), Some(2));
        assert_eq!(parse_int_prefix("1e3"), Some(1));
        assert_eq!(parse_int_prefix("-4"), Some(-4));
        assert_eq!(parse_int_prefix("0x1A"), Some(26));
        assert_eq!(parse_int_prefix("7pages"), Some(7));
    }

    #[test]
    fn int_rejects_non_numeric() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("page"), None);
        assert_eq!(parse_int_prefix("0x"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn int_saturates_on_overflow() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }
}
