//! Parsing of abbreviated metric counts such as `830.4K` or `1,234`.

use crate::errors::FieldError;

/// Resolve a human-formatted count to an integer.
///
/// Blank input is `0`. A trailing `K`, `M` or `B` scales the decimal prefix
/// and truncates toward zero, so `1.9999K` is `1999`. Anything else must be
/// an integer, optionally with `,` thousands separators. A single leading
/// `+` is allowed; exponent forms are not.
pub fn parse_count(text: &str) -> Result<u64, FieldError> {
    let normalized = text.trim().to_uppercase();
    if normalized.is_empty() {
        return Ok(0);
    }
    let unsigned = normalized.strip_prefix('+').unwrap_or(&normalized);

    let (prefix, multiplier) = match unsigned.chars().last() {
        Some('K') => (&unsigned[..unsigned.len() - 1], 1_000),
        Some('M') => (&unsigned[..unsigned.len() - 1], 1_000_000),
        Some('B') => (&unsigned[..unsigned.len() - 1], 1_000_000_000),
        _ => (unsigned, 1),
    };

    if multiplier == 1 {
        let digits = strip_separators(prefix);
        if !is_digits(&digits) {
            return Err(FieldError::parse(text, "not an integer"));
        }
        return digits
            .parse::<u64>()
            .map_err(|e| FieldError::parse(text, e.to_string()));
    }

    scale_decimal(text, &strip_separators(prefix.trim()), multiplier)
}

fn strip_separators(digits: &str) -> String {
    digits.chars().filter(|c| *c != ',').collect()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `whole.frac × multiplier`, truncated, without going through floats
fn scale_decimal(input: &str, prefix: &str, multiplier: u64) -> Result<u64, FieldError> {
    let (whole, frac) = prefix.split_once('.').unwrap_or((prefix, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(FieldError::parse(input, "missing number before suffix"));
    }
    if (!whole.is_empty() && !is_digits(whole)) || (!frac.is_empty() && !is_digits(frac)) {
        return Err(FieldError::parse(input, "not a decimal number"));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|e: std::num::ParseIntError| FieldError::parse(input, e.to_string()))?
    };

    let overflow = || FieldError::parse(input, "count overflows u64");
    let mut value = whole.checked_mul(multiplier).ok_or_else(overflow)?;

    let mut place = multiplier;
    for digit in frac.bytes() {
        place /= 10;
        if place == 0 {
            break;
        }
        value = value
            .checked_add(u64::from(digit - b'0') * place)
            .ok_or_else(overflow)?;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_count("830.4K").unwrap(), 830_400);
        assert_eq!(parse_count("19.3M").unwrap(), 19_300_000);
        assert_eq!(parse_count("2B").unwrap(), 2_000_000_000);
        assert_eq!(parse_count("1.25b").unwrap(), 1_250_000_000);
    }

    #[test]
    fn test_plain_integers() {
        assert_eq!(parse_count("1,234").unwrap(), 1234);
        assert_eq!(parse_count("987").unwrap(), 987);
        assert_eq!(parse_count(" 12,345,678 ").unwrap(), 12_345_678);
    }

    #[test]
    fn test_blank_is_zero() {
        assert_eq!(parse_count("").unwrap(), 0);
        assert_eq!(parse_count("   ").unwrap(), 0);
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(parse_count("1.9999K").unwrap(), 1999);
        assert_eq!(parse_count("0.0005K").unwrap(), 0);
        assert_eq!(parse_count("1.23456789M").unwrap(), 1_234_567);
    }

    #[test]
    fn test_lowercase_and_inner_space() {
        assert_eq!(parse_count("830.4k").unwrap(), 830_400);
        assert_eq!(parse_count("5 K").unwrap(), 5_000);
        assert_eq!(parse_count(".5K").unwrap(), 500);
    }

    #[test]
    fn test_leading_plus_sign() {
        assert_eq!(parse_count("+5").unwrap(), 5);
        assert_eq!(parse_count("+1.5K").unwrap(), 1_500);
        assert!(parse_count("+").is_err());
        assert!(parse_count("++5").is_err());
    }

    #[test]
    fn test_malformed_input() {
        for input in ["K", "abc", "12.5", "1.2.3K", "-5", "4x", "1e3K", "."] {
            let err = parse_count(input).unwrap_err();
            assert!(
                matches!(err, FieldError::Parse { .. }),
                "expected parse error for {input:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(parse_count("99999999999999999999").is_err());
        assert!(parse_count("99999999999B").is_err());
    }
}
