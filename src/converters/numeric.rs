//! Permissive numeric parsing
//!
//! Only the leading numeric run of the text is read, so `"42 items"` is 42.
//! Text without such a run yields `NaN` rather than an error.

/// Parse a leading base-10 integer, skipping leading whitespace
pub fn parse_int_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return f64::NAN;
    }

    let value = rest[..digits]
        .bytes()
        .fold(0f64, |acc, b| acc * 10.0 + f64::from(b - b'0'));

    if negative {
        -value
    } else {
        value
    }
}

/// Parse a leading decimal number (fraction, exponent, `Infinity`), skipping leading whitespace
pub fn parse_float_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);

    if rest.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = rest.as_bytes();
    let mut end = 0;

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    match rest[..end].parse::<f64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => f64::NAN,
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_prefix() {
        assert_eq!(parse_int_prefix("42"), 42.0);
        assert_eq!(parse_int_prefix("  -17 apples"), -17.0);
        assert_eq!(parse_int_prefix("+8"), 8.0);
        assert_eq!(parse_int_prefix("3.99"), 3.0);
        assert_eq!(parse_int_prefix("1e3"), 1.0);
        assert_eq!(parse_int_prefix("007"), 7.0);
        assert_eq!(parse_int_prefix("0x1F"), 0.0);
    }

    #[test]
    fn test_int_nan_sentinel() {
        assert!(parse_int_prefix("").is_nan());
        assert!(parse_int_prefix("abc").is_nan());
        assert!(parse_int_prefix("$5").is_nan());
        assert!(parse_int_prefix("-").is_nan());
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("2.75abc"), 2.75);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("5."), 5.0);
        assert_eq!(parse_float_prefix("-2.5e2kg"), -250.0);
        assert_eq!(parse_float_prefix("1e"), 1.0);
        assert_eq!(parse_float_prefix("1e+"), 1.0);
        assert_eq!(parse_float_prefix("  19.99 EUR"), 19.99);
        assert_eq!(parse_float_prefix("Infinity"), f64::INFINITY);
        assert_eq!(parse_float_prefix("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_float_nan_sentinel() {
        assert!(parse_float_prefix("").is_nan());
        assert!(parse_float_prefix(".").is_nan());
        assert!(parse_float_prefix("€1.50").is_nan());
        assert!(parse_float_prefix("e5").is_nan());
    }
}
