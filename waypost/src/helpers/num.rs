//! Permissive numeric coercion for typed path variables.
//!
//! Typed variables never reject a match: a value which does not look like a number coerces to
//! a fallback instead.

/// Parses the leading integer of `s`.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the first non-digit and a
/// value with no leading digits is `0`. Out of range values saturate.
///
/// ```rust
/// # use waypost::helpers::num::int_value;
/// assert_eq!(int_value("42"), 42);
/// assert_eq!(int_value("  -7px"), -7);
/// assert_eq!(int_value("abc"), 0);
/// ```
pub fn int_value(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Normalises `s` to a non-negative number.
///
/// The boolean words `true`, `on`, `yes` and `1` map to `1`, and `false`, `off`, `no` and `0`
/// map to `0` (case-insensitively, ignoring surrounding whitespace). Anything else is read with
/// `int_value`, and a negative result is replaced by `default`.
///
/// ```rust
/// # use waypost::helpers::num::num_value;
/// assert_eq!(num_value("Yes", 0), 1);
/// assert_eq!(num_value("off", 0), 0);
/// assert_eq!(num_value("15", 0), 15);
/// assert_eq!(num_value("-3", 0), 0);
/// ```
pub fn num_value(s: &str, default: i64) -> i64 {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => return 1,
        "0" | "false" | "off" | "no" => return 0,
        _ => (),
    }

    let n = int_value(s);
    if n >= 0 {
        n
    } else {
        default
    }
}

/// True when `s` is a decimal number: optional surrounding whitespace, an optional sign, digits
/// with at most one decimal point and an optional exponent.
pub fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);

    let (mantissa, exponent) = match s.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());

    if whole.is_empty() && fraction.is_empty() {
        return false;
    }
    if !all_digits(whole) || !all_digits(fraction) {
        return false;
    }

    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(|c| c == '+' || c == '-').unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
    }
}
