//! Integer literal forms: decimal `42`, binary `#1010`, hex `X1F`/`x1f`
//!
//! Binary and hex literals are bit patterns: up to 32 digits worth of bits
//! are accepted and reinterpreted as a signed value, so `XFFFFFFFF` is `-1`.
//! A prefix with no digits is 0.

/// Digits after `#`
pub fn parse_binary_digits(digits: &str) -> Option<i32> {
    parse_bits(digits, 2)
}

/// Digits after `X`/`x`
pub fn parse_hex_digits(digits: &str) -> Option<i32> {
    parse_bits(digits, 16)
}

fn parse_bits(digits: &str, radix: u32) -> Option<i32> {
    if digits.is_empty() {
        return Some(0);
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok().map(|bits| bits as i32)
}

/// Parse exactly one literal, with an optional leading `-` on decimals
///
/// ```
/// use kodeq_expr::parse_literal;
///
/// assert_eq!(parse_literal("#1011"), Some(11));
/// assert_eq!(parse_literal("x1f"), Some(31));
/// assert_eq!(parse_literal("-12"), Some(-12));
/// assert_eq!(parse_literal("12a"), None);
/// ```
pub fn parse_literal(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Some(digits) = text.strip_prefix('#') {
        return parse_binary_digits(digits);
    }
    if let Some(digits) = text.strip_prefix(['X', 'x']) {
        return parse_hex_digits(digits);
    }
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `#` followed by at least 8 binary digits
pub fn to_binary_string(value: i32) -> String {
    format!("#{:08b}", value as u32)
}

/// `X` followed by upper-case hex digits
pub fn to_hex_string(value: i32) -> String {
    format!("X{:X}", value as u32)
}
