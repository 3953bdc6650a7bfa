//! Rendering and parsing of amounts stored as integer minor units.

pub const MAX_MINOR_UNITS: u8 = 6;

const GROUPING_SEPARATOR: char = ',';
const DECIMAL_SEPARATOR: char = '.';

/// How amounts are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormat {
    pub symbol: String,
    pub minor_units: u8,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            minor_units: 2,
        }
    }
}

impl AmountFormat {
    pub fn new(symbol: impl Into<String>, minor_units: u8) -> Self {
        Self {
            symbol: symbol.into(),
            minor_units: minor_units.min(MAX_MINOR_UNITS),
        }
    }

    pub fn format(&self, minor: i64) -> String {
        format_amount(minor, &self.symbol, self.minor_units)
    }

    pub fn parse(&self, input: &str) -> Option<i64> {
        parse_amount(input, self.minor_units)
    }
}

/// Formats `minor` as `-$1,234.50` for two decimal places.
pub fn format_amount(minor: i64, symbol: &str, minor_units: u8) -> String {
    let places = u32::from(minor_units.min(MAX_MINOR_UNITS));
    let scale = 10u64.pow(places);
    let magnitude = minor.unsigned_abs();
    let whole = group_digits(&(magnitude / scale).to_string(), GROUPING_SEPARATOR);
    let sign = if minor < 0 { "-" } else { "" };
    if places == 0 {
        format!("{}{}{}", sign, symbol, whole)
    } else {
        format!(
            "{}{}{}{}{:0width$}",
            sign,
            symbol,
            whole,
            DECIMAL_SEPARATOR,
            magnitude % scale,
            width = places as usize
        )
    }
}

/// Parses a decimal amount such as `-12.5`, `1,200` or `+3.07` into minor
/// units. Returns `None` for malformed input, more fractional digits than
/// `minor_units`, or values outside `i64`.
pub fn parse_amount(input: &str, minor_units: u8) -> Option<i64> {
    let places = u32::from(minor_units.min(MAX_MINOR_UNITS));
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let body: String = body.chars().filter(|c| *c != GROUPING_SEPARATOR).collect();
    let (whole, fraction) = match body.split_once(DECIMAL_SEPARATOR) {
        Some((whole, fraction)) => (whole, fraction),
        None => (body.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > places as usize {
        return None;
    }

    let scale = 10i64.checked_pow(places)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()?
    };
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = places as usize);
        padded.parse::<i64>().ok()?
    };
    let magnitude = whole_value.checked_mul(scale)?.checked_add(fraction_value)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
