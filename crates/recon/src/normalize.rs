//! Cell normalization: join keys, locale-formatted amounts, dates.
//!
//! None of these fail. Unparseable amounts become 0, unparseable dates
//! pass through as text.

use abgleich_core::CellValue;
use chrono::{Days, NaiveDate};

/// Largest serial Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const CURRENCY_CODES: &[&str] = &["EUR", "USD", "GBP", "CHF"];
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£', '¥', '₣'];

/// Join key: display text, uppercased, trimmed.
pub fn normalize_order_number(cell: &CellValue) -> String {
    normalize_key(&cell.to_string())
}

pub fn normalize_key(raw: &str) -> String {
    raw.to_uppercase().trim().to_string()
}

/// Parse an amount cell. Numbers pass through; text goes through
/// [`parse_amount_str`]; anything unparseable is 0.
pub fn parse_amount(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) if n.is_finite() => *n,
        CellValue::Number(_) | CellValue::Empty => 0.0,
        CellValue::Text(s) => parse_amount_str(s).unwrap_or(0.0),
    }
}

/// Parse a locale-formatted amount string.
///
/// Accepts `1.234,56` and `1,234.56`, currency symbols/codes, `(12,50)` and
/// leading or trailing minus for negatives. When both `.` and `,` occur the
/// later one is the decimal separator. A lone separator occurring once is
/// decimal; occurring more than once it is a thousands separator.
pub fn parse_amount_str(s: &str) -> Option<f64> {
    let mut cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect::<String>()
        .to_uppercase();
    for code in CURRENCY_CODES {
        cleaned = cleaned.replace(code, "");
    }

    let mut body = cleaned.strip_prefix('\'').unwrap_or(&cleaned);
    if body.is_empty() {
        return None;
    }

    let mut negative = false;
    if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        negative = true;
        body = inner;
    }
    if let Some(rest) = body.strip_prefix('-') {
        negative = !negative;
        body = rest;
    } else if let Some(rest) = body.strip_suffix('-') {
        negative = !negative;
        body = rest;
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest;
    }

    if !body.chars().any(|c| c.is_ascii_digit())
        || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }

    let decimal = decimal_separator(body);
    let mut normalized = String::with_capacity(body.len());
    let mut seen_decimal = false;
    for c in body.chars() {
        match c {
            '0'..='9' => normalized.push(c),
            sep if Some(sep) == decimal => {
                if seen_decimal {
                    return None;
                }
                seen_decimal = true;
                normalized.push('.');
            }
            // Thousands separator
            _ => {}
        }
    }

    let value: f64 = normalized.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn decimal_separator(body: &str) -> Option<char> {
    let last_dot = body.rfind('.');
    let last_comma = body.rfind(',');
    match (last_dot, last_comma) {
        (Some(d), Some(c)) => Some(if d > c { '.' } else { ',' }),
        (Some(_), None) => (body.matches('.').count() == 1).then_some('.'),
        (None, Some(_)) => (body.matches(',').count() == 1).then_some(','),
        (None, None) => None,
    }
}

/// Date cell for display. Text passes through trimmed; numbers in the Excel
/// serial range become `YYYY-MM-DD` (1900 date system).
pub fn normalize_date(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => excel_serial_to_date(*n)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
    }
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // 1899-12-30 absorbs Excel's phantom 1900-02-29 for every serial after it
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
