//! Display strings for report cells. No locale handling: amounts are plain
//! fixed-decimal numbers and the currency only appears in column headers.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Full English month name for a 1-based month, or `""` when out of range.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

pub fn month_short(date: &NaiveDate) -> &'static str {
    let name = month_name(date.month());
    &name[..3]
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Integral quantities print without decimals; others drop trailing zeros.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        return format!("{quantity:.0}");
    }
    let text = format!("{quantity:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
