//! Display formatting helpers shared by the page controllers and the chat
//! formatter. All functions are pure; parse failures fall back to the raw
//! input instead of erroring.

use chrono::{Datelike, NaiveDate};

/// Parses the date part of an ISO string (`YYYY-MM-DD`, `YYYY-MM`, or a full
/// datetime; anything after `T` is ignored).
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value).trim();
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Some(date);
    }
    // Monthly totals arrive as YYYY-MM; anchor them to the first.
    NaiveDate::parse_from_str(&format!("{date_part}-01"), "%Y-%m-%d").ok()
}

/// CHF currency display, e.g. `CHF 1,234.56` / `-CHF 1,234.56`.
pub fn format_chf(value: f64) -> String {
    let grouped = group_two_decimals(value.abs(), ',');
    if value < 0.0 && grouped != "0.00" {
        format!("-CHF {grouped}")
    } else {
        format!("CHF {grouped}")
    }
}

/// Plain de-CH amount with apostrophe grouping, e.g. `1'234.56`.
pub fn format_amount_de_ch(value: f64) -> String {
    let grouped = group_two_decimals(value.abs(), '\'');
    if value < 0.0 && grouped != "0.00" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Short chart label, e.g. `Sep 25`. Unparseable input is returned as-is.
pub fn format_month_label(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => format!("{} {:02}", month_abbrev(date.month()), date.year() % 100),
        None => value.to_string(),
    }
}

/// Day-month-year display, e.g. `05 Sep 2025`. Unparseable input is returned
/// as-is.
pub fn format_day_date(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => format!(
            "{:02} {} {}",
            date.day(),
            month_abbrev(date.month()),
            date.year()
        ),
        None => value.to_string(),
    }
}

fn month_abbrev(month: u32) -> &'static str {
    const ABBREVS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    ABBREVS[(month as usize - 1) % 12]
}

fn group_two_decimals(value: f64, separator: char) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    format!("{grouped}.{frac:02}")
}
