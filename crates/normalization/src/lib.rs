//! Converts loosely-typed backend records into strict local shapes.
//!
//! Every backend payload is treated as untrusted: fields may be missing,
//! null, or carry the wrong primitive type. Each entity gets one explicit
//! normalization function that coerces field by field and silently drops
//! records that cannot be repaired. Malformed records are never an error;
//! transport-level failures are handled by the client crate instead.

use models::{
    BankTransaction, CountryTotal, Direction, ListedTransaction, MonthlyTotal, RawCategoryTotal,
    RawCountryTotal, RawMonthlyTotal, RawTransaction, TransactionLogo, TEXT_SENTINEL,
};
use serde_json::Value;

/// Numeric coercion: numbers pass through, strings keep their leading
/// number, null/absent counts as zero. A failed parse or a non-finite value
/// yields `None`, which drops the whole record at the call site.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_f64(s.trim()),
        Some(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses the longest leading decimal number, so `"12.50 CHF"` reads as
/// 12.5. A string without a leading number fails.
fn parse_leading_f64(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Direction codes arrive as numbers or numeric strings; anything else maps
/// to 0, which `Direction::from_code` treats as neither inflow nor outflow.
fn coerce_direction_code(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|v| v as i64).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(|v| v as i64).unwrap_or(0),
        _ => 0,
    }
}

fn trimmed_non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_or_sentinel(value: Option<&String>) -> String {
    trimmed_non_empty(value).unwrap_or_else(|| TEXT_SENTINEL.to_string())
}

/// Counterparty text falls back through the short-form field before the
/// sentinel.
fn counterparty_text(raw: &RawTransaction) -> String {
    trimmed_non_empty(raw.text_creditor.as_ref())
        .or_else(|| trimmed_non_empty(raw.text_short_creditor.as_ref()))
        .unwrap_or_else(|| TEXT_SENTINEL.to_string())
}

/// Monthly totals keep only records with a month identifier and finite
/// numeric fields.
pub fn normalize_monthly_totals(raw: Vec<RawMonthlyTotal>) -> Vec<MonthlyTotal> {
    raw.into_iter()
        .filter_map(|item| {
            let month = item.month.as_deref().unwrap_or("").to_string();
            if month.is_empty() {
                return None;
            }
            let total = coerce_f64(item.total.as_ref())?;
            let percentage = coerce_f64(item.percentage.as_ref())?;
            Some(MonthlyTotal {
                month,
                total,
                percentage,
            })
        })
        .collect()
}

/// Analytics/settings transaction shape: a record survives only with a value
/// date and a finite amount. Text fields degrade to the sentinel instead of
/// dropping the record.
pub fn normalize_transactions(raw: Vec<RawTransaction>) -> Vec<BankTransaction> {
    raw.into_iter()
        .filter_map(|item| {
            let value_date = item.val_date.as_deref().unwrap_or("").to_string();
            if value_date.is_empty() {
                return None;
            }
            let amount = coerce_f64(item.amount.as_ref())?;
            let direction = Direction::from_code(coerce_direction_code(item.direction.as_ref()));
            Some(BankTransaction {
                account_name: text_or_sentinel(item.account_name.as_ref()),
                counterparty: counterparty_text(&item),
                amount,
                value_date,
                direction,
            })
        })
        .collect()
}

/// Listing-page shape: stricter than the analytics shape. All five fields
/// must be non-empty after trimming; amount and direction stay string-typed
/// as delivered.
pub fn normalize_listed_transactions(raw: Vec<RawTransaction>) -> Vec<ListedTransaction> {
    raw.into_iter()
        .filter_map(|item| {
            let account_name = trimmed_non_empty(item.account_name.as_ref())?;
            let counterparty = trimmed_non_empty(item.text_creditor.as_ref())?;
            let amount = match item.amount.as_ref() {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => return None,
            };
            let value_date = item.val_date.as_deref().unwrap_or("").to_string();
            if value_date.is_empty() {
                return None;
            }
            let direction = match item.direction.as_ref() {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => return None,
            };
            let logo = item.logo.map(|logo| TransactionLogo {
                url: logo.url,
                name: logo.name,
            });
            Some(ListedTransaction {
                account_name,
                counterparty,
                amount,
                value_date,
                direction,
                logo,
            })
        })
        .collect()
}

/// Country totals need an ISO code and a finite total; a missing display
/// name falls back to the code.
pub fn normalize_country_totals(raw: Vec<RawCountryTotal>) -> Vec<CountryTotal> {
    raw.into_iter()
        .filter_map(|item| {
            let country_code = trimmed_non_empty(item.country_code.as_ref())?;
            let total = coerce_f64(item.total.as_ref())?;
            let country =
                trimmed_non_empty(item.country.as_ref()).unwrap_or_else(|| country_code.clone());
            Some(CountryTotal {
                country,
                country_code,
                total,
            })
        })
        .collect()
}

/// Category totals: name degrades to the sentinel, non-finite amounts drop
/// the record. Shares are derived later over the surviving set.
pub fn normalize_category_totals(raw: Vec<RawCategoryTotal>) -> Vec<(String, f64)> {
    raw.into_iter()
        .filter_map(|item| {
            let amount = coerce_f64(item.amount.as_ref())?;
            Some((text_or_sentinel(item.category.as_ref()), amount))
        })
        .collect()
}
