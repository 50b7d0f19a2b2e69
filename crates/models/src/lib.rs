use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Placeholder shown wherever a text field came back empty from the backend.
pub const TEXT_SENTINEL: &str = "—";

// Raw wire shapes. Every field is optional and loosely typed: the backend
// may send strings where numbers are expected, nulls, or drop fields
// entirely. Coercion into the strict types below happens in the
// `normalization` crate.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawMonthlyTotal {
    pub month: Option<String>,
    pub total: Option<Value>,
    pub percentage: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    #[serde(rename = "accountName")]
    pub account_name: Option<String>,
    #[serde(rename = "textCreditor")]
    pub text_creditor: Option<String>,
    #[serde(rename = "textShortCreditor")]
    pub text_short_creditor: Option<String>,
    pub amount: Option<Value>,
    #[serde(rename = "valDate")]
    pub val_date: Option<String>,
    pub direction: Option<Value>,
    pub logo: Option<RawLogo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLogo {
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCountryTotal {
    pub country: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    pub total: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCategoryTotal {
    pub category: Option<String>,
    pub amount: Option<Value>,
}

// Strict record shapes. Immutable per fetch; replaced wholesale when a page
// reloads.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
    /// Share relative to the sibling totals of the same fetch batch, as
    /// reported by the backend. Never recomputed client-side.
    pub percentage: f64,
}

/// Money movement flag on a transaction. Wire codes outside {1, 2} are
/// neither inflow nor outflow: excluded from flow totals but still counted
/// and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Inflow,
    Outflow,
    Other,
}

impl Direction {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Direction::Inflow,
            2 => Direction::Outflow,
            _ => Direction::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankTransaction {
    pub account_name: String,
    pub counterparty: String,
    pub amount: f64,
    pub value_date: String,
    pub direction: Direction,
}

/// Transaction shape used by the full listing page. Amount and direction are
/// kept string-typed as delivered (the listing renders the wire enum codes
/// `A_1`/`A_2` directly) and every text field must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedTransaction {
    pub account_name: String,
    pub counterparty: String,
    pub amount: String,
    pub value_date: String,
    pub direction: String,
    pub logo: Option<TransactionLogo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionLogo {
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryTotal {
    pub country: String,
    pub country_code: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    /// Derived share of the batch total, formatted to one decimal with a
    /// trailing percent sign.
    pub share: String,
    pub color_token: String,
}

/// Per-account rollup derived from the transaction collection; never fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account_name: String,
    pub inflow: f64,
    pub outflow: f64,
    pub transaction_count: usize,
    pub last_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

// Stored preferences. CamelCase on disk to match the persisted blob shape;
// every field defaults so a partial blob still loads.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredPreferences {
    pub account_notifications: BTreeMap<String, bool>,
    pub merchant_watchlist: BTreeMap<String, bool>,
    pub daily_limits: BTreeMap<String, f64>,
    pub preferred_account: String,
    pub security_settings: SecuritySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecuritySettings {
    pub biometric_login: bool,
    pub two_factor: bool,
    pub card_freezing: bool,
    pub location_alerts: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            biometric_login: true,
            two_factor: false,
            card_freezing: false,
            location_alerts: true,
        }
    }
}
