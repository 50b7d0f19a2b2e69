//! Blocking GraphQL-over-HTTP client for the finance backend.
//!
//! One POST per call, no retries, no timeout: a failed request surfaces
//! immediately and the caller decides whether to show an error banner or a
//! sample-data fallback. GraphQL errors reported alongside a 2xx status take
//! the same error path as transport failures, carrying the first reported
//! message.

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use models::{RawCategoryTotal, RawCountryTotal, RawMonthlyTotal, RawTransaction};

pub const DEFAULT_GRAPHQL_URL: &str = "http://127.0.0.1:8000/graphql/";

pub const ANALYTICS_QUERY: &str = "
  query Analytics($startDate: Date) {
    monthlyTotals {
      month
      total
      percentage
    }
    bankTransactions(startDate: $startDate) {
      accountName
      textCreditor
      textShortCreditor
      amount
      valDate
      direction
    }
  }
";

pub const MONTHLY_QUERY: &str = "
  query monthly {
    monthlyTotals {
      month
      total
      percentage
    }
  }
";

pub const COUNTRIES_QUERY: &str = "
  query countries {
    totalsByCountry {
      country
      countryCode
      total
    }
  }
";

pub const CATEGORIES_QUERY: &str = "
  query categories {
    totalsByCategory {
      category
      amount
    }
  }
";

pub const TRANSACTIONS_QUERY: &str = "
  query Transaction {
    bankTransactions(accountName: \"\") {
      accountName
      textCreditor
      amount
      valDate
      direction
      logo {
        url
        name
      }
    }
  }
";

pub const SETTINGS_QUERY: &str = "
  query Settings {
    bankTransactions {
      accountName
      textCreditor
      textShortCreditor
      amount
      valDate
      direction
    }
  }
";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Network failure or non-2xx HTTP status.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered 2xx but reported errors in the envelope.
    #[error("{0}")]
    Graphql(String),
    /// The envelope decoded but a data field had an unusable shape.
    #[error("backend returned an unreadable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Raw lists as one analytics fetch delivers them.
#[derive(Debug, Default)]
pub struct AnalyticsPayload {
    pub monthly_totals: Vec<RawMonthlyTotal>,
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: Client,
    endpoint: Url,
}

impl GraphqlClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid GraphQL endpoint URL: {endpoint}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, endpoint })
    }

    /// Reads the endpoint from `KONTOBLICK_GRAPHQL_URL`, defaulting to the
    /// local backend.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("KONTOBLICK_GRAPHQL_URL")
            .unwrap_or_else(|_| DEFAULT_GRAPHQL_URL.to_string());
        Self::new(&endpoint)
    }

    /// Posts one query document and returns the `data` object. GraphQL
    /// errors on a 2xx response are promoted to `BackendError::Graphql`
    /// with the first reported message.
    pub fn execute(&self, query: &str, variables: Option<Value>) -> Result<Value, BackendError> {
        let mut body = json!({ "query": query });
        if let Some(variables) = variables {
            body["variables"] = variables;
        }

        let envelope: GraphqlEnvelope = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(first) = envelope.errors.first() {
            let message = first
                .message
                .clone()
                .unwrap_or_else(|| "Unexpected GraphQL error".to_string());
            return Err(BackendError::Graphql(message));
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }

    pub fn fetch_analytics(&self, start_date: &str) -> Result<AnalyticsPayload, BackendError> {
        let data = self.execute(
            ANALYTICS_QUERY,
            Some(json!({ "startDate": start_date })),
        )?;
        Ok(AnalyticsPayload {
            monthly_totals: list_field(&data, "monthlyTotals")?,
            transactions: list_field(&data, "bankTransactions")?,
        })
    }

    pub fn fetch_monthly_totals(&self) -> Result<Vec<RawMonthlyTotal>, BackendError> {
        let data = self.execute(MONTHLY_QUERY, None)?;
        list_field(&data, "monthlyTotals")
    }

    pub fn fetch_country_totals(&self) -> Result<Vec<RawCountryTotal>, BackendError> {
        let data = self.execute(COUNTRIES_QUERY, None)?;
        list_field(&data, "totalsByCountry")
    }

    pub fn fetch_category_totals(&self) -> Result<Vec<RawCategoryTotal>, BackendError> {
        let data = self.execute(CATEGORIES_QUERY, None)?;
        list_field(&data, "totalsByCategory")
    }

    pub fn fetch_transaction_listing(&self) -> Result<Vec<RawTransaction>, BackendError> {
        let data = self.execute(TRANSACTIONS_QUERY, None)?;
        list_field(&data, "bankTransactions")
    }

    pub fn fetch_settings_transactions(&self) -> Result<Vec<RawTransaction>, BackendError> {
        let data = self.execute(SETTINGS_QUERY, None)?;
        list_field(&data, "bankTransactions")
    }
}

/// A missing or non-array field decodes to an empty list; only a malformed
/// array is an error.
fn list_field<T: DeserializeOwned>(data: &Value, field: &str) -> Result<Vec<T>, BackendError> {
    match data.get(field) {
        Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value.clone())?),
        _ => Ok(Vec::new()),
    }
}

/// Start date for the rolling analytics window: today minus three calendar
/// months, day-of-month clamped, formatted `YYYY-MM-DD`.
pub fn analytics_start_date(today: NaiveDate) -> String {
    today
        .checked_sub_months(Months::new(3))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}
