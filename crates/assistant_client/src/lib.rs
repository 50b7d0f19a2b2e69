//! Client for the chat endpoint plus the reply decomposer.
//!
//! The assistant answers with one JSON envelope; the decomposer fans it out
//! into an ordered list of chat bubbles: the free-text message first, then
//! income, expenses, query results and advisor notes, each as its own
//! message. Only when nothing at all was produced does the status decide a
//! fallback line.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use models::{ChatMessage, ChatRole};
use utils::format_amount_de_ch;

pub const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:8000/chat/";

/// Opening message every transcript starts with.
pub const GREETING: &str =
    "Hallöchen! Ich bin Clanky, dein gut gelaunter Finanz-Kumpel der SGKB. Was liegt an?";

/// Quick prompts offered above the transcript.
pub const SUGGESTIONS: [&str; 5] = [
    "Zeig mir meine höchsten Ausgaben im letzten Monat",
    "Welche Abos kosten mich jeden Monat Geld?",
    "Wie viel habe ich für Reisen in 2024 ausgegeben?",
    "Welche Einnahmen hatte ich im August?",
    "Gibt es ungewohnte Ausgaben in den letzten 14 Tagen?",
];

const SEND_FAILURE_TEXT: &str = "Der Assistent konnte nicht antworten.";
const NO_RESULTS_TEXT: &str =
    "Ich habe keine passenden Transaktionen gefunden. Probier gern einen anderen Zeitraum.";
const NO_DESCRIPTION_TEXT: &str = "(ohne Beschreibung)";
const UNKNOWN_ACCOUNT_TEXT: &str = "Unbekanntes Konto";

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// One renderable section of an assistant reply, in transcript order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBlock {
    Income(Vec<Value>),
    Expenses(Vec<Value>),
    QueryResult {
        rows: Vec<Value>,
        total: Value,
        /// Whether the rows arrived nested under `db_result` or at the top
        /// level of `data`.
        wrapped: bool,
    },
    Advisor(AdvisorOutput),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisorOutput {
    pub recommendation: Option<String>,
    pub key_insights: Vec<Value>,
    pub evidence: Vec<Value>,
    pub caveats: Vec<Value>,
}

static MESSAGE_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn next_message_id() -> String {
    format!("msg-{}", MESSAGE_COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub fn assistant_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage {
        id: next_message_id(),
        role: ChatRole::Assistant,
        content: content.into(),
    }
}

pub fn user_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage {
        id: next_message_id(),
        role: ChatRole::User,
        content: content.into(),
    }
}

/// Splits `data` into ordered blocks. Unknown keys classify to nothing.
pub fn classify(data: Option<&Value>) -> Vec<ReplyBlock> {
    let Some(data) = data else {
        return Vec::new();
    };

    let mut blocks = Vec::new();

    if let Some(rows) = non_empty_array(data.get("einnahmen")) {
        blocks.push(ReplyBlock::Income(rows));
    }
    if let Some(rows) = non_empty_array(data.get("ausgaben")) {
        blocks.push(ReplyBlock::Expenses(rows));
    }

    let db_result = data.get("db_result").filter(|v| !v.is_null());
    if let Some(db_result) = db_result {
        if let (Some(Value::Array(rows)), Some(total)) =
            (db_result.get("rows"), db_result.get("total"))
        {
            blocks.push(ReplyBlock::QueryResult {
                rows: rows.clone(),
                total: total.clone(),
                wrapped: true,
            });
        }
    } else if let (Some(Value::Array(rows)), Some(total)) =
        (data.get("rows"), data.get("total"))
    {
        blocks.push(ReplyBlock::QueryResult {
            rows: rows.clone(),
            total: total.clone(),
            wrapped: false,
        });
    }

    if let Some(advisor) = data.get("advisor_output").filter(|v| v.is_object()) {
        blocks.push(ReplyBlock::Advisor(AdvisorOutput {
            recommendation: advisor
                .get("recommendation")
                .and_then(|v| non_empty_display(v)),
            key_insights: array_or_empty(advisor.get("key_insights")),
            evidence: array_or_empty(advisor.get("evidence")),
            caveats: array_or_empty(advisor.get("caveats")),
        }));
    }

    blocks
}

/// Renders one envelope into assistant chat bubbles.
pub fn decompose(payload: &AssistantResponse) -> Vec<ChatMessage> {
    let mut out = Vec::new();

    let message = payload.message.trim();
    if !message.is_empty() {
        out.push(assistant_message(message));
    }

    for block in classify(payload.data.as_ref()) {
        match block {
            ReplyBlock::Income(rows) => {
                out.push(assistant_message("Hier ist die Übersicht deiner Einnahmen:"));
                push_rows(&mut out, &rows);
                if rows.len() > 5 {
                    out.push(assistant_message(format!(
                        "… plus {} weitere Einnahmen im Hintergrund. Sag Bescheid, wenn ich alle auflisten soll!",
                        rows.len() - 5
                    )));
                }
            }
            ReplyBlock::Expenses(rows) => {
                out.push(assistant_message(
                    "Und hier die größten Ausgaben, frisch aus dem Kontobuch:",
                ));
                push_rows(&mut out, &rows);
                if rows.len() > 5 {
                    out.push(assistant_message(format!(
                        "… und noch {} weitere Ausgaben warten auf dich.",
                        rows.len() - 5
                    )));
                }
            }
            ReplyBlock::QueryResult { rows, total, wrapped } => {
                if wrapped {
                    out.push(assistant_message(count_header(&total)));
                    push_rows(&mut out, &rows);
                    if rows.len() > 5 {
                        out.push(assistant_message(format!(
                            "… plus {} weitere Datensätze im Gesamtpaket.",
                            rows.len() - 5
                        )));
                    }
                } else {
                    // Top-level rows only announce themselves when the
                    // transcript is still empty.
                    if out.is_empty() {
                        out.push(assistant_message(count_header(&total)));
                    }
                    push_rows(&mut out, &rows);
                }
            }
            ReplyBlock::Advisor(advisor) => {
                if let Some(recommendation) = advisor.recommendation {
                    out.push(assistant_message(recommendation));
                }
                for insight in &advisor.key_insights {
                    out.push(assistant_message(format!("• {}", display_value(insight))));
                }
                if !advisor.evidence.is_empty() {
                    out.push(assistant_message("Nachweise / Zahlenbasis:"));
                    for item in &advisor.evidence {
                        out.push(assistant_message(format!("   ↳ {}", display_value(item))));
                    }
                }
                if !advisor.caveats.is_empty() {
                    out.push(assistant_message("Hinweise:"));
                    for item in &advisor.caveats {
                        out.push(assistant_message(format!("   ⚠️ {}", display_value(item))));
                    }
                }
            }
        }
    }

    if out.is_empty() {
        let fallback = match payload.status.as_str() {
            "success" => "Alles erledigt – jederzeit gerne wieder!",
            "clarification_required" => {
                "Magst du mir noch etwas genauer beschreiben, was du brauchst?"
            }
            "rejected" => {
                "Das darf ich leider nicht anstoßen, aber ich helfe dir gern bei etwas anderem!"
            }
            _ => "Ups, da ist mir ein Fehler passiert. Probier es bitte gleich nochmal.",
        };
        out.push(assistant_message(fallback));
    }

    out
}

fn push_rows(out: &mut Vec<ChatMessage>, rows: &[Value]) {
    for (index, row) in rows.iter().take(5).enumerate() {
        out.push(assistant_message(format_row(row, index + 1)));
    }
}

fn count_header(total: &Value) -> String {
    if total.as_f64() == Some(0.0) {
        return NO_RESULTS_TEXT.to_string();
    }
    let suffix = if total.as_f64() == Some(1.0) { "" } else { "en" };
    format!(
        "Ich habe {} passende Transaktion{} gefunden. Hier ein kurzer Auszug:",
        display_value(total),
        suffix
    )
}

/// Renders one transaction record as a three-line bubble.
pub fn format_row(entry: &Value, index: usize) -> String {
    let amount = match entry.get("amount") {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(format_amount_de_ch)
            .unwrap_or_else(|| "-".to_string()),
        Some(Value::String(s)) => s.clone(),
        _ => "-".to_string(),
    };
    let currency = field(entry, &["trx_curry_name", "trxCurryName"])
        .unwrap_or_else(|| "CHF".to_string());
    let direction = field(entry, &["direction"]).unwrap_or_default();
    let arrow = match direction.as_str() {
        "1" => "⬆",
        "2" => "⬇",
        _ => "•",
    };
    let date = field(entry, &["val_date", "valDate"]).unwrap_or_else(|| "?".to_string());
    let raw_description = field(
        entry,
        &["text_creditor", "textCreditor", "text_debitor", "textDebitor"],
    )
    .unwrap_or_default();
    let description = clean_description(&raw_description);
    let account_raw = field(entry, &["account_name", "accountName"])
        .unwrap_or_else(|| UNKNOWN_ACCOUNT_TEXT.to_string());
    let account = shorten_account(&account_raw);

    format!("{index}. {date} • {arrow} {amount} {currency}\n{description}\nKonto: {account}")
}

static PHONE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+\d{6,}").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static SPACE_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());
static SPACE_AFTER_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s+").unwrap());

/// Strips booking noise from a creditor/debitor text: everything from the
/// first parenthesis or embedded phone number on, collapsed whitespace and
/// normalized comma spacing. Idempotent.
pub fn clean_description(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NO_DESCRIPTION_TEXT.to_string();
    }
    let without_account = trimmed.split('(').next().unwrap_or("");
    let without_phone = match PHONE_TAIL.find(without_account) {
        Some(m) => &without_account[..m.start()],
        None => without_account,
    };
    let collapsed = WHITESPACE_RUN.replace_all(without_phone, " ");
    let collapsed = SPACE_BEFORE_COMMA.replace_all(&collapsed, ",");
    let collapsed = SPACE_AFTER_COMMA.replace_all(&collapsed, ", ");
    // The parenthesis cut can leave a dangling space; trim so a second pass
    // is a no-op.
    let cleaned = collapsed.trim();
    if cleaned.is_empty() {
        NO_DESCRIPTION_TEXT.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Keeps the segment before the first `/`; a blank first segment falls back
/// to the full name.
pub fn shorten_account(account: &str) -> String {
    let first = account.split('/').next().unwrap_or("").trim();
    if first.is_empty() {
        account.to_string()
    } else {
        first.to_string()
    }
}

fn field(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find(|v| !v.is_null())
        .map(display_value)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn non_empty_display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(display_value(other)),
    }
}

fn non_empty_array(value: Option<&Value>) -> Option<Vec<Value>> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.clone()),
        _ => None,
    }
}

fn array_or_empty(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: Client,
    endpoint: Url,
}

impl AssistantClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid chat endpoint URL: {endpoint}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, endpoint })
    }

    /// Reads the endpoint from `KONTOBLICK_CHAT_URL`, defaulting to the
    /// local backend.
    pub fn from_env() -> Result<Self> {
        let endpoint =
            std::env::var("KONTOBLICK_CHAT_URL").unwrap_or_else(|_| DEFAULT_CHAT_URL.to_string());
        Self::new(&endpoint)
    }

    /// Posts the message with the full transcript. A non-2xx answer becomes
    /// an error carrying the payload's own message when one was sent.
    pub fn send(&self, message: &str, history: &[ChatMessage]) -> Result<AssistantResponse> {
        let history: Vec<Value> = history
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "message": message, "history": history }))
            .send()
            .context("Failed to reach the assistant")?;

        let ok = response.status().is_success();
        let payload: AssistantResponse = match response.json() {
            Ok(payload) => payload,
            Err(_) if !ok => return Err(anyhow!(SEND_FAILURE_TEXT)),
            Err(err) => return Err(err).context("Failed to decode the assistant reply"),
        };

        if !ok {
            let message = if payload.message.is_empty() {
                SEND_FAILURE_TEXT.to_string()
            } else {
                payload.message
            };
            return Err(anyhow!(message));
        }

        Ok(payload)
    }
}

/// A running transcript: greeting seeded up front, one user bubble per sent
/// draft, assistant bubbles appended from the decomposed reply. Failures are
/// folded into the transcript the same way the reply would be.
pub struct ChatSession {
    client: AssistantClient,
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
}

impl ChatSession {
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            messages: vec![assistant_message(GREETING)],
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Sends one draft. Blank drafts are ignored. Returns the assistant
    /// messages appended by this exchange.
    pub fn send(&mut self, draft: &str) -> Vec<ChatMessage> {
        let trimmed = draft.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        self.messages.push(user_message(trimmed));
        self.last_error = None;

        let appended = match self.client.send(trimmed, &self.messages) {
            Ok(payload) => decompose(&payload),
            Err(err) => {
                let text = err.to_string();
                self.last_error = Some(text.clone());
                vec![assistant_message(format!(
                    "Oh nein, da hat etwas nicht geklappt: {text}"
                ))]
            }
        };

        self.messages.extend(appended.clone());
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(status: &str, message: &str, data: Option<Value>) -> AssistantResponse {
        AssistantResponse {
            status: status.to_string(),
            message: message.to_string(),
            data,
        }
    }

    fn contents(messages: &[ChatMessage]) -> Vec<String> {
        messages.iter().map(|m| m.content.clone()).collect()
    }

    #[test]
    fn message_only_when_income_list_is_empty() {
        let reply = decompose(&payload(
            "success",
            "Hier dein Überblick.",
            Some(json!({ "einnahmen": [] })),
        ));
        assert_eq!(contents(&reply), vec!["Hier dein Überblick."]);
    }

    #[test]
    fn rejected_status_without_content_uses_fallback() {
        let reply = decompose(&payload("rejected", "  ", None));
        assert_eq!(
            contents(&reply),
            vec!["Das darf ich leider nicht anstoßen, aber ich helfe dir gern bei etwas anderem!"]
        );
    }

    #[test]
    fn unknown_status_without_content_uses_generic_fallback() {
        let reply = decompose(&payload("partial", "", Some(json!({ "other": 1 }))));
        assert_eq!(
            contents(&reply),
            vec!["Ups, da ist mir ein Fehler passiert. Probier es bitte gleich nochmal."]
        );
    }

    #[test]
    fn income_block_caps_rows_and_reports_overflow() {
        let rows: Vec<Value> = (1..=7)
            .map(|i| json!({ "amount": i, "val_date": "2025-01-01", "direction": 1 }))
            .collect();
        let reply = decompose(&payload("success", "", Some(json!({ "einnahmen": rows }))));

        let texts = contents(&reply);
        assert_eq!(texts.len(), 7);
        assert_eq!(texts[0], "Hier ist die Übersicht deiner Einnahmen:");
        assert!(texts[1].starts_with("1. 2025-01-01 • ⬆"));
        assert!(texts[5].starts_with("5. "));
        assert_eq!(
            texts[6],
            "… plus 2 weitere Einnahmen im Hintergrund. Sag Bescheid, wenn ich alle auflisten soll!"
        );
    }

    #[test]
    fn expenses_overflow_uses_its_own_text() {
        let rows: Vec<Value> = (1..=6).map(|i| json!({ "amount": i })).collect();
        let reply = decompose(&payload("success", "", Some(json!({ "ausgaben": rows }))));
        assert_eq!(
            reply.last().unwrap().content,
            "… und noch 1 weitere Ausgaben warten auf dich."
        );
    }

    #[test]
    fn wrapped_query_result_with_zero_total() {
        let reply = decompose(&payload(
            "success",
            "",
            Some(json!({ "db_result": { "rows": [], "total": 0 } })),
        ));
        assert_eq!(
            contents(&reply),
            vec!["Ich habe keine passenden Transaktionen gefunden. Probier gern einen anderen Zeitraum."]
        );
    }

    #[test]
    fn wrapped_query_result_singular_and_plural_headers() {
        let one = decompose(&payload(
            "success",
            "",
            Some(json!({ "db_result": { "rows": [{ "amount": 5 }], "total": 1 } })),
        ));
        assert_eq!(
            one[0].content,
            "Ich habe 1 passende Transaktion gefunden. Hier ein kurzer Auszug:"
        );

        let many = decompose(&payload(
            "success",
            "",
            Some(json!({ "db_result": { "rows": [{ "amount": 5 }], "total": 12 } })),
        ));
        assert_eq!(
            many[0].content,
            "Ich habe 12 passende Transaktionen gefunden. Hier ein kurzer Auszug:"
        );
    }

    #[test]
    fn wrapped_query_result_reports_overflow() {
        let rows: Vec<Value> = (1..=9).map(|i| json!({ "amount": i })).collect();
        let reply = decompose(&payload(
            "success",
            "",
            Some(json!({ "db_result": { "rows": rows, "total": 9 } })),
        ));
        assert_eq!(
            reply.last().unwrap().content,
            "… plus 4 weitere Datensätze im Gesamtpaket."
        );
    }

    #[test]
    fn top_level_rows_skip_header_after_message_and_never_overflow() {
        let rows: Vec<Value> = (1..=7).map(|i| json!({ "amount": i })).collect();
        let reply = decompose(&payload(
            "success",
            "Gefunden!",
            Some(json!({ "rows": rows, "total": 7 })),
        ));

        let texts = contents(&reply);
        assert_eq!(texts.len(), 6);
        assert_eq!(texts[0], "Gefunden!");
        assert!(texts[1].starts_with("1. "));
        assert!(texts[5].starts_with("5. "));
    }

    #[test]
    fn top_level_rows_announce_themselves_on_an_empty_transcript() {
        let reply = decompose(&payload(
            "success",
            "",
            Some(json!({ "rows": [{ "amount": 3 }], "total": 1 })),
        ));
        assert_eq!(
            reply[0].content,
            "Ich habe 1 passende Transaktion gefunden. Hier ein kurzer Auszug:"
        );
        assert_eq!(reply.len(), 2);
    }

    #[test]
    fn advisor_sections_render_in_order() {
        let reply = decompose(&payload(
            "success",
            "",
            Some(json!({
                "advisor_output": {
                    "recommendation": "Leg monatlich 200 CHF zurück.",
                    "key_insights": ["Fixkosten stabil", "Reisen teuer"],
                    "evidence": ["CHF 1'200 Reisen im Q2"],
                    "caveats": ["Schätzung ohne Bargeld"]
                }
            })),
        ));

        assert_eq!(
            contents(&reply),
            vec![
                "Leg monatlich 200 CHF zurück.",
                "• Fixkosten stabil",
                "• Reisen teuer",
                "Nachweise / Zahlenbasis:",
                "   ↳ CHF 1'200 Reisen im Q2",
                "Hinweise:",
                "   ⚠️ Schätzung ohne Bargeld",
            ]
        );
    }

    #[test]
    fn row_formatting_fills_every_fallback() {
        let row = json!({});
        assert_eq!(
            format_row(&row, 3),
            "3. ? • • - CHF\n(ohne Beschreibung)\nKonto: Unbekanntes Konto"
        );
    }

    #[test]
    fn row_formatting_with_full_record() {
        let row = json!({
            "amount": 1234.5,
            "trx_curry_name": "EUR",
            "direction": 2,
            "val_date": "2025-08-01",
            "text_creditor": "Migros Bahnhof, Zug(Karte 1234)",
            "account_name": "Privatkonto / CH12 3456"
        });
        assert_eq!(
            format_row(&row, 1),
            "1. 2025-08-01 • ⬇ 1'234.50 EUR\nMigros Bahnhof, Zug\nKonto: Privatkonto"
        );
    }

    #[test]
    fn description_cleanup_strips_parentheses_and_phone_numbers() {
        assert_eq!(clean_description("Twint+41791234567 Ref 99"), "Twint");
        assert_eq!(
            clean_description("Migros  Bahnhof (Karte 1234)"),
            "Migros Bahnhof"
        );
    }

    #[test]
    fn description_cleanup_is_idempotent() {
        let cases = [
            ("Coop   Pronto,  St. Gallen", "Coop Pronto, St. Gallen"),
            ("Miete , Wohnung", "Miete, Wohnung"),
            ("Migros Bahnhof (Karte 1234)", "Migros Bahnhof"),
            ("TWINT  +41791234567 Zahlung", "TWINT"),
            ("   ", "(ohne Beschreibung)"),
            ("(nur Klammern)", "(ohne Beschreibung)"),
        ];
        for (input, expected) in cases {
            let once = clean_description(input);
            assert_eq!(once, expected);
            assert_eq!(clean_description(&once), expected);
        }
    }

    #[test]
    fn account_shortening_keeps_segment_before_slash() {
        assert_eq!(shorten_account("Sparkonto / CH99"), "Sparkonto");
        assert_eq!(shorten_account("Sparkonto"), "Sparkonto");
        assert_eq!(shorten_account(" / CH99"), " / CH99");
    }

    #[test]
    fn send_surfaces_payload_message_on_failure_status() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"rejected","message":"Zu viele Anfragen."}"#)
            .create();

        let client = AssistantClient::new(&server.url()).unwrap();
        let err = client.send("Hallo", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Zu viele Anfragen.");
    }

    #[test]
    fn send_uses_fixed_text_when_failure_has_no_message() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/").with_status(500).create();

        let client = AssistantClient::new(&server.url()).unwrap();
        let err = client.send("Hallo", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Der Assistent konnte nicht antworten.");
    }

    #[test]
    fn session_folds_failures_into_the_transcript() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/").with_status(500).create();

        let client = AssistantClient::new(&server.url()).unwrap();
        let mut session = ChatSession::new(client);
        assert_eq!(session.messages()[0].content, GREETING);

        let appended = session.send("Wie viel habe ich ausgegeben?");
        assert_eq!(appended.len(), 1);
        assert_eq!(
            appended[0].content,
            "Oh nein, da hat etwas nicht geklappt: Der Assistent konnte nicht antworten."
        );
        assert_eq!(session.messages().len(), 3);
        assert_eq!(
            session.last_error(),
            Some("Der Assistent konnte nicht antworten.")
        );
    }

    #[test]
    fn session_ignores_blank_drafts() {
        let client = AssistantClient::new("http://127.0.0.1:9").unwrap();
        let mut session = ChatSession::new(client);
        assert!(session.send("   ").is_empty());
        assert_eq!(session.messages().len(), 1);
    }
}
