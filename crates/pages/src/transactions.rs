//! Full transaction listing page. Stricter than the analytics view: records
//! missing any display field are excluded rather than padded with
//! placeholders.

use tracing::debug;

use models::ListedTransaction;
use normalization::normalize_listed_transactions;

use crate::state::{page_error, PageState, ViewToken};
use crate::BackendApi;

const TRANSPORT_ERROR_TEXT: &str = "Failed to fetch transactions";

pub struct TransactionsPage {
    token: ViewToken,
    pub state: PageState<Vec<ListedTransaction>>,
}

impl Default for TransactionsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsPage {
    pub fn new() -> Self {
        Self {
            token: ViewToken::new(),
            state: PageState::Loading,
        }
    }

    pub fn token(&self) -> ViewToken {
        self.token.clone()
    }

    pub fn load(&mut self, backend: &impl BackendApi) {
        let token = self.token.clone();
        let result = backend.transaction_listing();

        if !token.is_live() {
            debug!("listing response arrived for a retired view, discarding");
            return;
        }

        self.state = match result {
            Ok(raw) => PageState::Ready(normalize_listed_transactions(raw)),
            Err(err) => PageState::Failed(page_error(err, TRANSPORT_ERROR_TEXT)),
        };
    }
}

/// Avatar fallback when a transaction has no logo: first letters of the
/// first two words, uppercased.
pub fn initials(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "?".to_string();
    }
    let letters: String = trimmed
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::StubBackend;
    use serde_json::json;

    #[test]
    fn load_keeps_only_complete_records() {
        let backend = StubBackend::new().with_listing(json!([
            {"accountName": "Privatkonto / CH93", "textCreditor": "Migros", "amount": "12.50", "valDate": "2025-09-01", "direction": "A_2", "logo": {"url": "https://logo.example/m.png", "name": "Migros"}},
            {"accountName": "", "textCreditor": "Coop", "amount": "8", "valDate": "2025-09-02", "direction": "A_2"}
        ]));

        let mut page = TransactionsPage::new();
        page.load(&backend);

        let listed = page.state.ready().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].direction, "A_2");
        assert_eq!(listed[0].logo.as_ref().unwrap().name.as_deref(), Some("Migros"));
    }

    #[test]
    fn failures_surface_with_their_message() {
        let mut page = TransactionsPage::new();
        page.load(&StubBackend::failing("bankTransactions unavailable"));
        assert_eq!(page.state.error(), Some("bankTransactions unavailable"));
    }

    #[test]
    fn initials_take_the_first_two_words() {
        assert_eq!(initials("Migros Bahnhof"), "MB");
        assert_eq!(initials("  coop  "), "C");
        assert_eq!(initials("Zürcher Kantonal Bank"), "ZK");
        assert_eq!(initials(""), "?");
        assert_eq!(initials("   "), "?");
    }
}
