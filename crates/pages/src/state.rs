//! Shared page lifecycle primitives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use backend_client::BackendError;

/// Lifecycle of a page's data: exactly one fetch per load, no retries.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

/// Scopes an in-flight request to the lifetime of the view that issued it.
/// Once retired, any response that still arrives is dropped instead of
/// mutating page state.
#[derive(Debug, Clone, Default)]
pub struct ViewToken(Arc<AtomicBool>);

impl ViewToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retire(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_live(&self) -> bool {
        !self.0.load(Ordering::Relaxed)
    }
}

/// Transport failures render a page-specific banner text; GraphQL and decode
/// failures surface their own message.
pub fn page_error(err: BackendError, transport_text: &str) -> String {
    match err {
        BackendError::Transport(_) => transport_text.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_live_and_retires_once() {
        let token = ViewToken::new();
        assert!(token.is_live());

        let shared = token.clone();
        shared.retire();
        assert!(!token.is_live());
    }

    #[test]
    fn graphql_errors_keep_their_own_message() {
        let text = page_error(
            BackendError::Graphql("monthlyTotals unavailable".into()),
            "Failed to load analytics data",
        );
        assert_eq!(text, "monthlyTotals unavailable");
    }
}
