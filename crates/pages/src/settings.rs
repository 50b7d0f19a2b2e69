//! Settings page controller: account and merchant insights derived from the
//! full transaction history, plus the durable preference state.
//!
//! Preferences are seeded from the fetched data the first time a section is
//! empty, then flushed wholesale on every mutation.

use anyhow::Result;
use tracing::{debug, warn};

use ::analytics::{
    account_summaries, default_account_notifications, default_merchant_watchlist,
    latest_activity, suggested_daily_limits, top_merchants, unique_accounts,
};
use models::{AccountSummary, BankTransaction, SecuritySettings, StoredPreferences};
use normalization::normalize_transactions;
use preferences::PreferencesStore;

use crate::state::{page_error, PageState, ViewToken};
use crate::BackendApi;

const TRANSPORT_ERROR_TEXT: &str = "Failed to load settings data";
const SAVE_FEEDBACK_TEXT: &str = "Preferences saved successfully.";

#[derive(Debug, Clone)]
pub struct SettingsView {
    pub transactions: Vec<BankTransaction>,
    /// Distinct account names, sorted, sentinel excluded.
    pub accounts: Vec<String>,
    /// Ranked by outflow, descending.
    pub summaries: Vec<AccountSummary>,
    /// Top six outflow merchants.
    pub top_merchants: Vec<(String, f64)>,
    pub latest_activity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityToggle {
    BiometricLogin,
    TwoFactor,
    CardFreezing,
    LocationAlerts,
}

pub struct SettingsPage {
    token: ViewToken,
    store: PreferencesStore,
    pub state: PageState<SettingsView>,
    pub preferences: StoredPreferences,
    feedback: Option<String>,
}

impl SettingsPage {
    pub fn new(store: PreferencesStore) -> Self {
        let preferences = store.load();
        Self {
            token: ViewToken::new(),
            store,
            state: PageState::Loading,
            preferences,
            feedback: None,
        }
    }

    pub fn token(&self) -> ViewToken {
        self.token.clone()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    pub fn load(&mut self, backend: &impl BackendApi) {
        let token = self.token.clone();
        let result = backend.settings_transactions();

        if !token.is_live() {
            debug!("settings response arrived for a retired view, discarding");
            return;
        }

        self.state = match result {
            Ok(raw) => {
                let transactions = normalize_transactions(raw);
                let view = SettingsView {
                    accounts: unique_accounts(&transactions),
                    summaries: account_summaries(&transactions),
                    top_merchants: top_merchants(&transactions, 6),
                    latest_activity: latest_activity(&transactions),
                    transactions,
                };
                self.seed_defaults(&view);
                PageState::Ready(view)
            }
            Err(err) => PageState::Failed(page_error(err, TRANSPORT_ERROR_TEXT)),
        };
    }

    /// Fills empty preference sections from the fetched data. Sections the
    /// user already touched are left alone.
    fn seed_defaults(&mut self, view: &SettingsView) {
        let mut changed = false;

        if self.preferences.account_notifications.is_empty() && !view.accounts.is_empty() {
            self.preferences.account_notifications =
                default_account_notifications(&view.accounts);
            changed = true;
        }
        if self.preferences.preferred_account.is_empty() {
            if let Some(first) = view.accounts.first() {
                self.preferences.preferred_account = first.clone();
                changed = true;
            }
        }
        if self.preferences.merchant_watchlist.is_empty() && !view.top_merchants.is_empty() {
            self.preferences.merchant_watchlist =
                default_merchant_watchlist(&view.top_merchants);
            changed = true;
        }
        if self.preferences.daily_limits.is_empty() && !view.summaries.is_empty() {
            self.preferences.daily_limits = suggested_daily_limits(&view.summaries);
            changed = true;
        }

        if changed {
            if let Err(err) = self.store.save(&self.preferences) {
                warn!(%err, "could not persist seeded preferences");
            }
        }
    }

    pub fn toggle_account_notification(&mut self, account: &str) -> Result<()> {
        let enabled = !self
            .preferences
            .account_notifications
            .get(account)
            .copied()
            .unwrap_or(false);
        self.preferences = self.store.set_account_notification(account, enabled)?;
        Ok(())
    }

    pub fn toggle_merchant(&mut self, merchant: &str) -> Result<()> {
        let watched = !self
            .preferences
            .merchant_watchlist
            .get(merchant)
            .copied()
            .unwrap_or(false);
        self.preferences = self.store.set_merchant_watch(merchant, watched)?;
        Ok(())
    }

    pub fn update_daily_limit(&mut self, account: &str, value: f64) -> Result<()> {
        self.preferences = self.store.set_daily_limit(account, value)?;
        Ok(())
    }

    pub fn set_preferred_account(&mut self, account: &str) -> Result<()> {
        self.preferences = self.store.set_preferred_account(account)?;
        Ok(())
    }

    pub fn toggle_security(&mut self, toggle: SecurityToggle) -> Result<()> {
        let mut settings = self.preferences.security_settings.clone();
        match toggle {
            SecurityToggle::BiometricLogin => settings.biometric_login = !settings.biometric_login,
            SecurityToggle::TwoFactor => settings.two_factor = !settings.two_factor,
            SecurityToggle::CardFreezing => settings.card_freezing = !settings.card_freezing,
            SecurityToggle::LocationAlerts => settings.location_alerts = !settings.location_alerts,
        }
        self.preferences = self.store.set_security_settings(settings)?;
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.preferences)?;
        self.feedback = Some(SAVE_FEEDBACK_TEXT.to_string());
        Ok(())
    }

    pub fn notification_count(&self) -> usize {
        self.preferences
            .account_notifications
            .values()
            .filter(|enabled| **enabled)
            .count()
    }

    pub fn watchlist_count(&self) -> usize {
        self.preferences
            .merchant_watchlist
            .values()
            .filter(|watched| **watched)
            .count()
    }

    pub fn highest_outflow_account(&self) -> Option<&AccountSummary> {
        self.state.ready().and_then(|view| view.summaries.first())
    }

    pub fn security_settings(&self) -> &SecuritySettings {
        &self.preferences.security_settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::StubBackend;
    use serde_json::json;

    fn backend() -> StubBackend {
        StubBackend::new().with_settings(json!([
            {"accountName": "Privatkonto", "textCreditor": "Migros", "amount": 500, "valDate": "2025-09-01", "direction": 2},
            {"accountName": "Privatkonto", "textCreditor": "Lohn", "amount": 4000, "valDate": "2025-09-25", "direction": 1},
            {"accountName": "Sparkonto", "textCreditor": "Miete", "amount": 1800, "valDate": "2025-09-03", "direction": 2},
            {"accountName": "Depot", "textCreditor": "Coop", "amount": 100, "valDate": "2025-09-10", "direction": 2},
            {"accountName": "Jugendkonto", "textCreditor": "SBB", "amount": 60, "valDate": "2025-09-12", "direction": 2}
        ]))
    }

    fn page() -> (tempfile::TempDir, SettingsPage) {
        let dir = tempfile::tempdir().unwrap();
        let page = SettingsPage::new(PreferencesStore::new(dir.path()));
        (dir, page)
    }

    #[test]
    fn load_derives_accounts_and_summaries() {
        let (_dir, mut page) = page();
        page.load(&backend());

        let view = page.state.ready().unwrap();
        assert_eq!(
            view.accounts,
            vec!["Depot", "Jugendkonto", "Privatkonto", "Sparkonto"]
        );
        assert_eq!(view.summaries[0].account_name, "Sparkonto");
        assert_eq!(view.top_merchants[0], ("Miete".to_string(), 1800.0));
        assert_eq!(view.latest_activity.as_deref(), Some("2025-09-25"));
    }

    #[test]
    fn empty_sections_are_seeded_and_persisted() {
        let (dir, mut page) = page();
        page.load(&backend());

        // First three accounts in sorted order get notifications.
        assert_eq!(page.preferences.account_notifications["Depot"], true);
        assert_eq!(page.preferences.account_notifications["Jugendkonto"], true);
        assert_eq!(page.preferences.account_notifications["Privatkonto"], true);
        assert_eq!(page.preferences.account_notifications["Sparkonto"], false);
        assert_eq!(page.preferences.preferred_account, "Depot");

        // Two highest-spend merchants are watched.
        assert_eq!(page.preferences.merchant_watchlist["Miete"], true);
        assert_eq!(page.preferences.merchant_watchlist["Migros"], true);
        assert_eq!(page.preferences.merchant_watchlist["Coop"], false);

        assert_eq!(page.preferences.daily_limits["Sparkonto"], 360.0);
        assert_eq!(page.preferences.daily_limits["Privatkonto"], 100.0);

        let reloaded = PreferencesStore::new(dir.path()).load();
        assert_eq!(reloaded, page.preferences);
    }

    #[test]
    fn seeding_never_overwrites_user_choices() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferencesStore::new(dir.path());
        store.set_account_notification("Sparkonto", true).unwrap();

        let mut page = SettingsPage::new(store);
        page.load(&backend());

        assert_eq!(page.preferences.account_notifications.len(), 1);
        assert_eq!(page.preferences.account_notifications["Sparkonto"], true);
    }

    #[test]
    fn mutations_flush_to_disk() {
        let (dir, mut page) = page();
        page.load(&backend());

        page.toggle_account_notification("Sparkonto").unwrap();
        page.toggle_security(SecurityToggle::TwoFactor).unwrap();
        page.update_daily_limit("Depot", 75.0).unwrap();

        let reloaded = PreferencesStore::new(dir.path()).load();
        assert_eq!(reloaded.account_notifications["Sparkonto"], true);
        assert!(reloaded.security_settings.two_factor);
        assert!(reloaded.security_settings.biometric_login);
        assert_eq!(reloaded.daily_limits["Depot"], 75.0);
    }

    #[test]
    fn save_sets_transient_feedback() {
        let (_dir, mut page) = page();
        page.load(&backend());

        assert!(page.feedback().is_none());
        page.save().unwrap();
        assert_eq!(page.feedback(), Some("Preferences saved successfully."));
        page.clear_feedback();
        assert!(page.feedback().is_none());
    }

    #[test]
    fn failures_surface_with_their_message() {
        let (_dir, mut page) = page();
        page.load(&StubBackend::failing("settings unavailable"));
        assert_eq!(page.state.error(), Some("settings unavailable"));
    }

    #[test]
    fn counts_follow_preference_state() {
        let (_dir, mut page) = page();
        page.load(&backend());

        assert_eq!(page.notification_count(), 3);
        assert_eq!(page.watchlist_count(), 2);
        page.toggle_account_notification("Sparkonto").unwrap();
        assert_eq!(page.notification_count(), 4);
        assert_eq!(page.highest_outflow_account().unwrap().account_name, "Sparkonto");
    }
}
