//! Page controllers for the dashboard.
//!
//! Each page owns a `PageState` and a `ViewToken`; loading fetches once,
//! normalizes, aggregates, and either surfaces the failure or degrades to
//! sample data, depending on the page.

pub mod analytics;
pub mod home;
pub mod loyalty;
pub mod savings;
pub mod settings;
pub mod state;
pub mod transactions;

pub use self::analytics::{AnalyticsPage, AnalyticsView, ChartRow};
pub use home::{sample_categories, sample_countries, HomePage, MapRow, SWIPE_THRESHOLD};
pub use loyalty::LoyaltyPage;
pub use savings::{SavingsCarousel, StatusTone};
pub use settings::{SecurityToggle, SettingsPage, SettingsView};
pub use state::{PageState, ViewToken};
pub use transactions::{initials, TransactionsPage};

use backend_client::{
    AnalyticsPayload, BackendError, GraphqlClient,
};
use models::{RawCategoryTotal, RawCountryTotal, RawTransaction};

/// Seam between the controllers and the GraphQL client, one method per
/// query document.
pub trait BackendApi {
    fn analytics(&self, start_date: &str) -> Result<AnalyticsPayload, BackendError>;
    fn country_totals(&self) -> Result<Vec<RawCountryTotal>, BackendError>;
    fn category_totals(&self) -> Result<Vec<RawCategoryTotal>, BackendError>;
    fn transaction_listing(&self) -> Result<Vec<RawTransaction>, BackendError>;
    fn settings_transactions(&self) -> Result<Vec<RawTransaction>, BackendError>;
}

impl BackendApi for GraphqlClient {
    fn analytics(&self, start_date: &str) -> Result<AnalyticsPayload, BackendError> {
        self.fetch_analytics(start_date)
    }

    fn country_totals(&self) -> Result<Vec<RawCountryTotal>, BackendError> {
        self.fetch_country_totals()
    }

    fn category_totals(&self) -> Result<Vec<RawCategoryTotal>, BackendError> {
        self.fetch_category_totals()
    }

    fn transaction_listing(&self) -> Result<Vec<RawTransaction>, BackendError> {
        self.fetch_transaction_listing()
    }

    fn settings_transactions(&self) -> Result<Vec<RawTransaction>, BackendError> {
        self.fetch_settings_transactions()
    }
}
