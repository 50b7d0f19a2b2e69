//! Analytics page controller: one combined fetch of monthly totals and the
//! rolling three-month transaction window, plus the savings carousel.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use ::analytics::{
    flow_totals, monthly_rollup, sort_monthly_ascending, sort_transactions_desc, top_merchants,
    FlowTotals, MonthlyRollup,
};
use backend_client::analytics_start_date;
use models::{BankTransaction, MonthlyTotal};
use normalization::{normalize_monthly_totals, normalize_transactions};
use utils::format_month_label;

use crate::savings::SavingsCarousel;
use crate::state::{page_error, PageState, ViewToken};
use crate::BackendApi;

const TRANSPORT_ERROR_TEXT: &str = "Failed to load analytics data";

#[derive(Debug, Clone, Serialize)]
pub struct ChartRow {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct AnalyticsView {
    /// Ascending by calendar month.
    pub monthly_totals: Vec<MonthlyTotal>,
    /// Newest first.
    pub transactions: Vec<BankTransaction>,
    pub chart_rows: Vec<ChartRow>,
    pub rollup: MonthlyRollup,
    pub flows: FlowTotals,
    pub top_merchants: Vec<(String, f64)>,
    pub recent: Vec<BankTransaction>,
}

impl AnalyticsView {
    fn build(monthly: Vec<MonthlyTotal>, transactions: Vec<BankTransaction>) -> Self {
        let mut monthly_totals = monthly;
        sort_monthly_ascending(&mut monthly_totals);

        let mut transactions = transactions;
        sort_transactions_desc(&mut transactions);

        let chart_rows = monthly_totals
            .iter()
            .map(|item| ChartRow {
                month: format_month_label(&item.month),
                total: item.total,
            })
            .collect();

        let rollup = monthly_rollup(&monthly_totals);
        let flows = flow_totals(&transactions);
        let top_merchants = top_merchants(&transactions, 5);
        let recent = transactions.iter().take(5).cloned().collect();

        Self {
            monthly_totals,
            transactions,
            chart_rows,
            rollup,
            flows,
            top_merchants,
            recent,
        }
    }
}

pub struct AnalyticsPage {
    token: ViewToken,
    pub state: PageState<AnalyticsView>,
    pub carousel: SavingsCarousel,
}

impl Default for AnalyticsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsPage {
    pub fn new() -> Self {
        Self {
            token: ViewToken::new(),
            state: PageState::Loading,
            carousel: SavingsCarousel::new(),
        }
    }

    pub fn token(&self) -> ViewToken {
        self.token.clone()
    }

    pub fn load(&mut self, backend: &impl BackendApi, today: NaiveDate) {
        let token = self.token.clone();
        let result = backend.analytics(&analytics_start_date(today));

        if !token.is_live() {
            debug!("analytics response arrived for a retired view, discarding");
            return;
        }

        self.state = match result {
            Ok(payload) => PageState::Ready(AnalyticsView::build(
                normalize_monthly_totals(payload.monthly_totals),
                normalize_transactions(payload.transactions),
            )),
            Err(err) => PageState::Failed(page_error(err, TRANSPORT_ERROR_TEXT)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::StubBackend;
    use serde_json::json;

    fn backend() -> StubBackend {
        StubBackend::new().with_analytics(
            json!([
                {"month": "2025-08", "total": 300, "percentage": 30},
                {"month": "2025-06", "total": 100, "percentage": 10},
                {"month": "2025-07", "total": "200", "percentage": 20}
            ]),
            json!([
                {"accountName": "Privatkonto", "textCreditor": "Migros", "amount": 50, "valDate": "2025-08-10", "direction": 2},
                {"accountName": "Privatkonto", "textCreditor": "Lohn", "amount": 4000, "valDate": "2025-08-25", "direction": 1},
                {"accountName": "Privatkonto", "textCreditor": "Migros", "amount": 30, "valDate": "2025-08-12", "direction": 2}
            ]),
        )
    }

    #[test]
    fn load_sorts_and_aggregates() {
        let mut page = AnalyticsPage::new();
        page.load(&backend(), NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());

        let view = page.state.ready().expect("page should be ready");
        assert_eq!(view.monthly_totals[0].month, "2025-06");
        assert_eq!(view.monthly_totals[2].month, "2025-08");
        assert_eq!(view.chart_rows[0].month, "Jun 25");
        assert_eq!(view.rollup.total_volume, 600.0);
        assert_eq!(view.rollup.mom_change, 100.0);
        assert_eq!(view.transactions[0].counterparty, "Lohn");
        assert_eq!(view.flows.inflow, 4000.0);
        assert_eq!(view.flows.outflow, 80.0);
        assert_eq!(view.top_merchants, vec![("Migros".to_string(), 80.0)]);
        assert_eq!(view.recent.len(), 3);
    }

    #[test]
    fn backend_failure_surfaces_as_failed_state() {
        let mut page = AnalyticsPage::new();
        page.load(
            &StubBackend::failing("monthlyTotals unavailable"),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        );
        assert_eq!(page.state.error(), Some("monthlyTotals unavailable"));
    }

    #[test]
    fn retired_view_discards_the_response() {
        let mut page = AnalyticsPage::new();
        page.token().retire();
        page.load(&backend(), NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert!(page.state.is_loading());
    }
}
