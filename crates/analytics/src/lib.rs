//! Pure aggregation folds over normalized record collections. Nothing here
//! mutates its input or touches the network; page controllers feed
//! normalized data in and render the resulting summaries.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use models::{AccountSummary, BankTransaction, CategoryTotal, Direction, MonthlyTotal};
use utils::parse_iso_date;

/// Chart color tokens for category widgets, brightest first. Cycled when a
/// batch has more categories than tokens.
pub const CATEGORY_COLOR_TOKENS: [&str; 5] = [
    "green-600",
    "green-500",
    "green-400",
    "green-300",
    "green-200",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlyRollup {
    pub total_volume: f64,
    pub average_monthly: f64,
    pub latest: Option<MonthlyTotal>,
    pub previous: Option<MonthlyTotal>,
    pub mom_change: f64,
    pub mom_percentage: f64,
    pub best_month: Option<MonthlyTotal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlowTotals {
    pub inflow: f64,
    pub outflow: f64,
    pub net_flow: f64,
}

/// Sorts monthly totals ascending by calendar month. Unparseable months sort
/// to the front, preserving their relative order.
pub fn sort_monthly_ascending(totals: &mut [MonthlyTotal]) {
    totals.sort_by_key(|t| parse_iso_date(&t.month).unwrap_or(NaiveDate::MIN));
}

/// Sorts transactions newest-first by value date. Unparseable dates sort to
/// the end.
pub fn sort_transactions_desc(transactions: &mut [BankTransaction]) {
    transactions.sort_by_key(|t| {
        std::cmp::Reverse(parse_iso_date(&t.value_date).unwrap_or(NaiveDate::MIN))
    });
}

/// Volume rollup over one fetch batch of monthly totals. Sorts ascending
/// internally; every divide is guarded so empty batches and zero previous
/// months produce zeros, never NaN or infinity.
pub fn monthly_rollup(totals: &[MonthlyTotal]) -> MonthlyRollup {
    let mut sorted = totals.to_vec();
    sort_monthly_ascending(&mut sorted);

    let total_volume: f64 = sorted.iter().map(|t| t.total).sum();
    let average_monthly = if sorted.is_empty() {
        0.0
    } else {
        total_volume / sorted.len() as f64
    };

    let latest = sorted.last().cloned();
    let previous = if sorted.len() > 1 {
        sorted.get(sorted.len() - 2).cloned()
    } else {
        None
    };

    let mom_change = match (&latest, &previous) {
        (Some(latest), Some(previous)) => latest.total - previous.total,
        _ => 0.0,
    };
    let mom_percentage = match &previous {
        Some(previous) if previous.total != 0.0 => mom_change / previous.total * 100.0,
        _ => 0.0,
    };

    // First-encountered maximum wins on ties.
    let best_month = sorted
        .iter()
        .fold(None::<&MonthlyTotal>, |best, item| match best {
            Some(best) if item.total > best.total => Some(item),
            Some(best) => Some(best),
            None => Some(item),
        })
        .cloned();

    MonthlyRollup {
        total_volume,
        average_monthly,
        latest,
        previous,
        mom_change,
        mom_percentage,
        best_month,
    }
}

/// Inflow/outflow/net fold. Directions outside {inflow, outflow} contribute
/// to neither side.
pub fn flow_totals(transactions: &[BankTransaction]) -> FlowTotals {
    let mut totals = FlowTotals::default();
    for transaction in transactions {
        match transaction.direction {
            Direction::Inflow => totals.inflow += transaction.amount,
            Direction::Outflow => totals.outflow += transaction.amount,
            Direction::Other => {}
        }
        totals.net_flow = totals.inflow - totals.outflow;
    }
    totals
}

/// Groups outflow spend by counterparty and returns the top `n` entries,
/// summed amounts descending. The sort is stable over first-insertion order,
/// so ties keep the order merchants were first seen in.
pub fn top_merchants(transactions: &[BankTransaction], n: usize) -> Vec<(String, f64)> {
    let mut order: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        if transaction.direction != Direction::Outflow {
            continue;
        }
        match index.get(&transaction.counterparty) {
            Some(&i) => order[i].1 += transaction.amount.abs(),
            None => {
                index.insert(transaction.counterparty.clone(), order.len());
                order.push((transaction.counterparty.clone(), transaction.amount.abs()));
            }
        }
    }

    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    order.truncate(n);
    order
}

/// Folds the transaction collection into per-account summaries, grouped in
/// first-seen order and ranked descending by outflow.
pub fn account_summaries(transactions: &[BankTransaction]) -> Vec<AccountSummary> {
    let mut order: Vec<AccountSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for transaction in transactions {
        let i = match index.get(&transaction.account_name) {
            Some(&i) => i,
            None => {
                index.insert(transaction.account_name.clone(), order.len());
                order.push(AccountSummary {
                    account_name: transaction.account_name.clone(),
                    inflow: 0.0,
                    outflow: 0.0,
                    transaction_count: 0,
                    last_date: None,
                });
                order.len() - 1
            }
        };

        let summary = &mut order[i];
        match transaction.direction {
            Direction::Inflow => summary.inflow += transaction.amount.abs(),
            Direction::Outflow => summary.outflow += transaction.amount.abs(),
            Direction::Other => {}
        }
        summary.transaction_count += 1;

        let newer = match (&summary.last_date, parse_iso_date(&transaction.value_date)) {
            (None, _) => true,
            (Some(last), Some(current)) => {
                parse_iso_date(last).map(|l| current > l).unwrap_or(true)
            }
            (Some(_), None) => false,
        };
        if newer {
            summary.last_date = Some(transaction.value_date.clone());
        }
    }

    order.sort_by(|a, b| {
        b.outflow
            .partial_cmp(&a.outflow)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Distinct account names (sentinel excluded), sorted alphabetically.
pub fn unique_accounts(transactions: &[BankTransaction]) -> Vec<String> {
    let mut accounts: Vec<String> = Vec::new();
    for transaction in transactions {
        if transaction.account_name == models::TEXT_SENTINEL {
            continue;
        }
        if !accounts.contains(&transaction.account_name) {
            accounts.push(transaction.account_name.clone());
        }
    }
    accounts.sort();
    accounts
}

/// Most recent value date across the collection, if any parses.
pub fn latest_activity(transactions: &[BankTransaction]) -> Option<String> {
    transactions
        .iter()
        .filter_map(|t| parse_iso_date(&t.value_date).map(|d| (d, &t.value_date)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, raw)| raw.clone())
}

/// Derives display shares over the batch total, one decimal plus a percent
/// sign, color tokens cycled in palette order. A zero batch total yields
/// `0.0%` shares instead of dividing.
pub fn category_shares(categories: Vec<(String, f64)>) -> Vec<CategoryTotal> {
    let total: f64 = categories.iter().map(|(_, amount)| amount).sum();

    categories
        .into_iter()
        .enumerate()
        .map(|(i, (category, amount))| {
            let share = if total == 0.0 {
                "0.0%".to_string()
            } else {
                format!("{:.1}%", amount / total * 100.0)
            };
            CategoryTotal {
                category,
                amount,
                share,
                color_token: CATEGORY_COLOR_TOKENS[i % CATEGORY_COLOR_TOKENS.len()].to_string(),
            }
        })
        .collect()
}

/// Seed defaults for the settings page: notifications on for the first
/// three accounts.
pub fn default_account_notifications(accounts: &[String]) -> BTreeMap<String, bool> {
    accounts
        .iter()
        .enumerate()
        .map(|(i, account)| (account.clone(), i < 3))
        .collect()
}

/// Seed defaults: watchlist enabled for the two highest-spend merchants.
pub fn default_merchant_watchlist(merchants: &[(String, f64)]) -> BTreeMap<String, bool> {
    merchants
        .iter()
        .enumerate()
        .map(|(i, (merchant, _))| (merchant.clone(), i < 2))
        .collect()
}

/// Seed defaults: daily spend limit at 20% of observed outflow, floored at
/// 200 for accounts without outflow.
pub fn suggested_daily_limits(summaries: &[AccountSummary]) -> BTreeMap<String, f64> {
    summaries
        .iter()
        .map(|summary| {
            let baseline = if summary.outflow > 0.0 {
                summary.outflow * 0.2
            } else {
                200.0
            };
            (summary.account_name.clone(), baseline.round())
        })
        .collect()
}
