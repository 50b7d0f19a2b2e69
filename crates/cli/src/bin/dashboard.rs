use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use backend_client::GraphqlClient;
use pages::{
    AnalyticsPage, HomePage, LoyaltyPage, PageState, SettingsPage, TransactionsPage,
};
use preferences::PreferencesStore;
use utils::{format_chf, format_day_date};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Fetch and print the dashboard page view models.")]
struct Args {
    /// Which page to print
    #[arg(short, long, value_enum, default_value_t = Page::All)]
    page: Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    All,
    Home,
    Analytics,
    Transactions,
    Settings,
    Loyalty,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let client = GraphqlClient::from_env()?;

    if matches!(args.page, Page::All | Page::Home) {
        print_home(&client);
    }
    if matches!(args.page, Page::All | Page::Analytics) {
        print_analytics(&client);
    }
    if matches!(args.page, Page::All | Page::Transactions) {
        print_transactions(&client);
    }
    if matches!(args.page, Page::All | Page::Settings) {
        print_settings(&client);
    }
    if matches!(args.page, Page::All | Page::Loyalty) {
        print_loyalty();
    }

    Ok(())
}

fn print_home(client: &GraphqlClient) {
    println!("== Home ==");
    let mut page = HomePage::new();
    page.load_countries(client);
    page.load_categories(client);

    println!("Spending by country:");
    for item in page.ranked_countries() {
        println!("  {:<24} {}", item.country, format_chf(item.total));
    }

    println!("Spending by category:");
    if let Some(categories) = page.categories.ready() {
        for item in categories {
            println!("  {:<24} {:>12} {:>7}", item.category, format_chf(item.amount), item.share);
        }
    }
    println!();
}

fn print_analytics(client: &GraphqlClient) {
    println!("== Analytics ==");
    let mut page = AnalyticsPage::new();
    page.load(client, Local::now().date_naive());

    match &page.state {
        PageState::Ready(view) => {
            println!("Total volume:    {}", format_chf(view.rollup.total_volume));
            println!("Monthly average: {}", format_chf(view.rollup.average_monthly));
            if let Some(best) = &view.rollup.best_month {
                println!("Best month:      {} ({})", best.month, format_chf(best.total));
            }
            println!(
                "Month over month: {} ({:.1}%)",
                format_chf(view.rollup.mom_change),
                view.rollup.mom_percentage
            );
            println!(
                "Inflow {} / Outflow {} / Net {}",
                format_chf(view.flows.inflow),
                format_chf(view.flows.outflow),
                format_chf(view.flows.net_flow)
            );

            println!("Top merchants:");
            for (merchant, total) in &view.top_merchants {
                println!("  {:<24} {}", merchant, format_chf(*total));
            }

            println!("Recent transactions:");
            for transaction in &view.recent {
                println!(
                    "  {} {:<24} {}",
                    format_day_date(&transaction.value_date),
                    transaction.counterparty,
                    format_chf(transaction.amount)
                );
            }

            println!("Savings ideas ({} saved):", format_chf(pages::savings::saved_amount()));
            for product in page.carousel.products() {
                println!(
                    "  {:<12} {}",
                    product.name,
                    format_chf(product.suggested_amount)
                );
            }
        }
        PageState::Failed(message) => println!("error: {message}"),
        PageState::Loading => {}
    }
    println!();
}

fn print_transactions(client: &GraphqlClient) {
    println!("== Transactions ==");
    let mut page = TransactionsPage::new();
    page.load(client);

    match &page.state {
        PageState::Ready(listed) if listed.is_empty() => {
            println!("No complete transactions found.");
        }
        PageState::Ready(listed) => {
            for transaction in listed {
                println!(
                    "  [{}] {} {} CHF {} ({})",
                    pages::initials(&transaction.counterparty),
                    transaction.value_date,
                    transaction.counterparty,
                    transaction.amount,
                    transaction.account_name
                );
            }
        }
        PageState::Failed(message) => println!("error: {message}"),
        PageState::Loading => {}
    }
    println!();
}

fn print_settings(client: &GraphqlClient) {
    println!("== Settings ==");
    let mut page = SettingsPage::new(PreferencesStore::from_env());
    page.load(client);

    match &page.state {
        PageState::Ready(view) => {
            println!(
                "Tracked accounts: {}/{}",
                page.notification_count(),
                view.accounts.len()
            );
            println!("Watched merchants: {}", page.watchlist_count());
            if let Some(top) = page.highest_outflow_account() {
                println!(
                    "Highest outflow: {} ({})",
                    top.account_name,
                    format_chf(top.outflow)
                );
            }
            if let Some(latest) = &view.latest_activity {
                println!("Latest activity: {}", format_day_date(latest));
            }
            println!("Daily limits:");
            for (account, limit) in &page.preferences.daily_limits {
                println!("  {:<24} {}", account, format_chf(*limit));
            }
        }
        PageState::Failed(message) => println!("error: {message}"),
        PageState::Loading => {}
    }
    println!();
}

fn print_loyalty() {
    println!("== SGKB+ ==");
    let page = LoyaltyPage::new();
    println!(
        "{} pts, {}% towards {} ({} pts to go)",
        page.current_points,
        page.progress_to_next_tier(),
        pages::loyalty::NEXT_TIER_NAME,
        page.points_to_go()
    );
    for highlight in pages::loyalty::HIGHLIGHTS {
        println!("  {:<28} {} ({})", highlight.label, highlight.value, highlight.sublabel);
    }
    println!();
}
