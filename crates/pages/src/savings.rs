//! Savings recommendation carousel shown on the analytics page.
//!
//! The saved buffer is simulated from a fixed contribution assumption; the
//! product list and allocation ratios are static. Allocations only produce a
//! status line, booking is not wired up yet.

use utils::format_chf;

pub const MONTHLY_CONTRIBUTION: f64 = 850.0;
pub const CONTRIBUTION_MONTHS: u32 = 6;
pub const EXPECTED_BONUS: f64 = 1200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsProduct {
    pub name: &'static str,
    pub allocation: f64,
    pub description: &'static str,
    pub suggested_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationStatus {
    pub tone: StatusTone,
    pub message: String,
}

#[derive(Debug)]
pub struct SavingsCarousel {
    products: Vec<SavingsProduct>,
    active: usize,
    status: Option<AllocationStatus>,
    custom_amount: String,
}

pub fn saved_amount() -> f64 {
    MONTHLY_CONTRIBUTION * f64::from(CONTRIBUTION_MONTHS) + EXPECTED_BONUS
}

pub fn assumption_summary() -> String {
    format!(
        "{} monthly · {} months · {} bonus",
        format_chf(MONTHLY_CONTRIBUTION),
        CONTRIBUTION_MONTHS,
        format_chf(EXPECTED_BONUS)
    )
}

fn product_base() -> Vec<(&'static str, f64, &'static str)> {
    vec![
        (
            "Säule 3a",
            0.35,
            "Tax-advantaged retirement pillar to lock in long-term savings.",
        ),
        (
            "Aktien",
            0.2,
            "Diversified stock basket to keep the growth component of your plan.",
        ),
        (
            "ETF",
            0.2,
            "Broad-market ETF exposure with low fees and daily liquidity.",
        ),
        (
            "Edelmetalle",
            0.15,
            "Add precious metals as a hedge against inflation and volatility.",
        ),
        (
            "Bitcoin",
            0.1,
            "Small digital asset position to participate in alternative markets.",
        ),
    ]
}

impl Default for SavingsCarousel {
    fn default() -> Self {
        Self::new()
    }
}

impl SavingsCarousel {
    pub fn new() -> Self {
        let saved = saved_amount();
        let products = product_base()
            .into_iter()
            .map(|(name, allocation, description)| SavingsProduct {
                name,
                allocation,
                description,
                suggested_amount: if saved > 0.0 { saved * allocation } else { 0.0 },
            })
            .collect();

        Self {
            products,
            active: 0,
            status: None,
            custom_amount: String::new(),
        }
    }

    pub fn products(&self) -> &[SavingsProduct] {
        &self.products
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn current(&self) -> &SavingsProduct {
        &self.products[self.active]
    }

    pub fn status(&self) -> Option<&AllocationStatus> {
        self.status.as_ref()
    }

    pub fn custom_amount(&self) -> &str {
        &self.custom_amount
    }

    pub fn set_custom_amount(&mut self, value: &str) {
        self.custom_amount = value.to_string();
    }

    /// Wraps to the last product from the first.
    pub fn prev(&mut self) {
        if self.products.len() <= 1 {
            return;
        }
        let target = if self.active == 0 {
            self.products.len() - 1
        } else {
            self.active - 1
        };
        self.activate(target);
    }

    /// Wraps to the first product from the last.
    pub fn next(&mut self) {
        if self.products.len() <= 1 {
            return;
        }
        self.activate((self.active + 1) % self.products.len());
    }

    pub fn select(&mut self, index: usize) {
        if index == self.active || index >= self.products.len() {
            return;
        }
        self.activate(index);
    }

    // Switching products clears any allocation feedback and the draft.
    fn activate(&mut self, index: usize) {
        self.active = index;
        self.status = None;
        self.custom_amount.clear();
    }

    pub fn allocate_suggested(&mut self) {
        let amount = self.current().suggested_amount;
        if amount <= 0.0 {
            return;
        }
        self.allocate(amount, "AI suggestion");
    }

    pub fn allocate_half(&mut self) {
        self.allocate_ratio(0.5, "50% buffer");
    }

    pub fn allocate_full(&mut self) {
        self.allocate_ratio(1.0, "Full buffer");
    }

    fn allocate_ratio(&mut self, ratio: f64, label: &str) {
        let saved = saved_amount();
        if saved <= 0.0 {
            return;
        }
        self.allocate(saved * ratio, label);
    }

    /// A non-positive draft is field-level feedback, never a page failure.
    pub fn allocate_custom(&mut self) {
        let amount = self.custom_amount.trim().parse::<f64>();
        match amount {
            Ok(amount) if amount.is_finite() && amount > 0.0 => {
                self.allocate(amount, "Custom amount");
                self.custom_amount.clear();
            }
            _ => {
                self.status = Some(AllocationStatus {
                    tone: StatusTone::Error,
                    message: "Enter a positive amount to allocate.".to_string(),
                });
            }
        }
    }

    fn allocate(&mut self, amount: f64, label: &str) {
        if amount <= 0.0 {
            return;
        }
        self.status = Some(AllocationStatus {
            tone: StatusTone::Success,
            message: format!(
                "{label}: earmarked {} for {}. Investment booking will open once the API is ready.",
                format_chf(amount),
                self.current().name
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_amount_combines_contributions_and_bonus() {
        assert_eq!(saved_amount(), 6300.0);
        assert_eq!(
            assumption_summary(),
            "CHF 850.00 monthly · 6 months · CHF 1,200.00 bonus"
        );
    }

    #[test]
    fn suggested_amounts_follow_allocations() {
        let carousel = SavingsCarousel::new();
        let products = carousel.products();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Säule 3a");
        assert_eq!(products[0].suggested_amount, 6300.0 * 0.35);
        assert_eq!(products[4].name, "Bitcoin");
        assert_eq!(products[4].suggested_amount, 630.0);
    }

    #[test]
    fn navigation_wraps_and_clears_feedback() {
        let mut carousel = SavingsCarousel::new();
        carousel.prev();
        assert_eq!(carousel.active_index(), 4);
        carousel.next();
        assert_eq!(carousel.active_index(), 0);

        carousel.allocate_half();
        assert!(carousel.status().is_some());
        carousel.select(2);
        assert_eq!(carousel.active_index(), 2);
        assert!(carousel.status().is_none());
    }

    #[test]
    fn selecting_the_active_product_keeps_feedback() {
        let mut carousel = SavingsCarousel::new();
        carousel.allocate_full();
        assert!(carousel.status().is_some());
        carousel.select(0);
        assert!(carousel.status().is_some());
    }

    #[test]
    fn suggested_allocation_reports_success() {
        let mut carousel = SavingsCarousel::new();
        carousel.allocate_suggested();
        let status = carousel.status().unwrap();
        assert_eq!(status.tone, StatusTone::Success);
        assert_eq!(
            status.message,
            "AI suggestion: earmarked CHF 2,205.00 for Säule 3a. Investment booking will open once the API is ready."
        );
    }

    #[test]
    fn custom_allocation_rejects_non_positive_amounts() {
        let mut carousel = SavingsCarousel::new();

        carousel.set_custom_amount("-20");
        carousel.allocate_custom();
        let status = carousel.status().unwrap();
        assert_eq!(status.tone, StatusTone::Error);
        assert_eq!(status.message, "Enter a positive amount to allocate.");

        carousel.set_custom_amount("abc");
        carousel.allocate_custom();
        assert_eq!(carousel.status().unwrap().tone, StatusTone::Error);

        carousel.set_custom_amount("150.50");
        carousel.allocate_custom();
        let status = carousel.status().unwrap();
        assert_eq!(status.tone, StatusTone::Success);
        assert!(status.message.starts_with("Custom amount: earmarked CHF 150.50"));
        assert!(carousel.custom_amount().is_empty());
    }
}
