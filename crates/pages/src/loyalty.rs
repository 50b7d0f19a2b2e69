//! Loyalty programme page. Content is a static fixture set; only the tier
//! progress is computed.

pub const CURRENT_POINTS: u32 = 18_620;
pub const NEXT_TIER_THRESHOLD: u32 = 20_000;
pub const NEXT_TIER_NAME: &str = "Diamond";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub label: &'static str,
    pub value: &'static str,
    pub sublabel: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mission {
    pub title: &'static str,
    pub description: &'static str,
    pub progress_label: &'static str,
    pub progress: u8,
    pub meta: [&'static str; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub title: &'static str,
    pub points: u32,
    pub description: &'static str,
    pub tag: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityEntry {
    pub title: &'static str,
    pub detail: &'static str,
    pub points: &'static str,
    pub date: &'static str,
}

pub const HIGHLIGHTS: [Highlight; 4] = [
    Highlight {
        label: "Current tier",
        value: "Platinum",
        sublabel: "Top 5% of members",
    },
    Highlight {
        label: "Monthly accelerator",
        value: "x2.5",
        sublabel: "On dining & travel",
    },
    Highlight {
        label: "Points earned this month",
        value: "+5,420",
        sublabel: "CHF 18,200 eligible spend",
    },
    Highlight {
        label: "Cashback saved",
        value: "CHF 186",
        sublabel: "Redeemed via SGKB+",
    },
];

pub const MISSIONS: [Mission; 3] = [
    Mission {
        title: "Swiss Dining Week",
        description: "Earn 5x points at partner restaurants across Zürich & St. Gallen.",
        progress_label: "62% complete",
        progress: 62,
        meta: ["5 days left", "+450 pts potential"],
    },
    Mission {
        title: "Tap & ride",
        description: "Activate SGKB Transit for daily commute and unlock a mobility booster.",
        progress_label: "Activated",
        progress: 100,
        meta: ["Daily streak 9", "+1.5x multiplier"],
    },
    Mission {
        title: "Weekend getaways",
        description: "Book a staycation with SGKB Travel to unlock curated experiences.",
        progress_label: "Just started",
        progress: 18,
        meta: ["3 offers available", "+1,200 pts potential"],
    },
];

pub const REWARDS: [Reward; 4] = [
    Reward {
        title: "Upgrade to Glacier Express panoramic car",
        points: 9_500,
        description: "Swap points for a scenic first-class upgrade on your next winter escape.",
        tag: "Travel",
    },
    Reward {
        title: "SGKB+ dining circle",
        points: 4_200,
        description: "Chef's table experience for two at selected Michelin-starred partners.",
        tag: "Dining",
    },
    Reward {
        title: "Alpine wellness retreat",
        points: 15_800,
        description: "Three-day spa getaway with complimentary transfers and late checkout.",
        tag: "Lifestyle",
    },
    Reward {
        title: "Carbon offset bundle",
        points: 1_600,
        description: "Certified offset package that neutralises your last quarter's travel.",
        tag: "Impact",
    },
];

pub const ACTIVITY: [ActivityEntry; 3] = [
    ActivityEntry {
        title: "Night out in Zürich",
        detail: "4 partner venues • SGKB+ Midnight Circuit",
        points: "+820",
        date: "Yesterday",
    },
    ActivityEntry {
        title: "Swiss Travel Pass renewal",
        detail: "Annual rail upgrade • Mobility booster",
        points: "+1,450",
        date: "3 days ago",
    },
    ActivityEntry {
        title: "Coffee run",
        detail: "Daily espresso streak • Urban Essentials",
        points: "+120",
        date: "5 days ago",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct LoyaltyPage {
    pub current_points: u32,
    pub next_tier_threshold: u32,
}

impl Default for LoyaltyPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoyaltyPage {
    pub fn new() -> Self {
        Self {
            current_points: CURRENT_POINTS,
            next_tier_threshold: NEXT_TIER_THRESHOLD,
        }
    }

    /// Percentage toward the next tier, capped at 100.
    pub fn progress_to_next_tier(&self) -> u32 {
        let pct = f64::from(self.current_points) / f64::from(self.next_tier_threshold) * 100.0;
        (pct.round() as u32).min(100)
    }

    pub fn points_to_go(&self) -> u32 {
        self.next_tier_threshold.saturating_sub(self.current_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_and_caps() {
        let page = LoyaltyPage::new();
        assert_eq!(page.progress_to_next_tier(), 93);
        assert_eq!(page.points_to_go(), 1380);

        let over = LoyaltyPage {
            current_points: 25_000,
            next_tier_threshold: 20_000,
        };
        assert_eq!(over.progress_to_next_tier(), 100);
        assert_eq!(over.points_to_go(), 0);
    }

    #[test]
    fn fixtures_are_complete() {
        assert_eq!(HIGHLIGHTS.len(), 4);
        assert_eq!(MISSIONS.len(), 3);
        assert_eq!(REWARDS.len(), 4);
        assert_eq!(ACTIVITY.len(), 3);
        assert!(MISSIONS.iter().all(|m| m.progress <= 100));
    }
}
