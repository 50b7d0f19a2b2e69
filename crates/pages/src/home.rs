//! Home page controller: country activity map plus the spending-insights
//! slides. Both widgets degrade to fixed sample data instead of failing,
//! the home screen always renders something.

use tracing::warn;

use ::analytics::category_shares;
use models::{CategoryTotal, CountryTotal};
use normalization::{normalize_category_totals, normalize_country_totals};

use crate::state::{PageState, ViewToken};
use crate::BackendApi;

/// Swipe distance below which a touch is not a slide change.
pub const SWIPE_THRESHOLD: f64 = 40.0;

const SLIDE_COUNT: usize = 2;

/// Illustrative totals shown when the backend has nothing to offer.
pub fn sample_countries() -> Vec<CountryTotal> {
    [
        ("Switzerland", "CH", 29752.5),
        ("Denmark", "DK", 21152.64),
        ("Germany", "DE", 11275.44),
        ("Norway", "NO", 9558.4),
        ("Sweden", "SE", 7949.94),
    ]
    .into_iter()
    .map(|(country, code, total)| CountryTotal {
        country: country.to_string(),
        country_code: code.to_string(),
        total,
    })
    .collect()
}

/// Illustrative category split with precomputed shares.
pub fn sample_categories() -> Vec<CategoryTotal> {
    let rows = [
        ("Travel", 6730.0, "32.1%", "green-600"),
        ("IT & equipment", 4120.0, "19.6%", "green-500"),
        ("Training & development", 3920.0, "18.6%", "green-400"),
        ("Office supplies", 3210.0, "15.3%", "green-300"),
        ("Communication", 3010.0, "14.3%", "green-200"),
    ];
    rows.into_iter()
        .map(|(category, amount, share, color_token)| CategoryTotal {
            category: category.to_string(),
            amount,
            share: share.to_string(),
            color_token: color_token.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    /// Lowercased ISO code, the shape the map widget expects.
    pub country: String,
    pub value: f64,
}

pub struct HomePage {
    token: ViewToken,
    pub countries: PageState<Vec<CountryTotal>>,
    pub categories: PageState<Vec<CategoryTotal>>,
    active_slide: usize,
    touch_start_x: Option<f64>,
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

impl HomePage {
    pub fn new() -> Self {
        Self {
            token: ViewToken::new(),
            countries: PageState::Loading,
            categories: PageState::Loading,
            active_slide: 0,
            touch_start_x: None,
        }
    }

    pub fn token(&self) -> ViewToken {
        self.token.clone()
    }

    /// Fetches country totals; failure or an empty result both resolve to
    /// the sample set.
    pub fn load_countries(&mut self, backend: &impl BackendApi) {
        let token = self.token.clone();
        let result = backend.country_totals();

        if !token.is_live() {
            tracing::debug!("country response arrived for a retired view, discarding");
            return;
        }

        let totals = match result {
            Ok(raw) => {
                let normalized = normalize_country_totals(raw);
                if normalized.is_empty() {
                    sample_countries()
                } else {
                    normalized
                }
            }
            Err(err) => {
                warn!(%err, "country totals unavailable, showing sample data");
                sample_countries()
            }
        };
        self.countries = PageState::Ready(totals);
    }

    /// Fetches category totals and derives display shares; same sample
    /// fallback as the country widget.
    pub fn load_categories(&mut self, backend: &impl BackendApi) {
        let token = self.token.clone();
        let result = backend.category_totals();

        if !token.is_live() {
            tracing::debug!("category response arrived for a retired view, discarding");
            return;
        }

        let categories = match result {
            Ok(raw) => {
                let shares = category_shares(normalize_category_totals(raw));
                if shares.is_empty() {
                    sample_categories()
                } else {
                    shares
                }
            }
            Err(err) => {
                warn!(%err, "category totals unavailable, showing sample data");
                sample_categories()
            }
        };
        self.categories = PageState::Ready(categories);
    }

    /// Rows for the world map widget.
    pub fn map_rows(&self) -> Vec<MapRow> {
        self.countries
            .ready()
            .map(|totals| {
                totals
                    .iter()
                    .map(|item| MapRow {
                        country: item.country_code.to_lowercase(),
                        value: item.total,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Country list ranked by total, descending.
    pub fn ranked_countries(&self) -> Vec<CountryTotal> {
        let mut ranked = self.countries.ready().cloned().unwrap_or_default();
        ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    pub fn active_slide(&self) -> usize {
        self.active_slide
    }

    /// Out-of-range targets keep the current slide.
    pub fn go_to_slide(&mut self, target: isize) {
        if target < 0 || target as usize >= SLIDE_COUNT {
            return;
        }
        self.active_slide = target as usize;
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start_x = Some(x);
    }

    pub fn touch_end(&mut self, x: f64) {
        let Some(start) = self.touch_start_x.take() else {
            return;
        };
        let delta = start - x;
        if delta.abs() < SWIPE_THRESHOLD {
            return;
        }
        if delta > 0.0 {
            self.go_to_slide(self.active_slide as isize + 1);
        } else {
            self.go_to_slide(self.active_slide as isize - 1);
        }
    }
}
