//! Pricing conventions
//!
//! A convention binds a client (operator) to a room category with a default
//! nightly price and optional per-month overrides over a validity period.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::establishment::blank_to_none;

/// The twelve recognized month keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    #[serde(alias = "janvier")]
    January,
    #[serde(alias = "fevrier")]
    February,
    #[serde(alias = "mars")]
    March,
    #[serde(alias = "avril")]
    April,
    #[serde(alias = "mai")]
    May,
    #[serde(alias = "juin")]
    June,
    #[serde(alias = "juillet")]
    July,
    #[serde(alias = "aout")]
    August,
    #[serde(alias = "septembre")]
    September,
    #[serde(alias = "octobre")]
    October,
    #[serde(alias = "novembre")]
    November,
    #[serde(alias = "decembre")]
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month from a 1-based number
    pub fn from_number(number: u32) -> Option<Month> {
        Month::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn of(date: NaiveDate) -> Month {
        Month::ALL[date.month0() as usize]
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

/// Sparse month -> price overrides
pub type MonthlyPrices = BTreeMap<Month, f64>;

/// Drop overrides that are not a positive price
pub fn clean_monthly_prices(prices: &MonthlyPrices) -> MonthlyPrices {
    prices
        .iter()
        .filter(|(_, price)| price.is_finite() && **price > 0.0)
        .map(|(month, price)| (*month, *price))
        .collect()
}

/// Exported pricing for one room category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPricing {
    pub category_id: Uuid,
    pub category_name: String,
    pub default_price: f64,
    #[serde(default)]
    pub monthly_prices: MonthlyPrices,
    #[serde(default)]
    pub conditions: Option<String>,
}

impl CategoryPricing {
    /// Override when positive, default price otherwise
    pub fn price_for(&self, month: Month) -> f64 {
        self.monthly_prices
            .get(&month)
            .copied()
            .filter(|p| *p > 0.0)
            .unwrap_or(self.default_price)
    }
}

/// Editable fields of a persisted convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionDraft {
    /// Client or operator the convention is negotiated with
    pub client_name: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    pub starts_on: NaiveDate,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    pub default_price: f64,
    #[serde(default)]
    pub monthly_prices: MonthlyPrices,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub monthly_flat_rate: Option<f64>,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ConventionDraft {
    /// Draft carrying one category's exported pricing
    pub fn from_pricing(
        client_name: &str,
        establishment_id: Option<Uuid>,
        starts_on: NaiveDate,
        pricing: &CategoryPricing,
    ) -> Self {
        Self {
            client_name: client_name.to_string(),
            category_id: pricing.category_id,
            establishment_id,
            starts_on,
            ends_on: None,
            default_price: pricing.default_price,
            monthly_prices: clean_monthly_prices(&pricing.monthly_prices),
            discount_percent: None,
            monthly_flat_rate: None,
            conditions: pricing.conditions.clone(),
            active: true,
        }
    }

    pub fn normalized(mut self) -> Self {
        self.client_name = self.client_name.trim().to_string();
        self.monthly_prices = clean_monthly_prices(&self.monthly_prices);
        self.conditions = blank_to_none(self.conditions.take());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convention {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: ConventionDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Convention {
    pub fn new(details: ConventionDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details: details.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: ConventionDraft) {
        self.details = details.normalized();
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, active: bool) {
        self.details.active = active;
        self.updated_at = Utc::now();
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.details.starts_on && self.details.ends_on.map_or(true, |end| date <= end)
    }

    /// Nightly price on `date`, with the discount applied; `None` when the
    /// convention is inactive or does not cover the date
    pub fn applicable_price(&self, date: NaiveDate) -> Option<f64> {
        if !self.details.active || !self.covers(date) {
            return None;
        }
        let base = self
            .details
            .monthly_prices
            .get(&Month::of(date))
            .copied()
            .filter(|p| *p > 0.0)
            .unwrap_or(self.details.default_price);
        let discount = self.details.discount_percent.unwrap_or(0.0).clamp(0.0, 100.0);
        Some(round_cents(base * (100.0 - discount) / 100.0))
    }

    /// Same client and category with intersecting validity periods
    pub fn overlaps(&self, other: &ConventionDraft) -> bool {
        if !self
            .details
            .client_name
            .eq_ignore_ascii_case(other.client_name.trim())
            || self.details.category_id != other.category_id
        {
            return false;
        }
        let starts_before_other_ends = other.ends_on.map_or(true, |end| self.details.starts_on <= end);
        let other_starts_before_end = self
            .details
            .ends_on
            .map_or(true, |end| other.starts_on <= end);
        starts_before_other_ends && other_starts_before_end
    }
}

/// A client's pricing for every category, saved in one go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPricing {
    pub client_name: String,
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    pub starts_on: NaiveDate,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    pub pricing: Vec<CategoryPricing>,
}

impl ClientPricing {
    /// One draft per category with a usable default price
    pub fn drafts(&self) -> Vec<ConventionDraft> {
        self.pricing
            .iter()
            .filter(|p| p.default_price > 0.0)
            .map(|p| {
                let mut draft =
                    ConventionDraft::from_pricing(&self.client_name, self.establishment_id, self.starts_on, p);
                draft.ends_on = self.ends_on;
                draft
            })
            .collect()
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> ConventionDraft {
        let mut monthly = MonthlyPrices::new();
        monthly.insert(Month::July, 80.0);
        monthly.insert(Month::August, 0.0);
        ConventionDraft {
            client_name: "Samu Social".to_string(),
            category_id: Uuid::new_v4(),
            establishment_id: None,
            starts_on: date(2026, 1, 1),
            ends_on: Some(date(2026, 12, 31)),
            default_price: 50.0,
            monthly_prices: monthly,
            discount_percent: None,
            monthly_flat_rate: None,
            conditions: Some("  ".to_string()),
            active: true,
        }
    }

    #[test]
    fn test_new_convention_cleans_overrides() {
        let conv = Convention::new(draft());
        assert_eq!(conv.details.monthly_prices.len(), 1);
        assert!(conv.details.conditions.is_none());
    }

    #[test]
    fn test_applicable_price() {
        let mut conv = Convention::new(draft());
        assert_eq!(conv.applicable_price(date(2026, 7, 14)), Some(80.0));
        assert_eq!(conv.applicable_price(date(2026, 8, 14)), Some(50.0));
        assert_eq!(conv.applicable_price(date(2027, 1, 2)), None);

        conv.details.discount_percent = Some(10.0);
        assert_eq!(conv.applicable_price(date(2026, 3, 1)), Some(45.0));

        conv.set_active(false);
        assert_eq!(conv.applicable_price(date(2026, 3, 1)), None);
    }

    #[test]
    fn test_overlap() {
        let conv = Convention::new(draft());
        let mut other = conv.details.clone();
        other.starts_on = date(2026, 12, 31);
        other.ends_on = None;
        assert!(conv.overlaps(&other));

        other.starts_on = date(2027, 1, 1);
        assert!(!conv.overlaps(&other));

        let mut other_category = conv.details.clone();
        other_category.category_id = Uuid::new_v4();
        assert!(!conv.overlaps(&other_category));
    }

    #[test]
    fn test_month_keys() {
        assert_eq!(Month::from_number(1), Some(Month::January));
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::of(date(2026, 12, 5)), Month::December);

        let prices: MonthlyPrices = serde_json::from_str(r#"{"janvier": 60.0, "june": 70.0}"#).unwrap();
        assert_eq!(prices.get(&Month::January), Some(&60.0));
        assert_eq!(prices.get(&Month::June), Some(&70.0));
    }
}
