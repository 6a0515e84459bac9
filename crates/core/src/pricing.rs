//! Convention pricing book
//!
//! Working state behind the pricing editor: one entry per room category
//! holding a default nightly price, sparse month overrides and free-text
//! conditions. [`PricingBook::export`] produces the cleaned
//! [`CategoryPricing`] list that gets persisted as conventions.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{clean_monthly_prices, CategoryPricing, Convention, Month, MonthlyPrices, RoomCategory};

/// Starting price offered for every category of a new convention
pub const STANDARD_DEFAULT_PRICE: f64 = 45.0;

#[derive(Debug, Clone, PartialEq)]
struct PricingEntry {
    category_id: Uuid,
    category_name: String,
    /// `None` until the user enters a price
    default_price: Option<f64>,
    overrides: MonthlyPrices,
    conditions: String,
}

impl PricingEntry {
    fn default_or_zero(&self) -> f64 {
        self.default_price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    fn export(&self) -> CategoryPricing {
        let conditions = self.conditions.trim();
        CategoryPricing {
            category_id: self.category_id,
            category_name: self.category_name.clone(),
            default_price: self.default_or_zero(),
            monthly_prices: clean_monthly_prices(&self.overrides),
            conditions: (!conditions.is_empty()).then(|| conditions.to_string()),
        }
    }
}

/// Per-category pricing under edition, in category display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingBook {
    entries: Vec<PricingEntry>,
}

impl PricingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per category at `default_price`, no overrides
    pub fn seeded(categories: &[RoomCategory], default_price: f64) -> Self {
        let entries = categories
            .iter()
            .map(|category| PricingEntry {
                category_id: category.id,
                category_name: category.name().to_string(),
                default_price: Some(default_price),
                overrides: MonthlyPrices::new(),
                conditions: String::new(),
            })
            .collect();
        Self { entries }
    }

    /// Resume editing previously exported pricing
    pub fn from_pricing(pricing: Vec<CategoryPricing>) -> Self {
        let entries = pricing
            .into_iter()
            .map(|item| PricingEntry {
                category_id: item.category_id,
                category_name: item.category_name,
                default_price: Some(item.default_price),
                overrides: item.monthly_prices,
                conditions: item.conditions.unwrap_or_default(),
            })
            .collect();
        Self { entries }
    }

    /// Seed every category, then take over the pricing of the conventions
    /// that exist for it
    pub fn with_conventions(
        categories: &[RoomCategory],
        conventions: &[Convention],
        default_price: f64,
    ) -> Self {
        let mut book = Self::seeded(categories, default_price);
        for convention in conventions {
            let details = &convention.details;
            if let Ok(entry) = book.entry_mut(details.category_id) {
                entry.default_price = Some(details.default_price);
                entry.overrides = details.monthly_prices.clone();
                entry.conditions = details.conditions.clone().unwrap_or_default();
            }
        }
        book
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, category_id: Uuid) -> Result<&PricingEntry> {
        self.entries
            .iter()
            .find(|e| e.category_id == category_id)
            .ok_or_else(|| Error::NotFound(format!("pricing for category {}", category_id)))
    }

    fn entry_mut(&mut self, category_id: Uuid) -> Result<&mut PricingEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.category_id == category_id)
            .ok_or_else(|| Error::NotFound(format!("pricing for category {}", category_id)))
    }

    /// Replace the default price of one category only
    pub fn set_default(&mut self, category_id: Uuid, price: f64) -> Result<()> {
        self.entry_mut(category_id)?.default_price = price.is_finite().then_some(price);
        Ok(())
    }

    /// A positive price sets the override; anything else clears it
    pub fn set_month_override(&mut self, category_id: Uuid, month: Month, price: f64) -> Result<()> {
        let entry = self.entry_mut(category_id)?;
        if price.is_finite() && price > 0.0 {
            entry.overrides.insert(month, price);
        } else {
            entry.overrides.remove(&month);
        }
        Ok(())
    }

    /// Overwrite all twelve months with the current default price
    pub fn apply_default_to_all(&mut self, category_id: Uuid) -> Result<()> {
        let entry = self.entry_mut(category_id)?;
        let price = entry.default_or_zero();
        entry.overrides = Month::ALL.iter().map(|month| (*month, price)).collect();
        Ok(())
    }

    pub fn clear_all(&mut self, category_id: Uuid) -> Result<()> {
        self.entry_mut(category_id)?.overrides.clear();
        Ok(())
    }

    pub fn set_conditions(&mut self, category_id: Uuid, conditions: &str) -> Result<()> {
        self.entry_mut(category_id)?.conditions = conditions.to_string();
        Ok(())
    }

    /// Override when present and positive, default price otherwise
    pub fn effective_price(&self, category_id: Uuid, month: Month) -> Result<f64> {
        let entry = self.entry(category_id)?;
        Ok(entry
            .overrides
            .get(&month)
            .copied()
            .filter(|p| *p > 0.0)
            .unwrap_or_else(|| entry.default_or_zero()))
    }

    /// Cleaned pricing: overrides ≤ 0 dropped, unset defaults become 0
    pub fn export(&self) -> Vec<CategoryPricing> {
        self.entries.iter().map(PricingEntry::export).collect()
    }

    /// At least one category carries a positive default price
    pub fn is_valid(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.default_price.map_or(false, |p| p > 0.0))
    }
}
