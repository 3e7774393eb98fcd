use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ShoppingConfig;
use crate::models::{ItemPrices, ProviderId, ProviderPrices};

/// Inventory row as supplied by the external inventory source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    /// Only consumed rows are candidates for rebuying
    #[serde(default)]
    pub is_consumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingReason {
    LowStock,
    Expiring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub name: String,
    pub current_quantity: i64,
    pub suggested_quantity: i64,
    pub prices: ProviderPrices,
    pub reason: ShoppingReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Must-buy: anything expiring, plus high-velocity items running low
    pub main: Vec<ShoppingListItem>,
    /// Low-velocity items running low, left to the user
    pub recommended: Vec<ShoppingListItem>,
}

pub struct ShoppingPlanner {
    config: ShoppingConfig,
}

impl ShoppingPlanner {
    pub fn new(config: ShoppingConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self, items: &[InventoryItem], today: NaiveDate) -> ShoppingList {
        let expiry_cutoff = today + Duration::days(self.config.expiring_within_days);
        let mut list = ShoppingList::default();

        for item in items.iter().filter(|item| item.is_consumed) {
            let is_low = item.quantity <= self.config.low_stock_threshold;
            let is_expiring = item.expiry_date.is_some_and(|date| date <= expiry_cutoff);

            if !is_low && !is_expiring {
                continue;
            }

            let high_velocity = self.is_high_velocity(item.category.as_deref());
            let entry = ShoppingListItem {
                id: item.id,
                name: item.name.clone(),
                current_quantity: item.quantity,
                suggested_quantity: 1,
                prices: ProviderPrices::pending(),
                reason: if is_expiring {
                    ShoppingReason::Expiring
                } else {
                    ShoppingReason::LowStock
                },
            };

            if is_expiring || high_velocity {
                list.main.push(entry);
            } else {
                list.recommended.push(entry);
            }
        }

        info!(
            "Shopping list planned: {} main, {} recommended out of {} items",
            list.main.len(),
            list.recommended.len(),
            items.len()
        );

        list
    }

    fn is_high_velocity(&self, category: Option<&str>) -> bool {
        let category = category.unwrap_or(&self.config.default_category);
        self.config
            .high_velocity_categories
            .iter()
            .any(|c| category.contains(c.as_str()))
    }
}

impl Default for ShoppingPlanner {
    fn default() -> Self {
        Self::new(ShoppingConfig::default())
    }
}

impl ShoppingList {
    /// Distinct names across both sections, in list order
    pub fn item_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for item in self.items() {
            if !names.contains(&item.name) {
                names.push(item.name.clone());
            }
        }
        names
    }

    /// Fill prices on every entry with a matching name; returns how many were updated
    pub fn apply_prices(&mut self, update: &ItemPrices) -> usize {
        let mut updated = 0;
        for item in self.main.iter_mut().chain(self.recommended.iter_mut()) {
            if item.name == update.name {
                item.prices = update.prices.clone();
                updated += 1;
            }
        }
        updated
    }

    /// Sum of price x suggested quantity over the main section
    pub fn estimated_total(&self, provider: ProviderId) -> f64 {
        self.main
            .iter()
            .map(|item| item.prices.get(provider).price * item.suggested_quantity as f64)
            .sum()
    }

    fn items(&self) -> impl Iterator<Item = &ShoppingListItem> {
        self.main.iter().chain(self.recommended.iter())
    }
}
