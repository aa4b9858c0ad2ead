//! InventoryItem - stock on hand

use super::date::flexible_date;
use super::document::{require_positive, require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item: String,
    /// Units on hand; zero means out of stock
    pub quantity: u32,
    pub unit_price: f64,
    /// Agent holding the stock, if it is not at the warehouse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Date of the last stock count
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

impl InventoryItem {
    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

impl Document for InventoryItem {
    const COLLECTION: Collection = Collection::Inventory;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("item", &self.item)?;
        require_positive("unit price", self.unit_price)?;
        if let Some(agent) = &self.agent {
            require_text("agent", agent)?;
        }
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        self.agent.as_deref()
    }
}
