//! Order - a stock order an agent raises for a shop

use super::document::{require_positive, require_text, Document, ValidationError};
use serde::{Deserialize, Serialize};
use shared::Collection;

/// Review state of an order
///
/// ```text
/// Pending ──► Approved
///    │
///    └──────► Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        }
    }

    /// Check if this is a terminal state
    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub agent: String,
    pub shop_id: String,
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    pub fn new(
        agent: impl Into<String>,
        shop_id: impl Into<String>,
        location: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            agent: agent.into(),
            shop_id: shop_id.into(),
            location: location.into(),
            price,
            remarks: String::new(),
            status: OrderStatus::Pending,
        }
    }

    /// Builder: set remarks
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// Move a pending order to its final state
    pub fn transition(&mut self, to: OrderStatus) -> Result<(), ValidationError> {
        if self.status.is_final() || !to.is_final() {
            return Err(ValidationError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), ValidationError> {
        self.transition(OrderStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), ValidationError> {
        self.transition(OrderStatus::Rejected)
    }
}

impl Document for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("agent", &self.agent)?;
        require_text("shop id", &self.shop_id)?;
        require_text("location", &self.location)?;
        require_positive("price", self.price)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}
