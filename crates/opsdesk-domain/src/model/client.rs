//! Client - a shop account managed by an agent

use super::date::flexible_date_opt;
use super::document::{require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

/// Lifecycle of a client account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    #[serde(rename = "In Process")]
    InProcess,
    Active,
    Eliminated,
}

impl ClientStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClientStatus::InProcess => "In Process",
            ClientStatus::Active => "Active",
            ClientStatus::Eliminated => "Eliminated",
        }
    }

    pub fn all() -> &'static [ClientStatus] {
        &[
            ClientStatus::InProcess,
            ClientStatus::Active,
            ClientStatus::Eliminated,
        ]
    }
}

impl core::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl core::str::FromStr for ClientStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        ClientStatus::all()
            .iter()
            .copied()
            .find(|status| {
                status
                    .display_name()
                    .replace(' ', "")
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// External account id, the join key with transactions and orders
    pub shop_id: String,
    pub name: String,
    /// Name of the agent the client is assigned to
    pub agent: String,
    /// Date KYC was completed, if it has been
    #[serde(default, with = "flexible_date_opt")]
    pub kyc_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ClientStatus,
}

impl Client {
    pub fn new(
        shop_id: impl Into<String>,
        name: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            shop_id: shop_id.into(),
            name: name.into(),
            agent: agent.into(),
            kyc_date: None,
            status: ClientStatus::InProcess,
        }
    }

    /// Builder: record the KYC completion date
    pub fn with_kyc_date(mut self, date: NaiveDate) -> Self {
        self.kyc_date = Some(date);
        self
    }

    /// Builder: set status
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }
}

impl Document for Client {
    const COLLECTION: Collection = Collection::Clients;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("shop id", &self.shop_id)?;
        require_text("name", &self.name)?;
        require_text("agent", &self.agent)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}
