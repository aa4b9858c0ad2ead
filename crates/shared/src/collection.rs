//! Named document collections

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every collection the backend stores documents in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Agents,
    Clients,
    DailyAddedClients,
    Deposits,
    Withdrawals,
    Inventory,
    Orders,
    Absences,
    Penalties,
    Rewards,
    TeamPerformance,
    Users,
}

impl Collection {
    /// Wire name of the collection (also the on-disk file stem)
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Agents => "agents",
            Collection::Clients => "clients",
            Collection::DailyAddedClients => "dailyAddedClients",
            Collection::Deposits => "deposits",
            Collection::Withdrawals => "withdrawals",
            Collection::Inventory => "inventory",
            Collection::Orders => "orders",
            Collection::Absences => "absences",
            Collection::Penalties => "penalties",
            Collection::Rewards => "rewards",
            Collection::TeamPerformance => "teamPerformance",
            Collection::Users => "users",
        }
    }

    pub fn all() -> &'static [Collection] {
        &[
            Collection::Agents,
            Collection::Clients,
            Collection::DailyAddedClients,
            Collection::Deposits,
            Collection::Withdrawals,
            Collection::Inventory,
            Collection::Orders,
            Collection::Absences,
            Collection::Penalties,
            Collection::Rewards,
            Collection::TeamPerformance,
            Collection::Users,
        ]
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = crate::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::OpsError::Config(format!("Unknown collection '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for collection in Collection::all() {
            let json = serde_json::to_string(collection).unwrap();
            assert_eq!(json, format!("\"{}\"", collection.as_str()));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "dailyaddedclients".parse::<Collection>().unwrap(),
            Collection::DailyAddedClients
        );
        assert!("ledger".parse::<Collection>().is_err());
    }
}
