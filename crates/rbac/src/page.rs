//! Page - the dashboard's navigable pages

use serde::{Deserialize, Serialize};
use shared::{Collection, OpsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Agents,
    Clients,
    DailyClients,
    Transactions,
    Orders,
    Inventory,
    Absences,
    Penalties,
    Rewards,
    TeamPerformance,
    Users,
}

impl Page {
    /// Route / config identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Agents => "agents",
            Page::Clients => "clients",
            Page::DailyClients => "daily-clients",
            Page::Transactions => "transactions",
            Page::Orders => "orders",
            Page::Inventory => "inventory",
            Page::Absences => "absences",
            Page::Penalties => "penalties",
            Page::Rewards => "rewards",
            Page::TeamPerformance => "team-performance",
            Page::Users => "users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Agents => "Agents",
            Page::Clients => "Clients",
            Page::DailyClients => "Daily Added Clients",
            Page::Transactions => "Transactions",
            Page::Orders => "Orders",
            Page::Inventory => "Inventory",
            Page::Absences => "Absences",
            Page::Penalties => "Penalties",
            Page::Rewards => "Rewards",
            Page::TeamPerformance => "Team Performance",
            Page::Users => "Users",
        }
    }

    /// Collections the page reads
    pub fn collections(&self) -> &'static [Collection] {
        match self {
            Page::Dashboard => &[
                Collection::Agents,
                Collection::Clients,
                Collection::DailyAddedClients,
                Collection::Deposits,
            ],
            Page::Agents => &[Collection::Agents],
            Page::Clients => &[Collection::Clients],
            Page::DailyClients => &[Collection::DailyAddedClients],
            Page::Transactions => &[Collection::Deposits, Collection::Withdrawals],
            Page::Orders => &[Collection::Orders],
            Page::Inventory => &[Collection::Inventory],
            Page::Absences => &[Collection::Absences],
            Page::Penalties => &[Collection::Penalties],
            Page::Rewards => &[Collection::Rewards],
            Page::TeamPerformance => &[
                Collection::TeamPerformance,
                Collection::Agents,
                Collection::Clients,
                Collection::DailyAddedClients,
                Collection::Deposits,
            ],
            Page::Users => &[Collection::Users],
        }
    }

    pub fn all() -> &'static [Page] {
        &[
            Page::Dashboard,
            Page::Agents,
            Page::Clients,
            Page::DailyClients,
            Page::Transactions,
            Page::Orders,
            Page::Inventory,
            Page::Absences,
            Page::Penalties,
            Page::Rewards,
            Page::TeamPerformance,
            Page::Users,
        ]
    }
}

impl core::fmt::Display for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Page {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Page::all()
            .iter()
            .copied()
            .find(|page| page.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| OpsError::Config(format!("Unknown page '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids_round_trip() {
        for page in Page::all() {
            assert_eq!(page.as_str().parse::<Page>().unwrap(), *page);
        }
        assert_eq!("daily_clients".parse::<Page>().unwrap(), Page::DailyClients);
        assert!("billing".parse::<Page>().is_err());
    }

    #[test]
    fn test_dashboard_reads_the_aggregation_inputs() {
        let collections = Page::Dashboard.collections();
        assert!(collections.contains(&Collection::DailyAddedClients));
        assert!(collections.contains(&Collection::Deposits));
    }
}
