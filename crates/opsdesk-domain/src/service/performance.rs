//! Per-agent performance aggregation
//!
//! A handful of filter/reduce passes over in-memory lists. `today` is an
//! input so the month boundary is decided by the caller's clock.

use crate::model::agent::Agent;
use crate::model::client::Client;
use crate::model::daily_client::DailyAddedClient;
use crate::model::date::same_month;
use crate::model::transaction::Deposit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Figures for one agent relative to `today`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Daily-added clients dated today
    pub daily_added_today: usize,
    /// Daily-added clients dated in the current month
    pub daily_added_month: usize,
    /// Clients whose KYC was completed in the current month
    pub kyc_completed_month: usize,
    /// Sum of deposit amounts dated in the current month
    pub deposits_month: f64,
}

impl PerformanceSummary {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Summary paired with the agent it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub agent: String,
    #[serde(flatten)]
    pub summary: PerformanceSummary,
}

/// Compute the selected agent's figures
///
/// Returns the zero summary when no agent (or a blank name) is selected.
pub fn agent_performance(
    agent: Option<&str>,
    today: NaiveDate,
    daily: &[DailyAddedClient],
    clients: &[Client],
    deposits: &[Deposit],
) -> PerformanceSummary {
    let agent = match agent.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return PerformanceSummary::default(),
    };
    let is_agent = |name: &str| name.trim() == agent;

    let (daily_added_today, daily_added_month) = daily
        .iter()
        .filter(|d| is_agent(&d.agent))
        .fold((0, 0), |(day, month), d| {
            (
                day + usize::from(d.date == today),
                month + usize::from(same_month(d.date, today)),
            )
        });

    let kyc_completed_month = clients
        .iter()
        .filter(|c| is_agent(&c.agent))
        .filter(|c| c.kyc_date.is_some_and(|kyc| same_month(kyc, today)))
        .count();

    let deposits_month = deposits
        .iter()
        .filter(|d| is_agent(&d.agent) && same_month(d.date, today))
        .map(|d| d.amount)
        .sum();

    PerformanceSummary {
        daily_added_today,
        daily_added_month,
        kyc_completed_month,
        deposits_month,
    }
}

/// Figures for every agent in `agents`, sorted by name
pub fn team_overview(
    agents: &[Agent],
    today: NaiveDate,
    daily: &[DailyAddedClient],
    clients: &[Client],
    deposits: &[Deposit],
) -> Vec<AgentPerformance> {
    let mut names: Vec<&str> = agents.iter().map(|a| a.name.trim()).collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|name| AgentPerformance {
            agent: name.to_string(),
            summary: agent_performance(Some(name), today, daily, clients, deposits),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::transaction::{PaymentMode, Transaction};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2024, 5, 15)
    }

    fn lead(agent: &str, date: NaiveDate) -> DailyAddedClient {
        DailyAddedClient {
            name: "Lead".to_string(),
            age: 30,
            location: "Pune".to_string(),
            work: "Tailor".to_string(),
            agent: agent.to_string(),
            date,
        }
    }

    fn deposit(agent: &str, date: NaiveDate, amount: f64) -> Deposit {
        Deposit(Transaction {
            shop_id: "SH-1".to_string(),
            client_name: "Corner Store".to_string(),
            agent: agent.to_string(),
            date,
            amount,
            payment_mode: PaymentMode::Cash,
        })
    }

    fn fixture() -> (Vec<DailyAddedClient>, Vec<Client>, Vec<Deposit>) {
        let daily = vec![
            lead("Ravi", today()),
            lead("Ravi", today()),
            lead("Ravi", ymd(2024, 5, 1)),
            lead("Ravi", ymd(2024, 4, 30)),
            lead("Ravi", ymd(2023, 5, 15)),
            lead("Asha", today()),
        ];
        let clients = vec![
            Client::new("SH-1", "Corner Store", "Ravi").with_kyc_date(ymd(2024, 5, 3)),
            Client::new("SH-2", "Mill", "Ravi").with_kyc_date(ymd(2024, 4, 3)),
            Client::new("SH-3", "Bakery", "Ravi"),
            Client::new("SH-4", "Kiosk", "Asha").with_kyc_date(ymd(2024, 5, 9)),
        ];
        let deposits = vec![
            deposit("Ravi", ymd(2024, 5, 2), 100.0),
            deposit("Ravi", ymd(2024, 5, 31), 250.5),
            deposit("Ravi", ymd(2024, 6, 1), 999.0),
            deposit("Asha", ymd(2024, 5, 2), 70.0),
        ];
        (daily, clients, deposits)
    }

    #[test]
    fn test_no_agent_selected_is_zero() {
        let (daily, clients, deposits) = fixture();
        let summary = agent_performance(None, today(), &daily, &clients, &deposits);
        assert!(summary.is_zero());

        let summary = agent_performance(Some("  "), today(), &daily, &clients, &deposits);
        assert!(summary.is_zero());
    }

    #[test]
    fn test_restricted_to_agent_and_period() {
        let (daily, clients, deposits) = fixture();
        let summary = agent_performance(Some("Ravi"), today(), &daily, &clients, &deposits);

        assert_eq!(summary.daily_added_today, 2);
        assert_eq!(summary.daily_added_month, 3);
        assert_eq!(summary.kyc_completed_month, 1);
        assert_eq!(summary.deposits_month, 350.5);
    }

    #[test]
    fn test_unknown_agent_is_zero() {
        let (daily, clients, deposits) = fixture();
        let summary = agent_performance(Some("Nobody"), today(), &daily, &clients, &deposits);
        assert!(summary.is_zero());
    }

    #[test]
    fn test_team_overview_sorted_and_deduplicated() {
        let (daily, clients, deposits) = fixture();
        let hired = ymd(2023, 1, 1);
        let agents = vec![
            Agent::new("Ravi", "ravi@shop.example", hired),
            Agent::new("Asha", "asha@shop.example", hired),
            Agent::new("Ravi ", "ravi2@shop.example", hired),
        ];

        let overview = team_overview(&agents, today(), &daily, &clients, &deposits);
        let names: Vec<_> = overview.iter().map(|p| p.agent.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Ravi"]);

        assert_eq!(overview[0].summary.daily_added_today, 1);
        assert_eq!(overview[0].summary.kyc_completed_month, 1);
        assert_eq!(overview[0].summary.deposits_month, 70.0);
    }
}
