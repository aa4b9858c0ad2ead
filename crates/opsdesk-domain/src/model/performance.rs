//! TeamPerformance - a published snapshot of one agent's monthly numbers

use super::date::flexible_date;
use super::document::{require_text, Document, DocumentId, ValidationError};
use crate::service::performance::PerformanceSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPerformance {
    pub agent: String,
    /// Month the figures cover, `YYYY-MM`
    pub month: String,
    pub daily_added_today: usize,
    pub daily_added_month: usize,
    pub kyc_completed_month: usize,
    pub deposits_month: f64,
    /// Day the figures were computed
    #[serde(with = "flexible_date")]
    pub as_of: NaiveDate,
}

impl TeamPerformance {
    pub fn from_summary(agent: impl Into<String>, as_of: NaiveDate, summary: &PerformanceSummary) -> Self {
        Self {
            agent: agent.into(),
            month: as_of.format("%Y-%m").to_string(),
            daily_added_today: summary.daily_added_today,
            daily_added_month: summary.daily_added_month,
            kyc_completed_month: summary.kyc_completed_month,
            deposits_month: summary.deposits_month,
            as_of,
        }
    }

    /// Stable id per agent and month, so republishing replaces the snapshot
    pub fn document_id(&self) -> DocumentId {
        let slug: String = self
            .agent
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        DocumentId::new(format!("{}_{}", slug, self.month))
    }
}

impl Document for TeamPerformance {
    const COLLECTION: Collection = Collection::TeamPerformance;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("agent", &self.agent)?;
        require_text("month", &self.month)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_per_agent_and_month() {
        let summary = PerformanceSummary {
            daily_added_today: 1,
            daily_added_month: 4,
            kyc_completed_month: 2,
            deposits_month: 900.0,
        };
        let may = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let later_in_may = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        let first = TeamPerformance::from_summary("Ravi Kumar", may, &summary);
        let second = TeamPerformance::from_summary("Ravi Kumar", later_in_may, &summary);

        assert_eq!(first.month, "2024-05");
        assert_eq!(first.document_id().as_str(), "ravi-kumar_2024-05");
        assert_eq!(first.document_id(), second.document_id());
    }
}
