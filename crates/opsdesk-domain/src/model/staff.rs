//! Staff records: absences, penalties and rewards per agent

use super::date::flexible_date;
use super::document::{require_positive, require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub agent: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

impl Document for Absence {
    const COLLECTION: Collection = Collection::Absences;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("agent", &self.agent)
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub agent: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub amount: f64,
    pub reason: String,
}

impl Document for Penalty {
    const COLLECTION: Collection = Collection::Penalties;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("agent", &self.agent)?;
        require_positive("amount", self.amount)?;
        require_text("reason", &self.reason)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub agent: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub amount: f64,
    pub reason: String,
}

impl Document for Reward {
    const COLLECTION: Collection = Collection::Rewards;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("agent", &self.agent)?;
        require_positive("amount", self.amount)?;
        require_text("reason", &self.reason)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn test_absence_reason_optional() {
        let absence: Absence = serde_json::from_value(serde_json::json!({
            "agent": "Ravi",
            "date": "2024-05-02"
        }))
        .unwrap();
        assert_eq!(absence.reason, "");
        assert!(absence.validate().is_ok());
    }

    #[test]
    fn test_penalty_needs_reason() {
        let penalty = Penalty {
            agent: "Ravi".to_string(),
            date: day(),
            amount: 50.0,
            reason: " ".to_string(),
        };
        assert_eq!(
            penalty.validate(),
            Err(ValidationError::Blank { field: "reason" })
        );
    }

    #[test]
    fn test_reward_amount_positive() {
        let reward = Reward {
            agent: "Ravi".to_string(),
            date: day(),
            amount: 0.0,
            reason: "Top seller".to_string(),
        };
        assert!(reward.validate().is_err());
    }
}
