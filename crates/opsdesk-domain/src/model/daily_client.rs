//! DailyAddedClient - a lead an agent registered on a given day
//!
//! Usually produced by the pasted-text parser in the `intake` crate.

use super::date::flexible_date;
use super::document::{require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAddedClient {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub work: String,
    pub agent: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

impl Document for DailyAddedClient {
    const COLLECTION: Collection = Collection::DailyAddedClients;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                value: i64::from(self.age),
                min: i64::from(MIN_AGE),
                max: i64::from(MAX_AGE),
            });
        }
        require_text("location", &self.location)?;
        require_text("work", &self.work)?;
        require_text("agent", &self.agent)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: u32) -> DailyAddedClient {
        DailyAddedClient {
            name: "Meera".to_string(),
            age,
            location: "Pune".to_string(),
            work: "Tailor".to_string(),
            agent: "Ravi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        }
    }

    #[test]
    fn test_age_bounds() {
        assert!(record(34).validate().is_ok());
        assert!(matches!(
            record(0).validate(),
            Err(ValidationError::OutOfRange { field: "age", .. })
        ));
        assert!(record(121).validate().is_err());
    }
}
