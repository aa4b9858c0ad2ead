//! Agent - a member of the field team
//!
//! Other records point at an agent by `name`, so the name is the join key
//! across collections. The document id is only the storage identity.

use super::date::flexible_date;
use super::document::{require_email, require_text, Document, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Display name, referenced by clients, transactions and orders
    pub name: String,
    pub email: String,
    #[serde(with = "flexible_date")]
    pub hire_date: NaiveDate,
    /// Employment type, e.g. "Full Time"
    #[serde(rename = "type")]
    pub agent_type: String,
    /// Job title, e.g. "Field Agent"
    pub role: String,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            hire_date,
            agent_type: "Full Time".to_string(),
            role: "Field Agent".to_string(),
        }
    }

    /// Builder: set employment type
    pub fn with_type(mut self, agent_type: impl Into<String>) -> Self {
        self.agent_type = agent_type.into();
        self
    }

    /// Builder: set job title
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Whether this agent is the one named (names match ignoring surrounding space)
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim() == name.trim()
    }
}

impl Document for Agent {
    const COLLECTION: Collection = Collection::Agents;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("type", &self.agent_type)?;
        require_text("role", &self.role)?;
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hired() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
    }

    #[test]
    fn test_agent_creation() {
        let agent = Agent::new("Ravi", "ravi@shop.example", hired())
            .with_type("Part Time")
            .with_role("Team Lead");

        assert_eq!(agent.name, "Ravi");
        assert_eq!(agent.agent_type, "Part Time");
        assert_eq!(agent.role, "Team Lead");
        assert!(agent.validate().is_ok());
        assert!(agent.is_named(" Ravi "));
    }

    #[test]
    fn test_agent_requires_email() {
        let agent = Agent::new("Ravi", "ravi", hired());
        assert!(matches!(
            agent.validate(),
            Err(ValidationError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn test_wire_format() {
        let agent = Agent::new("Ravi", "ravi@shop.example", hired());
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["hireDate"], "2023-06-01");
        assert_eq!(json["type"], "Full Time");

        let parsed: Agent = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "email": "ravi@shop.example",
            "hireDate": "2023-06-01T08:00:00Z",
            "type": "Full Time",
            "role": "Field Agent"
        }))
        .unwrap();
        assert_eq!(parsed, agent);
    }
}
