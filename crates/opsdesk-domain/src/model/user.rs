//! UserProfile - the per-user document keyed by the session subject

use super::document::{require_email, require_text, Document, DocumentId, ValidationError};
use super::role::UserRole;
use serde::{Deserialize, Serialize};
use shared::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Subject id issued by the identity provider; also the document id
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    /// Agent record this user acts as; required for the agent role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl UserProfile {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: display_name.into(),
            role,
            agent_name: None,
        }
    }

    /// Builder: link to an agent record
    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    pub fn document_id(&self) -> DocumentId {
        DocumentId::new(self.uid.clone())
    }
}

impl Document for UserProfile {
    const COLLECTION: Collection = Collection::Users;

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("uid", &self.uid)?;
        require_email(&self.email)?;
        require_text("display name", &self.display_name)?;
        if self.role == UserRole::Agent {
            match &self.agent_name {
                Some(name) => require_text("agent name", name)?,
                None => return Err(ValidationError::Missing { field: "agent name" }),
            }
        }
        Ok(())
    }

    fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_users_need_agent_link() {
        let profile = UserProfile::new("u1", "ravi@shop.example", "Ravi", UserRole::Agent);
        assert_eq!(
            profile.validate(),
            Err(ValidationError::Missing { field: "agent name" })
        );
        assert!(profile.with_agent_name("Ravi").validate().is_ok());
    }

    #[test]
    fn test_manager_needs_no_agent_link() {
        let profile = UserProfile::new("u2", "lead@shop.example", "Lead", UserRole::Manager);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.document_id().as_str(), "u2");
    }
}
