//! Record scoping and action capabilities inside a page

use opsdesk_domain::{Document, Stored, UserProfile, UserRole};
use shared::OpsError;

/// Which records a signed-in user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordScope {
    /// Managers and admins see every record
    All,
    /// Agents see records attributed to their own agent name
    Agent(String),
}

impl RecordScope {
    pub fn for_profile(profile: &UserProfile) -> Self {
        match profile.role {
            UserRole::Agent => {
                RecordScope::Agent(profile.agent_name.clone().unwrap_or_default().trim().to_string())
            }
            UserRole::Manager | UserRole::Admin => RecordScope::All,
        }
    }

    /// The agent name this scope pins writes to, if any
    pub fn fixed_agent(&self) -> Option<&str> {
        match self {
            RecordScope::All => None,
            RecordScope::Agent(name) => Some(name),
        }
    }

    pub fn permits_agent(&self, agent: Option<&str>) -> bool {
        match self {
            RecordScope::All => true,
            RecordScope::Agent(name) => {
                !name.is_empty() && agent.map(|a| a.trim() == name).unwrap_or(false)
            }
        }
    }

    pub fn permits<T: Document>(&self, record: &T) -> bool {
        self.permits_agent(record.agent_name())
    }

    pub fn filter<T: Document>(&self, records: Vec<Stored<T>>) -> Vec<Stored<T>> {
        match self {
            RecordScope::All => records,
            RecordScope::Agent(_) => records
                .into_iter()
                .filter(|stored| self.permits(&stored.record))
                .collect(),
        }
    }
}

/// Actions that need more than page access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Add or edit agent records
    ManageAgents,
    /// Approve or reject orders
    ReviewOrders,
    /// Record absences, penalties and rewards
    ManageStaffRecords,
    /// Add or edit inventory
    ManageInventory,
    /// Publish team performance snapshots
    PublishPerformance,
    /// Create user accounts
    ManageUsers,
}

impl Capability {
    /// Lowest role holding the capability
    pub fn minimum_role(&self) -> UserRole {
        match self {
            Capability::ManageUsers => UserRole::Admin,
            Capability::ManageAgents
            | Capability::ReviewOrders
            | Capability::ManageStaffRecords
            | Capability::ManageInventory
            | Capability::PublishPerformance => UserRole::Manager,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::ManageAgents => "manage agents",
            Capability::ReviewOrders => "review orders",
            Capability::ManageStaffRecords => "record absences, penalties and rewards",
            Capability::ManageInventory => "manage inventory",
            Capability::PublishPerformance => "publish team performance",
            Capability::ManageUsers => "manage user accounts",
        }
    }

    pub fn check(&self, role: UserRole) -> Result<(), OpsError> {
        if role >= self.minimum_role() {
            return Ok(());
        }
        Err(OpsError::Forbidden(format!(
            "role '{}' cannot {}",
            role,
            self.description()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_domain::{Client, DocumentId};

    fn stored(id: &str, agent: &str) -> Stored<Client> {
        Stored::new(DocumentId::new(id), Client::new(id, "Shop", agent))
    }

    #[test]
    fn test_scope_for_profiles() {
        let agent = UserProfile::new("u1", "ravi@shop.example", "Ravi", UserRole::Agent)
            .with_agent_name(" Ravi ");
        assert_eq!(RecordScope::for_profile(&agent), RecordScope::Agent("Ravi".to_string()));

        let manager = UserProfile::new("u2", "lead@shop.example", "Lead", UserRole::Manager);
        assert_eq!(RecordScope::for_profile(&manager), RecordScope::All);
    }

    #[test]
    fn test_agent_scope_filters_records() {
        let records = vec![stored("a", "Ravi"), stored("b", "Asha"), stored("c", "Ravi")];

        let ravi = RecordScope::Agent("Ravi".to_string());
        let visible: Vec<_> = ravi
            .filter(records.clone())
            .into_iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(visible, vec!["a", "c"]);

        assert_eq!(RecordScope::All.filter(records).len(), 3);
    }

    #[test]
    fn test_unlinked_agent_sees_nothing() {
        let scope = RecordScope::Agent(String::new());
        assert!(!scope.permits_agent(Some("")));
        assert!(!scope.permits_agent(None));
    }

    #[test]
    fn test_capabilities() {
        assert!(Capability::ReviewOrders.check(UserRole::Manager).is_ok());
        assert!(Capability::ReviewOrders.check(UserRole::Agent).is_err());
        assert!(Capability::ManageUsers.check(UserRole::Manager).is_err());
        assert!(Capability::ManageUsers.check(UserRole::Admin).is_ok());
    }
}
