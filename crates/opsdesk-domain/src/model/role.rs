//! UserRole - what a signed-in user is allowed to do
//!
//! Role is a Value Object - two roles with the same variant are equal.
//! It is distinct from an agent's job title (`Agent::role`).

use serde::{Deserialize, Serialize};

/// The three dashboard roles, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Field agent, sees their own clients and numbers
    Agent,

    /// Team manager, runs every operational page
    Manager,

    /// Full access including user administration
    Admin,
}

impl UserRole {
    /// Wire / config identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Agent => "agent",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Agent => "Agent",
            UserRole::Manager => "Manager",
            UserRole::Admin => "Admin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UserRole::Agent => "Records clients and transactions for their own book",
            UserRole::Manager => "Runs the team: agents, orders, penalties and rewards",
            UserRole::Admin => "Everything a manager can do, plus user accounts",
        }
    }

    /// Manager or above
    pub fn is_supervisor(&self) -> bool {
        *self >= UserRole::Manager
    }

    pub fn all() -> &'static [UserRole] {
        &[UserRole::Agent, UserRole::Manager, UserRole::Admin]
    }
}

impl core::fmt::Display for UserRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::str::FromStr for UserRole {
    type Err = crate::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::all()
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::ValidationError::UnknownValue {
                field: "role",
                value: s.to_string(),
            })
    }
}
