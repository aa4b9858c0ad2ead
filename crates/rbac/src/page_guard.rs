//! PageGuard - which roles may open which page

use crate::page::Page;
use opsdesk_domain::UserRole;
use shared::{OpsError, PageAccessDeniedError};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// PageGuard holds the page → roles table and answers access checks
#[derive(Debug, Clone)]
pub struct PageGuard {
    rules: HashMap<Page, BTreeSet<UserRole>>,
}

impl PageGuard {
    /// Guard with the default policy
    pub fn new() -> Self {
        let mut guard = Self {
            rules: HashMap::new(),
        };
        for page in Page::all() {
            guard.set_rule(*page, Self::default_roles(*page).iter().copied());
        }
        guard
    }

    /// Default policy, before config overrides
    pub fn default_roles(page: Page) -> &'static [UserRole] {
        use UserRole::*;
        match page {
            Page::Dashboard
            | Page::Clients
            | Page::DailyClients
            | Page::Transactions
            | Page::Orders
            | Page::TeamPerformance => &[Agent, Manager, Admin],
            Page::Agents
            | Page::Inventory
            | Page::Absences
            | Page::Penalties
            | Page::Rewards => &[Manager, Admin],
            Page::Users => &[Admin],
        }
    }

    /// Default policy with per-page overrides from `AppConfig::page_access`
    pub fn from_overrides(overrides: &HashMap<String, Vec<String>>) -> Result<Self, OpsError> {
        let mut guard = Self::new();
        for (page_id, role_ids) in overrides {
            let page: Page = page_id.parse()?;
            let roles = role_ids
                .iter()
                .map(|r| {
                    r.parse::<UserRole>()
                        .map_err(|e| OpsError::Config(format!("page '{}': {}", page_id, e)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            debug!(page = %page, ?roles, "Page access override");
            guard.set_rule(page, roles);
        }
        Ok(guard)
    }

    /// Replace the roles allowed on a page
    ///
    /// Admin is always kept.
    pub fn set_rule(&mut self, page: Page, roles: impl IntoIterator<Item = UserRole>) {
        let mut set: BTreeSet<UserRole> = roles.into_iter().collect();
        set.insert(UserRole::Admin);
        self.rules.insert(page, set);
    }

    pub fn allowed_roles(&self, page: Page) -> Vec<UserRole> {
        self.rules
            .get(&page)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn can_open(&self, role: UserRole, page: Page) -> bool {
        self.rules
            .get(&page)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }

    /// Check access, producing the user-facing denial error
    pub fn check(&self, role: UserRole, page: Page) -> Result<(), PageAccessDeniedError> {
        if self.can_open(role, page) {
            return Ok(());
        }
        Err(PageAccessDeniedError {
            page: page.to_string(),
            role: role.to_string(),
            allowed_roles: self
                .allowed_roles(page)
                .iter()
                .map(|r| r.to_string())
                .collect(),
        })
    }

    /// Pages shown in the sidebar for a role, in menu order
    pub fn visible_pages(&self, role: UserRole) -> Vec<Page> {
        Page::all()
            .iter()
            .copied()
            .filter(|page| self.can_open(role, *page))
            .collect()
    }
}

impl Default for PageGuard {
    fn default() -> Self {
        Self::new()
    }
}
