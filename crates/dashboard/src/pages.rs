//! Page operations
//!
//! Each write runs the same pipeline: session and page guard, capability and
//! record scope, form validation, store write, then audit and notification.

use crate::dashboard::Dashboard;
use chrono::NaiveDate;
use intake::parse_client_details;
use opsdesk_domain::{
    agent_performance, team_overview, Absence, Agent, AgentPerformance, Client, ClientStatus,
    DailyAddedClient, Deposit, Document, DocumentId, InventoryItem, Order, OrderStatus, Penalty,
    PerformanceSummary, Repository, Reward, Stored, TeamPerformance, Transaction, UserProfile,
    UserRole, Withdrawal,
};
use rbac::{Capability, Page, RecordScope};
use shared::{Collection, OpsError, Result};
use tracing::warn;

impl Dashboard {
    // ========== Agents ==========

    pub fn add_agent(&mut self, agent: Agent) -> Result<Stored<Agent>> {
        let actor = self.authorize(Page::Agents)?;
        self.require(&actor, Capability::ManageAgents, Collection::Agents)?;
        self.commit(&actor, DocumentId::generate(), &agent, true)
    }

    pub fn update_agent(&mut self, id: &DocumentId, agent: Agent) -> Result<Stored<Agent>> {
        let actor = self.authorize(Page::Agents)?;
        self.require(&actor, Capability::ManageAgents, Collection::Agents)?;
        self.existing::<Agent>(&actor, id)?;
        self.commit(&actor, id.clone(), &agent, false)
    }

    pub fn agents(&mut self) -> Result<Vec<Stored<Agent>>> {
        self.list_scoped(Page::Agents)
    }

    // ========== Clients ==========

    pub fn add_client(&mut self, client: Client) -> Result<Stored<Client>> {
        let actor = self.authorize(Page::Clients)?;
        self.require_scope(&actor, &client)?;
        self.commit(&actor, DocumentId::generate(), &client, true)
    }

    pub fn update_client(&mut self, id: &DocumentId, client: Client) -> Result<Stored<Client>> {
        let actor = self.authorize(Page::Clients)?;
        self.existing::<Client>(&actor, id)?;
        self.require_scope(&actor, &client)?;
        self.commit(&actor, id.clone(), &client, false)
    }

    /// Move a client between In Process, Active and Eliminated
    pub fn set_client_status(&mut self, id: &DocumentId, status: ClientStatus) -> Result<Stored<Client>> {
        let actor = self.authorize(Page::Clients)?;
        let mut client = self.existing::<Client>(&actor, id)?;
        client.status = status;
        self.commit(&actor, id.clone(), &client, false)
    }

    pub fn clients(&mut self) -> Result<Vec<Stored<Client>>> {
        self.list_scoped(Page::Clients)
    }

    // ========== Daily added clients ==========

    /// Parse pasted client details and store them as a daily record
    ///
    /// `agent` defaults to the caller's own agent name; `date` to today.
    pub fn add_daily_client_from_text(
        &mut self,
        text: &str,
        agent: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Stored<DailyAddedClient>> {
        let actor = self.authorize(Page::DailyClients)?;
        let collection = Collection::DailyAddedClients;

        let details = match parse_client_details(text) {
            Ok(details) => details,
            Err(err) => return Err(self.fail(&actor, collection, OpsError::Parse(err.to_string()))),
        };

        let agent = match agent.map(str::trim).filter(|a| !a.is_empty()) {
            Some(agent) => agent.to_string(),
            None => match actor.scope.fixed_agent() {
                Some(own) => own.to_string(),
                None => {
                    let err = OpsError::Validation("agent is required".to_string());
                    return Err(self.fail(&actor, collection, err));
                }
            },
        };

        let record = details.into_record(agent, date.unwrap_or_else(|| self.today()));
        self.require_scope(&actor, &record)?;
        self.commit(&actor, DocumentId::generate(), &record, true)
    }

    pub fn add_daily_client(&mut self, record: DailyAddedClient) -> Result<Stored<DailyAddedClient>> {
        let actor = self.authorize(Page::DailyClients)?;
        self.require_scope(&actor, &record)?;
        self.commit(&actor, DocumentId::generate(), &record, true)
    }

    pub fn daily_clients(&mut self) -> Result<Vec<Stored<DailyAddedClient>>> {
        self.list_scoped(Page::DailyClients)
    }

    // ========== Transactions ==========

    pub fn record_deposit(&mut self, transaction: Transaction) -> Result<Stored<Deposit>> {
        self.record_transaction(Deposit(transaction))
    }

    pub fn record_withdrawal(&mut self, transaction: Transaction) -> Result<Stored<Withdrawal>> {
        self.record_transaction(Withdrawal(transaction))
    }

    fn record_transaction<T: Document>(&mut self, record: T) -> Result<Stored<T>> {
        let actor = self.authorize(Page::Transactions)?;
        self.require_scope(&actor, &record)?;
        self.commit(&actor, DocumentId::generate(), &record, true)
    }

    pub fn deposits(&mut self) -> Result<Vec<Stored<Deposit>>> {
        self.list_scoped(Page::Transactions)
    }

    pub fn withdrawals(&mut self) -> Result<Vec<Stored<Withdrawal>>> {
        self.list_scoped(Page::Transactions)
    }

    // ========== Orders ==========

    /// New orders always start as Pending
    pub fn place_order(&mut self, mut order: Order) -> Result<Stored<Order>> {
        let actor = self.authorize(Page::Orders)?;
        order.status = OrderStatus::Pending;
        self.require_scope(&actor, &order)?;
        self.commit(&actor, DocumentId::generate(), &order, true)
    }

    pub fn approve_order(&mut self, id: &DocumentId) -> Result<Stored<Order>> {
        self.review_order(id, OrderStatus::Approved)
    }

    pub fn reject_order(&mut self, id: &DocumentId) -> Result<Stored<Order>> {
        self.review_order(id, OrderStatus::Rejected)
    }

    fn review_order(&mut self, id: &DocumentId, to: OrderStatus) -> Result<Stored<Order>> {
        let actor = self.authorize(Page::Orders)?;
        self.require(&actor, Capability::ReviewOrders, Collection::Orders)?;
        let mut order = self.existing::<Order>(&actor, id)?;
        if let Err(err) = order.transition(to) {
            return Err(self.fail(&actor, Collection::Orders, err.into()));
        }
        self.commit(&actor, id.clone(), &order, false)
    }

    pub fn orders(&mut self) -> Result<Vec<Stored<Order>>> {
        self.list_scoped(Page::Orders)
    }

    // ========== Inventory ==========

    pub fn add_inventory_item(&mut self, item: InventoryItem) -> Result<Stored<InventoryItem>> {
        let actor = self.authorize(Page::Inventory)?;
        self.require(&actor, Capability::ManageInventory, Collection::Inventory)?;
        self.commit(&actor, DocumentId::generate(), &item, true)
    }

    pub fn update_inventory_item(&mut self, id: &DocumentId, item: InventoryItem) -> Result<Stored<InventoryItem>> {
        let actor = self.authorize(Page::Inventory)?;
        self.require(&actor, Capability::ManageInventory, Collection::Inventory)?;
        self.existing::<InventoryItem>(&actor, id)?;
        self.commit(&actor, id.clone(), &item, false)
    }

    pub fn inventory(&mut self) -> Result<Vec<Stored<InventoryItem>>> {
        self.list_scoped(Page::Inventory)
    }

    // ========== Absences / penalties / rewards ==========

    pub fn record_absence(&mut self, absence: Absence) -> Result<Stored<Absence>> {
        self.record_staff(Page::Absences, absence)
    }

    pub fn record_penalty(&mut self, penalty: Penalty) -> Result<Stored<Penalty>> {
        self.record_staff(Page::Penalties, penalty)
    }

    pub fn record_reward(&mut self, reward: Reward) -> Result<Stored<Reward>> {
        self.record_staff(Page::Rewards, reward)
    }

    fn record_staff<T: Document>(&mut self, page: Page, record: T) -> Result<Stored<T>> {
        let actor = self.authorize(page)?;
        self.require(&actor, Capability::ManageStaffRecords, T::COLLECTION)?;
        self.commit(&actor, DocumentId::generate(), &record, true)
    }

    pub fn absences(&mut self) -> Result<Vec<Stored<Absence>>> {
        self.list_scoped(Page::Absences)
    }

    pub fn penalties(&mut self) -> Result<Vec<Stored<Penalty>>> {
        self.list_scoped(Page::Penalties)
    }

    pub fn rewards(&mut self) -> Result<Vec<Stored<Reward>>> {
        self.list_scoped(Page::Rewards)
    }

    // ========== Users ==========

    /// Create an account and its profile document
    ///
    /// The profile is validated before the account exists, and the account
    /// is removed again if the profile cannot be stored.
    pub fn register_user(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
        role: UserRole,
        agent_name: Option<&str>,
    ) -> Result<Stored<UserProfile>> {
        let actor = self.authorize(Page::Users)?;
        self.require(&actor, Capability::ManageUsers, Collection::Users)?;

        let mut profile = UserProfile::new("pending", email.trim(), display_name, role);
        profile.agent_name = agent_name.map(|a| a.trim().to_string());
        if let Err(err) = profile.validate() {
            return Err(self.fail(&actor, Collection::Users, err.into()));
        }

        profile.uid = match self.identity().create_account(email, password) {
            Ok(uid) => uid,
            Err(err) => return Err(self.fail(&actor, Collection::Users, err.into())),
        };
        let uid = profile.uid.clone();
        let stored = self.commit(&actor, profile.document_id(), &profile, true);
        if stored.is_err() {
            if let Err(err) = self.identity().delete_account(&uid) {
                warn!(uid = %uid, error = %err, "Could not remove account after profile write failed");
            }
        }
        stored
    }

    pub fn users(&mut self) -> Result<Vec<Stored<UserProfile>>> {
        let actor = self.authorize(Page::Users)?;
        let records = self.store.list(Collection::Users)?;
        let profiles = opsdesk_store::decode_documents::<UserProfile>(&records);
        // Profiles are not agent-attributed records; only supervisors list them
        if actor.role.is_supervisor() {
            Ok(profiles)
        } else {
            Ok(Vec::new())
        }
    }

    // ========== Performance ==========

    /// Figures for one agent relative to today
    ///
    /// Agents always get their own figures whatever is asked for.
    pub fn agent_performance(&mut self, agent: Option<&str>) -> Result<PerformanceSummary> {
        let actor = self.authorize(Page::Dashboard)?;
        let selected = match &actor.scope {
            RecordScope::All => agent.map(str::to_string),
            RecordScope::Agent(own) => Some(own.clone()),
        };

        let daily = self.all_records::<DailyAddedClient>()?;
        let clients = self.all_records::<Client>()?;
        let deposits = self.all_records::<Deposit>()?;
        Ok(agent_performance(
            selected.as_deref(),
            self.today(),
            &daily,
            &clients,
            &deposits,
        ))
    }

    /// Figures for every agent on the agents list
    pub fn team_overview(&mut self) -> Result<Vec<AgentPerformance>> {
        let actor = self.authorize(Page::TeamPerformance)?;

        let agents = self.all_records::<Agent>()?;
        let daily = self.all_records::<DailyAddedClient>()?;
        let clients = self.all_records::<Client>()?;
        let deposits = self.all_records::<Deposit>()?;
        let mut rows = team_overview(&agents, self.today(), &daily, &clients, &deposits);
        rows.retain(|row| actor.scope.permits_agent(Some(&row.agent)));
        Ok(rows)
    }

    /// Persist the agent's current figures as this month's snapshot
    ///
    /// Republishing in the same month replaces the earlier snapshot.
    pub fn publish_team_performance(&mut self, agent: &str) -> Result<Stored<TeamPerformance>> {
        let actor = self.authorize(Page::TeamPerformance)?;
        self.require(&actor, Capability::PublishPerformance, Collection::TeamPerformance)?;

        let today = self.today();
        let daily = self.all_records::<DailyAddedClient>()?;
        let clients = self.all_records::<Client>()?;
        let deposits = self.all_records::<Deposit>()?;
        let summary = agent_performance(Some(agent), today, &daily, &clients, &deposits);

        let snapshot = TeamPerformance::from_summary(agent.trim(), today, &summary);
        let id = snapshot.document_id();
        let created = !Repository::<TeamPerformance>::exists(&self.store, &id)?;
        self.commit(&actor, id, &snapshot, created)
    }

    /// Published monthly snapshots
    pub fn team_performance(&mut self) -> Result<Vec<Stored<TeamPerformance>>> {
        self.list_scoped(Page::TeamPerformance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_domain::PaymentMode;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn signed_in_admin() -> Dashboard {
        let mut dashboard = Dashboard::in_memory();
        dashboard.set_today(day(20));
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();
        dashboard.sign_in("owner@shop.example", "secret123").unwrap();
        dashboard
    }

    #[test]
    fn test_add_and_update_client() {
        let mut dashboard = signed_in_admin();
        let stored = dashboard
            .add_client(Client::new("SH-1", "Corner Store", "Ravi"))
            .unwrap();
        assert_eq!(stored.record.status, ClientStatus::InProcess);

        dashboard
            .set_client_status(&stored.id, ClientStatus::Active)
            .unwrap();
        let clients = dashboard.clients().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].record.status, ClientStatus::Active);
    }

    #[test]
    fn test_invalid_record_is_not_written() {
        let mut dashboard = signed_in_admin();
        let err = dashboard
            .place_order(Order::new("Ravi", "SH-1", "Pune", 0.0))
            .unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
        assert_eq!(dashboard.store().count(Collection::Orders).unwrap(), 0);

        let notes = dashboard.take_notifications();
        assert!(notes.last().unwrap().message.contains("price"));
    }

    #[test]
    fn test_order_review_only_from_pending() {
        let mut dashboard = signed_in_admin();
        let order = dashboard
            .place_order(Order::new("Ravi", "SH-1", "Pune", 1200.0))
            .unwrap();

        let approved = dashboard.approve_order(&order.id).unwrap();
        assert_eq!(approved.record.status, OrderStatus::Approved);
        assert!(matches!(
            dashboard.reject_order(&order.id),
            Err(OpsError::Validation(_))
        ));
    }

    #[test]
    fn test_update_agent_and_inventory() {
        let mut dashboard = signed_in_admin();
        let agent = dashboard
            .add_agent(Agent::new("Ravi", "ravi@shop.example", day(2)))
            .unwrap();
        dashboard
            .update_agent(&agent.id, agent.record.clone().with_role("Team Lead"))
            .unwrap();
        assert_eq!(dashboard.agents().unwrap()[0].record.role, "Team Lead");

        let mut item = InventoryItem {
            item: "SIM kit".to_string(),
            quantity: 10,
            unit_price: 2.5,
            agent: None,
            date: day(3),
        };
        let stored = dashboard.add_inventory_item(item.clone()).unwrap();
        item.quantity = 4;
        dashboard.update_inventory_item(&stored.id, item.clone()).unwrap();

        let listed = dashboard.inventory().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.quantity, 4);
        assert!(matches!(
            dashboard.update_inventory_item(&DocumentId::new("missing"), item),
            Err(OpsError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_record_update() {
        let mut dashboard = signed_in_admin();
        assert!(matches!(
            dashboard.set_client_status(&DocumentId::new("missing"), ClientStatus::Active),
            Err(OpsError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_daily_client_from_text() {
        let mut dashboard = signed_in_admin();
        let stored = dashboard
            .add_daily_client_from_text(
                "Name: Meera\nAge: 34\nLocation: Pune\nWork: Tailor",
                Some("Ravi"),
                None,
            )
            .unwrap();
        assert_eq!(stored.record.date, day(20));
        assert_eq!(stored.record.agent, "Ravi");

        assert!(matches!(
            dashboard.add_daily_client_from_text("Name: Meera\nAge: 34", Some("Ravi"), None),
            Err(OpsError::Parse(_))
        ));
        // Supervisors have no implicit agent
        assert!(matches!(
            dashboard.add_daily_client_from_text(
                "Name: Meera\nAge: 34\nLocation: Pune\nWork: Tailor",
                None,
                None
            ),
            Err(OpsError::Validation(_))
        ));
    }

    #[test]
    fn test_publish_replaces_same_month() {
        let mut dashboard = signed_in_admin();
        dashboard
            .record_deposit(Transaction {
                shop_id: "SH-1".to_string(),
                client_name: "Corner Store".to_string(),
                agent: "Ravi".to_string(),
                date: day(3),
                amount: 500.0,
                payment_mode: PaymentMode::Cash,
            })
            .unwrap();

        let first = dashboard.publish_team_performance("Ravi").unwrap();
        assert_eq!(first.record.deposits_month, 500.0);
        let second = dashboard.publish_team_performance("Ravi").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(dashboard.team_performance().unwrap().len(), 1);

        let audit = dashboard.audit_log().get_recent(1);
        assert_eq!(audit[0].event_type, audit::AuditEventType::RecordUpdated);
    }

    #[test]
    fn test_register_agent_user_needs_link() {
        let mut dashboard = signed_in_admin();
        assert!(matches!(
            dashboard.register_user("ravi@shop.example", "secret123", "Ravi", UserRole::Agent, None),
            Err(OpsError::Validation(_))
        ));

        let user = dashboard
            .register_user("ravi@shop.example", "secret123", "Ravi", UserRole::Agent, Some("Ravi"))
            .unwrap();
        assert_eq!(user.id.as_str(), user.record.uid);
        assert_eq!(dashboard.users().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_profile_write_removes_the_account() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut dashboard = Dashboard::new(
            opsdesk_store::DocumentStore::open(dir.path()).unwrap(),
            std::sync::Arc::new(identity::LocalIdentityProvider::in_memory()),
            rbac::PageGuard::new(),
        );
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();
        dashboard.sign_in("owner@shop.example", "secret123").unwrap();

        let blocker = dir.path().join("users.json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        assert!(dashboard
            .register_user("lead@shop.example", "secret123", "Lead", UserRole::Manager, None)
            .is_err());
        assert_eq!(dashboard.identity().uid_for_email("lead@shop.example"), None);

        std::fs::remove_dir(&blocker).unwrap();
        let user = dashboard
            .register_user("lead@shop.example", "secret123", "Lead", UserRole::Manager, None)
            .unwrap();
        assert_eq!(
            dashboard.identity().uid_for_email("lead@shop.example"),
            Some(user.record.uid)
        );
    }
}
