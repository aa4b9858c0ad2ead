//! Dashboard - sign-in wrapper and write pipeline shared by every page

use audit::{AuditLogger, AuditStats, Notification, NotificationCenter, AUDIT_FILE};
use chrono::NaiveDate;
use identity::{IdentityProvider, LocalIdentityProvider, Session};
use opsdesk_domain::{Document, DocumentId, Repository, Stored, UserProfile, UserRole};
use opsdesk_store::{decode_documents, DocumentStore};
use rbac::{Capability, Page, PageGuard, RecordScope};
use serde::Serialize;
use shared::{AppConfig, Collection, OpsError, RecordNotFoundError, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::provider::DataProvider;

/// What the signed-in user is allowed to touch, captured per operation
#[derive(Debug, Clone)]
pub(crate) struct Actor {
    pub email: String,
    pub role: UserRole,
    pub scope: RecordScope,
}

impl Actor {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            email: profile.email.clone(),
            role: profile.role,
            scope: RecordScope::for_profile(profile),
        }
    }
}

struct SignedIn {
    session: Session,
    profile: UserProfile,
}

/// Result of opening a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page: Page,
    pub title: &'static str,
    /// Document counts of the collections the page reads
    pub counts: Vec<(Collection, usize)>,
}

/// The operations dashboard
pub struct Dashboard {
    pub(crate) store: DocumentStore,
    identity: Arc<dyn IdentityProvider>,
    guard: PageGuard,
    audit: AuditLogger,
    notifications: NotificationCenter,
    current: Option<SignedIn>,
    today: Option<NaiveDate>,
}

impl Dashboard {
    pub fn new(store: DocumentStore, identity: Arc<dyn IdentityProvider>, guard: PageGuard) -> Self {
        Self {
            store,
            identity,
            guard,
            audit: AuditLogger::default(),
            notifications: NotificationCenter::default(),
            current: None,
            today: None,
        }
    }

    /// Open the store, account file and audit trail under `config.data_dir`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = DocumentStore::open(&config.data_dir)?;
        let identity = LocalIdentityProvider::open(&config.data_dir)?;
        let guard = PageGuard::from_overrides(&config.page_access)?;

        let mut dashboard = Self::new(store, Arc::new(identity), guard);
        dashboard.audit = AuditLogger::open(config.data_dir.join(AUDIT_FILE), config.audit_capacity)?;
        dashboard.notifications = NotificationCenter::new(config.notification_capacity);
        Ok(dashboard)
    }

    /// Everything in memory; handy for tests and demos
    pub fn in_memory() -> Self {
        Self::new(
            DocumentStore::in_memory(),
            Arc::new(LocalIdentityProvider::in_memory()),
            PageGuard::new(),
        )
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Pin "today" instead of reading the local clock
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    // ========== Sign-in ==========

    /// Create the first admin account; refused once any user exists
    pub fn bootstrap_admin(&mut self, email: &str, password: &str, display_name: &str) -> Result<UserProfile> {
        if self.store.count(Collection::Users)? > 0 {
            return Err(OpsError::Forbidden(
                "an administrator already exists; sign in to add users".to_string(),
            ));
        }

        let draft = UserProfile::new("pending", email.trim(), display_name, UserRole::Admin);
        draft.validate()?;

        let uid = self.identity.create_account(email, password)?;
        let profile = UserProfile { uid, ..draft };
        if let Err(err) = Repository::<UserProfile>::save(&self.store, &profile.document_id(), &profile) {
            if let Err(undo) = self.identity.delete_account(&profile.uid) {
                warn!(uid = %profile.uid, error = %undo, "Could not remove account after profile write failed");
            }
            return Err(err.into());
        }

        self.audit
            .log_write(&profile.email, UserRole::Admin.as_str(), Collection::Users.as_str(), &profile.uid, true);
        info!(email = %profile.email, "Bootstrapped administrator");
        Ok(profile)
    }

    /// Sign in and load the caller's profile
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<UserProfile> {
        if self.current.is_some() {
            self.sign_out()?;
        }

        let session = match self.identity.sign_in(email, password) {
            Ok(session) => session,
            Err(err) => {
                self.audit.log_sign_in(email, None, false, Some(&err.to_string()));
                self.notifications.error(err.to_string());
                return Err(err.into());
            }
        };

        let profile = match Repository::<UserProfile>::find_by_id(&self.store, &DocumentId::new(session.uid.clone())) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                let _ = self.identity.sign_out(&session.token);
                let err = OpsError::Auth("no user profile exists for this account".to_string());
                self.audit.log_sign_in(email, None, false, Some(&err.to_string()));
                self.notifications.error(err.user_message());
                return Err(err);
            }
            Err(err) => {
                let _ = self.identity.sign_out(&session.token);
                return Err(err.into());
            }
        };

        self.audit
            .log_sign_in(&profile.email, Some(profile.role.as_str()), true, None);
        self.notifications
            .success(format!("Welcome, {}", profile.display_name));
        info!(email = %profile.email, role = %profile.role, "Signed in");

        self.current = Some(SignedIn {
            session,
            profile: profile.clone(),
        });
        Ok(profile)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        let Some(signed_in) = self.current.take() else {
            return Ok(());
        };
        if let Err(err) = self.identity.sign_out(&signed_in.session.token) {
            warn!(error = %err, "Session already gone at sign-out");
        }
        self.audit
            .log_sign_out(&signed_in.profile.email, signed_in.profile.role.as_str());
        info!(email = %signed_in.profile.email, "Signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(|s| &s.profile)
    }

    /// Pages the signed-in user may open, in menu order
    pub fn visible_pages(&self) -> Vec<Page> {
        match self.current_user() {
            Some(profile) => self.guard.visible_pages(profile.role),
            None => Vec::new(),
        }
    }

    /// Guard check for a page plus the counts it shows
    pub fn open_page(&mut self, page: Page) -> Result<PageSummary> {
        self.authorize(page)?;
        let mut counts = Vec::with_capacity(page.collections().len());
        for collection in page.collections() {
            counts.push((*collection, self.store.count(*collection)?));
        }
        Ok(PageSummary {
            page,
            title: page.title(),
            counts,
        })
    }

    /// Live provider seeded with the caller's agent selection
    pub fn data_provider(&mut self) -> Result<DataProvider> {
        let actor = self.authorize(Page::Dashboard)?;
        let mut provider = DataProvider::new(&self.store, self.today());
        provider.select_agent(actor.scope.fixed_agent().map(str::to_string));
        Ok(provider)
    }

    // ========== Audit / notifications ==========

    /// Pending notifications, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn audit_stats(&self) -> AuditStats {
        self.audit.get_stats()
    }

    // ========== Pipeline used by the page operations ==========

    /// The signed-in actor; a dropped session counts as signed out
    fn actor(&mut self) -> Result<Actor> {
        let Some(signed_in) = &self.current else {
            return Err(OpsError::Unauthenticated);
        };
        if self.identity.session(&signed_in.session.token).is_err() {
            self.current = None;
            self.notifications.error(OpsError::Unauthenticated.user_message());
            return Err(OpsError::Unauthenticated);
        }
        Ok(Actor::from_profile(&signed_in.profile))
    }

    /// Session plus page guard
    pub(crate) fn authorize(&mut self, page: Page) -> Result<Actor> {
        let actor = self.actor()?;
        if let Err(denied) = self.guard.check(actor.role, page) {
            warn!(email = %actor.email, page = %page, "Page access denied");
            self.audit
                .log_page_denied(&actor.email, actor.role.as_str(), page.as_str(), &denied.to_string());
            self.notifications.error(denied.to_string());
            return Err(denied.into());
        }
        Ok(actor)
    }

    /// Record a failed write and hand the error back
    pub(crate) fn fail(&mut self, actor: &Actor, collection: Collection, err: OpsError) -> OpsError {
        warn!(email = %actor.email, collection = %collection, error = %err, "Write rejected");
        self.audit
            .log_write_failed(&actor.email, actor.role.as_str(), collection.as_str(), &err.to_string());
        self.notifications.error(err.user_message());
        err
    }

    pub(crate) fn require(&mut self, actor: &Actor, capability: Capability, collection: Collection) -> Result<()> {
        capability
            .check(actor.role)
            .map_err(|err| self.fail(actor, collection, err))
    }

    /// Agents may only write records attributed to themselves
    pub(crate) fn require_scope<T: Document>(&mut self, actor: &Actor, record: &T) -> Result<()> {
        if actor.scope.permits(record) {
            return Ok(());
        }
        let err = OpsError::Forbidden(format!(
            "agents may only record their own {}",
            T::COLLECTION
        ));
        Err(self.fail(actor, T::COLLECTION, err))
    }

    /// Validate then write; audit and notify either way
    pub(crate) fn commit<T: Document>(
        &mut self,
        actor: &Actor,
        id: DocumentId,
        record: &T,
        created: bool,
    ) -> Result<Stored<T>> {
        let saved = record
            .validate()
            .map_err(OpsError::from)
            .and_then(|_| Repository::<T>::save(&self.store, &id, record).map_err(OpsError::from));

        match saved {
            Ok(()) => {
                self.audit.log_write(
                    &actor.email,
                    actor.role.as_str(),
                    T::COLLECTION.as_str(),
                    id.as_str(),
                    created,
                );
                let verb = if created { "added" } else { "updated" };
                self.notifications
                    .success(format!("{} {}", record_noun(T::COLLECTION), verb));
                info!(email = %actor.email, collection = %T::COLLECTION, id = %id, created, "Record saved");
                Ok(Stored::new(id, record.clone()))
            }
            Err(err) => Err(self.fail(actor, T::COLLECTION, err)),
        }
    }

    /// Existing record inside the actor's scope; out-of-scope reads as missing
    pub(crate) fn existing<T: Document>(&mut self, actor: &Actor, id: &DocumentId) -> Result<T> {
        match Repository::<T>::find_by_id(&self.store, id) {
            Ok(Some(record)) if actor.scope.permits(&record) => Ok(record),
            Ok(_) => {
                let err = RecordNotFoundError {
                    collection: T::COLLECTION.to_string(),
                    id: id.to_string(),
                };
                Err(self.fail(actor, T::COLLECTION, err.into()))
            }
            Err(err) => Err(self.fail(actor, T::COLLECTION, err.into())),
        }
    }

    /// Page lister with record scoping applied
    pub(crate) fn list_scoped<T: Document>(&mut self, page: Page) -> Result<Vec<Stored<T>>> {
        let actor = self.authorize(page)?;
        let records = decode_documents::<T>(&self.store.list(T::COLLECTION)?);
        Ok(actor.scope.filter(records))
    }

    /// Every record of a collection, unscoped
    pub(crate) fn all_records<T: Document>(&self) -> Result<Vec<T>> {
        Ok(decode_documents::<T>(&self.store.list(T::COLLECTION)?)
            .into_iter()
            .map(|stored| stored.record)
            .collect())
    }

    pub(crate) fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }
}

fn record_noun(collection: Collection) -> &'static str {
    match collection {
        Collection::Agents => "Agent",
        Collection::Clients => "Client",
        Collection::DailyAddedClients => "Daily client",
        Collection::Deposits => "Deposit",
        Collection::Withdrawals => "Withdrawal",
        Collection::Inventory => "Inventory item",
        Collection::Orders => "Order",
        Collection::Absences => "Absence",
        Collection::Penalties => "Penalty",
        Collection::Rewards => "Reward",
        Collection::TeamPerformance => "Team performance",
        Collection::Users => "User",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_need_a_session() {
        let mut dashboard = Dashboard::in_memory();
        assert!(matches!(
            dashboard.open_page(Page::Dashboard),
            Err(OpsError::Unauthenticated)
        ));
        assert!(dashboard.visible_pages().is_empty());
    }

    #[test]
    fn test_bootstrap_only_once() {
        let mut dashboard = Dashboard::in_memory();
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();
        assert!(matches!(
            dashboard.bootstrap_admin("second@shop.example", "secret123", "Second"),
            Err(OpsError::Forbidden(_))
        ));
    }

    #[test]
    fn test_bootstrap_rolls_back_account_when_profile_write_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut dashboard = Dashboard::new(
            DocumentStore::open(dir.path()).unwrap(),
            Arc::new(LocalIdentityProvider::in_memory()),
            PageGuard::new(),
        );
        let blocker = dir.path().join("users.json.tmp");
        std::fs::create_dir(&blocker).unwrap();

        assert!(dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .is_err());
        assert_eq!(dashboard.identity().uid_for_email("owner@shop.example"), None);

        std::fs::remove_dir(&blocker).unwrap();
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();
    }

    #[test]
    fn test_sign_in_loads_profile() {
        let mut dashboard = Dashboard::in_memory();
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();

        let profile = dashboard.sign_in("owner@shop.example", "secret123").unwrap();
        assert_eq!(profile.role, UserRole::Admin);
        assert_eq!(dashboard.visible_pages().len(), Page::all().len());

        let notes = dashboard.take_notifications();
        assert_eq!(notes.last().unwrap().message, "Welcome, Owner");
    }

    #[test]
    fn test_account_without_profile_is_refused() {
        let mut dashboard = Dashboard::in_memory();
        dashboard
            .identity()
            .create_account("ghost@shop.example", "secret123")
            .unwrap();

        assert!(matches!(
            dashboard.sign_in("ghost@shop.example", "secret123"),
            Err(OpsError::Auth(_))
        ));
        assert!(dashboard.current_user().is_none());
    }

    #[test]
    fn test_sign_out_clears_session() {
        let mut dashboard = Dashboard::in_memory();
        dashboard
            .bootstrap_admin("owner@shop.example", "secret123", "Owner")
            .unwrap();
        dashboard.sign_in("owner@shop.example", "secret123").unwrap();
        dashboard.sign_out().unwrap();

        assert!(dashboard.current_user().is_none());
        assert!(matches!(
            dashboard.open_page(Page::Clients),
            Err(OpsError::Unauthenticated)
        ));
    }
}
