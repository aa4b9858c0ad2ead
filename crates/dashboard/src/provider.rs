//! DataProvider - live view over the overview page's collections
//!
//! Holds one subscription per collection. Every snapshot replaces the
//! matching list wholesale; the selected agent's figures are then re-derived.
//! Collections are not read at a common point in time.

use chrono::NaiveDate;
use opsdesk_domain::{
    agent_performance, Agent, Client, DailyAddedClient, Deposit, Document, Order,
    PerformanceSummary, Stored, Withdrawal,
};
use opsdesk_store::{decode_documents, DocumentStore, Snapshot, Subscription};
use shared::Collection;
use tokio::sync::watch;
use tracing::debug;

/// Latest decoded lists plus the derived figures
#[derive(Debug, Clone, Default)]
pub struct ProviderView {
    pub agents: Vec<Stored<Agent>>,
    pub clients: Vec<Stored<Client>>,
    pub daily_clients: Vec<Stored<DailyAddedClient>>,
    pub deposits: Vec<Stored<Deposit>>,
    pub withdrawals: Vec<Stored<Withdrawal>>,
    pub orders: Vec<Stored<Order>>,
    pub selected_agent: Option<String>,
    pub summary: PerformanceSummary,
}

pub struct DataProvider {
    agents: Subscription,
    clients: Subscription,
    daily_clients: Subscription,
    deposits: Subscription,
    withdrawals: Subscription,
    orders: Subscription,
    view: ProviderView,
    today: NaiveDate,
    /// Calendar feed; each new date re-derives the summary
    dates: Option<watch::Receiver<NaiveDate>>,
}

enum Wake {
    Snapshot(Option<Snapshot>),
    Date(Option<NaiveDate>),
}

impl DataProvider {
    /// Subscribe to the store; call [`sync`](Self::sync) to load the first snapshots
    pub fn new(store: &DocumentStore, today: NaiveDate) -> Self {
        Self {
            agents: store.subscribe(Collection::Agents),
            clients: store.subscribe(Collection::Clients),
            daily_clients: store.subscribe(Collection::DailyAddedClients),
            deposits: store.subscribe(Collection::Deposits),
            withdrawals: store.subscribe(Collection::Withdrawals),
            orders: store.subscribe(Collection::Orders),
            view: ProviderView::default(),
            today,
            dates: None,
        }
    }

    pub fn view(&self) -> &ProviderView {
        &self.view
    }

    pub fn summary(&self) -> PerformanceSummary {
        self.view.summary
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.recompute();
    }

    /// Take "today" from a channel from now on
    ///
    /// [`changed`](Self::changed) also wakes when a new date is sent, so the
    /// day and month figures roll over while the provider is running.
    pub fn follow_dates(&mut self, mut dates: watch::Receiver<NaiveDate>) {
        let today = *dates.borrow_and_update();
        self.dates = Some(dates);
        self.set_today(today);
    }

    /// Change the selection and re-derive; `None` yields the zero summary
    pub fn select_agent(&mut self, agent: Option<String>) {
        self.view.selected_agent = agent.filter(|a| !a.trim().is_empty());
        self.recompute();
    }

    /// Apply every pending snapshot; returns whether anything changed
    pub fn sync(&mut self) -> bool {
        let pending: Vec<Snapshot> = [
            &mut self.agents,
            &mut self.clients,
            &mut self.daily_clients,
            &mut self.deposits,
            &mut self.withdrawals,
            &mut self.orders,
        ]
        .into_iter()
        .filter_map(Subscription::take_if_changed)
        .collect();

        if pending.is_empty() {
            return false;
        }
        for snapshot in pending {
            self.apply(snapshot);
        }
        self.recompute();
        true
    }

    /// Wait for any subscribed collection to publish (or a new date), then sync
    ///
    /// Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        let wake = tokio::select! {
            s = self.agents.changed() => Wake::Snapshot(s),
            s = self.clients.changed() => Wake::Snapshot(s),
            s = self.daily_clients.changed() => Wake::Snapshot(s),
            s = self.deposits.changed() => Wake::Snapshot(s),
            s = self.withdrawals.changed() => Wake::Snapshot(s),
            s = self.orders.changed() => Wake::Snapshot(s),
            d = next_date(&mut self.dates) => Wake::Date(d),
        };
        match wake {
            Wake::Snapshot(None) => false,
            Wake::Snapshot(Some(snapshot)) => {
                self.apply(snapshot);
                if !self.sync() {
                    self.recompute();
                }
                true
            }
            Wake::Date(Some(today)) => {
                debug!(%today, "Date rolled over");
                self.set_today(today);
                true
            }
            Wake::Date(None) => {
                // Feed closed; keep the last date
                self.dates = None;
                true
            }
        }
    }

    /// Keep the view current until `shutdown` flips to true
    ///
    /// `on_update` sees the view after every applied change.
    pub async fn run<F>(mut self, mut shutdown: watch::Receiver<bool>, mut on_update: F) -> Self
    where
        F: FnMut(&ProviderView),
    {
        if self.sync() {
            on_update(&self.view);
        }
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                alive = self.changed() => {
                    if !alive {
                        break;
                    }
                    on_update(&self.view);
                }
                res = shutdown.changed() => {
                    if res.is_err() {
                        break;
                    }
                }
            }
        }
        self
    }

    fn apply(&mut self, snapshot: Snapshot) {
        debug!(collection = %snapshot.collection, version = snapshot.version, documents = snapshot.len(), "Applying snapshot");
        let docs = snapshot.documents.as_slice();
        match snapshot.collection {
            Collection::Agents => self.view.agents = decode_documents(docs),
            Collection::Clients => self.view.clients = decode_documents(docs),
            Collection::DailyAddedClients => self.view.daily_clients = decode_documents(docs),
            Collection::Deposits => self.view.deposits = decode_documents(docs),
            Collection::Withdrawals => self.view.withdrawals = decode_documents(docs),
            Collection::Orders => self.view.orders = decode_documents(docs),
            other => debug!(collection = %other, "Ignoring unsubscribed collection"),
        }
    }

    fn recompute(&mut self) {
        let daily = records(&self.view.daily_clients);
        let clients = records(&self.view.clients);
        let deposits = records(&self.view.deposits);
        self.view.summary = agent_performance(
            self.view.selected_agent.as_deref(),
            self.today,
            &daily,
            &clients,
            &deposits,
        );
    }
}

async fn next_date(dates: &mut Option<watch::Receiver<NaiveDate>>) -> Option<NaiveDate> {
    match dates {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(*rx.borrow_and_update()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

fn records<T: Document>(stored: &[Stored<T>]) -> Vec<T> {
    stored.iter().map(|s| s.record.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_domain::{DocumentId, PaymentMode, Repository, Transaction};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn deposit(agent: &str, amount: f64) -> Deposit {
        Deposit(Transaction {
            shop_id: "SH-1".to_string(),
            client_name: "Corner Store".to_string(),
            agent: agent.to_string(),
            date: day(4),
            amount,
            payment_mode: PaymentMode::MobileMoney,
        })
    }

    #[test]
    fn test_sync_derives_selected_agent() {
        let store = DocumentStore::in_memory();
        store.save(&DocumentId::new("d1"), &deposit("Ravi", 100.0)).unwrap();
        store.save(&DocumentId::new("d2"), &deposit("Asha", 40.0)).unwrap();

        let mut provider = DataProvider::new(&store, day(20));
        assert!(provider.sync());
        assert!(provider.summary().is_zero());

        provider.select_agent(Some("Ravi".to_string()));
        assert_eq!(provider.summary().deposits_month, 100.0);
        assert_eq!(provider.view().deposits.len(), 2);

        // Nothing new
        assert!(!provider.sync());

        store.save(&DocumentId::new("d3"), &deposit("Ravi", 25.0)).unwrap();
        assert!(provider.sync());
        assert_eq!(provider.summary().deposits_month, 125.0);
    }

    #[test]
    fn test_blank_selection_is_no_selection() {
        let store = DocumentStore::in_memory();
        let mut provider = DataProvider::new(&store, day(20));
        provider.select_agent(Some("  ".to_string()));
        assert_eq!(provider.view().selected_agent, None);
    }

    #[test]
    fn test_undecodable_documents_are_skipped() {
        let store = DocumentStore::in_memory();
        store
            .put(
                Collection::Orders,
                &DocumentId::new("bad"),
                serde_json::json!({"agent": 7}),
            )
            .unwrap();
        let mut provider = DataProvider::new(&store, day(20));
        provider.sync();
        assert!(provider.view().orders.is_empty());
    }

    #[test]
    fn test_month_rollover_resets_figures() {
        let store = DocumentStore::in_memory();
        store.save(&DocumentId::new("d1"), &deposit("Ravi", 100.0)).unwrap();
        let mut provider = DataProvider::new(&store, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        provider.select_agent(Some("Ravi".to_string()));
        provider.sync();
        assert_eq!(provider.summary().deposits_month, 100.0);

        provider.set_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(provider.summary().is_zero());
    }

    #[tokio::test]
    async fn test_followed_dates_wake_the_provider() {
        let store = DocumentStore::in_memory();
        store.save(&DocumentId::new("d1"), &deposit("Ravi", 100.0)).unwrap();
        let mut provider = DataProvider::new(&store, day(1));
        provider.select_agent(Some("Ravi".to_string()));
        provider.sync();

        let (tx, rx) = watch::channel(day(31));
        provider.follow_dates(rx);
        assert_eq!(provider.today(), day(31));
        assert_eq!(provider.summary().deposits_month, 100.0);

        tx.send(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();
        assert!(provider.changed().await);
        assert_eq!(provider.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(provider.summary().is_zero());

        // A closed feed leaves the provider on its last date
        drop(tx);
        assert!(provider.changed().await);
        assert_eq!(provider.today(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn test_changed_wakes_on_write() {
        let store = DocumentStore::in_memory();
        let mut provider = DataProvider::new(&store, day(20));
        provider.select_agent(Some("Ravi".to_string()));
        provider.sync();

        let writer = store.clone();
        tokio::spawn(async move {
            writer.save(&DocumentId::new("d1"), &deposit("Ravi", 60.0)).unwrap();
        });

        assert!(provider.changed().await);
        assert_eq!(provider.summary().deposits_month, 60.0);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = DocumentStore::in_memory();
        store.save(&DocumentId::new("d1"), &deposit("Ravi", 10.0)).unwrap();
        let mut provider = DataProvider::new(&store, day(20));
        provider.select_agent(Some("Ravi".to_string()));

        let (tx, rx) = watch::channel(false);
        let mut updates = 0;
        tx.send(true).unwrap();
        let provider = provider.run(rx, |_| updates += 1).await;

        assert_eq!(updates, 1);
        assert_eq!(provider.summary().deposits_month, 10.0);
    }
}
