//! The record store: owns the in-memory `Snapshot` and all traffic that can change it.
//!
//! A load fetches the five collections concurrently and installs them as one atomic snapshot;
//! if any single fetch fails the whole load is abandoned so the engines never see partial data.
//! Loads carry a generation token so that, should loads ever overlap, a slow stale response can
//! never overwrite a newer snapshot. Mutations invalidate the snapshot, forcing the next read to
//! re-derive everything from fresh data.

use crate::api::{CUSTOMERS, EXPENSES, MATERIALS, STARTING_CAPITAL, TRANSACTIONS};
use crate::model::{
    CapitalEntry, Customer, Expense, Material, NewCustomer, NewExpense, NewMaterial,
    NewTransaction, Snapshot, Transaction,
};
use crate::{ApiError, Client};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// The collections a user can list from or delete from directly. Starting capital is excluded:
/// it only feeds the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Materials,
    Customers,
    Transactions,
    Expenses,
}

serde_plain::derive_display_from_serialize!(Collection);
serde_plain::derive_fromstr_from_deserialize!(Collection);

impl Collection {
    pub(crate) fn path(&self) -> &'static str {
        match self {
            Collection::Materials => MATERIALS,
            Collection::Customers => CUSTOMERS,
            Collection::Transactions => TRANSACTIONS,
            Collection::Expenses => EXPENSES,
        }
    }
}

#[derive(Default)]
struct State {
    snapshot: Option<Arc<Snapshot>>,
    installed_generation: u64,
    next_generation: u64,
}

impl State {
    /// Installs `snapshot` unless a later load has already finished.
    fn install(&mut self, generation: u64, snapshot: Arc<Snapshot>) {
        if generation <= self.installed_generation {
            debug!("dropping stale snapshot from load generation {generation}");
            return;
        }
        self.installed_generation = generation;
        self.snapshot = Some(snapshot);
    }
}

/// Owns the snapshot and the backend client.
pub struct Store {
    client: Client,
    state: Mutex<State>,
}

impl Store {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
        }
    }

    /// The current snapshot, loading it from the backend if none is held.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, ApiError> {
        if let Some(snapshot) = self.state.lock().await.snapshot.clone() {
            return Ok(snapshot);
        }
        self.reload().await
    }

    /// Fetches all five collections concurrently and installs them as one snapshot. Any single
    /// failure aborts the whole load.
    pub async fn reload(&self) -> Result<Arc<Snapshot>, ApiError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.next_generation += 1;
            state.next_generation
        };

        let (materials, customers, transactions, expenses, capital) = tokio::try_join!(
            self.client.list::<Material>(MATERIALS),
            self.client.list::<Customer>(CUSTOMERS),
            self.client.list::<Transaction>(TRANSACTIONS),
            self.client.list::<Expense>(EXPENSES),
            self.client.list::<CapitalEntry>(STARTING_CAPITAL),
        )?;

        let snapshot = Arc::new(Snapshot {
            materials,
            customers,
            transactions,
            expenses,
            capital,
        });
        self.state.lock().await.install(generation, snapshot.clone());
        Ok(snapshot)
    }

    pub async fn create_material(&self, payload: &NewMaterial) -> Result<Material, ApiError> {
        let record = self.client.create(MATERIALS, payload).await?;
        self.invalidate().await;
        Ok(record)
    }

    pub async fn create_customer(&self, payload: &NewCustomer) -> Result<Customer, ApiError> {
        let record = self.client.create(CUSTOMERS, payload).await?;
        self.invalidate().await;
        Ok(record)
    }

    pub async fn create_transaction(
        &self,
        payload: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let record = self.client.create(TRANSACTIONS, payload).await?;
        self.invalidate().await;
        Ok(record)
    }

    pub async fn create_expense(&self, payload: &NewExpense) -> Result<Expense, ApiError> {
        let record = self.client.create(EXPENSES, payload).await?;
        self.invalidate().await;
        Ok(record)
    }

    /// Deletes a record by id and invalidates the snapshot.
    pub async fn remove(&self, collection: Collection, id: i64) -> Result<(), ApiError> {
        self.client.remove(collection.path(), id).await?;
        self.invalidate().await;
        Ok(())
    }

    async fn invalidate(&self) {
        self.state.lock().await.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Transport, TransportRequest, TransportResponse};
    use crate::Session;
    use std::sync::Arc as StdArc;
    use tempfile::TempDir;

    /// Answers collection GETs from fixed JSON, whatever order the concurrent fetches arrive in.
    struct CollectionsTransport {
        requests: std::sync::Mutex<Vec<TransportRequest>>,
        fail_expenses: bool,
    }

    impl CollectionsTransport {
        fn new(fail_expenses: bool) -> Self {
            Self {
                requests: std::sync::Mutex::new(Vec::new()),
                fail_expenses,
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Transport for CollectionsTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            let body = if request.method == crate::api::Method::Post {
                r#"{"id": 9, "name": "Tin", "color": null}"#
            } else if request.method == crate::api::Method::Delete {
                return Ok(TransportResponse {
                    status: 204,
                    body: String::new(),
                });
            } else if request.url.ends_with("/materials/") {
                r#"[{"id": 1, "name": "Copper", "color": null}]"#
            } else if request.url.ends_with("/customers/") {
                r#"[{"id": 2, "name": "Acme"}]"#
            } else if request.url.ends_with("/transactions/") {
                r#"[{"id": 1, "transaction_type": "CR", "material": 1,
                     "quantity": "10.00", "total_price": "100.00"}]"#
            } else if request.url.ends_with("/expenses/") {
                if self.fail_expenses {
                    return Ok(TransportResponse {
                        status: 500,
                        body: String::new(),
                    });
                }
                "[]"
            } else if request.url.ends_with("/startingcapital/") {
                r#"[{"id": 1, "description": "Initial", "amount": "1000.00",
                     "date": "2026-01-01"}]"#
            } else {
                return Ok(TransportResponse {
                    status: 404,
                    body: String::new(),
                });
            };
            Ok(TransportResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    fn store(transport: StdArc<CollectionsTransport>, dir: &TempDir) -> Store {
        struct Shared(StdArc<CollectionsTransport>);

        #[async_trait::async_trait]
        impl Transport for Shared {
            async fn execute(
                &self,
                request: TransportRequest,
            ) -> Result<TransportResponse, ApiError> {
                self.0.execute(request).await
            }
        }

        Store::new(Client::new(
            Box::new(Shared(transport)),
            "http://backend.test/api",
            dir.path().join("token.json"),
            Some(Session::new("a", "r")),
        ))
    }

    #[tokio::test]
    async fn test_load_assembles_full_snapshot() {
        let dir = TempDir::new().unwrap();
        let transport = StdArc::new(CollectionsTransport::new(false));
        let store = store(transport.clone(), &dir);

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.materials.len(), 1);
        assert_eq!(snapshot.customers.len(), 1);
        assert_eq!(snapshot.transactions.len(), 1);
        assert!(snapshot.expenses.is_empty());
        assert_eq!(snapshot.starting_capital(), crate::model::Amount::from(1000));
        assert_eq!(transport.request_count(), 5);

        // A second read reuses the held snapshot rather than refetching.
        let again = store.snapshot().await.unwrap();
        assert!(StdArc::ptr_eq(&snapshot, &again));
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn test_one_failed_fetch_aborts_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let transport = StdArc::new(CollectionsTransport::new(true));
        let store = store(transport, &dir);

        let error = store.snapshot().await.unwrap_err();
        assert!(matches!(error, ApiError::Network(_)));
        // No partial snapshot was installed.
        assert!(store.state.lock().await.snapshot.is_none());
    }

    #[tokio::test]
    async fn test_create_invalidates_snapshot() {
        let dir = TempDir::new().unwrap();
        let transport = StdArc::new(CollectionsTransport::new(false));
        let store = store(transport.clone(), &dir);

        store.snapshot().await.unwrap();
        assert_eq!(transport.request_count(), 5);

        store
            .create_material(&NewMaterial {
                name: "Tin".to_string(),
                color: None,
            })
            .await
            .unwrap();
        assert_eq!(transport.request_count(), 6);

        // The next read refetches everything.
        store.snapshot().await.unwrap();
        assert_eq!(transport.request_count(), 11);
    }

    #[tokio::test]
    async fn test_stale_load_never_overwrites_newer_snapshot() {
        let newer = Arc::new(Snapshot::default());
        let stale = Arc::new(Snapshot {
            materials: vec![crate::model::Material {
                id: 1,
                name: "Copper".to_string(),
                color: None,
            }],
            ..Snapshot::default()
        });

        let mut state = State::default();
        state.next_generation = 2;
        state.install(2, newer.clone());
        state.install(1, stale);
        assert!(Arc::ptr_eq(state.snapshot.as_ref().unwrap(), &newer));
    }

    #[test]
    fn test_collection_codes() {
        assert_eq!(Collection::Materials.to_string(), "materials");
        assert_eq!(Collection::Expenses.path(), "expenses");
        assert_eq!(
            "transactions".parse::<Collection>().unwrap(),
            Collection::Transactions
        );
    }
}
