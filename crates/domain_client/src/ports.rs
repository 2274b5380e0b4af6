//! Client Domain Ports
//!
//! This module defines the port through which the registration wizard
//! persists clients, enabling swappable implementations.
//!
//! # Architecture
//!
//! The `ClientPort` trait defines the operations the client domain needs
//! from its system of record. Two adapters implement it:
//!
//! - **Remote Adapter**: Calls the console's REST API (`adapters::remote_api`)
//! - **In-memory Adapter**: Keeps records in process, for local runs and tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_client::ports::ClientPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ClientPort> = Arc::new(InMemoryClientPort::new());
//! let receipt = session.submit(port.as_ref()).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{ClientId, PortError, DomainPort, OperationMetadata, HealthCheckable};

use crate::client::{ClientPayload, ClientRecord};

/// The persistence port for client records
///
/// All methods are async and return `Result<T, PortError>` for consistent
/// error handling across adapter implementations.
#[async_trait]
pub trait ClientPort: DomainPort + HealthCheckable {
    /// Creates a new client from a wizard payload
    async fn create_client(
        &self,
        payload: ClientPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError>;

    /// Replaces an existing client's data
    ///
    /// Returns `PortError::NotFound` when no client has the given id.
    async fn update_client(
        &self,
        id: ClientId,
        payload: ClientPayload,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError>;

    /// Retrieves a client by ID
    async fn get_client(
        &self,
        id: ClientId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError>;
}

/// In-memory implementation of ClientPort
pub mod memory {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::{Mutex, RwLock};

    use core_kernel::{AdapterHealth, HealthReport};
    use crate::document::normalize_digits;

    /// Keeps client records in a map; document numbers must be unique
    #[derive(Debug, Default)]
    pub struct InMemoryClientPort {
        clients: Arc<RwLock<HashMap<ClientId, ClientRecord>>>,
        scripted_failures: Mutex<VecDeque<PortError>>,
        calls: AtomicUsize,
    }

    impl InMemoryClientPort {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with records for testing
        pub async fn with_clients(records: Vec<ClientRecord>) -> Self {
            let port = Self::new();
            {
                let mut clients = port.clients.write().await;
                for record in records {
                    clients.insert(record.id, record);
                }
            }
            port
        }

        /// Makes the next write call fail with `error`
        ///
        /// Queued errors are consumed one per call, in order.
        pub async fn fail_next(&self, error: PortError) {
            self.scripted_failures.lock().await.push_back(error);
        }

        /// Number of create/update calls received
        pub fn write_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Number of stored records
        pub async fn len(&self) -> usize {
            self.clients.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.clients.read().await.is_empty()
        }

        async fn begin_write(&self) -> Result<(), PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.scripted_failures.lock().await.pop_front() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        fn ensure_unique_document(
            clients: &HashMap<ClientId, ClientRecord>,
            payload: &ClientPayload,
            except: Option<ClientId>,
        ) -> Result<(), PortError> {
            let digits = normalize_digits(&payload.data.tax_document);
            let taken = clients.values().any(|record| {
                Some(record.id) != except && normalize_digits(&record.data.tax_document) == digits
            });
            if taken {
                return Err(PortError::conflict("Document already registered"));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryClientPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryClientPort {
        async fn health_check(&self) -> HealthReport {
            let count = self.clients.read().await.len();
            HealthReport::new("memory-client-port", AdapterHealth::Healthy)
                .with_detail(format!("{} client(s) in memory", count))
        }
    }

    #[async_trait]
    impl ClientPort for InMemoryClientPort {
        async fn create_client(
            &self,
            payload: ClientPayload,
            _metadata: Option<OperationMetadata>,
        ) -> Result<ClientRecord, PortError> {
            self.begin_write().await?;
            let mut clients = self.clients.write().await;
            Self::ensure_unique_document(&clients, &payload, None)?;

            let record = ClientRecord::from_payload(ClientId::new_v7(), payload);
            clients.insert(record.id, record.clone());
            Ok(record)
        }

        async fn update_client(
            &self,
            id: ClientId,
            payload: ClientPayload,
            _metadata: Option<OperationMetadata>,
        ) -> Result<ClientRecord, PortError> {
            self.begin_write().await?;
            let mut clients = self.clients.write().await;
            Self::ensure_unique_document(&clients, &payload, Some(id))?;

            let record = clients
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Client", id))?;
            record.apply(payload);
            Ok(record.clone())
        }

        async fn get_client(
            &self,
            id: ClientId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<ClientRecord, PortError> {
            self.clients
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Client", id))
        }
    }
}

pub use memory::InMemoryClientPort;
