//! Client ports with scripted behavior
//!
//! `InMemoryClientPort` covers answers and failures; the port here covers
//! a backend that accepts the connection and then never replies.

use async_trait::async_trait;
use core_kernel::{
    AdapterHealth, ClientId, DomainPort, HealthCheckable, HealthReport, OperationMetadata, PortError,
};
use domain_client::{ClientPayload, ClientPort, ClientRecord};

/// A client port whose calls never complete
#[derive(Debug, Clone, Copy, Default)]
pub struct StalledClientPort;

impl DomainPort for StalledClientPort {}

#[async_trait]
impl HealthCheckable for StalledClientPort {
    async fn health_check(&self) -> HealthReport {
        HealthReport::new("stalled-client-port", AdapterHealth::Degraded)
    }
}

#[async_trait]
impl ClientPort for StalledClientPort {
    async fn create_client(
        &self,
        _payload: ClientPayload,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        std::future::pending().await
    }

    async fn update_client(
        &self,
        _id: ClientId,
        _payload: ClientPayload,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        std::future::pending().await
    }

    async fn get_client(
        &self,
        _id: ClientId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ClientRecord, PortError> {
        std::future::pending().await
    }
}
