//! The seam to the Zigbee host framework
//!
//! Definitions never talk to a radio. Everything that leaves the process goes
//! through a [`HostDevice`], which the host implements on top of its own
//! transport, retry and addressing.

use crate::codec::{CommandRequest, WriteRequest};
use crate::error::HostError;
use crate::reporting::ReportingRule;
use async_trait::async_trait;
use zcl_protocol::Cluster;

/// One paired device as seen from the host framework
#[async_trait]
pub trait HostDevice: Send + Sync {
    /// Write a single attribute on the request's endpoint
    async fn write(&self, request: &WriteRequest) -> Result<(), HostError>;

    /// Send a cluster-specific command
    async fn command(&self, request: &CommandRequest) -> Result<(), HostError>;

    /// Bind `cluster` on `endpoint` to the coordinator
    async fn bind(
        &self,
        endpoint: u8,
        cluster: Cluster,
        coordinator_endpoint: u8,
    ) -> Result<(), HostError>;

    /// Configure attribute reporting on `endpoint`
    async fn configure_reporting(
        &self,
        endpoint: u8,
        rule: &ReportingRule,
    ) -> Result<(), HostError>;
}

/// How a failed write is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Failure is returned to the caller
    #[default]
    MustSucceed,
    /// Failure is logged and dropped
    BestEffort,
}

/// Result of handing a write to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Acknowledged,
    Dropped,
}

/// Hand a write to the host, honouring its [`WriteMode`]
#[allow(clippy::missing_errors_doc)]
pub async fn send(host: &dyn HostDevice, request: &WriteRequest) -> Result<Delivery, HostError> {
    match host.write(request).await {
        Ok(()) => Ok(Delivery::Acknowledged),
        Err(e) if request.mode == WriteMode::BestEffort => {
            tracing::debug!(
                "Dropped best-effort write {}/{:#06x} on endpoint {}: {}",
                request.cluster,
                request.attribute,
                request.endpoint,
                e
            );
            Ok(Delivery::Dropped)
        }
        Err(e) => Err(e),
    }
}
