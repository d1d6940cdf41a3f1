//! Host that prints the frames it would send instead of sending them

use async_trait::async_trait;
use efekta_devices::{CommandRequest, HostDevice, HostError, ReportingRule, WriteRequest};
use std::sync::atomic::{AtomicU8, Ordering};
use zcl_protocol::{BindRequest, Cluster, ProtocolError, ZclFrame, ZdoCluster};

pub struct DryRunHost {
    device_ieee: [u8; 8],
    coordinator_ieee: [u8; 8],
    seq: AtomicU8,
}

impl DryRunHost {
    /// IEEE addresses in display order (most significant byte first)
    pub fn new(device_ieee: [u8; 8], coordinator_ieee: [u8; 8]) -> Self {
        let mut device = device_ieee;
        let mut coordinator = coordinator_ieee;
        device.reverse();
        coordinator.reverse();
        Self {
            device_ieee: device,
            coordinator_ieee: coordinator,
            seq: AtomicU8::new(1),
        }
    }

    fn next_seq(&self) -> u8 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn emit(&self, endpoint: u8, cluster: Cluster, label: &str, frame: &ZclFrame) {
        println!(
            "ep{} {:<26} {:<20} {}",
            endpoint,
            cluster.name(),
            label,
            hex::encode(frame.serialize())
        );
    }
}

fn transport(e: ProtocolError) -> HostError {
    HostError::Transport(e.to_string())
}

#[async_trait]
impl HostDevice for DryRunHost {
    async fn write(&self, request: &WriteRequest) -> Result<(), HostError> {
        let frame = request.to_frame(self.next_seq()).map_err(transport)?;
        self.emit(request.endpoint, request.cluster, "write_attributes", &frame);
        Ok(())
    }

    async fn command(&self, request: &CommandRequest) -> Result<(), HostError> {
        let frame = request.to_frame(self.next_seq());
        let label = format!("command {:#04x}", request.command_id);
        self.emit(request.endpoint, request.cluster, &label, &frame);
        Ok(())
    }

    async fn bind(
        &self,
        endpoint: u8,
        cluster: Cluster,
        coordinator_endpoint: u8,
    ) -> Result<(), HostError> {
        let request = BindRequest {
            tsn: self.next_seq(),
            src_ieee: self.device_ieee,
            src_endpoint: endpoint,
            cluster_id: cluster.id(),
            dst_ieee: self.coordinator_ieee,
            dst_endpoint: coordinator_endpoint,
        };
        println!(
            "ep{} {:<26} {:<20} {}",
            endpoint,
            cluster.name(),
            format!("zdo {:#06x}", ZdoCluster::BindReq as u16),
            hex::encode(request.serialize())
        );
        Ok(())
    }

    async fn configure_reporting(
        &self,
        endpoint: u8,
        rule: &ReportingRule,
    ) -> Result<(), HostError> {
        let record = rule.to_record().map_err(transport)?;
        let frame = ZclFrame::configure_reporting(self.next_seq(), &[record]).map_err(transport)?;
        self.emit(endpoint, rule.cluster, "configure_reporting", &frame);
        Ok(())
    }
}

/// Parse a 16 hex digit IEEE address, with or without `:` separators
pub fn parse_ieee(s: &str) -> Result<[u8; 8], String> {
    let digits: String = s.chars().filter(|c| *c != ':').collect();
    let bytes = hex::decode(&digits).map_err(|e| format!("Invalid IEEE address {s}: {e}"))?;
    <[u8; 8]>::try_from(bytes.as_slice())
        .map_err(|_| format!("IEEE address must be 8 bytes, got {}", bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ieee() {
        assert_eq!(
            parse_ieee("00:12:4b:00:01:02:03:04").unwrap(),
            [0x00, 0x12, 0x4b, 0x00, 0x01, 0x02, 0x03, 0x04]
        );
        assert!(parse_ieee("0012").is_err());
        assert!(parse_ieee("zz12").is_err());
    }

    #[test]
    fn test_ieee_stored_over_the_air_order() {
        let host = DryRunHost::new([1, 2, 3, 4, 5, 6, 7, 8], [0; 8]);
        assert_eq!(host.device_ieee, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_sequence_advances() {
        let host = DryRunHost::new([0; 8], [0; 8]);
        host.bind(1, Cluster::MsCO2, 1).await.unwrap();
        assert_eq!(host.next_seq(), 2);
    }
}
