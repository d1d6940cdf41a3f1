//! Setting the device clock when it reports genTime

use crate::codec::{AttributeReport, ReportKind, WriteRequest};
use crate::config::Config;
use crate::definition::DeviceDefinition;
use crate::host::{self, Delivery, HostDevice, WriteMode};
use chrono::{DateTime, FixedOffset, Local};
use zcl_protocol::cluster::attrs;
use zcl_protocol::{AttributeValue, Cluster, DataType};

/// 2000-01-01T00:00:00Z as a Unix timestamp
pub const ZIGBEE_EPOCH: i64 = 946_684_800;

/// Endpoint hosting the device's genTime server
const TIME_ENDPOINT: u8 = 1;

/// What happened to a genTime report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Written,
    /// Not a time report, or sync disabled
    Skipped,
    /// Host refused the write; the failure is not propagated
    Failed,
}

/// Seconds since the Zigbee epoch, shifted by the local UTC offset
#[must_use]
pub fn zigbee_local_time(now: &DateTime<FixedOffset>) -> u32 {
    let seconds = now.timestamp() - ZIGBEE_EPOCH + i64::from(now.offset().local_minus_utc());
    u32::try_from(seconds.max(0)).unwrap_or(u32::MAX)
}

/// Answer a genTime attribute report with the hub's local time
pub async fn on_event(
    definition: &DeviceDefinition,
    device: &dyn HostDevice,
    report: &AttributeReport,
    now: DateTime<FixedOffset>,
    config: &Config,
) -> SyncOutcome {
    if !definition.time_sync
        || !config.time_sync
        || report.kind != ReportKind::AttributeReport
        || report.cluster() != Some(Cluster::GenTime)
    {
        return SyncOutcome::Skipped;
    }

    let time = zigbee_local_time(&now);
    let request = WriteRequest {
        endpoint: TIME_ENDPOINT,
        cluster: Cluster::GenTime,
        attribute: attrs::TIME,
        data_type: DataType::UtcTime,
        value: AttributeValue::Unsigned(time),
        mode: WriteMode::BestEffort,
    };

    match host::send(device, &request).await {
        Ok(Delivery::Acknowledged) => {
            tracing::debug!("Set {} clock to {}", definition.zigbee_model, time);
            SyncOutcome::Written
        }
        Ok(Delivery::Dropped) => SyncOutcome::Failed,
        Err(e) => {
            tracing::debug!("Time sync for {} failed: {}", definition.zigbee_model, e);
            SyncOutcome::Failed
        }
    }
}

/// [`on_event`] using the hub's current local time
pub async fn on_event_now(
    definition: &DeviceDefinition,
    device: &dyn HostDevice,
    report: &AttributeReport,
    config: &Config,
) -> SyncOutcome {
    on_event(definition, device, report, Local::now().fixed_offset(), config).await
}
