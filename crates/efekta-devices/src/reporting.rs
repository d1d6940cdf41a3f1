//! Bindings and attribute reporting set up during device interview

use crate::definition::DeviceDefinition;
use crate::error::DeviceError;
use crate::host::HostDevice;
use zcl_protocol::cluster::attrs;
use zcl_protocol::{AttributeValue, Cluster, DataType, ProtocolError, ReportingConfigRecord};

/// Reporting thresholds for one attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportingRule {
    pub cluster: Cluster,
    pub attribute: u16,
    pub data_type: DataType,
    /// Seconds
    pub min_interval: u16,
    /// Seconds
    pub max_interval: u16,
    /// In raw attribute units
    pub reportable_change: f64,
}

impl ReportingRule {
    #[must_use]
    pub const fn new(
        cluster: Cluster,
        attribute: u16,
        data_type: DataType,
        min_interval: u16,
        max_interval: u16,
        reportable_change: f64,
    ) -> Self {
        Self {
            cluster,
            attribute,
            data_type,
            min_interval,
            max_interval,
            reportable_change,
        }
    }

    /// Rule for the standard `measuredValue` attribute of a cluster
    #[must_use]
    pub const fn measured(
        cluster: Cluster,
        data_type: DataType,
        min_interval: u16,
        max_interval: u16,
        reportable_change: f64,
    ) -> Self {
        Self::new(
            cluster,
            attrs::MEASURED_VALUE,
            data_type,
            min_interval,
            max_interval,
            reportable_change,
        )
    }

    /// Wire record for a Configure Reporting frame
    #[allow(clippy::missing_errors_doc)]
    pub fn to_record(&self) -> Result<ReportingConfigRecord, ProtocolError> {
        let reportable_change = if self.data_type.is_analog() {
            AttributeValue::from_float(self.data_type, self.reportable_change)?
        } else {
            AttributeValue::Unsigned(0)
        };
        Ok(ReportingConfigRecord {
            attribute: self.attribute,
            data_type: self.data_type,
            min_interval: self.min_interval,
            max_interval: self.max_interval,
            reportable_change,
        })
    }
}

/// One step of the configuration sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportingStep {
    Bind { endpoint: u8, cluster: Cluster },
    Report { endpoint: u8, rule: ReportingRule },
}

impl ReportingStep {
    #[must_use]
    pub const fn bind(endpoint: u8, cluster: Cluster) -> Self {
        Self::Bind { endpoint, cluster }
    }

    #[must_use]
    pub const fn report(endpoint: u8, rule: ReportingRule) -> Self {
        Self::Report { endpoint, rule }
    }
}

/// Run the definition's bind and reporting steps in order
///
/// The first failing step aborts the sequence.
#[allow(clippy::missing_errors_doc)]
pub async fn configure(
    definition: &DeviceDefinition,
    host: &dyn HostDevice,
    coordinator_endpoint: u8,
) -> Result<(), DeviceError> {
    tracing::info!(
        "Configuring {} ({} steps)",
        definition.zigbee_model,
        definition.reporting.len()
    );

    for step in definition.reporting {
        match step {
            ReportingStep::Bind { endpoint, cluster } => {
                tracing::debug!("Binding {} on endpoint {}", cluster, endpoint);
                host.bind(*endpoint, *cluster, coordinator_endpoint).await?;
            }
            ReportingStep::Report { endpoint, rule } => {
                tracing::debug!(
                    "Reporting {}/{:#06x} on endpoint {}: min={}s max={}s change={}",
                    rule.cluster,
                    rule.attribute,
                    endpoint,
                    rule.min_interval,
                    rule.max_interval,
                    rule.reportable_change
                );
                host.configure_reporting(*endpoint, rule).await?;
            }
        }
    }

    tracing::info!("Configured {}", definition.zigbee_model);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::mock::{HostCall, RecordingHost};
    use crate::models::Variant;
    use std::collections::HashSet;

    fn reports(calls: &[HostCall]) -> Vec<(u8, ReportingRule)> {
        calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Report { endpoint, rule } => Some((*endpoint, *rule)),
                _ => None,
            })
            .collect()
    }

    fn bind(endpoint: u8, cluster: Cluster) -> HostCall {
        HostCall::Bind { endpoint, cluster }
    }

    #[test]
    fn test_rule_to_record() {
        let rule = ReportingRule::measured(
            Cluster::MsTemperatureMeasurement,
            DataType::Int16,
            10,
            600,
            10.0,
        );
        let record = rule.to_record().unwrap();
        assert_eq!(record.attribute, 0x0000);
        assert_eq!(record.reportable_change, AttributeValue::Signed(10));

        let co2 = ReportingRule::measured(Cluster::MsCO2, DataType::Float32, 10, 600, 0.000_001);
        assert_eq!(co2.to_record().unwrap().reportable_change, AttributeValue::Float(0.000_001));
    }

    #[tokio::test]
    async fn test_iaq_binds_without_reporting() {
        let host = RecordingHost::default();
        configure(Variant::Iaq.definition(), &host, 1).await.unwrap();

        let calls = host.calls();
        assert_eq!(
            calls,
            vec![
                bind(1, Cluster::GenTime),
                bind(1, Cluster::MsTemperatureMeasurement),
                bind(1, Cluster::MsRelativeHumidity),
                bind(1, Cluster::MsCO2),
                bind(2, Cluster::MsIlluminanceMeasurement),
            ]
        );
    }

    #[tokio::test]
    async fn test_iaq3_r10_reporting_constants() {
        let host = RecordingHost::default();
        configure(Variant::Iaq3R10.definition(), &host, 1).await.unwrap();

        let reports = reports(&host.calls());
        assert_eq!(reports.len(), 7);
        assert_eq!(
            reports[0],
            (1, ReportingRule::measured(Cluster::MsCO2, DataType::Float32, 10, 600, 0.000_001))
        );
        assert_eq!(
            reports[3],
            (
                2,
                ReportingRule::new(Cluster::GenAnalogInput, 0x0055, DataType::Float32, 10, 600, 1.0)
            )
        );
        let humidity =
            ReportingRule::measured(Cluster::MsRelativeHumidity, DataType::Uint16, 10, 600, 20.0);
        assert_eq!(reports[6], (2, humidity));
    }

    #[tokio::test]
    async fn test_one_bind_per_endpoint_cluster_pair() {
        for variant in Variant::ALL {
            let host = RecordingHost::default();
            configure(variant.definition(), &host, 1).await.unwrap();

            let binds: Vec<_> = host
                .calls()
                .into_iter()
                .filter_map(|c| match c {
                    HostCall::Bind { endpoint, cluster } => Some((endpoint, cluster)),
                    _ => None,
                })
                .collect();
            let unique: HashSet<_> = binds.iter().copied().collect();
            assert_eq!(unique.len(), binds.len(), "{variant:?}");
        }
    }

    #[tokio::test]
    async fn test_r11_reports_every_capability() {
        let host = RecordingHost::default();
        configure(Variant::Iaq3R11.definition(), &host, 1).await.unwrap();

        let reports = reports(&host.calls());
        let temperature: Vec<_> = reports
            .iter()
            .filter(|(_, r)| r.cluster == Cluster::MsTemperatureMeasurement)
            .collect();
        assert_eq!(temperature.len(), 2);
        assert!(temperature
            .iter()
            .all(|(_, r)| (r.min_interval, r.max_interval) == (30, 1800)));
        assert!(reports
            .iter()
            .any(|(ep, r)| *ep == 2
                && r.cluster == Cluster::GenAnalogInput
                && r.max_interval == 300));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_steps() {
        let host = RecordingHost::failing_at(2);
        let result = configure(Variant::IaqPlusR7.definition(), &host, 1).await;

        assert_eq!(result, Err(DeviceError::Host(HostError::Timeout)));
        assert_eq!(host.calls().len(), 3);
    }
}
