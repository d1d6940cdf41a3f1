//! Inbound decoding and outbound encoding of logical fields

use crate::config::Config;
use crate::definition::DeviceDefinition;
use crate::error::{CodecError, DeviceError};
use crate::field::Command;
use crate::host::{self, HostDevice, WriteMode};
use serde_json::{Map, Value};
use zcl_protocol::{
    AttributeValue, Cluster, DataType, GlobalCommand, ProtocolError, WriteAttributeRecord,
    ZclFrame,
};

/// Published state, keyed by field key
pub type StateUpdate = Map<String, Value>;

/// Message type an attribute payload arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    AttributeReport,
    ReadResponse,
}

/// Attribute values received from one endpoint and cluster
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeReport {
    pub cluster_id: u16,
    pub endpoint: u8,
    pub kind: ReportKind,
    pub attributes: Vec<(u16, AttributeValue)>,
}

impl AttributeReport {
    #[must_use]
    pub fn new(cluster: Cluster, endpoint: u8, attributes: Vec<(u16, AttributeValue)>) -> Self {
        Self {
            cluster_id: cluster.id(),
            endpoint,
            kind: ReportKind::AttributeReport,
            attributes,
        }
    }

    /// Build from a Report Attributes or Read Attributes Response frame
    #[allow(clippy::missing_errors_doc)]
    pub fn from_frame(
        cluster_id: u16,
        endpoint: u8,
        frame: &ZclFrame,
    ) -> Result<Self, ProtocolError> {
        let attributes = frame
            .attribute_records()?
            .into_iter()
            .map(|r| (r.attribute, r.value))
            .collect();
        let kind = match GlobalCommand::from_u8(frame.command_id()) {
            Some(GlobalCommand::ReadAttributesResponse) => ReportKind::ReadResponse,
            _ => ReportKind::AttributeReport,
        };
        Ok(Self {
            cluster_id,
            endpoint,
            kind,
            attributes,
        })
    }

    #[must_use]
    pub fn cluster(&self) -> Option<Cluster> {
        Cluster::from_id(self.cluster_id)
    }
}

/// Turn a raw attribute report into published state
///
/// Attributes without a binding are ignored. A value that does not fit its
/// transform only drops that field.
#[must_use]
pub fn decode(definition: &DeviceDefinition, report: &AttributeReport) -> StateUpdate {
    let mut update = StateUpdate::new();
    let Some(cluster) = report.cluster() else {
        return update;
    };

    for (attribute, raw) in &report.attributes {
        let fields = definition.fields.iter().filter(|f| {
            f.access.readable()
                && f.binding.cluster == cluster
                && f.binding.attribute == *attribute
                && f.accepts_endpoint(report.endpoint)
        });
        for field in fields {
            match field.binding.transform.decode(raw) {
                Some(value) => {
                    update.insert(field.key().into_owned(), value);
                }
                None => tracing::debug!(
                    "Skipping {}: unexpected value {:?} for {}/{:#06x}",
                    field.key(),
                    raw,
                    cluster,
                    attribute
                ),
            }
        }
    }

    update
}

/// A single attribute write addressed to one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub endpoint: u8,
    pub cluster: Cluster,
    pub attribute: u16,
    pub data_type: DataType,
    pub value: AttributeValue,
    pub mode: WriteMode,
}

impl WriteRequest {
    /// Write Attributes frame carrying this request
    #[allow(clippy::missing_errors_doc)]
    pub fn to_frame(&self, transaction_seq: u8) -> Result<ZclFrame, ProtocolError> {
        ZclFrame::write_attributes(
            transaction_seq,
            &[WriteAttributeRecord {
                attribute: self.attribute,
                data_type: self.data_type,
                value: self.value.clone(),
            }],
        )
    }
}

/// A cluster-specific command addressed to one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub endpoint: u8,
    pub cluster: Cluster,
    pub command_id: u8,
    pub payload: Vec<u8>,
}

impl CommandRequest {
    #[must_use]
    pub fn to_frame(&self, transaction_seq: u8) -> ZclFrame {
        ZclFrame::cluster_command(transaction_seq, self.command_id, self.payload.clone())
    }
}

impl From<&Command> for CommandRequest {
    fn from(command: &Command) -> Self {
        Self {
            endpoint: command.endpoint,
            cluster: command.cluster,
            command_id: command.command_id,
            payload: Vec::new(),
        }
    }
}

/// Resolve a setting to the attribute write that carries it
#[allow(clippy::missing_errors_doc)]
pub fn encode(
    definition: &DeviceDefinition,
    name: &str,
    value: &Value,
    config: &Config,
) -> Result<WriteRequest, CodecError> {
    let field = definition
        .field(name)
        .ok_or_else(|| CodecError::UnknownField(name.to_string()))?;
    if !field.access.writable() {
        return Err(CodecError::NotWritable(name.to_string()));
    }
    if config.validate_ranges && !field.domain.admits(value) {
        return Err(CodecError::OutOfDomain {
            field: name.to_string(),
            value: value.to_string(),
        });
    }

    let binding = &field.binding;
    let raw = binding
        .transform
        .encode(value)
        .ok_or_else(|| CodecError::InvalidValue {
            field: name.to_string(),
            value: value.to_string(),
        })?;

    Ok(WriteRequest {
        endpoint: field.write_endpoint,
        cluster: binding.cluster,
        attribute: binding.attribute,
        data_type: binding.data_type,
        value: AttributeValue::from_integer(binding.data_type, raw)?,
        mode: WriteMode::MustSucceed,
    })
}

/// Encode a setting, write it through the host and echo the input as state
///
/// Command keys (such as `reset`) send their command instead and publish
/// nothing.
#[allow(clippy::missing_errors_doc)]
pub async fn set(
    definition: &DeviceDefinition,
    device: &dyn HostDevice,
    name: &str,
    value: &Value,
    config: &Config,
) -> Result<StateUpdate, DeviceError> {
    if let Some(command) = definition.command(name) {
        let request = CommandRequest::from(command);
        tracing::info!(
            "Sending {} as {} command {:#04x} on endpoint {}",
            name,
            request.cluster,
            request.command_id,
            request.endpoint
        );
        device.command(&request).await?;
        return Ok(StateUpdate::new());
    }

    let request = encode(definition, name, value, config)?;
    tracing::info!(
        "Writing {} = {} as {}/{:#06x} on endpoint {}",
        name,
        value,
        request.cluster,
        request.attribute,
        request.endpoint
    );
    host::send(device, &request).await?;

    let mut state = StateUpdate::new();
    state.insert(name.to_string(), value.clone());
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Iaq3Revision;
    use crate::error::HostError;
    use crate::host::mock::{HostCall, RecordingHost};
    use crate::models::Variant;
    use serde_json::json;
    use zcl_protocol::cluster::attrs;

    fn iaq() -> &'static DeviceDefinition {
        Variant::Iaq.definition()
    }

    #[test]
    fn test_decode_co2_fraction() {
        let report = AttributeReport::new(
            Cluster::MsCO2,
            1,
            vec![(attrs::MEASURED_VALUE, AttributeValue::Float(f64::from(0.000_4f32)))],
        );
        let update = decode(iaq(), &report);
        assert_eq!(update.get("co2"), Some(&json!(400)));
    }

    #[test]
    fn test_decode_illuminance_raw_and_lux() {
        let report = AttributeReport::new(
            Cluster::MsIlluminanceMeasurement,
            2,
            vec![(attrs::MEASURED_VALUE, AttributeValue::Unsigned(10_001))],
        );
        let update = decode(iaq(), &report);
        assert_eq!(update.get("illuminance_raw"), Some(&json!(10_001)));
        let lux = update.get("illuminance").and_then(Value::as_f64).unwrap();
        assert!((lux - 10.0).abs() < 1e-9);

        let dark = AttributeReport::new(
            Cluster::MsIlluminanceMeasurement,
            2,
            vec![(attrs::MEASURED_VALUE, AttributeValue::Unsigned(0))],
        );
        assert_eq!(decode(iaq(), &dark).get("illuminance"), Some(&json!(0)));
    }

    #[test]
    fn test_decode_settings_and_unknown_attributes() {
        let report = AttributeReport::new(
            Cluster::MsCO2,
            1,
            vec![
                (0x0203, AttributeValue::Bool(true)),
                (0x0205, AttributeValue::Unsigned(120)),
                (0x0299, AttributeValue::Unsigned(7)),
            ],
        );
        let update = decode(iaq(), &report);
        assert_eq!(update.len(), 2);
        assert_eq!(update.get("auto_brightness"), Some(&json!("ON")));
        assert_eq!(update.get("set_altitude"), Some(&json!(120)));
    }

    #[test]
    fn test_decode_unknown_cluster_is_empty() {
        let report = AttributeReport {
            cluster_id: 0x0006,
            endpoint: 1,
            kind: ReportKind::AttributeReport,
            attributes: vec![(0x0000, AttributeValue::Bool(true))],
        };
        assert!(decode(iaq(), &report).is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_value_only() {
        let report = AttributeReport::new(
            Cluster::MsCO2,
            1,
            vec![
                (0x0202, AttributeValue::Unsigned(5)),
                (0x0206, AttributeValue::Bool(false)),
            ],
        );
        let update = decode(iaq(), &report);
        assert_eq!(update.get("forced_recalibration"), None);
        assert_eq!(update.get("factory_reset_co2"), Some(&json!("OFF")));
    }

    #[test]
    fn test_decode_endpoint_qualified_fields() {
        let definition = Variant::IaqPlusR7.definition();
        let outdoor = AttributeReport::new(
            Cluster::MsTemperatureMeasurement,
            2,
            vec![(attrs::MEASURED_VALUE, AttributeValue::Signed(-525))],
        );
        let update = decode(definition, &outdoor);
        assert_eq!(update.get("temperature_2"), Some(&json!(-5.25)));
        assert_eq!(update.get("temperature_1"), None);
    }

    #[test]
    fn test_decode_from_frame() {
        let mut data = vec![0x18, 0x11, 0x0A];
        data.extend_from_slice(&[0x10, 0x02, 0x29]);
        data.extend_from_slice(&(-32i16).to_le_bytes());
        let frame = ZclFrame::parse(&data).unwrap();
        let report =
            AttributeReport::from_frame(Cluster::MsTemperatureMeasurement.id(), 1, &frame).unwrap();

        assert_eq!(report.kind, ReportKind::AttributeReport);
        let update = decode(iaq(), &report);
        assert_eq!(update.get("temperature_offset"), Some(&json!(-3.2)));
    }

    #[test]
    fn test_decode_frame_with_undecodable_trailing_record() {
        let mut data = vec![0x18, 0x12, 0x0A];
        data.extend_from_slice(&[0x00, 0x00, 0x39]);
        data.extend_from_slice(&0.000_4f32.to_le_bytes());
        data.extend_from_slice(&[0x99, 0x02, 0x41, 0x01, 0xFF]);
        let frame = ZclFrame::parse(&data).unwrap();
        let report = AttributeReport::from_frame(Cluster::MsCO2.id(), 1, &frame).unwrap();

        let update = decode(iaq(), &report);
        assert_eq!(update.get("co2"), Some(&json!(400)));
        assert_eq!(update.len(), 1);
    }

    #[test]
    fn test_encode_boolean_field() {
        let request = encode(iaq(), "enable_gas", &json!("ON"), &Config::default()).unwrap();
        assert_eq!(request.cluster, Cluster::MsCO2);
        assert_eq!(request.attribute, 0x0220);
        assert_eq!(request.data_type, DataType::Boolean);
        assert_eq!(request.value, AttributeValue::Bool(true));

        let off = encode(iaq(), "enable_gas", &json!("OFF"), &Config::default()).unwrap();
        assert_eq!(off.value, AttributeValue::Bool(false));
    }

    #[test]
    fn test_encode_scaled_offset() {
        let request =
            encode(iaq(), "temperature_offset", &json!(21.5), &Config::default()).unwrap();
        assert_eq!(request.cluster, Cluster::MsTemperatureMeasurement);
        assert_eq!(request.attribute, 0x0210);
        assert_eq!(request.data_type, DataType::Int16);
        assert_eq!(request.value, AttributeValue::Signed(215));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let config = Config::default();
        let request = encode(iaq(), "temperature_offset", &json!(21.5), &config).unwrap();
        let report = AttributeReport::new(
            request.cluster,
            request.endpoint,
            vec![(request.attribute, request.value)],
        );
        assert_eq!(decode(iaq(), &report).get("temperature_offset"), Some(&json!(21.5)));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_every_writable_field_roundtrips() {
        use crate::field::{Transform, ValueDomain};

        let config = Config {
            validate_ranges: true,
            ..Config::default()
        };
        for variant in Variant::ALL {
            let definition = variant.definition();
            for field in definition.fields.iter().filter(|f| f.access.writable()) {
                let input = match field.domain {
                    ValueDomain::Numeric { max: Some(max), .. } => match field.binding.transform {
                        Transform::Scale(_) => json!(max),
                        _ => json!(max as i64),
                    },
                    ValueDomain::Numeric { .. } => json!(60),
                    ValueDomain::Binary { on, .. } => json!(on),
                    ValueDomain::Enum(table) => json!(table[table.len() - 1].0),
                    ValueDomain::Choices(choices) => json!(choices[choices.len() - 1]),
                };
                let key = field.key();
                let request = encode(definition, &key, &input, &config).unwrap();
                let report = AttributeReport::new(
                    request.cluster,
                    request.endpoint,
                    vec![(request.attribute, request.value)],
                );
                assert_eq!(
                    decode(definition, &report).get(key.as_ref()),
                    Some(&input),
                    "{variant:?} {key}"
                );
            }
        }
    }

    #[test]
    fn test_encode_boundaries() {
        let config = Config {
            validate_ranges: true,
            ..Config::default()
        };
        for (name, value) in [
            ("set_altitude", 0),
            ("set_altitude", 3000),
            ("high_gas", 400),
            ("low_gas", 5000),
            ("manual_forced_recalibration", 5000),
        ] {
            assert!(encode(iaq(), name, &json!(value), &config).is_ok(), "{name}={value}");
        }
    }

    #[test]
    fn test_range_validation_is_opt_in() {
        let lenient = encode(iaq(), "high_gas", &json!(6000), &Config::default()).unwrap();
        assert_eq!(lenient.value, AttributeValue::Unsigned(6000));

        let strict = Config {
            validate_ranges: true,
            ..Config::default()
        };
        assert!(matches!(
            encode(iaq(), "high_gas", &json!(6000), &strict),
            Err(CodecError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_unknown_and_read_only() {
        let config = Config::default();
        assert_eq!(
            encode(iaq(), "brightness", &json!(1), &config),
            Err(CodecError::UnknownField("brightness".to_string()))
        );
        assert_eq!(
            encode(iaq(), "co2", &json!(400), &config),
            Err(CodecError::NotWritable("co2".to_string()))
        );
        assert!(matches!(
            encode(iaq(), "set_altitude", &json!("high"), &config),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_value_wider_than_wire_type() {
        let result = encode(iaq(), "set_altitude", &json!(70_000), &Config::default());
        assert!(matches!(
            result,
            Err(CodecError::Protocol(ProtocolError::ValueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_encode_routes_r10_endpoints() {
        let config = Config {
            iaq3_revision: Iaq3Revision::R10,
            ..Config::default()
        };
        let definition = Variant::Iaq3R10.definition();
        let display = encode(definition, "auto_brightness", &json!("ON"), &config).unwrap();
        assert_eq!(display.endpoint, 2);
        let offset = encode(definition, "humidity_offset", &json!(-5), &config).unwrap();
        assert_eq!(offset.endpoint, 1);
        assert_eq!(offset.value, AttributeValue::Signed(-5));
    }

    #[test]
    fn test_encode_lookup_fields() {
        let definition = Variant::Iaq3R11.definition();
        let config = Config::default();
        let rotate = encode(definition, "rotate", &json!("270"), &config).unwrap();
        assert_eq!(rotate.value, AttributeValue::Unsigned(270));
        let rotate = encode(definition, "rotate", &json!(90.0), &config).unwrap();
        assert_eq!(rotate.value, AttributeValue::Unsigned(90));
        let sensor = encode(definition, "th_sensor", &json!("EXTERNAL"), &config).unwrap();
        assert_eq!(sensor.value, AttributeValue::Bool(true));
        let period = encode(definition, "long_chart_period", &json!("1H"), &config).unwrap();
        assert_eq!(period.value, AttributeValue::Bool(false));
    }

    #[test]
    fn test_write_request_frame() {
        let request = encode(iaq(), "set_altitude", &json!(3000), &Config::default()).unwrap();
        let frame = request.to_frame(0x42).unwrap();
        assert_eq!(
            frame.serialize(),
            vec![0x10, 0x42, 0x02, 0x05, 0x02, 0x21, 0xB8, 0x0B]
        );
    }

    #[tokio::test]
    async fn test_set_writes_once_and_echoes_input() {
        let host = RecordingHost::default();
        let state = set(iaq(), &host, "set_altitude", &json!("150"), &Config::default())
            .await
            .unwrap();

        assert_eq!(state.get("set_altitude"), Some(&json!("150")));
        let calls = host.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            HostCall::Write(request) => {
                assert_eq!(request.endpoint, 1);
                assert_eq!(request.value, AttributeValue::Unsigned(150));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_set_reset_sends_basic_command() {
        let host = RecordingHost::default();
        let state = set(iaq(), &host, "reset", &json!(""), &Config::default())
            .await
            .unwrap();

        assert!(state.is_empty());
        assert_eq!(
            host.calls(),
            vec![HostCall::Command(CommandRequest {
                endpoint: 1,
                cluster: Cluster::GenBasic,
                command_id: 0x00,
                payload: Vec::new(),
            })]
        );
    }

    #[tokio::test]
    async fn test_reset_is_not_a_field() {
        let config = Config::default();
        assert_eq!(
            encode(iaq(), "reset", &json!(""), &config),
            Err(CodecError::UnknownField("reset".to_string()))
        );

        let host = RecordingHost::default();
        let r11 = Variant::Iaq3R11.definition();
        let result = set(r11, &host, "reset", &json!(""), &config).await;
        assert_eq!(
            result,
            Err(DeviceError::Codec(CodecError::UnknownField("reset".to_string())))
        );
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_command_request_frame() {
        let request = CommandRequest::from(iaq().command("reset").unwrap());
        assert_eq!(request.to_frame(0x05).serialize(), vec![0x11, 0x05, 0x00]);
    }

    #[tokio::test]
    async fn test_set_propagates_host_failure() {
        let host = RecordingHost::failing_at(0);
        let result = set(iaq(), &host, "enable_gas", &json!("ON"), &Config::default()).await;
        assert_eq!(result, Err(DeviceError::Host(HostError::Timeout)));
    }

    #[tokio::test]
    async fn test_set_encode_failure_skips_host() {
        let host = RecordingHost::default();
        let result = set(iaq(), &host, "co2", &json!(1), &Config::default()).await;
        assert!(matches!(result, Err(DeviceError::Codec(CodecError::NotWritable(_)))));
        assert!(host.calls().is_empty());
    }
}
