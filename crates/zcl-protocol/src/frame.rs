//! ZCL frame structure and attribute record codecs

use crate::commands::{frame_control, GlobalCommand};
use crate::types::{AttributeValue, DataType, ProtocolError, Status};
use bytes::{BufMut, BytesMut};

/// Minimum frame size: `frame_control(1)` + seq(1) + cmd(1) = 3
pub const MIN_FRAME_SIZE: usize = 3;

/// Zigbee device address mode for Bind_req destinations
const ADDR_MODE_IEEE: u8 = 0x03;

/// One record of a Write Attributes command
#[derive(Debug, Clone, PartialEq)]
pub struct WriteAttributeRecord {
    pub attribute: u16,
    pub data_type: DataType,
    pub value: AttributeValue,
}

/// One record of a Configure Reporting command (reported direction)
#[derive(Debug, Clone, PartialEq)]
pub struct ReportingConfigRecord {
    pub attribute: u16,
    pub data_type: DataType,
    pub min_interval: u16,
    pub max_interval: u16,
    /// Only encoded for analog data types
    pub reportable_change: AttributeValue,
}

/// One attribute carried by a Report Attributes or Read Attributes Response
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord {
    pub attribute: u16,
    pub data_type: DataType,
    pub value: AttributeValue,
}

/// ZCL frame (Zigbee Cluster Library)
///
/// Frame format:
/// ```text
/// [Frame control: 1 byte]
/// [Manufacturer code: 2 bytes LE] (only if frame control bit 2 is set)
/// [Transaction sequence: 1 byte]
/// [Command ID: 1 byte]
/// [Payload: variable]
/// ```
#[derive(Debug, Clone)]
pub struct ZclFrame {
    frame_control: u8,
    manufacturer_code: Option<u16>,
    transaction_seq: u8,
    command_id: u8,
    payload: Vec<u8>,
}

impl ZclFrame {
    /// Parse a ZCL frame from raw ASDU bytes
    #[allow(clippy::missing_errors_doc)]
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < MIN_FRAME_SIZE {
            return Err(ProtocolError::FrameTooShort(data.len()));
        }

        let frame_control = data[0];
        let mut idx = 1;

        let manufacturer_code = if (frame_control & frame_control::MANUFACTURER_SPECIFIC) != 0 {
            if data.len() < idx + 2 {
                return Err(ProtocolError::FrameTooShort(data.len()));
            }
            let code = u16::from_le_bytes([data[idx], data[idx + 1]]);
            idx += 2;
            Some(code)
        } else {
            None
        };

        if data.len() < idx + 2 {
            return Err(ProtocolError::FrameTooShort(data.len()));
        }

        let transaction_seq = data[idx];
        idx += 1;
        let command_id = data[idx];
        idx += 1;

        let payload = data[idx..].to_vec();

        Ok(Self {
            frame_control,
            manufacturer_code,
            transaction_seq,
            command_id,
            payload,
        })
    }

    /// Create a global command frame (client to server, no default response)
    #[must_use]
    pub fn global_command(transaction_seq: u8, command: GlobalCommand) -> Self {
        Self {
            frame_control: frame_control::DISABLE_DEFAULT_RESPONSE,
            manufacturer_code: None,
            transaction_seq,
            command_id: command as u8,
            payload: Vec::new(),
        }
    }

    /// Create a cluster-specific command frame (client to server)
    #[must_use]
    pub fn cluster_command(transaction_seq: u8, command_id: u8, payload: Vec<u8>) -> Self {
        Self {
            frame_control: frame_control::CLUSTER_SPECIFIC
                | frame_control::DISABLE_DEFAULT_RESPONSE,
            manufacturer_code: None,
            transaction_seq,
            command_id,
            payload,
        }
    }

    /// Mark the frame as manufacturer-specific
    #[must_use]
    pub fn with_manufacturer_code(mut self, code: u16) -> Self {
        self.frame_control |= frame_control::MANUFACTURER_SPECIFIC;
        self.manufacturer_code = Some(code);
        self
    }

    /// Create a Write Attributes frame
    #[allow(clippy::missing_errors_doc)]
    pub fn write_attributes(
        transaction_seq: u8,
        records: &[WriteAttributeRecord],
    ) -> Result<Self, ProtocolError> {
        let mut buf = BytesMut::new();
        for record in records {
            buf.put_u16_le(record.attribute);
            buf.put_u8(record.data_type as u8);
            record.value.encode(record.data_type, &mut buf)?;
        }

        let mut frame = Self::global_command(transaction_seq, GlobalCommand::WriteAttributes);
        frame.payload = buf.to_vec();
        Ok(frame)
    }

    /// Create a Configure Reporting frame
    #[allow(clippy::missing_errors_doc)]
    pub fn configure_reporting(
        transaction_seq: u8,
        records: &[ReportingConfigRecord],
    ) -> Result<Self, ProtocolError> {
        let mut buf = BytesMut::new();
        for record in records {
            buf.put_u8(0x00); // Direction: attribute is reported
            buf.put_u16_le(record.attribute);
            buf.put_u8(record.data_type as u8);
            buf.put_u16_le(record.min_interval);
            buf.put_u16_le(record.max_interval);
            if record.data_type.is_analog() {
                record
                    .reportable_change
                    .encode(record.data_type, &mut buf)?;
            }
        }

        let mut frame = Self::global_command(transaction_seq, GlobalCommand::ConfigureReporting);
        frame.payload = buf.to_vec();
        Ok(frame)
    }

    /// Get frame control byte
    #[must_use]
    pub fn frame_control(&self) -> u8 {
        self.frame_control
    }

    /// Get the manufacturer code, if the frame is manufacturer-specific
    #[must_use]
    pub fn manufacturer_code(&self) -> Option<u16> {
        self.manufacturer_code
    }

    /// Get the transaction sequence number
    #[must_use]
    pub fn transaction_seq(&self) -> u8 {
        self.transaction_seq
    }

    /// Check if this is a cluster-specific command (vs global)
    #[must_use]
    pub fn is_cluster_specific(&self) -> bool {
        (self.frame_control & 0x03) == frame_control::CLUSTER_SPECIFIC
    }

    /// Check if this is from server to client (vs client to server)
    #[must_use]
    pub fn is_from_server(&self) -> bool {
        (self.frame_control & frame_control::SERVER_TO_CLIENT) != 0
    }

    /// Get the command ID
    #[must_use]
    pub fn command_id(&self) -> u8 {
        self.command_id
    }

    /// Get the payload
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Extract attribute values from a Report Attributes or Read Attributes
    /// Response frame
    ///
    /// Read response records with a non-success status carry no value and are
    /// left out. A truncated record or one with an unsupported data type ends
    /// the scan; the records before it are still returned.
    #[allow(clippy::missing_errors_doc)]
    pub fn attribute_records(&self) -> Result<Vec<AttributeRecord>, ProtocolError> {
        if self.is_cluster_specific() {
            return Err(ProtocolError::UnexpectedCommand(self.command_id));
        }
        let with_status = match GlobalCommand::from_u8(self.command_id) {
            Some(GlobalCommand::ReportAttributes) => false,
            Some(GlobalCommand::ReadAttributesResponse) => true,
            _ => return Err(ProtocolError::UnexpectedCommand(self.command_id)),
        };

        let data = &self.payload;
        let mut records = Vec::new();
        let mut idx = 0;

        while idx < data.len() {
            let Some(&[lo, hi]) = data.get(idx..idx + 2) else {
                tracing::debug!("Truncated attribute record at offset {}", idx);
                break;
            };
            let attribute = u16::from_le_bytes([lo, hi]);
            idx += 2;

            if with_status {
                let Some(&status) = data.get(idx) else {
                    tracing::debug!("Attribute {:#06x} is missing its status", attribute);
                    break;
                };
                idx += 1;
                if status != Status::Success as u8 {
                    tracing::trace!(
                        "Attribute {:#06x} read failed with status {:?}",
                        attribute,
                        Status::try_from(status)
                    );
                    continue;
                }
            }

            let Some(&tag) = data.get(idx) else {
                tracing::debug!("Attribute {:#06x} is missing its data type", attribute);
                break;
            };
            idx += 1;

            // The width of an unknown or malformed value is unknown, so
            // nothing after it can be read
            let Some(data_type) = DataType::from_u8(tag) else {
                tracing::debug!(
                    "Attribute {:#06x} has unsupported data type {:#04x}, dropping the rest",
                    attribute,
                    tag
                );
                break;
            };
            let (value, used) = match AttributeValue::decode(data_type, &data[idx..]) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::debug!("Attribute {:#06x} could not be decoded: {}", attribute, e);
                    break;
                }
            };
            idx += used;

            records.push(AttributeRecord {
                attribute,
                data_type,
                value,
            });
        }

        Ok(records)
    }

    /// Serialize to bytes
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(5 + self.payload.len());
        data.push(self.frame_control);
        if let Some(mfr) = self.manufacturer_code {
            data.extend_from_slice(&mfr.to_le_bytes());
        }
        data.push(self.transaction_seq);
        data.push(self.command_id);
        data.extend_from_slice(&self.payload);
        data
    }
}

/// ZDO Bind_req payload binding a device cluster to a coordinator endpoint
#[derive(Debug, Clone)]
pub struct BindRequest {
    pub tsn: u8,
    pub src_ieee: [u8; 8],
    pub src_endpoint: u8,
    pub cluster_id: u16,
    pub dst_ieee: [u8; 8],
    pub dst_endpoint: u8,
}

impl BindRequest {
    /// Serialize to ZDO ASDU bytes
    ///
    /// IEEE addresses are stored in over-the-air (little-endian) byte order.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(22);
        data.push(self.tsn);
        data.extend_from_slice(&self.src_ieee);
        data.push(self.src_endpoint);
        data.extend_from_slice(&self.cluster_id.to_le_bytes());
        data.push(ADDR_MODE_IEEE);
        data.extend_from_slice(&self.dst_ieee);
        data.push(self.dst_endpoint);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BasicCommand;

    #[test]
    fn test_frame_too_short() {
        let result = ZclFrame::parse(&[0x18, 0x01]);
        assert!(matches!(result, Err(ProtocolError::FrameTooShort(_))));
    }

    #[test]
    fn test_write_attributes_boolean() {
        let frame = ZclFrame::write_attributes(
            0x2A,
            &[WriteAttributeRecord {
                attribute: 0x0203,
                data_type: DataType::Boolean,
                value: AttributeValue::Bool(true),
            }],
        )
        .unwrap();
        assert_eq!(
            frame.serialize(),
            vec![0x10, 0x2A, 0x02, 0x03, 0x02, 0x10, 0x01]
        );
    }

    #[test]
    fn test_write_attributes_manufacturer_specific() {
        let frame = ZclFrame::write_attributes(
            0x01,
            &[WriteAttributeRecord {
                attribute: 0x0210,
                data_type: DataType::Int16,
                value: AttributeValue::Signed(-25),
            }],
        )
        .unwrap()
        .with_manufacturer_code(0x1234);
        assert_eq!(
            frame.serialize(),
            vec![0x14, 0x34, 0x12, 0x01, 0x02, 0x10, 0x02, 0x29, 0xE7, 0xFF]
        );
    }

    #[test]
    fn test_configure_reporting_float_change() {
        let frame = ZclFrame::configure_reporting(
            0x05,
            &[ReportingConfigRecord {
                attribute: 0x0000,
                data_type: DataType::Float32,
                min_interval: 10,
                max_interval: 600,
                reportable_change: AttributeValue::Float(0.000_001),
            }],
        )
        .unwrap();

        let mut expected = vec![0x10, 0x05, 0x06, 0x00, 0x00, 0x00, 0x39, 0x0A, 0x00, 0x58, 0x02];
        expected.extend_from_slice(&0.000_001f32.to_le_bytes());
        assert_eq!(frame.serialize(), expected);
    }

    #[test]
    fn test_configure_reporting_discrete_has_no_change() {
        let frame = ZclFrame::configure_reporting(
            0x05,
            &[ReportingConfigRecord {
                attribute: 0x0203,
                data_type: DataType::Boolean,
                min_interval: 0,
                max_interval: 3600,
                reportable_change: AttributeValue::Bool(false),
            }],
        )
        .unwrap();
        assert_eq!(frame.payload().len(), 8);
    }

    #[test]
    fn test_parse_report_attributes() {
        let mut data = vec![0x18, 0x07, 0x0A];
        // measuredValue, float
        data.extend_from_slice(&[0x00, 0x00, 0x39]);
        data.extend_from_slice(&0.000_4f32.to_le_bytes());
        // 0x0205 set_altitude, uint16 = 120
        data.extend_from_slice(&[0x05, 0x02, 0x21, 0x78, 0x00]);

        let frame = ZclFrame::parse(&data).unwrap();
        assert!(frame.is_from_server());
        let records = frame.attribute_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data_type, DataType::Float32);
        assert_eq!(records[1].attribute, 0x0205);
        assert_eq!(records[1].value, AttributeValue::Unsigned(120));
    }

    #[test]
    fn test_parse_read_response_skips_failed_status() {
        let data = vec![
            0x18, 0x08, 0x01, // header
            0x10, 0x02, 0x86, // 0x0210 unsupported
            0x05, 0x04, 0x00, 0x20, 0x16, // 0x0405 uint8 = 22
        ];
        let frame = ZclFrame::parse(&data).unwrap();
        let records = frame.attribute_records().unwrap();
        assert_eq!(
            records,
            vec![AttributeRecord {
                attribute: 0x0405,
                data_type: DataType::Uint8,
                value: AttributeValue::Unsigned(22),
            }]
        );
    }

    #[test]
    fn test_unsupported_type_keeps_earlier_records() {
        let mut data = vec![0x18, 0x09, 0x0A];
        data.extend_from_slice(&[0x00, 0x00, 0x39]);
        data.extend_from_slice(&0.000_4f32.to_le_bytes());
        // 0x0299 octet string, not decodable here
        data.extend_from_slice(&[0x99, 0x02, 0x41, 0x02, 0xAA, 0xBB]);
        data.extend_from_slice(&[0x05, 0x02, 0x21, 0x78, 0x00]);

        let frame = ZclFrame::parse(&data).unwrap();
        let records = frame.attribute_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attribute, 0x0000);
        assert_eq!(records[0].data_type, DataType::Float32);
    }

    #[test]
    fn test_truncated_record_keeps_earlier_records() {
        let data = vec![
            0x18, 0x0A, 0x0A, // header
            0x05, 0x04, 0x20, 0x16, // 0x0405 uint8 = 22
            0x21, 0x02, 0x21, 0x90, // 0x0221 uint16 missing a byte
        ];
        let frame = ZclFrame::parse(&data).unwrap();
        let records = frame.attribute_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, AttributeValue::Unsigned(22));

        let header_only = ZclFrame::parse(&[0x18, 0x0B, 0x0A, 0x05]).unwrap();
        assert!(header_only.attribute_records().unwrap().is_empty());
    }

    #[test]
    fn test_attribute_records_rejects_other_commands() {
        let frame = ZclFrame::global_command(1, GlobalCommand::WriteAttributes);
        assert!(matches!(
            frame.attribute_records(),
            Err(ProtocolError::UnexpectedCommand(0x02))
        ));
    }

    #[test]
    fn test_cluster_command_frame() {
        let reset = BasicCommand::ResetToFactoryDefaults as u8;
        let frame = ZclFrame::cluster_command(7, reset, Vec::new());
        assert!(frame.is_cluster_specific());
        assert_eq!(frame.serialize(), vec![0x11, 0x07, 0x00]);
        assert!(matches!(
            frame.attribute_records(),
            Err(ProtocolError::UnexpectedCommand(0x00))
        ));
    }

    #[test]
    fn test_bind_request_layout() {
        let req = BindRequest {
            tsn: 3,
            src_ieee: [1, 2, 3, 4, 5, 6, 7, 8],
            src_endpoint: 2,
            cluster_id: 0x040D,
            dst_ieee: [9, 10, 11, 12, 13, 14, 15, 16],
            dst_endpoint: 1,
        };
        let bytes = req.serialize();
        assert_eq!(bytes.len(), 22);
        assert_eq!(bytes[9], 2);
        assert_eq!(&bytes[10..12], &[0x0D, 0x04]);
        assert_eq!(bytes[12], ADDR_MODE_IEEE);
        assert_eq!(bytes[21], 1);
    }
}
