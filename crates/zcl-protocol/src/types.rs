//! Common types used throughout the protocol

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// Protocol errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Frame too short: {0} bytes")]
    FrameTooShort(usize),

    #[error("Unsupported data type: {0:?}")]
    UnsupportedDataType(DataType),

    #[error("Value {value} out of range for {data_type:?}")]
    ValueOutOfRange { data_type: DataType, value: String },

    #[error("Unexpected command: {0:#04X}")]
    UnexpectedCommand(u8),

    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),
}

/// ZCL status codes carried in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Success = 0x00,
    Failure = 0x01,
    NotAuthorized = 0x7E,
    UnsupClusterCommand = 0x81,
    UnsupGeneralCommand = 0x82,
    InvalidField = 0x85,
    UnsupportedAttribute = 0x86,
    InvalidValue = 0x87,
    ReadOnly = 0x88,
    InsufficientSpace = 0x89,
    InvalidDataType = 0x8D,
    UnreportableAttribute = 0x8C,
    Timeout = 0x94,
}

impl TryFrom<u8> for Status {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x00 => Ok(Status::Success),
            0x01 => Ok(Status::Failure),
            0x7E => Ok(Status::NotAuthorized),
            0x81 => Ok(Status::UnsupClusterCommand),
            0x82 => Ok(Status::UnsupGeneralCommand),
            0x85 => Ok(Status::InvalidField),
            0x86 => Ok(Status::UnsupportedAttribute),
            0x87 => Ok(Status::InvalidValue),
            0x88 => Ok(Status::ReadOnly),
            0x89 => Ok(Status::InsufficientSpace),
            0x8C => Ok(Status::UnreportableAttribute),
            0x8D => Ok(Status::InvalidDataType),
            0x94 => Ok(Status::Timeout),
            _ => Err(value),
        }
    }
}

/// ZCL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    NoData = 0x00,
    Data8 = 0x08,
    Data16 = 0x09,
    Boolean = 0x10,
    Bitmap8 = 0x18,
    Bitmap16 = 0x19,
    Uint8 = 0x20,
    Uint16 = 0x21,
    Uint24 = 0x22,
    Uint32 = 0x23,
    Int8 = 0x28,
    Int16 = 0x29,
    Int24 = 0x2A,
    Int32 = 0x2B,
    Enum8 = 0x30,
    Enum16 = 0x31,
    Float32 = 0x39,
    Float64 = 0x3A,
    CharString = 0x42,
    UtcTime = 0xE2,
}

impl DataType {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(DataType::NoData),
            0x08 => Some(DataType::Data8),
            0x09 => Some(DataType::Data16),
            0x10 => Some(DataType::Boolean),
            0x18 => Some(DataType::Bitmap8),
            0x19 => Some(DataType::Bitmap16),
            0x20 => Some(DataType::Uint8),
            0x21 => Some(DataType::Uint16),
            0x22 => Some(DataType::Uint24),
            0x23 => Some(DataType::Uint32),
            0x28 => Some(DataType::Int8),
            0x29 => Some(DataType::Int16),
            0x2A => Some(DataType::Int24),
            0x2B => Some(DataType::Int32),
            0x30 => Some(DataType::Enum8),
            0x31 => Some(DataType::Enum16),
            0x39 => Some(DataType::Float32),
            0x3A => Some(DataType::Float64),
            0x42 => Some(DataType::CharString),
            0xE2 => Some(DataType::UtcTime),
            _ => None,
        }
    }

    /// Fixed encoded width in bytes, `None` for length-prefixed types
    #[must_use]
    pub fn width(self) -> Option<usize> {
        match self {
            DataType::NoData => Some(0),
            DataType::Data8
            | DataType::Boolean
            | DataType::Bitmap8
            | DataType::Uint8
            | DataType::Int8
            | DataType::Enum8 => Some(1),
            DataType::Data16
            | DataType::Bitmap16
            | DataType::Uint16
            | DataType::Int16
            | DataType::Enum16 => Some(2),
            DataType::Uint24 | DataType::Int24 => Some(3),
            DataType::Uint32 | DataType::Int32 | DataType::Float32 | DataType::UtcTime => Some(4),
            DataType::Float64 => Some(8),
            DataType::CharString => None,
        }
    }

    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int24 | DataType::Int32
        )
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Analog types carry a reportable change field in Configure Reporting
    #[must_use]
    pub fn is_analog(self) -> bool {
        matches!(
            self,
            DataType::Uint8
                | DataType::Uint16
                | DataType::Uint24
                | DataType::Uint32
                | DataType::Int8
                | DataType::Int16
                | DataType::Int24
                | DataType::Int32
                | DataType::Float32
                | DataType::Float64
                | DataType::UtcTime
        )
    }

    /// Inclusive integer range representable by this type
    fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            DataType::Boolean => Some((0, 1)),
            DataType::Data8 | DataType::Bitmap8 | DataType::Uint8 | DataType::Enum8 => {
                Some((0, 0xFF))
            }
            DataType::Data16 | DataType::Bitmap16 | DataType::Uint16 | DataType::Enum16 => {
                Some((0, 0xFFFF))
            }
            DataType::Uint24 => Some((0, 0xFF_FFFF)),
            DataType::Uint32 | DataType::UtcTime => Some((0, 0xFFFF_FFFF)),
            DataType::Int8 => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
            DataType::Int16 => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            DataType::Int24 => Some((-0x80_0000, 0x7F_FFFF)),
            DataType::Int32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            _ => None,
        }
    }
}

/// A decoded attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Unsigned(u32),
    Signed(i32),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Build a value of the given wire type from an integer, checking its range
    #[allow(
        clippy::missing_errors_doc,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_integer(data_type: DataType, value: i64) -> Result<Self, ProtocolError> {
        if data_type.is_float() {
            return Ok(AttributeValue::Float(value as f64));
        }

        let (min, max) = data_type
            .integer_range()
            .ok_or(ProtocolError::UnsupportedDataType(data_type))?;
        if value < min || value > max {
            return Err(ProtocolError::ValueOutOfRange {
                data_type,
                value: value.to_string(),
            });
        }

        // Range was checked above, the casts below cannot truncate
        let value = match data_type {
            DataType::Boolean => AttributeValue::Bool(value == 1),
            t if t.is_signed() => AttributeValue::Signed(value as i32),
            _ => AttributeValue::Unsigned(value as u32),
        };
        Ok(value)
    }

    /// Build a value of the given wire type from a float
    ///
    /// Integer types round to the nearest representable value.
    #[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
    pub fn from_float(data_type: DataType, value: f64) -> Result<Self, ProtocolError> {
        if data_type.is_float() {
            return Ok(AttributeValue::Float(value));
        }
        if !value.is_finite() {
            return Err(ProtocolError::ValueOutOfRange {
                data_type,
                value: value.to_string(),
            });
        }
        Self::from_integer(data_type, value.round() as i64)
    }

    /// Integer view of the value (booleans as 0/1)
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Bool(b) => Some(i64::from(*b)),
            AttributeValue::Unsigned(v) => Some(i64::from(*v)),
            AttributeValue::Signed(v) => Some(i64::from(*v)),
            AttributeValue::Float(_) | AttributeValue::Text(_) => None,
        }
    }

    /// Numeric view of the value
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Append the little-endian encoding of this value as `data_type`
    #[allow(
        clippy::missing_errors_doc,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn encode(&self, data_type: DataType, buf: &mut BytesMut) -> Result<(), ProtocolError> {
        match data_type {
            DataType::NoData => Ok(()),
            DataType::Float32 => {
                let v = self.float_for(data_type)?;
                buf.put_f32_le(v as f32);
                Ok(())
            }
            DataType::Float64 => {
                let v = self.float_for(data_type)?;
                buf.put_f64_le(v);
                Ok(())
            }
            DataType::CharString => match self {
                AttributeValue::Text(s) => {
                    let len = u8::try_from(s.len()).map_err(|_| ProtocolError::ValueOutOfRange {
                        data_type,
                        value: format!("{} byte string", s.len()),
                    })?;
                    buf.put_u8(len);
                    buf.put_slice(s.as_bytes());
                    Ok(())
                }
                other => Err(ProtocolError::ValueOutOfRange {
                    data_type,
                    value: format!("{other:?}"),
                }),
            },
            _ => {
                let raw = self.integer_for(data_type)?;
                // from_integer validates the range for this type
                Self::from_integer(data_type, raw)?;
                let width = data_type
                    .width()
                    .ok_or(ProtocolError::UnsupportedDataType(data_type))?;
                if data_type.is_signed() {
                    buf.put_int_le(raw, width);
                } else {
                    buf.put_uint_le(raw as u64, width);
                }
                Ok(())
            }
        }
    }

    /// Decode one value of `data_type` from the front of `data`
    ///
    /// Returns the value and the number of bytes consumed.
    #[allow(
        clippy::missing_errors_doc,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    pub fn decode(data_type: DataType, data: &[u8]) -> Result<(Self, usize), ProtocolError> {
        let width = match data_type.width() {
            Some(width) => width,
            None => {
                // Length-prefixed character string
                let len = *data.first().ok_or(ProtocolError::FrameTooShort(data.len()))? as usize;
                if data.len() < 1 + len {
                    return Err(ProtocolError::FrameTooShort(data.len()));
                }
                let text = String::from_utf8_lossy(&data[1..=len]).into_owned();
                return Ok((AttributeValue::Text(text), 1 + len));
            }
        };

        if data.len() < width {
            return Err(ProtocolError::FrameTooShort(data.len()));
        }
        let mut cursor = &data[..width];

        let value = match data_type {
            DataType::NoData => {
                return Err(ProtocolError::UnsupportedDataType(data_type));
            }
            DataType::Boolean => AttributeValue::Bool(cursor.get_u8() != 0),
            DataType::Float32 => AttributeValue::Float(f64::from(cursor.get_f32_le())),
            DataType::Float64 => AttributeValue::Float(cursor.get_f64_le()),
            t if t.is_signed() => {
                // Sign-extend from the encoded width
                let shift = 64 - 8 * width as u32;
                let raw = ((cursor.get_uint_le(width) << shift) as i64) >> shift;
                AttributeValue::Signed(raw as i32)
            }
            _ => AttributeValue::Unsigned(cursor.get_uint_le(width) as u32),
        };

        Ok((value, width))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer_for(&self, data_type: DataType) -> Result<i64, ProtocolError> {
        match self {
            AttributeValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Ok(*v as i64),
            other => other.as_i64().ok_or_else(|| ProtocolError::ValueOutOfRange {
                data_type,
                value: format!("{other:?}"),
            }),
        }
    }

    fn float_for(&self, data_type: DataType) -> Result<f64, ProtocolError> {
        self.as_f64().ok_or_else(|| ProtocolError::ValueOutOfRange {
            data_type,
            value: format!("{self:?}"),
        })
    }
}
