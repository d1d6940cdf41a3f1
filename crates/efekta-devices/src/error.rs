//! Error types for the device definitions

use thiserror::Error;
use zcl_protocol::{ProtocolError, Status};

/// Errors produced while encoding a setting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// No field with this key in the definition
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field is published only
    #[error("Field is read-only: {0}")]
    NotWritable(String),

    /// Input could not be interpreted for the field
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Input is outside the advertised domain (range validation enabled)
    #[error("Value for {field} outside allowed domain: {value}")]
    OutOfDomain { field: String, value: String },

    /// Value does not fit the attribute's wire type
    #[error("Wire encoding failed: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Failures reported by the host framework
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Request timeout")]
    Timeout,

    #[error("Device rejected request: {0:?}")]
    Rejected(Status),

    #[error("Endpoint {0} not available")]
    MissingEndpoint(u8),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors from operations that talk to a device
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Inconsistencies between the descriptor and the binding tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("{model}: duplicate field key {key}")]
    DuplicateKey { model: &'static str, key: String },

    #[error("{model}: {first} and {second} both write {cluster}/{attribute:#06x} on ep{endpoint}")]
    DuplicateBinding {
        model: &'static str,
        first: &'static str,
        second: &'static str,
        cluster: &'static str,
        attribute: u16,
        endpoint: u8,
    },

    #[error("{model}: settable field {key} has no inverse transform")]
    NotInvertible { model: &'static str, key: String },

    #[error("{model}: field {key} has an empty range")]
    EmptyRange { model: &'static str, key: String },
}
