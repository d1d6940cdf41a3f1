//! Zigbee Cluster Library wire vocabulary
//!
//! This crate implements the parts of ZCL needed to talk to measurement
//! devices through a host coordinator: cluster and attribute identifiers,
//! typed attribute values, and the global-command frames used to write
//! attributes, configure reporting and receive reports.

pub mod cluster;
pub mod commands;
pub mod frame;
pub mod types;

pub use cluster::Cluster;
pub use commands::{BasicCommand, GlobalCommand, ZdoCluster};
pub use frame::{
    AttributeRecord, BindRequest, ReportingConfigRecord, WriteAttributeRecord, ZclFrame,
};
pub use types::*;
