//! Device definitions for the EFEKTA iAQ family of CO2 monitors
//!
//! Each definition maps vendor attributes inside standard ZCL clusters to a
//! named state model, encodes settings back to attribute writes, and lists the
//! bindings and reporting thresholds a host sets up during interview.

pub mod codec;
pub mod config;
pub mod definition;
pub mod error;
pub mod expose;
pub mod field;
pub mod host;
pub mod models;
pub mod reporting;
pub mod time_sync;

pub use codec::{
    decode, encode, set, AttributeReport, CommandRequest, ReportKind, StateUpdate, WriteRequest,
};
pub use config::{load_config, Config, Iaq3Revision};
pub use definition::DeviceDefinition;
pub use error::{CodecError, DefinitionError, DeviceError, HostError};
pub use expose::{Expose, ExposeKind};
pub use field::{Access, AttributeBinding, Command, Field, Transform, ValueDomain};
pub use host::{Delivery, HostDevice, WriteMode};
pub use models::{find_by_model, resolve, Variant};
pub use reporting::{configure, ReportingRule, ReportingStep};
pub use time_sync::{on_event, on_event_now, SyncOutcome};
