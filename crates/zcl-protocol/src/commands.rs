//! ZCL global command and ZDO cluster definitions

/// ZCL global (profile-wide) command IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GlobalCommand {
    ReadAttributes = 0x00,
    ReadAttributesResponse = 0x01,
    WriteAttributes = 0x02,
    WriteAttributesUndivided = 0x03,
    WriteAttributesResponse = 0x04,
    WriteAttributesNoResponse = 0x05,
    ConfigureReporting = 0x06,
    ConfigureReportingResponse = 0x07,
    ReadReportingConfig = 0x08,
    ReadReportingConfigResponse = 0x09,
    ReportAttributes = 0x0A,
    DefaultResponse = 0x0B,
}

impl GlobalCommand {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(GlobalCommand::ReadAttributes),
            0x01 => Some(GlobalCommand::ReadAttributesResponse),
            0x02 => Some(GlobalCommand::WriteAttributes),
            0x03 => Some(GlobalCommand::WriteAttributesUndivided),
            0x04 => Some(GlobalCommand::WriteAttributesResponse),
            0x05 => Some(GlobalCommand::WriteAttributesNoResponse),
            0x06 => Some(GlobalCommand::ConfigureReporting),
            0x07 => Some(GlobalCommand::ConfigureReportingResponse),
            0x08 => Some(GlobalCommand::ReadReportingConfig),
            0x09 => Some(GlobalCommand::ReadReportingConfigResponse),
            0x0A => Some(GlobalCommand::ReportAttributes),
            0x0B => Some(GlobalCommand::DefaultResponse),
            _ => None,
        }
    }
}

/// Cluster-specific commands of the Basic cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicCommand {
    ResetToFactoryDefaults = 0x00,
}

/// ZDO cluster IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ZdoCluster {
    BindReq = 0x0021,
    UnbindReq = 0x0022,
    BindRsp = 0x8021,
    UnbindRsp = 0x8022,
}

/// Frame control bits
pub mod frame_control {
    /// Cluster-specific command (vs global)
    pub const CLUSTER_SPECIFIC: u8 = 0x01;
    /// Manufacturer code present
    pub const MANUFACTURER_SPECIFIC: u8 = 0x04;
    /// Server to client direction
    pub const SERVER_TO_CLIENT: u8 = 0x08;
    /// Disable default response
    pub const DISABLE_DEFAULT_RESPONSE: u8 = 0x10;
}
