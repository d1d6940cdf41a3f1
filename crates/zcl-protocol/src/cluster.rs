//! ZCL (Zigbee Cluster Library) cluster definitions

use crate::types::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// ZCL cluster IDs used by measurement devices
pub mod id {
    // General Clusters
    pub const BASIC: u16 = 0x0000;
    pub const POWER_CONFIG: u16 = 0x0001;
    pub const TIME: u16 = 0x000A;
    pub const ANALOG_INPUT: u16 = 0x000C;

    // Measurement Clusters
    pub const ILLUMINANCE_MEASUREMENT: u16 = 0x0400;
    pub const TEMPERATURE_MEASUREMENT: u16 = 0x0402;
    pub const HUMIDITY_MEASUREMENT: u16 = 0x0405;
    pub const CARBON_DIOXIDE: u16 = 0x040D;
}

/// Standard attribute IDs
pub mod attrs {
    /// Measured value, shared by all measurement clusters
    pub const MEASURED_VALUE: u16 = 0x0000;
    pub const MIN_MEASURED_VALUE: u16 = 0x0001;
    pub const MAX_MEASURED_VALUE: u16 = 0x0002;

    /// Analog Input present value
    pub const PRESENT_VALUE: u16 = 0x0055;

    /// Time cluster
    pub const TIME: u16 = 0x0000;
    pub const TIME_STATUS: u16 = 0x0001;
    pub const LOCAL_TIME: u16 = 0x0007;

    /// Basic cluster
    pub const ZCL_VERSION: u16 = 0x0000;
    pub const MANUFACTURER_NAME: u16 = 0x0004;
    pub const MODEL_IDENTIFIER: u16 = 0x0005;

    /// Power configuration cluster
    pub const BATTERY_VOLTAGE: u16 = 0x0020;
    pub const BATTERY_PERCENTAGE_REMAINING: u16 = 0x0021;
}

/// Clusters addressed by the device definitions
///
/// Names follow the symbolic identifiers used by Zigbee host frameworks
/// (`msCO2`, `genPowerCfg`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cluster {
    GenBasic,
    GenPowerCfg,
    GenTime,
    GenAnalogInput,
    MsIlluminanceMeasurement,
    MsTemperatureMeasurement,
    MsRelativeHumidity,
    MsCO2,
}

impl Cluster {
    pub const ALL: [Cluster; 8] = [
        Cluster::GenBasic,
        Cluster::GenPowerCfg,
        Cluster::GenTime,
        Cluster::GenAnalogInput,
        Cluster::MsIlluminanceMeasurement,
        Cluster::MsTemperatureMeasurement,
        Cluster::MsRelativeHumidity,
        Cluster::MsCO2,
    ];

    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Cluster::GenBasic => id::BASIC,
            Cluster::GenPowerCfg => id::POWER_CONFIG,
            Cluster::GenTime => id::TIME,
            Cluster::GenAnalogInput => id::ANALOG_INPUT,
            Cluster::MsIlluminanceMeasurement => id::ILLUMINANCE_MEASUREMENT,
            Cluster::MsTemperatureMeasurement => id::TEMPERATURE_MEASUREMENT,
            Cluster::MsRelativeHumidity => id::HUMIDITY_MEASUREMENT,
            Cluster::MsCO2 => id::CARBON_DIOXIDE,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Cluster::GenBasic => "genBasic",
            Cluster::GenPowerCfg => "genPowerCfg",
            Cluster::GenTime => "genTime",
            Cluster::GenAnalogInput => "genAnalogInput",
            Cluster::MsIlluminanceMeasurement => "msIlluminanceMeasurement",
            Cluster::MsTemperatureMeasurement => "msTemperatureMeasurement",
            Cluster::MsRelativeHumidity => "msRelativeHumidity",
            Cluster::MsCO2 => "msCO2",
        }
    }

    #[must_use]
    pub fn from_id(cluster_id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == cluster_id)
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Resolve a standard attribute name (e.g. `measuredValue`) to its ID
    #[must_use]
    pub fn attribute_id(self, name: &str) -> Option<u16> {
        self.standard_attributes()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
    }

    /// Reverse of [`Cluster::attribute_id`]
    #[must_use]
    pub fn attribute_name(self, attribute: u16) -> Option<&'static str> {
        self.standard_attributes()
            .iter()
            .find(|(_, id)| *id == attribute)
            .map(|(n, _)| *n)
    }

    fn standard_attributes(self) -> &'static [(&'static str, u16)] {
        match self {
            Cluster::GenBasic => &[
                ("zclVersion", attrs::ZCL_VERSION),
                ("manufacturerName", attrs::MANUFACTURER_NAME),
                ("modelId", attrs::MODEL_IDENTIFIER),
            ],
            Cluster::GenPowerCfg => &[
                ("batteryVoltage", attrs::BATTERY_VOLTAGE),
                ("batteryPercentageRemaining", attrs::BATTERY_PERCENTAGE_REMAINING),
            ],
            Cluster::GenTime => &[
                ("time", attrs::TIME),
                ("timeStatus", attrs::TIME_STATUS),
                ("localTime", attrs::LOCAL_TIME),
            ],
            Cluster::GenAnalogInput => &[("presentValue", attrs::PRESENT_VALUE)],
            Cluster::MsIlluminanceMeasurement
            | Cluster::MsTemperatureMeasurement
            | Cluster::MsRelativeHumidity
            | Cluster::MsCO2 => &[
                ("measuredValue", attrs::MEASURED_VALUE),
                ("minMeasuredValue", attrs::MIN_MEASURED_VALUE),
                ("maxMeasuredValue", attrs::MAX_MEASURED_VALUE),
            ],
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a symbolic name (`msCO2`) or a numeric ID (`0x040d`, `1037`)
impl FromStr for Cluster {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(cluster) = Self::from_name(s) {
            return Ok(cluster);
        }
        let numeric = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16).ok(),
            None => s.parse::<u16>().ok(),
        };
        numeric
            .and_then(Self::from_id)
            .ok_or_else(|| ProtocolError::UnknownCluster(s.to_string()))
    }
}
