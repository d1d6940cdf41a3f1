//! Fields shared across the iAQ family

use crate::field::{Command, Field, Transform};
use crate::reporting::ReportingRule;
use zcl_protocol::cluster::attrs;
use zcl_protocol::{BasicCommand, Cluster, DataType};

/// Vendor attribute IDs
pub mod attr {
    pub const READING_INTERVAL: u16 = 0x0201;
    pub const FORCED_RECALIBRATION: u16 = 0x0202;
    pub const AUTO_BRIGHTNESS: u16 = 0x0203;
    pub const LONG_CHART_PERIOD: u16 = 0x0204;
    pub const SET_ALTITUDE: u16 = 0x0205;
    pub const FACTORY_RESET_CO2: u16 = 0x0206;
    pub const MANUAL_FORCED_RECALIBRATION: u16 = 0x0207;
    pub const ENABLE_GAS: u16 = 0x0220;
    pub const HIGH_GAS: u16 = 0x0221;
    pub const LOW_GAS: u16 = 0x0222;
    pub const INVERT_LOGIC_GAS: u16 = 0x0225;
    pub const ROTATE: u16 = 0x0285;
    pub const TH_SENSOR: u16 = 0x0288;
    pub const NIGHT_ONOFF_BACKLIGHT: u16 = 0x0401;
    pub const AUTOMATIC_SCAL: u16 = 0x0402;
    pub const LONG_CHART_PERIOD2: u16 = 0x0404;
    pub const NIGHT_ON_BACKLIGHT: u16 = 0x0405;
    pub const NIGHT_OFF_BACKLIGHT: u16 = 0x0406;
    /// Offset attribute in the temperature and humidity clusters
    pub const OFFSET: u16 = 0x0210;
    /// genPowerCfg
    pub const REPORT_DELAY: u16 = 0x0201;
}

pub const MODEL_DESCRIPTION: &str =
    "CO2 Monitor with IPS TFT Display, outdoor temperature and humidity, date and time";

pub const ROTATIONS: &[i64] = &[0, 90, 180, 270];

// Measurements

pub const CO2: Field = Field::sensor(
    "co2",
    Cluster::MsCO2,
    attrs::MEASURED_VALUE,
    DataType::Float32,
    Transform::Co2Fraction,
)
.unit("ppm")
.describe("The measured CO2 (carbon dioxide) value");

pub const TEMPERATURE: Field = Field::sensor(
    "temperature",
    Cluster::MsTemperatureMeasurement,
    attrs::MEASURED_VALUE,
    DataType::Int16,
    Transform::Centi,
)
.unit("°C")
.describe("Measured temperature value");

pub const HUMIDITY: Field = Field::sensor(
    "humidity",
    Cluster::MsRelativeHumidity,
    attrs::MEASURED_VALUE,
    DataType::Uint16,
    Transform::Centi,
)
.unit("%")
.describe("Measured relative humidity");

pub const INDOOR_TEMPERATURE: Field = TEMPERATURE
    .on_endpoint(1)
    .describe("Measured value of the built-in temperature sensor");
pub const OUTDOOR_TEMPERATURE: Field = TEMPERATURE
    .on_endpoint(2)
    .describe("Measured value of the external temperature sensor");
pub const INDOOR_HUMIDITY: Field = HUMIDITY
    .on_endpoint(1)
    .describe("Measured value of the built-in humidity sensor");
pub const OUTDOOR_HUMIDITY: Field = HUMIDITY
    .on_endpoint(2)
    .describe("Measured value of the external humidity sensor");

/// Illuminance converted to lux
pub const ILLUMINANCE_LUX: Field = Field::sensor(
    "illuminance",
    Cluster::MsIlluminanceMeasurement,
    attrs::MEASURED_VALUE,
    DataType::Uint16,
    Transform::Lux,
)
.unit("lx")
.describe("Measured illuminance in lux");

pub const ILLUMINANCE_RAW: Field = Field::sensor(
    "illuminance_raw",
    Cluster::MsIlluminanceMeasurement,
    attrs::MEASURED_VALUE,
    DataType::Uint16,
    Transform::Identity,
)
.describe("Raw measured illuminance");

pub const VOC_INDEX: Field = Field::sensor(
    "voc_index",
    Cluster::GenAnalogInput,
    attrs::PRESENT_VALUE,
    DataType::Float32,
    Transform::Identity,
)
.unit("VOC Index points")
.describe("VOC index");

// Display

pub const AUTO_BRIGHTNESS: Field =
    Field::switch("auto_brightness", Cluster::MsCO2, attr::AUTO_BRIGHTNESS)
        .describe("Enable or Disable Auto Brightness of the Display");

pub const LONG_CHART_PERIOD: Field =
    Field::switch("long_chart_period", Cluster::MsCO2, attr::LONG_CHART_PERIOD)
        .describe("The period of plotting the CO2 level(OFF - 1H | ON - 24H)");

pub const LONG_CHART_PERIOD2: Field =
    Field::switch("long_chart_period2", Cluster::MsCO2, attr::LONG_CHART_PERIOD2)
        .describe("The period of plotting the VOC Index points(OFF - 1H | ON - 24H)");

pub const NIGHT_ONOFF_BACKLIGHT: Field =
    Field::switch("night_onoff_backlight", Cluster::MsCO2, attr::NIGHT_ONOFF_BACKLIGHT)
        .describe("Complete shutdown of the backlight at night mode");

pub const NIGHT_ON_BACKLIGHT: Field = Field::number(
    "night_on_backlight",
    Cluster::MsCO2,
    attr::NIGHT_ON_BACKLIGHT,
    DataType::Uint8,
)
.unit("Hr")
.range(0.0, 23.0)
.describe("Night mode activation time");

pub const NIGHT_OFF_BACKLIGHT: Field = Field::number(
    "night_off_backlight",
    Cluster::MsCO2,
    attr::NIGHT_OFF_BACKLIGHT,
    DataType::Uint8,
)
.unit("Hr")
.range(0.0, 23.0)
.describe("Night mode deactivation time");

pub const ROTATE: Field = Field::number("rotate", Cluster::MsCO2, attr::ROTATE, DataType::Uint16)
    .choices(ROTATIONS)
    .describe("Display rotate");

// CO2 sensor

pub const SET_ALTITUDE: Field =
    Field::number("set_altitude", Cluster::MsCO2, attr::SET_ALTITUDE, DataType::Uint16)
        .unit("meters")
        .range(0.0, 3000.0)
        .describe("Setting the altitude above sea level (for high accuracy of the CO2 sensor)");

pub const AUTOMATIC_SCAL: Field =
    Field::switch("automatic_scal", Cluster::MsCO2, attr::AUTOMATIC_SCAL)
        .describe("Automatic self calibration");

pub const FORCED_RECALIBRATION: Field =
    Field::switch("forced_recalibration", Cluster::MsCO2, attr::FORCED_RECALIBRATION)
        .describe("Start FRC (Perform Forced Recalibration of the CO2 Sensor)");

pub const FACTORY_RESET_CO2: Field =
    Field::switch("factory_reset_co2", Cluster::MsCO2, attr::FACTORY_RESET_CO2)
        .describe("Factory Reset CO2 sensor");

pub const MANUAL_FORCED_RECALIBRATION: Field = Field::number(
    "manual_forced_recalibration",
    Cluster::MsCO2,
    attr::MANUAL_FORCED_RECALIBRATION,
    DataType::Uint16,
)
.unit("ppm")
.range(0.0, 5000.0)
.describe("Start Manual FRC (Perform Forced Recalibration of the CO2 Sensor)");

// Offsets

pub const TEMPERATURE_OFFSET: Field = Field::number(
    "temperature_offset",
    Cluster::MsTemperatureMeasurement,
    attr::OFFSET,
    DataType::Int16,
)
.scale(10.0)
.unit("°C")
.range(-50.0, 50.0)
.step(0.1)
.describe("Adjust temperature");

pub const HUMIDITY_OFFSET: Field = Field::number(
    "humidity_offset",
    Cluster::MsRelativeHumidity,
    attr::OFFSET,
    DataType::Int16,
)
.unit("%")
.range(-50.0, 50.0)
.describe("Adjust humidity");

// Gas control relay

pub const ENABLE_GAS: Field = Field::switch("enable_gas", Cluster::MsCO2, attr::ENABLE_GAS)
    .describe("Enable CO2 Gas Control");

pub const INVERT_LOGIC_GAS: Field =
    Field::switch("invert_logic_gas", Cluster::MsCO2, attr::INVERT_LOGIC_GAS)
        .describe("Enable invert logic CO2 Gas Control");

pub const HIGH_GAS: Field =
    Field::number("high_gas", Cluster::MsCO2, attr::HIGH_GAS, DataType::Uint16)
        .unit("ppm")
        .range(400.0, 5000.0)
        .describe("Setting High CO2 Gas Border");

pub const LOW_GAS: Field =
    Field::number("low_gas", Cluster::MsCO2, attr::LOW_GAS, DataType::Uint16)
        .unit("ppm")
        .range(400.0, 5000.0)
        .describe("Setting Low CO2 Gas Border");

// Device commands

/// Reset the whole device to factory defaults
pub const FACTORY_RESET: Command = Command::new(
    "reset",
    Cluster::GenBasic,
    BasicCommand::ResetToFactoryDefaults as u8,
);

// Reporting rules for the measured values

pub const fn co2_rule(min: u16, max: u16, change: f64) -> ReportingRule {
    ReportingRule::measured(Cluster::MsCO2, DataType::Float32, min, max, change)
}

pub const fn temperature_rule(min: u16, max: u16, change: f64) -> ReportingRule {
    ReportingRule::measured(Cluster::MsTemperatureMeasurement, DataType::Int16, min, max, change)
}

pub const fn humidity_rule(min: u16, max: u16, change: f64) -> ReportingRule {
    ReportingRule::measured(Cluster::MsRelativeHumidity, DataType::Uint16, min, max, change)
}

pub const fn illuminance_rule(min: u16, max: u16, change: f64) -> ReportingRule {
    ReportingRule::measured(Cluster::MsIlluminanceMeasurement, DataType::Uint16, min, max, change)
}

pub const fn voc_rule(min: u16, max: u16, change: f64) -> ReportingRule {
    ReportingRule::new(
        Cluster::GenAnalogInput,
        attrs::PRESENT_VALUE,
        DataType::Float32,
        min,
        max,
        change,
    )
}
