//! EFEKTA iAQ+ (revision 7): built-in and external T/H sensor, configurable reading interval

use super::common::{self, attr, co2_rule, humidity_rule, illuminance_rule, temperature_rule};
use super::Variant;
use crate::definition::DeviceDefinition;
use crate::field::Field;
use crate::reporting::ReportingStep;
use zcl_protocol::{Cluster, DataType};

pub static DEFINITION: DeviceDefinition = DeviceDefinition {
    variant: Variant::IaqPlusR7,
    zigbee_model: "EFEKTA_iAQ+",
    vendor: "Custom devices (DiY)",
    description: common::MODEL_DESCRIPTION,
    fields: &[
        common::CO2,
        common::INDOOR_TEMPERATURE,
        common::OUTDOOR_TEMPERATURE,
        common::INDOOR_HUMIDITY,
        common::OUTDOOR_HUMIDITY,
        common::ILLUMINANCE_LUX.named("illuminance_lux"),
        common::ILLUMINANCE_RAW.named("illuminance"),
        Field::number(
            "reading_interval",
            Cluster::MsCO2,
            attr::READING_INTERVAL,
            DataType::Uint16,
        )
        .unit("Seconds")
        .range(15.0, 300.0)
        .describe("Setting the sensor reading interval in seconds, by default 30 seconds"),
        common::AUTO_BRIGHTNESS.named("auto_backlight"),
        common::NIGHT_ONOFF_BACKLIGHT,
        common::NIGHT_ON_BACKLIGHT,
        common::NIGHT_OFF_BACKLIGHT,
        common::LONG_CHART_PERIOD,
        common::ROTATE,
        common::SET_ALTITUDE,
        common::TEMPERATURE_OFFSET,
        common::HUMIDITY_OFFSET,
        common::AUTOMATIC_SCAL,
        common::FORCED_RECALIBRATION,
        common::FACTORY_RESET_CO2,
        common::MANUAL_FORCED_RECALIBRATION,
        common::ENABLE_GAS,
        common::INVERT_LOGIC_GAS,
        common::HIGH_GAS,
        common::LOW_GAS,
    ],
    commands: &[common::FACTORY_RESET],
    reporting: &[
        ReportingStep::bind(1, Cluster::GenTime),
        ReportingStep::bind(1, Cluster::MsTemperatureMeasurement),
        ReportingStep::bind(1, Cluster::MsRelativeHumidity),
        ReportingStep::bind(1, Cluster::MsCO2),
        ReportingStep::bind(2, Cluster::MsIlluminanceMeasurement),
        ReportingStep::bind(2, Cluster::MsTemperatureMeasurement),
        ReportingStep::bind(2, Cluster::MsRelativeHumidity),
        ReportingStep::report(1, co2_rule(0, 300, 0.0)),
        ReportingStep::report(1, temperature_rule(0, 300, 0.0)),
        ReportingStep::report(1, humidity_rule(0, 300, 0.0)),
        ReportingStep::report(2, illuminance_rule(0, 300, 0.0)),
        ReportingStep::report(2, temperature_rule(0, 300, 0.0)),
        ReportingStep::report(2, humidity_rule(0, 300, 0.0)),
    ],
    time_sync: false,
};
