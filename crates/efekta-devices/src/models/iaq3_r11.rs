//! EFEKTA iAQ3 (revision 11): named chart periods and sensor source

use super::common::{
    self, attr, co2_rule, humidity_rule, illuminance_rule, temperature_rule, voc_rule,
};
use super::Variant;
use crate::definition::DeviceDefinition;
use crate::field::Field;
use crate::reporting::ReportingStep;
use zcl_protocol::{Cluster, DataType};

const CHART_PERIODS: &[(&str, i64)] = &[("1H", 0), ("24H", 1)];
const TH_SOURCES: &[(&str, i64)] = &[("INTERNAL", 0), ("EXTERNAL", 1)];
const ROTATIONS: &[(&str, i64)] = &[("0", 0), ("90", 90), ("180", 180), ("270", 270)];

pub static DEFINITION: DeviceDefinition = DeviceDefinition {
    variant: Variant::Iaq3R11,
    zigbee_model: "EFEKTA_iAQ3",
    vendor: "EFEKTA",
    description: common::MODEL_DESCRIPTION,
    fields: &[
        common::CO2,
        common::INDOOR_TEMPERATURE,
        common::OUTDOOR_TEMPERATURE,
        common::INDOOR_HUMIDITY,
        common::OUTDOOR_HUMIDITY,
        common::VOC_INDEX,
        common::ILLUMINANCE_LUX,
        common::AUTO_BRIGHTNESS,
        common::NIGHT_ONOFF_BACKLIGHT,
        common::NIGHT_ON_BACKLIGHT,
        common::NIGHT_OFF_BACKLIGHT,
        Field::lookup("rotate", Cluster::MsCO2, attr::ROTATE, DataType::Uint16, ROTATIONS)
            .describe("Display rotation angle"),
        Field::lookup(
            "long_chart_period",
            Cluster::MsCO2,
            attr::LONG_CHART_PERIOD,
            DataType::Boolean,
            CHART_PERIODS,
        )
        .describe("The period of plotting the CO2 level(OFF - 1H | ON - 24H)"),
        Field::lookup(
            "long_chart_period2",
            Cluster::MsCO2,
            attr::LONG_CHART_PERIOD2,
            DataType::Boolean,
            CHART_PERIODS,
        )
        .describe("The period of plotting the VOC Index points(OFF - 1H | ON - 24H)"),
        common::SET_ALTITUDE,
        common::TEMPERATURE_OFFSET,
        common::HUMIDITY_OFFSET.step(1.0),
        Field::lookup(
            "th_sensor",
            Cluster::MsCO2,
            attr::TH_SENSOR,
            DataType::Boolean,
            TH_SOURCES,
        )
        .describe("Display data from internal or external TH sensor"),
        common::AUTOMATIC_SCAL,
        common::FORCED_RECALIBRATION,
        common::FACTORY_RESET_CO2,
        common::MANUAL_FORCED_RECALIBRATION,
        common::ENABLE_GAS,
        common::INVERT_LOGIC_GAS,
        common::HIGH_GAS,
        common::LOW_GAS,
    ],
    commands: &[],
    reporting: &[
        ReportingStep::bind(1, Cluster::MsCO2),
        ReportingStep::report(1, co2_rule(10, 600, 0.000_001)),
        ReportingStep::bind(1, Cluster::MsTemperatureMeasurement),
        ReportingStep::report(1, temperature_rule(30, 1800, 10.0)),
        ReportingStep::bind(2, Cluster::MsTemperatureMeasurement),
        ReportingStep::report(2, temperature_rule(30, 1800, 10.0)),
        ReportingStep::bind(1, Cluster::MsRelativeHumidity),
        ReportingStep::report(1, humidity_rule(30, 1800, 10.0)),
        ReportingStep::bind(2, Cluster::MsRelativeHumidity),
        ReportingStep::report(2, humidity_rule(30, 1800, 10.0)),
        ReportingStep::bind(2, Cluster::GenAnalogInput),
        ReportingStep::report(2, voc_rule(0, 300, 0.0)),
        ReportingStep::bind(2, Cluster::MsIlluminanceMeasurement),
        ReportingStep::report(2, illuminance_rule(0, 300, 0.0)),
    ],
    time_sync: false,
};
