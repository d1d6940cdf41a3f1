//! EFEKTA iAQ3 (revision 10): VOC sensor, display and CO2 settings live on endpoint 2

use super::common::{
    self, attr, co2_rule, humidity_rule, illuminance_rule, temperature_rule, voc_rule,
};
use super::Variant;
use crate::definition::DeviceDefinition;
use crate::field::Field;
use crate::reporting::ReportingStep;
use zcl_protocol::{Cluster, DataType};

/// Endpoint that carries the display and CO2 sensor settings
const SETTINGS: u8 = 2;

pub static DEFINITION: DeviceDefinition = DeviceDefinition {
    variant: Variant::Iaq3R10,
    zigbee_model: "EFEKTA_iAQ3",
    vendor: "Efekta",
    description: common::MODEL_DESCRIPTION,
    fields: &[
        common::CO2,
        common::INDOOR_TEMPERATURE,
        common::OUTDOOR_TEMPERATURE,
        common::INDOOR_HUMIDITY,
        common::OUTDOOR_HUMIDITY,
        common::VOC_INDEX,
        common::ILLUMINANCE_LUX,
        common::ILLUMINANCE_RAW,
        common::AUTO_BRIGHTNESS.write_to(SETTINGS),
        common::NIGHT_ONOFF_BACKLIGHT.write_to(SETTINGS),
        common::NIGHT_ON_BACKLIGHT.write_to(SETTINGS),
        common::NIGHT_OFF_BACKLIGHT.write_to(SETTINGS),
        common::ROTATE.write_to(SETTINGS),
        common::LONG_CHART_PERIOD.write_to(SETTINGS),
        common::LONG_CHART_PERIOD2.write_to(SETTINGS),
        common::SET_ALTITUDE.write_to(SETTINGS),
        common::TEMPERATURE_OFFSET,
        common::HUMIDITY_OFFSET,
        Field::switch("external_or_internal", Cluster::MsCO2, attr::TH_SENSOR)
            .write_to(SETTINGS)
            .describe("Display data from external or internal TH sensor"),
        common::AUTOMATIC_SCAL.write_to(SETTINGS),
        common::FORCED_RECALIBRATION.write_to(SETTINGS),
        common::FACTORY_RESET_CO2.write_to(SETTINGS),
        common::MANUAL_FORCED_RECALIBRATION.write_to(SETTINGS),
        common::ENABLE_GAS,
        common::INVERT_LOGIC_GAS,
        common::HIGH_GAS,
        common::LOW_GAS,
        Field::number(
            "report_delay",
            Cluster::GenPowerCfg,
            attr::REPORT_DELAY,
            DataType::Uint16,
        )
        .describe("Delay between measurement reports"),
    ],
    commands: &[common::FACTORY_RESET],
    reporting: &[
        ReportingStep::bind(1, Cluster::MsTemperatureMeasurement),
        ReportingStep::bind(1, Cluster::MsRelativeHumidity),
        ReportingStep::bind(1, Cluster::MsCO2),
        ReportingStep::bind(2, Cluster::MsIlluminanceMeasurement),
        ReportingStep::bind(2, Cluster::GenAnalogInput),
        ReportingStep::bind(2, Cluster::MsTemperatureMeasurement),
        ReportingStep::bind(2, Cluster::MsRelativeHumidity),
        ReportingStep::report(1, co2_rule(10, 600, 0.000_001)),
        ReportingStep::report(1, temperature_rule(10, 600, 10.0)),
        ReportingStep::report(1, humidity_rule(10, 600, 20.0)),
        ReportingStep::report(2, voc_rule(10, 600, 1.0)),
        ReportingStep::report(2, illuminance_rule(10, 600, 10.0)),
        ReportingStep::report(2, temperature_rule(10, 600, 10.0)),
        ReportingStep::report(2, humidity_rule(10, 600, 20.0)),
    ],
    time_sync: false,
};
