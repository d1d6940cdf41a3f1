//! EFEKTA iAQ: single temperature/humidity sensor, clock synced from the hub

use super::common::{self, attr};
use super::Variant;
use crate::definition::DeviceDefinition;
use crate::field::{Field, Transform};
use crate::reporting::ReportingStep;
use zcl_protocol::cluster::attrs;
use zcl_protocol::{Cluster, DataType};

pub static DEFINITION: DeviceDefinition = DeviceDefinition {
    variant: Variant::Iaq,
    zigbee_model: "EFEKTA_iAQ",
    vendor: "Custom devices (DiY)",
    description: common::MODEL_DESCRIPTION,
    fields: &[
        common::CO2,
        common::TEMPERATURE,
        common::HUMIDITY,
        common::ILLUMINANCE_LUX,
        common::ILLUMINANCE_RAW,
        Field::sensor(
            "local_time",
            Cluster::GenTime,
            attrs::LOCAL_TIME,
            DataType::Uint32,
            Transform::Identity,
        )
        .describe("Local time reported by the device"),
        common::AUTO_BRIGHTNESS,
        common::LONG_CHART_PERIOD,
        common::SET_ALTITUDE,
        common::TEMPERATURE_OFFSET,
        Field::number(
            "humidity_offset",
            Cluster::MsRelativeHumidity,
            attr::OFFSET,
            DataType::Int16,
        )
        .unit("%")
        .range(0.0, 99.0)
        .describe("Adjust humidity"),
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
    ],
    time_sync: true,
};
