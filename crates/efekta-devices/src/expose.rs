//! Capability descriptors consumed by the host UI layer

use crate::field::{Field, ValueDomain};
use serde::Serialize;
use serde_json::Value;

/// Widget type of an exposed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposeKind {
    Numeric,
    Binary,
    Enum,
}

/// One exposed field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expose {
    #[serde(rename = "type")]
    pub kind: ExposeKind,
    pub name: String,
    /// Key the value is published under
    pub property: String,
    /// STATE=1, SET=2, STATE_SET=3
    pub access: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_off: Option<String>,
}

impl From<&Field> for Expose {
    fn from(field: &Field) -> Self {
        let mut expose = Self {
            kind: ExposeKind::Numeric,
            name: field.name.to_string(),
            property: field.key().into_owned(),
            access: field.access.bits(),
            endpoint: field.endpoint.map(|ep| ep.to_string()),
            unit: field.unit.map(str::to_string),
            description: (!field.description.is_empty()).then(|| field.description.to_string()),
            value_min: None,
            value_max: None,
            value_step: None,
            values: None,
            value_on: None,
            value_off: None,
        };

        match field.domain {
            ValueDomain::Numeric { min, max, step } => {
                expose.value_min = min;
                expose.value_max = max;
                expose.value_step = step;
            }
            ValueDomain::Binary { on, off } => {
                expose.kind = ExposeKind::Binary;
                expose.value_on = Some(on.to_string());
                expose.value_off = Some(off.to_string());
            }
            ValueDomain::Enum(table) => {
                expose.kind = ExposeKind::Enum;
                expose.values = Some(table.iter().map(|(k, _)| Value::from(*k)).collect());
            }
            ValueDomain::Choices(choices) => {
                expose.kind = ExposeKind::Enum;
                expose.values = Some(choices.iter().map(|v| Value::from(*v)).collect());
            }
        }

        expose
    }
}
