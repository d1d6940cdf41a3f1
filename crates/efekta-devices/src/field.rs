//! Logical fields and their attribute bindings

use serde_json::{Number, Value};
use std::borrow::Cow;
use zcl_protocol::{AttributeValue, Cluster, DataType};

/// Access mode of a logical field, as advertised to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Published state, not settable
    State,
    /// Settable, never published
    Set,
    /// Published and settable
    StateSet,
}

impl Access {
    /// Access bits as understood by Zigbee host frameworks
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Access::State => 0b01,
            Access::Set => 0b10,
            Access::StateSet => 0b11,
        }
    }

    #[must_use]
    pub const fn readable(self) -> bool {
        matches!(self, Access::State | Access::StateSet)
    }

    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(self, Access::Set | Access::StateSet)
    }
}

/// Allowed values of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDomain {
    Numeric {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Binary {
        on: &'static str,
        off: &'static str,
    },
    /// Named values, encoded through the lookup table
    Enum(&'static [(&'static str, i64)]),
    /// Discrete numeric values
    Choices(&'static [i64]),
}

impl ValueDomain {
    /// Check a user-supplied value against the domain
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            ValueDomain::Numeric { min, max, .. } => match parse_float(value) {
                Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
                None => false,
            },
            ValueDomain::Binary { on, off } => {
                matches!(value, Value::Bool(_))
                    || value.as_str().is_some_and(|s| s == *on || s == *off)
            }
            ValueDomain::Enum(table) => lookup_key(value).is_some_and(|key| {
                table.iter().any(|(k, _)| *k == key)
            }),
            ValueDomain::Choices(choices) => {
                parse_int(value).is_some_and(|v| choices.contains(&v))
            }
        }
    }
}

/// Value transform between the wire and the published state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Raw value published as-is
    Identity,
    /// 0/1 published as "OFF"/"ON"
    OnOff,
    /// Raw value is the published value multiplied by the factor
    Scale(f64),
    /// Raw value published as the matching table key
    Lookup(&'static [(&'static str, i64)]),
    /// Standard measured value in hundredths
    Centi,
    /// CO2 concentration as a fraction, published in ppm
    Co2Fraction,
    /// Logarithmic illuminance register, published in lux
    Lux,
}

impl Transform {
    /// Whether the transform can produce a wire value from user input
    #[must_use]
    pub const fn is_invertible(&self) -> bool {
        matches!(
            self,
            Transform::Identity | Transform::OnOff | Transform::Scale(_) | Transform::Lookup(_)
        )
    }

    /// Convert a raw attribute value into its published form
    ///
    /// Returns `None` when the raw value does not have the expected shape.
    #[must_use]
    pub fn decode(&self, raw: &AttributeValue) -> Option<Value> {
        match self {
            Transform::Identity => match raw {
                AttributeValue::Unsigned(v) => Some(Value::from(*v)),
                AttributeValue::Signed(v) => Some(Value::from(*v)),
                AttributeValue::Float(v) => float(*v),
                AttributeValue::Bool(_) | AttributeValue::Text(_) => None,
            },
            Transform::OnOff => match raw.as_i64()? {
                0 => Some(Value::from("OFF")),
                1 => Some(Value::from("ON")),
                _ => None,
            },
            Transform::Scale(factor) => float(raw.as_f64()? / factor),
            Transform::Lookup(table) => {
                let raw = raw.as_i64()?;
                table
                    .iter()
                    .find(|(_, v)| *v == raw)
                    .map(|(k, _)| Value::from(*k))
            }
            Transform::Centi => float(raw.as_f64()? / 100.0),
            #[allow(clippy::cast_possible_truncation)]
            Transform::Co2Fraction => {
                let fraction = raw.as_f64()?;
                fraction
                    .is_finite()
                    .then(|| Value::from((fraction * 1_000_000.0).round() as i64))
            }
            Transform::Lux => {
                let raw = raw.as_f64()?;
                if raw == 0.0 {
                    Some(Value::from(0))
                } else {
                    float(10f64.powf((raw - 1.0) / 10_000.0))
                }
            }
        }
    }

    /// Convert user input into the integer register value
    ///
    /// Returns `None` when the input cannot be interpreted for this transform.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(&self, input: &Value) -> Option<i64> {
        match self {
            Transform::Identity | Transform::OnOff => {
                on_off(input).or_else(|| parse_int(input))
            }
            Transform::Scale(factor) => {
                let scaled = parse_float(input)? * factor;
                scaled.is_finite().then(|| scaled.round() as i64)
            }
            Transform::Lookup(table) => {
                let key = lookup_key(input)?;
                table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
            }
            Transform::Centi | Transform::Co2Fraction | Transform::Lux => None,
        }
    }
}

/// Wire location and transform of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeBinding {
    pub cluster: Cluster,
    pub attribute: u16,
    pub data_type: DataType,
    pub transform: Transform,
}

/// A named setting or measurement exposed to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub description: &'static str,
    pub access: Access,
    pub unit: Option<&'static str>,
    pub domain: ValueDomain,
    /// Endpoint qualifier for multi-endpoint devices
    pub endpoint: Option<u8>,
    /// Endpoint that writes are addressed to
    pub write_endpoint: u8,
    pub binding: AttributeBinding,
}

const UNBOUNDED: ValueDomain = ValueDomain::Numeric {
    min: None,
    max: None,
    step: None,
};

impl Field {
    /// Read-only measurement
    #[must_use]
    pub const fn sensor(
        name: &'static str,
        cluster: Cluster,
        attribute: u16,
        data_type: DataType,
        transform: Transform,
    ) -> Self {
        Self {
            name,
            description: "",
            access: Access::State,
            unit: None,
            domain: UNBOUNDED,
            endpoint: None,
            write_endpoint: 1,
            binding: AttributeBinding {
                cluster,
                attribute,
                data_type,
                transform,
            },
        }
    }

    /// Settable ON/OFF flag stored as a ZCL boolean
    #[must_use]
    pub const fn switch(name: &'static str, cluster: Cluster, attribute: u16) -> Self {
        let mut field = Self::sensor(name, cluster, attribute, DataType::Boolean, Transform::OnOff);
        field.access = Access::StateSet;
        field.domain = ValueDomain::Binary { on: "ON", off: "OFF" };
        field
    }

    /// Settable integer written as-is
    #[must_use]
    pub const fn number(
        name: &'static str,
        cluster: Cluster,
        attribute: u16,
        data_type: DataType,
    ) -> Self {
        let mut field = Self::sensor(name, cluster, attribute, data_type, Transform::Identity);
        field.access = Access::StateSet;
        field
    }

    /// Settable named value mapped through a lookup table
    #[must_use]
    pub const fn lookup(
        name: &'static str,
        cluster: Cluster,
        attribute: u16,
        data_type: DataType,
        table: &'static [(&'static str, i64)],
    ) -> Self {
        let mut field = Self::sensor(name, cluster, attribute, data_type, Transform::Lookup(table));
        field.access = Access::StateSet;
        field.domain = ValueDomain::Enum(table);
        field
    }

    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub const fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        let step = match self.domain {
            ValueDomain::Numeric { step, .. } => step,
            _ => None,
        };
        self.domain = ValueDomain::Numeric {
            min: Some(min),
            max: Some(max),
            step,
        };
        self
    }

    #[must_use]
    pub const fn step(mut self, step: f64) -> Self {
        let (min, max) = match self.domain {
            ValueDomain::Numeric { min, max, .. } => (min, max),
            _ => (None, None),
        };
        self.domain = ValueDomain::Numeric {
            min,
            max,
            step: Some(step),
        };
        self
    }

    #[must_use]
    pub const fn choices(mut self, choices: &'static [i64]) -> Self {
        self.domain = ValueDomain::Choices(choices);
        self
    }

    #[must_use]
    pub const fn scale(mut self, factor: f64) -> Self {
        self.binding.transform = Transform::Scale(factor);
        self
    }

    /// Qualify the field with an endpoint; it publishes as `<name>_<endpoint>`
    #[must_use]
    pub const fn on_endpoint(mut self, endpoint: u8) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    #[must_use]
    pub const fn write_to(mut self, endpoint: u8) -> Self {
        self.write_endpoint = endpoint;
        self
    }

    /// Key under which the field is published and set
    #[must_use]
    pub fn key(&self) -> Cow<'static, str> {
        match self.endpoint {
            Some(ep) => Cow::Owned(format!("{}_{}", self.name, ep)),
            None => Cow::Borrowed(self.name),
        }
    }

    /// Whether a report from `endpoint` feeds this field
    #[must_use]
    pub fn accepts_endpoint(&self, endpoint: u8) -> bool {
        self.endpoint.map_or(true, |ep| ep == endpoint)
    }
}

/// Settable key that sends a cluster command instead of writing an attribute
///
/// Commands carry no state; the value passed when setting them is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub key: &'static str,
    pub endpoint: u8,
    pub cluster: Cluster,
    pub command_id: u8,
}

impl Command {
    #[must_use]
    pub const fn new(key: &'static str, cluster: Cluster, command_id: u8) -> Self {
        Self {
            key,
            endpoint: 1,
            cluster,
            command_id,
        }
    }
}

fn float(v: f64) -> Option<Value> {
    Number::from_f64(v).map(Value::Number)
}

fn on_off(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) if s == "ON" => Some(1),
        Value::String(s) if s == "OFF" => Some(0),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Integer parse that truncates fractional input
#[allow(clippy::cast_possible_truncation)]
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Lookup keys may arrive as strings or as numbers ("90", 90 or 90.0)
#[allow(clippy::cast_possible_truncation)]
fn lookup_key(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(Cow::Owned((f as i64).to_string()))
            }
            _ => Some(Cow::Owned(n.to_string())),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROTATION: &[(&str, i64)] = &[("0", 0), ("90", 90), ("180", 180), ("270", 270)];

    #[test]
    fn test_on_off_transform() {
        let t = Transform::OnOff;
        assert_eq!(t.encode(&json!("ON")), Some(1));
        assert_eq!(t.encode(&json!("OFF")), Some(0));
        assert_eq!(t.decode(&AttributeValue::Unsigned(1)), Some(json!("ON")));
        assert_eq!(t.decode(&AttributeValue::Bool(false)), Some(json!("OFF")));
        assert_eq!(t.decode(&AttributeValue::Unsigned(2)), None);
    }

    #[test]
    fn test_scale_transform() {
        let t = Transform::Scale(10.0);
        assert_eq!(t.encode(&json!(21.5)), Some(215));
        assert_eq!(t.encode(&json!("-3.2")), Some(-32));
        assert_eq!(t.decode(&AttributeValue::Signed(215)), Some(json!(21.5)));
    }

    #[test]
    fn test_identity_parses_like_parse_int() {
        let t = Transform::Identity;
        assert_eq!(t.encode(&json!("3000")), Some(3000));
        assert_eq!(t.encode(&json!(12.7)), Some(12));
        assert_eq!(t.encode(&json!("ON")), Some(1));
        assert_eq!(t.encode(&json!("high")), None);
        assert_eq!(t.decode(&AttributeValue::Text("x".into())), None);
    }

    #[test]
    fn test_lookup_transform() {
        let t = Transform::Lookup(ROTATION);
        assert_eq!(t.encode(&json!("90")), Some(90));
        assert_eq!(t.encode(&json!(270)), Some(270));
        assert_eq!(t.encode(&json!("45")), None);
        assert_eq!(t.encode(&json!(90.0)), Some(90));
        assert_eq!(t.encode(&json!(-0.0)), Some(0));
        assert_eq!(t.encode(&json!(90.5)), None);
        assert_eq!(t.decode(&AttributeValue::Unsigned(180)), Some(json!("180")));
    }

    #[test]
    fn test_co2_fraction() {
        let v = Transform::Co2Fraction
            .decode(&AttributeValue::Float(f64::from(0.000_4f32)))
            .unwrap();
        assert_eq!(v, json!(400));
        assert_eq!(Transform::Co2Fraction.encode(&json!(400)), None);
    }

    #[test]
    fn test_lux() {
        let lux = |raw| {
            Transform::Lux
                .decode(&AttributeValue::Unsigned(raw))
                .and_then(|v| v.as_f64())
                .unwrap()
        };
        assert_eq!(lux(0), 0.0);
        assert!((lux(1) - 1.0).abs() < 1e-9);
        assert!((lux(10_001) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_domain_admits() {
        let numeric = ValueDomain::Numeric {
            min: Some(0.0),
            max: Some(3000.0),
            step: None,
        };
        assert!(numeric.admits(&json!(0)));
        assert!(numeric.admits(&json!("3000")));
        assert!(!numeric.admits(&json!(3001)));

        assert!(ValueDomain::Binary { on: "ON", off: "OFF" }.admits(&json!("OFF")));
        assert!(!ValueDomain::Binary { on: "ON", off: "OFF" }.admits(&json!("MAYBE")));
        assert!(ValueDomain::Choices(&[0, 90, 180, 270]).admits(&json!(180)));
        assert!(!ValueDomain::Enum(ROTATION).admits(&json!("45")));
    }

    #[test]
    fn test_field_key() {
        let field = Field::sensor(
            "temperature",
            Cluster::MsTemperatureMeasurement,
            0x0000,
            DataType::Int16,
            Transform::Centi,
        );
        assert_eq!(field.key(), "temperature");
        assert_eq!(field.on_endpoint(2).key(), "temperature_2");
        assert!(field.on_endpoint(2).accepts_endpoint(2));
        assert!(!field.on_endpoint(2).accepts_endpoint(1));
    }
}
