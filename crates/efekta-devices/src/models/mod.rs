//! Device variants of the EFEKTA iAQ family

pub(crate) mod common;
mod iaq;
mod iaq3_r10;
mod iaq3_r11;
mod iaq_plus;

pub use common::attr;

use crate::config::{Config, Iaq3Revision};
use crate::definition::DeviceDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported device model and firmware revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Iaq,
    IaqPlusR7,
    Iaq3R10,
    Iaq3R11,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Iaq,
        Variant::IaqPlusR7,
        Variant::Iaq3R10,
        Variant::Iaq3R11,
    ];

    #[must_use]
    pub fn definition(self) -> &'static DeviceDefinition {
        match self {
            Variant::Iaq => &iaq::DEFINITION,
            Variant::IaqPlusR7 => &iaq_plus::DEFINITION,
            Variant::Iaq3R10 => &iaq3_r10::DEFINITION,
            Variant::Iaq3R11 => &iaq3_r11::DEFINITION,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Iaq => "iaq",
            Variant::IaqPlusR7 => "iaq_plus_r7",
            Variant::Iaq3R10 => "iaq3_r10",
            Variant::Iaq3R11 => "iaq3_r11",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("Unknown variant: {s}"))
    }
}

/// Find the definition the host should use for a reported model id
///
/// `EFEKTA_iAQ3` is shared by two firmware revisions; the configured one wins.
#[must_use]
pub fn find_by_model(model: &str, config: &Config) -> Option<&'static DeviceDefinition> {
    let revision = match config.iaq3_revision {
        Iaq3Revision::R10 => Variant::Iaq3R10,
        Iaq3Revision::R11 => Variant::Iaq3R11,
    };
    Variant::ALL
        .into_iter()
        .filter(|v| !matches!(v, Variant::Iaq3R10 | Variant::Iaq3R11) || *v == revision)
        .map(Variant::definition)
        .find(|d| d.zigbee_model == model)
}

/// Resolve either a variant name (`iaq3_r10`) or a zigbee model id (`EFEKTA_iAQ3`)
#[must_use]
pub fn resolve(name: &str, config: &Config) -> Option<&'static DeviceDefinition> {
    name.parse::<Variant>()
        .ok()
        .map(Variant::definition)
        .or_else(|| find_by_model(name, config))
}
