//! Device definition: fields, reporting steps and descriptor

use crate::error::DefinitionError;
use crate::expose::Expose;
use crate::field::{Command, Field, ValueDomain};
use crate::models::Variant;
use crate::reporting::ReportingStep;
use std::collections::{HashMap, HashSet};

/// Everything the host needs to integrate one device model
#[derive(Debug)]
pub struct DeviceDefinition {
    pub variant: Variant,
    pub zigbee_model: &'static str,
    pub vendor: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
    /// Settable keys that map to cluster commands
    pub commands: &'static [Command],
    /// Ordered bind and configure-reporting steps
    pub reporting: &'static [ReportingStep],
    /// Device expects its clock to be set when it reports genTime
    pub time_sync: bool,
}

impl DeviceDefinition {
    /// Look up a field by its publish key
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Look up a command by its set key
    #[must_use]
    pub fn command(&self, key: &str) -> Option<&'static Command> {
        self.commands.iter().find(|c| c.key == key)
    }

    #[must_use]
    pub fn exposes(&self) -> Vec<Expose> {
        self.fields.iter().map(Expose::from).collect()
    }

    /// Check that the field table is self-consistent
    #[allow(clippy::missing_errors_doc)]
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let model = self.zigbee_model;
        let mut keys = HashSet::new();
        let mut writes = HashMap::new();

        for field in self.fields {
            let key = field.key().into_owned();
            if !keys.insert(key.clone()) {
                return Err(DefinitionError::DuplicateKey { model, key });
            }

            if let ValueDomain::Numeric {
                min: Some(min),
                max: Some(max),
                ..
            } = field.domain
            {
                if min > max {
                    return Err(DefinitionError::EmptyRange { model, key });
                }
            }

            if !field.access.writable() {
                continue;
            }
            if !field.binding.transform.is_invertible() {
                return Err(DefinitionError::NotInvertible { model, key });
            }

            let binding = &field.binding;
            let triple = (binding.cluster, binding.attribute, field.write_endpoint);
            if let Some(first) = writes.insert(triple, field.name) {
                return Err(DefinitionError::DuplicateBinding {
                    model,
                    first,
                    second: field.name,
                    cluster: binding.cluster.name(),
                    attribute: binding.attribute,
                    endpoint: field.write_endpoint,
                });
            }
        }

        for command in self.commands {
            if !keys.insert(command.key.to_string()) {
                return Err(DefinitionError::DuplicateKey {
                    model,
                    key: command.key.to_string(),
                });
            }
        }

        Ok(())
    }
}
