use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::constants::{EXAMPLE_PROTOCOL_TYPE, EXAMPLE_SERVICE, PLACEHOLDER_DEVICE_NAME};
use crate::device::types::{DeviceCategory, ProtocolType};
use crate::error::ConfigError;

/// The on-disk configuration. Identifiers are kept as strings here and validated by
/// `LocatorSettings::from_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub service_id: String,
    pub protocol_type: String,
    pub device_category: DeviceCategory,
    pub placeholder_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_id: EXAMPLE_SERVICE.to_string(),
            protocol_type: EXAMPLE_PROTOCOL_TYPE.to_string(),
            device_category: DeviceCategory::default(),
            placeholder_name: PLACEHOLDER_DEVICE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSettings {
    pub service_id: Uuid,
    pub protocol_type: ProtocolType,
    pub category: DeviceCategory,
    pub placeholder_name: String,
}

impl LocatorSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let service_id = Uuid::parse_str(config.service_id.trim()).map_err(|source| {
            ConfigError::InvalidServiceId { value: config.service_id.clone(), source }
        })?;
        let protocol_type = ProtocolType::parse(config.protocol_type.trim())?;

        let placeholder_name = if config.placeholder_name.is_empty() {
            PLACEHOLDER_DEVICE_NAME.to_string()
        } else {
            config.placeholder_name.clone()
        };

        Ok(LocatorSettings {
            service_id,
            protocol_type,
            category: config.device_category,
            placeholder_name,
        })
    }
}
