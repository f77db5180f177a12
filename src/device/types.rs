use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceCategory {
    HifiSpeaker,
    Speaker,
    Tv,
    TvWithMediaBox,
    LaptopComputer,
    DesktopComputer,
    AccessorySetup,
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            DeviceCategory::HifiSpeaker => "HiFi speaker",
            DeviceCategory::Speaker => "Speaker",
            DeviceCategory::Tv => "TV",
            DeviceCategory::TvWithMediaBox => "TV with media box",
            DeviceCategory::LaptopComputer => "Laptop computer",
            DeviceCategory::DesktopComputer => "Desktop computer",
            DeviceCategory::AccessorySetup => "Accessory setup",
        };

        write!(f, "{}", result)
    }
}

impl Default for DeviceCategory {
    fn default() -> Self {
        DeviceCategory::HifiSpeaker
    }
}

/// A reverse-DNS type identifier, such as `com.example.example-protocol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtocolType(String);

impl ProtocolType {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let components: Vec<&str> = value.split('.').collect();

        let valid = components.len() >= 2 && components.iter().all(|component| {
            !component.is_empty() && component.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });

        if !valid {
            return Err(ConfigError::InvalidProtocolType { value: value.to_string() });
        }

        Ok(ProtocolType(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata broadcast by a nearby peripheral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advertisement {
    pub local_name: Option<String>,
    // identifier assigned to the peripheral by the bluetooth stack
    pub peripheral_id: Option<String>,
    pub rssi: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub identifier: String,
    pub display_name: String,
    pub category: DeviceCategory,
    pub protocol_type: ProtocolType,
    pub bluetooth_identifier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEventKind {
    Found,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEvent {
    pub kind: DeviceEventKind,
    pub device: Device,
}

impl DeviceEvent {
    pub fn found(device: Device) -> Self {
        DeviceEvent { kind: DeviceEventKind::Found, device }
    }

    pub fn lost(device: Device) -> Self {
        DeviceEvent { kind: DeviceEventKind::Lost, device }
    }
}

/// The state reported by the central-scanning stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unavailable,
    Available,
}

impl StackState {
    pub fn availability(&self) -> Availability {
        match self {
            StackState::PoweredOn => Availability::Available,
            StackState::Unknown
            | StackState::Resetting
            | StackState::Unsupported
            | StackState::Unauthorized
            | StackState::PoweredOff => Availability::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_type_accepts_reverse_dns() {
        let protocol = ProtocolType::parse("com.example.example-protocol").unwrap();
        assert_eq!(protocol.as_str(), "com.example.example-protocol");
        assert!(ProtocolType::parse("org.example.my_protocol2").is_ok());
    }

    #[test]
    fn protocol_type_rejects_malformed_identifiers() {
        for value in ["", "example", "com..example", ".com.example", "com.example.", "com.exa mple"] {
            let err = ProtocolType::parse(value).unwrap_err();
            assert!(err.is_misconfiguration(), "{:?} should be rejected", value);
        }
    }

    #[test]
    fn only_powered_on_is_available() {
        let unavailable = [
            StackState::Unknown,
            StackState::Resetting,
            StackState::Unsupported,
            StackState::Unauthorized,
            StackState::PoweredOff,
        ];
        for state in unavailable {
            assert_eq!(state.availability(), Availability::Unavailable);
        }
        assert_eq!(StackState::PoweredOn.availability(), Availability::Available);
    }

    #[test]
    fn category_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&DeviceCategory::HifiSpeaker).unwrap(), "\"hifiSpeaker\"");
        let category: DeviceCategory = serde_json::from_str("\"tvWithMediaBox\"").unwrap();
        assert_eq!(category, DeviceCategory::TvWithMediaBox);
    }
}
