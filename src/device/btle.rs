use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, CentralState, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::device::stack::{CentralStack, StackEvent};
use crate::device::types::{Advertisement, StackState};
use crate::error::LocatorError;

/// A `CentralStack` backed by btleplug, scanning on every adapter the platform reports.
pub struct BtleplugStack {
    // kept alive for as long as the adapters are in use
    _manager: Manager,
    adapters: Vec<Adapter>,
    services: Arc<RwLock<Vec<Uuid>>>,
}

impl BtleplugStack {
    pub async fn new() -> Result<Self, LocatorError> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;

        if adapters.is_empty() {
            return Err(LocatorError::NoAdapter);
        }

        Ok(BtleplugStack {
            _manager: manager,
            adapters,
            services: Arc::new(RwLock::new(Vec::new())),
        })
    }
}

fn stack_state(state: CentralState) -> StackState {
    match state {
        CentralState::PoweredOn => StackState::PoweredOn,
        CentralState::PoweredOff => StackState::PoweredOff,
        _ => StackState::Unknown,
    }
}

// Some environments ignore the scan filter, so the advertised services are checked again.
// An empty filter matches every peripheral.
fn matches_services(filter: &[Uuid], advertised: &[Uuid]) -> bool {
    filter.is_empty() || advertised.iter().any(|uuid| filter.contains(uuid))
}

async fn advertisement(adapter: &Adapter, id: &btleplug::platform::PeripheralId, services: &[Uuid]) -> Option<Advertisement> {
    let peripheral = match adapter.peripheral(id).await {
        Ok(peripheral) => peripheral,
        Err(err) => {
            warn!("Failed to look up discovered peripheral {:?}: {}", id, err);
            return None;
        },
    };

    match peripheral.properties().await {
        Err(err) => {
            warn!("Could not query peripheral for properties: {:?}", err);
            None
        },
        Ok(None) => {
            warn!("Peripheral has no properties");
            None
        },
        Ok(Some(properties)) => {
            if !matches_services(services, &properties.services) {
                debug!("Ignoring peripheral {} without a matching service", properties.address);
                return None;
            }

            Some(Advertisement {
                local_name: properties.local_name,
                peripheral_id: Some(format!("{:?}", peripheral.id())),
                rssi: properties.rssi,
            })
        },
    }
}

async fn translate_event(adapter: Adapter, event: CentralEvent, services: Arc<RwLock<Vec<Uuid>>>) -> Option<StackEvent> {
    match event {
        CentralEvent::DeviceDiscovered(id) => {
            let services = services.read().expect("Failed to lock scan services").clone();
            advertisement(&adapter, &id, &services).await.map(StackEvent::PeripheralDiscovered)
        },
        CentralEvent::StateUpdate(state) => Some(StackEvent::StateChanged(stack_state(state))),
        _ => None,
    }
}

#[async_trait]
impl CentralStack for BtleplugStack {
    async fn start_scan(&self, services: &[Uuid]) -> Result<(), LocatorError> {
        *self.services.write().expect("Failed to lock scan services") = services.to_vec();

        let filter = ScanFilter {
            services: services.to_vec(),
        };

        for adapter in &self.adapters {
            info!("Scanning using adapter {}...", adapter.adapter_info().await.unwrap_or("UNKNOWN".to_string()));
            adapter.start_scan(filter.clone()).await?;
        }

        Ok(())
    }

    async fn stop_scan(&self) -> Result<(), LocatorError> {
        for adapter in &self.adapters {
            adapter.stop_scan().await?;
        }

        Ok(())
    }

    async fn events(&self) -> Result<BoxStream<'static, StackEvent>, LocatorError> {
        let mut streams = Vec::with_capacity(self.adapters.len());

        for adapter in &self.adapters {
            let adapter = adapter.clone();
            let services = self.services.clone();
            let events = adapter.events().await?;

            streams.push(events.filter_map(move |event| {
                translate_event(adapter.clone(), event, services.clone())
            }).boxed());
        }

        Ok(stream::select_all(streams).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_state_maps_to_stack_state() {
        assert_eq!(stack_state(CentralState::PoweredOn), StackState::PoweredOn);
        assert_eq!(stack_state(CentralState::PoweredOff), StackState::PoweredOff);
        assert_eq!(stack_state(CentralState::Unknown), StackState::Unknown);
    }

    #[test]
    fn empty_filter_matches_every_peripheral() {
        let advertised = [Uuid::new_v4()];
        assert!(matches_services(&[], &advertised));
        assert!(matches_services(&[], &[]));
    }

    #[test]
    fn peripheral_advertising_a_filtered_service_matches() {
        let service = Uuid::parse_str(crate::device::constants::EXAMPLE_SERVICE).unwrap();
        let advertised = [Uuid::new_v4(), service];
        assert!(matches_services(&[service], &advertised));
    }

    #[test]
    fn peripheral_without_a_filtered_service_is_ignored() {
        let service = Uuid::parse_str(crate::device::constants::EXAMPLE_SERVICE).unwrap();
        assert!(!matches_services(&[service], &[Uuid::new_v4()]));
        assert!(!matches_services(&[service], &[]));
    }
}
