use std::mem;
use std::sync::{Arc, Mutex};
use futures::StreamExt;
use futures::channel::mpsc::Sender;
use futures::stream::BoxStream;
use log::{debug, info, warn};
use tokio::spawn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::types::LocatorSettings;
use crate::device::stack::{CentralStack, StackEvent};
use crate::device::types::{Advertisement, Availability, Device, DeviceEvent, StackState};
use crate::error::LocatorError;

/// Receives found/lost notifications. A locator holds at most one handler at a time.
pub type EventHandler = Arc<dyn Fn(DeviceEvent) + Send + Sync>;

/// Creates a handler that forwards every event into a futures channel.
/// Events are dropped (with a warning) if the channel is full or closed.
pub fn channel_handler(sender: Sender<DeviceEvent>) -> EventHandler {
    // a single sender, clones would each get a guaranteed slot and make the channel unbounded
    let sender = Mutex::new(sender);

    Arc::new(move |event| {
        let mut sender = sender.lock().expect("Failed to lock event sender");
        if let Err(err) = sender.try_send(event) {
            warn!("Failed to forward DeviceEvent: {}", err);
        }
    })
}

/// Translates the callbacks of a `CentralStack` into found/lost events for a discovery host.
///
/// The known-devices list only changes through `on_peripheral_discovered` and
/// `on_state_changed`. Every device in it has been announced as found and not yet as lost.
pub struct DeviceLocator<S: CentralStack> {
    stack: S,
    settings: LocatorSettings,
    event_handler: Mutex<Option<EventHandler>>,
    known_devices: Mutex<Vec<Device>>,
}

impl<S: CentralStack> DeviceLocator<S> {
    pub fn new(stack: S, settings: LocatorSettings) -> Self {
        DeviceLocator {
            stack,
            settings,
            event_handler: Mutex::new(None),
            known_devices: Mutex::new(Vec::new()),
        }
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    pub fn settings(&self) -> &LocatorSettings {
        &self.settings
    }

    pub fn set_event_handler(&self, handler: EventHandler) {
        *self.event_handler.lock().expect("Failed to lock event handler") = Some(handler);
    }

    pub fn clear_event_handler(&self) {
        *self.event_handler.lock().expect("Failed to lock event handler") = None;
    }

    // the handler is cloned out of its slot so that it is never called with a lock held
    fn event_handler(&self) -> Option<EventHandler> {
        self.event_handler.lock().expect("Failed to lock event handler").clone()
    }

    pub fn known_devices(&self) -> Vec<Device> {
        self.known_devices.lock().expect("Failed to lock known devices").clone()
    }

    pub async fn start_scanning(&self) -> Result<(), LocatorError> {
        info!("Scanning for service {}...", self.settings.service_id);
        self.stack.start_scan(&[self.settings.service_id]).await
    }

    pub async fn stop_scanning(&self) -> Result<(), LocatorError> {
        info!("Stopping scan");
        self.stack.stop_scan().await
    }

    fn make_device(&self, advertisement: Advertisement) -> Device {
        let display_name = advertisement.local_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.settings.placeholder_name.clone());

        Device {
            // a fresh identifier per discovery, repeated advertisements are not deduplicated
            identifier: Uuid::new_v4().to_string(),
            display_name,
            category: self.settings.category,
            protocol_type: self.settings.protocol_type.clone(),
            bluetooth_identifier: advertisement.peripheral_id,
        }
    }

    pub fn on_peripheral_discovered(&self, advertisement: Advertisement) {
        // If no event handler is set, don't report or remember anything.
        let Some(event_handler) = self.event_handler() else {
            debug!("Ignoring discovered peripheral {:?}: no event handler", advertisement.peripheral_id);
            return;
        };

        let rssi = advertisement.rssi;
        let device = self.make_device(advertisement);
        debug!(
            "Device found: {} {:?} ({}, rssi {})",
            device.identifier,
            device.display_name,
            device.category,
            rssi.map(|rssi| rssi.to_string()).unwrap_or("NONE".to_string()),
        );

        self.known_devices.lock().expect("Failed to lock known devices").push(device.clone());
        event_handler(DeviceEvent::found(device));
    }

    pub fn on_state_changed(&self, state: StackState) {
        match state.availability() {
            Availability::Unavailable => {
                let lost = mem::take(&mut *self.known_devices.lock().expect("Failed to lock known devices"));
                info!("Bluetooth is unavailable ({:?}); {} known device(s) lost", state, lost.len());

                if let Some(event_handler) = self.event_handler() {
                    for device in lost {
                        debug!("Device lost: {} {:?}", device.identifier, device.display_name);
                        event_handler(DeviceEvent::lost(device));
                    }
                }
            },
            Availability::Available => {
                info!("Bluetooth is available");
                self.known_devices.lock().expect("Failed to lock known devices").clear();
            },
        }
    }
}

/// Delivers stack events to `locator` on a dedicated task, until `events` ends or `cancel` is cancelled.
pub fn pump_events<S>(
    cancel: CancellationToken,
    locator: Arc<DeviceLocator<S>>,
    mut events: BoxStream<'static, StackEvent>,
) -> JoinHandle<()>
where
    S: CentralStack + 'static,
{
    spawn(async move {
        'mainloop: loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break 'mainloop;
                },
                event = events.next() => match event {
                    None => {
                        debug!("Stack event stream ended");
                        break 'mainloop;
                    },
                    Some(StackEvent::PeripheralDiscovered(advertisement)) => {
                        locator.on_peripheral_discovered(advertisement);
                    },
                    Some(StackEvent::StateChanged(state)) => {
                        locator.on_state_changed(state);
                    },
                },
            }
        }
    })
}
