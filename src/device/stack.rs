use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::device::types::{Advertisement, StackState};
use crate::error::LocatorError;

/// Notifications delivered by a central-scanning stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    PeripheralDiscovered(Advertisement),
    StateChanged(StackState),
}

/// The capability boundary between a `DeviceLocator` and the platform bluetooth stack.
#[async_trait]
pub trait CentralStack: Send + Sync {
    /// Begin scanning for peripherals advertising any of `services`. Results are delivered through
    /// the stream returned by `events`.
    async fn start_scan(&self, services: &[Uuid]) -> Result<(), LocatorError>;

    async fn stop_scan(&self) -> Result<(), LocatorError>;

    async fn events(&self) -> Result<BoxStream<'static, StackEvent>, LocatorError>;
}
