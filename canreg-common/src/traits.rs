//! Traits implemented by the host to connect the engine to its environment

use crate::messages::CanMessage;
use crate::objects::StoreKey;

/// Error type for CAN send operations containing the failed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanSendError(pub CanMessage);

impl core::fmt::Display for CanSendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to send CAN message: {:?}", self.0)
    }
}

impl core::error::Error for CanSendError {}

/// A synchronous CAN bus driver
///
/// The engine never touches the bus itself; the driver is carried in the
/// startup bundle for the protocol layer running on top.
pub trait CanDriver {
    /// Send a message to the bus
    fn send(&mut self, msg: CanMessage) -> Result<(), CanSendError>;
    /// Read a received message, returning None immediately if no message is
    /// available
    fn try_recv(&mut self) -> Option<CanMessage>;
}

/// A free-running timer used for protocol timing
///
/// Tick rate is declared separately in the startup bundle.
pub trait TimerDriver {
    /// The current counter value, in ticks
    fn now(&self) -> u64;
}

/// The external key-value store which deferred dictionary entries resolve
/// against
///
/// Implementations must be bounded in time; this is called from inside the
/// protocol servicing path.
pub trait BackingStore {
    /// Fetch the value stored under `key`, or None if the key is absent or
    /// the store cannot be reached
    fn get(&self, key: StoreKey) -> Option<u32>;
    /// Store a value under `key`
    fn set(&self, key: StoreKey, value: u32) -> Result<(), StoreError>;
}

/// Error returned when a backing store write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreError;

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Backing store write failed")
    }
}

impl core::error::Error for StoreError {}
