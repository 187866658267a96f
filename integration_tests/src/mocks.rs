//! Mock implementations of the hardware-facing traits

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use canreg_common::objects::StoreKey;
use canreg_common::traits::{BackingStore, CanDriver, CanSendError, StoreError, TimerDriver};
use canreg_common::CanMessage;

/// An in-memory EEPROM stand-in which records all traffic
#[derive(Debug, Default)]
pub struct MockStore {
    values: Mutex<HashMap<u16, u32>>,
    set_log: Mutex<Vec<(u16, u32)>>,
    gets: AtomicUsize,
    reject_sets: bool,
}

impl MockStore {
    /// A store with the given keys present
    pub fn seeded(values: &[(StoreKey, u32)]) -> Self {
        let store = Self::default();
        {
            let mut map = store.values.lock().unwrap();
            for (key, value) in values {
                map.insert(key.raw(), *value);
            }
        }
        store
    }

    /// A store whose set calls always fail
    pub fn rejecting_sets() -> Self {
        Self {
            reject_sets: true,
            ..Default::default()
        }
    }

    /// The current value behind a key
    pub fn value(&self, key: StoreKey) -> Option<u32> {
        self.values.lock().unwrap().get(&key.raw()).copied()
    }

    /// Every (key, value) pair passed to set, in order
    pub fn set_log(&self) -> Vec<(u16, u32)> {
        self.set_log.lock().unwrap().clone()
    }

    /// Number of get calls served so far
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }
}

impl BackingStore for MockStore {
    fn get(&self, key: StoreKey) -> Option<u32> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.values.lock().unwrap().get(&key.raw()).copied()
    }

    fn set(&self, key: StoreKey, value: u32) -> Result<(), StoreError> {
        self.set_log.lock().unwrap().push((key.raw(), value));
        if self.reject_sets {
            return Err(StoreError);
        }
        self.values.lock().unwrap().insert(key.raw(), value);
        Ok(())
    }
}

/// A CAN driver which records sent frames and serves queued receives
#[derive(Debug, Default)]
pub struct MockCan {
    /// Frames passed to send, in order
    pub sent: Vec<CanMessage>,
    /// Frames served by try_recv, front first
    pub rx_queue: VecDeque<CanMessage>,
}

impl CanDriver for MockCan {
    fn send(&mut self, msg: CanMessage) -> Result<(), CanSendError> {
        self.sent.push(msg);
        Ok(())
    }

    fn try_recv(&mut self) -> Option<CanMessage> {
        self.rx_queue.pop_front()
    }
}

/// A timer driver frozen at a configurable tick count
#[derive(Debug, Default)]
pub struct MockTimer {
    /// The tick count now() reports
    pub ticks: u64,
}

impl TimerDriver for MockTimer {
    fn now(&self) -> u64 {
        self.ticks
    }
}
