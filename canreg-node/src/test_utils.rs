//! Shared helpers for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use canreg_common::objects::StoreKey;
use canreg_common::traits::{BackingStore, CanDriver, CanSendError, StoreError, TimerDriver};
use canreg_common::CanMessage;

use crate::object_dict::AccessCtx;

/// An in-memory backing store which records every set call
#[derive(Debug, Default)]
pub struct TestStore {
    values: Mutex<HashMap<u16, u32>>,
    set_log: Mutex<Vec<(u16, u32)>>,
    fail_sets: bool,
}

impl TestStore {
    /// A store seeded with one value
    pub fn with(key: StoreKey, value: u32) -> Self {
        let store = Self::default();
        store.values.lock().unwrap().insert(key.raw(), value);
        store
    }

    /// A store whose set calls always fail
    pub fn failing_sets() -> Self {
        Self {
            fail_sets: true,
            ..Default::default()
        }
    }

    /// Every (key, value) pair passed to set, in order
    pub fn set_log(&self) -> Vec<(u16, u32)> {
        self.set_log.lock().unwrap().clone()
    }
}

impl BackingStore for TestStore {
    fn get(&self, key: StoreKey) -> Option<u32> {
        self.values.lock().unwrap().get(&key.raw()).copied()
    }

    fn set(&self, key: StoreKey, value: u32) -> Result<(), StoreError> {
        self.set_log.lock().unwrap().push((key.raw(), value));
        if self.fail_sets {
            return Err(StoreError);
        }
        self.values.lock().unwrap().insert(key.raw(), value);
        Ok(())
    }
}

/// An access context over `store` with no node ID assigned
pub fn test_ctx(store: &dyn BackingStore) -> AccessCtx<'_> {
    AccessCtx { store, node_id: 0 }
}

/// A CAN driver which records every sent message
#[derive(Debug, Default)]
pub struct TestCan {
    /// Messages passed to send, in order
    pub sent: Vec<CanMessage>,
}

impl CanDriver for TestCan {
    fn send(&mut self, msg: CanMessage) -> Result<(), CanSendError> {
        self.sent.push(msg);
        Ok(())
    }

    fn try_recv(&mut self) -> Option<CanMessage> {
        None
    }
}

/// A timer driver frozen at a fixed tick count
#[derive(Debug, Default)]
pub struct TestTimer {
    /// The tick count now() reports
    pub ticks: u64,
}

impl TimerDriver for TestTimer {
    fn now(&self) -> u64 {
        self.ticks
    }
}
