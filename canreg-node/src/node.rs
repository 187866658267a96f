//! Node assembly and the protocol-facing access path
//!
//! A [`Node`] ties one dictionary, its metadata table, a backing store,
//! and the hardware drivers together behind the single request entry
//! point the protocol layer calls. The node itself speaks no protocol: it
//! mediates access attempts against the tables and leaves framing,
//! scheduling, and bus state to the layer above.

use canreg_common::{
    meta::{MetaRecord, MetaTable},
    traits::{BackingStore, CanDriver, TimerDriver},
    AccessError, AccessOp, NodeId,
};
use defmt_or_log::{debug, warn};
use heapless::Vec;

use crate::object_dict::{
    lint_metadata, AccessCtx, InitPolicy, ObjectDict, SlotState, Storage, MAX_VALUE_SIZE,
};

/// Bounded response payload returned by [`Node::handle_request`]
pub type ValueBuf = Vec<u8, MAX_VALUE_SIZE>;

/// Convert a bit rate in kbit/s to bit/s
pub const fn kbit(rate: u32) -> u32 {
    rate * 1000
}

/// Immutable startup configuration for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// The node's bus identity
    pub node_id: NodeId,
    /// Bus bit rate in bit/s
    pub bit_rate_bps: u32,
    /// Tick frequency of the timer driver in Hz
    pub timer_freq_hz: u32,
}

impl NodeConfig {
    /// A config with the common defaults: unconfigured ID, 500 kbit/s
    /// bus, 1 MHz timer
    pub const fn new() -> Self {
        Self {
            node_id: NodeId::Unconfigured,
            bit_rate_bps: kbit(500),
            timer_freq_hz: 1_000_000,
        }
    }

    /// Set the node ID
    pub const fn with_node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = node_id;
        self
    }

    /// Set the bus bit rate in bit/s
    pub const fn with_bit_rate(mut self, bps: u32) -> Self {
        self.bit_rate_bps = bps;
        self
    }

    /// Set the timer tick frequency in Hz
    pub const fn with_timer_freq(mut self, hz: u32) -> Self {
        self.timer_freq_hz = hz;
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The hardware drivers a node runs against
///
/// Supplied once at startup. The engine never touches the bus itself; the
/// bundle exists so one startup contract carries everything the outer
/// protocol layer needs.
#[allow(missing_debug_implementations)]
pub struct DriverBundle<'a> {
    /// The CAN bus driver
    pub can: &'a mut dyn CanDriver,
    /// The monotonic timer driver
    pub timer: &'a dyn TimerDriver,
}

/// Outcome of the startup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupReport {
    /// Deferred slots which fell back to their default value
    pub deferred_fallbacks: usize,
    /// Metadata lint findings
    pub lint_findings: usize,
}

/// One device node: dictionary, metadata, backing store, and drivers
///
/// Both tables are immutable once the node is assembled; only values
/// behind mutable storage change at runtime, and only through
/// [`Node::handle_request`].
#[allow(missing_debug_implementations)]
pub struct Node<'a> {
    config: NodeConfig,
    dict: ObjectDict<'a>,
    meta: MetaTable<'a>,
    store: &'a dyn BackingStore,
    drivers: DriverBundle<'a>,
}

impl<'a> Node<'a> {
    /// Assemble a node from its startup bundle
    ///
    /// Both tables have already passed their build validation; a node
    /// never runs on an unvalidated table.
    pub fn new(
        config: NodeConfig,
        dict: ObjectDict<'a>,
        meta: MetaTable<'a>,
        store: &'a dyn BackingStore,
        drivers: DriverBundle<'a>,
    ) -> Self {
        Self {
            config,
            dict,
            meta,
            store,
            drivers,
        }
    }

    /// Run the one-time startup pass
    ///
    /// Resolves every deferred entry whose policy is
    /// [`InitPolicy::AtStartup`], then checks the metadata table against
    /// the dictionary. Fallbacks and lint findings are logged and
    /// counted, never fatal: the node serves defaults rather than refuse
    /// to run.
    pub fn start(&mut self) -> StartupReport {
        let mut deferred_fallbacks = 0;
        for entry in self.dict.entries() {
            let Storage::Deferred(slot) = &entry.storage else {
                continue;
            };
            if slot.policy() != InitPolicy::AtStartup || slot.state() != SlotState::Unresolved {
                continue;
            }
            match slot.resolve(self.store) {
                Ok(_) => debug!(
                    "Resolved 0x{:x}sub{} from the store",
                    entry.key.index, entry.key.sub
                ),
                Err(_) => {
                    warn!(
                        "No stored value for 0x{:x}sub{}, defaulting",
                        entry.key.index, entry.key.sub
                    );
                    deferred_fallbacks += 1;
                }
            }
        }
        let lint_findings = lint_metadata(&self.dict, &self.meta);
        StartupReport {
            deferred_fallbacks,
            lint_findings,
        }
    }

    /// Serve one protocol request against the dictionary
    ///
    /// The single entry point for external protocol traffic. Each call
    /// runs to completion before the next begins: the entry is looked
    /// up, the operation checked against its access rights, sizes
    /// checked, and the value moved through its storage or handler. A
    /// write payload must match the entry's value size exactly. Failures
    /// map to wire abort codes via [`AccessError::abort_code`].
    pub fn handle_request(
        &self,
        index: u16,
        sub: u8,
        op: AccessOp,
        payload: &[u8],
    ) -> Result<ValueBuf, AccessError> {
        let entry = self.dict.find(index, sub).ok_or(AccessError::NotFound)?;
        let permitted = match op {
            AccessOp::Read => entry.access.is_readable(),
            AccessOp::Write => entry.access.is_writable(),
        };
        if !permitted {
            return Err(AccessError::AccessDenied);
        }
        let ctx = self.access_ctx();
        let mut response = ValueBuf::new();
        match op {
            AccessOp::Read => {
                // Build validation bounds every value to the payload size
                response
                    .resize_default(entry.value_size())
                    .map_err(|()| AccessError::SizeMismatch)?;
                let n = entry.read_value(&ctx, &mut response)?;
                response.truncate(n);
            }
            AccessOp::Write => {
                if payload.len() != entry.value_size() {
                    return Err(AccessError::SizeMismatch);
                }
                entry.write_value(&ctx, payload)?;
            }
        }
        Ok(response)
    }

    /// Look up the metadata record describing (index, sub)
    pub fn describe(&self, index: u16, sub: u8) -> Option<&'a MetaRecord> {
        self.meta.describe(index, sub)
    }

    /// Read a u32 object through the request path
    pub fn read_u32(&self, index: u16, sub: u8) -> Result<u32, AccessError> {
        let buf = self.handle_request(index, sub, AccessOp::Read, &[])?;
        let bytes = buf
            .as_slice()
            .try_into()
            .map_err(|_| AccessError::SizeMismatch)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a u16 object through the request path
    pub fn read_u16(&self, index: u16, sub: u8) -> Result<u16, AccessError> {
        let buf = self.handle_request(index, sub, AccessOp::Read, &[])?;
        let bytes = buf
            .as_slice()
            .try_into()
            .map_err(|_| AccessError::SizeMismatch)?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Read a u8 object through the request path
    pub fn read_u8(&self, index: u16, sub: u8) -> Result<u8, AccessError> {
        let buf = self.handle_request(index, sub, AccessOp::Read, &[])?;
        match buf.as_slice() {
            [b] => Ok(*b),
            _ => Err(AccessError::SizeMismatch),
        }
    }

    /// The node's startup configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The node's bus identity
    pub fn node_id(&self) -> NodeId {
        self.config.node_id
    }

    /// The hardware drivers, for the protocol layer pumping the bus
    pub fn drivers(&mut self) -> &mut DriverBundle<'a> {
        &mut self.drivers
    }

    fn access_ctx(&self) -> AccessCtx<'_> {
        let node_id = match self.config.node_id {
            NodeId::Configured(id) => id.raw(),
            NodeId::Unconfigured => 0,
        };
        AccessCtx {
            store: self.store,
            node_id,
        }
    }
}
