//! An object dictionary engine for CANopen-class device nodes
//!
//! canreg-node implements the data backbone of a small CAN device: a
//! statically allocated, typed, access-controlled object registry which a
//! protocol layer queries by (index, sub) key. It is primarily intended to
//! run on microcontrollers, so it is no_std compatible, performs no heap
//! allocation, and does a bounded amount of work per access. It provides:
//!
//! * A flat *object dictionary* table of entry descriptors, declared as a
//!   static and validated once at startup (sorted unique keys, end marker,
//!   sub counts, string bounds).
//! * *Storage modes* covering the ways a device holds values: build-time
//!   constants, mutable inline slots, references to memory owned by other
//!   modules, fixed string regions, and values deferred to an external
//!   backing store and cached after one lookup.
//! * *Handlers* for the special semantic types: string regions and
//!   write-triggered event counters.
//! * An *access mediator* enforcing read/write rights and exact value
//!   sizes on every request, with each failure mapped to a CANopen SDO
//!   abort code.
//! * A *startup pass* restoring deferred values from the store, falling
//!   back to defaults when the store has nothing, and a *metadata table*
//!   describing objects to monitoring and configuration tools.
//!
//! The SDO/PDO state machines, NMT, and frame scheduling live above this
//! crate; they reach the dictionary only through
//! [`Node::handle_request`].
//!
//! # Getting started
//!
//! Declare the dictionary as a static table, implement the driver and
//! store traits for the board, and assemble a [`Node`]:
//!
//! ```rust
//! use canreg_node::common::meta::{MetaRecord, MetaTable};
//! use canreg_node::common::objects::{AccessType, DataType, StoreKey};
//! use canreg_node::common::traits::{
//!     BackingStore, CanDriver, CanSendError, StoreError, TimerDriver,
//! };
//! use canreg_node::common::{AccessOp, CanMessage, NodeId};
//! use canreg_node::object_dict::{InitPolicy, ObjectDict, ObjectEntry, Storage};
//! use canreg_node::{DriverBundle, Node, NodeConfig};
//!
//! // One row per (index, sub) pair, sorted by key, end marker last
//! static TABLE: [ObjectEntry; 4] = [
//!     ObjectEntry::new(0x1000, 0, DataType::UInt32, AccessType::Const, Storage::Const(0x198)),
//!     ObjectEntry::new(
//!         0x1017,
//!         0,
//!         DataType::UInt16,
//!         AccessType::Rw,
//!         Storage::deferred(StoreKey::new(0x0010), InitPolicy::AtStartup),
//!     ),
//!     ObjectEntry::new(0x2000, 0, DataType::UInt32, AccessType::Rw, Storage::inline(0)),
//!     ObjectEntry::end_marker(),
//! ];
//! static META: [MetaRecord; 1] = [MetaRecord::end_marker()];
//!
//! // Board support: bus access, a time base, and a parameter store
//! struct Can;
//! impl CanDriver for Can {
//!     fn send(&mut self, _msg: CanMessage) -> Result<(), CanSendError> {
//!         Ok(())
//!     }
//!     fn try_recv(&mut self) -> Option<CanMessage> {
//!         None
//!     }
//! }
//! struct Timer;
//! impl TimerDriver for Timer {
//!     fn now(&self) -> u64 {
//!         0
//!     }
//! }
//! struct Eeprom;
//! impl BackingStore for Eeprom {
//!     fn get(&self, _key: StoreKey) -> Option<u32> {
//!         None
//!     }
//!     fn set(&self, _key: StoreKey, _value: u32) -> Result<(), StoreError> {
//!         Err(StoreError)
//!     }
//! }
//!
//! let dict = ObjectDict::new(&TABLE).expect("invalid dictionary table");
//! let meta = MetaTable::new(&META).expect("invalid metadata table");
//!
//! let mut can = Can;
//! let timer = Timer;
//! let store = Eeprom;
//! let mut node = Node::new(
//!     NodeConfig::new().with_node_id(NodeId::Unconfigured),
//!     dict,
//!     meta,
//!     &store,
//!     DriverBundle {
//!         can: &mut can,
//!         timer: &timer,
//!     },
//! );
//!
//! // Nothing stored yet, so the deferred heartbeat time falls back to 0
//! let report = node.start();
//! assert_eq!(1, report.deferred_fallbacks);
//!
//! // Serve protocol requests
//! let resp = node.handle_request(0x1000, 0, AccessOp::Read, &[]).unwrap();
//! assert_eq!(0x198, u32::from_le_bytes(resp.as_slice().try_into().unwrap()));
//! ```
//!
//! # Logging
//!
//! Deferred-resolution fallbacks and metadata lint findings are reported
//! through `defmt-or-log`: enable the `log` feature (default) on hosts or
//! the `defmt` feature on targets with an RTT sink.
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod node;
pub mod object_dict;
#[cfg(test)]
mod test_utils;

pub use canreg_common as common;

pub use node::{kbit, DriverBundle, Node, NodeConfig, StartupReport, ValueBuf};
