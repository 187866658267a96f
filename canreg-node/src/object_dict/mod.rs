//! Object Dictionary
//!
//! # Table model
//!
//! The dictionary is a flat, key-sorted table of [`ObjectEntry`] rows, one
//! per addressable (index, sub) pair, terminated by an end marker row at
//! key (0xFFFF, 0xFF). A composite object contributes one row per
//! sub-index, with sub 0 holding the count of its genuine sub-indices.
//! Tables are declared as statics and validated once by
//! [`ObjectDict::new`]; after that every lookup is a binary search and the
//! rows never change. All mutation goes through the values the rows point
//! at, never through the table itself.
//!
//! # Value storage
//!
//! Each row carries its own [`Storage`]:
//!
//! - [`Storage::Const`]: a scalar fixed when the table is declared
//! - [`Storage::Inline`]: a mutable scalar embedded in the row
//! - [`Storage::External`]: a non-owning reference to an
//!   [`AtomicCell`](crate::common::AtomicCell) owned by another module.
//!   The cell must outlive the table; in practice both are statics.
//! - [`Storage::Bytes`]: a non-owning reference to a read-only byte
//!   region, for string objects
//! - [`Storage::Deferred`]: a value whose initial content lives in the
//!   external backing store, resolved once and then served from an inline
//!   cache
//!
//! Mutable slots are `AtomicCell`s, so a telemetry task reading while the
//! servicing path writes is serialized per slot with a critical section.
//! No lock covers the table as a whole.
//!
//! # Handlers
//!
//! A row may carry a `&'static dyn` [`TypeHandler`] which takes over both
//! transfer directions. Two built-ins cover the special semantic types:
//! [`StringRegion`] serves fixed string regions and [`EventCounter`]
//! turns writes into increment events. Rows without a handler move their
//! value as little-endian bytes of the declared width.
//!
//! ```rust
//! use canreg_node::object_dict::{ObjectDict, ObjectEntry, Storage};
//! use canreg_node::common::objects::{AccessType, DataType};
//!
//! static TABLE: [ObjectEntry; 3] = [
//!     ObjectEntry::new(0x1000, 0, DataType::UInt32, AccessType::Const, Storage::Const(0x198)),
//!     ObjectEntry::new(0x2000, 0, DataType::UInt16, AccessType::Rw, Storage::inline(0)),
//!     ObjectEntry::end_marker(),
//! ];
//!
//! let dict = ObjectDict::new(&TABLE).unwrap();
//! assert!(dict.find(0x1000, 0).is_some());
//! assert!(dict.find(0x1000, 1).is_none());
//! ```

/// Largest value payload the engine serves in one response
///
/// Bounds the response vector and every string region registered in a
/// table.
pub const MAX_VALUE_SIZE: usize = 32;

mod entry;
mod handlers;
mod table;

// Pull up public sub module definitions. The submodules provide some code
// organization, but shouldn't clutter the public API
pub use entry::*;
pub use handlers::*;
pub use table::*;
