//! Common functionality shared among other canreg crates.
//!
//! Most users will have no reason to depend on this crate directly, as it is
//! re-exported by `canreg-node`.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs, missing_copy_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod atomic_cell;
pub use atomic_cell::AtomicCell;
pub mod access;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod catalog;
pub mod constants;
pub mod messages;
pub mod meta;
pub mod node_id;
pub mod objects;
pub mod traits;

pub use node_id::NodeId;

pub use access::{AccessError, AccessOp};
pub use messages::{CanId, CanMessage};
