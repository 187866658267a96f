//! Special value handlers
//!
//! Most entries transfer raw little-endian bytes between the request
//! payload and their slot. A few need different semantics: strings served
//! from fixed byte regions, and command counters whose writes are events
//! rather than values. Such entries carry a handler reference which takes
//! over both directions of the transfer.

use canreg_common::AccessError;

use super::entry::{AccessCtx, ObjectEntry, Storage};

/// Takes over value transfers for an entry
///
/// Handlers are attached per entry and live in statics, so one instance
/// serves every table referencing it.
pub trait TypeHandler: Sync {
    /// The wire size of the entry's value in bytes
    fn size(&self, entry: &ObjectEntry) -> usize;

    /// Transfer the entry value into `buf`, returning the byte count
    fn read(
        &self,
        entry: &ObjectEntry,
        ctx: &AccessCtx,
        buf: &mut [u8],
    ) -> Result<usize, AccessError>;

    /// Apply a write to the entry
    fn write(&self, entry: &ObjectEntry, ctx: &AccessCtx, data: &[u8]) -> Result<(), AccessError>;
}

/// Serves string entries from their fixed byte region
///
/// The value size is the exact region length; no terminator byte crosses
/// the wire. Strings are read only, writes are always denied.
#[derive(Debug)]
pub struct StringRegion;

/// The shared string handler instance
pub static STRING: StringRegion = StringRegion;

impl TypeHandler for StringRegion {
    fn size(&self, entry: &ObjectEntry) -> usize {
        match &entry.storage {
            Storage::Bytes(region) => region.len(),
            // Build validation requires byte storage for string entries
            _ => 0,
        }
    }

    fn read(
        &self,
        entry: &ObjectEntry,
        _ctx: &AccessCtx,
        buf: &mut [u8],
    ) -> Result<usize, AccessError> {
        let Storage::Bytes(region) = &entry.storage else {
            return Err(AccessError::SizeMismatch);
        };
        if buf.len() < region.len() {
            return Err(AccessError::SizeMismatch);
        }
        buf[..region.len()].copy_from_slice(region);
        Ok(region.len())
    }

    fn write(
        &self,
        _entry: &ObjectEntry,
        _ctx: &AccessCtx,
        _data: &[u8],
    ) -> Result<(), AccessError> {
        Err(AccessError::AccessDenied)
    }
}

/// A write-triggered event counter
///
/// Writes ignore the payload value and add one to the stored count. For
/// deferred storage the new count is also pushed through to the backing
/// store, so a task watching the store key sees each trigger. Reads return
/// the current count like any scalar.
#[derive(Debug)]
pub struct EventCounter;

/// The shared counter handler instance
pub static COUNTER: EventCounter = EventCounter;

impl TypeHandler for EventCounter {
    fn size(&self, entry: &ObjectEntry) -> usize {
        match entry.data_type.byte_len() {
            Some(n) => n,
            None => 0,
        }
    }

    fn read(
        &self,
        entry: &ObjectEntry,
        ctx: &AccessCtx,
        buf: &mut [u8],
    ) -> Result<usize, AccessError> {
        let width = self.size(entry);
        if width == 0 || buf.len() < width {
            return Err(AccessError::SizeMismatch);
        }
        let count = entry.load_scalar(ctx.store)?;
        buf[..width].copy_from_slice(&count.to_le_bytes()[..width]);
        Ok(width)
    }

    fn write(&self, entry: &ObjectEntry, ctx: &AccessCtx, _data: &[u8]) -> Result<(), AccessError> {
        match &entry.storage {
            Storage::Inline(cell) => {
                cell.fetch_update(|v| Some(v.wrapping_add(1))).ok();
                Ok(())
            }
            Storage::External(cell) => {
                cell.fetch_update(|v| Some(v.wrapping_add(1))).ok();
                Ok(())
            }
            Storage::Deferred(slot) => {
                let count = slot.increment();
                ctx.store
                    .set(slot.store_key(), count)
                    .map_err(|_| AccessError::BackingStoreUnavailable)
            }
            Storage::Const(_) | Storage::Bytes(_) => Err(AccessError::AccessDenied),
        }
    }
}
