//! Entry descriptors and value storage
//!
//! Each addressable object in the dictionary is described by one
//! [`ObjectEntry`]: its key, data type, access rights, where its value
//! lives, and optionally a special handler which takes over value
//! transfers. Entries are plain const-constructible records so whole
//! tables can live in statics.

use canreg_common::{
    objects::{AccessType, DataType, ObjectKey, PdoMapping, StoreKey},
    traits::BackingStore,
    AccessError, AtomicCell,
};

use super::handlers::TypeHandler;

/// When a deferred slot is pulled from the backing store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitPolicy {
    /// Resolve during the startup pass
    AtStartup,
    /// Resolve on first access
    Lazy,
}

/// Resolution state of a deferred slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotState {
    /// Not resolved yet; the cache holds the default value
    #[default]
    Unresolved,
    /// The cache holds a value from the store, or from a later write
    Resolved,
    /// The store lookup failed; the cache holds the default value
    Defaulted,
}

/// A value slot whose initial value lives in the external backing store
///
/// The slot is resolved at most once: at the startup pass, or on first
/// access, depending on its policy. After that all accesses hit the inline
/// cache. A failed lookup parks the slot in `Defaulted` with a zero value
/// and is not retried, keeping access time bounded.
#[derive(Debug)]
pub struct DeferredSlot {
    key: StoreKey,
    policy: InitPolicy,
    // State and cached value change together
    cell: AtomicCell<(SlotState, u32)>,
}

impl DeferredSlot {
    /// Create a new unresolved slot
    pub const fn new(key: StoreKey, policy: InitPolicy) -> Self {
        Self {
            key,
            policy,
            cell: AtomicCell::new((SlotState::Unresolved, 0)),
        }
    }

    /// The backing store key this slot resolves against
    pub fn store_key(&self) -> StoreKey {
        self.key
    }

    /// The configured resolution policy
    pub fn policy(&self) -> InitPolicy {
        self.policy
    }

    /// The current resolution state
    pub fn state(&self) -> SlotState {
        self.cell.load().0
    }

    /// The cached value, default zero before resolution
    pub fn load(&self) -> u32 {
        self.cell.load().1
    }

    /// Get the slot value, querying the store on first touch
    pub fn resolve(&self, store: &dyn BackingStore) -> Result<u32, AccessError> {
        let (state, cached) = self.cell.load();
        if state != SlotState::Unresolved {
            return Ok(cached);
        }
        match store.get(self.key) {
            Some(value) => {
                self.cell.store((SlotState::Resolved, value));
                Ok(value)
            }
            None => {
                self.cell.store((SlotState::Defaulted, 0));
                Err(AccessError::BackingStoreUnavailable)
            }
        }
    }

    /// Store a value, resolving the slot by assignment
    pub fn assign(&self, value: u32) {
        self.cell.store((SlotState::Resolved, value));
    }

    /// Add one to the cached value, resolving the slot, and return the new
    /// count
    pub fn increment(&self) -> u32 {
        let (_, prev) = self
            .cell
            .fetch_update(|(_, v)| Some((SlotState::Resolved, v.wrapping_add(1))))
            .unwrap_or_default();
        prev.wrapping_add(1)
    }
}

/// Where an entry's value lives
#[derive(Debug)]
pub enum Storage {
    /// A value fixed when the table is built
    Const(u32),
    /// A mutable value embedded in the table
    Inline(AtomicCell<u32>),
    /// A non-owning reference to a cell owned by another module
    ///
    /// The referenced cell must outlive the table; in practice both are
    /// statics.
    External(&'static AtomicCell<u32>),
    /// A non-owning reference to a read-only byte region, for string entries
    Bytes(&'static [u8]),
    /// A cached value resolved from the external backing store
    Deferred(DeferredSlot),
}

impl Storage {
    /// Shorthand for a mutable inline slot
    pub const fn inline(initial: u32) -> Self {
        Storage::Inline(AtomicCell::new(initial))
    }

    /// Shorthand for a deferred slot
    pub const fn deferred(key: StoreKey, policy: InitPolicy) -> Self {
        Storage::Deferred(DeferredSlot::new(key, policy))
    }
}

/// Context a value transfer runs in
///
/// Bundles the references the storage and handler layers need but entries
/// do not carry themselves.
#[derive(Clone, Copy)]
pub struct AccessCtx<'a> {
    /// The backing store deferred slots resolve against
    pub store: &'a dyn BackingStore,
    /// Raw node ID added to the value of node-ID augmented entries, zero
    /// when the node is unconfigured
    pub node_id: u8,
}

impl core::fmt::Debug for AccessCtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessCtx")
            .field("node_id", &self.node_id)
            .finish_non_exhaustive()
    }
}

/// One row of the dictionary table
#[allow(missing_debug_implementations)]
pub struct ObjectEntry {
    /// The entry's address
    pub key: ObjectKey,
    /// Declared data type, fixing the wire size of scalar values
    pub data_type: DataType,
    /// Access rights, enforced on every request
    pub access: AccessType,
    /// PDO mappability, carried for the PDO layer
    pub pdo_mapping: PdoMapping,
    /// Add the node ID to the value on reads
    ///
    /// Used by COB-ID objects whose value depends on the assigned ID.
    pub add_node_id: bool,
    /// Where the value lives
    pub storage: Storage,
    /// Optional special handler which takes over transfers
    pub handler: Option<&'static dyn TypeHandler>,
}

impl ObjectEntry {
    /// Create an entry with no handler and default flags
    pub const fn new(
        index: u16,
        sub: u8,
        data_type: DataType,
        access: AccessType,
        storage: Storage,
    ) -> Self {
        Self {
            key: ObjectKey::new(index, sub),
            data_type,
            access,
            pdo_mapping: PdoMapping::None,
            add_node_id: false,
            storage,
            handler: None,
        }
    }

    /// Attach a special handler
    pub const fn with_handler(mut self, handler: &'static dyn TypeHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Set the PDO mappability
    pub const fn mappable(mut self, mapping: PdoMapping) -> Self {
        self.pdo_mapping = mapping;
        self
    }

    /// Add the node ID to the value on reads
    pub const fn with_node_id(mut self) -> Self {
        self.add_node_id = true;
        self
    }

    /// The row terminating a raw dictionary table
    pub const fn end_marker() -> Self {
        Self::new(
            ObjectKey::END.index,
            ObjectKey::END.sub,
            DataType::UInt32,
            AccessType::Const,
            Storage::Const(0),
        )
    }

    /// Returns true if this is the table termination row
    pub fn is_end(&self) -> bool {
        self.key.is_end()
    }

    /// The wire size of this entry's value in bytes
    pub fn value_size(&self) -> usize {
        if let Some(handler) = self.handler {
            return handler.size(self);
        }
        match &self.storage {
            Storage::Bytes(region) => region.len(),
            _ => match self.data_type.byte_len() {
                Some(n) => n,
                None => 0,
            },
        }
    }

    /// Resolution state of the entry's slot, for deferred entries
    pub fn deferred_state(&self) -> Option<SlotState> {
        match &self.storage {
            Storage::Deferred(slot) => Some(slot.state()),
            _ => None,
        }
    }

    /// Read the current raw scalar value, resolving deferred storage
    ///
    /// Fails with `SizeMismatch` for string entries, which have no scalar
    /// value.
    pub fn load_scalar(&self, store: &dyn BackingStore) -> Result<u32, AccessError> {
        match &self.storage {
            Storage::Const(v) => Ok(*v),
            Storage::Inline(cell) => Ok(cell.load()),
            Storage::External(cell) => Ok(cell.load()),
            Storage::Deferred(slot) => slot.resolve(store),
            Storage::Bytes(_) => Err(AccessError::SizeMismatch),
        }
    }

    /// Transfer the entry value into `buf`, returning the byte count
    ///
    /// Access rights and buffer size have already been checked by the
    /// mediator. Dispatches to the handler when one is attached.
    pub(crate) fn read_value(
        &self,
        ctx: &AccessCtx,
        buf: &mut [u8],
    ) -> Result<usize, AccessError> {
        if let Some(handler) = self.handler {
            return handler.read(self, ctx, buf);
        }
        let Some(width) = self.data_type.byte_len() else {
            // String entries carry a handler; checked at build
            return Err(AccessError::SizeMismatch);
        };
        if buf.len() < width {
            return Err(AccessError::SizeMismatch);
        }
        let mut value = self.load_scalar(ctx.store)?;
        if self.add_node_id {
            value = value.wrapping_add(ctx.node_id as u32);
        }
        buf[..width].copy_from_slice(&value.to_le_bytes()[..width]);
        Ok(width)
    }

    /// Transfer `data` into the entry's slot
    ///
    /// Access rights and payload size have already been checked by the
    /// mediator. Dispatches to the handler when one is attached. Writes to
    /// a not-yet-resolved deferred slot resolve it by assignment without
    /// querying the store.
    pub(crate) fn write_value(&self, ctx: &AccessCtx, data: &[u8]) -> Result<(), AccessError> {
        if let Some(handler) = self.handler {
            return handler.write(self, ctx, data);
        }
        let mut le = [0u8; 4];
        if data.len() > le.len() {
            return Err(AccessError::SizeMismatch);
        }
        le[..data.len()].copy_from_slice(data);
        let value = u32::from_le_bytes(le);
        match &self.storage {
            Storage::Inline(cell) => {
                cell.store(value);
                Ok(())
            }
            Storage::External(cell) => {
                cell.store(value);
                Ok(())
            }
            Storage::Deferred(slot) => {
                slot.assign(value);
                Ok(())
            }
            // Writable access on these is rejected at build or by the
            // mediator
            Storage::Const(_) | Storage::Bytes(_) => Err(AccessError::AccessDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_ctx as ctx, TestStore};

    #[test]
    fn test_const_read() {
        let entry = ObjectEntry::new(
            0x1000,
            0,
            DataType::UInt32,
            AccessType::Const,
            Storage::Const(0x198),
        );
        let store = TestStore::default();
        let mut buf = [0u8; 4];
        assert_eq!(Ok(4), entry.read_value(&ctx(&store), &mut buf));
        assert_eq!(0x198u32.to_le_bytes(), buf);
    }

    #[test]
    fn test_inline_write_read() {
        let entry = ObjectEntry::new(
            0x2000,
            0,
            DataType::UInt16,
            AccessType::Rw,
            Storage::inline(0),
        );
        let store = TestStore::default();
        let mut buf = [0u8; 2];
        entry.write_value(&ctx(&store), &0xABCDu16.to_le_bytes()).unwrap();
        assert_eq!(Ok(2), entry.read_value(&ctx(&store), &mut buf));
        assert_eq!(0xABCDu16.to_le_bytes(), buf);
    }

    #[test]
    fn test_external_cell() {
        static CELL: AtomicCell<u32> = AtomicCell::new(17);
        let entry = ObjectEntry::new(
            0x2001,
            0,
            DataType::UInt32,
            AccessType::Rw,
            Storage::External(&CELL),
        );
        let store = TestStore::default();
        let mut buf = [0u8; 4];
        entry.read_value(&ctx(&store), &mut buf).unwrap();
        assert_eq!(17u32.to_le_bytes(), buf);

        entry.write_value(&ctx(&store), &99u32.to_le_bytes()).unwrap();
        assert_eq!(99, CELL.load());
    }

    #[test]
    fn test_deferred_resolves_once() {
        let key = StoreKey::new(7);
        let entry = ObjectEntry::new(
            0x2100,
            1,
            DataType::UInt32,
            AccessType::Rw,
            Storage::deferred(key, InitPolicy::Lazy),
        );
        let store = TestStore::with(key, 1234);

        assert_eq!(Some(SlotState::Unresolved), entry.deferred_state());
        let mut buf = [0u8; 4];
        entry.read_value(&ctx(&store), &mut buf).unwrap();
        assert_eq!(1234u32.to_le_bytes(), buf);
        assert_eq!(Some(SlotState::Resolved), entry.deferred_state());

        // Later store changes are not seen; the cache is authoritative
        store.set(key, 5678).unwrap();
        entry.read_value(&ctx(&store), &mut buf).unwrap();
        assert_eq!(1234u32.to_le_bytes(), buf);
    }

    #[test]
    fn test_deferred_fallback_to_default() {
        let entry = ObjectEntry::new(
            0x2100,
            2,
            DataType::UInt32,
            AccessType::Rw,
            Storage::deferred(StoreKey::new(8), InitPolicy::Lazy),
        );
        let store = TestStore::default();

        let mut buf = [0xFFu8; 4];
        assert_eq!(
            Err(AccessError::BackingStoreUnavailable),
            entry.read_value(&ctx(&store), &mut buf)
        );
        assert_eq!(Some(SlotState::Defaulted), entry.deferred_state());

        // The failure is not retried; the default value is served
        entry.read_value(&ctx(&store), &mut buf).unwrap();
        assert_eq!([0, 0, 0, 0], buf);
    }

    #[test]
    fn test_deferred_write_resolves_by_assignment() {
        let key = StoreKey::new(9);
        let entry = ObjectEntry::new(
            0x2100,
            3,
            DataType::UInt16,
            AccessType::Rw,
            Storage::deferred(key, InitPolicy::Lazy),
        );
        let store = TestStore::with(key, 42);

        entry.write_value(&ctx(&store), &7u16.to_le_bytes()).unwrap();
        assert_eq!(Some(SlotState::Resolved), entry.deferred_state());

        // The store value was never consulted and is not updated
        let mut buf = [0u8; 2];
        entry.read_value(&ctx(&store), &mut buf).unwrap();
        assert_eq!(7u16.to_le_bytes(), buf);
        assert_eq!(Some(42), store.get(key));
    }

    #[test]
    fn test_node_id_augmented_read() {
        let entry = ObjectEntry::new(
            0x1200,
            1,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(0x600),
        )
        .with_node_id();
        let store = TestStore::default();

        let mut buf = [0u8; 4];
        let ctx = AccessCtx {
            store: &store,
            node_id: 0x21,
        };
        entry.read_value(&ctx, &mut buf).unwrap();
        assert_eq!(0x621u32.to_le_bytes(), buf);
    }
}
