//! Constants for standard objects and well-known values
//!

/// Object indices for standard objects
pub mod object_ids {
    /// The device type object index
    pub const DEVICE_TYPE: u16 = 0x1000;
    /// The SYNC COB-ID object index
    pub const COB_ID_SYNC: u16 = 0x1005;
    /// The device name object index
    pub const DEVICE_NAME: u16 = 0x1008;
    /// The hardware version object index
    pub const HARDWARE_VERSION: u16 = 0x1009;
    /// The software version object index
    pub const SOFTWARE_VERSION: u16 = 0x100A;
    /// The heartbeat producer time object index
    pub const HEARTBEAT_PRODUCER_TIME: u16 = 0x1017;
    /// The identity object index
    pub const IDENTITY: u16 = 0x1018;
    /// The first SDO server parameter object index
    pub const SDO_SERVER_PARAMS: u16 = 0x1200;
}

/// COB-ID bases for the predefined connection set
pub mod cob_ids {
    /// Default SYNC message COB-ID
    pub const SYNC: u32 = 0x80;
    /// Base ID for SDO requests (server node ID is added)
    pub const SDO_REQUEST_BASE: u32 = 0x600;
    /// Base ID for SDO responses (server node ID is added)
    pub const SDO_RESPONSE_BASE: u32 = 0x580;
}

/// Well-known backing store keys
///
/// The store itself is opaque to the engine; these are the identifiers the
/// standard and command objects resolve against.
pub mod store_keys {
    use crate::objects::StoreKey;

    /// Producer heartbeat time in milliseconds
    pub const PRODUCER_HEARTBEAT_TIME: StoreKey = StoreKey::new(0x0010);
    /// Command counter polled by the storage task to trigger an EEPROM read
    pub const EEPROM_CMD_READ: StoreKey = StoreKey::new(0x0040);
    /// Command counter polled by the storage task to trigger an EEPROM write
    pub const EEPROM_CMD_WRITE: StoreKey = StoreKey::new(0x0041);
    /// Command counter which clears latched error flags when bumped
    pub const RESET_ERRORS: StoreKey = StoreKey::new(0x0050);
}
