//! The fixture device
//!
//! Reproduces the dictionary of a small vehicle control unit: the standard
//! identification and communication objects, plus an application range
//! with deferred parameters, command counters, and an externally owned
//! build string. Together the rows cover every storage mode and both
//! built-in handlers.
//!
//! Rows carry interior state (inline and deferred slots), so tests build
//! their own copy with [`entries`] instead of sharing a static table.

use canreg_common::constants::{cob_ids, object_ids, store_keys};
use canreg_common::meta::{DisplayType, MetaRecord};
use canreg_common::objects::{AccessType, DataType, ObjectKey, PdoMapping, StoreKey};
use canreg_common::AtomicCell;
use canreg_node::object_dict::{InitPolicy, ObjectEntry, Storage, COUNTER, STRING};

/// Device profile word served at 0x1000
pub const DEVICE_TYPE: u32 = 0x198;
/// Identity constants served by 0x1018
pub const VENDOR_ID: u32 = 0x0000_0345;
/// Product code sub of 0x1018
pub const PRODUCT_CODE: u32 = 0x0001_0198;
/// Revision sub of 0x1018
pub const REVISION: u32 = 0x0001_0000;

/// Store key of the proportional gain at 0x2101sub1
pub const P_GAIN_KEY: StoreKey = StoreKey::new(0x0020);
/// Store key of the integral gain at 0x2101sub2
pub const I_GAIN_KEY: StoreKey = StoreKey::new(0x0021);

/// Serial number slot 0x1018sub4 reads through; board init writes it once
pub static SERIAL: AtomicCell<u32> = AtomicCell::new(0);

/// Firmware build hash served at 0x2100
pub static COMMIT_HASH: &[u8] = b"4f2a9c1d";

/// Number of entries resolved by the startup pass (policy
/// [`InitPolicy::AtStartup`]): heartbeat time, EEPROM read counter, reset
/// counter
pub const AT_STARTUP_SLOTS: usize = 3;

/// Build the device dictionary rows, end marker included
pub fn entries() -> [ObjectEntry; 24] {
    [
        ObjectEntry::new(
            object_ids::DEVICE_TYPE,
            0,
            DataType::UInt32,
            AccessType::Const,
            Storage::Const(DEVICE_TYPE),
        ),
        ObjectEntry::new(
            object_ids::COB_ID_SYNC,
            0,
            DataType::UInt32,
            AccessType::Const,
            Storage::Const(cob_ids::SYNC),
        ),
        ObjectEntry::new(
            object_ids::DEVICE_NAME,
            0,
            DataType::VisibleString,
            AccessType::Const,
            Storage::Bytes(b"canreg vmu"),
        )
        .with_handler(&STRING),
        ObjectEntry::new(
            object_ids::HARDWARE_VERSION,
            0,
            DataType::VisibleString,
            AccessType::Const,
            Storage::Bytes(b"rev C"),
        )
        .with_handler(&STRING),
        ObjectEntry::new(
            object_ids::SOFTWARE_VERSION,
            0,
            DataType::VisibleString,
            AccessType::Const,
            Storage::Bytes(b"0.1.0"),
        )
        .with_handler(&STRING),
        ObjectEntry::new(
            object_ids::HEARTBEAT_PRODUCER_TIME,
            0,
            DataType::UInt16,
            AccessType::Rw,
            Storage::deferred(store_keys::PRODUCER_HEARTBEAT_TIME, InitPolicy::AtStartup),
        ),
        ObjectEntry::new(
            object_ids::IDENTITY,
            0,
            DataType::UInt8,
            AccessType::Const,
            Storage::Const(4),
        ),
        ObjectEntry::new(
            object_ids::IDENTITY,
            1,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(VENDOR_ID),
        ),
        ObjectEntry::new(
            object_ids::IDENTITY,
            2,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(PRODUCT_CODE),
        ),
        ObjectEntry::new(
            object_ids::IDENTITY,
            3,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(REVISION),
        ),
        ObjectEntry::new(
            object_ids::IDENTITY,
            4,
            DataType::UInt32,
            AccessType::Ro,
            Storage::External(&SERIAL),
        ),
        ObjectEntry::new(
            object_ids::SDO_SERVER_PARAMS,
            0,
            DataType::UInt8,
            AccessType::Const,
            Storage::Const(2),
        ),
        ObjectEntry::new(
            object_ids::SDO_SERVER_PARAMS,
            1,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(cob_ids::SDO_REQUEST_BASE),
        )
        .with_node_id(),
        ObjectEntry::new(
            object_ids::SDO_SERVER_PARAMS,
            2,
            DataType::UInt32,
            AccessType::Ro,
            Storage::Const(cob_ids::SDO_RESPONSE_BASE),
        )
        .with_node_id(),
        ObjectEntry::new(
            0x2100,
            0,
            DataType::VisibleString,
            AccessType::Const,
            Storage::Bytes(COMMIT_HASH),
        )
        .with_handler(&STRING),
        ObjectEntry::new(
            0x2101,
            0,
            DataType::UInt8,
            AccessType::Const,
            Storage::Const(2),
        ),
        ObjectEntry::new(
            0x2101,
            1,
            DataType::UInt32,
            AccessType::Rw,
            Storage::deferred(P_GAIN_KEY, InitPolicy::Lazy),
        )
        .mappable(PdoMapping::Both),
        ObjectEntry::new(
            0x2101,
            2,
            DataType::UInt32,
            AccessType::Rw,
            Storage::deferred(I_GAIN_KEY, InitPolicy::Lazy),
        )
        .mappable(PdoMapping::Both),
        ObjectEntry::new(
            0x2102,
            0,
            DataType::UInt8,
            AccessType::Const,
            Storage::Const(2),
        ),
        ObjectEntry::new(
            0x2102,
            1,
            DataType::UInt32,
            AccessType::Wo,
            Storage::deferred(store_keys::EEPROM_CMD_READ, InitPolicy::AtStartup),
        )
        .with_handler(&COUNTER),
        ObjectEntry::new(
            0x2102,
            2,
            DataType::UInt32,
            AccessType::Wo,
            Storage::deferred(store_keys::EEPROM_CMD_WRITE, InitPolicy::Lazy),
        )
        .with_handler(&COUNTER),
        ObjectEntry::new(
            0x2103,
            0,
            DataType::UInt32,
            AccessType::Rw,
            Storage::deferred(store_keys::RESET_ERRORS, InitPolicy::AtStartup),
        )
        .with_handler(&COUNTER),
        ObjectEntry::new(
            0x2104,
            0,
            DataType::UInt8,
            AccessType::Rw,
            Storage::inline(0),
        )
        .mappable(PdoMapping::Rpdo),
        ObjectEntry::end_marker(),
    ]
}

/// Build the metadata records matching [`entries`], end marker included
pub fn meta_records() -> [MetaRecord; 12] {
    [
        MetaRecord::new(
            ObjectKey::new(object_ids::DEVICE_TYPE, 0),
            "Device",
            "Info",
            "DEVICE_TYPE",
            "",
            DisplayType::Uint32,
        ),
        MetaRecord::new(
            ObjectKey::new(object_ids::DEVICE_NAME, 0),
            "Device",
            "Info",
            "DEVICE_NAME",
            "",
            DisplayType::Str,
        ),
        MetaRecord::new(
            ObjectKey::new(object_ids::HEARTBEAT_PRODUCER_TIME, 0),
            "Comm",
            "Heartbeat",
            "HEARTBEAT_TIME",
            "ms",
            DisplayType::Uint32,
        )
        .monitorable(true)
        .configurable(true),
        MetaRecord::new(
            ObjectKey::new(object_ids::IDENTITY, 4),
            "Device",
            "Info",
            "SERIAL_NUMBER",
            "",
            DisplayType::Uint32,
        )
        .monitorable(true),
        MetaRecord::new(
            ObjectKey::new(0x2100, 0),
            "Device",
            "Build",
            "COMMIT_HASH",
            "",
            DisplayType::Str,
        ),
        MetaRecord::new(
            ObjectKey::new(0x2101, 1),
            "Control",
            "Gains",
            "P_GAIN",
            "",
            DisplayType::Float32,
        )
        .monitorable(true)
        .configurable(true),
        MetaRecord::new(
            ObjectKey::new(0x2101, 2),
            "Control",
            "Gains",
            "I_GAIN",
            "",
            DisplayType::Float32,
        )
        .monitorable(true)
        .configurable(true),
        MetaRecord::new(
            ObjectKey::new(0x2102, 1),
            "Eeprom",
            "Cmd",
            "EEPROM_CMD_READ",
            "",
            DisplayType::Func,
        ),
        MetaRecord::new(
            ObjectKey::new(0x2102, 2),
            "Eeprom",
            "Cmd",
            "EEPROM_CMD_WRITE",
            "",
            DisplayType::Func,
        ),
        MetaRecord::new(
            ObjectKey::new(0x2103, 0),
            "Device",
            "Errors",
            "RESET_ERRORS",
            "",
            DisplayType::Uint32,
        )
        .monitorable(true)
        .configurable(true),
        MetaRecord::new(
            ObjectKey::new(0x2104, 0),
            "Control",
            "Mode",
            "OPERATING_MODE",
            "",
            DisplayType::Enum,
        )
        .monitorable(true)
        .configurable(true),
        MetaRecord::end_marker(),
    ]
}
