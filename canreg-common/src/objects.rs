//! Object dictionary vocabulary types
//!

use int_enum::IntEnum;

/// The address of one object in the dictionary
///
/// Keys are ordered by index, then by sub index, which is also the required
/// storage order for dictionary tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Object index
    pub index: u16,
    /// Sub index
    pub sub: u8,
}

impl ObjectKey {
    /// The reserved key marking the end of a raw dictionary table
    pub const END: ObjectKey = ObjectKey {
        index: 0xFFFF,
        sub: 0xFF,
    };

    /// Create a new key
    pub const fn new(index: u16, sub: u8) -> Self {
        Self { index, sub }
    }

    /// Returns true if this is the table termination key
    pub fn is_end(&self) -> bool {
        self.index == Self::END.index && self.sub == Self::END.sub
    }
}

/// The type of data stored in an object
///
/// Discriminants are the standard CANopen data type codes.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntEnum)]
pub enum DataType {
    /// 8-bit signed integer
    Int8 = 2,
    /// 16-bit signed integer
    Int16 = 3,
    /// 32-bit signed integer
    Int32 = 4,
    /// 8-bit unsigned integer
    UInt8 = 5,
    /// 16-bit unsigned integer
    UInt16 = 6,
    /// 32-bit unsigned integer
    UInt32 = 7,
    /// A string of bytes whose length is fixed by its storage region
    VisibleString = 9,
}

impl DataType {
    /// The wire size of a value of this type, or None for string types whose
    /// size comes from their storage
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            DataType::Int8 | DataType::UInt8 => Some(1),
            DataType::Int16 | DataType::UInt16 => Some(2),
            DataType::Int32 | DataType::UInt32 => Some(4),
            DataType::VisibleString => None,
        }
    }

    /// Returns true if this is a string type
    pub fn is_str(&self) -> bool {
        matches!(self, DataType::VisibleString)
    }
}

/// Access type enum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessType {
    /// Read-only
    #[default]
    Ro,
    /// Write-only
    Wo,
    /// Read-write
    Rw,
    /// Read-only, and never changed internally by the device either
    Const,
}

impl AccessType {
    /// Returns true if an object with this access type can be read
    pub fn is_readable(&self) -> bool {
        matches!(self, AccessType::Ro | AccessType::Rw | AccessType::Const)
    }

    /// Returns true if an object with this access type can be written
    pub fn is_writable(&self) -> bool {
        matches!(self, AccessType::Rw | AccessType::Wo)
    }
}

/// Possible PDO mapping values for an object
///
/// Carried as descriptor metadata for the PDO layer; the dictionary itself
/// never consults it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PdoMapping {
    /// Object cannot be mapped to PDOs
    #[default]
    None,
    /// Object can be mapped to RPDOs only
    Rpdo,
    /// Object can be mapped to TPDOs only
    Tpdo,
    /// Object can be mapped to both RPDOs and TPDOs
    Both,
}

/// An identifier naming a value in the external backing store
///
/// Deferred dictionary entries carry one of these instead of an inline
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreKey(pub u16);

impl StoreKey {
    /// Create a new store key
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// The raw key value
    pub fn raw(&self) -> u16 {
        self.0
    }
}
