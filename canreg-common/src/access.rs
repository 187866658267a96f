//! Access operations and error codes

/// The operation requested on a dictionary object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOp {
    /// Read the object value
    Read,
    /// Write a new object value
    Write,
}

/// Error returned by a failed dictionary access
///
/// All runtime access failures are recoverable: the caller gets one of these
/// and the servicing loop carries on. Table integrity problems are a
/// different animal and surface as a build error at construction time
/// instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// No entry with the requested key exists in the dictionary
    NotFound,
    /// The entry's access rights do not permit the requested operation
    AccessDenied,
    /// The payload length does not match the entry's declared width, or the
    /// size reported by its handler
    SizeMismatch,
    /// A deferred value could not be fetched from the backing store
    ///
    /// The entry's slot holds its default value after this is returned.
    BackingStoreUnavailable,
}

impl AccessError {
    /// The CANopen SDO abort code reported on the wire for this error
    pub fn abort_code(&self) -> u32 {
        match self {
            AccessError::NotFound => 0x0602_0000,
            AccessError::AccessDenied => 0x0601_0000,
            AccessError::SizeMismatch => 0x0607_0010,
            AccessError::BackingStoreUnavailable => 0x060A_0023,
        }
    }
}

impl core::fmt::Display for AccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            AccessError::NotFound => "object not found",
            AccessError::AccessDenied => "access denied",
            AccessError::SizeMismatch => "payload size mismatch",
            AccessError::BackingStoreUnavailable => "backing store unavailable",
        };
        write!(f, "{} (abort code 0x{:08X})", msg, self.abort_code())
    }
}

impl core::error::Error for AccessError {}
