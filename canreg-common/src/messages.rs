//! CAN frame types spoken by the driver traits

/// A standard or extended CAN ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanId {
    /// 29-bit extended ID
    Extended(u32),
    /// 11-bit standard ID
    Std(u16),
}

impl CanId {
    /// Create an extended ID
    pub const fn extended(id: u32) -> CanId {
        CanId::Extended(id)
    }

    /// Create a standard ID
    pub const fn std(id: u16) -> CanId {
        CanId::Std(id)
    }

    /// Get the ID value, regardless of type
    pub fn raw(&self) -> u32 {
        match self {
            CanId::Extended(id) => *id,
            CanId::Std(id) => *id as u32,
        }
    }

    /// Returns true for extended IDs
    pub fn is_extended(&self) -> bool {
        matches!(self, CanId::Extended(_))
    }
}

const MAX_DATA_LENGTH: usize = 8;

/// A classic CAN frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanMessage {
    /// Frame payload; only the first `dlc` bytes are valid
    pub data: [u8; MAX_DATA_LENGTH],
    /// Number of valid payload bytes
    pub dlc: u8,
    /// Frame ID
    pub id: CanId,
}

impl Default for CanMessage {
    fn default() -> Self {
        Self {
            data: [0; MAX_DATA_LENGTH],
            dlc: 0,
            id: CanId::Std(0),
        }
    }
}

impl CanMessage {
    /// Create a message from an ID and payload
    ///
    /// Panics if `data` is longer than 8 bytes.
    pub fn new(id: CanId, data: &[u8]) -> Self {
        let dlc = data.len() as u8;
        if dlc > MAX_DATA_LENGTH as u8 {
            panic!(
                "Data length exceeds maximum size of {} bytes",
                MAX_DATA_LENGTH
            );
        }
        let mut buf = [0u8; MAX_DATA_LENGTH];
        buf[0..dlc as usize].copy_from_slice(data);

        Self { id, dlc, data: buf }
    }

    /// The frame ID
    pub fn id(&self) -> CanId {
        self.id
    }

    /// The valid payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data[0..self.dlc as usize]
    }
}
