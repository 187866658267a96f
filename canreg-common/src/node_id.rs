//! Node ID type

/// The node ID of a device on the bus
///
/// Configured IDs must be between 1 and 127. The special raw value 255
/// represents a device which has not yet been assigned an ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeId {
    /// No ID has been assigned yet
    Unconfigured,
    /// A valid assigned ID
    Configured(ConfiguredId),
}

/// A validated node ID in the range 1..=127
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfiguredId(u8);

impl ConfiguredId {
    /// Create a ConfiguredId, validating the range
    pub fn new(value: u8) -> Result<Self, InvalidNodeIdError> {
        if value > 0 && value < 128 {
            Ok(ConfiguredId(value))
        } else {
            Err(InvalidNodeIdError)
        }
    }

    /// Get the ID as a u8
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl From<ConfiguredId> for u8 {
    fn from(value: ConfiguredId) -> Self {
        value.raw()
    }
}

impl NodeId {
    /// Create a NodeId from a raw byte
    ///
    /// 255 maps to `Unconfigured`; anything else must be a valid configured
    /// ID.
    pub fn new(value: u8) -> Result<Self, InvalidNodeIdError> {
        if value == 255 {
            Ok(NodeId::Unconfigured)
        } else {
            ConfiguredId::new(value).map(NodeId::Configured)
        }
    }

    /// Get the raw byte representation
    pub fn raw(&self) -> u8 {
        match self {
            NodeId::Unconfigured => 255,
            NodeId::Configured(id) => id.0,
        }
    }
}

/// Error returned for a node ID outside 1..=127 (or 255)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidNodeIdError;

impl core::fmt::Display for InvalidNodeIdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Invalid node ID")
    }
}
impl core::error::Error for InvalidNodeIdError {}

impl TryFrom<u8> for NodeId {
    type Error = InvalidNodeIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for u8 {
    fn from(value: NodeId) -> Self {
        value.raw()
    }
}
