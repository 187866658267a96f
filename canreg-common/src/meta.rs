//! Human-readable object metadata
//!
//! Alongside the dictionary proper, a device carries a second table mapping
//! the same (index, sub) keys to descriptive records for monitoring and
//! configuration tools: display group, name, unit, how to render the value,
//! and whether the tool may poll or change it. The table carries no values
//! and serving it has no side effects.
//!
//! Like the dictionary table, the raw record slice is sorted by key and
//! terminated by an end marker row (named `END_OF_OD` in exported data).

use crate::objects::ObjectKey;

use snafu::Snafu;

/// How a tool should render an object's value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayType {
    /// IEEE-754 single precision float
    Float32,
    /// Unsigned integer
    Uint32,
    /// Integer mapped to a named set of states
    Enum,
    /// Byte string
    Str,
    /// A command trigger with no persisted value; must never be read
    Func,
}

/// One row of the metadata table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaRecord {
    /// The dictionary key this record describes
    pub key: ObjectKey,
    /// Top-level display group
    pub group: &'static str,
    /// Second-level display group
    pub subgroup: &'static str,
    /// Human readable value name
    pub name: &'static str,
    /// Unit suffix, empty when unitless
    pub unit: &'static str,
    /// Rendering type
    pub display: DisplayType,
    /// Tools may poll this value periodically
    pub monitorable: bool,
    /// Tools may present this value for editing
    pub configurable: bool,
}

impl MetaRecord {
    /// Create a record with both tool flags cleared
    pub const fn new(
        key: ObjectKey,
        group: &'static str,
        subgroup: &'static str,
        name: &'static str,
        unit: &'static str,
        display: DisplayType,
    ) -> Self {
        Self {
            key,
            group,
            subgroup,
            name,
            unit,
            display,
            monitorable: false,
            configurable: false,
        }
    }

    /// Set the monitorable flag
    pub const fn monitorable(mut self, value: bool) -> Self {
        self.monitorable = value;
        self
    }

    /// Set the configurable flag
    pub const fn configurable(mut self, value: bool) -> Self {
        self.configurable = value;
        self
    }

    /// The row terminating a raw metadata table
    pub const fn end_marker() -> Self {
        Self {
            key: ObjectKey::END,
            group: "NULL",
            subgroup: "NULL",
            name: "END_OF_OD",
            unit: "",
            display: DisplayType::Func,
            monitorable: false,
            configurable: false,
        }
    }

    /// Returns true if this is the table termination row
    pub fn is_end(&self) -> bool {
        self.key.is_end()
    }
}

/// Error returned when metadata table validation fails
///
/// Fatal: a device must not come up with a malformed metadata table.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum MetaBuildError {
    /// The end marker row is missing
    #[snafu(display("Metadata table has no end marker row"))]
    MissingEndMarker,
    /// An end marker row was found before the final position
    #[snafu(display("Metadata table end marker at row {pos} is not final"))]
    MisplacedEndMarker {
        /// Position of the offending row
        pos: usize,
    },
    /// Two rows share a key
    #[snafu(display("Duplicate metadata row for 0x{index:04X}sub{sub}"))]
    DuplicateRecord {
        /// Index of the duplicated key
        index: u16,
        /// Sub index of the duplicated key
        sub: u8,
    },
    /// A row is out of key order
    #[snafu(display("Metadata row 0x{index:04X}sub{sub} is out of order"))]
    OutOfOrder {
        /// Index of the misplaced key
        index: u16,
        /// Sub index of the misplaced key
        sub: u8,
    },
}

/// A validated view over a raw metadata record slice
#[derive(Debug, Clone, Copy)]
pub struct MetaTable<'a> {
    records: &'a [MetaRecord],
}

impl<'a> MetaTable<'a> {
    /// Validate a raw record slice and create a table over it
    ///
    /// The slice must be sorted by key, contain no duplicate keys, and end
    /// with exactly one [`MetaRecord::end_marker`] row.
    pub fn new(raw: &'a [MetaRecord]) -> Result<Self, MetaBuildError> {
        let Some(pos) = raw.iter().position(|r| r.is_end()) else {
            return MissingEndMarkerSnafu.fail();
        };
        if pos != raw.len() - 1 {
            return MisplacedEndMarkerSnafu { pos }.fail();
        }
        let records = &raw[..pos];
        for pair in records.windows(2) {
            let (prev, next) = (&pair[0].key, &pair[1].key);
            match next.cmp(prev) {
                core::cmp::Ordering::Equal => {
                    return DuplicateRecordSnafu {
                        index: next.index,
                        sub: next.sub,
                    }
                    .fail()
                }
                core::cmp::Ordering::Less => {
                    return OutOfOrderSnafu {
                        index: next.index,
                        sub: next.sub,
                    }
                    .fail()
                }
                core::cmp::Ordering::Greater => {}
            }
        }
        Ok(Self { records })
    }

    /// Look up the record describing (index, sub)
    pub fn describe(&self, index: u16, sub: u8) -> Option<&'a MetaRecord> {
        let key = ObjectKey::new(index, sub);
        self.records
            .binary_search_by(|r| r.key.cmp(&key))
            .ok()
            .map(|i| &self.records[i])
    }

    /// All records, end marker excluded
    pub fn records(&self) -> &'a [MetaRecord] {
        self.records
    }
}
