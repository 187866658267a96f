//! Dictionary table construction and lookup
//!
//! A raw table is a static slice of [`ObjectEntry`] rows, sorted by key and
//! terminated by an end marker row at key (0xFFFF, 0xFF). [`ObjectDict`]
//! validates that shape once at build and then serves lookups by binary
//! search. A table failing validation is corrupt and the node must refuse
//! to start with it.

use core::cmp::Ordering;

use canreg_common::{
    meta::{DisplayType, MetaTable},
    objects::{DataType, ObjectKey},
};
use defmt_or_log::warn;
use snafu::Snafu;

use super::entry::{ObjectEntry, Storage};
use super::MAX_VALUE_SIZE;

/// Table integrity violation found while building a dictionary
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum BuildError {
    /// The raw table has no end marker row
    #[snafu(display("Table has no end marker"))]
    MissingEndMarker,
    /// An end marker row somewhere other than the final position
    #[snafu(display("End marker at row {pos} is not the final row"))]
    MisplacedEndMarker {
        /// Position of the offending row
        pos: usize,
    },
    /// Two rows share one key
    #[snafu(display("Duplicate key 0x{index:04X}sub{sub}"))]
    DuplicateKey {
        /// Object index
        index: u16,
        /// Object sub-index
        sub: u8,
    },
    /// A row breaks the ascending key order
    #[snafu(display("Key 0x{index:04X}sub{sub} breaks the sort order"))]
    OutOfOrder {
        /// Object index
        index: u16,
        /// Object sub-index
        sub: u8,
    },
    /// An object has sub-entries but no sub0 count row
    #[snafu(display("Object 0x{index:04X} has sub-entries but no sub0 count"))]
    MissingSubCount {
        /// Object index
        index: u16,
    },
    /// A sub0 count row whose value cannot be checked at build time
    #[snafu(display("Sub count of object 0x{index:04X} must be an inline u8"))]
    UnverifiableSubCount {
        /// Object index
        index: u16,
    },
    /// The sub0 count does not match the rows present
    #[snafu(display("Object 0x{index:04X} declares {declared} subs but the table holds {actual}"))]
    SubCountMismatch {
        /// Object index
        index: u16,
        /// Count held by the sub0 row
        declared: u32,
        /// Sub-entries > 0 actually present
        actual: usize,
    },
    /// A string row without byte storage, a handler, and read-only access,
    /// or byte storage on a non-string row
    #[snafu(display("Invalid string entry 0x{index:04X}sub{sub}"))]
    InvalidStringEntry {
        /// Object index
        index: u16,
        /// Object sub-index
        sub: u8,
    },
    /// A string region larger than the bounded response payload
    #[snafu(display("String entry 0x{index:04X}sub{sub} is {len} bytes, over the response limit"))]
    StringTooLong {
        /// Object index
        index: u16,
        /// Object sub-index
        sub: u8,
        /// Region length in bytes
        len: usize,
    },
}

/// A validated view over a raw dictionary table
///
/// Keys are immutable once the table is built; only values behind mutable
/// storage change afterwards.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct ObjectDict<'a> {
    rows: &'a [ObjectEntry],
}

impl<'a> ObjectDict<'a> {
    /// Validate a raw entry slice and create a dictionary over it
    ///
    /// Checks, in order: end marker present exactly once and last; keys
    /// strictly ascending; every multi-sub object declares its sub count
    /// at sub0; every string region fits the response payload.
    pub fn new(raw: &'a [ObjectEntry]) -> Result<Self, BuildError> {
        let Some(pos) = raw.iter().position(ObjectEntry::is_end) else {
            return MissingEndMarkerSnafu.fail();
        };
        if pos != raw.len() - 1 {
            return MisplacedEndMarkerSnafu { pos }.fail();
        }
        let rows = &raw[..pos];
        for pair in rows.windows(2) {
            let (prev, next) = (&pair[0].key, &pair[1].key);
            match next.cmp(prev) {
                Ordering::Equal => {
                    return DuplicateKeySnafu {
                        index: next.index,
                        sub: next.sub,
                    }
                    .fail()
                }
                Ordering::Less => {
                    return OutOfOrderSnafu {
                        index: next.index,
                        sub: next.sub,
                    }
                    .fail()
                }
                Ordering::Greater => {}
            }
        }
        Self::check_sub_counts(rows)?;
        Self::check_string_entries(rows)?;
        Ok(Self { rows })
    }

    // Requires rows sorted and unique
    fn check_sub_counts(rows: &[ObjectEntry]) -> Result<(), BuildError> {
        let mut i = 0;
        while i < rows.len() {
            let index = rows[i].key.index;
            let mut sub0 = None;
            let mut genuine_subs = 0usize;
            while i < rows.len() && rows[i].key.index == index {
                if rows[i].key.sub == 0 {
                    sub0 = Some(&rows[i]);
                } else {
                    genuine_subs += 1;
                }
                i += 1;
            }
            if genuine_subs == 0 {
                continue;
            }
            let Some(sub0) = sub0 else {
                return MissingSubCountSnafu { index }.fail();
            };
            if sub0.data_type != DataType::UInt8 {
                return UnverifiableSubCountSnafu { index }.fail();
            }
            let declared = match &sub0.storage {
                Storage::Const(v) => *v,
                Storage::Inline(cell) => cell.load(),
                _ => return UnverifiableSubCountSnafu { index }.fail(),
            };
            if declared as usize != genuine_subs {
                return SubCountMismatchSnafu {
                    index,
                    declared,
                    actual: genuine_subs,
                }
                .fail();
            }
        }
        Ok(())
    }

    fn check_string_entries(rows: &[ObjectEntry]) -> Result<(), BuildError> {
        for entry in rows {
            let (index, sub) = (entry.key.index, entry.key.sub);
            let is_str = entry.data_type.is_str();
            let is_bytes = matches!(entry.storage, Storage::Bytes(_));
            if is_str != is_bytes {
                return InvalidStringEntrySnafu { index, sub }.fail();
            }
            if let Storage::Bytes(region) = &entry.storage {
                if entry.handler.is_none() || entry.access.is_writable() {
                    return InvalidStringEntrySnafu { index, sub }.fail();
                }
                if region.len() > MAX_VALUE_SIZE {
                    return StringTooLongSnafu {
                        index,
                        sub,
                        len: region.len(),
                    }
                    .fail();
                }
            }
        }
        Ok(())
    }

    /// Look up the entry at (index, sub)
    pub fn find(&self, index: u16, sub: u8) -> Option<&'a ObjectEntry> {
        let key = ObjectKey::new(index, sub);
        self.rows
            .binary_search_by(|entry| entry.key.cmp(&key))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// All entries, end marker excluded
    pub fn entries(&self) -> &'a [ObjectEntry] {
        self.rows
    }
}

/// Check a metadata table against the dictionary it describes
///
/// A consistent deployment keeps the two aligned: configurable records map
/// to writable entries, monitorable records to readable entries, and
/// function triggers to entries which cannot be read. Each divergence is
/// logged and counted, never fatal.
pub fn lint_metadata(dict: &ObjectDict, meta: &MetaTable) -> usize {
    let mut findings = 0;
    for record in meta.records() {
        let (index, sub) = (record.key.index, record.key.sub);
        let entry = dict.find(index, sub);
        let readable = entry.is_some_and(|e| e.access.is_readable());
        let writable = entry.is_some_and(|e| e.access.is_writable());
        if record.configurable && !writable {
            warn!("Configurable object 0x{:x}sub{} is not writable", index, sub);
            findings += 1;
        }
        if record.monitorable && !readable {
            warn!("Monitorable object 0x{:x}sub{} is not readable", index, sub);
            findings += 1;
        }
        if record.display == DisplayType::Func && readable {
            warn!("Function trigger 0x{:x}sub{} is readable", index, sub);
            findings += 1;
        }
    }
    findings
}
