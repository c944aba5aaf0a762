//! Column metadata, group keys, time bounds, and tags.
//!
//! These types describe the shape of a materialized table. The column
//! layout is fixed by the storage layer: the two reserved bounds columns
//! come first, then the time column, then the value column, then one
//! column per tag key. Column metadata is index-stable for the lifetime
//! of a table; every lookup in this crate is positional.

use std::fmt;

/// Nanoseconds since the Unix epoch.
///
/// Timestamps stay plain `i64` end to end: the cursor decodes them as
/// int64 nanoseconds and the time and bounds columns store them in
/// `Int64Array` buffers without calendar conversion.
pub type Timestamp = i64;

/// Index of the reserved window-start bounds column.
pub const START_COL_IDX: usize = 0;
/// Index of the reserved window-stop bounds column.
pub const STOP_COL_IDX: usize = 1;
/// Index of the row-timestamp column.
pub const TIME_COL_IDX: usize = 2;
/// Index of the measured-value column. Tag columns occupy every index
/// after this one.
pub const VALUE_COL_IDX: usize = 3;

/// Declared value type of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Boolean values.
    Bool,
    /// 64-bit signed integer values.
    Int,
    /// 64-bit unsigned integer values.
    UInt,
    /// 64-bit floating point values.
    Float,
    /// Variable-length text or binary values. Tag columns are always
    /// of this type.
    String,
    /// Timestamps, stored as 64-bit signed integer nanoseconds.
    Time,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::UInt => "uint",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Time => "time",
        };
        f.write_str(s)
    }
}

/// Metadata for one table column: a unique label and a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Column label. Labels are unique within one table; tag columns are
    /// labeled with their tag key.
    pub label: String,
    /// Declared value type of the column.
    pub column_type: ColumnType,
}

impl ColumnMeta {
    /// Builds column metadata from a label and type.
    pub fn new(label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            label: label.into(),
            column_type,
        }
    }
}

/// One partition-key value.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    /// Boolean key value.
    Bool(bool),
    /// Signed integer key value.
    Int(i64),
    /// Unsigned integer key value.
    UInt(u64),
    /// Floating point key value.
    Float(f64),
    /// Text or binary key value.
    String(Vec<u8>),
    /// Timestamp key value, int64 nanoseconds.
    Time(Timestamp),
}

/// Ordered partition key identifying the group a table belongs to.
///
/// Immutable once the table is constructed. The execution engine uses it
/// to join and partition tables; this crate never mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupKey {
    cols: Vec<ColumnMeta>,
    values: Vec<KeyValue>,
}

impl GroupKey {
    /// Builds a group key from ordered `(column, value)` pairs.
    pub fn new(pairs: Vec<(ColumnMeta, KeyValue)>) -> Self {
        let (cols, values) = pairs.into_iter().unzip();
        Self { cols, values }
    }

    /// The empty key (a table that belongs to no partition).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of key columns.
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// True iff the key has no columns.
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Metadata of the `i`-th key column.
    pub fn col(&self, i: usize) -> &ColumnMeta {
        &self.cols[i]
    }

    /// Value of the `i`-th key column.
    pub fn value(&self, i: usize) -> &KeyValue {
        &self.values[i]
    }

    /// Iterates the key's `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnMeta, &KeyValue)> {
        self.cols.iter().zip(self.values.iter())
    }
}

/// Half-open time window `[start, stop)` applied uniformly to every row
/// of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Inclusive window start, nanoseconds.
    pub start: Timestamp,
    /// Exclusive window stop, nanoseconds.
    pub stop: Timestamp,
}

impl Bounds {
    /// Builds a half-open window from its boundary timestamps.
    pub fn new(start: Timestamp, stop: Timestamp) -> Self {
        Self { start, stop }
    }
}

/// One series tag: a key naming a tag column and the series' value for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag key; corresponds to exactly one column label.
    pub key: String,
    /// Tag value bytes.
    pub value: Vec<u8>,
}

impl Tag {
    /// Builds a tag from a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Finds the index of the column labeled `label`, if any.
///
/// Labels are unique, so the first match is the only match; a single
/// linear pass suffices for the handful of columns a table carries.
pub fn column_index(cols: &[ColumnMeta], label: &str) -> Option<usize> {
    cols.iter().position(|c| c.label == label)
}

/// Asserts that `col` is declared with type `want`.
///
/// # Panics
///
/// Panics on mismatch. Requesting a column through an accessor of the
/// wrong type is a caller programming error, not a data fault, and fails
/// loudly instead of reinterpreting buffer memory.
pub fn check_col_type(col: &ColumnMeta, want: ColumnType) {
    assert!(
        col.column_type == want,
        "column {} is declared {}, not {}",
        col.label,
        col.column_type,
        want
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_finds_unique_label() {
        let cols = vec![
            ColumnMeta::new("_start", ColumnType::Time),
            ColumnMeta::new("_stop", ColumnType::Time),
            ColumnMeta::new("host", ColumnType::String),
        ];

        assert_eq!(column_index(&cols, "host"), Some(2));
        assert_eq!(column_index(&cols, "_start"), Some(0));
        assert_eq!(column_index(&cols, "region"), None);
    }

    #[test]
    fn check_col_type_accepts_match() {
        let col = ColumnMeta::new("_value", ColumnType::Float);
        check_col_type(&col, ColumnType::Float);
    }

    #[test]
    #[should_panic(expected = "declared float, not int")]
    fn check_col_type_panics_on_mismatch() {
        let col = ColumnMeta::new("_value", ColumnType::Float);
        check_col_type(&col, ColumnType::Int);
    }

    #[test]
    fn group_key_preserves_pair_order() {
        let key = GroupKey::new(vec![
            (
                ColumnMeta::new("host", ColumnType::String),
                KeyValue::String(b"a".to_vec()),
            ),
            (
                ColumnMeta::new("_measurement", ColumnType::String),
                KeyValue::String(b"cpu".to_vec()),
            ),
        ]);

        assert_eq!(key.len(), 2);
        assert_eq!(key.col(0).label, "host");
        assert_eq!(key.value(1), &KeyValue::String(b"cpu".to_vec()));

        let labels: Vec<&str> = key.iter().map(|(c, _)| c.label.as_str()).collect();
        assert_eq!(labels, vec!["host", "_measurement"]);
    }

    #[test]
    fn empty_group_key() {
        let key = GroupKey::empty();
        assert!(key.is_empty());
        assert_eq!(key.len(), 0);
    }
}
