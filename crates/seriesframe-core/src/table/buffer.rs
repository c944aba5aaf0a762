//! Type-specialized column buffer construction.
//!
//! [`ColumnValues`] captures everything that differs between the five
//! value types: the native representation the cursor decodes to, the
//! concrete Arrow array produced, the declared column type, and the
//! byte estimate charged against the memory tracker. Everything else in
//! the table layer is written once against this trait instead of once
//! per type. Timestamps reuse the signed 64-bit integer representation,
//! so there is no sixth impl.
//!
//! Builds reserve exact capacity up front (the row count is always known
//! when a run arrives) and use the slice-append fast path for primitive
//! values, which skips per-value growth checks. The finished array is an
//! immutable snapshot; the builder is consumed by `finish`.

use std::fmt::Debug;
use std::mem;

use arrow::array::{
    Array, BinaryArray, BinaryBuilder, BooleanArray, BooleanBuilder, Float64Array, Float64Builder,
    Int64Array, Int64Builder, UInt64Array, UInt64Builder,
};

use crate::schema::ColumnType;

/// Value-type behavior shared by every table variant.
pub trait ColumnValues: Send + Sync + 'static {
    /// Native representation the cursor decodes values to.
    type Native: Clone + Debug + Send + Sync;

    /// Concrete Arrow array the value column materializes into.
    type Array: Array + 'static;

    /// Declared column type the value column must carry.
    const COLUMN_TYPE: ColumnType;

    /// Estimated backing-buffer bytes for `values`, charged against the
    /// shared memory tracker before the build.
    fn byte_len(values: &[Self::Native]) -> usize;

    /// Builds an immutable array snapshot sized exactly to `values`.
    fn build(values: &[Self::Native]) -> Self::Array;
}

/// Boolean value columns.
#[derive(Debug, Clone, Copy)]
pub struct BooleanValues;

impl ColumnValues for BooleanValues {
    type Native = bool;
    type Array = BooleanArray;
    const COLUMN_TYPE: ColumnType = ColumnType::Bool;

    fn byte_len(values: &[bool]) -> usize {
        // One bit per value in the packed validity-style buffer.
        values.len().div_ceil(8)
    }

    fn build(values: &[bool]) -> BooleanArray {
        let mut b = BooleanBuilder::with_capacity(values.len());
        b.append_slice(values);
        b.finish()
    }
}

/// Signed 64-bit integer value columns.
#[derive(Debug, Clone, Copy)]
pub struct IntegerValues;

impl ColumnValues for IntegerValues {
    type Native = i64;
    type Array = Int64Array;
    const COLUMN_TYPE: ColumnType = ColumnType::Int;

    fn byte_len(values: &[i64]) -> usize {
        values.len() * mem::size_of::<i64>()
    }

    fn build(values: &[i64]) -> Int64Array {
        let mut b = Int64Builder::with_capacity(values.len());
        b.append_slice(values);
        b.finish()
    }
}

/// Unsigned 64-bit integer value columns.
#[derive(Debug, Clone, Copy)]
pub struct UnsignedValues;

impl ColumnValues for UnsignedValues {
    type Native = u64;
    type Array = UInt64Array;
    const COLUMN_TYPE: ColumnType = ColumnType::UInt;

    fn byte_len(values: &[u64]) -> usize {
        values.len() * mem::size_of::<u64>()
    }

    fn build(values: &[u64]) -> UInt64Array {
        let mut b = UInt64Builder::with_capacity(values.len());
        b.append_slice(values);
        b.finish()
    }
}

/// 64-bit floating point value columns.
#[derive(Debug, Clone, Copy)]
pub struct FloatValues;

impl ColumnValues for FloatValues {
    type Native = f64;
    type Array = Float64Array;
    const COLUMN_TYPE: ColumnType = ColumnType::Float;

    fn byte_len(values: &[f64]) -> usize {
        values.len() * mem::size_of::<f64>()
    }

    fn build(values: &[f64]) -> Float64Array {
        let mut b = Float64Builder::with_capacity(values.len());
        b.append_slice(values);
        b.finish()
    }
}

/// Variable-length text/binary value columns.
#[derive(Debug, Clone, Copy)]
pub struct StringValues;

impl ColumnValues for StringValues {
    type Native = Vec<u8>;
    type Array = BinaryArray;
    const COLUMN_TYPE: ColumnType = ColumnType::String;

    fn byte_len(values: &[Vec<u8>]) -> usize {
        let data: usize = values.iter().map(Vec::len).sum();
        data + (values.len() + 1) * mem::size_of::<i32>()
    }

    fn build(values: &[Vec<u8>]) -> BinaryArray {
        let data: usize = values.iter().map(Vec::len).sum();
        let mut b = BinaryBuilder::with_capacity(values.len(), data);
        for v in values {
            b.append_value(v);
        }
        b.finish()
    }
}

/// Builds the shared time-column buffer from decoded timestamps.
///
/// Time and bounds columns always materialize as `Int64Array`, whatever
/// the table's value type.
pub(crate) fn build_times(timestamps: &[i64]) -> Int64Array {
    IntegerValues::build(timestamps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_build_is_exactly_sized() {
        let arr = FloatValues::build(&[1.5, -2.0, 3.25]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.values(), &[1.5, -2.0, 3.25]);
        assert_eq!(arr.null_count(), 0);
    }

    #[test]
    fn integer_and_unsigned_round_values() {
        let ints = IntegerValues::build(&[i64::MIN, 0, i64::MAX]);
        assert_eq!(ints.values(), &[i64::MIN, 0, i64::MAX]);

        let uints = UnsignedValues::build(&[0, u64::MAX]);
        assert_eq!(uints.values(), &[0, u64::MAX]);
    }

    #[test]
    fn boolean_build_packs_bits() {
        let arr = BooleanValues::build(&[true, false, true]);
        assert_eq!(arr.len(), 3);
        assert!(arr.value(0));
        assert!(!arr.value(1));
        assert!(arr.value(2));
    }

    #[test]
    fn string_build_keeps_byte_values() {
        let values = vec![b"east".to_vec(), b"".to_vec(), b"west".to_vec()];
        let arr = StringValues::build(&values);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.value(0), b"east");
        assert_eq!(arr.value(1), b"");
        assert_eq!(arr.value(2), b"west");
    }

    #[test]
    fn byte_len_estimates() {
        assert_eq!(BooleanValues::byte_len(&[true; 9]), 2);
        assert_eq!(IntegerValues::byte_len(&[0; 4]), 32);
        assert_eq!(FloatValues::byte_len(&[]), 0);

        let strings = vec![b"ab".to_vec(), b"cde".to_vec()];
        // 5 data bytes plus 3 i32 offsets.
        assert_eq!(StringValues::byte_len(&strings), 5 + 12);
    }

    #[test]
    fn build_times_is_int64() {
        let arr = build_times(&[100, 200, 300]);
        assert_eq!(arr.values(), &[100, 200, 300]);
    }
}
