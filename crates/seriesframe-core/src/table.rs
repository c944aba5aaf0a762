//! Columnar table layer: materialization, read contract, and lifecycle.
//!
//! A [`Table`] is constructed once per series (or once per group) by the
//! storage-cursor adapter and refilled batch by batch: each refill cycle
//! resolves the series' tags, builds the time and value buffers from the
//! decoded slices, replicates tag and bounds values across the batch's
//! rows, and hands the populated columns to the consumer callback. The
//! single-series and grouped variants differ only in how the next run of
//! rows is produced ([`cursor::FillStrategy`]); every other step is shared.

pub mod buffer;
pub mod cursor;
pub mod error;

mod bounds;
mod fill;
mod frame;
mod tags;

#[cfg(test)]
pub(crate) mod test_util;

pub use buffer::{
    BooleanValues, ColumnValues, FloatValues, IntegerValues, StringValues, UnsignedValues,
};
pub use cursor::{FillStrategy, GroupMerge, Run, SingleSeries, ValueBatch, ValueCursor};
pub use error::TableError;
pub use fill::{CancelToken, Table};
