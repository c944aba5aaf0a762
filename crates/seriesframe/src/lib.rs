//! # seriesframe
//!
//! Adapter layer that materializes decoded time-series cursor data into
//! immutable, Arrow-backed columnar tables for a dataflow query engine.
//!
//! This crate is the supported public entry point and provides a small,
//! stable surface over `seriesframe-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use seriesframe::prelude::*;
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Memory accounting namespace (wrapper-only).
pub mod memory {
    pub use seriesframe_core::memory::{MemoryError, MemoryTracker};
}

pub use seriesframe_core::gate::DoneGate;
pub use seriesframe_core::schema::{
    Bounds, ColumnMeta, ColumnType, GroupKey, KeyValue, Tag, Timestamp,
};
pub use seriesframe_core::table::{
    BooleanValues, CancelToken, ColumnValues, FillStrategy, FloatValues, GroupMerge,
    IntegerValues, Run, SingleSeries, StringValues, Table, TableError, UnsignedValues, ValueBatch,
    ValueCursor,
};
