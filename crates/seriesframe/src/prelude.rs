//! Wrapper prelude.
//!
//! The `seriesframe` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::memory;
pub use crate::{
    Bounds, CancelToken, ColumnMeta, ColumnType, DoneGate, FillStrategy, GroupKey, GroupMerge,
    KeyValue, Run, SingleSeries, Table, TableError, Tag, Timestamp, ValueBatch, ValueCursor,
};
