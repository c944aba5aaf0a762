//! Shared column-frame state behind every table variant.
//!
//! The frame owns the column metadata, the tag cache for the current
//! series, the materialized buffers of the current batch, and the memory
//! reservations backing them. The generic [`super::fill::Table`] wraps a
//! frame together with a fill strategy; the frame itself knows nothing
//! about cursors or grouping.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, UInt64Array,
};
use snafu::ResultExt;

use crate::memory::MemoryTracker;
use crate::schema::{
    check_col_type, Bounds, ColumnMeta, ColumnType, GroupKey, TIME_COL_IDX, VALUE_COL_IDX,
};
use crate::table::buffer::{build_times, ColumnValues};
use crate::table::cursor::Run;
use crate::table::error::{MemorySnafu, RunShapeSnafu, TableError};

pub(crate) struct Frame {
    pub(crate) bounds: Bounds,
    pub(crate) key: GroupKey,
    pub(crate) cols: Vec<ColumnMeta>,

    // Tag cache for the current series. Positionally aligned with `cols`;
    // `None` marks a column that stays unmaterialized this batch.
    pub(crate) tags: Vec<Option<Vec<u8>>>,
    pub(crate) defs: Vec<Option<Vec<u8>>>,

    pub(crate) col_bufs: Vec<Option<ArrayRef>>,
    pub(crate) len: usize,

    // Bytes currently charged against the shared tracker for this batch.
    reserved: usize,
    alloc: Arc<MemoryTracker>,
}

impl Frame {
    /// Builds an empty frame.
    ///
    /// # Panics
    ///
    /// Panics if `defs` is not positionally aligned with `cols`, or if
    /// `cols` lacks the reserved bounds/time/value indices. Both are
    /// construction-time programming errors.
    pub(crate) fn new(
        bounds: Bounds,
        key: GroupKey,
        cols: Vec<ColumnMeta>,
        defs: Vec<Option<Vec<u8>>>,
        alloc: Arc<MemoryTracker>,
    ) -> Self {
        assert_eq!(
            cols.len(),
            defs.len(),
            "tag defaults must be positionally aligned with columns"
        );
        assert!(
            cols.len() > VALUE_COL_IDX,
            "column layout must include the reserved bounds, time, and value columns"
        );

        let n = cols.len();
        Self {
            bounds,
            key,
            cols,
            tags: vec![None; n],
            defs,
            col_bufs: vec![None; n],
            len: 0,
            reserved: 0,
            alloc,
        }
    }

    pub(crate) fn key(&self) -> &GroupKey {
        &self.key
    }

    pub(crate) fn columns(&self) -> &[ColumnMeta] {
        &self.cols
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn column(&self, j: usize) -> Option<&ArrayRef> {
        self.col_bufs[j].as_ref()
    }

    pub(crate) fn bools(&self, j: usize) -> &BooleanArray {
        check_col_type(&self.cols[j], ColumnType::Bool);
        self.typed_buf(j)
    }

    pub(crate) fn ints(&self, j: usize) -> &Int64Array {
        check_col_type(&self.cols[j], ColumnType::Int);
        self.typed_buf(j)
    }

    pub(crate) fn uints(&self, j: usize) -> &UInt64Array {
        check_col_type(&self.cols[j], ColumnType::UInt);
        self.typed_buf(j)
    }

    pub(crate) fn floats(&self, j: usize) -> &Float64Array {
        check_col_type(&self.cols[j], ColumnType::Float);
        self.typed_buf(j)
    }

    pub(crate) fn strings(&self, j: usize) -> &BinaryArray {
        check_col_type(&self.cols[j], ColumnType::String);
        self.typed_buf(j)
    }

    pub(crate) fn times(&self, j: usize) -> &Int64Array {
        check_col_type(&self.cols[j], ColumnType::Time);
        self.typed_buf(j)
    }

    fn typed_buf<A: Array + 'static>(&self, j: usize) -> &A {
        let buf = self.col_bufs[j].as_ref().unwrap_or_else(|| {
            panic!(
                "column {} has no materialized buffer for the current batch",
                self.cols[j].label
            )
        });
        buf.as_any().downcast_ref::<A>().unwrap_or_else(|| {
            panic!(
                "column {} buffer does not match its declared type",
                self.cols[j].label
            )
        })
    }

    /// Charges `bytes` against the shared tracker on behalf of the
    /// current batch.
    pub(crate) fn charge(&mut self, bytes: usize) -> Result<(), TableError> {
        self.alloc.allocate(bytes).context(MemorySnafu)?;
        self.reserved += bytes;
        Ok(())
    }

    pub(crate) fn set_col(&mut self, j: usize, array: ArrayRef) {
        self.col_bufs[j] = Some(array);
    }

    /// Discards the current batch: drops its buffers and returns their
    /// reservation to the shared tracker.
    pub(crate) fn reset(&mut self) {
        for buf in &mut self.col_bufs {
            *buf = None;
        }
        self.alloc.free(self.reserved);
        self.reserved = 0;
        self.len = 0;
    }

    /// One refill cycle: materializes every column of `run`.
    ///
    /// Buffers are rebuilt in full; on error the frame is left empty so
    /// no partially populated batch is ever observable.
    pub(crate) fn fill<V: ColumnValues>(&mut self, run: &Run<V>) -> Result<(), TableError> {
        self.reset();

        if run.timestamps.len() != run.values.len() {
            return RunShapeSnafu {
                timestamps: run.timestamps.len(),
                values: run.values.len(),
            }
            .fail();
        }

        if let Err(e) = self.fill_columns(run) {
            self.reset();
            return Err(e);
        }
        self.len = run.timestamps.len();
        Ok(())
    }

    fn fill_columns<V: ColumnValues>(&mut self, run: &Run<V>) -> Result<(), TableError> {
        let rows = run.timestamps.len();

        self.read_tags(&run.tags)?;

        self.charge(rows * std::mem::size_of::<i64>())?;
        self.set_col(TIME_COL_IDX, Arc::new(build_times(&run.timestamps)));

        self.charge(V::byte_len(&run.values))?;
        self.set_col(VALUE_COL_IDX, Arc::new(V::build(&run.values)));

        self.append_tags(rows)?;
        self.append_bounds(rows)?;
        Ok(())
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.alloc.free(self.reserved);
    }
}
