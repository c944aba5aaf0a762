//! Time-bounds column replication.
//!
//! Every table carries two reserved columns holding the query window's
//! start and stop timestamps, replicated once per row so the consumer
//! can treat them like any other column. Bounds values need no
//! validation, so the capacity is reserved once and values are appended
//! without growth tracking.

use std::sync::Arc;

use arrow::array::Int64Builder;

use crate::schema::{START_COL_IDX, STOP_COL_IDX};
use crate::table::error::TableError;
use crate::table::frame::Frame;

impl Frame {
    /// Fills the two reserved bounds columns with the window boundaries
    /// replicated `rows` times each.
    pub(crate) fn append_bounds(&mut self, rows: usize) -> Result<(), TableError> {
        let bounds = [
            (START_COL_IDX, self.bounds.start),
            (STOP_COL_IDX, self.bounds.stop),
        ];
        for (j, bound) in bounds {
            self.charge(rows * std::mem::size_of::<i64>())?;

            let mut b = Int64Builder::with_capacity(rows);
            for _ in 0..rows {
                b.append_value(bound);
            }
            self.set_col(j, Arc::new(b.finish()));
        }
        Ok(())
    }
}
