use std::collections::VecDeque;
use std::sync::Arc;

use crate::memory::MemoryTracker;
use crate::schema::{Bounds, ColumnMeta, ColumnType, GroupKey, Tag, Timestamp, VALUE_COL_IDX};
use crate::table::buffer::{ColumnValues, IntegerValues};
use crate::table::cursor::{SingleSeries, ValueBatch, ValueCursor};
use crate::table::error::TableError;
use crate::table::fill::Table;
use crate::table::frame::Frame;

/// Index of the first tag column in the fixed layout.
pub(crate) const TAG_BASE_IDX: usize = VALUE_COL_IDX + 1;

/// In-memory cursor yielding queued `(timestamps, values)` batches, with
/// an optional injected decode fault.
pub(crate) struct VecCursor<V: ColumnValues> {
    batches: VecDeque<(Vec<Timestamp>, Vec<V::Native>)>,
    fault: Option<String>,
}

impl<V: ColumnValues> VecCursor<V> {
    pub(crate) fn new(batches: Vec<(Vec<Timestamp>, Vec<V::Native>)>) -> Self {
        Self {
            batches: batches.into(),
            fault: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            batches: VecDeque::new(),
            fault: Some(message.to_string()),
        }
    }
}

impl<V: ColumnValues> ValueCursor for VecCursor<V> {
    type Values = V;

    fn next_batch(&mut self) -> Result<Option<ValueBatch<V>>, TableError> {
        if let Some(message) = self.fault.take() {
            return Err(TableError::cursor(message));
        }
        Ok(self
            .batches
            .pop_front()
            .map(|(timestamps, values)| ValueBatch { timestamps, values }))
    }
}

/// The fixed column layout: bounds, time, value, then one string column
/// per tag label.
pub(crate) fn layout_cols(value_type: ColumnType, tag_labels: &[&str]) -> Vec<ColumnMeta> {
    let mut cols = vec![
        ColumnMeta::new("_start", ColumnType::Time),
        ColumnMeta::new("_stop", ColumnType::Time),
        ColumnMeta::new("_time", ColumnType::Time),
        ColumnMeta::new("_value", value_type),
    ];
    for label in tag_labels {
        cols.push(ColumnMeta::new(*label, ColumnType::String));
    }
    cols
}

/// Tag defaults aligned with [`layout_cols`]: `None` for the reserved
/// columns, then one entry per tag column.
pub(crate) fn tag_defs(defaults: &[Option<&[u8]>]) -> Vec<Option<Vec<u8>>> {
    let mut defs: Vec<Option<Vec<u8>>> = vec![None; TAG_BASE_IDX];
    defs.extend(defaults.iter().map(|d| d.map(<[u8]>::to_vec)));
    defs
}

/// A frame over an int value column and the given `(label, default)` tag
/// columns, with bounds `[100, 200)`.
pub(crate) fn tag_frame(tag_cols: &[(&str, Option<&[u8]>)]) -> Frame {
    tag_frame_with_bounds(tag_cols, 100, 200)
}

pub(crate) fn tag_frame_with_bounds(
    tag_cols: &[(&str, Option<&[u8]>)],
    start: Timestamp,
    stop: Timestamp,
) -> Frame {
    let labels: Vec<&str> = tag_cols.iter().map(|(label, _)| *label).collect();
    let defaults: Vec<Option<&[u8]>> = tag_cols.iter().map(|(_, def)| *def).collect();
    Frame::new(
        Bounds::new(start, stop),
        GroupKey::empty(),
        layout_cols(ColumnType::Int, &labels),
        tag_defs(&defaults),
        Arc::new(MemoryTracker::unbounded()),
    )
}

/// A single-series int table with `host` and `region` tag columns
/// (null-sentinel defaults), bounds `[100, 200)`, and an empty group key.
pub(crate) fn int_series_table(
    cursor: VecCursor<IntegerValues>,
    tags: Vec<Tag>,
) -> Table<SingleSeries<VecCursor<IntegerValues>>> {
    Table::new(
        Bounds::new(100, 200),
        GroupKey::empty(),
        layout_cols(ColumnType::Int, &["host", "region"]),
        tag_defs(&[None, None]),
        Arc::new(MemoryTracker::unbounded()),
        SingleSeries::new(cursor, tags),
    )
}
