//! Interface boundary with the storage-engine cursor, and the two fill
//! strategies built on it.
//!
//! [`ValueCursor`] is the pull contract this crate consumes: each call
//! returns the next run of same-series rows as native typed slices, or
//! `None` once the series is exhausted, or a fault. The cursor's decode
//! internals are outside this crate.
//!
//! [`FillStrategy`] is the one point where the single-series and grouped
//! table variants diverge: [`SingleSeries`] passes cursor batches through
//! one at a time, while [`GroupMerge`] drains every cursor of a group into
//! a single combined run. Either way the strategy attaches the tags the
//! run's rows should be attributed to, and the rest of the refill cycle
//! is identical.

use crate::schema::{Tag, Timestamp};
use crate::table::buffer::ColumnValues;
use crate::table::error::TableError;

/// One decoded run of same-series rows.
#[derive(Debug, Clone)]
pub struct ValueBatch<V: ColumnValues> {
    /// Row timestamps, nanoseconds, in source cursor order.
    pub timestamps: Vec<Timestamp>,
    /// Decoded values, positionally aligned with `timestamps`.
    pub values: Vec<V::Native>,
}

/// Pull contract of the storage-engine cursor collaborator.
pub trait ValueCursor {
    /// Value type this cursor decodes.
    type Values: ColumnValues;

    /// Pulls the next run of rows.
    ///
    /// `None` (or an empty batch) signals end of series. Errors are
    /// fatal decode faults; the caller does not retry.
    fn next_batch(&mut self) -> Result<Option<ValueBatch<Self::Values>>, TableError>;
}

/// One combined run ready for materialization, with the tags its rows
/// belong to.
#[derive(Debug, Clone)]
pub struct Run<V: ColumnValues> {
    /// Row timestamps, nanoseconds, in source order.
    pub timestamps: Vec<Timestamp>,
    /// Decoded values, positionally aligned with `timestamps`.
    pub values: Vec<V::Native>,
    /// Tags to resolve for this run's rows.
    pub tags: Vec<Tag>,
}

/// Produces the next run for a refill cycle.
///
/// This is step (1) of the refill cycle; it is the only step that
/// differs between the single-series and grouped table variants.
pub trait FillStrategy {
    /// Value type of the runs this strategy produces.
    type Values: ColumnValues;

    /// Next combined run, or `None` when the source is exhausted.
    fn next_run(&mut self) -> Result<Option<Run<Self::Values>>, TableError>;
}

/// Pass-through strategy for a table backed by one series.
///
/// Each cursor batch becomes one run; the series' tags are attached to
/// every run unchanged.
#[derive(Debug)]
pub struct SingleSeries<C: ValueCursor> {
    cursor: C,
    tags: Vec<Tag>,
}

impl<C: ValueCursor> SingleSeries<C> {
    /// Wraps one series cursor and the series' tag list.
    pub fn new(cursor: C, tags: Vec<Tag>) -> Self {
        Self { cursor, tags }
    }
}

impl<C: ValueCursor> FillStrategy for SingleSeries<C> {
    type Values = C::Values;

    fn next_run(&mut self) -> Result<Option<Run<C::Values>>, TableError> {
        match self.cursor.next_batch()? {
            None => Ok(None),
            Some(batch) if batch.timestamps.is_empty() => Ok(None),
            Some(batch) => Ok(Some(Run {
                timestamps: batch.timestamps,
                values: batch.values,
                tags: self.tags.clone(),
            })),
        }
    }
}

/// Merge strategy for a table backed by a pre-aggregated group.
///
/// Drains every member cursor in order and concatenates their batches
/// into one combined run. Tags are resolved once for the group, not per
/// member series.
#[derive(Debug)]
pub struct GroupMerge<C: ValueCursor> {
    cursors: Vec<C>,
    tags: Vec<Tag>,
    drained: bool,
}

impl<C: ValueCursor> GroupMerge<C> {
    /// Wraps the group's member cursors and its resolved tag list.
    pub fn new(cursors: Vec<C>, tags: Vec<Tag>) -> Self {
        Self {
            cursors,
            tags,
            drained: false,
        }
    }
}

impl<C: ValueCursor> FillStrategy for GroupMerge<C> {
    type Values = C::Values;

    fn next_run(&mut self) -> Result<Option<Run<C::Values>>, TableError> {
        if self.drained {
            return Ok(None);
        }
        self.drained = true;

        let mut timestamps = Vec::new();
        let mut values = Vec::new();
        for cursor in &mut self.cursors {
            while let Some(batch) = cursor.next_batch()? {
                if batch.timestamps.is_empty() {
                    break;
                }
                timestamps.extend(batch.timestamps);
                values.extend(batch.values);
            }
        }

        if timestamps.is_empty() {
            return Ok(None);
        }
        Ok(Some(Run {
            timestamps,
            values,
            tags: self.tags.clone(),
        }))
    }
}
