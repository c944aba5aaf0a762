//! The generic table: orchestration, read contract, and lifecycle.
//!
//! One `Table<S>` covers every variant: the value type comes from the
//! fill strategy's [`ColumnValues`] parameter and the single-series vs
//! grouped population difference is confined to the strategy itself.
//! The producer drives [`Table::produce`]; the consumer reads the
//! populated columns from inside the callback and may cancel from
//! another thread through a [`CancelToken`]. Whatever ends the fill
//! loop, the completion gate is released exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, UInt64Array};

use crate::gate::DoneGate;
use crate::memory::MemoryTracker;
use crate::schema::{Bounds, ColumnMeta, GroupKey, VALUE_COL_IDX};
use crate::table::buffer::ColumnValues;
use crate::table::cursor::FillStrategy;
use crate::table::error::TableError;
use crate::table::frame::Frame;

/// Cloneable handle that requests cooperative cancellation of one table.
///
/// Cancellation only sets an atomic flag; the fill loop observes it
/// between row batches, never mid-batch, and then terminates without
/// completing the current cycle. Safe to invoke concurrently with an
/// in-progress fill.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

/// Columnar table over one series or one pre-aggregated group.
///
/// Constructed by the storage-cursor adapter, refilled batch by batch,
/// and terminated by exhaustion, a fault, or cancellation. Termination
/// releases the completion gate exactly once.
pub struct Table<S: FillStrategy> {
    frame: Frame,
    source: S,
    err: Option<TableError>,
    cancelled: Arc<AtomicBool>,
    done: Arc<DoneGate>,
}

impl<S: FillStrategy> Table<S> {
    /// Builds an empty table over `source`.
    ///
    /// `defs` holds the per-column tag defaults, positionally aligned
    /// with `cols`; `None` marks non-tag columns and null-sentinel
    /// defaults alike. The shared `alloc` tracker accounts every buffer
    /// this table builds.
    ///
    /// # Panics
    ///
    /// Panics if the declared value column type does not match the
    /// strategy's value type, or if the column layout is malformed.
    pub fn new(
        bounds: Bounds,
        key: GroupKey,
        cols: Vec<ColumnMeta>,
        defs: Vec<Option<Vec<u8>>>,
        alloc: Arc<MemoryTracker>,
        source: S,
    ) -> Self {
        assert!(
            cols.len() > VALUE_COL_IDX
                && cols[VALUE_COL_IDX].column_type == <S::Values as ColumnValues>::COLUMN_TYPE,
            "value column must be declared {}",
            <S::Values as ColumnValues>::COLUMN_TYPE
        );

        Self {
            frame: Frame::new(bounds, key, cols, defs, alloc),
            source,
            err: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            done: Arc::new(DoneGate::new()),
        }
    }

    /// The group key this table belongs to.
    pub fn key(&self) -> &GroupKey {
        self.frame.key()
    }

    /// The table's column metadata, index-stable for its lifetime.
    pub fn columns(&self) -> &[ColumnMeta] {
        self.frame.columns()
    }

    /// The half-open time window applied to every row.
    pub fn bounds(&self) -> Bounds {
        self.frame.bounds()
    }

    /// The terminal error, if any. Non-`None` means no more rows will be
    /// produced.
    pub fn err(&self) -> Option<&TableError> {
        self.err.as_ref()
    }

    /// True iff no rows are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Row count of the current batch; zero once the table has stopped
    /// producing.
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    /// The materialized buffer of column `j`, or `None` for a column the
    /// current batch left unpopulated (a default-sentinel tag column).
    pub fn column(&self, j: usize) -> Option<&ArrayRef> {
        self.frame.column(j)
    }

    /// Boolean buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared boolean or holds no buffer.
    pub fn bools(&self, j: usize) -> &BooleanArray {
        self.frame.bools(j)
    }

    /// Integer buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared int or holds no buffer.
    pub fn ints(&self, j: usize) -> &Int64Array {
        self.frame.ints(j)
    }

    /// Unsigned-integer buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared uint or holds no buffer.
    pub fn uints(&self, j: usize) -> &UInt64Array {
        self.frame.uints(j)
    }

    /// Float buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared float or holds no buffer.
    pub fn floats(&self, j: usize) -> &Float64Array {
        self.frame.floats(j)
    }

    /// String/binary buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared string or holds no buffer.
    pub fn strings(&self, j: usize) -> &BinaryArray {
        self.frame.strings(j)
    }

    /// Timestamp buffer of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if column `j` is not declared time or holds no buffer.
    pub fn times(&self, j: usize) -> &Int64Array {
        self.frame.times(j)
    }

    /// Requests cooperative cancellation. Idempotent; takes effect at the
    /// next between-batch check inside the fill loop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// A cancellation handle the consumer can hold while the producer
    /// owns the table mutably.
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// True iff cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Reference-count no-op kept for the shared consumer capability
    /// contract; buffer lifetime is governed by the tracker and the
    /// batch-refill cycle.
    pub fn retain(&self) {}

    /// See [`Table::retain`].
    pub fn release(&self) {}

    /// The completion gate; released exactly once when this table stops
    /// producing rows. Consumers await it to observe exhaustion.
    pub fn done_gate(&self) -> Arc<DoneGate> {
        Arc::clone(&self.done)
    }

    /// Drives the fill loop: one callback invocation per refill cycle.
    ///
    /// Stops on source exhaustion, on an internal fault (recorded and
    /// surfaced through [`Table::err`]), on cancellation, or on a
    /// consumer-callback error (returned to the caller). Every exit path
    /// leaves the table empty and releases the completion gate.
    pub fn produce<F>(&mut self, mut f: F) -> Result<(), TableError>
    where
        F: FnMut(&Self) -> Result<(), TableError>,
    {
        loop {
            if self.err.is_some() {
                break;
            }
            if self.is_cancelled() {
                tracing::debug!("cancellation observed; stopping fill loop");
                break;
            }

            let run = match self.source.next_run() {
                Ok(Some(run)) => run,
                Ok(None) => break,
                Err(e) => {
                    self.fail(e);
                    break;
                }
            };

            if let Err(e) = self.frame.fill(&run) {
                self.fail(e);
                break;
            }
            tracing::debug!(rows = self.frame.len(), "refill cycle materialized");

            if let Err(e) = f(&*self) {
                self.terminate();
                return Err(e);
            }
        }

        self.terminate();
        Ok(())
    }

    /// A stopped table holds no rows: the last batch is discarded, its
    /// reservation returned, and the gate released.
    fn terminate(&mut self) {
        self.frame.reset();
        self.done.release();
    }

    fn fail(&mut self, err: TableError) {
        tracing::warn!(error = %err, "table fill terminated by fault");
        self.err = Some(err);
    }
}
