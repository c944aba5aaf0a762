//! Error types and SNAFU context selectors for the table layer.
//!
//! All data-level faults end up as a [`TableError`] recorded on the table
//! and surfaced through its `err` accessor; once set, the table produces
//! no further rows. Accessor-contract violations (asking for a column
//! through an accessor of the wrong type) are caller programming errors
//! and panic instead of appearing here.

use snafu::prelude::*;

use crate::memory::MemoryError;

/// Boxed error reported by an external cursor collaborator.
pub type CursorFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal faults of one table instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TableError {
    /// A series carried a tag whose key matches no declared column.
    ///
    /// Silently dropping the tag would lose data the storage layer
    /// considers part of the series identity, so this is a hard
    /// schema-mismatch fault.
    #[snafu(display("tag key {key} has no matching declared column"))]
    UnknownTagColumn {
        /// The tag key that failed column lookup.
        key: String,
    },

    /// The shared memory tracker rejected a buffer reservation.
    #[snafu(display("column buffer reservation failed: {source}"))]
    Memory {
        /// Underlying accounting error, including budget and usage.
        source: MemoryError,
    },

    /// The storage cursor reported a decode fault.
    ///
    /// Propagated without local recovery; retry policy, if any, belongs
    /// to the cursor.
    #[snafu(display("storage cursor failed: {source}"))]
    #[snafu(context(false))]
    Cursor {
        /// Opaque fault from the cursor collaborator.
        source: CursorFault,
    },

    /// The cursor produced a run whose timestamp and value slices have
    /// different lengths, violating the collaborator contract.
    #[snafu(display("cursor run has {timestamps} timestamps but {values} values"))]
    RunShape {
        /// Timestamp count of the malformed run.
        timestamps: usize,
        /// Value count of the malformed run.
        values: usize,
    },
}

impl TableError {
    /// Wraps an external cursor fault.
    pub fn cursor(source: impl Into<CursorFault>) -> Self {
        TableError::Cursor {
            source: source.into(),
        }
    }
}
