//! Tag resolution and replication.
//!
//! Tags are constant within a series but the consumer reads them as
//! ordinary columns, so each resolved value is replicated across every
//! row of the batch. Resolution starts from the per-column defaults and
//! overwrites them with the series' actual tags; a tag key that matches
//! no declared column is a schema-mismatch fault, not a silent drop.
//!
//! Columns whose resolved value is the null sentinel (no tag and no
//! non-null default) are deliberately left unmaterialized: only
//! confirmed tags produce data.

use std::sync::Arc;

use arrow::array::BinaryBuilder;
use snafu::OptionExt;

use crate::schema::{column_index, Tag};
use crate::table::error::{TableError, UnknownTagColumnSnafu};
use crate::table::frame::Frame;

impl Frame {
    /// Resolves the tag cache for the series that produced the current
    /// run: defaults first, then the series' own tags by key lookup.
    pub(crate) fn read_tags(&mut self, tags: &[Tag]) -> Result<(), TableError> {
        for (slot, def) in self.tags.iter_mut().zip(self.defs.iter()) {
            slot.clone_from(def);
        }

        if tags.is_empty() {
            return Ok(());
        }

        for tag in tags {
            let j = column_index(&self.cols, &tag.key).context(UnknownTagColumnSnafu {
                key: tag.key.as_str(),
            })?;
            self.tags[j] = Some(tag.value.clone());
        }
        Ok(())
    }

    /// Replicates each resolved tag value across `rows` rows into a
    /// binary column buffer. Null-sentinel columns stay unpopulated.
    pub(crate) fn append_tags(&mut self, rows: usize) -> Result<(), TableError> {
        for j in 0..self.cols.len() {
            let Some(v) = self.tags[j].clone() else {
                continue;
            };

            let data_len = rows * v.len();
            self.charge(data_len + (rows + 1) * std::mem::size_of::<i32>())?;

            let mut b = BinaryBuilder::with_capacity(rows, data_len);
            for _ in 0..rows {
                b.append_value(&v);
            }
            self.set_col(j, Arc::new(b.finish()));
        }
        Ok(())
    }
}
