//! Adapter core that turns decoded time-series data into immutable,
//! Arrow-backed columnar tables.
//!
//! A storage-engine cursor decodes one logical series (or one pre-aggregated
//! group) at a time and hands this crate native value slices. This crate
//! materializes those slices into type-specific columnar buffers, rebuilds
//! the per-series tag columns (with default fill-in for absent tags) and the
//! two replicated time-bounds columns, and exposes the result to a dataflow
//! query engine through a pull-based, cancelable table contract:
//!
//! - Type-specialized column buffer construction over a value-type trait,
//!   so the five value types share one orchestration path (`table::buffer`).
//! - Tag and bounds replication aligned row-for-row with the value column
//!   (`table` internals).
//! - A generic `Table` over a fill strategy, covering both single-series
//!   and grouped population without per-variant duplication (`table`).
//! - A shared memory-accounting tracker that caps total buffer bytes across
//!   all concurrently live tables (`memory`).
//! - A one-shot completion gate and a cooperative cancellation token for
//!   the producer/consumer handshake (`gate`, `table`).
//!
//! Query planning, predicate pushdown, on-disk formats, and wire protocols
//! are out of scope; the decoding cursor and the execution engine are
//! collaborators specified only at their interface boundary
//! (`table::cursor`).
#![deny(missing_docs)]
pub mod gate;
pub mod memory;
pub mod schema;
pub mod table;
