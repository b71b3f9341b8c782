/// This module provides a reader over in-memory ordered collections.
pub mod vec_reader;

/// This module provides an in-memory record store with transactional writes.
pub mod store;

/// This module provides the tagged-union classification processor and its
/// fan-out writer.
pub mod classify;

#[cfg(feature = "logger")]
/// This module provides a logger item writer, useful for debugging.
pub mod logger;

#[cfg(feature = "csv")]
/// This module provides a CSV item reader for delimited input files.
pub mod csv;
