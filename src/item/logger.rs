use std::fmt::Debug;

use log::{debug, info};

use crate::{core::item::ItemWriter, BatchError};

/// A writer that logs each record of a chunk, useful for debugging
/// pipelines.
///
/// Non-transactional: pair it with the default no-op transaction manager.
#[derive(Default)]
pub struct LoggerWriter {}

impl<T> ItemWriter<T> for LoggerWriter
where
    T: Debug,
{
    fn write(&self, items: &[T]) -> Result<(), BatchError> {
        debug!("Logging chunk of {} records", items.len());

        for item in items {
            info!("Record: {:?}", item);
        }
        Ok(())
    }
}
