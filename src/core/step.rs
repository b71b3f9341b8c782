use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error};

use crate::BatchError;

use super::{
    build_name,
    chunk::{Chunk, ChunkStatus},
    item::{ItemProcessor, ItemReader, ItemWriter, PassThroughProcessor},
    transaction::{NoOpTransactionManager, TransactionManager, TransactionScope},
};

/// Status of a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus {
    /// The step has not run yet, or is currently running.
    Started,
    /// The step drained its reader and committed every chunk.
    Success,
    /// The step aborted on an unhandled error; the failing chunk was not
    /// committed.
    Error,
}

/// Outcome of a single step run: terminal status, timing and counters.
pub struct StepExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub status: StepStatus,
    pub read_count: usize,
    pub write_count: usize,
    pub filter_count: usize,
}

/// A step that can be executed as part of a job.
///
/// Erases the record types so a job can hold steps over different item types.
pub trait Step {
    fn execute(&self) -> StepExecution;
    fn get_name(&self) -> &str;
    fn get_status(&self) -> StepStatus;
}

/// A chunk-oriented step: reader, optional processor, writer.
///
/// `execute` pulls records from the reader one at a time, runs each through
/// the processor (records mapped to `Ok(None)` are filtered out), and groups
/// the results into chunks of `chunk_size`. Each non-empty chunk is written
/// inside a transaction scope: committed when the writer succeeds, rolled
/// back on any error. The first read, process or write error ends the step
/// with `StepStatus::Error`.
pub struct StepInstance<'a, R, W> {
    name: String,
    reader: &'a dyn ItemReader<R>,
    processor: &'a dyn ItemProcessor<R, W>,
    writer: &'a dyn ItemWriter<W>,
    transaction_manager: &'a dyn TransactionManager,
    chunk_size: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
    filter_count: Cell<usize>,
}

impl<R, W> Step for StepInstance<'_, R, W> {
    fn execute(&self) -> StepExecution {
        let start = Instant::now();

        debug!("Start of step: {}", self.name);
        self.status.set(StepStatus::Started);

        let status = match self.run_chunks() {
            Ok(()) => StepStatus::Success,
            Err(err) => {
                error!("Step {} failed: {}", self.name, err);
                StepStatus::Error
            }
        };
        self.status.set(status);

        debug!("End of step: {}", self.name);

        StepExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            status,
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
            filter_count: self.filter_count.get(),
        }
    }

    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_status(&self) -> StepStatus {
        self.status.get()
    }
}

impl<R, W> StepInstance<'_, R, W> {
    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    pub fn get_filter_count(&self) -> usize {
        self.filter_count.get()
    }

    fn run_chunks(&self) -> Result<(), BatchError> {
        self.writer.open()?;

        // Close the writer even when the chunk loop fails.
        let result = self.drive_chunks();
        let close_result = self.writer.close();

        result?;
        close_result
    }

    fn drive_chunks(&self) -> Result<(), BatchError> {
        let mut chunk = Chunk::new(self.chunk_size);

        loop {
            let chunk_status = self.fill_chunk(&mut chunk)?;

            if !chunk.is_empty() {
                self.write_chunk(&chunk)?;
                chunk.clear();
            }

            if chunk_status == ChunkStatus::Finished {
                return Ok(());
            }
        }
    }

    /// Reads and processes records until the chunk is full or the reader is
    /// exhausted. Chunk boundaries never split mid-transform: a record is
    /// read, processed and appended in one pass.
    fn fill_chunk(&self, chunk: &mut Chunk<W>) -> Result<ChunkStatus, BatchError> {
        debug!("Start reading chunk");

        while !chunk.is_full() {
            match self.reader.read()? {
                Some(item) => {
                    self.read_count.set(self.read_count.get() + 1);

                    match self.processor.process(&item)? {
                        Some(processed) => chunk.push(processed),
                        None => self.filter_count.set(self.filter_count.get() + 1),
                    }
                }
                None => {
                    debug!("End reading chunk: finished");
                    return Ok(ChunkStatus::Finished);
                }
            }
        }

        debug!("End reading chunk: full");
        Ok(ChunkStatus::Full)
    }

    /// Writes one chunk inside a transaction scope. Dropping the scope on the
    /// error path rolls the transaction back, so a failed chunk is never
    /// observable in the destination.
    fn write_chunk(&self, chunk: &Chunk<W>) -> Result<(), BatchError> {
        debug!("Start writing chunk of {} items", chunk.len());

        let scope = TransactionScope::begin(self.transaction_manager)?;
        self.writer.write(chunk.items())?;
        scope.complete()?;

        self.write_count.set(self.write_count.get() + chunk.len());

        debug!("End writing chunk");
        Ok(())
    }
}

/// Builder for a chunk-oriented step.
#[derive(Default)]
pub struct StepBuilder<'a, R, W> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<R>>,
    processor: Option<&'a dyn ItemProcessor<R, W>>,
    writer: Option<&'a dyn ItemWriter<W>>,
    transaction_manager: Option<&'a dyn TransactionManager>,
    chunk_size: usize,
}

impl<'a, R, W> StepBuilder<'a, R, W> {
    pub fn new() -> StepBuilder<'a, R, W> {
        Self {
            name: None,
            reader: None,
            processor: None,
            writer: None,
            transaction_manager: None,
            chunk_size: 1,
        }
    }

    /// Sets the step name. A random name is generated if not set.
    pub fn name(mut self, name: String) -> StepBuilder<'a, R, W> {
        self.name = Some(name);
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<R>) -> StepBuilder<'a, R, W> {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a impl ItemProcessor<R, W>) -> StepBuilder<'a, R, W> {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<W>) -> StepBuilder<'a, R, W> {
        self.writer = Some(writer);
        self
    }

    /// Sets the transaction manager each chunk commits against. Defaults to
    /// a no-op manager for non-transactional writers.
    pub fn transaction_manager(
        mut self,
        transaction_manager: &'a dyn TransactionManager,
    ) -> StepBuilder<'a, R, W> {
        self.transaction_manager = Some(transaction_manager);
        self
    }

    /// Sets the commit interval: the number of processed records per chunk.
    pub fn chunk(mut self, chunk_size: usize) -> StepBuilder<'a, R, W> {
        self.chunk_size = chunk_size;
        self
    }

    pub fn build(self) -> StepInstance<'a, R, W>
    where
        PassThroughProcessor: ItemProcessor<R, W>,
    {
        StepInstance {
            name: self.name.unwrap_or_else(build_name),
            reader: self.reader.expect("A step requires a reader"),
            processor: self.processor.unwrap_or(&PassThroughProcessor {}),
            writer: self.writer.expect("A step requires a writer"),
            transaction_manager: self
                .transaction_manager
                .unwrap_or(&NoOpTransactionManager {}),
            // A chunk holds at least one record
            chunk_size: self.chunk_size.max(1),
            status: Cell::new(StepStatus::Started),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
            filter_count: Cell::new(0),
        }
    }
}
