use crate::error::BatchError;

/// Result of a single read attempt.
///
/// - `Ok(Some(item))`: a record was produced
/// - `Ok(None)`: the source is exhausted (end of stream)
/// - `Err(error)`: the underlying medium is malformed; fatal to the step
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

/// Result of processing a single record.
///
/// - `Ok(Some(item))`: the transformed record
/// - `Ok(None)`: the record is filtered out of the chunk
/// - `Err(error)`: the transformation failed; fatal to the step
pub type ItemProcessorResult<W> = Result<Option<W>, BatchError>;

/// Result of writing a chunk.
pub type ItemWriterResult = Result<(), BatchError>;

/// Retrieval of input for a step, one record at a time.
///
/// Readers must drain their underlying collection or file strictly in input
/// order: repeated calls return consecutive records until `Ok(None)`.
pub trait ItemReader<R> {
    /// Reads the next record, or `Ok(None)` when the source is exhausted.
    fn read(&self) -> ItemReaderResult<R>;
}

/// The business logic applied to each record between read and write.
///
/// Processors are pure functions over their input: no I/O, and processing the
/// same record twice yields the same output. Returning `Ok(None)` drops the
/// record, so a processor maps one input to zero or one output.
pub trait ItemProcessor<R, W> {
    fn process(&self, item: &R) -> ItemProcessorResult<W>;
}

/// Output of a step, one chunk of records at a time.
///
/// A writer must persist the whole slice or fail; callers never observe a
/// partially written chunk.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    /// Called once before the first chunk of the step.
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Called once after the last chunk of the step.
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

/// Identity processor, used when a step is built without an explicit one.
///
/// Passes each record through unchanged, converting via `Into` when the
/// step's output type differs from its input type.
#[derive(Default)]
pub struct PassThroughProcessor {}

impl<R, W> ItemProcessor<R, W> for PassThroughProcessor
where
    R: Clone + Into<W>,
{
    fn process(&self, item: &R) -> ItemProcessorResult<W> {
        Ok(Some(item.clone().into()))
    }
}

/// Uppercases a string record.
#[derive(Default)]
pub struct UpperCaseProcessor {}

impl ItemProcessor<String, String> for UpperCaseProcessor {
    fn process(&self, item: &String) -> ItemProcessorResult<String> {
        Ok(Some(item.to_uppercase()))
    }
}

/// Wraps a string record in braces, e.g. `word` becomes `{word}`.
#[derive(Default)]
pub struct BraceProcessor {}

impl ItemProcessor<String, String> for BraceProcessor {
    fn process(&self, item: &String) -> ItemProcessorResult<String> {
        Ok(Some(format!("{{{}}}", item)))
    }
}
