use thiserror::Error;

/// Batch error
///
/// Every failure in a batch run maps onto one of these variants. All of them
/// are fatal to the step that raised them: there is no retry or skip policy,
/// the first error aborts the step and the job ends `Failed`.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The reader could not produce the next record (malformed row, broken
    /// medium).
    #[error("ItemReader from: {0}")]
    ItemReader(String),

    /// The processor failed while transforming a record.
    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    /// The writer could not persist a chunk.
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    /// The transaction manager failed to begin, commit or roll back.
    #[error("Transaction from: {0}")]
    Transaction(String),

    /// A job lifecycle listener failed. Logged by the job runner, never
    /// escalated.
    #[error("Listener from: {0}")]
    Listener(String),

    /// A step ended in error; carries the step name.
    #[error("Step failed: {0}")]
    Step(String),
}
