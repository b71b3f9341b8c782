#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Minibatch

 A lightweight toolkit for chunk-oriented batch processing: read records from
 a source, transform them one at a time, and commit them in fixed-size groups.

 ## Core Concepts

 - **Job:** The entire batch process; a sequence of steps executed in order,
   with lifecycle listeners notified at start and end.
 - **Step:** One pipeline stage: read, process, write, in chunks.
 - **ItemReader:** Retrieval of input for a step, one record at a time, in
   input order.
 - **ItemProcessor:** The business logic applied to each record; a pure
   function that may also filter the record out.
 - **ItemWriter:** Output of a step, one chunk of records at a time. Each
   chunk is written inside a transaction scope: committed on success, rolled
   back on any error.

 Execution is single-threaded and fail-fast: the first read, process or
 write error aborts the step and fails the job. There are no retry or skip
 policies.

 ## Features

 | **Feature** | **Description**                                      |
 |-------------|------------------------------------------------------|
 | csv         | Enables the CSV `ItemReader` for delimited files     |
 | logger      | Enables a logger `ItemWriter`, useful for debugging  |
 | full        | Enables all available features                       |

 The in-memory reader, the record store and the classification components
 are always available.

 ## Getting Started

```rust
use minibatch::{
    core::{
        item::UpperCaseProcessor,
        job::{Job, JobBuilder, JobStatus},
        step::{Step, StepBuilder, StepInstance, StepStatus},
    },
    item::{
        store::{RecordStore, StoreItemWriter},
        vec_reader::VecItemReader,
    },
    BatchError,
};

fn main() -> Result<(), BatchError> {
    let reader = VecItemReader::new(vec![
        "word1".to_string(),
        "word2".to_string(),
        "word3".to_string(),
        "word4".to_string(),
        "word5".to_string(),
        "word6".to_string(),
    ]);

    let processor = UpperCaseProcessor::default();

    let store = RecordStore::new();
    let writer = StoreItemWriter::new(&store);

    let step: StepInstance<String, String> = StepBuilder::new()
        .name("upper-case-words".to_string())
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .transaction_manager(&store) // commit each chunk against the store
        .chunk(3) // commit interval
        .build();

    let job = JobBuilder::new().start(&step).build();
    let execution = job.run()?;

    assert_eq!(execution.status, JobStatus::Success);
    assert_eq!(step.get_status(), StepStatus::Success);
    assert_eq!(store.records().first().map(String::as_str), Some("WORD1"));

    Ok(())
}
```
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of item readers / writers (for example: the CSV reader and the record
/// store writer)
pub mod item;
