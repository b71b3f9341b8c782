use std::cell::RefCell;

use minibatch::{
    core::{
        item::{
            BraceProcessor, ItemProcessor, ItemProcessorResult, ItemReader, ItemReaderResult,
            ItemWriter, ItemWriterResult, UpperCaseProcessor,
        },
        job::{Job, JobBuilder, JobStatus},
        step::{Step, StepBuilder, StepInstance, StepStatus},
    },
    item::{
        logger::LoggerWriter,
        store::{RecordStore, StoreItemWriter},
        vec_reader::VecItemReader,
    },
    BatchError,
};

fn words(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("word{}", i)).collect()
}

/// Records every chunk it receives, so tests can observe chunk boundaries.
#[derive(Default)]
struct ChunkRecordingWriter {
    chunks: RefCell<Vec<Vec<String>>>,
}

impl ItemWriter<String> for ChunkRecordingWriter {
    fn write(&self, items: &[String]) -> ItemWriterResult {
        self.chunks.borrow_mut().push(items.to_vec());
        Ok(())
    }
}

#[test]
fn six_words_with_chunk_size_three_commit_as_two_full_chunks() {
    let reader = VecItemReader::new(words(6));
    let processor = UpperCaseProcessor::default();
    let writer = ChunkRecordingWriter::default();

    let step: StepInstance<String, String> = StepBuilder::new()
        .name("upper-case".to_string())
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(3)
        .build();

    let job = JobBuilder::new().start(&step).build();
    let execution = job.run().unwrap();

    assert_eq!(execution.status, JobStatus::Success);
    assert_eq!(step.get_status(), StepStatus::Success);
    assert_eq!(step.get_read_count(), 6);
    assert_eq!(step.get_write_count(), 6);

    let chunks = writer.chunks.borrow();
    assert_eq!(
        *chunks,
        vec![
            vec!["WORD1", "WORD2", "WORD3"],
            vec!["WORD4", "WORD5", "WORD6"],
        ]
    );
}

#[test]
fn trailing_partial_chunk_is_committed() {
    let reader = VecItemReader::new(words(5));
    let writer = ChunkRecordingWriter::default();

    let step: StepInstance<String, String> = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(2)
        .build();

    step.execute();

    // ceil(5 / 2) chunks whose sizes sum to 5, in input order
    let chunks = writer.chunks.borrow();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 5);
    assert_eq!(
        chunks.concat(),
        vec!["word1", "word2", "word3", "word4", "word5"]
    );
}

#[test]
fn empty_source_writes_no_chunks() {
    let reader: VecItemReader<String> = VecItemReader::new(Vec::new());
    let writer = ChunkRecordingWriter::default();

    let step: StepInstance<String, String> = StepBuilder::new()
        .reader(&reader)
        .writer(&writer)
        .chunk(3)
        .build();

    let execution = step.execute();

    assert_eq!(execution.status, StepStatus::Success);
    assert!(writer.chunks.borrow().is_empty());
}

/// Drops every record containing the given needle.
struct FilterProcessor {
    needle: &'static str,
}

impl ItemProcessor<String, String> for FilterProcessor {
    fn process(&self, item: &String) -> ItemProcessorResult<String> {
        if item.contains(self.needle) {
            Ok(None)
        } else {
            Ok(Some(item.clone()))
        }
    }
}

#[test]
fn filtered_records_never_reach_the_writer() {
    let reader = VecItemReader::new(words(6));
    let processor = FilterProcessor { needle: "3" };
    let writer = ChunkRecordingWriter::default();

    let step: StepInstance<String, String> = StepBuilder::new()
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(2)
        .build();

    let execution = step.execute();

    assert_eq!(execution.status, StepStatus::Success);
    assert_eq!(step.get_read_count(), 6);
    assert_eq!(step.get_filter_count(), 1);
    assert_eq!(step.get_write_count(), 5);

    let chunks = writer.chunks.borrow();
    assert_eq!(
        chunks.concat(),
        vec!["word1", "word2", "word4", "word5", "word6"]
    );
    // chunks fill with post-filter records
    assert_eq!(chunks[0].len(), 2);
}

#[test]
fn two_step_job_runs_steps_sequentially() {
    let first_reader = VecItemReader::new(words(6));
    let second_reader = VecItemReader::new(words(6));

    let upper_case = UpperCaseProcessor::default();
    let brace = BraceProcessor::default();

    let store = RecordStore::new();
    let writer = StoreItemWriter::new(&store);

    let step1: StepInstance<String, String> = StepBuilder::new()
        .name("step1".to_string())
        .reader(&first_reader)
        .processor(&upper_case)
        .writer(&writer)
        .transaction_manager(&store)
        .chunk(3)
        .build();

    let step2: StepInstance<String, String> = StepBuilder::new()
        .name("step2".to_string())
        .reader(&second_reader)
        .processor(&brace)
        .writer(&writer)
        .transaction_manager(&store)
        .chunk(3)
        .build();

    let job = JobBuilder::new()
        .name("demo-job".to_string())
        .start(&step1)
        .next(&step2)
        .build();

    let execution = job.run().unwrap();

    assert_eq!(execution.status, JobStatus::Success);
    assert_eq!(step1.get_status(), StepStatus::Success);
    assert_eq!(step2.get_status(), StepStatus::Success);

    // step2 output lands after every step1 record
    let records = store.records();
    assert_eq!(records.len(), 12);
    assert_eq!(records[0], "WORD1");
    assert_eq!(records[5], "WORD6");
    assert_eq!(records[6], "{word1}");
    assert_eq!(records[11], "{word6}");
}

#[test]
fn logger_writer_drains_the_source_as_a_step_sink() {
    let _ = env_logger::builder().is_test(true).try_init();

    let reader = VecItemReader::new(words(4));
    let processor = UpperCaseProcessor::default();
    let writer = LoggerWriter::default();

    let step: StepInstance<String, String> = StepBuilder::new()
        .name("log-words".to_string())
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(2)
        .build();

    let execution = step.execute();

    assert_eq!(execution.status, StepStatus::Success);
    assert_eq!(step.get_read_count(), 4);
    assert_eq!(step.get_write_count(), 4);
}

/// Fails after a fixed number of successful reads.
struct FlakyReader {
    items: VecItemReader<String>,
    fail_after: usize,
    reads: std::cell::Cell<usize>,
}

impl ItemReader<String> for FlakyReader {
    fn read(&self) -> ItemReaderResult<String> {
        if self.reads.get() == self.fail_after {
            return Err(BatchError::ItemReader("unreadable row".to_string()));
        }
        self.reads.set(self.reads.get() + 1);
        self.items.read()
    }
}

#[test]
fn read_error_fails_the_step_without_committing_the_chunk() {
    let reader = FlakyReader {
        items: VecItemReader::new(words(6)),
        fail_after: 2,
        reads: std::cell::Cell::new(0),
    };

    let store = RecordStore::new();
    let writer = StoreItemWriter::new(&store);

    let step: StepInstance<String, String> = StepBuilder::new()
        .name("flaky-read".to_string())
        .reader(&reader)
        .writer(&writer)
        .transaction_manager(&store)
        .chunk(3)
        .build();

    let job = JobBuilder::new().start(&step).build();
    let result = job.run();

    assert!(result.is_err());
    assert_eq!(step.get_status(), StepStatus::Error);
    assert_eq!(step.get_read_count(), 2);
    assert_eq!(step.get_write_count(), 0);
    // the partially filled chunk was never written
    assert!(store.is_empty());
}
