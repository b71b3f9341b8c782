use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{build_name, step::Step, step::StepStatus};

/// Type alias for job execution results.
pub type JobResult<T> = Result<T, BatchError>;

/// Terminal status of a job run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobStatus {
    /// The job is running.
    Started,
    /// Every step completed.
    Success,
    /// A step failed; the remaining steps were not executed.
    Failed,
}

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps executed in definition order.
/// The job orchestrates the steps and reports the overall result.
pub trait Job {
    /// Runs the job.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step succeeds
    /// - `Err(BatchError::Step(name))` naming the first failed step
    fn run(&self) -> JobResult<JobExecution>;
}

/// Identity and outcome of one job run.
#[derive(Debug)]
pub struct JobExecution {
    /// Unique identifier of the job instance
    pub id: Uuid,
    /// Human-readable job name
    pub name: String,
    /// Status of the run; terminal value is `Success` or `Failed`
    pub status: JobStatus,
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

/// Callbacks around the job lifecycle.
///
/// `before_job` runs before the first step, `after_job` after the last step
/// or upon abort, with the terminal status filled in. Listener errors are
/// logged by the job runner and do not change the job outcome.
pub trait JobExecutionListener {
    fn before_job(&self, _execution: &JobExecution) -> Result<(), BatchError> {
        Ok(())
    }

    fn after_job(&self, _execution: &JobExecution) -> Result<(), BatchError> {
        Ok(())
    }
}

/// A configured job: named sequence of steps plus lifecycle listeners.
///
/// Built once through the `JobBuilder` and stateless across runs; re-running
/// the same pipeline needs fresh readers since steps drain their sources.
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
    listeners: Vec<&'a dyn JobExecutionListener>,
}

impl Job for JobInstance<'_> {
    /// Runs the steps strictly in sequence, aborting on the first failure.
    ///
    /// `after_job` is invoked exactly once with the terminal status, on both
    /// the success and the abort path.
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        let mut execution = JobExecution {
            id: self.id,
            name: self.name.clone(),
            status: JobStatus::Started,
            start,
            end: start,
            duration: Duration::ZERO,
        };

        info!("Start of job: {}, id: {}", self.name, self.id);
        self.notify_before(&execution);

        let mut failed_step = None;
        for step in &self.steps {
            let result = step.execute();

            if result.status == StepStatus::Error {
                failed_step = Some(step.get_name().to_owned());
                break;
            }
        }

        execution.status = match failed_step {
            Some(_) => JobStatus::Failed,
            None => JobStatus::Success,
        };
        execution.end = Instant::now();
        execution.duration = start.elapsed();

        self.notify_after(&execution);

        match failed_step {
            Some(name) => {
                error!("End of job: {}, id: {}, status: Failed", self.name, self.id);
                Err(BatchError::Step(name))
            }
            None => {
                info!(
                    "End of job: {}, id: {}, status: Success",
                    self.name, self.id
                );
                Ok(execution)
            }
        }
    }
}

impl JobInstance<'_> {
    fn notify_before(&self, execution: &JobExecution) {
        for listener in &self.listeners {
            if let Err(err) = listener.before_job(execution) {
                error!("Error occured in before_job listener: {}", err);
            }
        }
    }

    fn notify_after(&self, execution: &JobExecution) {
        for listener in &self.listeners {
            if let Err(err) = listener.after_job(execution) {
                error!("Error occured in after_job listener: {}", err);
            }
        }
    }
}

/// Builder for a job instance.
///
/// # Example
///
/// ```rust,no_run,compile_fail
/// let job = JobBuilder::new()
///     .name("import-transactions".to_string())
///     .start(&read_step)
///     .next(&classify_step)
///     .listener(&completion_listener)
///     .build();
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
    listeners: Vec<&'a dyn JobExecutionListener>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Sets the name of the job. A random name is generated if not set.
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps execute in the order they were added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Registers a lifecycle listener.
    pub fn listener(mut self, listener: &'a dyn JobExecutionListener) -> JobBuilder<'a> {
        self.listeners.push(listener);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
            listeners: self.listeners,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::Result;

    use crate::{
        core::{
            item::UpperCaseProcessor,
            step::{StepBuilder, StepInstance},
        },
        item::{store::StoreItemWriter, vec_reader::VecItemReader},
    };

    use super::*;

    #[derive(Default)]
    struct CountingListener {
        before_count: Cell<usize>,
        after_count: Cell<usize>,
        last_status: Cell<Option<JobStatus>>,
    }

    impl JobExecutionListener for CountingListener {
        fn before_job(&self, _execution: &JobExecution) -> Result<(), BatchError> {
            self.before_count.set(self.before_count.get() + 1);
            Ok(())
        }

        fn after_job(&self, execution: &JobExecution) -> Result<(), BatchError> {
            self.after_count.set(self.after_count.get() + 1);
            self.last_status.set(Some(execution.status));
            Ok(())
        }
    }

    #[test]
    fn job_runs_steps_in_definition_order() -> Result<()> {
        let words = VecItemReader::new(vec!["word1".to_string(), "word2".to_string()]);
        let more_words = VecItemReader::new(vec!["word3".to_string()]);

        let processor = UpperCaseProcessor::default();

        let first_store = crate::item::store::RecordStore::new();
        let second_store = crate::item::store::RecordStore::new();
        let first_writer = StoreItemWriter::new(&first_store);
        let second_writer = StoreItemWriter::new(&second_store);

        let step1: StepInstance<String, String> = StepBuilder::new()
            .name("step1".to_string())
            .reader(&words)
            .processor(&processor)
            .writer(&first_writer)
            .transaction_manager(&first_store)
            .chunk(2)
            .build();

        let step2: StepInstance<String, String> = StepBuilder::new()
            .name("step2".to_string())
            .reader(&more_words)
            .processor(&processor)
            .writer(&second_writer)
            .transaction_manager(&second_store)
            .chunk(2)
            .build();

        let listener = CountingListener::default();

        let job = JobBuilder::new()
            .name("two-step-job".to_string())
            .start(&step1)
            .next(&step2)
            .listener(&listener)
            .build();

        let execution = job.run()?;

        assert_eq!(execution.status, JobStatus::Success);
        assert_eq!(execution.name, "two-step-job");
        assert_eq!(
            first_store.records(),
            vec!["WORD1".to_string(), "WORD2".to_string()]
        );
        assert_eq!(second_store.records(), vec!["WORD3".to_string()]);
        assert_eq!(listener.before_count.get(), 1);
        assert_eq!(listener.after_count.get(), 1);
        assert_eq!(listener.last_status.get(), Some(JobStatus::Success));

        Ok(())
    }
}
