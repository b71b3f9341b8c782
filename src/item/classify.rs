use crate::core::item::{ItemProcessor, ItemProcessorResult, ItemWriter, ItemWriterResult};

/// A record carrying the reason it was rejected, alongside the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected<T> {
    pub record: T,
    pub reason: String,
}

/// Outcome of classifying a record: the same base record either way, plus a
/// failure reason on the rejected side.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<T> {
    Accepted(T),
    Rejected(Rejected<T>),
}

impl<T> Classified<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classified::Accepted(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Classified::Accepted(record) => record,
            Classified::Rejected(rejected) => &rejected.record,
        }
    }
}

/// A record that was never run through a classifier counts as accepted.
impl<T> From<T> for Classified<T> {
    fn from(record: T) -> Self {
        Classified::Accepted(record)
    }
}

/// A processor that routes each record to `Accepted` or `Rejected` based on
/// a validation function.
///
/// The validation function returns `Ok(())` for a valid record, or the
/// rejection reason. The processor never drops records: every input comes
/// out as one of the two variants.
///
/// # Examples
///
/// ```
/// use minibatch::core::item::ItemProcessor;
/// use minibatch::item::classify::{Classified, ClassifyProcessor};
///
/// let classifier = ClassifyProcessor::new(|amount: &f64| {
///     if *amount > 0.0 {
///         Ok(())
///     } else {
///         Err("Invalid amount".to_string())
///     }
/// });
///
/// let accepted = classifier.process(&50.0).unwrap().unwrap();
/// assert!(accepted.is_accepted());
///
/// let rejected = classifier.process(&-5.0).unwrap().unwrap();
/// assert!(!rejected.is_accepted());
/// ```
pub struct ClassifyProcessor<F> {
    validate: F,
}

impl<F> ClassifyProcessor<F> {
    pub fn new(validate: F) -> Self {
        Self { validate }
    }
}

impl<T, F> ItemProcessor<T, Classified<T>> for ClassifyProcessor<F>
where
    T: Clone,
    F: Fn(&T) -> Result<(), String>,
{
    fn process(&self, item: &T) -> ItemProcessorResult<Classified<T>> {
        match (self.validate)(item) {
            Ok(()) => Ok(Some(Classified::Accepted(item.clone()))),
            Err(reason) => Ok(Some(Classified::Rejected(Rejected {
                record: item.clone(),
                reason,
            }))),
        }
    }
}

/// A fan-out writer that dispatches each classified record to one of two
/// destinations by matching on its variant.
///
/// One chunk, two destinations: the accepted records of the chunk go to the
/// accepted writer, the rejected ones to the rejected writer, within the
/// same write call so the chunk still commits as a unit.
pub struct ClassifierWriter<'a, T> {
    accepted: &'a dyn ItemWriter<T>,
    rejected: &'a dyn ItemWriter<Rejected<T>>,
}

impl<'a, T> ClassifierWriter<'a, T> {
    pub fn new(
        accepted: &'a impl ItemWriter<T>,
        rejected: &'a impl ItemWriter<Rejected<T>>,
    ) -> Self {
        Self { accepted, rejected }
    }
}

impl<T: Clone> ItemWriter<Classified<T>> for ClassifierWriter<'_, T> {
    fn write(&self, items: &[Classified<T>]) -> ItemWriterResult {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for item in items {
            match item {
                Classified::Accepted(record) => accepted.push(record.clone()),
                Classified::Rejected(record) => rejected.push(record.clone()),
            }
        }

        if !accepted.is_empty() {
            self.accepted.write(&accepted)?;
        }
        if !rejected.is_empty() {
            self.rejected.write(&rejected)?;
        }
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        self.accepted.open()?;
        self.rejected.open()
    }

    fn close(&self) -> ItemWriterResult {
        self.accepted.close()?;
        self.rejected.close()
    }
}
