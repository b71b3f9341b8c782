use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator, Trim};
use serde::de::DeserializeOwned;
use std::{cell::RefCell, fs::File, io::Read, path::Path};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A reader that deserializes CSV rows into Rust structs.
///
/// Rows are read one at a time through serde, so the input streams without
/// being loaded into memory. Any malformed row (wrong field count, field
/// that fails to parse) surfaces as `BatchError::ItemReader`, which is fatal
/// to the step: there is no row-level skip.
///
/// # Type Parameters
///
/// - `R`: The source of the CSV data. Must implement `Read`.
pub struct CsvItemReader<R> {
    /// Iterator over the CSV records.
    ///
    /// `RefCell` gives interior mutability so the iterator can advance while
    /// `read` takes `&self`, as the `ItemReader` trait requires.
    records: RefCell<StringRecordsIntoIter<R>>,
}

impl<R: Read, T: DeserializeOwned> ItemReader<T> for CsvItemReader<R> {
    /// Reads and deserializes the next row.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a row was read and deserialized
    /// - `Ok(None)` when the input is exhausted
    /// - `Err(BatchError::ItemReader(..))` on a malformed row
    fn read(&self) -> ItemReaderResult<T> {
        if let Some(result) = self.records.borrow_mut().next() {
            match result {
                Ok(string_record) => {
                    let result: Result<T, _> = string_record.deserialize(None);

                    match result {
                        Ok(record) => Ok(Some(record)),
                        Err(error) => Err(BatchError::ItemReader(error.to_string())),
                    }
                }
                Err(error) => Err(BatchError::ItemReader(error.to_string())),
            }
        } else {
            Ok(None)
        }
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Terminator: CRLF
/// - Headers: disabled
/// - Trimming: all fields trimmed
///
/// # Examples
///
/// ```
/// use minibatch::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let reader = CsvItemReaderBuilder::new()
///     .delimiter(b';')
///     .has_headers(true)
///     .from_reader("name;age\nAlice;30".as_bytes());
/// ```
#[derive(Default)]
pub struct CsvItemReaderBuilder {
    delimiter: u8,
    terminator: Terminator,
    has_headers: bool,
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
            has_headers: false,
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the line terminator.
    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets whether the first row is a header row. When enabled the header
    /// is skipped and not returned as data.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Creates a `CsvItemReader` from any `Read` source (a file, a string,
    /// a network stream).
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            .flexible(false) // strict parsing: a wrong field count is an error
            .from_reader(rdr);

        CsvItemReader {
            records: RefCell::new(rdr.into_records()),
        }
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Panics
    /// Panics if the file cannot be opened; opening the source is an
    /// initialization step, not a per-row read.
    pub fn from_path<R: AsRef<Path>>(self, path: R) -> CsvItemReader<File> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            .flexible(false)
            .from_path(path);

        CsvItemReader {
            records: RefCell::new(rdr.expect("Unable to open file").into_records()),
        }
    }
}
