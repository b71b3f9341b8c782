/// CSV support for reading delimited, tabular input.
///
/// The reader deserializes each row into a Rust struct through serde, so a
/// fixed column schema maps onto named struct fields. A header row can be
/// skipped with `has_headers(true)`. Parsing is strict: a row with the wrong
/// field count or an unparsable field fails the read, which aborts the step.
///
/// # Examples
///
/// ```
/// use minibatch::item::csv::csv_reader::CsvItemReaderBuilder;
/// use minibatch::core::item::ItemReader;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Employee {
///     id: u32,
///     name: String,
///     dept: String,
///     salary: f64,
/// }
///
/// let data = "\
/// id,name,dept,salary
/// 1,Alice,001,4200.0
/// 2,Bob,002,3900.5
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .has_headers(true)
///     .delimiter(b',')
///     .from_reader(data.as_bytes());
///
/// let mut employees: Vec<Employee> = Vec::new();
/// while let Some(employee) = reader.read().unwrap() {
///     employees.push(employee);
/// }
///
/// assert_eq!(employees.len(), 2);
/// assert_eq!(employees[0].name, "Alice");
/// assert_eq!(employees[1].salary, 3900.5);
/// ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;
