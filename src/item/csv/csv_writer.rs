use std::{
    borrow::Cow,
    cell::RefCell,
    io::{self, Write},
};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    escape::escape,
    schema::ColumnPlan,
    value::{RecordSnapshot, record_type, snapshot},
};
use crate::{
    core::{
        item::{ItemWriter, ItemWriterResult},
        record::CsvRecord,
    },
    error::CsvError,
};

pub const DEFAULT_DELIMITER: char = ',';
pub const TSV_DELIMITER: char = '\t';
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// Delimiter and line separator used by a [`CsvRecordWriter`].
///
/// Missing keys take their defaults when deserialized:
///
/// ```
/// use csv_record_rs::item::csv::csv_writer::CsvWriterConfig;
///
/// let config: CsvWriterConfig = serde_json::from_str(r#"{ "delimiter": ";" }"#).unwrap();
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.line_separator, "\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvWriterConfig {
    pub delimiter: char,
    pub line_separator: String,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        CsvWriterConfig {
            delimiter: DEFAULT_DELIMITER,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }
}

impl CsvWriterConfig {
    /// Tab separated values with the default line separator.
    pub fn tsv() -> Self {
        CsvWriterConfig {
            delimiter: TSV_DELIMITER,
            ..CsvWriterConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), CsvError> {
        if self.line_separator.is_empty() {
            return Err(CsvError::InvalidConfiguration(
                "line separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Writes sequences of [`CsvRecord`]s as delimited text.
///
/// Each call to [`write`](CsvRecordWriter::write) derives the columns from
/// the first present record, writes the header row when the record format
/// asks for it, then one row per record.
///
/// ```
/// use csv_record_rs::{
///     core::{naming::NamingStrategy, record::{CsvRecord, RecordFormat}},
///     item::csv::csv_writer::CsvRecordWriter,
/// };
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Person {
///     first_name: String,
///     year_of_birth: u16,
/// }
///
/// impl CsvRecord for Person {
///     fn record_format() -> Option<RecordFormat> {
///         Some(RecordFormat::new().default_naming(NamingStrategy::CamelToSnakeCase))
///     }
/// }
///
/// let writer = CsvRecordWriter::new(Vec::new());
/// writer
///     .write(&[
///         Person { first_name: "Ada".to_string(), year_of_birth: 1815 },
///         Person { first_name: "Alan".to_string(), year_of_birth: 1912 },
///     ])
///     .unwrap();
///
/// let csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(csv, "first_name,year_of_birth\nAda,1815\nAlan,1912\n");
/// ```
pub struct CsvRecordWriter<W: Write> {
    sink: RefCell<Option<W>>,
    delimiter: char,
    line_separator: String,
}

impl<W: Write> CsvRecordWriter<W> {
    /// Comma delimited, `\n` terminated.
    pub fn new(sink: W) -> Self {
        Self::unchecked(sink, CsvWriterConfig::default())
    }

    pub fn with_delimiter(sink: W, delimiter: char) -> Self {
        Self::unchecked(
            sink,
            CsvWriterConfig {
                delimiter,
                ..CsvWriterConfig::default()
            },
        )
    }

    /// # Errors
    ///
    /// [`CsvError::InvalidConfiguration`] when `line_separator` is empty.
    pub fn with_delimiter_and_line_separator(
        sink: W,
        delimiter: char,
        line_separator: impl Into<String>,
    ) -> Result<Self, CsvError> {
        Self::from_config(
            sink,
            CsvWriterConfig {
                delimiter,
                line_separator: line_separator.into(),
            },
        )
    }

    /// Tab delimited, `\n` terminated.
    pub fn tsv(sink: W) -> Self {
        Self::unchecked(sink, CsvWriterConfig::tsv())
    }

    pub fn from_config(sink: W, config: CsvWriterConfig) -> Result<Self, CsvError> {
        config.validate()?;
        Ok(Self::unchecked(sink, config))
    }

    fn unchecked(sink: W, config: CsvWriterConfig) -> Self {
        CsvRecordWriter {
            sink: RefCell::new(Some(sink)),
            delimiter: config.delimiter,
            line_separator: config.line_separator,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }

    /// Writes an optional header row and one row per record.
    ///
    /// Nothing is written when `items` is empty, when its first element is
    /// absent (`None`), or when the record has no columns. An absent element
    /// after the first produces a row of empty cells.
    ///
    /// # Errors
    ///
    /// - [`CsvError::MissingRecordDescriptor`] when `R` has no record format,
    ///   checked before any field is read
    /// - [`CsvError::HeterogeneousSequence`] when an element's runtime type
    ///   differs from the first element's (e.g. two variants of an enum)
    /// - [`CsvError::UnsupportedRecord`] when `R` does not serialize as a struct
    /// - [`CsvError::SinkFailure`] when a field cannot be read or the sink fails
    ///
    /// Rows written before an error stay in the sink.
    pub fn write<R: CsvRecord>(&self, items: &[R]) -> ItemWriterResult {
        let Some((first, rest)) = items.split_first() else {
            return Ok(());
        };
        let type_name = match record_type(first) {
            Ok(Some(name)) | Err(CsvError::UnsupportedRecord(name)) => name,
            Ok(None) => {
                debug!("First record is absent, nothing to write");
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        let Some(format) = R::record_format() else {
            return Err(CsvError::MissingRecordDescriptor(type_name));
        };

        let Some(first) = snapshot(first)? else {
            return Ok(());
        };
        let plan = ColumnPlan::resolve(&first.type_name, Some(&format), &first.field_names())?;
        if plan.is_empty() {
            debug!("Record type '{}' has no columns to write", plan.type_name());
            return Ok(());
        }

        if plan.include_header() {
            let headers: Vec<Cow<str>> = plan
                .headers()
                .map(|header| escape(header, self.delimiter, &self.line_separator))
                .collect();
            self.write_row(Some(headers.as_slice()))?;
            debug!("Header written for record type '{}'", plan.type_name());
        }

        self.write_record(&plan, &first)?;

        let blank = vec![""; plan.len()];
        for item in rest {
            match snapshot(item)? {
                None => self.write_row(Some(blank.as_slice()))?,
                Some(record) if record.type_name != plan.type_name() => {
                    return Err(CsvError::HeterogeneousSequence {
                        expected: plan.type_name().to_string(),
                        found: record.type_name,
                    });
                }
                Some(record) => self.write_record(&plan, &record)?,
            }
        }

        debug!(
            "{} rows written for record type '{}'",
            items.len(),
            plan.type_name()
        );
        Ok(())
    }

    fn write_record(&self, plan: &ColumnPlan, record: &RecordSnapshot) -> ItemWriterResult {
        let cells: Vec<String> = plan
            .columns()
            .iter()
            .map(|column| match record.value_of(column.field()) {
                Some(value) => {
                    escape(&column.mask(value), self.delimiter, &self.line_separator).into_owned()
                }
                None => String::new(),
            })
            .collect();

        self.write_row(Some(cells.as_slice()))
    }

    /// Writes already escaped cells separated by the delimiter, then the line
    /// separator. `None` writes a bare line separator.
    fn write_row<S: AsRef<str>>(&self, cells: Option<&[S]>) -> ItemWriterResult {
        let mut line = String::new();

        if let Some(cells) = cells {
            for (index, cell) in cells.iter().enumerate() {
                if index > 0 {
                    line.push(self.delimiter);
                }
                line.push_str(cell.as_ref());
            }
        }
        line.push_str(&self.line_separator);

        self.with_sink(|sink| sink.write_all(line.as_bytes()))
    }

    fn with_sink<T>(&self, op: impl FnOnce(&mut W) -> io::Result<T>) -> Result<T, CsvError> {
        let mut sink = self.sink.borrow_mut();
        let sink = sink.as_mut().ok_or_else(closed)?;
        Ok(op(sink)?)
    }

    /// Flushes the sink.
    pub fn flush(&self) -> ItemWriterResult {
        self.with_sink(|sink| sink.flush())
    }

    /// Flushes and releases the sink. Only the first call has an effect;
    /// writing afterwards fails with [`CsvError::SinkFailure`].
    pub fn close(&self) -> ItemWriterResult {
        let sink = self.sink.borrow_mut().take();
        match sink {
            Some(mut sink) => {
                debug!("Closing CSV writer");
                sink.flush()?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Flushes the sink and hands it back.
    pub fn into_inner(self) -> Result<W, CsvError> {
        let mut sink = self.sink.borrow_mut().take().ok_or_else(closed)?;
        sink.flush()?;
        Ok(sink)
    }
}

fn closed() -> io::Error {
    io::Error::other("CSV writer is closed")
}

impl<W: Write> Drop for CsvRecordWriter<W> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.get_mut() {
            let _ = sink.flush();
        }
    }
}

impl<W: Write, R: CsvRecord> ItemWriter<R> for CsvRecordWriter<W> {
    fn write(&self, items: &[R]) -> ItemWriterResult {
        CsvRecordWriter::write(self, items)
    }

    fn flush(&self) -> ItemWriterResult {
        CsvRecordWriter::flush(self)
    }

    fn close(&self) -> ItemWriterResult {
        CsvRecordWriter::close(self)
    }
}

/// Builder for [`CsvRecordWriter`].
///
/// ```
/// use csv_record_rs::item::csv::csv_writer::CsvRecordWriterBuilder;
///
/// let writer = CsvRecordWriterBuilder::new()
///     .delimiter(';')
///     .line_separator("\r\n")
///     .from_writer(Vec::new())
///     .unwrap();
///
/// assert_eq!(writer.delimiter(), ';');
/// assert_eq!(writer.line_separator(), "\r\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvRecordWriterBuilder {
    config: CsvWriterConfig,
}

impl CsvRecordWriterBuilder {
    pub fn new() -> CsvRecordWriterBuilder {
        CsvRecordWriterBuilder {
            config: CsvWriterConfig::default(),
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> CsvRecordWriterBuilder {
        self.config.delimiter = delimiter;
        self
    }

    pub fn line_separator(mut self, line_separator: impl Into<String>) -> CsvRecordWriterBuilder {
        self.config.line_separator = line_separator.into();
        self
    }

    /// Switches to tab separated output.
    pub fn tsv(mut self) -> CsvRecordWriterBuilder {
        self.config.delimiter = TSV_DELIMITER;
        self
    }

    pub fn config(mut self, config: CsvWriterConfig) -> CsvRecordWriterBuilder {
        self.config = config;
        self
    }

    /// # Errors
    ///
    /// [`CsvError::InvalidConfiguration`] when the line separator is empty.
    pub fn from_writer<W: Write>(self, wtr: W) -> Result<CsvRecordWriter<W>, CsvError> {
        CsvRecordWriter::from_config(wtr, self.config)
    }
}
