//! CSV and TSV output for declaratively described records.
//!
//! # Module Architecture
//!
//! Writing a sequence of records goes through four steps:
//!
//! 1. **value**: each record is walked once through `serde` to collect its
//!    runtime type name and the canonical string form of every field.
//! 2. **schema**: the first record's fields and its
//!    [`RecordFormat`](crate::core::record::RecordFormat) are resolved into a
//!    [`ColumnPlan`](schema::ColumnPlan): which fields become columns, under
//!    which header, with which masking.
//! 3. **escape**: every header and masked value is made safe for the active
//!    delimiter and line separator.
//! 4. **csv_writer**: [`CsvRecordWriter`](csv_writer::CsvRecordWriter) glues
//!    the above together and appends rows to its sink.
//!
//! # Canonical string forms
//!
//! | Value                         | Rendered as           |
//! |-------------------------------|-----------------------|
//! | integers, floats, bool, char  | `Display` (`123.45`)  |
//! | `None`, `()`                  | empty cell            |
//! | `Vec`, slices, tuples         | `[a, b]`              |
//! | maps                          | `{k=v, k2=v2}`        |
//! | nested structs                | `Name(a=1, b=2)`      |
//! | unit enum variants            | variant name          |
//! | `None` inside a collection    | `null`                |
//!
//! # Examples
//!
//! ```
//! use csv_record_rs::{
//!     core::{
//!         masking::{MaskingPolicy, MaskingStrategy},
//!         naming::NamingStrategy,
//!         record::{CsvRecord, FieldFormat, RecordFormat},
//!     },
//!     item::csv::csv_writer::CsvRecordWriter,
//! };
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Client {
//!     first_name: String,
//!     last_name: String,
//!     account_number: String,
//!     amount_to_pay: f64,
//! }
//!
//! impl CsvRecord for Client {
//!     fn record_format() -> Option<RecordFormat> {
//!         Some(
//!             RecordFormat::new()
//!                 .default_naming(NamingStrategy::CamelToScreamingSnakeCase)
//!                 .field(FieldFormat::new("lastName").transient())
//!                 .field(FieldFormat::new("accountNumber").masked(
//!                     MaskingPolicy::new(MaskingStrategy::PartialPrefix).mask_char('X'),
//!                 )),
//!         )
//!     }
//! }
//!
//! let writer = CsvRecordWriter::new(Vec::new());
//! writer
//!     .write(&[Client {
//!         first_name: "TestFirstName".to_string(),
//!         last_name: "Ignored".to_string(),
//!         account_number: "1234567890123456".to_string(),
//!         amount_to_pay: 123.45,
//!     }])
//!     .unwrap();
//!
//! let csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(
//!     csv,
//!     "FIRST_NAME,ACCOUNT_NUMBER,AMOUNT_TO_PAY\nTestFirstName,1234XXXXXXXXXXXX,123.45\n"
//! );
//! ```

/// Writer for records.
pub mod csv_writer;

/// Quoting of cell values.
pub mod escape;

/// Column plans derived from record types.
pub mod schema;

mod value;
