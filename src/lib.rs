#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # CSV Record Writer for Rust

 Write sequences of your own record types as CSV or TSV. Columns are derived
 from the record's `serde::Serialize` implementation; headers, exclusions and
 masking are declared once per record type.

 ## Core Concepts

- **CsvRecord:** A record type that can be written. It serializes as a struct and
  supplies a `RecordFormat`.
- **RecordFormat:** The record-level directive: default `NamingStrategy`, whether to
  write a header row, and per-field `FieldFormat`s.
- **FieldFormat:** Per-field directive: explicit header, field naming strategy,
  transient marker, `MaskingPolicy`.
- **ColumnPlan:** The ordered columns resolved from a record type for one write.
- **CsvRecordWriter:** An `ItemWriter` that resolves the plan, masks and escapes values
  and appends rows to any `std::io::Write` sink.

 ## Output format

- one row per line, terminated by the configured line separator (default `\n`)
- cells separated by a single delimiter character (default `,`, TAB for TSV)
- a cell is quoted when it contains the delimiter, `\r`, `\n`, `"` or the line
  separator; embedded `"` are doubled
- no byte order mark

 ## Getting Started

```rust
# use serde::Serialize;
# use csv_record_rs::{
#     core::{
#         masking::{MaskingPolicy, MaskingStrategy},
#         naming::NamingStrategy,
#         record::{CsvRecord, FieldFormat, RecordFormat},
#     },
#     error::CsvError,
#     item::csv::csv_writer::CsvRecordWriterBuilder,
# };
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    first_name: String,
    last_name: String,
    card_number: String,
}

impl CsvRecord for Person {
    fn record_format() -> Option<RecordFormat> {
        Some(
            RecordFormat::new()
                .default_naming(NamingStrategy::AsIsToSpaceSeparatedCapitalized)
                .field(FieldFormat::new("cardNumber").masked(
                    MaskingPolicy::new(MaskingStrategy::PartialSuffix),
                )),
        )
    }
}

fn main() -> Result<(), CsvError> {
    let writer = CsvRecordWriterBuilder::new()
        .delimiter(';')
        .from_writer(Vec::new())?;

    writer.write(&[Person {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        card_number: "4111111111111111".to_string(),
    }])?;

    let csv = String::from_utf8(writer.into_inner()?).unwrap();
    assert_eq!(
        csv,
        "First Name;Last Name;Card Number\nGrace;Hopper;************1111\n"
    );

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 */

/// Core module: writer contract, records, naming and masking
pub mod core;

/// Error types for record writing
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items writers
pub mod item;

#[doc(inline)]
pub use item::csv::csv_writer::{CsvRecordWriter, CsvRecordWriterBuilder, CsvWriterConfig};
