#![allow(dead_code)]

pub mod mocks;

use csv_record_rs::core::{
    masking::{MaskingPolicy, MaskingStrategy},
    naming::NamingStrategy,
    record::{CsvRecord, FieldFormat, RecordFormat},
};
use serde::Serialize;

pub use mocks::MockSink;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub day_of_birth: u8,
    pub month_of_birth: u8,
    pub year_of_birth: u16,
}

impl CsvRecord for Person {
    fn record_format() -> Option<RecordFormat> {
        Some(RecordFormat::new().default_naming(NamingStrategy::AsIsToSpaceSeparatedCapitalized))
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub first_name: String,
    pub last_name: String,
    pub account_number: String,
    pub amount_to_pay: f64,
}

impl CsvRecord for Client {
    fn record_format() -> Option<RecordFormat> {
        Some(
            RecordFormat::new()
                .default_naming(NamingStrategy::CamelToScreamingSnakeCase)
                .field(FieldFormat::new("lastName").transient())
                .field(
                    FieldFormat::new("accountNumber").masked(
                        MaskingPolicy::new(MaskingStrategy::PartialPrefix).mask_char('X'),
                    ),
                ),
        )
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Student {
    pub name: String,
    pub score: Vec<String>,
}

impl CsvRecord for Student {
    fn record_format() -> Option<RecordFormat> {
        Some(RecordFormat::new().default_naming(NamingStrategy::CamelToSnakeCase))
    }
}

/// A record type without a record format.
#[derive(Serialize, Debug, Clone)]
pub struct Foo {
    pub x: i32,
}

impl CsvRecord for Foo {}

pub fn person(first_name: &str, last_name: &str, year_of_birth: u16) -> Person {
    Person {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        day_of_birth: 1,
        month_of_birth: 6,
        year_of_birth,
    }
}

pub fn client(first_name: &str, account_number: &str, amount_to_pay: f64) -> Client {
    Client {
        first_name: first_name.to_string(),
        last_name: "Ignored".to_string(),
        account_number: account_number.to_string(),
        amount_to_pay,
    }
}

pub fn student(name: &str, score: &[&str]) -> Student {
    Student {
        name: name.to_string(),
        score: score.iter().map(|s| s.to_string()).collect(),
    }
}

/// Writes `items` with a default comma/`\n` writer and returns the output.
pub fn write_to_string<R: CsvRecord>(items: &[R]) -> String {
    let writer = csv_record_rs::CsvRecordWriter::new(Vec::new());
    writer.write(items).expect("write should succeed");
    String::from_utf8(writer.into_inner().expect("sink should be returned"))
        .expect("output should be UTF-8")
}
