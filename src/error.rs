use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised while configuring a writer or emitting records
pub enum CsvError {
    #[error("Record type '{0}' has no record format and cannot be written as CSV")]
    MissingRecordDescriptor(String),

    #[error("All records must share one type: expected '{expected}', found '{found}'")]
    HeterogeneousSequence { expected: String, found: String },

    #[error("Invalid writer configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Record type '{0}' does not serialize as a struct")]
    UnsupportedRecord(String),

    #[error("Sink failure: {0}")]
    SinkFailure(#[from] io::Error),
}
