use serde::Serialize;

use super::{masking::MaskingPolicy, naming::NamingStrategy};

/// A type that can be written as CSV rows.
///
/// Columns come from the type's `Serialize` implementation: one column per
/// serialized field, in declaration order, named after the serialized field
/// name. [`record_format`](CsvRecord::record_format) supplies the record-level
/// directive; a type that keeps the default (`None`) is rejected by writers
/// with [`CsvError::MissingRecordDescriptor`](crate::CsvError::MissingRecordDescriptor).
///
/// `#[serde(flatten)]` is not supported: serde writes such a struct as a map,
/// and writers reject it with
/// [`CsvError::UnsupportedRecord`](crate::CsvError::UnsupportedRecord).
/// A field left out by `skip_serializing_if` keeps its column and gets an
/// empty cell.
///
/// ```
/// use csv_record_rs::core::{
///     masking::{MaskingPolicy, MaskingStrategy},
///     naming::NamingStrategy,
///     record::{CsvRecord, FieldFormat, RecordFormat},
/// };
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Client {
///     first_name: String,
///     last_name: String,
///     account_number: String,
/// }
///
/// impl CsvRecord for Client {
///     fn record_format() -> Option<RecordFormat> {
///         Some(
///             RecordFormat::new()
///                 .default_naming(NamingStrategy::CamelToScreamingSnakeCase)
///                 .field(FieldFormat::new("lastName").transient())
///                 .field(
///                     FieldFormat::new("accountNumber")
///                         .masked(MaskingPolicy::new(MaskingStrategy::PartialPrefix)),
///                 ),
///         )
///     }
/// }
/// ```
pub trait CsvRecord: Serialize {
    fn record_format() -> Option<RecordFormat> {
        None
    }
}

impl<T: CsvRecord> CsvRecord for Option<T> {
    fn record_format() -> Option<RecordFormat> {
        T::record_format()
    }
}

impl<T: CsvRecord + ?Sized> CsvRecord for &T {
    fn record_format() -> Option<RecordFormat> {
        T::record_format()
    }
}

impl<T: CsvRecord + ?Sized> CsvRecord for Box<T> {
    fn record_format() -> Option<RecordFormat> {
        T::record_format()
    }
}

/// Record-level directive: default naming, header switch and the per-field
/// directives of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFormat {
    default_naming: NamingStrategy,
    include_header: bool,
    fields: Vec<FieldFormat>,
}

impl Default for RecordFormat {
    fn default() -> Self {
        RecordFormat::new()
    }
}

impl RecordFormat {
    pub fn new() -> RecordFormat {
        RecordFormat {
            default_naming: NamingStrategy::AsIs,
            include_header: true,
            fields: Vec::new(),
        }
    }

    pub fn default_naming(mut self, strategy: NamingStrategy) -> RecordFormat {
        self.default_naming = strategy;
        self
    }

    pub fn include_header(mut self, yes: bool) -> RecordFormat {
        self.include_header = yes;
        self
    }

    /// Adds a per-field directive. A later directive for the same field
    /// replaces the earlier one.
    pub fn field(mut self, field: FieldFormat) -> RecordFormat {
        self.fields.retain(|existing| existing.field != field.field);
        self.fields.push(field);
        self
    }

    pub fn naming(&self) -> NamingStrategy {
        self.default_naming
    }

    pub fn has_header(&self) -> bool {
        self.include_header
    }

    /// Directive attached to the field with the given declared name.
    pub fn field_format(&self, name: &str) -> Option<&FieldFormat> {
        self.fields.iter().find(|field| field.field == name)
    }

    pub fn field_formats(&self) -> &[FieldFormat] {
        &self.fields
    }
}

/// Per-field directive, keyed by the field's declared (serialized) name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFormat {
    field: String,
    header: Option<String>,
    naming: Option<NamingStrategy>,
    transient: bool,
    masking: Option<MaskingPolicy>,
}

impl FieldFormat {
    pub fn new(field: impl Into<String>) -> FieldFormat {
        FieldFormat {
            field: field.into(),
            header: None,
            naming: None,
            transient: false,
            masking: None,
        }
    }

    /// Explicit header text, written as is. An empty header is ignored.
    pub fn header(mut self, header: impl Into<String>) -> FieldFormat {
        self.header = Some(header.into());
        self
    }

    /// Naming strategy for this field only, overriding the record default.
    pub fn naming(mut self, strategy: NamingStrategy) -> FieldFormat {
        self.naming = Some(strategy);
        self
    }

    /// Leaves the field out of the output.
    pub fn transient(mut self) -> FieldFormat {
        self.transient = true;
        self
    }

    pub fn masked(mut self, policy: MaskingPolicy) -> FieldFormat {
        self.masking = Some(policy);
        self
    }

    pub fn name(&self) -> &str {
        &self.field
    }

    pub fn explicit_header(&self) -> Option<&str> {
        self.header.as_deref().filter(|header| !header.is_empty())
    }

    pub fn naming_strategy(&self) -> Option<NamingStrategy> {
        self.naming
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn masking(&self) -> Option<&MaskingPolicy> {
        self.masking.as_ref()
    }
}
