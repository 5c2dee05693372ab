use log::{debug, warn};

use crate::{
    core::{masking::MaskingPolicy, record::RecordFormat},
    error::CsvError,
};

/// One output column: the field it reads, its header and optional masking.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    field: &'static str,
    header: String,
    masking: Option<MaskingPolicy>,
}

impl Column {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn masking(&self) -> Option<&MaskingPolicy> {
        self.masking.as_ref()
    }

    /// Applies the column's masking policy, if any, to a rendered value.
    pub fn mask(&self, value: &str) -> String {
        match &self.masking {
            Some(policy) => policy.apply(value),
            None => value.to_string(),
        }
    }
}

/// Ordered columns derived from a record type, valid for a single write.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    type_name: String,
    include_header: bool,
    columns: Vec<Column>,
}

impl ColumnPlan {
    /// Derives the plan of `type_name` from its record format and its
    /// declared fields, in declaration order.
    ///
    /// Transient fields are dropped. A field's header is its explicit header
    /// when one is set, otherwise its declared name passed through the field
    /// naming strategy or, failing that, the record's default strategy.
    ///
    /// # Errors
    ///
    /// [`CsvError::MissingRecordDescriptor`] when `format` is `None`.
    pub fn resolve(
        type_name: &str,
        format: Option<&RecordFormat>,
        fields: &[&'static str],
    ) -> Result<ColumnPlan, CsvError> {
        let format =
            format.ok_or_else(|| CsvError::MissingRecordDescriptor(type_name.to_string()))?;

        for directive in format.field_formats() {
            if !fields.iter().any(|field| *field == directive.name()) {
                warn!(
                    "Field directive '{}' does not match any field of '{}'",
                    directive.name(),
                    type_name
                );
            }
        }

        let columns: Vec<Column> = fields
            .iter()
            .filter_map(|&field| {
                let directive = format.field_format(field);
                if directive.is_some_and(|d| d.is_transient()) {
                    return None;
                }

                let header = match directive.and_then(|d| d.explicit_header()) {
                    Some(header) => header.to_string(),
                    None => directive
                        .and_then(|d| d.naming_strategy())
                        .unwrap_or(format.naming())
                        .apply(field),
                };

                Some(Column {
                    field,
                    header,
                    masking: directive.and_then(|d| d.masking()).copied(),
                })
            })
            .collect();

        debug!(
            "Resolved {} columns for record type '{}'",
            columns.len(),
            type_name
        );

        Ok(ColumnPlan {
            type_name: type_name.to_string(),
            include_header: format.has_header(),
            columns,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn include_header(&self) -> bool {
        self.include_header
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::header)
    }
}
