//! Canonical string rendering of records through `serde`.
//!
//! A record is walked once with [`RecordSerializer`], which keeps the struct
//! name as the record's runtime type and renders every field with
//! [`ValueSerializer`].

use std::{any::type_name, fmt::Display, io};

use serde::{
    Serialize,
    ser::{
        self, Impossible, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
        SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
    },
};
use thiserror::Error;

use crate::error::CsvError;

/// One serialized field: declared name and canonical string form, `None`
/// when the value is absent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldValue {
    pub(crate) name: &'static str,
    pub(crate) value: Option<String>,
}

/// A record rendered to strings, field by field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordSnapshot {
    pub(crate) type_name: String,
    pub(crate) fields: Vec<FieldValue>,
}

impl RecordSnapshot {
    pub(crate) fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub(crate) fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .and_then(|field| field.value.as_deref())
    }
}

/// Renders `record`. Returns `Ok(None)` for an absent record (`None`).
pub(crate) fn snapshot<T: Serialize + ?Sized>(
    record: &T,
) -> Result<Option<RecordSnapshot>, CsvError> {
    walk(record, RecordSerializer { read_values: true })
}

/// Runtime type name of `record` without reading any field value.
/// Returns `Ok(None)` for an absent record.
pub(crate) fn record_type<T: Serialize + ?Sized>(record: &T) -> Result<Option<String>, CsvError> {
    Ok(walk(record, RecordSerializer { read_values: false })?.map(|snapshot| snapshot.type_name))
}

fn walk<T: Serialize + ?Sized>(
    record: &T,
    serializer: RecordSerializer,
) -> Result<Option<RecordSnapshot>, CsvError> {
    record.serialize(serializer).map_err(|error| match error {
        SnapshotError::Unsupported => CsvError::UnsupportedRecord(type_name::<T>().to_string()),
        other => CsvError::SinkFailure(io::Error::other(other.to_string())),
    })
}

#[derive(Error, Debug)]
pub(crate) enum SnapshotError {
    #[error("value does not serialize as a struct")]
    Unsupported,

    #[error("Unable to read field '{field}': {message}")]
    Field {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    Custom(String),
}

impl ser::Error for SnapshotError {
    fn custom<T: Display>(msg: T) -> Self {
        SnapshotError::Custom(msg.to_string())
    }
}

type SnapshotResult = Result<Option<RecordSnapshot>, SnapshotError>;

macro_rules! unsupported {
    ($($method:ident($($arg:ty),*)),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> SnapshotResult {
                Err(SnapshotError::Unsupported)
            }
        )*
    };
}

/// Top-level serializer: accepts structs, struct variants and `Option`s of
/// them. Field values are only rendered when `read_values` is set.
#[derive(Clone, Copy)]
struct RecordSerializer {
    read_values: bool,
}

impl Serializer for RecordSerializer {
    type Ok = Option<RecordSnapshot>;
    type Error = SnapshotError;

    type SerializeSeq = Impossible<Self::Ok, Self::Error>;
    type SerializeTuple = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Self::Error>;
    type SerializeMap = Impossible<Self::Ok, Self::Error>;
    type SerializeStruct = RecordFields;
    type SerializeStructVariant = RecordFields;

    unsupported! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit(),
        serialize_unit_variant(&'static str, u32, &'static str),
    }

    fn serialize_none(self) -> SnapshotResult {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> SnapshotResult {
        value.serialize(self)
    }

    fn serialize_unit_struct(self, name: &'static str) -> SnapshotResult {
        Ok(Some(RecordSnapshot {
            type_name: name.to_string(),
            fields: Vec::new(),
        }))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> SnapshotResult {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> SnapshotResult {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(SnapshotError::Unsupported)
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(RecordFields::new(name.to_string(), len, self.read_values))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(RecordFields::new(
            format!("{}::{}", name, variant),
            len,
            self.read_values,
        ))
    }
}

struct RecordFields {
    snapshot: RecordSnapshot,
    read_values: bool,
}

impl RecordFields {
    fn new(type_name: String, len: usize, read_values: bool) -> Self {
        RecordFields {
            snapshot: RecordSnapshot {
                type_name,
                fields: Vec::with_capacity(len),
            },
            read_values,
        }
    }

    fn push<T: ?Sized + Serialize>(
        &mut self,
        name: &'static str,
        value: &T,
    ) -> Result<(), SnapshotError> {
        if !self.read_values {
            self.skip(name);
            return Ok(());
        }
        let value = value
            .serialize(ValueSerializer)
            .map_err(|error| SnapshotError::Field {
                field: name,
                message: error.to_string(),
            })?;
        self.snapshot.fields.push(FieldValue { name, value });
        Ok(())
    }

    /// A field left out by `skip_serializing_if` still owns a column.
    fn skip(&mut self, name: &'static str) {
        self.snapshot.fields.push(FieldValue { name, value: None });
    }
}

impl SerializeStruct for RecordFields {
    type Ok = Option<RecordSnapshot>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.skip(key);
        Ok(())
    }

    fn end(self) -> SnapshotResult {
        Ok(Some(self.snapshot))
    }
}

impl SerializeStructVariant for RecordFields {
    type Ok = Option<RecordSnapshot>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.skip(key);
        Ok(())
    }

    fn end(self) -> SnapshotResult {
        Ok(Some(self.snapshot))
    }
}

type ValueResult = Result<Option<String>, SnapshotError>;

/// Renders a single value: `None` for absent values, the canonical string
/// form otherwise.
struct ValueSerializer;

/// Rendering of a value nested in a collection, where absence prints `null`.
fn nested<T: ?Sized + Serialize>(value: &T) -> Result<String, SnapshotError> {
    Ok(value
        .serialize(ValueSerializer)?
        .unwrap_or_else(|| "null".to_string()))
}

fn display<T: Display>(value: T) -> ValueResult {
    Ok(Some(value.to_string()))
}

impl Serializer for ValueSerializer {
    type Ok = Option<String>;
    type Error = SnapshotError;

    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_bool(self, v: bool) -> ValueResult {
        display(v)
    }

    fn serialize_i8(self, v: i8) -> ValueResult {
        display(v)
    }

    fn serialize_i16(self, v: i16) -> ValueResult {
        display(v)
    }

    fn serialize_i32(self, v: i32) -> ValueResult {
        display(v)
    }

    fn serialize_i64(self, v: i64) -> ValueResult {
        display(v)
    }

    fn serialize_i128(self, v: i128) -> ValueResult {
        display(v)
    }

    fn serialize_u8(self, v: u8) -> ValueResult {
        display(v)
    }

    fn serialize_u16(self, v: u16) -> ValueResult {
        display(v)
    }

    fn serialize_u32(self, v: u32) -> ValueResult {
        display(v)
    }

    fn serialize_u64(self, v: u64) -> ValueResult {
        display(v)
    }

    fn serialize_u128(self, v: u128) -> ValueResult {
        display(v)
    }

    fn serialize_f32(self, v: f32) -> ValueResult {
        display(v)
    }

    fn serialize_f64(self, v: f64) -> ValueResult {
        display(v)
    }

    fn serialize_char(self, v: char) -> ValueResult {
        display(v)
    }

    fn serialize_str(self, v: &str) -> ValueResult {
        Ok(Some(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> ValueResult {
        let mut list = Compound::new(String::from("["), "]");
        list.items.extend(v.iter().map(u8::to_string));
        Ok(Some(list.finish()))
    }

    fn serialize_none(self) -> ValueResult {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> ValueResult {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ValueResult {
        Ok(None)
    }

    fn serialize_unit_struct(self, name: &'static str) -> ValueResult {
        display(name)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> ValueResult {
        display(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> ValueResult {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> ValueResult {
        Ok(Some(format!("{}({})", variant, nested(value)?)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(Compound::with_capacity(String::from("["), "]", len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(Compound::with_capacity(String::from("["), "]", Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(Compound::with_capacity(format!("{}(", name), ")", Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(Compound::with_capacity(format!("{}(", variant), ")", Some(len)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(Compound::with_capacity(String::from("{"), "}", len))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(Compound::with_capacity(format!("{}(", name), ")", Some(len)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(Compound::with_capacity(format!("{}(", variant), ")", Some(len)))
    }
}

/// Collections, maps and nested structs: `open item, item close`.
struct Compound {
    open: String,
    close: &'static str,
    items: Vec<String>,
    pending_key: Option<String>,
}

impl Compound {
    fn new(open: String, close: &'static str) -> Self {
        Compound::with_capacity(open, close, None)
    }

    fn with_capacity(open: String, close: &'static str, len: Option<usize>) -> Self {
        Compound {
            open,
            close,
            items: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        }
    }

    fn push_entry<T: ?Sized + Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), SnapshotError> {
        self.items.push(format!("{}={}", key, nested(value)?));
        Ok(())
    }

    fn finish(self) -> String {
        format!("{}{}{}", self.open, self.items.join(", "), self.close)
    }
}

impl SerializeSeq for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(nested(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeTuple for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(nested(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeTupleStruct for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(nested(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeTupleVariant for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(nested(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeMap for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.pending_key = Some(nested(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self.pending_key.take().unwrap_or_default();
        self.push_entry(&key, value)
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeStruct for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push_entry(key, value)
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}

impl SerializeStructVariant for Compound {
    type Ok = Option<String>;
    type Error = SnapshotError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push_entry(key, value)
    }

    fn end(self) -> ValueResult {
        Ok(Some(self.finish()))
    }
}
