//! Validated build output.
//!
//! The [`ObjectBuilder`](crate::ObjectBuilder) produces a [`Record`]: every
//! declared field of the target type, validated, in declaration order. A
//! request type's factory then moves the values out with [`Record::field`],
//! [`Record::object`] and [`Record::objects`].

use crate::{MappingError, MappingResult, RequestObject, RequestType, ValueKind};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A validated field value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// An optional field that carried no value.
    #[default]
    Null,
    /// Accepted by a number rule.
    Number(Number),
    /// Accepted by a string rule.
    String(String),
    /// A nested object, built recursively.
    Object(Record),
    /// An array field, elements in input order.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Object(record) => record.to_json(),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A fully validated instance of a request type, before typed conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    target: RequestType,
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldValue>,
}

impl Record {
    pub(crate) fn with_capacity(
        target: RequestType,
        type_name: &'static str,
        capacity: usize,
    ) -> Self {
        Self {
            target,
            type_name,
            fields: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.fields.insert(name, value);
    }

    /// Returns the type this record was built for.
    #[must_use]
    pub fn target(&self) -> RequestType {
        self.target
    }

    /// Returns the schema's display name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Moves a field's value out, leaving [`FieldValue::Null`] behind.
    pub fn take(&mut self, name: &str) -> FieldValue {
        self.fields
            .get_mut(name)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Moves a scalar (or optional / array of scalars) field out as `T`.
    pub fn field<T: FromField>(&mut self, name: &str) -> MappingResult<T> {
        T::from_field(name, self.take(name))
    }

    /// Moves a nested object field out, converting it with `T`'s factory.
    ///
    /// Returns `None` for an optional field that carried no value.
    pub fn object<T: RequestObject>(&mut self, name: &str) -> MappingResult<Option<T>> {
        match self.take(name) {
            FieldValue::Null => Ok(None),
            FieldValue::Object(record) => convert_record(name, record).map(Some),
            _ => Err(MappingError::conversion(name, "object")),
        }
    }

    /// Moves an array-of-objects field out, converting each element.
    ///
    /// Returns `None` for an optional field that carried no value.
    pub fn objects<T: RequestObject>(&mut self, name: &str) -> MappingResult<Option<Vec<T>>> {
        match self.take(name) {
            FieldValue::Null => Ok(None),
            FieldValue::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    FieldValue::Object(record) => convert_record(name, record),
                    _ => Err(MappingError::conversion(name, "array of objects")),
                })
                .collect::<MappingResult<Vec<T>>>()
                .map(Some),
            _ => Err(MappingError::conversion(name, "array of objects")),
        }
    }

    /// Renders the record as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn convert_record<T: RequestObject>(field: &str, record: Record) -> MappingResult<T> {
    if !record.target.is::<T>() {
        return Err(MappingError::conversion(field, std::any::type_name::<T>()));
    }
    T::from_record(record)
}

/// Conversion from a validated [`FieldValue`] into a Rust type.
///
/// Numbers that do not fit the requested integer type are reported as
/// validation failures of the field, since the input decides whether they fit.
pub trait FromField: Sized {
    /// Converts the value of `field`.
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self>;
}

impl FromField for FieldValue {
    fn from_field(_field: &str, value: FieldValue) -> MappingResult<Self> {
        Ok(value)
    }
}

impl FromField for Record {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        match value {
            FieldValue::Object(record) => Ok(record),
            _ => Err(MappingError::conversion(field, "object")),
        }
    }
}

impl FromField for String {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        match value {
            FieldValue::String(s) => Ok(s),
            _ => Err(MappingError::conversion(field, "string")),
        }
    }
}

impl FromField for Number {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        match value {
            FieldValue::Number(n) => Ok(n),
            _ => Err(MappingError::conversion(field, "number")),
        }
    }
}

fn number_as<T>(field: &str, value: FieldValue, read: impl FnOnce(&Number) -> Option<T>) -> MappingResult<T> {
    let number = Number::from_field(field, value)?;
    read(&number)
        .ok_or_else(|| MappingError::validation(field, number.to_string(), ValueKind::Number))
}

impl FromField for i64 {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        number_as(field, value, Number::as_i64)
    }
}

impl FromField for i32 {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        number_as(field, value, |n| n.as_i64().and_then(|i| i32::try_from(i).ok()))
    }
}

impl FromField for u64 {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        number_as(field, value, Number::as_u64)
    }
}

impl FromField for u32 {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        number_as(field, value, |n| n.as_u64().and_then(|u| u32::try_from(u).ok()))
    }
}

impl FromField for f64 {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        number_as(field, value, Number::as_f64)
    }
}

impl<T: FromField> FromField for Option<T> {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field(field, other).map(Some),
        }
    }
}

impl<T: FromField> FromField for Vec<T> {
    fn from_field(field: &str, value: FieldValue) -> MappingResult<Self> {
        match value {
            FieldValue::Array(items) => items
                .into_iter()
                .map(|item| T::from_field(field, item))
                .collect(),
            _ => Err(MappingError::conversion(field, "array")),
        }
    }
}
