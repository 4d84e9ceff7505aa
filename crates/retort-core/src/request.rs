//! Target type identity and the [`RequestObject`] trait.

use crate::{MappingResult, Record, Schema};
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A reference to a Rust type, used where a request type is named at runtime.
///
/// `RequestType` is to Retort what a class reference is to a reflective
/// framework: it can name any `'static` type. Whether that type can actually
/// be built is decided by the [`SchemaRegistry`](crate::SchemaRegistry).
///
/// # Example
///
/// ```
/// use retort_core::RequestType;
///
/// struct Id;
///
/// let a = RequestType::of::<Id>();
/// let b = RequestType::of::<Id>();
/// assert_eq!(a, b);
/// assert!(a.name().ends_with("Id"));
/// ```
#[derive(Clone, Copy)]
pub struct RequestType {
    id: TypeId,
    name: &'static str,
}

impl RequestType {
    /// Returns the request type for `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the `TypeId` of the referenced type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified name of the referenced type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this refers to `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for RequestType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequestType {}

impl Hash for RequestType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestType").field(&self.name).finish()
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for RequestType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// A type that can be built from raw input.
///
/// Implementors declare their validated fields once through [`schema`] and
/// provide a factory, [`from_record`], that turns a fully validated
/// [`Record`] into the typed value.
///
/// # Example
///
/// ```
/// use retort_core::{MappingResult, Record, RequestObject, Schema, StringRule};
///
/// struct Manufacturer {
///     name: String,
///     address: Option<String>,
/// }
///
/// impl RequestObject for Manufacturer {
///     fn schema() -> Schema {
///         Schema::builder::<Self>()
///             .string("name", StringRule::required(1, 30))
///             .string("address", StringRule::optional(1, 100))
///             .build()
///     }
///
///     fn from_record(mut record: Record) -> MappingResult<Self> {
///         Ok(Self {
///             name: record.field("name")?,
///             address: record.field("address")?,
///         })
///     }
/// }
/// ```
///
/// [`schema`]: RequestObject::schema
/// [`from_record`]: RequestObject::from_record
pub trait RequestObject: Sized + Send + 'static {
    /// Returns the ordered field descriptors for this type.
    fn schema() -> Schema;

    /// Builds the typed value from a validated record.
    fn from_record(record: Record) -> MappingResult<Self>;
}
