//! The object builder.
//!
//! [`ObjectBuilder`] turns raw input into a validated [`Record`] for a
//! registered request type, recursing into nested objects and arrays. The
//! first failure anywhere in the tree aborts the whole build.

use crate::raw::lookup;
use crate::{
    DeclaredType, FieldDescriptor, FieldValue, MappingError, MappingResult, Record,
    RequestObject, RequestType, SchemaRegistry,
};
use serde_json::Value;
use std::any::Any;
use tracing::{debug, warn};

/// Default limit on object nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

static NULL: Value = Value::Null;

/// Options that change how rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Also enforce `max`, `max_length` and `pattern` declarations.
    pub enforce_upper_bounds: bool,
    /// Maximum depth of nested objects below the target type.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            enforce_upper_bounds: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Builds validated objects from raw input.
///
/// The builder holds no mutable state; one instance can serve concurrent
/// requests.
///
/// # Example
///
/// ```
/// use retort_core::fixtures::{self, Jacket};
/// use serde_json::json;
///
/// let registry = fixtures::registry();
/// let builder = registry.builder();
///
/// let jacket: Jacket = builder
///     .build_as(&json!({
///         "description": "Supertex Jacket",
///         "price": 59,
///         "pockets": [{"location": "front", "hasZipper": 0}]
///     }))
///     .unwrap();
///
/// assert_eq!(jacket.price, 59);
/// assert!(jacket.manufacturer.is_none());
/// assert_eq!(jacket.pockets.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectBuilder<'r> {
    registry: &'r SchemaRegistry,
    options: BuildOptions,
}

impl<'r> ObjectBuilder<'r> {
    /// Creates a builder with default options.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, BuildOptions::default())
    }

    /// Creates a builder with the given options.
    #[must_use]
    pub fn with_options(registry: &'r SchemaRegistry, options: BuildOptions) -> Self {
        Self { registry, options }
    }

    /// Returns the active options.
    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Returns the registry the builder reads schemas from.
    #[must_use]
    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Builds a record for `target` from `raw`.
    ///
    /// A `None` target means the route expects no body; the result is then
    /// `Ok(None)` whatever the input.
    pub fn build(&self, target: Option<RequestType>, raw: &Value) -> MappingResult<Option<Record>> {
        let Some(target) = target else {
            return Ok(None);
        };
        debug!(target_type = target.name(), "building request object");
        let result = self.build_record(target, raw, 0);
        match &result {
            Ok(record) => debug!(
                target_type = target.name(),
                fields = record.len(),
                "request object built"
            ),
            Err(err) => warn!(
                target_type = target.name(),
                error = %err,
                "request object rejected"
            ),
        }
        result.map(Some)
    }

    /// Builds `T` from `raw` and converts it with `T`'s factory.
    pub fn build_as<T: RequestObject>(&self, raw: &Value) -> MappingResult<T> {
        let record = self.build(Some(RequestType::of::<T>()), raw)?;
        match record {
            Some(record) => T::from_record(record),
            None => Err(MappingError::unrecognized_class(std::any::type_name::<T>())),
        }
    }

    /// Builds `target` from `raw` into a type-erased instance.
    ///
    /// This is the entry point for dispatch code that only knows a route's
    /// [`RequestType`]; the handler downcasts the box to its parameter type.
    pub fn build_instance(
        &self,
        target: Option<RequestType>,
        raw: &Value,
    ) -> MappingResult<Option<Box<dyn Any + Send>>> {
        let Some(target) = target else {
            return Ok(None);
        };
        let factory = self.registry.factory_of(target)?;
        match self.build(Some(target), raw)? {
            Some(record) => factory(record).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn build_record(
        &self,
        target: RequestType,
        raw: &Value,
        depth: usize,
    ) -> MappingResult<Record> {
        let schema = self.registry.schema_of(target)?;
        let mut record = Record::with_capacity(target, schema.type_name(), schema.fields().len());
        for descriptor in schema.fields() {
            let value = self.build_field(descriptor, raw, depth)?;
            record.insert(descriptor.name(), value);
        }
        Ok(record)
    }

    fn build_field(
        &self,
        descriptor: &FieldDescriptor,
        raw: &Value,
        depth: usize,
    ) -> MappingResult<FieldValue> {
        let name = descriptor.name();
        let value = match lookup(raw, name) {
            Some(value) => value,
            None if !descriptor.required() => return Ok(FieldValue::Null),
            // required and absent: let the rule reject it like any bad value
            None => &NULL,
        };

        let validator = descriptor.validator();
        match descriptor.declared_type() {
            DeclaredType::Array => {
                let items = value
                    .as_array()
                    .ok_or_else(|| MappingError::type_mismatch(name))?;
                items
                    .iter()
                    .map(|item| validator.validate(item, name, self, depth))
                    .collect::<MappingResult<Vec<_>>>()
                    .map(FieldValue::Array)
            }
            DeclaredType::Scalar | DeclaredType::Object => {
                validator.validate(value, name, self, depth)
            }
        }
    }
}
