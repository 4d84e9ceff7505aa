//! Static schema registry.
//!
//! The registry maps each request type to its cached [`Schema`] and its
//! factory. It is filled once at startup and only read afterwards, so a
//! shared reference can be used from any number of threads.

use crate::builder::{BuildOptions, ObjectBuilder};
use crate::{FieldDescriptor, MappingError, MappingResult, Record, RequestObject, RequestType, Schema};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A type-erased factory turning a record into a boxed instance.
pub type Factory = fn(Record) -> MappingResult<Box<dyn Any + Send>>;

struct Registration {
    schema: Schema,
    factory: Factory,
}

/// Registry of buildable request types.
///
/// # Example
///
/// ```
/// use retort_core::fixtures::{Jacket, Manufacturer, Pocket};
/// use retort_core::{RequestType, SchemaRegistry};
///
/// let registry = SchemaRegistry::new()
///     .register::<Jacket>()
///     .register::<Manufacturer>()
///     .register::<Pocket>();
///
/// assert_eq!(registry.len(), 3);
/// let fields = registry.describe(RequestType::of::<Jacket>()).unwrap();
/// assert_eq!(fields[0].name(), "description");
/// ```
#[derive(Default)]
pub struct SchemaRegistry {
    entries: HashMap<TypeId, Registration>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, evaluating its schema once.
    ///
    /// Registering the same type twice replaces the earlier entry.
    #[must_use]
    pub fn register<T: RequestObject>(mut self) -> Self {
        self.insert::<T>();
        self
    }

    /// Registers `T` in place.
    pub fn insert<T: RequestObject>(&mut self) -> &mut Self {
        let schema = T::schema();
        debug!(
            target_type = schema.type_name(),
            fields = schema.fields().len(),
            "request type registered"
        );
        self.entries.insert(
            TypeId::of::<T>(),
            Registration {
                schema,
                factory: erase::<T>,
            },
        );
        self
    }

    /// Returns `true` if the type is registered.
    #[must_use]
    pub fn contains(&self, target: RequestType) -> bool {
        self.entries.contains_key(&target.type_id())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached schema of a registered type.
    #[must_use]
    pub fn schema(&self, target: RequestType) -> Option<&Schema> {
        self.entries.get(&target.type_id()).map(|entry| &entry.schema)
    }

    /// Iterates over the registered schemas in no particular order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.entries.values().map(|entry| &entry.schema)
    }

    /// Returns the ordered field descriptors of `target`.
    ///
    /// Fails with [`MappingError::UnrecognizedClass`] if `target` was never
    /// registered.
    pub fn describe(&self, target: RequestType) -> MappingResult<&[FieldDescriptor]> {
        self.schema_of(target).map(Schema::fields)
    }

    /// Returns a builder over this registry with default options.
    #[must_use]
    pub fn builder(&self) -> ObjectBuilder<'_> {
        ObjectBuilder::new(self)
    }

    /// Returns a builder over this registry with the given options.
    #[must_use]
    pub fn builder_with(&self, options: BuildOptions) -> ObjectBuilder<'_> {
        ObjectBuilder::with_options(self, options)
    }

    pub(crate) fn schema_of(&self, target: RequestType) -> MappingResult<&Schema> {
        self.schema(target)
            .ok_or_else(|| MappingError::unrecognized_class(target.name()))
    }

    pub(crate) fn factory_of(&self, target: RequestType) -> MappingResult<Factory> {
        self.entries
            .get(&target.type_id())
            .map(|entry| entry.factory)
            .ok_or_else(|| MappingError::unrecognized_class(target.name()))
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|entry| entry.schema.type_name()))
            .finish()
    }
}

fn erase<T: RequestObject>(record: Record) -> MappingResult<Box<dyn Any + Send>> {
    T::from_record(record).map(|value| Box::new(value) as Box<dyn Any + Send>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Id, Jacket, Manufacturer};

    #[test]
    fn test_describe_unregistered_type() {
        let registry = SchemaRegistry::new().register::<Id>();
        let err = registry
            .describe(RequestType::of::<Jacket>())
            .unwrap_err();
        assert!(matches!(err, MappingError::UnrecognizedClass { .. }));
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = SchemaRegistry::new()
            .register::<Manufacturer>()
            .register::<Manufacturer>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(RequestType::of::<Manufacturer>()));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<SchemaRegistry>();
    }
}
