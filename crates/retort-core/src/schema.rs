//! Static schemas and field descriptors.
//!
//! A [`Schema`] is the ordered list of validated fields of a request type. It
//! is written once, in [`RequestObject::schema`](crate::RequestObject::schema),
//! and cached by the [`SchemaRegistry`](crate::SchemaRegistry).

use crate::{NumberRule, ObjectRule, StringRule, ValidatorConfig};

/// The declared shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A single number or string.
    Scalar,
    /// A single nested object.
    Object,
    /// A sequence whose elements are each validated by the field's rule:
    /// nested objects for an object rule, scalars otherwise.
    Array,
}

/// Metadata of one validated field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    declared_type: DeclaredType,
    validator: ValidatorConfig,
}

impl FieldDescriptor {
    /// Creates a single-valued descriptor; the declared type follows the rule.
    #[must_use]
    pub fn single(name: &'static str, validator: impl Into<ValidatorConfig>) -> Self {
        let validator = validator.into();
        let declared_type = match validator {
            ValidatorConfig::Object(_) => DeclaredType::Object,
            ValidatorConfig::Number(_) | ValidatorConfig::String(_) => DeclaredType::Scalar,
        };
        Self {
            name,
            declared_type,
            validator,
        }
    }

    /// Creates an array descriptor.
    #[must_use]
    pub fn array(name: &'static str, validator: impl Into<ValidatorConfig>) -> Self {
        Self {
            name,
            declared_type: DeclaredType::Array,
            validator: validator.into(),
        }
    }

    /// Returns the field name, which is also the raw input key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared shape.
    #[must_use]
    pub fn declared_type(&self) -> DeclaredType {
        self.declared_type
    }

    /// Returns the required flag from the field's rule.
    #[must_use]
    pub fn required(&self) -> bool {
        self.validator.is_required()
    }

    /// Returns the field's rule.
    #[must_use]
    pub fn validator(&self) -> &ValidatorConfig {
        &self.validator
    }
}

/// The ordered field descriptors of one request type.
///
/// # Example
///
/// ```
/// use retort_core::{DeclaredType, NumberRule, Schema, StringRule};
///
/// struct Pocket;
///
/// let schema = Schema::builder::<Pocket>()
///     .string("location", StringRule::required(1, 30))
///     .number("hasZipper", NumberRule::required(0))
///     .array("contents", StringRule::optional(1, 50))
///     .build();
///
/// let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["location", "hasZipper", "contents"]);
/// assert_eq!(schema.field("contents").unwrap().declared_type(), DeclaredType::Array);
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Starts a schema for `T`.
    #[must_use]
    pub fn builder<T: ?Sized + 'static>() -> SchemaBuilder {
        SchemaBuilder::new(std::any::type_name::<T>())
    }

    /// Returns the name of the described type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the descriptor of the named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`Schema`]. Fields keep the order in which they are added.
#[derive(Debug)]
pub struct SchemaBuilder {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Creates a builder for the named type.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Adds a number field.
    #[must_use]
    pub fn number(self, name: &'static str, rule: NumberRule) -> Self {
        self.field(FieldDescriptor::single(name, rule))
    }

    /// Adds a string field.
    #[must_use]
    pub fn string(self, name: &'static str, rule: StringRule) -> Self {
        self.field(FieldDescriptor::single(name, rule))
    }

    /// Adds a nested object field.
    #[must_use]
    pub fn object(self, name: &'static str, rule: ObjectRule) -> Self {
        self.field(FieldDescriptor::single(name, rule))
    }

    /// Adds an array field whose elements are validated by `rule`.
    #[must_use]
    pub fn array(self, name: &'static str, rule: impl Into<ValidatorConfig>) -> Self {
        self.field(FieldDescriptor::array(name, rule))
    }

    /// Adds a prepared descriptor.
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}
