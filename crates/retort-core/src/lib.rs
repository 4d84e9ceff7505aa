//! # Retort Core
//!
//! Declarative request mapping: untyped, nested input in, validated and
//! typed objects out, plus route discovery over annotated controllers.
//!
//! - [`RequestObject`] - A type that declares a [`Schema`] and a factory
//! - [`SchemaRegistry`] - Registered request types, built once at startup
//! - [`ObjectBuilder`] - Recursive, fail-fast construction from raw input
//! - [`NumberRule`], [`StringRule`], [`ObjectRule`] - Field validators
//! - [`collect_routes`] - Builds a [`RouteTable`] from [`Controller`]s
//! - [`MappingError`] - Standard error type
//!
//! # Example
//!
//! ```
//! use retort_core::fixtures::{self, Jacket};
//! use serde_json::json;
//!
//! let registry = fixtures::registry();
//! let input = json!({
//!     "description": "Supertex Jacket",
//!     "price": 59,
//!     "manufacturer": {"name": "Exclusive Inc.", "address": "Some street 1"},
//!     "pockets": [{"location": "front", "hasZipper": 0}]
//! });
//!
//! let jacket: Jacket = registry.builder().build_as(&input).unwrap();
//! assert_eq!(jacket.manufacturer.unwrap().address.as_deref(), Some("Some street 1"));
//! ```

#![doc(html_root_url = "https://docs.rs/retort-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod error;
pub mod fixtures;
mod raw;
mod record;
mod registry;
mod request;
mod route;
mod schema;
mod validator;

pub use builder::{BuildOptions, ObjectBuilder, DEFAULT_MAX_DEPTH};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, MappingError, MappingResult, ValueKind};
pub use raw::RawInput;
pub use record::{FieldValue, FromField, Record};
pub use registry::{Factory, SchemaRegistry};
pub use request::{RequestObject, RequestType};
pub use route::{collect_routes, Controller, ControllerType, MethodInfo, Route, RouteAttr, RouteTable};
pub use schema::{DeclaredType, FieldDescriptor, Schema, SchemaBuilder};
pub use validator::{NumberRule, ObjectRule, StringRule, Validator, ValidatorConfig};
