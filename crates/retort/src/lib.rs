//! # Retort
//!
//! **Declarative request mapping and route discovery**
//!
//! Retort turns loosely-typed request payloads into validated, strongly-typed
//! request objects and collects the routes controllers declare:
//!
//! - **Declared schemas** – Each request type lists its fields and the rule for each
//! - **Recursive building** – Nested objects and arrays of objects are validated depth-first
//! - **Fail-fast errors** – The first violation is returned with a client-facing message
//! - **Route discovery** – `#[controller]` and `#[route]` describe handlers at compile time
//!
//! ## Quick Start
//!
//! ```
//! use retort::prelude::*;
//! use retort::core::fixtures::Id;
//! use serde_json::{json, Value};
//!
//! pub struct Users;
//!
//! #[controller(crate = "::retort::core")]
//! impl Users {
//!     #[route("GET", "/users")]
//!     pub fn show(&self, request: Id) -> Value {
//!         json!({ "id": request.id })
//!     }
//! }
//!
//! let app = Retort::builder()
//!     .request::<Id>()
//!     .controller::<Users>()
//!     .build()?;
//!
//! let route = app.resolve("GET", "/users").expect("route declared");
//! let err = app.bind(route, &json!({ "id": 0 })).unwrap_err();
//! assert_eq!(err.status_code().as_u16(), 422);
//! # Ok::<(), retort::RetortError>(())
//! ```
//!
//! ## Crates
//!
//! - [`core`] – Schemas, validators, the object builder and route collection
//! - [`config`] – Layered configuration
//! - [`telemetry`] – Structured logging

#![doc(html_root_url = "https://docs.rs/retort/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use app::{Retort, RetortBuilder};

// Re-export core types
pub use retort_core as core;

// Re-export configuration types
pub use retort_config as config;

// Re-export telemetry types
pub use retort_telemetry as telemetry;

// Re-export macros
pub use retort_macros::{controller, route};

use retort_config::{ConfigError, RetortConfig};
use retort_telemetry::{LogConfig, TelemetryError};
use thiserror::Error;

/// Errors raised while assembling or starting an application.
///
/// These are startup errors. Per-request failures are
/// [`MappingError`](retort_core::MappingError)s.
#[derive(Debug, Error)]
pub enum RetortError {
    /// A route takes a request type that was never registered.
    #[error("route {method} {uri} ({handler}) takes unregistered request type {type_name}")]
    UnregisteredRequestType {
        /// The declared HTTP method.
        method: String,
        /// The declared URI.
        uri: String,
        /// The handler method name.
        handler: &'static str,
        /// The missing type.
        type_name: &'static str,
    },

    /// An object rule refers to a type that was never registered.
    #[error("field {field} of {owner} refers to unregistered type {type_name}")]
    UnregisteredNestedType {
        /// The type declaring the field.
        owner: &'static str,
        /// The field name.
        field: &'static str,
        /// The missing type.
        type_name: &'static str,
    },

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Installs the global logging subscriber described by `config`.
///
/// # Errors
///
/// Returns [`RetortError::Telemetry`] if the level is not a valid filter or a
/// subscriber is already installed.
pub fn init_logging(config: &RetortConfig) -> Result<(), RetortError> {
    retort_telemetry::init_logging(&LogConfig::from(&config.telemetry))?;
    Ok(())
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use retort::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Retort, RetortBuilder, RetortError};

    pub use retort_core::{
        BuildOptions, Controller, FieldValue, MappingError, MappingResult, NumberRule,
        ObjectBuilder, ObjectRule, Record, RequestObject, RequestType, Route, RouteTable, Schema,
        SchemaRegistry, StringRule,
    };

    pub use retort_config::{ConfigLoader, RetortConfig};

    pub use retort_macros::{controller, route};
}
