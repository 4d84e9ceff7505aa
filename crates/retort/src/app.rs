//! Process-wide application state.
//!
//! [`Retort`] bundles the schema registry and the route table. It is built
//! once during startup, checked for consistency, and then only read.

use crate::RetortError;
use retort_config::RetortConfig;
use retort_core::{
    collect_routes, BuildOptions, Controller, ControllerType, MappingResult, ObjectBuilder, Record,
    RequestObject, Route, RouteTable, SchemaRegistry,
};
use serde_json::Value;
use std::any::Any;
use std::sync::OnceLock;
use tracing::{debug, info};

static GLOBAL: OnceLock<Retort> = OnceLock::new();

/// The registry and route table of an application.
///
/// # Example
///
/// ```
/// use retort::core::fixtures::{Id, Jacket, Manufacturer, Pocket, TestController};
/// use retort::Retort;
/// use serde_json::json;
///
/// let app = Retort::builder()
///     .request::<Jacket>()
///     .request::<Manufacturer>()
///     .request::<Pocket>()
///     .request::<Id>()
///     .controller::<TestController>()
///     .build()
///     .unwrap();
///
/// let route = app.resolve("GET", "/test").unwrap();
/// let record = app.bind(route, &json!({"id": 3})).unwrap().unwrap();
/// assert_eq!(record.to_json(), json!({"id": 3}));
/// ```
#[derive(Debug)]
pub struct Retort {
    registry: SchemaRegistry,
    routes: RouteTable,
    options: BuildOptions,
}

impl Retort {
    /// Starts building an application.
    #[must_use]
    pub fn builder() -> RetortBuilder {
        RetortBuilder::new()
    }

    /// Returns the schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Returns the collected routes.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the options every build uses.
    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Returns an object builder with the application's options.
    #[must_use]
    pub fn object_builder(&self) -> ObjectBuilder<'_> {
        self.registry.builder_with(self.options)
    }

    /// Returns the first route declared for `method` and `uri`.
    #[must_use]
    pub fn resolve(&self, method: &str, uri: &str) -> Option<&Route> {
        self.routes.find(method, uri)
    }

    /// Builds the request object of `route` from `raw`.
    ///
    /// Returns `Ok(None)` for routes without a request type.
    pub fn bind(&self, route: &Route, raw: &Value) -> MappingResult<Option<Record>> {
        self.object_builder().build(route.request_type(), raw)
    }

    /// Builds the request object of `route` as a type-erased instance.
    pub fn bind_instance(
        &self,
        route: &Route,
        raw: &Value,
    ) -> MappingResult<Option<Box<dyn Any + Send>>> {
        self.object_builder().build_instance(route.request_type(), raw)
    }

    /// Builds a `T` from `raw`.
    pub fn build_as<T: RequestObject>(&self, raw: &Value) -> MappingResult<T> {
        self.object_builder().build_as(raw)
    }

    /// Stores this application as the process-wide instance.
    ///
    /// Only the first call succeeds; later calls get their value back.
    pub fn install(self) -> Result<(), Self> {
        let routes = self.routes.len();
        GLOBAL.set(self)?;
        info!(routes, "application state installed");
        Ok(())
    }

    /// Returns the process-wide instance, if one was installed.
    #[must_use]
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }
}

/// Builder for [`Retort`].
#[derive(Debug, Default)]
pub struct RetortBuilder {
    registry: SchemaRegistry,
    controllers: Vec<ControllerType>,
    options: BuildOptions,
}

impl RetortBuilder {
    /// Creates an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the `[validation]` section of `config`.
    #[must_use]
    pub fn config(mut self, config: &RetortConfig) -> Self {
        self.options = BuildOptions::from(&config.validation);
        self
    }

    /// Sets the build options directly.
    #[must_use]
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a request type.
    #[must_use]
    pub fn request<T: RequestObject>(mut self) -> Self {
        self.registry.insert::<T>();
        self
    }

    /// Adds a controller. Routes are collected in the order controllers are added.
    #[must_use]
    pub fn controller<C: Controller>(mut self) -> Self {
        self.controllers.push(ControllerType::of::<C>());
        self
    }

    /// Collects routes and checks that every referenced type is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RetortError::UnregisteredRequestType`] if a route takes a
    /// type that was never registered, and
    /// [`RetortError::UnregisteredNestedType`] if an object rule refers to one.
    pub fn build(self) -> Result<Retort, RetortError> {
        let routes = collect_routes(&self.controllers);

        check_nested_types(&self.registry)?;
        check_route_types(&self.registry, &routes)?;

        info!(
            request_types = self.registry.len(),
            controllers = self.controllers.len(),
            routes = routes.len(),
            max_depth = self.options.max_depth,
            enforce_upper_bounds = self.options.enforce_upper_bounds,
            "application built"
        );

        Ok(Retort {
            registry: self.registry,
            routes,
            options: self.options,
        })
    }
}

fn check_nested_types(registry: &SchemaRegistry) -> Result<(), RetortError> {
    let mut schemas: Vec<_> = registry.schemas().collect();
    schemas.sort_by_key(|schema| schema.type_name());

    for schema in schemas {
        for field in schema.fields() {
            let Some(nested) = field.validator().nested() else {
                continue;
            };
            if !registry.contains(nested) {
                return Err(RetortError::UnregisteredNestedType {
                    owner: schema.type_name(),
                    field: field.name(),
                    type_name: nested.name(),
                });
            }
        }
    }
    Ok(())
}

fn check_route_types(registry: &SchemaRegistry, routes: &RouteTable) -> Result<(), RetortError> {
    for route in routes {
        let Some(request_type) = route.request_type() else {
            continue;
        };
        if !registry.contains(request_type) {
            return Err(RetortError::UnregisteredRequestType {
                method: route.request_method().to_string(),
                uri: route.uri().to_string(),
                handler: route.handler(),
                type_name: request_type.name(),
            });
        }
        debug!(
            handler = route.handler(),
            request_type = request_type.name(),
            "route request type checked"
        );
    }
    Ok(())
}
