//! Route declarations and the route collector.
//!
//! A controller exposes its public methods through the [`Controller`] trait,
//! usually generated by the `#[controller]` attribute macro. The collector
//! walks the controllers once at startup and produces an immutable
//! [`RouteTable`].

use crate::RequestType;
use http::Method;
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::fmt;
use tracing::{debug, info};

/// A route declaration attached to a handler method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteAttr {
    method: String,
    uri: String,
}

impl RouteAttr {
    /// Creates a declaration. Both values are kept verbatim.
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
        }
    }

    /// Returns the declared request method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the declared URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// A public method of a controller, as seen by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    name: &'static str,
    route: Option<RouteAttr>,
    first_param: Option<RequestType>,
}

impl MethodInfo {
    /// Describes a method without a route declaration or parameters.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            route: None,
            first_param: None,
        }
    }

    /// Attaches a route declaration.
    #[must_use]
    pub fn with_route(mut self, method: impl Into<String>, uri: impl Into<String>) -> Self {
        self.route = Some(RouteAttr::new(method, uri));
        self
    }

    /// Records the type of the first parameter.
    #[must_use]
    pub fn with_first_param(mut self, param: RequestType) -> Self {
        self.first_param = Some(param);
        self
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the route declaration, if any.
    #[must_use]
    pub fn route(&self) -> Option<&RouteAttr> {
        self.route.as_ref()
    }

    /// Returns the type of the first parameter, if the method takes one.
    #[must_use]
    pub fn first_param(&self) -> Option<RequestType> {
        self.first_param
    }
}

/// A type whose public methods can be scanned for routes.
///
/// Use the `#[controller]` attribute to implement this for an `impl` block,
/// or implement it by hand:
///
/// ```
/// use retort_core::{Controller, MethodInfo, RequestType};
///
/// struct Health;
/// struct Ping;
///
/// impl Controller for Health {
///     fn methods() -> Vec<MethodInfo> {
///         vec![
///             MethodInfo::new("check")
///                 .with_route("GET", "/health")
///                 .with_first_param(RequestType::of::<Ping>()),
///             MethodInfo::new("helper"),
///         ]
///     }
/// }
///
/// assert_eq!(Health::methods().len(), 2);
/// ```
pub trait Controller: 'static {
    /// Returns the controller name used in routes.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns every public method in declaration order.
    fn methods() -> Vec<MethodInfo>;
}

/// A reference to a controller type, passed to [`collect_routes`].
#[derive(Clone, Copy)]
pub struct ControllerType {
    id: TypeId,
    name: &'static str,
    methods: fn() -> Vec<MethodInfo>,
}

impl ControllerType {
    /// Returns the controller type for `C`.
    #[must_use]
    pub fn of<C: Controller>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: C::name(),
            methods: C::methods,
        }
    }

    /// Returns the controller name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this refers to `C`.
    #[must_use]
    pub fn is<C: Controller>(&self) -> bool {
        self.id == TypeId::of::<C>()
    }

    /// Returns the controller's public methods.
    #[must_use]
    pub fn methods(&self) -> Vec<MethodInfo> {
        (self.methods)()
    }
}

impl PartialEq for ControllerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ControllerType {}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControllerType").field(&self.name).finish()
    }
}

/// A collected route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    #[serde(serialize_with = "serialize_controller")]
    controller: ControllerType,
    handler: &'static str,
    request_method: String,
    request_type: Option<RequestType>,
    uri: String,
}

impl Route {
    /// Returns the controller name.
    #[must_use]
    pub fn controller(&self) -> &'static str {
        self.controller.name()
    }

    /// Returns the controller the route was collected from.
    ///
    /// Two controllers may report the same name; this tells them apart.
    #[must_use]
    pub fn controller_type(&self) -> ControllerType {
        self.controller
    }

    /// Returns the handler method name.
    #[must_use]
    pub fn handler(&self) -> &'static str {
        self.handler
    }

    /// Returns the declared request method, verbatim.
    #[must_use]
    pub fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Returns the declared request method as an [`http::Method`].
    ///
    /// Returns `None` if the declaration is not a valid method token.
    #[must_use]
    pub fn http_method(&self) -> Option<Method> {
        Method::from_bytes(self.request_method.to_ascii_uppercase().as_bytes()).ok()
    }

    /// Returns the type of the handler's first parameter.
    #[must_use]
    pub fn request_type(&self) -> Option<RequestType> {
        self.request_type
    }

    /// Returns the declared URI, verbatim.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn matches(&self, method: &str, uri: &str) -> bool {
        self.uri == uri && self.request_method.eq_ignore_ascii_case(method)
    }
}

fn serialize_controller<S: Serializer>(
    controller: &ControllerType,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(controller.name())
}

/// An ordered, immutable sequence of routes.
///
/// Order follows the controller list, then method declaration order.
/// Routes with the same method and URI are all kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Iterates over the routes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the route at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Returns the first route declared for `method` and `uri`.
    ///
    /// The URI is compared exactly, the method without regard to case.
    #[must_use]
    pub fn find(&self, method: &str, uri: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(method, uri))
    }

    /// Returns the routes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Route] {
        &self.routes
    }

    /// Consumes the table, returning the routes.
    #[must_use]
    pub fn into_vec(self) -> Vec<Route> {
        self.routes
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for RouteTable {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

/// Collects the routes declared on `controllers`.
///
/// Methods without a route declaration are skipped. Each remaining method
/// yields one route whose request type is the method's first parameter.
///
/// # Example
///
/// ```
/// use retort_core::fixtures::{Id, TestController};
/// use retort_core::{collect_routes, ControllerType, RequestType};
///
/// let routes = collect_routes(&[ControllerType::of::<TestController>()]);
///
/// assert_eq!(routes.len(), 1);
/// let route = routes.get(0).unwrap();
/// assert_eq!(route.request_method(), "GET");
/// assert_eq!(route.uri(), "/test");
/// assert_eq!(route.request_type(), Some(RequestType::of::<Id>()));
/// ```
#[must_use]
pub fn collect_routes(controllers: &[ControllerType]) -> RouteTable {
    let mut routes = Vec::new();
    for controller in controllers {
        for method in controller.methods() {
            let MethodInfo {
                name,
                route,
                first_param,
            } = method;
            let Some(RouteAttr { method, uri }) = route else {
                continue;
            };
            debug!(
                controller = controller.name(),
                handler = name,
                method = %method,
                uri = %uri,
                "route collected"
            );
            routes.push(Route {
                controller: *controller,
                handler: name,
                request_method: method,
                request_type: first_param,
                uri,
            });
        }
    }
    info!(
        controllers = controllers.len(),
        routes = routes.len(),
        "route table collected"
    );
    RouteTable { routes }
}
