//! Integration tests for the controller macro.
//!
//! These tests verify that `#[controller]` generates a `Controller` impl
//! that the route collector and object builder accept.

use std::borrow::Cow;
use std::fmt::Display;

use retort_core::fixtures::{self, Id, Jacket};
use retort_core::{collect_routes, Controller, ControllerType, RequestType};
use retort_macros::controller;
use serde_json::{json, Value};

/// Mirrors the fixture controller, declared through the macro.
#[derive(Debug, Default)]
struct TestController;

#[controller]
impl TestController {
    #[route("GET", "/test")]
    pub fn test_get(&self, request: Id) -> Value {
        json!({ "id": request.id })
    }
}

/// A controller with several routes, helpers and a private method.
#[derive(Debug, Default)]
struct Jackets {
    stock: Vec<Jacket>,
}

#[controller(name = "Jackets")]
impl Jackets {
    #[route(method = "GET", uri = "/jackets")]
    pub fn list(&self) -> usize {
        self.stock.len()
    }

    #[route("POST", "/jackets")]
    pub fn create(&mut self, request: Jacket) -> usize {
        self.stock.push(request);
        self.stock.len()
    }

    pub fn find(&self, description: &str) -> Option<&Jacket> {
        self.stock.iter().find(|j| j.description == description)
    }

    #[route("PUT", "/jackets")]
    pub fn replace(&mut self, request: &Jacket) {
        self.stock = vec![request.clone()];
    }

    #[allow(dead_code)]
    fn audit(&self) {}
}

/// Public helpers with signatures a route could not carry.
#[derive(Debug, Default)]
struct Labels;

#[controller]
impl Labels {
    #[route("GET", "/labels")]
    pub fn show(&self, request: Id) -> String {
        self.label(Cow::Owned(request.id.to_string())).into_owned()
    }

    pub fn label<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> {
        text
    }

    pub fn join<T: Display>(&self, items: &[T]) -> String {
        items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }

    pub fn describe(&self, value: impl Display) -> String {
        value.to_string()
    }
}

#[test]
fn test_collect_routes_from_macro_controller() {
    let routes = collect_routes(&[ControllerType::of::<TestController>()]);

    assert_eq!(routes.len(), 1);
    let route = routes.get(0).unwrap();
    assert_eq!(route.request_type(), Some(RequestType::of::<Id>()));
    assert_eq!(route.uri(), "/test");
    assert_eq!(route.request_method(), "GET");
    assert_eq!(route.handler(), "test_get");
}

#[test]
fn test_methods_listed_in_declaration_order() {
    let names: Vec<_> = Jackets::methods().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["list", "create", "find", "replace"]);
    assert_eq!(Jackets::name(), "Jackets");
}

#[test]
fn test_first_param_skips_receiver_and_references() {
    let methods = Jackets::methods();
    assert_eq!(methods[0].first_param(), None);
    assert_eq!(methods[1].first_param(), Some(RequestType::of::<Jacket>()));
    assert_eq!(methods[2].first_param(), None);
    assert_eq!(methods[3].first_param(), Some(RequestType::of::<Jacket>()));
    assert!(methods[2].route().is_none());
}

#[test]
fn test_generic_helpers_listed_without_param() {
    let methods = Labels::methods();
    let names: Vec<_> = methods.iter().map(|m| m.name()).collect();
    assert_eq!(names, ["show", "label", "join", "describe"]);
    assert_eq!(methods[0].first_param(), Some(RequestType::of::<Id>()));
    assert!(methods[1..].iter().all(|m| m.first_param().is_none()));

    let routes = collect_routes(&[ControllerType::of::<Labels>()]);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes.get(0).unwrap().handler(), "show");

    let labels = Labels;
    assert_eq!(labels.show(Id { id: 7 }), "7");
    assert_eq!(labels.join(&[1, 2]), "1,2");
    assert_eq!(labels.describe(3.5), "3.5");
}

#[test]
fn test_routes_skip_undeclared_methods() {
    let routes = collect_routes(&[
        ControllerType::of::<Jackets>(),
        ControllerType::of::<TestController>(),
    ]);
    let summary: Vec<_> = routes
        .iter()
        .map(|r| (r.controller(), r.request_method(), r.uri()))
        .collect();
    assert_eq!(
        summary,
        [
            ("Jackets", "GET", "/jackets"),
            ("Jackets", "POST", "/jackets"),
            ("Jackets", "PUT", "/jackets"),
            (TestController::name(), "GET", "/test"),
        ]
    );
}

#[test]
fn test_dispatch_through_collected_route() {
    let registry = fixtures::registry();
    let routes = collect_routes(&[ControllerType::of::<Jackets>()]);
    let route = routes.find("post", "/jackets").unwrap();

    let input = json!({
        "description": "Supertex Jacket",
        "price": 59,
        "pockets": []
    });
    let request = registry
        .builder()
        .build_instance(route.request_type(), &input)
        .unwrap()
        .unwrap()
        .downcast::<Jacket>()
        .unwrap();

    let mut controller = Jackets::default();
    assert_eq!(controller.create(*request), 1);
    assert!(controller.find("Supertex Jacket").is_some());
    assert_eq!(controller.list(), 1);
}

mod v1 {
    use retort_core::fixtures::Id;
    use retort_macros::controller;

    pub struct Orders;

    #[controller(name = "Orders")]
    impl Orders {
        #[route("GET", "/v1/orders")]
        pub fn show(&self, _request: Id) {}
    }
}

mod v2 {
    use retort_core::fixtures::Id;
    use retort_macros::controller;

    pub struct Orders;

    #[controller(name = "Orders")]
    impl Orders {
        #[route("GET", "/v2/orders")]
        pub fn show(&self, _request: Id) {}
    }
}

#[test]
fn test_routes_keep_controller_identity() {
    let routes = collect_routes(&[
        ControllerType::of::<v1::Orders>(),
        ControllerType::of::<v2::Orders>(),
    ]);

    let v1_route = routes.find("GET", "/v1/orders").unwrap();
    let v2_route = routes.find("GET", "/v2/orders").unwrap();
    assert_eq!(v1_route.controller(), v2_route.controller());
    assert!(v1_route.controller_type().is::<v1::Orders>());
    assert!(v2_route.controller_type().is::<v2::Orders>());
    assert_eq!(v2_route.controller_type(), ControllerType::of::<v2::Orders>());
}
