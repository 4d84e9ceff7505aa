//! End-to-end tests through the facade crate.

use retort::core::fixtures::{Id, Jacket, Manufacturer, Pocket};
use retort::prelude::*;
use serde_json::{json, Value};

pub struct Catalog;

#[controller(crate = "::retort::core", name = "Catalog")]
impl Catalog {
    #[route("POST", "/jackets")]
    pub fn create(&self, jacket: Jacket) -> Value {
        json!({ "description": jacket.description })
    }

    #[route("GET", "/jackets/show")]
    pub fn show(&self, request: Id) -> Value {
        json!({ "id": request.id })
    }

    #[route("GET", "/health")]
    pub fn health(&self) -> Value {
        json!({ "status": "ok" })
    }

    pub fn helper(&self) {}
}

fn app() -> Retort {
    Retort::builder()
        .request::<Jacket>()
        .request::<Manufacturer>()
        .request::<Pocket>()
        .request::<Id>()
        .controller::<Catalog>()
        .build()
        .unwrap()
}

#[test]
fn test_routes_collected_in_order() {
    let app = app();
    let routes: Vec<_> = app
        .routes()
        .iter()
        .map(|route| (route.request_method(), route.uri(), route.handler()))
        .collect();

    assert_eq!(
        routes,
        vec![
            ("POST", "/jackets", "create"),
            ("GET", "/jackets/show", "show"),
            ("GET", "/health", "health"),
        ]
    );
    assert!(app.routes().iter().all(|route| route.controller() == "Catalog"));
}

#[test]
fn test_bind_jacket_payload() {
    let app = app();
    let route = app.resolve("POST", "/jackets").unwrap();

    let raw = json!({
        "description": "Waxed cotton",
        "price": 129,
        "manufacturer": { "name": "Barbour" },
        "pockets": [{ "location": "chest", "hasZipper": 1 }]
    });
    let jacket = app
        .bind_instance(route, &raw)
        .unwrap()
        .unwrap()
        .downcast::<Jacket>()
        .unwrap();

    assert_eq!(jacket.price, 129);
    assert_eq!(jacket.pockets.len(), 1);
    assert_eq!(jacket.manufacturer.unwrap().name, "Barbour");
}

#[test]
fn test_bind_error_envelope() {
    let app = app();
    let route = app.resolve("post", "/jackets").unwrap();

    let err = app
        .bind(route, &json!({ "description": "Parka", "price": "5" }))
        .unwrap_err();
    assert_eq!(err.to_string(), "'5' is an invalid number for price.");
    assert_eq!(err.status_code().as_u16(), 422);

    let body = serde_json::to_value(err.to_envelope()).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "price");
}

#[test]
fn test_route_without_request_type() {
    let app = app();
    let route = app.resolve("GET", "/health").unwrap();
    assert!(route.request_type().is_none());
    assert!(app.bind(route, &json!({ "ignored": true })).unwrap().is_none());
}

#[test]
fn test_unknown_route() {
    assert!(app().resolve("DELETE", "/jackets").is_none());
}

#[test]
fn test_missing_registration_reported() {
    let err = Retort::builder()
        .request::<Jacket>()
        .request::<Manufacturer>()
        .request::<Pocket>()
        .controller::<Catalog>()
        .build()
        .unwrap_err();

    match err {
        RetortError::UnregisteredRequestType { uri, handler, .. } => {
            assert_eq!(uri, "/jackets/show");
            assert_eq!(handler, "show");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_loaded_into_app() {
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [validation]
            enforce_upper_bounds = true
            max_depth = 4
            "#,
            "toml",
        )
        .unwrap()
        .load_unvalidated();

    let app = Retort::builder()
        .config(&config)
        .request::<Id>()
        .build()
        .unwrap();
    assert_eq!(
        *app.options(),
        BuildOptions {
            enforce_upper_bounds: true,
            max_depth: 4,
        }
    );
}

#[test]
fn test_install_once() {
    assert!(app().install().is_ok());
    assert!(app().install().is_err());

    let global = Retort::global().unwrap();
    let route = global.resolve("GET", "/jackets/show").unwrap();
    let record = global.bind(route, &json!({ "id": 2 })).unwrap().unwrap();
    assert_eq!(record.to_json(), json!({ "id": 2 }));
}
