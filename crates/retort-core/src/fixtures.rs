//! Request types and a controller for tests and examples.
//!
//! The jacket family exercises every rule kind: required and optional
//! scalars, an optional nested object, a required array of nested objects
//! and an optional array of strings.
//!
//! # Example
//!
//! ```
//! use retort_core::fixtures;
//! use serde_json::json;
//!
//! let registry = fixtures::registry();
//! let err = registry
//!     .builder()
//!     .build_as::<fixtures::Jacket>(&json!({"description": "Supertex Jacket", "price": 5}))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "'5' is an invalid number for price.");
//! ```

use crate::{
    Controller, MappingResult, MethodInfo, NumberRule, ObjectRule, Record, RequestObject,
    RequestType, Schema, SchemaRegistry, StringRule,
};
use serde_json::{json, Value};

/// A jacket with an optional manufacturer and at least the pockets key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jacket {
    /// 1 to 100 characters.
    pub description: String,
    /// At least 10.
    pub price: i64,
    /// Optional maker.
    pub manufacturer: Option<Manufacturer>,
    /// Required array, may be empty.
    pub pockets: Vec<Pocket>,
}

impl RequestObject for Jacket {
    fn schema() -> Schema {
        Schema::builder::<Self>()
            .string("description", StringRule::required(1, 100))
            .number("price", NumberRule::required(10))
            .object("manufacturer", ObjectRule::optional::<Manufacturer>())
            .array("pockets", ObjectRule::required::<Pocket>())
            .build()
    }

    fn from_record(mut record: Record) -> MappingResult<Self> {
        Ok(Self {
            description: record.field("description")?,
            price: record.field("price")?,
            manufacturer: record.object("manufacturer")?,
            pockets: record.objects("pockets")?.unwrap_or_default(),
        })
    }
}

/// A jacket manufacturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    /// 1 to 30 characters.
    pub name: String,
    /// Optional, 1 to 100 characters.
    pub address: Option<String>,
}

impl RequestObject for Manufacturer {
    fn schema() -> Schema {
        Schema::builder::<Self>()
            .string("name", StringRule::required(1, 30))
            .string("address", StringRule::optional(1, 100))
            .build()
    }

    fn from_record(mut record: Record) -> MappingResult<Self> {
        Ok(Self {
            name: record.field("name")?,
            address: record.field("address")?,
        })
    }
}

/// A pocket on a jacket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pocket {
    /// 1 to 30 characters.
    pub location: String,
    /// Zipper count, at least 0. Read from `hasZipper`.
    pub has_zipper: i64,
    /// Optional list of items, each 1 to 50 characters.
    pub contents: Option<Vec<String>>,
}

impl RequestObject for Pocket {
    fn schema() -> Schema {
        Schema::builder::<Self>()
            .string("location", StringRule::required(1, 30))
            .number("hasZipper", NumberRule::required(0))
            .array("contents", StringRule::optional(1, 50))
            .build()
    }

    fn from_record(mut record: Record) -> MappingResult<Self> {
        Ok(Self {
            location: record.field("location")?,
            has_zipper: record.field("hasZipper")?,
            contents: record.field("contents")?,
        })
    }
}

/// A positive identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id {
    /// At least 1.
    pub id: i64,
}

impl RequestObject for Id {
    fn schema() -> Schema {
        Schema::builder::<Self>()
            .number("id", NumberRule::required(1))
            .build()
    }

    fn from_record(mut record: Record) -> MappingResult<Self> {
        Ok(Self {
            id: record.field("id")?,
        })
    }
}

/// A self-referential type, for depth limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Non-empty label.
    pub label: String,
    /// Optional child.
    pub child: Option<Box<Node>>,
}

impl Node {
    /// Returns the number of nodes in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.child.as_ref().map_or(0, |child| child.depth())
    }
}

impl RequestObject for Node {
    fn schema() -> Schema {
        Schema::builder::<Self>()
            .string("label", StringRule::required(1, 50))
            .object("child", ObjectRule::optional::<Self>())
            .build()
    }

    fn from_record(mut record: Record) -> MappingResult<Self> {
        Ok(Self {
            label: record.field("label")?,
            child: record.object::<Self>("child")?.map(Box::new),
        })
    }
}

/// A controller with a single `GET /test` route taking an [`Id`].
#[derive(Debug, Default)]
pub struct TestController;

impl TestController {
    /// Echoes the identifier.
    #[must_use]
    pub fn test_get(&self, request: Id) -> Value {
        json!({ "id": request.id })
    }

    /// Not a route.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        "test controller"
    }
}

impl Controller for TestController {
    fn methods() -> Vec<MethodInfo> {
        vec![
            MethodInfo::new("test_get")
                .with_route("GET", "/test")
                .with_first_param(RequestType::of::<Id>()),
            MethodInfo::new("describe"),
        ]
    }
}

/// Returns a registry holding every fixture type except [`Node`].
#[must_use]
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .register::<Jacket>()
        .register::<Manufacturer>()
        .register::<Pocket>()
        .register::<Id>()
}
