//! Procedural macros for Retort controllers.
//!
//! # Overview
//!
//! The `#[controller]` attribute macro is placed on an inherent `impl`
//! block. It lists the block's public methods, reads their `#[route]`
//! declarations and implements `retort_core::Controller`, so the block can
//! be passed to `collect_routes`.
//!
//! # Example
//!
//! ```rust,ignore
//! use retort_core::{collect_routes, ControllerType};
//! use retort_macros::controller;
//!
//! struct Jackets;
//!
//! #[controller]
//! impl Jackets {
//!     #[route("POST", "/jackets")]
//!     pub fn create(&self, request: Jacket) -> Jacket {
//!         request
//!     }
//!
//!     #[route(method = "GET", uri = "/jackets")]
//!     pub fn list(&self) -> Vec<Jacket> {
//!         Vec::new()
//!     }
//! }
//!
//! let routes = collect_routes(&[ControllerType::of::<Jackets>()]);
//! assert_eq!(routes.len(), 2);
//! ```
//!
//! # Macro Expansion
//!
//! The `#[controller]` macro:
//!
//! 1. Re-emits the `impl` block with the `#[route]` attributes removed
//! 2. Records every `pub` method in declaration order
//! 3. Takes the first non-receiver parameter of each `#[route]` method,
//!    references stripped, as its request type
//!
//! Routed methods cannot be generic. Other `pub` methods are listed by name
//! only, so their signatures are unrestricted.

mod controller;
mod parse;

use proc_macro::TokenStream;

/// Implements `Controller` for an inherent `impl` block.
///
/// # Options
///
/// - `crate`: Path to `retort_core` in generated code (default
///   `::retort_core`; use `"::retort::core"` through the facade)
/// - `name`: Controller name reported in routes (default: the type name)
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::retort_core::Controller for Jackets {
///     fn methods() -> Vec<::retort_core::MethodInfo> {
///         vec![
///             ::retort_core::MethodInfo::new("create")
///                 .with_route("POST", "/jackets")
///                 .with_first_param(::retort_core::RequestType::of::<Jacket>()),
///             ::retort_core::MethodInfo::new("list").with_route("GET", "/jackets"),
///         ]
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::expand_controller(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Declares a route on a controller method.
///
/// Accepted as `#[route("GET", "/uri")]` or
/// `#[route(method = "GET", uri = "/uri")]`. The declaration is consumed by
/// `#[controller]`; using it anywhere else is an error.
#[proc_macro_attribute]
pub fn route(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut output: TokenStream = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[route] can only be used on a `pub` method inside a #[controller] impl block",
    )
    .to_compile_error()
    .into();
    output.extend(item);
    output
}
