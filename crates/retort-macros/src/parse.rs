//! Parsing utilities for controller macros.
//!
//! This module provides parsing for `#[controller]` options, `#[route]`
//! declarations and the methods of the annotated `impl` block.

use proc_macro2::Span;
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Expr, ExprLit, FnArg, Ident, ImplItem, ItemImpl, Lit, LitStr, Meta, Path, Signature, Token,
    Type, Visibility,
};

/// Options of the `#[controller]` attribute.
#[derive(Debug)]
pub struct ControllerAttrs {
    /// Path to the core crate in generated code.
    pub krate: Path,
    /// Controller name override.
    pub name: Option<String>,
}

impl Parse for ControllerAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut krate = None;
        let mut name = None;

        while !input.is_empty() {
            let key = if input.peek(Token![crate]) {
                input.parse::<Token![crate]>()?;
                "crate".to_string()
            } else {
                Ident::parse_any(input)?.to_string()
            };
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;

            match key.as_str() {
                "crate" => krate = Some(value.parse::<Path>()?),
                "name" => name = Some(value.value()),
                _ => {
                    return Err(syn::Error::new(
                        value.span(),
                        format!("unknown controller option: {key}"),
                    ))
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::retort_core)),
            name,
        })
    }
}

/// A parsed `#[route]` declaration.
///
/// Accepts `#[route("GET", "/users")]` and
/// `#[route(method = "GET", uri = "/users")]`.
#[derive(Debug)]
pub struct RouteAttrs {
    /// The request method, verbatim.
    pub method: String,
    /// The URI, verbatim.
    pub uri: String,
}

impl RouteAttrs {
    fn new(method: &LitStr, uri: &LitStr) -> syn::Result<Self> {
        if method.value().trim().is_empty() {
            return Err(syn::Error::new(method.span(), "route method must not be empty"));
        }
        Ok(Self {
            method: method.value(),
            uri: uri.value(),
        })
    }
}

impl Parse for RouteAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            let method: LitStr = input.parse()?;
            input.parse::<Token![,]>()?;
            let uri: LitStr = input.parse()?;
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
            if !input.is_empty() {
                return Err(input.error("expected `(method, uri)`"));
            }
            return Self::new(&method, &uri);
        }

        let mut method = None;
        let mut uri = None;

        let meta_list: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in meta_list {
            match meta {
                Meta::NameValue(nv) => {
                    let ident = nv
                        .path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                        .to_string();

                    let value = match &nv.value {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s.clone(),
                        _ => {
                            return Err(syn::Error::new(
                                nv.value.span(),
                                "expected string literal",
                            ))
                        }
                    };

                    match ident.as_str() {
                        "method" => method = Some(value),
                        "uri" => uri = Some(value),
                        _ => {
                            return Err(syn::Error::new(
                                nv.path.span(),
                                format!("unknown attribute: {ident}"),
                            ))
                        }
                    }
                }
                _ => return Err(syn::Error::new(meta.span(), "expected name = value")),
            }
        }

        let method = method.ok_or_else(|| {
            syn::Error::new(Span::call_site(), "missing required attribute: method")
        })?;
        let uri =
            uri.ok_or_else(|| syn::Error::new(Span::call_site(), "missing required attribute: uri"))?;

        Self::new(&method, &uri)
    }
}

/// A public method of the controller.
#[derive(Debug)]
pub struct ControllerMethod {
    /// The method name.
    pub name: Ident,
    /// The route declaration, if any.
    pub route: Option<RouteAttrs>,
    /// The first non-receiver parameter type of a routed method, references stripped.
    pub first_param: Option<Type>,
}

/// Parsed controller `impl` block.
#[derive(Debug)]
pub struct ControllerImpl {
    /// The public methods in declaration order.
    pub methods: Vec<ControllerMethod>,
    /// The `impl` block with `#[route]` attributes removed (for re-emission).
    pub item: ItemImpl,
}

impl ControllerImpl {
    /// Parses an `ItemImpl` into a `ControllerImpl`.
    pub fn parse(mut item: ItemImpl) -> syn::Result<Self> {
        if let Some((_, path, _)) = &item.trait_ {
            return Err(syn::Error::new(
                path.span(),
                "#[controller] must be applied to an inherent impl block",
            ));
        }

        let mut methods = Vec::new();
        for impl_item in &mut item.items {
            let ImplItem::Fn(method) = impl_item else {
                continue;
            };

            let mut route = None;
            for attr in method.attrs.iter().filter(|a| a.path().is_ident("route")) {
                if route.is_some() {
                    return Err(syn::Error::new(attr.span(), "duplicate #[route] on method"));
                }
                route = Some(attr.parse_args::<RouteAttrs>()?);
            }
            method.attrs.retain(|a| !a.path().is_ident("route"));

            if !matches!(method.vis, Visibility::Public(_)) {
                if route.is_some() {
                    return Err(syn::Error::new(
                        method.sig.ident.span(),
                        "#[route] requires a `pub` method",
                    ));
                }
                continue;
            }

            // helpers are listed by name only; their signatures stay unconstrained
            let first_param = match route {
                Some(_) => routed_param(&method.sig)?,
                None => None,
            };

            methods.push(ControllerMethod {
                name: method.sig.ident.unraw(),
                route,
                first_param,
            });
        }

        Ok(Self { methods, item })
    }
}

/// Returns the request type of a routed method's first parameter.
fn routed_param(sig: &Signature) -> syn::Result<Option<Type>> {
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[route] methods cannot be generic",
        ));
    }

    sig.inputs
        .iter()
        .find_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .map(|pat_type| request_type(&pat_type.ty))
        .transpose()
}

/// Returns the type a parameter refers to, without references or grouping.
fn request_type(ty: &Type) -> syn::Result<Type> {
    match ty {
        Type::Reference(reference) => request_type(&reference.elem),
        Type::Paren(paren) => request_type(&paren.elem),
        Type::Group(group) => request_type(&group.elem),
        Type::ImplTrait(_) | Type::Infer(_) => Err(syn::Error::new(
            ty.span(),
            "controller method parameters must have a nameable type",
        )),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::parse_quote;

    #[test]
    fn test_parse_route_positional() {
        let attrs: RouteAttrs = parse_quote!("GET", "/test");
        assert_eq!(attrs.method, "GET");
        assert_eq!(attrs.uri, "/test");
    }

    #[test]
    fn test_parse_route_named() {
        let attrs: RouteAttrs = parse_quote!(uri = "/users", method = "post");
        assert_eq!(attrs.method, "post");
        assert_eq!(attrs.uri, "/users");
    }

    #[test]
    fn test_parse_route_missing_uri() {
        let result: syn::Result<RouteAttrs> = syn::parse2(quote::quote!(method = "GET"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_route_empty_method() {
        let result: syn::Result<RouteAttrs> = syn::parse2(quote::quote!("", "/x"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_controller_attrs() {
        let attrs: ControllerAttrs = parse_quote!();
        assert_eq!(attrs.krate.to_token_stream().to_string(), ":: retort_core");
        assert!(attrs.name.is_none());

        let attrs: ControllerAttrs = parse_quote!(crate = "::retort::core", name = "Jackets");
        assert_eq!(attrs.krate.to_token_stream().to_string(), ":: retort :: core");
        assert_eq!(attrs.name.as_deref(), Some("Jackets"));
    }

    #[test]
    fn test_parse_controller_methods() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("GET", "/jackets")]
                pub fn list(&self) -> Vec<Jacket> { Vec::new() }

                #[route(method = "POST", uri = "/jackets")]
                pub fn create(&self, request: &Jacket) -> Jacket { request.clone() }

                pub fn helper(value: u8) -> u8 { value }

                fn private(&self) {}
            }
        };

        let controller = ControllerImpl::parse(item).unwrap();
        let names: Vec<_> = controller.methods.iter().map(|m| m.name.to_string()).collect();
        assert_eq!(names, ["list", "create", "helper"]);

        assert!(controller.methods[0].first_param.is_none());
        let create = &controller.methods[1];
        assert_eq!(create.route.as_ref().unwrap().method, "POST");
        assert_eq!(
            create.first_param.to_token_stream().to_string(),
            "Jacket"
        );
        assert!(controller.methods[2].route.is_none());
        assert!(controller.methods[2].first_param.is_none());
    }

    #[test]
    fn test_helper_signatures_are_not_inspected() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                pub fn label<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> { text }

                pub fn render(&self, out: impl Write) {}

                pub fn first<T: Clone>(items: &[T]) -> Option<T> { items.first().cloned() }
            }
        };

        let controller = ControllerImpl::parse(item).unwrap();
        assert_eq!(controller.methods.len(), 3);
        assert!(controller.methods.iter().all(|m| m.first_param.is_none()));
    }

    #[test]
    fn test_generic_route_rejected() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("POST", "/labels")]
                pub fn label<'a>(&self, text: Cow<'a, str>) {}
            }
        };
        let err = ControllerImpl::parse(item).unwrap_err();
        assert!(err.to_string().contains("cannot be generic"));

        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("POST", "/jackets")]
                pub fn create<T: Into<Jacket>>(&self, request: T) {}
            }
        };
        assert!(ControllerImpl::parse(item).is_err());
    }

    #[test]
    fn test_route_attributes_are_stripped() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("GET", "/jackets")]
                #[inline]
                pub fn list(&self) {}
            }
        };

        let controller = ControllerImpl::parse(item).unwrap();
        let ImplItem::Fn(method) = &controller.item.items[0] else {
            panic!("expected a method");
        };
        assert_eq!(method.attrs.len(), 1);
        assert!(method.attrs[0].path().is_ident("inline"));
    }

    #[test]
    fn test_route_on_private_method_rejected() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("GET", "/jackets")]
                fn list(&self) {}
            }
        };
        assert!(ControllerImpl::parse(item).is_err());
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                #[route("GET", "/a")]
                #[route("GET", "/b")]
                pub fn list(&self) {}
            }
        };
        assert!(ControllerImpl::parse(item).is_err());
    }

    #[test]
    fn test_trait_impl_rejected() {
        let item: ItemImpl = parse_quote! {
            impl Default for Jackets {
                fn default() -> Self { Self }
            }
        };
        assert!(ControllerImpl::parse(item).is_err());
    }

    #[test]
    fn test_impl_trait_param_rejected() {
        let item: ItemImpl = parse_quote! {
            impl Jackets {
                pub fn list(&self, filter: impl Into<String>) {}
            }
        };
        assert!(ControllerImpl::parse(item).is_err());
    }
}
