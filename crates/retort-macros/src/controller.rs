//! Controller macro implementation.
//!
//! This module contains the core logic for expanding `#[controller]` attributes.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemImpl;

use crate::parse::{ControllerAttrs, ControllerImpl, ControllerMethod};

/// Expands the `#[controller]` attribute macro.
///
/// 1. Parse the options and the `impl` block
/// 2. Re-emit the block without its `#[route]` attributes
/// 3. Generate the `Controller` impl listing every public method
pub fn expand_controller(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let attrs: ControllerAttrs = syn::parse2(attr)?;
    let item_impl: ItemImpl = syn::parse2(item)?;
    let controller = ControllerImpl::parse(item_impl)?;

    Ok(generate_controller_code(&attrs, &controller))
}

fn generate_controller_code(attrs: &ControllerAttrs, controller: &ControllerImpl) -> TokenStream {
    let krate = &attrs.krate;
    let item = &controller.item;
    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    let name_fn = attrs.name.as_ref().map(|name| {
        quote! {
            fn name() -> &'static str {
                #name
            }
        }
    });

    let entries = controller
        .methods
        .iter()
        .map(|method| generate_method_info(krate, method));

    quote! {
        #item

        impl #impl_generics #krate::Controller for #self_ty #where_clause {
            #name_fn

            fn methods() -> ::std::vec::Vec<#krate::MethodInfo> {
                ::std::vec![#(#entries),*]
            }
        }
    }
}

fn generate_method_info(krate: &syn::Path, method: &ControllerMethod) -> TokenStream {
    let name = method.name.to_string();
    let route = method.route.as_ref().map(|route| {
        let (request_method, uri) = (&route.method, &route.uri);
        quote! { .with_route(#request_method, #uri) }
    });
    let first_param = method.first_param.as_ref().map(|ty| {
        quote! { .with_first_param(#krate::RequestType::of::<#ty>()) }
    });

    quote! {
        #krate::MethodInfo::new(#name) #route #first_param
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_basic_controller() {
        let attr: TokenStream = quote! {};
        let item: TokenStream = quote! {
            impl TestController {
                #[route("GET", "/test")]
                pub fn test_get(&self, request: Id) -> Value {
                    json!({ "id": request.id })
                }
            }
        };

        let result = expand_controller(attr, item);
        assert!(result.is_ok(), "expansion failed: {:?}", result.err());

        let code = result.unwrap().to_string();
        assert!(code.contains("impl :: retort_core :: Controller for TestController"));
        assert!(code.contains("with_route (\"GET\" , \"/test\")"));
        assert!(code.contains("RequestType :: of :: < Id > ()"));
        assert!(!code.contains("# [route"));
    }

    #[test]
    fn test_expand_with_crate_path_and_name() {
        let attr: TokenStream = quote! { crate = "::retort::core", name = "Jackets" };
        let item: TokenStream = quote! {
            impl Jackets {
                pub fn count(&self) -> usize { 0 }
            }
        };

        let code = expand_controller(attr, item).unwrap().to_string();
        assert!(code.contains("impl :: retort :: core :: Controller for Jackets"));
        assert!(code.contains("\"Jackets\""));
        assert!(!code.contains("with_route"));
    }

    #[test]
    fn test_expand_generic_controller() {
        let attr: TokenStream = quote! {};
        let item: TokenStream = quote! {
            impl<S: Store + 'static> Jackets<S> {
                #[route("GET", "/jackets")]
                pub fn list(&self) {}
            }
        };

        let code = expand_controller(attr, item).unwrap().to_string();
        assert!(code.contains("Controller for Jackets < S >"));
    }

    #[test]
    fn test_expand_rejects_non_impl() {
        let attr: TokenStream = quote! {};
        let item: TokenStream = quote! {
            fn not_an_impl() {}
        };
        assert!(expand_controller(attr, item).is_err());
    }

    #[test]
    fn test_expand_rejects_unknown_option() {
        let attr: TokenStream = quote! { prefix = "/api" };
        let item: TokenStream = quote! {
            impl Jackets {}
        };
        assert!(expand_controller(attr, item).is_err());
    }
}
