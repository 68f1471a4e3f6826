use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemStruct, LitStr};

/// Expands `#[charachat_slice]` into an `Arc`-backed handle plus its `...Inner` state.
pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let ItemStruct { attrs, vis, ident, fields, .. } = &input;
    let inner = format_ident!("{ident}Inner");
    let slice_name = LitStr::new(&ident.to_string().to_lowercase(), ident.span());

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner #fields

        #[derive(Debug, Clone)]
        #vis struct #ident {
            inner: std::sync::Arc<#inner>,
        }

        impl #ident {
            pub fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #ident {
            type Target = #inner;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::charachat_kernel::domain::registry::FeatureSlice for #ident {
            fn name(&self) -> &'static str {
                #slice_name
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}
