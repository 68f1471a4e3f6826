use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

const REQUIRED: [&str; 4] = ["uid", "owner_id", "created_at", "updated_at"];

/// Expands `#[derive(Record)]` over the bookkeeping fields every stored record carries.
pub fn expand_derive(input: &DeriveInput) -> TokenStream {
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(name, "Record only supports structs").to_compile_error();
    };
    let Fields::Named(named) = &data.fields else {
        return syn::Error::new_spanned(name, "Record requires named fields").to_compile_error();
    };

    let missing: Vec<&str> = REQUIRED
        .into_iter()
        .filter(|required| !named.named.iter().any(|f| f.ident.as_ref().is_some_and(|i| i == required)))
        .collect();
    if !missing.is_empty() {
        return syn::Error::new_spanned(
            name,
            format!("Record requires String fields: {}", missing.join(", ")),
        )
        .to_compile_error();
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::charachat_kernel::records::Record for #name #ty_generics #where_clause {
            #[inline]
            fn uid(&self) -> &str {
                &self.uid
            }

            #[inline]
            fn owner_id(&self) -> &str {
                &self.owner_id
            }

            fn meta(&self) -> ::charachat_kernel::records::RecordMeta {
                ::charachat_kernel::records::RecordMeta {
                    uid: self.uid.clone(),
                    owner_id: self.owner_id.clone(),
                    created_at: self.created_at.clone(),
                    updated_at: self.updated_at.clone(),
                }
            }

            fn assign(&mut self, meta: ::charachat_kernel::records::RecordMeta) {
                self.uid = meta.uid;
                self.owner_id = meta.owner_id;
                self.created_at = meta.created_at;
                self.updated_at = meta.updated_at;
            }
        }
    }
}
