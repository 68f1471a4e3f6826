use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, Type};

enum Privacy {
    /// Private when the named `bool` field is `true`.
    Flag(Ident),
    Always,
}

enum Shape {
    Text,
    Optional,
    List,
}

struct SensitiveField<'a> {
    ident: &'a Ident,
    shape: Shape,
}

impl SensitiveField<'_> {
    fn label(&self) -> LitStr {
        LitStr::new(&self.ident.to_string(), self.ident.span())
    }

    fn visit(&self) -> TokenStream {
        let ident = self.ident;
        let label = self.label();
        match self.shape {
            Shape::Text => quote! { visitor(#label, self.#ident.as_str()); },
            Shape::Optional => quote! {
                if let Some(value) = &self.#ident {
                    visitor(#label, value.as_str());
                }
            },
            Shape::List => quote! {
                for value in &self.#ident {
                    visitor(#label, value.as_str());
                }
            },
        }
    }

    fn visit_mut(&self) -> TokenStream {
        let ident = self.ident;
        let label = self.label();
        match self.shape {
            Shape::Text => quote! { visitor(#label, &mut self.#ident); },
            Shape::Optional => quote! {
                if let Some(value) = &mut self.#ident {
                    visitor(#label, value);
                }
            },
            Shape::List => quote! {
                for value in &mut self.#ident {
                    visitor(#label, value);
                }
            },
        }
    }
}

/// Expands `#[derive(SensitiveFields)]`.
pub fn expand_derive(input: &DeriveInput) -> TokenStream {
    match derive_tokens(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn derive_tokens(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "SensitiveFields only supports structs"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(name, "SensitiveFields requires named fields"));
    };

    let (kind, privacy) = container_args(input)?;

    let mut fields = Vec::new();
    for field in &named.named {
        if !has_sensitive_marker(&field.attrs)? {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else { continue };
        fields.push(SensitiveField { ident, shape: shape_of(&field.ty)? });
    }
    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "SensitiveFields needs at least one field marked #[sensitive]",
        ));
    }

    let is_private = match &privacy {
        Privacy::Always => quote! { true },
        Privacy::Flag(flag) => {
            let known = named.named.iter().any(|f| f.ident.as_ref() == Some(flag));
            if !known {
                return Err(syn::Error::new_spanned(flag, "privacy flag field not found"));
            }
            quote! { self.#flag }
        },
    };

    let labels = fields.iter().map(SensitiveField::label);
    let visits = fields.iter().map(SensitiveField::visit);
    let visits_mut = fields.iter().map(SensitiveField::visit_mut);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::charachat_vault::SensitiveFields for #name #ty_generics #where_clause {
            const KIND: &'static str = #kind;
            const FIELDS: &'static [&'static str] = &[#(#labels),*];

            #[inline]
            fn is_private(&self) -> bool {
                #is_private
            }

            fn visit_sensitive(&self, visitor: &mut dyn FnMut(&'static str, &str)) {
                #(#visits)*
            }

            fn visit_sensitive_mut(&mut self, visitor: &mut dyn FnMut(&'static str, &mut String)) {
                #(#visits_mut)*
            }
        }
    })
}

/// Parses `#[sensitive(kind = "...", private = flag)]` or `#[sensitive(kind = "...", always_private)]`.
fn container_args(input: &DeriveInput) -> syn::Result<(LitStr, Privacy)> {
    let mut kind: Option<LitStr> = None;
    let mut privacy: Option<Privacy> = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("sensitive")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                kind = Some(meta.value()?.parse()?);
                return Ok(());
            }
            let parsed = if meta.path.is_ident("private") {
                Privacy::Flag(meta.value()?.parse()?)
            } else if meta.path.is_ident("always_private") {
                Privacy::Always
            } else {
                return Err(meta.error("expected `kind`, `private` or `always_private`"));
            };
            if privacy.replace(parsed).is_some() {
                return Err(meta.error("privacy is declared more than once"));
            }
            Ok(())
        })?;
    }

    let kind = kind.ok_or_else(|| {
        syn::Error::new_spanned(&input.ident, "missing #[sensitive(kind = \"...\")]")
    })?;
    if kind.value().is_empty() || !kind.value().chars().all(|c| c.is_ascii_lowercase() || c == '_')
    {
        return Err(syn::Error::new_spanned(&kind, "kind must be lowercase ascii or `_`"));
    }
    let privacy = privacy.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "declare privacy with `private = <bool field>` or `always_private`",
        )
    })?;

    Ok((kind, privacy))
}

fn has_sensitive_marker(attrs: &[Attribute]) -> syn::Result<bool> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("sensitive")) else {
        return Ok(false);
    };
    if matches!(attr.meta, Meta::Path(_)) {
        Ok(true)
    } else {
        Err(syn::Error::new_spanned(attr, "field marker takes no arguments: use #[sensitive]"))
    }
}

fn shape_of(ty: &Type) -> syn::Result<Shape> {
    let unsupported =
        || syn::Error::new_spanned(ty, "sensitive fields must be String, Option<String> or Vec<String>");

    let Type::Path(path) = ty else {
        return Err(unsupported());
    };
    let Some(segment) = path.path.segments.last() else {
        return Err(unsupported());
    };

    if segment.ident == "String" {
        return Ok(Shape::Text);
    }

    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Err(unsupported());
    };
    let inner_is_string = matches!(
        args.args.first(),
        Some(syn::GenericArgument::Type(Type::Path(inner)))
            if inner.path.segments.last().is_some_and(|s| s.ident == "String")
    );
    if !inner_is_string {
        return Err(unsupported());
    }

    match segment.ident.to_string().as_str() {
        "Option" => Ok(Shape::Optional),
        "Vec" => Ok(Shape::List),
        _ => Err(unsupported()),
    }
}
