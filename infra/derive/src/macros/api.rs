use super::derived_trait_names;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitBool, LitStr, Meta, MetaNameValue, Token};

/// Arguments accepted by `#[api_model(...)]`.
#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<LitBool>,
}

/// Serde settings already present on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

/// Expands `#[api_model]`: common derives, an optional `ToSchema`, and the serde policy
/// (camelCase, strict fields) unless overridden.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match model_tokens(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn model_tokens(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = parse_model_args(args)?;
    let existing = existing_serde(&input.attrs)?;
    let present = derived_trait_names(&input.attrs);

    let mut derives = Vec::new();
    for (name, path) in [
        ("Debug", quote! { Debug }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ] {
        if !present.contains(name) {
            derives.push(path);
        }
    }
    let derive_attr = if derives.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derives),*)] }
    };

    let schema_attr = if present.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_attr = rename_attr(args.rename_all, existing.rename_all.as_ref())?;
    let deny_attr = deny_attr(args.deny_unknown_fields, existing.deny_unknown_fields, input)?;

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Expands `#[api_handler]`, forwarding the arguments to `utoipa::path` on server builds.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_model_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if pair.path.is_ident("rename_all") {
            let lit = literal(&pair, |lit| match lit {
                Lit::Str(s) => Some(s.clone()),
                _ => None,
            })?;
            set_once(&mut parsed.rename_all, &pair, lit)?;
        } else if pair.path.is_ident("deny_unknown_fields") {
            let lit = literal(&pair, |lit| match lit {
                Lit::Bool(b) => Some(b.clone()),
                _ => None,
            })?;
            set_once(&mut parsed.deny_unknown_fields, &pair, lit)?;
        } else {
            return Err(syn::Error::new_spanned(
                &pair.path,
                "unsupported argument; expected rename_all or deny_unknown_fields",
            ));
        }
    }

    Ok(parsed)
}

fn literal<T>(pair: &MetaNameValue, pick: impl Fn(&Lit) -> Option<T>) -> syn::Result<T> {
    let label = pair.path.get_ident().map(ToString::to_string).unwrap_or_default();
    let picked = match &pair.value {
        Expr::Lit(expr) => pick(&expr.lit),
        _ => None,
    };
    picked.ok_or_else(|| {
        syn::Error::new_spanned(&pair.value, format!("unexpected literal for {label}"))
    })
}

fn set_once<T>(slot: &mut Option<T>, pair: &MetaNameValue, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(pair, "duplicate argument"));
    }
    *slot = Some(value);
    Ok(())
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                // Other container attributes are left for serde itself.
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(existing)
}

fn rename_attr(requested: Option<LitStr>, existing: Option<&LitStr>) -> syn::Result<TokenStream> {
    let wanted = requested.unwrap_or_else(|| LitStr::new("camelCase", Span::call_site()));

    match existing {
        Some(current) if current.value() != wanted.value() => Err(syn::Error::new_spanned(
            current,
            "conflicting serde rename_all; remove it or pass the same value to api_model",
        )),
        Some(_) => Ok(quote! {}),
        None => Ok(quote! { #[serde(rename_all = #wanted)] }),
    }
}

fn deny_attr(
    requested: Option<LitBool>,
    already_set: bool,
    input: &ItemStruct,
) -> syn::Result<TokenStream> {
    let deny = requested.is_none_or(|lit| lit.value);

    match (already_set, deny) {
        (true, false) => Err(syn::Error::new_spanned(
            &input.ident,
            "deny_unknown_fields is already set via serde; remove it before disabling",
        )),
        (true, true) | (false, false) => Ok(quote! {}),
        (false, true) => Ok(quote! { #[serde(deny_unknown_fields)] }),
    }
}
