use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[charachat_runtime::main]` into a sync `main` that owns a tuned runtime.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[charachat_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[charachat_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match profile_call(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #profile;
            let rt = ::charachat_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn profile_call(args: TokenStream) -> Result<TokenStream, Error> {
    if args.is_empty() {
        return Ok(quote! { ::charachat_runtime::RuntimeConfig::default() });
    }

    let profile: Ident = syn::parse2(args)?;
    match profile.to_string().as_str() {
        "high_performance" => Ok(quote! { ::charachat_runtime::RuntimeConfig::high_performance() }),
        "memory_efficient" => Ok(quote! { ::charachat_runtime::RuntimeConfig::memory_efficient() }),
        "default" => Ok(quote! { ::charachat_runtime::RuntimeConfig::default() }),
        _ => Err(Error::new_spanned(
            profile,
            "unknown runtime profile; use high_performance, memory_efficient or default",
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
