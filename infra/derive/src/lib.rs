#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Charachat workspace: error enums, API models and
//! handlers, feature slices, the runtime entry point, and the derives that describe
//! which record fields are encrypted at rest.
//!
//! Examples are `ignore`d here since they expand to paths in downstream crates
//! (`charachat_vault`, `charachat_kernel`, `charachat_runtime`).

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the specialized Tokio runtime.
///
/// Turns an `async fn main` into a plain `fn main` that builds a runtime with the
/// requested profile and blocks on the body.
///
/// # Arguments
///
/// * `high_performance` - Optimized for high-throughput server environments.
/// * `memory_efficient` - Optimized for low-footprint environments.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[charachat_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model.
///
/// # Injected Behaviors
///
/// * **Derives**: adds `Debug`, `Serialize`, and `Deserialize` if missing.
/// * **`OpenAPI`**: adds `utoipa::ToSchema` when the `server` feature is enabled.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// use charachat_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct LoginRequest {
///     pub email: String,
///     pub password: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and registers them on `server` builds.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)), tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field.
/// * **Internal Fallback**: `From<&str>` and `From<String>` when an `Internal` variant exists.
/// * **Kind**: `kind()` returns the variant name as a stable error code.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that support context include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants with a `source` field must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use charachat_derive::charachat_error;
/// use std::borrow::Cow;
///
/// #[charachat_error]
/// pub enum DatabaseError {
///     #[error("SurrealDB error{}: {source}", format_context(.context))]
///     Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn charachat_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a Vertical Slice handle.
///
/// Generates an `Arc`-backed wrapper around a `...Inner` struct, `Deref` to the inner
/// state, and a `FeatureSlice` impl for registration in the API state.
///
/// # Example
/// ```rust,ignore
/// #[charachat_derive::charachat_slice]
/// pub struct Characters {
///     pub base_path: &'static str,
/// }
///
/// let slice = Characters::new(CharactersInner { base_path: "/api/characters" });
/// ```
#[proc_macro_attribute]
pub fn charachat_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}

/// Derives `charachat_vault::SensitiveFields` for a record struct.
///
/// The container attribute names the record kind (used as the encryption context prefix)
/// and how privacy is decided. Fields marked `#[sensitive]` are encrypted at rest when the
/// record is private; they must be `String`, `Option<String>` or `Vec<String>`.
///
/// # Example
/// ```rust,ignore
/// #[derive(SensitiveFields)]
/// #[sensitive(kind = "persona", private = is_private)]
/// pub struct Persona {
///     #[sensitive]
///     pub full_name: String,
///     #[sensitive]
///     pub avatar_link: Option<String>,
///     pub is_private: bool,
/// }
///
/// #[derive(SensitiveFields)]
/// #[sensitive(kind = "message", always_private)]
/// pub struct Message {
///     #[sensitive]
///     pub content: String,
/// }
/// ```
#[proc_macro_derive(SensitiveFields, attributes(sensitive))]
pub fn derive_sensitive_fields(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::fields::expand_derive(&input).into()
}

/// Derives `charachat_kernel::records::Record` from the `uid`, `owner_id`,
/// `created_at` and `updated_at` fields.
#[proc_macro_derive(Record)]
pub fn derive_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::record::expand_derive(&input).into()
}
