pub mod api;
pub mod error;
pub mod fields;
pub mod record;
pub mod runtime;
pub mod slice;

use fxhash::FxHashSet;
use syn::Attribute;

/// Collects the trait names already listed in `#[derive(...)]` attributes.
///
/// Both bare idents and the last segment of qualified paths are recorded,
/// so `serde::Serialize` and `Serialize` are treated alike.
pub fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                traits.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}
