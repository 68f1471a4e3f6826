//! Kernel utilities shared across slices.
//!
//! Holds the pieces every record kind goes through: the per-request [`SecurityContext`],
//! the [`KeyProvider`] that resolves it from the `key` cookie, and the record read and
//! write paths in [`records`]. With the `server` feature it also provides the axum state,
//! extractors and route builders.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use charachat_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use charachat_kernel::config::load_config;
//! use charachat_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server"))?;
//! ```
//!
//! [`SecurityContext`]: security::SecurityContext
//! [`KeyProvider`]: security::KeyProvider

pub mod config;
pub mod prelude;
pub mod records;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use charachat_domain as domain;
pub use nanoid::nanoid;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
