//! # Domain Models
//!
//! Pure types with a single dependency (`serde`): the configuration tree, shared constants
//! and the registry that feature slices are stored in. No I/O, networking or crypto here.

pub mod config;
pub mod constants;
pub mod registry;
