//! Data models
//!
//! Canonical in-memory entities plus the request bodies used to create them.
//! The JSON shape of the canonical types is the REST projection.

mod category;
mod organization;
mod product;

pub use category::*;
pub use organization::*;
pub use product::*;
