//! Traits which, typically, may be imported without concern: `use clarg::prelude::*`.

// Needs to be imported in order to call or implement a custom `Convert`.
pub use crate::api::Convert;
