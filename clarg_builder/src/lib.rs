//! Builder module for `clarg`.
//! See [documentation root](https://docs.rs/clarg/latest/clarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod registry;
mod tokens;

pub use api::*;
pub use model::*;
pub use parser::{GeneralParser, ParseError};
pub use registry::DeclarationError;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
