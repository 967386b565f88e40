//! Domain types.

mod env;

pub use env::{format_value, value_to_string, Env};
