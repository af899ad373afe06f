//! Campaign records, response parsing and post-parse validation.

pub mod parse;
pub mod types;
pub mod validate;

pub use parse::{RAW_KEY, parse_response};
pub use types::*;
