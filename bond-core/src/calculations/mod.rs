//! Numeric helpers for the amount fields of the application form.

pub mod common;

pub use common::{format_number, leading_numeral, parse_number};
