//! Small shared helpers used across the crate.

mod type_utils;

pub use type_utils::*;
