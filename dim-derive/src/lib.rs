//! Derive macros for Dim.
//!
//! Re-exports `#[derive(Injectable)]` from `dim-macros`. Generated code
//! refers to the `dim` facade crate, so depend on `dim` to use it.

pub use dim_macros::*;
