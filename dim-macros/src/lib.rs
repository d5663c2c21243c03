//! Procedural macros for Dim.
//!
//! Provides `#[derive(Injectable)]`, which describes a struct's
//! constructor for the resolvers and submits it to the global catalogue.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod injectable;

/// Derives `Injectable` for a struct with named fields, or a unit struct.
///
/// The constructor takes one parameter per field, in declaration order,
/// named after the field. A field's declared type, used for autowiring,
/// is the last path segment of its type with `Arc`, `Box` or `Rc`
/// unwrapped. Primitives, `String`, `Option` and `Vec` fields are untyped.
///
/// Fields are read back as `Arc<T>` when declared as `Arc<T>`, otherwise
/// cloned out of the resolved value.
///
/// # Attributes
///
/// ## Struct-level
///
/// - `#[dim(name = "Name")]` - register under `Name` instead of the struct ident
///
/// ## Field-level
///
/// - `#[dim(default)]` - default to `Default::default()`
/// - `#[dim(default = "path::to::fn")]` - default to the result of `fn()`
/// - `#[dim(service = "Name")]` - autowire from `Name`
/// - `#[dim(untyped)]` - never autowire this field
///
/// # Example
///
/// ```ignore
/// use dim::Injectable;
/// use std::sync::Arc;
///
/// #[derive(Injectable)]
/// struct Transport;
///
/// #[derive(Injectable)]
/// #[dim(name = "Mailer")]
/// struct SmtpMailer {
///     transport: Arc<Transport>,
///     #[dim(default = "default_sender")]
///     sender: String,
///     #[dim(default)]
///     retries: u8,
/// }
///
/// fn default_sender() -> String {
///     "noreply@localhost".into()
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(dim))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(|err| err.write_errors())
        .into()
}
