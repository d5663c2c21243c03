//! # Dim — parameter resolution and autowiring for Rust
//!
//! Dim fills a constructor's or callable's parameters from a sparse map of
//! arguments keyed by name or position, declared defaults, and a host
//! container's instances.
//!
//! - [`resolve_parameters`] decides where every parameter's value comes from
//! - [`Instantiator`] builds registered types
//! - [`Invoker`] calls methods, paths, invocable objects and functions
//! - [`ServiceDescriptor`] binds a type to default arguments
//!
//! Types describe themselves with `#[derive(Injectable)]` or by hand with
//! [`TypeInfo`], and are looked up in a [`TypeRegistry`].
//!
//! # Examples
//! ```rust
//! use dim::Injectable;
//! use dim::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! struct Transport;
//!
//! #[derive(Injectable)]
//! struct Mailer {
//!     transport: Arc<Transport>,
//!     sender: String,
//! }
//!
//! let container = Container::builder()
//!     .register(ServiceDescriptor::new("Transport", None).unwrap())
//!     .register(
//!         ServiceDescriptor::new("Mailer", args! { "sender" => String::from("noreply@localhost") })
//!             .unwrap(),
//!     )
//!     .build();
//!
//! let mailer = container.resolve_arc::<Mailer>("Mailer").unwrap();
//! assert_eq!(mailer.sender, "noreply@localhost");
//! ```

pub use dim_container::*;
pub use dim_derive::*;
pub use dim_support::*;
