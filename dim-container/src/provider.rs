//! Provider trait — a module of related type registrations.
//!
//! Providers group the reflection data of related types together, so a
//! catalogue can be assembled per domain instead of in one block.
//!
//! # Examples
//! ```rust,ignore
//! struct MailProvider;
//!
//! impl Provider for MailProvider {
//!     fn register(&self, catalog: &mut dyn TypeCatalog) {
//!         catalog.register_type(transport_info());
//!         catalog.register_type(mailer_info());
//!         catalog.register_function("default_sender", default_sender());
//!     }
//! }
//!
//! let registry = TypeRegistry::builder()
//!     .add_provider(&MailProvider)
//!     .build();
//! ```

use crate::reflect::{Function, TypeInfo};

/// A module that registers related types into a catalogue.
pub trait Provider: Send + Sync {
    /// Register types and functions into the catalogue.
    ///
    /// Called once while the catalogue is being built.
    fn register(&self, catalog: &mut dyn TypeCatalog);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers register into.
///
/// This is the mutable subset of [`TypeRegistryBuilder`], exposed to
/// [`Provider`] implementations so they can be tested on their own.
///
/// [`TypeRegistryBuilder`]: crate::registry::TypeRegistryBuilder
pub trait TypeCatalog {
    fn register_type(&mut self, info: TypeInfo);

    /// Register a free function callable as `"name"`.
    fn register_function(&mut self, name: &str, function: Function);
}
