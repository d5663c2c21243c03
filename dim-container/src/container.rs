//! # Containers
//!
//! [`ContainerRef`] is all the resolvers need from a host: whether it
//! holds something under a type name, and that thing. [`Container`] is a
//! small reference host built on top of it.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container ── get(name) ──> Value
//!                                    │
//!                        Instance ───┤ returned as stored
//!                        Service  ───┘ service.get(None, Some(container))
//! ```
//!
//! Services are asked for a new value on every `get`, with the container
//! itself passed along so their constructors can autowire further
//! registered types.
//!
//! # Examples
//! ```rust
//! use dim_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Transport;
//! struct Mailer { transport: Arc<Transport> }
//!
//! let registry = Arc::new(
//!     TypeRegistry::builder()
//!         .add_type(
//!             TypeInfo::builder::<Mailer>("Mailer")
//!                 .constructor(Signature::new().typed("transport", "Transport"), |args| {
//!                     Ok(Mailer { transport: args.arg_arc(0)? })
//!                 })
//!                 .build(),
//!         )
//!         .build(),
//! );
//!
//! let container = Container::builder()
//!     .instance("Transport", Transport)
//!     .register(ServiceDescriptor::in_registry(registry, "Mailer", None).unwrap())
//!     .build();
//!
//! let mailer = container.resolve_arc::<Mailer>("Mailer").unwrap();
//! let transport = container.resolve_arc::<Transport>("Transport").unwrap();
//! assert!(Arc::ptr_eq(&mailer.transport, &transport));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dim_support::rendering::suggest_similar;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::descriptor::Service;
use crate::error::{DimError, NotRegisteredError, Result};
use crate::value::Value;

const MAX_SUGGESTIONS: usize = 3;

/// What the resolvers need from a host container.
pub trait ContainerRef {
    /// Whether something is held under `type_name`.
    fn has(&self, type_name: &str) -> bool;

    /// The value held under `type_name`.
    fn get(&self, type_name: &str) -> Result<Value>;
}

#[derive(Clone)]
enum Entry {
    Instance(Value),
    Service(Arc<dyn Service>),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Instance(value) => f.debug_tuple("Instance").field(value).finish(),
            Entry::Service(service) => f.debug_tuple("Service").field(&service.type_name()).finish(),
        }
    }
}

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`].
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .instance("Config", Config::load())
///     .register(ServiceDescriptor::new("Database", None)?)
///     .service("Cache", FactoryDescriptor::new("Cache", "Cache::connect", None)?)
///     .build();
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    entries: HashMap<String, Entry>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Holds `value` under `name`; `get` returns it as stored.
    pub fn instance<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name.into(), Entry::Instance(Value::new(value)));
        self
    }

    /// Holds `service` under `name`; `get` asks it for a new value each time.
    pub fn service(mut self, name: impl Into<String>, service: impl Service + 'static) -> Self {
        self.insert(name.into(), Entry::Service(Arc::new(service)));
        self
    }

    /// Holds `service` under the name of the type it produces.
    pub fn register(self, service: impl Service + 'static) -> Self {
        let name = service.type_name().to_string();
        self.service(name, service)
    }

    pub fn build(self) -> Container {
        debug!(registered = self.entries.len(), "Container built");
        Container {
            entries: RwLock::new(self.entries),
        }
    }

    fn insert(&mut self, name: String, entry: Entry) {
        trace!(name = %name, entry = ?entry, "Registering");
        self.entries.insert(name, entry);
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A thread-safe name-to-value host.
///
/// Entries can be added after building through `&self`; a later entry
/// replaces an earlier one under the same name.
#[derive(Default)]
pub struct Container {
    entries: RwLock<HashMap<String, Entry>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn set_instance<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        let name = name.into();
        trace!(name = %name, "Setting instance");
        self.entries.write().insert(name, Entry::Instance(Value::new(value)));
    }

    pub fn set_service(&self, name: impl Into<String>, service: impl Service + 'static) {
        let name = name.into();
        trace!(name = %name, "Setting service");
        self.entries.write().insert(name, Entry::Service(Arc::new(service)));
    }

    /// Removes whatever is held under `name`.
    pub fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    /// Fetches `name` and clones it out as `T`.
    pub fn resolve<T: Any + Clone>(&self, name: &str) -> Result<T> {
        ContainerRef::get(self, name)?.cast::<T>()
    }

    /// Fetches `name` as a shared `Arc<T>`.
    pub fn resolve_arc<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        ContainerRef::get(self, name)?.cast_arc::<T>()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn not_registered(&self, name: &str) -> DimError {
        DimError::NotRegistered(NotRegisteredError {
            requested: name.to_string(),
            suggestions: suggest_similar(name, &self.names(), MAX_SUGGESTIONS),
        })
    }
}

impl ContainerRef for Container {
    fn has(&self, type_name: &str) -> bool {
        self.entries.read().contains_key(type_name)
    }

    fn get(&self, type_name: &str) -> Result<Value> {
        // Clone the entry out so services can call back into the container.
        let entry = self.entries.read().get(type_name).cloned();
        match entry {
            Some(Entry::Instance(value)) => {
                trace!(type_name, "Returning instance");
                Ok(value)
            }
            Some(Entry::Service(service)) => {
                trace!(type_name, "Calling service");
                service.get(None, Some(self))
            }
            None => Err(self.not_registered(type_name)),
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::descriptor::ServiceDescriptor;
    use crate::parameter::Signature;
    use crate::reflect::TypeInfo;
    use crate::registry::TypeRegistry;

    struct Foo;

    struct Bar {
        foo: Arc<Foo>,
    }

    struct Baz {
        bar: Arc<Bar>,
        label: String,
    }

    fn registry() -> Arc<TypeRegistry> {
        Arc::new(
            TypeRegistry::builder()
                .add_type(TypeInfo::builder::<Foo>("Foo").without_constructor(|| Foo).build())
                .add_type(
                    TypeInfo::builder::<Bar>("Bar")
                        .constructor(Signature::new().typed("foo", "Foo"), |args| {
                            Ok(Bar { foo: args.arg_arc(0)? })
                        })
                        .build(),
                )
                .add_type(
                    TypeInfo::builder::<Baz>("Baz")
                        .constructor(Signature::new().typed("bar", "Bar").param("label"), |args| {
                            Ok(Baz {
                                bar: args.arg_arc(0)?,
                                label: args.arg(1)?,
                            })
                        })
                        .build(),
                )
                .build(),
        )
    }

    fn service(name: &str) -> ServiceDescriptor {
        ServiceDescriptor::in_registry(registry(), name, None).unwrap()
    }

    #[test]
    fn instance_is_returned_as_stored() {
        let container = Container::builder().instance("answer", 42i32).build();

        let a = container.get("answer").unwrap();
        let b = container.get("answer").unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(container.resolve::<i32>("answer").unwrap(), 42);
    }

    #[test]
    fn service_is_called_on_every_get() {
        let container = Container::builder().register(service("Foo")).build();

        let a = container.get("Foo").unwrap();
        let b = container.get("Foo").unwrap();
        assert!(a.is::<Foo>());
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn services_autowire_through_the_container() {
        let container = Container::builder()
            .instance("Foo", Foo)
            .register(service("Bar"))
            .service(
                "Baz",
                ServiceDescriptor::in_registry(registry(), "Baz", args! { "label" => String::from("x") })
                    .unwrap(),
            )
            .build();

        let foo = container.resolve_arc::<Foo>("Foo").unwrap();
        let baz = container.resolve_arc::<Baz>("Baz").unwrap();
        assert_eq!(baz.label, "x");
        assert!(Arc::ptr_eq(&baz.bar.foo, &foo));
    }

    #[test]
    fn runtime_registration() {
        let container = Container::new();
        assert!(container.is_empty());
        assert!(!container.has("Foo"));

        container.set_service("Foo", service("Foo"));
        container.set_service("Bar", service("Bar"));
        assert!(container.has("Foo"));
        assert!(container.get("Bar").unwrap().is::<Bar>());

        container.set_instance("Foo", 1u8);
        assert!(container.get("Foo").unwrap().is::<u8>());
        assert!(container.remove("Foo"));
        assert_eq!(container.names(), vec!["Bar".to_string()]);
    }

    #[test]
    fn not_registered_suggests_names() {
        let container = Container::builder().register(service("Foo")).build();

        match container.get("Fooo").unwrap_err() {
            DimError::NotRegistered(err) => {
                assert_eq!(err.requested, "Fooo");
                assert_eq!(err.suggestions, vec!["Foo".to_string()]);
            }
            other => panic!("Expected NotRegistered, got: {other:?}"),
        }
    }

    #[test]
    fn missing_dependency_is_a_missing_argument() {
        let container = Container::builder().register(service("Bar")).build();
        assert!(matches!(
            container.get("Bar").unwrap_err(),
            DimError::MissingArgument(_)
        ));
    }

    #[test]
    fn debug_display() {
        let container = Container::builder()
            .instance("one", 1i32)
            .instance("two", String::from("2"))
            .build();

        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("2"));
    }
}
