//! Service descriptors.
//!
//! A descriptor binds a type name to default constructor arguments and
//! produces a fresh instance on every [`get`](Service::get). Call-time
//! arguments are laid over the defaults key by key; call-time keys win.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::arguments::ArgumentMap;
use crate::container::ContainerRef;
use crate::error::{DimError, Result};
use crate::instantiator::Instantiator;
use crate::invoker::{Callable, Invoker};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Something a host container can store under a name and ask for values.
pub trait Service: Send + Sync {
    /// The type this service produces.
    fn type_name(&self) -> &str;

    /// Produces a value, overlaying `arguments` on the service's defaults.
    fn get(&self, arguments: Option<&ArgumentMap>, container: Option<&dyn ContainerRef>)
    -> Result<Value>;
}

fn merge(arguments: Option<&ArgumentMap>, defaults: &ArgumentMap) -> ArgumentMap {
    match arguments {
        Some(arguments) => arguments.clone().overlay(defaults),
        None => defaults.clone(),
    }
}

/// A type name plus default constructor arguments.
///
/// # Examples
/// ```
/// use dim_container::args;
/// use dim_container::descriptor::ServiceDescriptor;
/// use dim_container::parameter::Signature;
/// use dim_container::reflect::TypeInfo;
/// use dim_container::registry::TypeRegistry;
/// use dim_container::value::Value;
/// use std::sync::Arc;
///
/// struct Transport { host: String, port: u16 }
///
/// let registry = Arc::new(
///     TypeRegistry::builder()
///         .add_type(
///             TypeInfo::builder::<Transport>("Transport")
///                 .constructor(Signature::new().param("host").param("port"), |args| {
///                     Ok(Transport { host: args.arg(0)?, port: args.arg(1)? })
///                 })
///                 .build(),
///         )
///         .build(),
/// );
///
/// let service = ServiceDescriptor::in_registry(
///     registry,
///     "Transport",
///     args! { "host" => String::from("localhost"), "port" => 25u16 },
/// )
/// .unwrap();
///
/// let transport = service.get(Some(&args! { "port" => 2525u16 }), None).unwrap();
/// let transport = transport.cast_ref::<Transport>().unwrap();
/// assert_eq!(transport.host, "localhost");
/// assert_eq!(transport.port, 2525);
/// ```
#[derive(Clone)]
pub struct ServiceDescriptor {
    types: Arc<TypeRegistry>,
    type_name: String,
    arguments: ArgumentMap,
}

impl ServiceDescriptor {
    /// Describes `type_name` from the global catalogue.
    ///
    /// # Errors
    /// [`DimError::InvalidType`] if the type is unknown or not instantiable.
    pub fn new(
        type_name: impl Into<String>,
        arguments: impl Into<Option<ArgumentMap>>,
    ) -> Result<Self> {
        Self::in_registry(TypeRegistry::global(), type_name, arguments)
    }

    /// Describes `type_name` from an explicit catalogue.
    ///
    /// # Errors
    /// [`DimError::InvalidType`] if the type is unknown or not instantiable.
    pub fn in_registry(
        types: Arc<TypeRegistry>,
        type_name: impl Into<String>,
        arguments: impl Into<Option<ArgumentMap>>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        let info = types
            .get(&type_name)
            .ok_or_else(|| DimError::unknown_type(&type_name, types.suggestions(&type_name)))?;
        if !info.is_instantiable() {
            return Err(DimError::not_instantiable(&type_name, info.kind()));
        }

        let arguments = arguments.into().unwrap_or_default();
        debug!(type_name = %type_name, defaults = arguments.len(), "Service described");
        Ok(Self {
            types,
            type_name,
            arguments,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The default arguments given at construction.
    pub fn arguments(&self) -> &ArgumentMap {
        &self.arguments
    }

    /// Builds a new instance.
    ///
    /// `arguments` is laid over the defaults; the merged map is handed to
    /// the [`Instantiator`] together with `container`.
    #[instrument(skip_all, name = "service.get", fields(type_name = %self.type_name))]
    pub fn get(
        &self,
        arguments: Option<&ArgumentMap>,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        let merged = merge(arguments, &self.arguments);
        Instantiator::new(&self.types).instantiate(&self.type_name, &merged, container)
    }

    /// Same as [`get`](ServiceDescriptor::get).
    pub fn call(
        &self,
        arguments: Option<&ArgumentMap>,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        self.get(arguments, container)
    }

    /// The descriptor as a plain closure with `get`'s signature.
    ///
    /// ```
    /// # use dim_container::descriptor::ServiceDescriptor;
    /// # use dim_container::reflect::TypeInfo;
    /// # use dim_container::registry::TypeRegistry;
    /// # use std::sync::Arc;
    /// struct Clock;
    ///
    /// let registry = Arc::new(
    ///     TypeRegistry::builder()
    ///         .add_type(TypeInfo::builder::<Clock>("Clock").without_constructor(|| Clock).build())
    ///         .build(),
    /// );
    /// let make_clock = ServiceDescriptor::in_registry(registry, "Clock", None)
    ///     .unwrap()
    ///     .as_fn();
    ///
    /// assert!(make_clock(None, None).unwrap().is::<Clock>());
    /// ```
    pub fn as_fn(
        &self,
    ) -> impl Fn(Option<&ArgumentMap>, Option<&dyn ContainerRef>) -> Result<Value> + Send + Sync + use<>
    {
        let service = self.clone();
        move |arguments: Option<&ArgumentMap>, container: Option<&dyn ContainerRef>| {
            service.get(arguments, container)
        }
    }
}

impl Service for ServiceDescriptor {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(
        &self,
        arguments: Option<&ArgumentMap>,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        ServiceDescriptor::get(self, arguments, container)
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("type_name", &self.type_name)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// A type name produced by calling a callable with default arguments.
#[derive(Clone)]
pub struct FactoryDescriptor {
    types: Arc<TypeRegistry>,
    type_name: String,
    callable: Callable,
    arguments: ArgumentMap,
}

impl FactoryDescriptor {
    /// Binds `callable` as the factory of `type_name` from the global catalogue.
    pub fn new(
        type_name: impl Into<String>,
        callable: impl Into<Callable>,
        arguments: impl Into<Option<ArgumentMap>>,
    ) -> Result<Self> {
        Self::in_registry(TypeRegistry::global(), type_name, callable, arguments)
    }

    /// Binds `callable` as the factory of `type_name`.
    ///
    /// # Errors
    /// - [`DimError::InvalidType`] if the type is unknown
    /// - whatever normalizing `callable` fails with, e.g.
    ///   [`DimError::NotCallable`] or [`DimError::InaccessibleMethod`]
    pub fn in_registry(
        types: Arc<TypeRegistry>,
        type_name: impl Into<String>,
        callable: impl Into<Callable>,
        arguments: impl Into<Option<ArgumentMap>>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        if !types.contains(&type_name) {
            return Err(DimError::unknown_type(&type_name, types.suggestions(&type_name)));
        }

        let callable = callable.into();
        Invoker::new(&types).describe(&callable)?;

        let arguments = arguments.into().unwrap_or_default();
        debug!(type_name = %type_name, callable = %callable, "Factory described");
        Ok(Self {
            types,
            type_name,
            callable,
            arguments,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    pub fn arguments(&self) -> &ArgumentMap {
        &self.arguments
    }

    /// Calls the factory with `arguments` laid over the defaults.
    #[instrument(skip_all, name = "factory.get", fields(type_name = %self.type_name))]
    pub fn get(
        &self,
        arguments: Option<&ArgumentMap>,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        let merged = merge(arguments, &self.arguments);
        Invoker::new(&self.types).invoke(&self.callable, &merged, container)
    }
}

impl Service for FactoryDescriptor {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get(
        &self,
        arguments: Option<&ArgumentMap>,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        FactoryDescriptor::get(self, arguments, container)
    }
}

impl fmt::Debug for FactoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryDescriptor")
            .field("type_name", &self.type_name)
            .field("callable", &self.callable.to_string())
            .field("arguments", &self.arguments)
            .finish()
    }
}
