//! Callable invocation.
//!
//! A [`Callable`] is one of four shapes: a `(target, method)` pair, a
//! `"Type::method"` path, an invocable object, or a plain function.
//! [`Invoker`] normalizes the shape once, checks that a method target is
//! public, resolves the parameters and calls it.

use std::fmt;
use std::sync::Arc;

use dim_support::rendering::shorten_type_name;
use tracing::{debug, instrument};

use crate::arguments::ArgumentMap;
use crate::container::ContainerRef;
use crate::error::{DimError, Result};
use crate::parameter::ParameterSpec;
use crate::reflect::{Function, INVOKE, Receiver, TypeInfo};
use crate::registry::TypeRegistry;
use crate::resolver::resolve_parameters;
use crate::value::Value;

/// Separates type and method in a callable path.
pub const METHOD_SEPARATOR: &str = "::";

/// What a method is looked up on.
#[derive(Debug, Clone)]
pub enum Target {
    /// A registered type name; only static methods can be called.
    Type(String),
    /// An instance whose Rust type is registered.
    Instance(Value),
}

impl From<&str> for Target {
    fn from(type_name: &str) -> Self {
        Target::Type(type_name.to_string())
    }
}

impl From<String> for Target {
    fn from(type_name: String) -> Self {
        Target::Type(type_name)
    }
}

impl From<Value> for Target {
    fn from(instance: Value) -> Self {
        Target::Instance(instance)
    }
}

/// A reference to something invocable.
///
/// # Examples
/// ```
/// use dim_container::invoker::{Callable, Target};
/// use dim_container::value::Value;
///
/// let pair = Callable::method("Mailer", "create");
/// let path = Callable::from("Mailer::create");
/// let named_function = Callable::from("default_sender");
/// # let _ = (pair, path, named_function);
/// ```
#[derive(Debug, Clone)]
pub enum Callable {
    /// A `(target, method)` pair.
    Method(Target, String),
    /// `"Type::method"`, or the name of a registered function.
    Path(String),
    /// A value called through its type's `invoke` method, or a value
    /// holding a [`Function`].
    Object(Value),
    Function(Function),
}

impl Callable {
    pub fn method(target: impl Into<Target>, method: impl Into<String>) -> Self {
        Callable::Method(target.into(), method.into())
    }
}

impl From<&str> for Callable {
    fn from(path: &str) -> Self {
        Callable::Path(path.to_string())
    }
}

impl From<String> for Callable {
    fn from(path: String) -> Self {
        Callable::Path(path)
    }
}

impl From<Value> for Callable {
    fn from(object: Value) -> Self {
        Callable::Object(object)
    }
}

impl From<Function> for Callable {
    fn from(function: Function) -> Self {
        Callable::Function(function)
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Method(Target::Type(type_name), method) => {
                write!(f, "{type_name}{METHOD_SEPARATOR}{method}")
            }
            Callable::Method(Target::Instance(value), method) => {
                write!(f, "{}{METHOD_SEPARATOR}{method}", shorten_type_name(value.type_name()))
            }
            Callable::Path(path) => write!(f, "{path}"),
            Callable::Object(value) => write!(f, "object {}", shorten_type_name(value.type_name())),
            Callable::Function(function) => write!(f, "{}", function.display_name()),
        }
    }
}

/// A callable after normalization.
enum Prepared {
    Method {
        info: Arc<TypeInfo>,
        method: String,
        receiver: Option<Value>,
    },
    Function(Function),
}

impl Prepared {
    fn name(&self) -> String {
        match self {
            Prepared::Method { info, method, .. } => {
                format!("{}{METHOD_SEPARATOR}{method}", info.name())
            }
            Prepared::Function(function) => function.display_name().to_string(),
        }
    }

    fn parameters(&self) -> &[ParameterSpec] {
        match self {
            Prepared::Method { info, method, .. } => info
                .method(method)
                .map(|m| m.parameters())
                .unwrap_or_default(),
            Prepared::Function(function) => function.parameters(),
        }
    }
}

/// Invokes callables against a [`TypeRegistry`].
///
/// # Examples
/// ```
/// use dim_container::args;
/// use dim_container::invoker::{Callable, Invoker};
/// use dim_container::parameter::Signature;
/// use dim_container::reflect::Function;
/// use dim_container::registry::TypeRegistry;
///
/// let registry = TypeRegistry::builder().build();
/// let add = Function::new(Signature::new().param("a").param("b"), |args| {
///     Ok(args.arg::<i32>(0)? + args.arg::<i32>(1)?)
/// });
///
/// let sum = Invoker::new(&registry)
///     .invoke(&Callable::from(add), &args! { "b" => 2, 0 => 40 }, None)
///     .unwrap();
/// assert_eq!(sum.cast::<i32>().unwrap(), 42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Invoker<'r> {
    types: &'r TypeRegistry,
}

impl<'r> Invoker<'r> {
    pub fn new(types: &'r TypeRegistry) -> Self {
        Self { types }
    }

    /// Normalizes `callable`, resolves its parameters and calls it.
    ///
    /// # Errors
    /// - [`DimError::InvalidType`] for an unknown target type
    /// - [`DimError::UnknownMethod`], [`DimError::InaccessibleMethod`],
    ///   [`DimError::NonStaticMethod`] for unusable method targets
    /// - [`DimError::NotCallable`] for anything else that cannot be called
    /// - [`DimError::MissingArgument`] from parameter resolution
    /// - whatever the callable itself returns
    #[instrument(skip_all, name = "invoke", fields(callable = %callable))]
    pub fn invoke(
        &self,
        callable: &Callable,
        arguments: &ArgumentMap,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        let prepared = self.prepare(callable)?;
        let name = prepared.name();
        let resolved = resolve_parameters(&name, prepared.parameters(), arguments, container)?;
        debug!(callable = %name, arguments = resolved.len(), "Invoking");

        match &prepared {
            Prepared::Method {
                info,
                method,
                receiver,
            } => {
                let method = info.method(method).ok_or_else(|| DimError::UnknownMethod {
                    type_name: info.name().to_string(),
                    method: method.clone(),
                })?;
                method.call(receiver.as_ref(), resolved)
            }
            Prepared::Function(function) => function.call(resolved),
        }
    }

    /// Normalizes `callable` and returns its declared parameters, without
    /// calling it.
    ///
    /// Fails exactly where [`invoke`](Invoker::invoke) would fail before
    /// parameter resolution.
    pub fn describe(&self, callable: &Callable) -> Result<Vec<ParameterSpec>> {
        Ok(self.prepare(callable)?.parameters().to_vec())
    }

    fn prepare(&self, callable: &Callable) -> Result<Prepared> {
        match callable {
            Callable::Method(target, method) => self.prepare_method(target, method),
            Callable::Path(path) => match path.rsplit_once(METHOD_SEPARATOR) {
                Some((type_name, method)) => {
                    self.prepare_method(&Target::Type(type_name.to_string()), method)
                }
                None => self
                    .types
                    .function(path)
                    .map(|function| Prepared::Function(function.as_ref().clone()))
                    .ok_or_else(|| DimError::NotCallable {
                        description: format!("\"{path}\""),
                    }),
            },
            Callable::Object(value) => {
                let invocable = self
                    .types
                    .type_of(value)
                    .is_some_and(|info| info.method(INVOKE).is_some());
                if invocable {
                    return self.prepare_method(&Target::Instance(value.clone()), INVOKE);
                }
                value
                    .downcast_ref::<Function>()
                    .map(|function| Prepared::Function(function.clone()))
                    .ok_or_else(|| DimError::NotCallable {
                        description: format!("a value of type {}", shorten_type_name(value.type_name())),
                    })
            }
            Callable::Function(function) => Ok(Prepared::Function(function.clone())),
        }
    }

    fn prepare_method(&self, target: &Target, method: &str) -> Result<Prepared> {
        let (info, receiver) = match target {
            Target::Type(type_name) => {
                let info = self.types.get(type_name).ok_or_else(|| {
                    DimError::unknown_type(type_name, self.types.suggestions(type_name))
                })?;
                (info, None)
            }
            Target::Instance(value) => {
                let info = self
                    .types
                    .type_of(value)
                    .ok_or_else(|| DimError::unknown_type(value.type_name(), Vec::new()))?;
                (info, Some(value.clone()))
            }
        };

        let declared = info.method(method).ok_or_else(|| DimError::UnknownMethod {
            type_name: info.name().to_string(),
            method: method.to_string(),
        })?;

        if !declared.visibility().is_public() {
            return Err(DimError::InaccessibleMethod {
                type_name: info.name().to_string(),
                method: method.to_string(),
            });
        }

        if declared.receiver() == Receiver::Instance && receiver.is_none() {
            return Err(DimError::NonStaticMethod {
                type_name: info.name().to_string(),
                method: method.to_string(),
            });
        }

        Ok(Prepared::Method {
            info: Arc::clone(info),
            method: method.to_string(),
            receiver,
        })
    }
}
