//! Parameter resolution — the heart of Dim.
//!
//! Given a callable's declared parameters, the arguments a caller
//! supplied and an optional container, [`resolve_parameters`] decides
//! where every parameter's value comes from.
//!
//! # Lookup order
//! For each parameter, in declaration order:
//! 1. a supplied argument keyed by the parameter's **name**
//! 2. a supplied argument keyed by the parameter's **position**
//! 3. the parameter's declared **default**
//! 4. the container's instance of the parameter's **declared type**
//!    (autowiring), if a container is given and `has` it
//! 5. otherwise [`DimError::MissingArgument`]
//!
//! A callable that declares no parameters at all receives the supplied
//! map untouched, see [`ResolvedArguments::Passthrough`].

use std::any::Any;
use std::sync::Arc;

use tracing::trace;

use crate::arguments::ArgumentMap;
use crate::container::ContainerRef;
use crate::error::{DimError, MissingArgumentError, Result};
use crate::parameter::ParameterSpec;
use crate::value::Value;

/// Resolves `parameters` against `supplied` and `container`.
///
/// `callable` names the constructor, method or function being resolved;
/// it only feeds error messages and [`ResolvedArguments::callable`].
///
/// # Errors
/// - [`DimError::MissingArgument`] for the first parameter nothing can satisfy
/// - whatever the container's `get` fails with while autowiring
///
/// # Examples
/// ```
/// use dim_container::args;
/// use dim_container::parameter::Signature;
/// use dim_container::resolver::resolve_parameters;
/// use dim_container::value::Value;
///
/// let signature = Signature::new()
///     .param("bar")
///     .param("foobar")
///     .optional("null", Value::unit());
///
/// let resolved = resolve_parameters(
///     "demo",
///     signature.parameters(),
///     &args! { "bar" => "bar", 1 => "foobar" },
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(resolved.len(), 3);
/// assert_eq!(resolved.arg::<&str>(1).unwrap(), "foobar");
/// ```
pub fn resolve_parameters(
    callable: &str,
    parameters: &[ParameterSpec],
    supplied: &ArgumentMap,
    container: Option<&dyn ContainerRef>,
) -> Result<ResolvedArguments> {
    if parameters.is_empty() {
        trace!(callable, supplied = supplied.len(), "No declared parameters, passing arguments through");
        return Ok(ResolvedArguments::passthrough(callable, supplied.clone()));
    }

    let values = parameters
        .iter()
        .map(|parameter| resolve_one(callable, parameter, supplied, container))
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedArguments::ordered(callable, values))
}

fn resolve_one(
    callable: &str,
    parameter: &ParameterSpec,
    supplied: &ArgumentMap,
    container: Option<&dyn ContainerRef>,
) -> Result<Value> {
    let name = parameter.name();
    let position = parameter.position();

    if let Some(value) = supplied.get_name(name) {
        trace!(callable, parameter = name, "Supplied by name");
        return Ok(value.clone());
    }

    if let Some(value) = supplied.get_position(position) {
        trace!(callable, parameter = name, position, "Supplied by position");
        return Ok(value.clone());
    }

    if let Some(value) = parameter.default_value() {
        trace!(callable, parameter = name, "Using declared default");
        return Ok(value.clone());
    }

    if let (Some(type_name), Some(container)) = (parameter.declared_type(), container) {
        if container.has(type_name) {
            trace!(callable, parameter = name, type_name, "Autowiring from container");
            return container.get(type_name);
        }
    }

    Err(DimError::MissingArgument(MissingArgumentError {
        callable: callable.to_string(),
        parameter: name.to_string(),
        position,
        declared_type: parameter.declared_type().map(str::to_string),
    }))
}

/// The argument list handed to a constructor, method or function.
#[derive(Debug, Clone)]
pub enum ResolvedArguments {
    /// One value per declared parameter, in declaration order.
    Ordered { callable: String, values: Vec<Value> },
    /// The caller's map, untouched, for targets that declare no parameters.
    Passthrough { callable: String, arguments: ArgumentMap },
}

impl ResolvedArguments {
    pub fn ordered(callable: impl Into<String>, values: Vec<Value>) -> Self {
        ResolvedArguments::Ordered {
            callable: callable.into(),
            values,
        }
    }

    pub fn passthrough(callable: impl Into<String>, arguments: ArgumentMap) -> Self {
        ResolvedArguments::Passthrough {
            callable: callable.into(),
            arguments,
        }
    }

    /// Name of the callable these arguments were resolved for.
    pub fn callable(&self) -> &str {
        match self {
            ResolvedArguments::Ordered { callable, .. }
            | ResolvedArguments::Passthrough { callable, .. } => callable,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResolvedArguments::Ordered { values, .. } => values.len(),
            ResolvedArguments::Passthrough { arguments, .. } => arguments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, ResolvedArguments::Passthrough { .. })
    }

    /// The `index`-th value.
    ///
    /// For passed-through maps this is the `index`-th entry in insertion
    /// order; keys are not consulted.
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self {
            ResolvedArguments::Ordered { values, .. } => values.get(index),
            ResolvedArguments::Passthrough { arguments, .. } => {
                arguments.get_index(index).map(|(_, value)| value)
            }
        }
    }

    /// Looks up a passed-through argument by name.
    ///
    /// Always `None` for ordered arguments, whose names were consumed
    /// by resolution.
    pub fn named(&self, name: &str) -> Option<&Value> {
        match self {
            ResolvedArguments::Ordered { .. } => None,
            ResolvedArguments::Passthrough { arguments, .. } => arguments.get_name(name),
        }
    }

    /// Clones the `index`-th value out as `T`.
    ///
    /// # Errors
    /// [`DimError::MissingArgument`] if there is no such value,
    /// [`DimError::ArgumentType`] if it holds another type.
    pub fn arg<T: Any + Clone>(&self, index: usize) -> Result<T> {
        self.require(index)?.cast::<T>()
    }

    /// Returns the `index`-th value as a shared `Arc<T>`.
    pub fn arg_arc<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        self.require(index)?.cast_arc::<T>()
    }

    fn require(&self, index: usize) -> Result<&Value> {
        self.value(index).ok_or_else(|| {
            DimError::MissingArgument(MissingArgumentError {
                callable: self.callable().to_string(),
                parameter: format!("arg{index}"),
                position: index,
                declared_type: None,
            })
        })
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            ResolvedArguments::Ordered { values, .. } => values,
            ResolvedArguments::Passthrough { arguments, .. } => {
                arguments.into_iter().map(|(_, value)| value).collect()
            }
        }
    }
}
