//! Error types for Dim resolution and invocation.
//!
//! Every failure surfaces synchronously to the caller. Messages name the
//! type, method or parameter involved and, where possible, a way out.

use std::fmt;

use dim_support::rendering::shorten_type_name;

use crate::reflect::TypeKind;

/// Main error type for all Dim operations.
#[derive(Debug, thiserror::Error)]
pub enum DimError {
    /// The named type does not exist, or cannot be instantiated.
    #[error("{}", .0)]
    InvalidType(InvalidTypeError),

    /// A resolved method target is not publicly invocable.
    #[error("Can not access to non-public method {type_name}::{method}.")]
    InaccessibleMethod { type_name: String, method: String },

    /// A required parameter could not be satisfied.
    #[error("{}", .0)]
    MissingArgument(MissingArgumentError),

    /// The target type does not declare the requested method.
    #[error("Method {type_name}::{method} does not exist.")]
    UnknownMethod { type_name: String, method: String },

    /// An instance method was requested through a type name.
    #[error("Non-static method {type_name}::{method} can not be called without an instance.")]
    NonStaticMethod { type_name: String, method: String },

    /// The callable reference could not be normalized into something invocable.
    #[error("A callable expected, got {description}.")]
    NotCallable { description: String },

    /// A host container was asked for a name it does not know.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A value did not hold the Rust type the target asked for.
    #[error("{}", .0)]
    ArgumentType(ArgumentTypeError),

    /// The invoked constructor, method or function reported its own failure.
    #[error("{callable} failed: {source}")]
    InvocationFailed {
        callable: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DimError {
    /// Wraps an error raised inside a user-supplied constructor or callable.
    pub fn failed(
        callable: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        DimError::InvocationFailed {
            callable: callable.into(),
            source: source.into(),
        }
    }

    pub(crate) fn unknown_type(type_name: &str, suggestions: Vec<String>) -> Self {
        DimError::InvalidType(InvalidTypeError {
            type_name: type_name.to_string(),
            reason: InvalidTypeReason::Unknown,
            suggestions,
        })
    }

    pub(crate) fn not_instantiable(type_name: &str, kind: TypeKind) -> Self {
        DimError::InvalidType(InvalidTypeError {
            type_name: type_name.to_string(),
            reason: InvalidTypeReason::NotInstantiable(kind),
            suggestions: Vec::new(),
        })
    }
}

/// Why a type name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTypeReason {
    /// Nothing is registered under the name.
    Unknown,
    /// The type is abstract, an interface, or has no way to be built.
    NotInstantiable(TypeKind),
}

/// Error when a type name cannot be used for instantiation.
#[derive(Debug)]
pub struct InvalidTypeError {
    pub type_name: String,
    pub reason: InvalidTypeReason,
    /// Registered names close to the requested one.
    pub suggestions: Vec<String>,
}

impl fmt::Display for InvalidTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            InvalidTypeReason::Unknown => {
                write!(f, "A class name expected: {} is not registered", self.type_name)?;
            }
            InvalidTypeReason::NotInstantiable(kind) => {
                write!(f, "{} class is not instantiable", self.type_name)?;
                match kind {
                    TypeKind::Concrete => write!(f, " (no constructor is declared)")?,
                    TypeKind::Abstract => write!(f, " (abstract)")?,
                    TypeKind::Interface => write!(f, " (interface)")?,
                }
            }
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }
        Ok(())
    }
}

/// Error when a parameter has no supplied value, no default and
/// cannot be autowired.
#[derive(Debug)]
pub struct MissingArgumentError {
    /// The constructor, method or function being resolved.
    pub callable: String,
    pub parameter: String,
    pub position: usize,
    pub declared_type: Option<String>,
}

impl fmt::Display for MissingArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough arguments: {} is missing ${} (position {})",
            self.callable, self.parameter, self.position,
        )?;
        write!(
            f,
            "\n  Hint: supply it by name (\"{}\") or by position ({})",
            self.parameter, self.position,
        )?;
        if let Some(ref declared) = self.declared_type {
            write!(f, ", or make {declared} available in the container")?;
        }
        Ok(())
    }
}

/// Error when a container has nothing under the requested name.
#[derive(Debug)]
pub struct NotRegisteredError {
    pub requested: String,
    /// Similar names that ARE registered.
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service not registered: {}", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }
        Ok(())
    }
}

/// Error when a value holds a different Rust type than expected.
#[derive(Debug)]
pub struct ArgumentTypeError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl fmt::Display for ArgumentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type mismatch: expected {}, found {}",
            shorten_type_name(self.expected),
            shorten_type_name(self.found),
        )
    }
}

/// Convenient Result type for Dim operations.
pub type Result<T> = std::result::Result<T, DimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inaccessible_method_names_type_and_method() {
        let err = DimError::InaccessibleMethod {
            type_name: "Foo".into(),
            method: "bar".into(),
        };
        assert_eq!(err.to_string(), "Can not access to non-public method Foo::bar.");
    }

    #[test]
    fn unknown_type_display_with_suggestions() {
        let err = DimError::unknown_type("Mialer", vec!["Mailer".into()]);

        let msg = format!("{err}");
        assert!(msg.contains("A class name expected"));
        assert!(msg.contains("Mialer"));
        assert!(msg.contains("- Mailer"));
    }

    #[test]
    fn not_instantiable_display() {
        let err = DimError::not_instantiable("Bar", TypeKind::Abstract);
        let msg = format!("{err}");
        assert!(msg.starts_with("Bar class is not instantiable"));
        assert!(msg.contains("abstract"));
    }

    #[test]
    fn missing_argument_display() {
        let err = DimError::MissingArgument(MissingArgumentError {
            callable: "FooBar::__construct".into(),
            parameter: "foo".into(),
            position: 0,
            declared_type: Some("Foo".into()),
        });

        let msg = format!("{err}");
        assert!(msg.contains("Not enough arguments"));
        assert!(msg.contains("$foo"));
        assert!(msg.contains("make Foo available"));
    }

    #[test]
    fn argument_type_display_is_shortened() {
        let err = DimError::ArgumentType(ArgumentTypeError {
            expected: "alloc::string::String",
            found: "i32",
        });
        assert_eq!(err.to_string(), "Type mismatch: expected String, found i32");
    }

    #[test]
    fn failed_keeps_source() {
        use std::error::Error as _;

        let err = DimError::failed("Mailer::send", "smtp unreachable");
        assert!(err.to_string().contains("Mailer::send failed"));
        assert!(err.source().is_some());
    }
}
