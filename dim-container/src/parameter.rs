//! Declared parameters of constructors, methods and functions.

use crate::value::Value;

/// One declared parameter.
///
/// `position` is the 0-based index in the declaration; names and
/// positions are unique within a callable. `declared_type` is the
/// registered name of the parameter's type, or `None` when the
/// parameter is untyped (or typed with something the container never
/// provides, such as a primitive).
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    name: String,
    position: usize,
    declared_type: Option<String>,
    default: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            declared_type: None,
            default: None,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.declared_type = Some(type_name.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Builds an ordered parameter list, numbering positions as it goes.
///
/// ```
/// use dim_container::parameter::Signature;
/// use dim_container::value::Value;
///
/// let signature = Signature::new()
///     .typed("foo", "Foo")
///     .param("bar")
///     .param("foobar")
///     .optional("null", Value::unit());
///
/// let parameters = signature.parameters();
/// assert_eq!(parameters.len(), 4);
/// assert_eq!(parameters[0].declared_type(), Some("Foo"));
/// assert_eq!(parameters[2].position(), 2);
/// assert!(parameters[3].has_default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<ParameterSpec>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// An untyped, required parameter.
    pub fn param(self, name: impl Into<String>) -> Self {
        self.push(|spec| spec, name)
    }

    /// A required parameter the container may autowire.
    pub fn typed(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(|spec| spec.with_type(type_name), name)
    }

    /// An untyped parameter with a declared default.
    pub fn optional(self, name: impl Into<String>, default: Value) -> Self {
        self.push(|spec| spec.with_default(default), name)
    }

    /// A typed parameter with a declared default.
    ///
    /// The default wins over autowiring.
    pub fn optional_typed(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: Value,
    ) -> Self {
        self.push(|spec| spec.with_type(type_name).with_default(default), name)
    }

    fn push(
        mut self,
        configure: impl FnOnce(ParameterSpec) -> ParameterSpec,
        name: impl Into<String>,
    ) -> Self {
        let position = self.parameters.len();
        self.parameters.push(configure(ParameterSpec::new(name, position)));
        self
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn into_parameters(self) -> Vec<ParameterSpec> {
        self.parameters
    }
}

impl From<Signature> for Vec<ParameterSpec> {
    fn from(signature: Signature) -> Self {
        signature.parameters
    }
}
