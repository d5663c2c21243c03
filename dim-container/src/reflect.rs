//! Declarative reflection.
//!
//! Rust has no runtime reflection, so everything the resolvers need to
//! know about a type is registered up front: its kind, how to build it,
//! and which methods it exposes with which parameters.
//!
//! # Examples
//! ```
//! use dim_container::parameter::Signature;
//! use dim_container::reflect::{Method, TypeInfo, TypeKind};
//!
//! struct Transport { host: String }
//!
//! let info = TypeInfo::builder::<Transport>("Transport")
//!     .constructor(Signature::new().param("host"), |args| {
//!         Ok(Transport { host: args.arg::<String>(0)? })
//!     })
//!     .method(Method::new_instance("host", Signature::new(), |this, _| {
//!         Ok(this.cast_ref::<Transport>()?.host.clone())
//!     }))
//!     .build();
//!
//! assert_eq!(info.kind(), TypeKind::Concrete);
//! assert!(info.is_instantiable());
//! assert!(info.method("host").is_some());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DimError, Result};
use crate::parameter::{ParameterSpec, Signature};
use crate::resolver::ResolvedArguments;
use crate::value::Value;

/// Name of the method that makes an instance invocable as a whole.
pub const INVOKE: &str = "invoke";

/// Builds an instance from resolved constructor arguments.
pub type ConstructFn = Arc<dyn Fn(ResolvedArguments) -> Result<Value> + Send + Sync>;

/// Calls a method; the receiver is `None` for static calls.
pub type MethodFn = Arc<dyn Fn(Option<&Value>, ResolvedArguments) -> Result<Value> + Send + Sync>;

/// Calls a free function or closure.
pub type FunctionFn = Arc<dyn Fn(ResolvedArguments) -> Result<Value> + Send + Sync>;

/// What kind of type a [`TypeInfo`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Concrete,
    /// Cannot be instantiated; may still expose static methods.
    Abstract,
    /// A contract only; never instantiated.
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[inline]
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Whether a method needs an instance to be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    Static,
    Instance,
}

/// A declared constructor: its parameters and how to build from them.
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<ParameterSpec>,
    build: ConstructFn,
}

impl Constructor {
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn build(&self, arguments: ResolvedArguments) -> Result<Value> {
        (self.build)(arguments)
    }
}

/// How a concrete type is brought into existence.
#[derive(Clone)]
pub enum Instantiation {
    /// The type declares no constructor; it is built with no arguments.
    WithoutConstructor(Arc<dyn Fn() -> Value + Send + Sync>),
    Constructor(Constructor),
}

/// A method exposed by a registered type.
#[derive(Clone)]
pub struct Method {
    name: String,
    visibility: Visibility,
    receiver: Receiver,
    parameters: Vec<ParameterSpec>,
    call: MethodFn,
}

impl Method {
    /// A public static method.
    pub fn new_static<F, R>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(ResolvedArguments) -> Result<R> + Send + Sync + 'static,
        R: Any + Send + Sync,
    {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            receiver: Receiver::Static,
            parameters: signature.into_parameters(),
            call: Arc::new(move |_: Option<&Value>, arguments: ResolvedArguments| {
                f(arguments).map(Value::new)
            }),
        }
    }

    /// A public instance method; `f` receives the instance first.
    pub fn new_instance<F, R>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(&Value, ResolvedArguments) -> Result<R> + Send + Sync + 'static,
        R: Any + Send + Sync,
    {
        let name = name.into();
        let method = name.clone();
        Self {
            name,
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            parameters: signature.into_parameters(),
            call: Arc::new(move |receiver: Option<&Value>, arguments: ResolvedArguments| {
                let receiver = receiver.ok_or_else(|| {
                    let callable = arguments.callable();
                    let type_name = callable.rsplit_once("::").map_or(callable, |(t, _)| t);
                    DimError::NonStaticMethod {
                        type_name: type_name.to_string(),
                        method: method.clone(),
                    }
                })?;
                f(receiver, arguments).map(Value::new)
            }),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    pub fn protected(self) -> Self {
        self.with_visibility(Visibility::Protected)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn call(&self, receiver: Option<&Value>, arguments: ResolvedArguments) -> Result<Value> {
        (self.call)(receiver, arguments)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("receiver", &self.receiver)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A free function or closure with declared parameters.
///
/// ```
/// use dim_container::parameter::Signature;
/// use dim_container::reflect::Function;
///
/// let greet = Function::new(Signature::new().param("name"), |args| {
///     Ok(format!("Hello, {}!", args.arg::<&str>(0)?))
/// })
/// .named("greet");
///
/// assert_eq!(greet.display_name(), "greet");
/// assert_eq!(greet.parameters().len(), 1);
/// ```
#[derive(Clone)]
pub struct Function {
    name: Option<String>,
    parameters: Vec<ParameterSpec>,
    body: FunctionFn,
}

impl Function {
    pub fn new<F, R>(signature: Signature, f: F) -> Self
    where
        F: Fn(ResolvedArguments) -> Result<R> + Send + Sync + 'static,
        R: Any + Send + Sync,
    {
        Self {
            name: None,
            parameters: signature.into_parameters(),
            body: Arc::new(move |arguments| f(arguments).map(Value::new)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The registered name, or `{closure}` for anonymous functions.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("{closure}")
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn call(&self, arguments: ResolvedArguments) -> Result<Value> {
        (self.body)(arguments)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.display_name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Everything the resolvers know about one registered type.
#[derive(Clone)]
pub struct TypeInfo {
    name: String,
    rust_type: Option<TypeId>,
    kind: TypeKind,
    instantiation: Option<Instantiation>,
    methods: HashMap<String, Method>,
}

impl TypeInfo {
    /// Starts describing the concrete Rust type `T` under `name`.
    pub fn builder<T: Any>(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder::new(name.into(), Some(TypeId::of::<T>()), TypeKind::Concrete)
    }

    /// Starts describing an abstract type.
    pub fn abstract_type(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder::new(name.into(), None, TypeKind::Abstract)
    }

    /// Starts describing an interface.
    pub fn interface(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder::new(name.into(), None, TypeKind::Interface)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn rust_type(&self) -> Option<TypeId> {
        self.rust_type
    }

    /// A concrete type with a way to build it.
    pub fn is_instantiable(&self) -> bool {
        self.kind == TypeKind::Concrete && self.instantiation.is_some()
    }

    pub fn instantiation(&self) -> Option<&Instantiation> {
        self.instantiation.as_ref()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("instantiable", &self.is_instantiable())
            .field("methods", &methods)
            .finish()
    }
}

/// Builder for [`TypeInfo`].
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    fn new(name: String, rust_type: Option<TypeId>, kind: TypeKind) -> Self {
        Self {
            info: TypeInfo {
                name,
                rust_type,
                kind,
                instantiation: None,
                methods: HashMap::new(),
            },
        }
    }

    /// The type declares no constructor; `f` builds it with no arguments.
    pub fn without_constructor<F, T>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.info.instantiation = Some(Instantiation::WithoutConstructor(Arc::new(move || {
            Value::new(f())
        })));
        self
    }

    /// Declares a constructor taking the parameters of `signature`.
    pub fn constructor<F, T>(mut self, signature: Signature, f: F) -> Self
    where
        F: Fn(ResolvedArguments) -> Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.info.instantiation = Some(Instantiation::Constructor(Constructor {
            parameters: signature.into_parameters(),
            build: Arc::new(move |arguments| f(arguments).map(Value::new)),
        }));
        self
    }

    /// Adds a method, replacing any method with the same name.
    pub fn method(mut self, method: Method) -> Self {
        self.info.methods.insert(method.name.clone(), method);
        self
    }

    pub fn build(self) -> TypeInfo {
        self.info
    }
}
