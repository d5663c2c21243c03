//! Class instantiation.
//!
//! [`Instantiator`] is a stateless utility over a [`TypeRegistry`]: it
//! checks that a type can be built, resolves its constructor's parameters
//! and builds it. The instantiability check runs on every call.

use tracing::{debug, instrument};

use crate::arguments::ArgumentMap;
use crate::container::ContainerRef;
use crate::error::{DimError, Result};
use crate::reflect::{Instantiation, TypeKind};
use crate::registry::TypeRegistry;
use crate::resolver::resolve_parameters;
use crate::value::Value;

/// Name used for constructors in errors and logs.
const CONSTRUCTOR: &str = "__construct";

/// Builds instances of registered types.
///
/// # Examples
/// ```
/// use dim_container::args;
/// use dim_container::instantiator::Instantiator;
/// use dim_container::parameter::Signature;
/// use dim_container::reflect::TypeInfo;
/// use dim_container::registry::TypeRegistry;
///
/// struct Transport { host: String }
///
/// let registry = TypeRegistry::builder()
///     .add_type(
///         TypeInfo::builder::<Transport>("Transport")
///             .constructor(Signature::new().param("host"), |args| {
///                 Ok(Transport { host: args.arg::<&str>(0)?.to_string() })
///             })
///             .build(),
///     )
///     .build();
///
/// let transport = Instantiator::new(&registry)
///     .instantiate("Transport", &args! { "host" => "mx.local" }, None)
///     .unwrap();
/// assert_eq!(transport.cast_ref::<Transport>().unwrap().host, "mx.local");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Instantiator<'r> {
    types: &'r TypeRegistry,
}

impl<'r> Instantiator<'r> {
    pub fn new(types: &'r TypeRegistry) -> Self {
        Self { types }
    }

    /// Instantiates `type_name` with `arguments`, autowiring from `container`.
    ///
    /// A type without a declared constructor is built with no arguments and
    /// `arguments` is ignored.
    ///
    /// # Errors
    /// - [`DimError::InvalidType`] if the type is unknown, abstract, an
    ///   interface, or has no way to be built
    /// - [`DimError::MissingArgument`] from parameter resolution
    /// - whatever the constructor itself returns
    #[instrument(skip(self, arguments, container), name = "instantiate")]
    pub fn instantiate(
        &self,
        type_name: &str,
        arguments: &ArgumentMap,
        container: Option<&dyn ContainerRef>,
    ) -> Result<Value> {
        let info = self
            .types
            .get(type_name)
            .ok_or_else(|| DimError::unknown_type(type_name, self.types.suggestions(type_name)))?;

        if info.kind() != TypeKind::Concrete {
            return Err(DimError::not_instantiable(type_name, info.kind()));
        }

        match info.instantiation() {
            None => Err(DimError::not_instantiable(type_name, info.kind())),
            Some(Instantiation::WithoutConstructor(build)) => {
                debug!(type_name, "No declared constructor, instantiating without arguments");
                Ok(build())
            }
            Some(Instantiation::Constructor(constructor)) => {
                let callable = format!("{type_name}::{CONSTRUCTOR}");
                let resolved = resolve_parameters(
                    &callable,
                    constructor.parameters(),
                    arguments,
                    container,
                )?;
                debug!(type_name, arguments = resolved.len(), "Instantiating");
                constructor.build(resolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::parameter::Signature;
    use crate::reflect::TypeInfo;
    use crate::resolver::ResolvedArguments;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Foo;

    #[derive(Debug)]
    struct FooBar {
        foo: Foo,
        bar: &'static str,
        foobar: &'static str,
    }

    struct Clock;
    struct Nullary;

    struct SingleFoo;

    impl ContainerRef for SingleFoo {
        fn has(&self, type_name: &str) -> bool {
            type_name == "Foo"
        }

        fn get(&self, _type_name: &str) -> Result<Value> {
            Ok(Value::new(Foo))
        }
    }

    fn registry(nullary_calls: Arc<AtomicUsize>) -> TypeRegistry {
        TypeRegistry::builder()
            .add_type(
                TypeInfo::builder::<FooBar>("FooBar")
                    .constructor(
                        Signature::new()
                            .typed("foo", "Foo")
                            .param("bar")
                            .param("foobar")
                            .optional("null", Value::unit()),
                        |args| {
                            Ok(FooBar {
                                foo: args.arg(0)?,
                                bar: args.arg(1)?,
                                foobar: args.arg(2)?,
                            })
                        },
                    )
                    .build(),
            )
            .add_type(TypeInfo::builder::<Clock>("Clock").without_constructor(|| Clock).build())
            .add_type(
                TypeInfo::builder::<Nullary>("Nullary")
                    .constructor(Signature::new(), move |args: ResolvedArguments| {
                        assert!(args.is_passthrough());
                        nullary_calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Nullary)
                    })
                    .build(),
            )
            .add_type(TypeInfo::abstract_type("Bar").build())
            .add_type(TypeInfo::interface("Baz").build())
            .add_type(TypeInfo::builder::<Foo>("Foo").build())
            .build()
    }

    #[test]
    fn constructs_with_resolved_parameters() {
        let types = registry(Arc::default());
        let value = Instantiator::new(&types)
            .instantiate("FooBar", &args! { "bar" => "bar", 2 => "foobar" }, Some(&SingleFoo))
            .unwrap();

        let foobar = value.cast_ref::<FooBar>().unwrap();
        assert_eq!(foobar.foo, Foo);
        assert_eq!(foobar.bar, "bar");
        assert_eq!(foobar.foobar, "foobar");
    }

    #[test]
    fn without_constructor_ignores_arguments() {
        let types = registry(Arc::default());
        let value = Instantiator::new(&types)
            .instantiate("Clock", &args! { 0 => 1, "x" => 2 }, None)
            .unwrap();
        assert!(value.is::<Clock>());
    }

    #[test]
    fn zero_parameter_constructor_ignores_arguments() {
        let calls = Arc::new(AtomicUsize::new(0));
        let types = registry(Arc::clone(&calls));
        let value = Instantiator::new(&types)
            .instantiate("Nullary", &args! { 0 => 1, 1 => 2 }, None)
            .unwrap();
        assert!(value.is::<Nullary>());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn abstract_and_interface_are_not_instantiable() {
        let types = registry(Arc::default());
        let instantiator = Instantiator::new(&types);

        for name in ["Bar", "Baz"] {
            let err = instantiator.instantiate(name, &args! {}, None).unwrap_err();
            assert!(err.to_string().starts_with(&format!("{name} class is not instantiable")));
        }
    }

    #[test]
    fn concrete_without_recipe_is_not_instantiable() {
        let types = registry(Arc::default());
        let err = Instantiator::new(&types).instantiate("Foo", &args! {}, None).unwrap_err();
        assert!(matches!(err, DimError::InvalidType(_)));
    }

    #[test]
    fn unknown_type_suggests_names() {
        let types = registry(Arc::default());
        match Instantiator::new(&types).instantiate("FooBaz", &args! {}, None).unwrap_err() {
            DimError::InvalidType(err) => {
                assert_eq!(err.type_name, "FooBaz");
                assert!(err.suggestions.contains(&"FooBar".to_string()));
            }
            other => panic!("Expected InvalidType, got: {other:?}"),
        }
    }

    #[test]
    fn missing_argument_names_constructor() {
        let types = registry(Arc::default());
        match Instantiator::new(&types).instantiate("FooBar", &args! {}, None).unwrap_err() {
            DimError::MissingArgument(err) => {
                assert_eq!(err.callable, "FooBar::__construct");
                assert_eq!(err.parameter, "foo");
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
    }
}
