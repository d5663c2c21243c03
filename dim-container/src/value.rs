//! Type-erased values passed between callers, containers and targets.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{ArgumentTypeError, DimError, Result};

/// A cheaply clonable, thread-safe, type-erased value.
///
/// Arguments, defaults, autowired dependencies and the results of
/// instantiation or invocation all travel as `Value`s. Cloning shares the
/// underlying allocation.
///
/// # Examples
/// ```
/// use dim_container::value::Value;
///
/// let value = Value::new(String::from("smtp://localhost"));
/// assert!(value.is::<String>());
/// assert_eq!(value.cast::<String>().unwrap(), "smtp://localhost");
///
/// // Wrapping a Value again is a no-op.
/// let same = Value::new(value.clone());
/// assert!(same.ptr_eq(&value));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wraps `value`. Passing a `Value` returns it unchanged.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        match boxed.downcast::<Value>() {
            Ok(value) => *value,
            Err(boxed) => Self {
                inner: Arc::from(boxed),
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
            },
        }
    }

    /// Wraps an existing shared allocation without copying it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// The unit value, used where "null" would be.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Rust type name of the wrapped value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the wrapped value.
    #[inline]
    pub fn value_type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns the shared allocation as `Arc<T>`.
    ///
    /// Also accepts a value that itself holds an `Arc<T>`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match Arc::clone(&self.inner).downcast::<T>() {
            Ok(arc) => Some(arc),
            Err(_) => self.downcast_ref::<Arc<T>>().cloned(),
        }
    }

    /// Borrows the value as `T`, or fails with [`DimError::ArgumentType`].
    pub fn cast_ref<T: Any>(&self) -> Result<&T> {
        self.downcast_ref::<T>().ok_or_else(|| self.mismatch::<T>())
    }

    /// Clones the value out as `T`, or fails with [`DimError::ArgumentType`].
    pub fn cast<T: Any + Clone>(&self) -> Result<T> {
        self.cast_ref::<T>().cloned()
    }

    /// Like [`downcast_arc`](Value::downcast_arc), failing with
    /// [`DimError::ArgumentType`].
    pub fn cast_arc<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.downcast_arc::<T>().ok_or_else(|| self.mismatch::<T>())
    }

    /// Returns `true` if both values share the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mismatch<T: ?Sized>(&self) -> DimError {
        DimError::ArgumentType(ArgumentTypeError {
            expected: type_name::<T>(),
            found: self.type_name,
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}
