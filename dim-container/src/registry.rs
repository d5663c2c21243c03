//! Type registry — the catalogue of reflected types and functions.
//!
//! The registry maps registered names to [`TypeInfo`] and [`Function`]
//! entries. It is populated through [`TypeRegistryBuilder`] and is
//! immutable once built, so it can be shared freely between threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dim_support::rendering::suggest_similar;
use once_cell::sync::Lazy;
use tracing::{debug, info, trace, warn};

use crate::provider::{Provider, TypeCatalog};
use crate::reflect::{Function, TypeInfo};
use crate::value::Value;

const MAX_SUGGESTIONS: usize = 3;

/// Types that describe themselves for registration.
///
/// Usually implemented by `#[derive(Injectable)]`, which also submits the
/// type to the catalogue behind [`TypeRegistry::global`].
pub trait Injectable: Any + Send + Sync {
    /// Name the type is registered under.
    const TYPE_NAME: &'static str;

    fn type_info() -> TypeInfo;
}

/// A link-time submission of a [`TypeInfo`], collected with `inventory`.
///
/// Emitted by `#[derive(Injectable)]`; rarely written by hand.
pub struct TypeRegistration {
    build: fn() -> TypeInfo,
}

impl TypeRegistration {
    pub const fn new(build: fn() -> TypeInfo) -> Self {
        Self { build }
    }

    pub fn type_info(&self) -> TypeInfo {
        (self.build)()
    }
}

inventory::collect!(TypeRegistration);

static GLOBAL: Lazy<Arc<TypeRegistry>> =
    Lazy::new(|| Arc::new(TypeRegistry::builder().with_registered().build()));

/// Immutable catalogue of reflected types and named functions.
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeInfo>>,
    by_rust_type: HashMap<TypeId, Arc<TypeInfo>>,
    functions: HashMap<String, Arc<Function>>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// The shared catalogue of every `#[derive(Injectable)]` type linked
    /// into the binary. Built on first use.
    pub fn global() -> Arc<TypeRegistry> {
        Arc::clone(&GLOBAL)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeInfo>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Finds the registered type of a value by its Rust type.
    pub fn type_of(&self, value: &Value) -> Option<&Arc<TypeInfo>> {
        let found = self.by_rust_type.get(&value.value_type_id());
        trace!(value = value.type_name(), found = found.is_some(), "Looking up value type");
        found
    }

    pub fn function(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names close to `name`, for "did you mean?" hints.
    pub(crate) fn suggestions(&self, name: &str) -> Vec<String> {
        suggest_similar(name, &self.type_names(), MAX_SUGGESTIONS)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Builds a [`TypeRegistry`].
///
/// Registering a name twice keeps the later entry. When two names describe
/// the same Rust type, values of that type resolve to the name registered
/// last.
///
/// # Examples
/// ```
/// use dim_container::reflect::TypeInfo;
/// use dim_container::registry::TypeRegistry;
///
/// struct Clock;
///
/// let registry = TypeRegistry::builder()
///     .add_type(TypeInfo::builder::<Clock>("Clock").without_constructor(|| Clock).build())
///     .build();
///
/// assert!(registry.contains("Clock"));
/// ```
#[derive(Default)]
pub struct TypeRegistryBuilder {
    types: HashMap<String, TypeInfo>,
    rust_types: HashMap<TypeId, String>,
    functions: HashMap<String, Function>,
}

impl TypeRegistryBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn add_type(mut self, info: TypeInfo) -> Self {
        self.register_type(info);
        self
    }

    pub fn add<T: Injectable>(self) -> Self {
        self.add_type(T::type_info())
    }

    /// Registers `function` under `name`, for `"name"` callables.
    pub fn add_function(mut self, name: &str, function: Function) -> Self {
        self.register_function(name, function);
        self
    }

    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    /// Adds every type submitted by `#[derive(Injectable)]`.
    pub fn with_registered(mut self) -> Self {
        for registration in inventory::iter::<TypeRegistration> {
            self.register_type(registration.type_info());
        }
        self
    }

    pub fn build(self) -> TypeRegistry {
        let types: HashMap<String, Arc<TypeInfo>> = self
            .types
            .into_iter()
            .map(|(name, info)| (name, Arc::new(info)))
            .collect();

        // A name re-registered for another Rust type leaves a stale entry.
        let by_rust_type = self
            .rust_types
            .into_iter()
            .filter_map(|(id, name)| {
                let info = types.get(&name)?;
                (info.rust_type() == Some(id)).then(|| (id, Arc::clone(info)))
            })
            .collect();

        let functions = self
            .functions
            .into_iter()
            .map(|(name, function)| (name, Arc::new(function)))
            .collect();

        info!(types = types.len(), "Type registry built");
        TypeRegistry {
            types,
            by_rust_type,
            functions,
        }
    }
}

impl TypeCatalog for TypeRegistryBuilder {
    fn register_type(&mut self, info: TypeInfo) {
        let name = info.name().to_string();
        if let Some(id) = info.rust_type() {
            if let Some(previous) = self.rust_types.insert(id, name.clone()) {
                if previous != name {
                    warn!(
                        type_name = %name,
                        previous = %previous,
                        "Rust type registered under two names, values resolve to the later one"
                    );
                }
            }
        }
        if self.types.insert(name.clone(), info).is_some() {
            warn!(type_name = %name, "Type registered twice, keeping the later registration");
        } else {
            debug!(type_name = %name, "Registered type");
        }
    }

    fn register_function(&mut self, name: &str, function: Function) {
        let function = function.named(name);
        if self.functions.insert(name.to_string(), function).is_some() {
            warn!(function = name, "Function registered twice, keeping the later registration");
        } else {
            debug!(function = name, "Registered function");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Signature;

    struct Database;
    struct Cache;

    fn database() -> TypeInfo {
        TypeInfo::builder::<Database>("Database")
            .without_constructor(|| Database)
            .build()
    }

    impl Injectable for Database {
        const TYPE_NAME: &'static str = "Database";

        fn type_info() -> TypeInfo {
            database()
        }
    }

    #[test]
    fn register_and_get() {
        let registry = TypeRegistry::builder().add_type(database()).build();
        assert!(registry.get("Database").is_some());
        assert!(registry.contains("Database"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn later_registration_wins() {
        let registry = TypeRegistry::builder()
            .add_type(database())
            .add_type(TypeInfo::abstract_type("Database").build())
            .build();
        assert_eq!(registry.len(), 1);
        assert!(!registry.get("Database").unwrap().is_instantiable());
    }

    #[test]
    fn type_of_value() {
        let registry = TypeRegistry::builder().add_type(database()).build();
        assert_eq!(registry.type_of(&Value::new(Database)).unwrap().name(), "Database");
        assert!(registry.type_of(&Value::new(Cache)).is_none());
    }

    #[test]
    fn type_of_shared_rust_type_is_the_later_name() {
        let plain = || {
            TypeInfo::builder::<Database>("Plain")
                .without_constructor(|| Database)
                .build()
        };
        for _ in 0..32 {
            let registry = TypeRegistry::builder()
                .add_type(database())
                .add_type(plain())
                .build();
            assert_eq!(registry.len(), 2);
            assert_eq!(registry.type_of(&Value::new(Database)).unwrap().name(), "Plain");
        }

        let registry = TypeRegistry::builder()
            .add_type(plain())
            .add_type(database())
            .build();
        assert_eq!(registry.type_of(&Value::new(Database)).unwrap().name(), "Database");
    }

    #[test]
    fn type_of_drops_name_rebound_to_another_type() {
        let registry = TypeRegistry::builder()
            .add_type(database())
            .add_type(
                TypeInfo::builder::<Cache>("Database")
                    .without_constructor(|| Cache)
                    .build(),
            )
            .build();
        assert!(registry.type_of(&Value::new(Database)).is_none());
        assert_eq!(registry.type_of(&Value::new(Cache)).unwrap().name(), "Database");
    }

    #[test]
    fn add_uses_injectable_type_info() {
        let registry = TypeRegistry::builder().add::<Database>().build();
        assert!(registry.contains(Database::TYPE_NAME));
        assert_eq!(registry.type_of(&Value::new(Database)).unwrap().name(), "Database");
    }

    #[test]
    fn functions_are_named_on_registration() {
        let registry = TypeRegistry::builder()
            .add_function("now", Function::new(Signature::new(), |_| Ok(0u64)))
            .build();
        assert_eq!(registry.function("now").unwrap().name(), Some("now"));
        assert!(registry.function("later").is_none());
    }

    #[test]
    fn suggestions_for_typos() {
        let registry = TypeRegistry::builder().add_type(database()).build();
        assert_eq!(registry.suggestions("Databse"), vec!["Database".to_string()]);
    }

    #[test]
    fn type_names_sorted() {
        let registry = TypeRegistry::builder()
            .add_type(database())
            .add_type(TypeInfo::interface("Cache").build())
            .build();
        assert_eq!(registry.type_names(), vec!["Cache", "Database"]);
    }

    #[test]
    fn debug_display() {
        let registry = TypeRegistry::builder().add_type(database()).build();
        let debug = format!("{registry:?}");
        assert!(debug.contains("TypeRegistry"));
        assert!(debug.contains("types: 1"));
    }
}
