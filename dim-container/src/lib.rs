//! Core resolution engine for Dim.
//!
//! Parameter resolution, class instantiation, callable invocation and
//! service descriptors, over a catalogue of declaratively reflected types.

pub mod arguments;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod instantiator;
pub mod invoker;
pub mod key;
pub mod parameter;
pub mod provider;
pub mod reflect;
pub mod registry;
pub mod resolver;
pub mod value;

pub use arguments::ArgumentMap;
pub use container::{Container, ContainerBuilder, ContainerRef};
pub use descriptor::{FactoryDescriptor, Service, ServiceDescriptor};
pub use error::{DimError, Result};
pub use instantiator::Instantiator;
pub use invoker::{Callable, Invoker, Target};
pub use key::ArgumentKey;
pub use parameter::{ParameterSpec, Signature};
pub use provider::{Provider, TypeCatalog};
pub use reflect::{Function, Method, TypeInfo, TypeKind, Visibility};
pub use registry::{Injectable, TypeRegistry};
pub use resolver::{ResolvedArguments, resolve_parameters};
pub use value::Value;

#[doc(hidden)]
pub use inventory;

pub mod prelude {
    pub use crate::args;
    pub use crate::arguments::ArgumentMap;
    pub use crate::container::{Container, ContainerBuilder, ContainerRef};
    pub use crate::descriptor::{FactoryDescriptor, Service, ServiceDescriptor};
    pub use crate::error::{DimError, Result};
    pub use crate::instantiator::Instantiator;
    pub use crate::invoker::{Callable, Invoker, Target};
    pub use crate::parameter::Signature;
    pub use crate::provider::{Provider, TypeCatalog};
    pub use crate::reflect::{Function, Method, TypeInfo};
    pub use crate::registry::{Injectable, TypeRegistry};
    pub use crate::value::Value;
}
