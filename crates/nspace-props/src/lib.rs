//! Property values, accessor tables, and the name-keyed type registry.
#![forbid(unsafe_code)]

pub mod object_type;
pub mod property;
pub mod registry;
pub mod value;

pub use object_type::{ObjectCategory, PropertiesObjectType};
pub use property::{
    PropertiesObject, Property, PropertyError, PropertyGui, PropertyInfo, join_properties,
};
pub use registry::{RegisteredType, RegistryError, TypeRegistry};
pub use value::{ActivatorFilter, Condition, EntityId, EntityRef, PropKind, PropValue, Target};
