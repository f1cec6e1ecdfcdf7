use std::collections::HashMap;

use thiserror::Error;

use crate::object_type::{ObjectCategory, PropertiesObjectType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown {category:?} type {name:?}")]
    UnknownType {
        category: ObjectCategory,
        name: String,
    },
}

pub struct RegisteredType<T> {
    pub ty: PropertiesObjectType,
    factory: fn() -> T,
}

impl<T> RegisteredType<T> {
    #[inline]
    pub fn create(&self) -> T {
        (self.factory)()
    }
}

/// Open set of constructible types keyed by `full_name`.
pub struct TypeRegistry<T> {
    category: ObjectCategory,
    types: Vec<RegisteredType<T>>,
    by_name: HashMap<String, usize>,
}

impl<T> TypeRegistry<T> {
    pub fn new(category: ObjectCategory) -> Self {
        Self {
            category,
            types: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn category(&self) -> ObjectCategory {
        self.category
    }

    /// Adds a type; a second registration under the same name replaces the first.
    pub fn register(&mut self, ty: PropertiesObjectType, factory: fn() -> T) -> &mut Self {
        let entry = RegisteredType { ty, factory };
        let existing = self.by_name.get(ty.full_name).copied();
        match existing {
            Some(ix) => {
                log::warn!(
                    "{:?} type {:?} registered twice; keeping the latest",
                    self.category,
                    ty.full_name
                );
                self.types[ix] = entry;
            }
            None => {
                self.by_name.insert(ty.full_name.to_string(), self.types.len());
                self.types.push(entry);
            }
        }
        self
    }

    pub fn lookup(&self, full_name: &str) -> Option<&RegisteredType<T>> {
        self.by_name.get(full_name).map(|&ix| &self.types[ix])
    }

    /// Rehydrates a persisted type key into the registered metadata.
    pub fn object_type(&self, full_name: &str) -> Option<PropertiesObjectType> {
        self.lookup(full_name).map(|r| r.ty)
    }

    pub fn create(&self, full_name: &str) -> Result<T, RegistryError> {
        self.lookup(full_name)
            .map(RegisteredType::create)
            .ok_or_else(|| RegistryError::UnknownType {
                category: self.category,
                name: full_name.to_string(),
            })
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType<T>> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Cube,
        Sphere(f32),
    }

    fn shapes() -> TypeRegistry<Shape> {
        let mut reg = TypeRegistry::new(ObjectCategory::Entity);
        reg.register(
            PropertiesObjectType::new("Cube", ObjectCategory::Entity).with_icon("cube"),
            || Shape::Cube,
        )
        .register(
            PropertiesObjectType::new("Sphere", ObjectCategory::Entity),
            || Shape::Sphere(0.5),
        );
        reg
    }

    #[test]
    fn create_by_name() {
        let reg = shapes();
        assert_eq!(reg.create("Sphere"), Ok(Shape::Sphere(0.5)));
        assert_eq!(reg.object_type("Cube").map(|t| t.icon_name), Some("cube"));
        let names: Vec<_> = reg.iter().map(|r| r.ty.full_name).collect();
        assert_eq!(names, vec!["Cube", "Sphere"]);
    }

    #[test]
    fn miss_is_an_error() {
        let reg = shapes();
        assert_eq!(
            reg.create("Pyramid"),
            Err(RegistryError::UnknownType {
                category: ObjectCategory::Entity,
                name: "Pyramid".into(),
            })
        );
        assert!(reg.lookup("None").is_none());
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = shapes();
        reg.register(
            PropertiesObjectType::new("Sphere", ObjectCategory::Entity),
            || Shape::Sphere(2.0),
        );
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.create("Sphere"), Ok(Shape::Sphere(2.0)));
    }
}
