use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    None,
    Entity,
    Sensor,
    Behavior,
}

/// Display metadata and stable identity of a kind of entity, sensor or behavior.
///
/// Identity is the `full_name` alone: two values with the same name are the same type even if
/// the rest was rebuilt differently after a load.
#[derive(Clone, Copy, Debug)]
pub struct PropertiesObjectType {
    pub full_name: &'static str,
    pub description: &'static str,
    pub long_description: &'static str,
    pub icon_name: &'static str,
    pub category: ObjectCategory,
}

impl PropertiesObjectType {
    pub const NONE: PropertiesObjectType = PropertiesObjectType::new("None", ObjectCategory::None);

    pub const fn new(full_name: &'static str, category: ObjectCategory) -> Self {
        Self {
            full_name,
            description: "",
            long_description: "",
            icon_name: "",
            category,
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn with_long_description(mut self, long_description: &'static str) -> Self {
        self.long_description = long_description;
        self
    }

    pub const fn with_icon(mut self, icon_name: &'static str) -> Self {
        self.icon_name = icon_name;
        self
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl PartialEq for PropertiesObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for PropertiesObjectType {}

impl Hash for PropertiesObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

impl fmt::Display for PropertiesObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name)
    }
}
