use std::collections::BTreeMap;

use nspace_props::PropValue;
use serde::{Deserialize, Serialize};

/// On-disk shape of a level. Substance indices are positions in `substances`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substances: Vec<SubstanceRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voxels: Vec<VoxelRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstanceRecord {
    pub name: String,
    #[serde(default = "yes")]
    pub solid: bool,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub x_ray: bool,
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelRecord {
    pub position: [i32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substance: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<FaceRecord>,
}

/// A non-empty face. Materials are catalog keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub dir: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub orientation: u8,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

fn is_zero(v: &u8) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Substance entities only: index into the level's substances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substance: Option<u32>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<ObjectRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub behaviors: Vec<ObjectRecord>,
}

/// A sensor or behavior: its registered type name plus its property list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropValue>,
}

impl ObjectRecord {
    pub fn new(type_name: &str, values: Vec<(&'static str, PropValue)>) -> Self {
        Self {
            type_name: type_name.to_string(),
            properties: property_map(values),
        }
    }
}

/// Keys an object's `property_values()` by name.
pub fn property_map(values: Vec<(&'static str, PropValue)>) -> BTreeMap<String, PropValue> {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_parses_with_defaults() {
        let file: LevelFile = toml::from_str(
            r#"
            [[substances]]
            name = "water"
            solid = false

            [[voxels]]
            position = [0, -1, 2]
            substance = 0
            faces = [{ dir = 3, material = "grass" }]

            [[entities]]
            id = 4
            type = "Marker"
        "#,
        )
        .unwrap();
        assert!(file.substances[0].visible);
        assert!(!file.substances[0].x_ray);
        let face = &file.voxels[0].faces[0];
        assert_eq!((face.orientation, face.selected, face.overlay.as_deref()), (0, false, None));
        assert_eq!(file.entities[0].position, [0.0; 3]);
        assert!(file.entities[0].properties.is_empty());
        assert!(file.entities[0].sensor.is_none());
    }

    #[test]
    fn empty_level_is_an_empty_document() {
        let text = toml::to_string(&LevelFile::default()).unwrap();
        assert_eq!(text.trim(), "");
        assert_eq!(toml::from_str::<LevelFile>("").unwrap(), LevelFile::default());
    }
}
