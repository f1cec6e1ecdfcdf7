use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Opaque handle to a shared material resource. The core only ever compares these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

#[derive(Clone, Debug)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
    pub path: PathBuf,
    /// Drawn with alpha blending (x-ray, selection, glass overlays).
    pub transparent: bool,
}

/// Name-keyed material table that turns persisted material names into handles.
#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<Material>,
    pub by_key: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn key_of(&self, id: MaterialId) -> Option<&str> {
        self.get(id).map(|m| m.key.as_str())
    }

    /// Adds a material (or returns the existing handle for `key`).
    pub fn insert(&mut self, key: &str, path: impl Into<PathBuf>, transparent: bool) -> MaterialId {
        if let Some(id) = self.get_id(key) {
            return id;
        }
        let id = MaterialId(self.materials.len() as u16);
        self.by_key.insert(key.to_string(), id);
        self.materials.push(Material {
            id,
            key: key.to_string(),
            path: path.into(),
            transparent,
        });
        id
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        let mut catalog = MaterialCatalog::new();
        let mut entries: Vec<(String, MaterialEntry)> = cfg.materials.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort keys so MaterialId assignment is stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let (path, transparent) = match entry {
                MaterialEntry::Path(p) => (p, false),
                MaterialEntry::Detail { path, transparent } => (path, transparent),
            };
            catalog.insert(&key, path, transparent);
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
pub struct MaterialsConfig {
    pub materials: HashMap<String, MaterialEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum MaterialEntry {
    // Simple: grass = "GameAssets/Materials/Grass"
    Path(String),
    // Detailed: xray = { path = "...", transparent = true }
    Detail {
        path: String,
        #[serde(default)]
        transparent: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_sorted_keys() {
        let catalog = MaterialCatalog::from_toml_str(
            r#"
            [materials]
            stone = "Materials/Stone"
            brick = "Materials/Brick"
            xray = { path = "Materials/XRay", transparent = true }
        "#,
        )
        .unwrap();
        assert_eq!(catalog.get_id("brick"), Some(MaterialId(0)));
        assert_eq!(catalog.get_id("stone"), Some(MaterialId(1)));
        let xray = catalog.get_id("xray").unwrap();
        assert!(catalog.get(xray).unwrap().transparent);
        assert_eq!(catalog.key_of(xray), Some("xray"));
        assert_eq!(catalog.get_id("missing"), None);
    }

    #[test]
    fn insert_is_idempotent_per_key() {
        let mut catalog = MaterialCatalog::new();
        let a = catalog.insert("grass", "Materials/Grass", false);
        let b = catalog.insert("grass", "Materials/Other", true);
        assert_eq!(a, b);
        assert_eq!(catalog.materials.len(), 1);
    }
}
