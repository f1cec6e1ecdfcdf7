use std::fs;
use std::path::{Path, PathBuf};

use nspace_voxel::{EditorMode, MaterialCatalog, RenderContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("material {0:?} is not in the catalog")]
    UnknownMaterial(String),
}

/// Editor settings. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub mode: EditorMode,
    /// Play ticks per second.
    pub tick_rate: f32,
    pub materials: PathBuf,
    pub selected_material: String,
    pub x_ray_material: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mode: EditorMode::Edit,
            tick_rate: 60.0,
            materials: PathBuf::from("assets/materials.toml"),
            selected_material: "selected".to_string(),
            x_ray_material: "xray".to_string(),
        }
    }
}

impl EditorConfig {
    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Seconds per tick; a non-positive rate falls back to 60 Hz.
    pub fn tick_dt(&self) -> f32 {
        if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            log::warn!("tick_rate {} is invalid, using 60", self.tick_rate);
            1.0 / 60.0
        }
    }

    pub fn render_context(&self, catalog: &MaterialCatalog) -> Result<RenderContext, ConfigError> {
        let lookup = |key: &str| {
            catalog
                .get_id(key)
                .ok_or_else(|| ConfigError::UnknownMaterial(key.to_string()))
        };
        Ok(RenderContext {
            mode: self.mode,
            selected_material: lookup(&self.selected_material)?,
            x_ray_material: lookup(&self.x_ray_material)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = EditorConfig::from_toml_str(
            r#"
            mode = "play"
            tick_rate = 30
        "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, EditorMode::Play);
        assert_eq!(cfg.tick_dt(), 1.0 / 30.0);
        assert_eq!(cfg.selected_material, "selected");
        assert_eq!(cfg.materials, PathBuf::from("assets/materials.toml"));
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = EditorConfig::load("does/not/exist/nspace.toml").unwrap();
        assert_eq!(cfg, EditorConfig::default());
    }

    #[test]
    fn bad_mode_is_an_error() {
        assert!(matches!(
            EditorConfig::from_toml_str("mode = \"fly\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn render_context_resolves_keys() {
        let mut catalog = MaterialCatalog::new();
        let stone = catalog.insert("stone", "Materials/Stone", false);
        let selected = catalog.insert("selected", "Materials/Selected", true);
        let xray = catalog.insert("xray", "Materials/XRay", true);
        let cfg = EditorConfig::default();
        let ctx = cfg.render_context(&catalog).unwrap();
        assert_eq!((ctx.selected_material, ctx.x_ray_material), (selected, xray));
        assert_ne!(ctx.selected_material, stone);

        let cfg = EditorConfig {
            x_ray_material: "glass".into(),
            ..cfg
        };
        assert!(matches!(
            cfg.render_context(&catalog),
            Err(ConfigError::UnknownMaterial(k)) if k == "glass"
        ));
    }
}
