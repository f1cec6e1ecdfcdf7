use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use nspace_props::PropertiesObject;
use nspace_runtime::Level;
use nspace_voxel::{FaceDir, MaterialCatalog, MaterialId, SubstanceId};

use crate::level_file::{
    EntityRecord, FaceRecord, LevelFile, ObjectRecord, SubstanceRecord, VoxelRecord, property_map,
};
use crate::load::LevelError;

/// Converts a level into its file form. Materials missing from `materials` are dropped with a warning.
pub fn level_to_file(level: &Level, materials: &MaterialCatalog) -> LevelFile {
    let mut file = LevelFile::default();
    let mut substance_index: BTreeMap<SubstanceId, u32> = BTreeMap::new();
    for (id, substance) in level.voxels.substances() {
        substance_index.insert(id, file.substances.len() as u32);
        file.substances.push(SubstanceRecord {
            name: substance.name.clone(),
            solid: substance.flags.solid,
            visible: substance.flags.visible,
            x_ray: substance.flags.x_ray,
        });
    }

    let material_key = |id: Option<MaterialId>, position: (i32, i32, i32)| {
        let id = id?;
        let key = materials.key_of(id);
        if key.is_none() {
            log::warn!(target: "level", "voxel {:?}: material {:?} has no catalog key, dropped", position, id);
        }
        key.map(str::to_string)
    };

    for (_, voxel) in level.voxels.iter() {
        if voxel.is_empty() {
            continue;
        }
        let faces = FaceDir::ALL
            .into_iter()
            .filter_map(|dir| {
                let face = voxel.face(dir);
                let material = material_key(face.material, voxel.position);
                let overlay = material_key(face.overlay, voxel.position);
                if material.is_none() && overlay.is_none() {
                    return None;
                }
                Some(FaceRecord {
                    dir: dir.index() as u8,
                    material,
                    overlay,
                    orientation: face.orientation,
                    selected: face.stored_selected,
                })
            })
            .collect();
        let (x, y, z) = voxel.position;
        file.voxels.push(VoxelRecord {
            position: [x, y, z],
            substance: voxel
                .substance()
                .and_then(|s| substance_index.get(&s).copied()),
            faces,
        });
    }

    for entity in level.entities() {
        let sensor = entity
            .sensor
            .as_ref()
            .map(|s| ObjectRecord::new(s.object_type().full_name, s.property_values()));
        let behaviors = entity
            .behaviors()
            .iter()
            .map(|b| ObjectRecord::new(b.object_type().full_name, b.property_values()))
            .collect();
        file.entities.push(EntityRecord {
            id: entity.id.0,
            type_name: entity.object_type().full_name.to_string(),
            position: entity.position.to_array(),
            substance: entity
                .kind
                .substance()
                .and_then(|s| substance_index.get(&s).copied()),
            properties: property_map(entity.property_values()),
            sensor,
            behaviors,
        });
    }
    file
}

/// Serializes `level` as a TOML level file.
pub fn save_level(level: &Level, materials: &MaterialCatalog) -> Result<String, LevelError> {
    Ok(toml::to_string(&level_to_file(level, materials))?)
}

pub fn save_level_to_path(
    level: &Level,
    materials: &MaterialCatalog,
    path: impl AsRef<Path>,
) -> Result<(), LevelError> {
    let text = save_level(level, materials)?;
    fs::write(path.as_ref(), text)?;
    log::info!(target: "level", "saved {}", path.as_ref().display());
    Ok(())
}
