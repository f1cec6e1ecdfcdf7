use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use nspace_entity::{
    Behavior, Entity, EntityKind, Sensor, behavior_types, entity_types, sensor_types,
};
use nspace_geom::Vec3;
use nspace_props::{EntityId, PropValue, PropertiesObject, PropertyError, RegistryError, TypeRegistry};
use nspace_runtime::Level;
use nspace_voxel::{FaceDir, MaterialCatalog, SubstanceFlags, SubstanceId, VoxelFace};
use thiserror::Error;

use crate::level_file::{EntityRecord, LevelFile, ObjectRecord};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing level: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("writing level: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    UnknownType(#[from] RegistryError),
    #[error("entity id {0} is used twice")]
    DuplicateEntity(EntityId),
}

/// Factories used to rebuild entities, sensors and behaviors by type name.
pub struct Registries {
    pub entities: TypeRegistry<Entity>,
    pub sensors: TypeRegistry<Sensor>,
    pub behaviors: TypeRegistry<Behavior>,
}

impl Default for Registries {
    fn default() -> Self {
        Self {
            entities: entity_types(),
            sensors: sensor_types(),
            behaviors: behavior_types(),
        }
    }
}

pub fn load_level(
    toml_str: &str,
    materials: &MaterialCatalog,
    registries: &Registries,
) -> Result<Level, LevelError> {
    let file: LevelFile = toml::from_str(toml_str)?;
    level_from_file(file, materials, registries)
}

pub fn load_level_from_path(
    path: impl AsRef<Path>,
    materials: &MaterialCatalog,
    registries: &Registries,
) -> Result<Level, LevelError> {
    let s = fs::read_to_string(path.as_ref())?;
    let level = load_level(&s, materials, registries)?;
    let stats = level.stats();
    log::info!(
        target: "level",
        "loaded {}: {} entities, {} voxels, {} substances",
        path.as_ref().display(),
        stats.entities,
        stats.voxels,
        stats.substances
    );
    Ok(level)
}

/// Builds a level in two passes: construct everything, then drop references to missing entities.
pub fn level_from_file(
    file: LevelFile,
    materials: &MaterialCatalog,
    registries: &Registries,
) -> Result<Level, LevelError> {
    let mut level = Level::new();

    let substances: Vec<SubstanceId> = file
        .substances
        .into_iter()
        .map(|s| {
            let flags = SubstanceFlags {
                solid: s.solid,
                visible: s.visible,
                x_ray: s.x_ray,
            };
            level.voxels.add_substance(s.name, flags)
        })
        .collect();
    let substance_at = |index: Option<u32>, owner: &str| {
        let index = index?;
        let id = substances.get(index as usize).copied();
        if id.is_none() {
            log::warn!(target: "level", "{}: no substance #{}", owner, index);
        }
        id
    };

    let material = |key: Option<&str>, position: (i32, i32, i32)| {
        let key = key?;
        let id = materials.get_id(key);
        if id.is_none() {
            log::warn!(target: "level", "voxel {:?}: unknown material {:?}", position, key);
        }
        id
    };

    for rec in file.voxels {
        let [x, y, z] = rec.position;
        let position = (x, y, z);
        let id = level.voxels.get_or_create(position);
        for f in rec.faces {
            let Some(dir) = FaceDir::from_index(f.dir as usize) else {
                log::warn!(target: "level", "voxel {:?}: bad face index {}", position, f.dir);
                continue;
            };
            let face = VoxelFace {
                material: material(f.material.as_deref(), position),
                overlay: material(f.overlay.as_deref(), position),
                orientation: VoxelFace::orientation(
                    VoxelFace::orientation_rotation(f.orientation) as i32,
                    VoxelFace::orientation_mirror(f.orientation),
                ),
                add_selected: false,
                stored_selected: f.selected,
            };
            level.voxels.set_face(id, dir, face);
        }
        if rec.substance.is_some() {
            let owner = format!("voxel {:?}", position);
            if let Some(s) = substance_at(rec.substance, owner.as_str()) {
                level.voxels.set_substance(id, Some(s));
            }
        }
    }

    for rec in file.entities {
        let entity = build_entity(rec, registries, &substance_at)?;
        let id = entity.id;
        if !level.insert_entity(entity) {
            return Err(LevelError::DuplicateEntity(id));
        }
    }

    let ids: BTreeSet<EntityId> = level.entity_ids().into_iter().collect();
    for id in &ids {
        if let Some(entity) = level.entity_mut(*id) {
            let cleared = entity.retain_references(|r| ids.contains(&r));
            if cleared > 0 {
                log::warn!(
                    target: "level",
                    "{} {}: cleared {} reference(s) to missing entities",
                    id,
                    entity,
                    cleared
                );
            }
        }
    }
    Ok(level)
}

fn build_entity(
    rec: EntityRecord,
    registries: &Registries,
    substance_at: &dyn Fn(Option<u32>, &str) -> Option<SubstanceId>,
) -> Result<Entity, LevelError> {
    let mut entity = registries.entities.create(&rec.type_name)?;
    entity.id = EntityId(rec.id);
    let [x, y, z] = rec.position;
    entity.position = Vec3::new(x, y, z);
    let label = format!("{} {}", entity.id, entity);

    match &mut entity.kind {
        EntityKind::Substance { substance, .. } => {
            *substance = substance_at(rec.substance, label.as_str());
        }
        _ if rec.substance.is_some() => {
            log::warn!(target: "level", "{}: not a substance entity, substance ignored", label);
        }
        _ => {}
    }

    apply_properties(&label, rec.properties, |name, value| {
        entity.set_property(name, value)
    });

    if let Some(ObjectRecord {
        type_name,
        properties,
    }) = rec.sensor
    {
        let mut sensor = registries.sensors.create(&type_name)?;
        apply_properties(&label, properties, |name, value| sensor.set_property(name, value));
        entity.sensor = Some(sensor);
    }

    for b in rec.behaviors {
        let mut behavior = registries.behaviors.create(&b.type_name)?;
        apply_properties(&label, b.properties, |name, value| {
            behavior.set_property(name, value)
        });
        if let Err(e) = entity.add_behavior(behavior) {
            log::warn!(target: "level", "{}: {}", label, e);
        }
    }
    Ok(entity)
}

/// Writes each value through the gated setter; failures are logged and skipped.
fn apply_properties(
    owner: &str,
    properties: BTreeMap<String, PropValue>,
    mut set: impl FnMut(&str, PropValue) -> Result<bool, PropertyError>,
) {
    for (name, value) in properties {
        if let Err(e) = set(&name, value) {
            log::warn!(target: "level", "{}: {}", owner, e);
        }
    }
}
