use nspace_entity::{Behavior, Entity, Sensor, ToggleSensor, TouchSensor};
use nspace_io::{
    FaceRecord, LevelError, LevelFile, Registries, VoxelRecord, level_from_file, load_level,
    save_level,
};
use nspace_props::{
    ActivatorFilter, Condition, EntityId, EntityRef, PropValue, PropertiesObject, RegistryError,
    Target,
};
use nspace_runtime::Level;
use nspace_voxel::{FaceDir, MaterialCatalog, SubstanceFlags, VoxelFace};
use proptest::prelude::*;

fn catalog() -> MaterialCatalog {
    MaterialCatalog::from_toml_str(
        r#"
        [materials]
        grass = "Materials/Grass"
        moss = "Materials/Moss"
        selected = { path = "Materials/Selected", transparent = true }
    "#,
    )
    .unwrap()
}

fn wired_level(catalog: &MaterialCatalog) -> Level {
    let grass = catalog.get_id("grass").unwrap();
    let moss = catalog.get_id("moss").unwrap();
    let mut level = Level::new();
    let water = level.voxels.add_substance(
        "water",
        SubstanceFlags {
            solid: false,
            visible: true,
            x_ray: true,
        },
    );
    let v = level.voxels.get_or_create((0, -1, 2));
    level.voxels.set_face(
        v,
        FaceDir::PosY,
        VoxelFace {
            overlay: Some(moss),
            orientation: 5,
            stored_selected: true,
            ..VoxelFace::with_material(grass)
        },
    );
    level.voxels.set_substance(v, Some(water));

    let mut pad = Entity::marker();
    pad.tag = 2;
    pad.sensor = Some(Sensor::Touch(TouchSensor {
        filter: ActivatorFilter::Type("Player".into()),
    }));
    let pad = level.add_entity(pad).unwrap();

    let mut pool = Entity::substance(Some(water));
    pool.set_property("X-Ray?", PropValue::Bool(true)).unwrap();
    pool.sensor = Some(Sensor::Toggle(ToggleSensor {
        start_on: true,
        on_input: EntityRef::to(pad),
        ..ToggleSensor::default()
    }));
    pool.add_behavior(Behavior::solid().with_condition(Condition::On))
        .unwrap();
    pool.add_behavior(
        Behavior::hurt()
            .with_condition(Condition::Off)
            .with_target(Target::entity(pad)),
    )
    .unwrap();
    level.add_entity(pool);

    let mut player = Entity::player();
    player.position = nspace_geom::Vec3::new(1.0, 2.5, -3.0);
    player.set_property("Health", PropValue::Float(75.0)).unwrap();
    level.add_entity(player);
    level
}

#[test]
fn save_then_load_keeps_every_property_list() {
    let catalog = catalog();
    let level = wired_level(&catalog);
    let text = save_level(&level, &catalog).unwrap();
    let loaded = load_level(&text, &catalog, &Registries::default()).unwrap();

    assert_eq!(loaded.stats(), level.stats());
    for (a, b) in level.entities().zip(loaded.entities()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.object_type(), b.object_type());
        assert_eq!(a.position, b.position);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.property_values(), b.property_values());
        assert_eq!(
            a.sensor.as_ref().map(Sensor::property_values),
            b.sensor.as_ref().map(Sensor::property_values)
        );
        let types = |e: &Entity| -> Vec<_> { e.behaviors().iter().map(|b| b.object_type()).collect() };
        assert_eq!(types(a), types(b));
        for (x, y) in a.behaviors().iter().zip(b.behaviors()) {
            assert_eq!(x.property_values(), y.property_values());
        }
    }

    let v = loaded.voxels.voxel_at((0, -1, 2)).unwrap();
    let voxel = loaded.voxels.voxel(v).unwrap();
    let face = voxel.face(FaceDir::PosY);
    assert_eq!(face.material, catalog.get_id("grass"));
    assert_eq!(face.overlay, catalog.get_id("moss"));
    assert_eq!(face.orientation, 5);
    assert!(face.stored_selected && !face.add_selected);
    let water = loaded.voxels.substance_of(v).unwrap();
    assert_eq!(water.name, "water");
    assert!(!water.flags.solid && water.flags.x_ray);
}

#[test]
fn saved_text_is_stable() {
    let catalog = catalog();
    let level = wired_level(&catalog);
    let first = save_level(&level, &catalog).unwrap();
    let again = load_level(&first, &catalog, &Registries::default()).unwrap();
    assert_eq!(save_level(&again, &catalog).unwrap(), first);
}

#[test]
fn unknown_type_fails_the_load() {
    let text = r#"
        [[entities]]
        id = 1
        type = "Dragon"
    "#;
    let err = load_level(text, &catalog(), &Registries::default()).unwrap_err();
    assert!(matches!(
        err,
        LevelError::UnknownType(RegistryError::UnknownType { ref name, .. }) if name == "Dragon"
    ));

    let text = r#"
        [[entities]]
        id = 1
        type = "Marker"
        sensor = { type = "Laser" }
    "#;
    assert!(matches!(
        load_level(text, &catalog(), &Registries::default()),
        Err(LevelError::UnknownType(_))
    ));
}

#[test]
fn duplicate_ids_fail_the_load() {
    let text = r#"
        [[entities]]
        id = 3
        type = "Marker"

        [[entities]]
        id = 3
        type = "Ball"
    "#;
    assert!(matches!(
        load_level(text, &catalog(), &Registries::default()),
        Err(LevelError::DuplicateEntity(EntityId(3)))
    ));
}

#[test]
fn dangling_references_resolve_to_none() {
    let text = r#"
        [[entities]]
        id = 1
        type = "Ball"
        sensor = { type = "Toggle", properties = { "On input" = { Entity = { entity = 40 } }, "Off input" = { Entity = { entity = 2 } } } }
        behaviors = [
            { type = "Visible", properties = { Target = { Target = { entity = { entity = 41 } } } } },
        ]

        [[entities]]
        id = 2
        type = "Marker"
        sensor = { type = "Touch", properties = { Filter = { Filter = { Entity = { entity = 42 } } } } }
    "#;
    let level = load_level(text, &catalog(), &Registries::default()).unwrap();
    let ball = level.entity(EntityId(1)).unwrap();
    let sensor = ball.sensor.as_ref().unwrap();
    assert_eq!(
        sensor.get_property("On input"),
        Some(PropValue::Entity(EntityRef::NONE))
    );
    assert_eq!(
        sensor.get_property("Off input"),
        Some(PropValue::Entity(EntityRef::to(EntityId(2))))
    );
    assert_eq!(
        ball.behaviors()[0].get_property("Target"),
        Some(PropValue::Target(Target::SELF))
    );
    let marker = level.entity(EntityId(2)).unwrap();
    assert_eq!(
        marker.sensor.as_ref().unwrap().get_property("Filter"),
        Some(PropValue::Filter(ActivatorFilter::Entity(EntityRef::NONE)))
    );
}

#[test]
fn bad_properties_are_skipped_not_fatal() {
    let text = r#"
        [[entities]]
        id = 1
        type = "Ball"
        properties = { Tag = { Float = 1.0 }, Colour = { Text = "red" }, Health = { Float = 12.0 } }
        behaviors = [{ type = "Hurt", properties = { Amount = { Float = 3.0 } } }]

        [[entities]]
        id = 2
        type = "Player"
        behaviors = [{ type = "Visible" }]
    "#;
    let level = load_level(text, &catalog(), &Registries::default()).unwrap();
    let ball = level.entity(EntityId(1)).unwrap();
    assert_eq!(ball.get_property("Tag"), Some(PropValue::Tag(0)));
    assert_eq!(ball.get_property("Health"), Some(PropValue::Float(12.0)));
    assert_eq!(
        ball.behaviors()[0].get_property("Amount"),
        Some(PropValue::Float(3.0))
    );
    // Visible does not apply to players.
    assert!(level.entity(EntityId(2)).unwrap().behaviors().is_empty());
}

#[test]
fn bad_substance_index_means_no_substance() {
    let text = r#"
        [[substances]]
        name = "lava"

        [[voxels]]
        position = [0, 0, 0]
        substance = 4
        faces = [{ dir = 1, material = "grass" }]

        [[entities]]
        id = 1
        type = "Substance"
        substance = 0
    "#;
    let level = load_level(text, &catalog(), &Registries::default()).unwrap();
    let v = level.voxels.voxel_at((0, 0, 0)).unwrap();
    assert!(level.voxels.substance_of(v).is_none());
    let lava = level.entity(EntityId(1)).unwrap().kind.substance().unwrap();
    assert_eq!(level.substance_entity(lava), Some(EntityId(1)));
}

proptest! {
    // Whatever face records say, loading never yields out-of-range orientations.
    #[test]
    fn arbitrary_faces_load_normalized(
        faces in prop::collection::vec((0u8..8, any::<u8>(), any::<bool>(), any::<bool>()), 0..12),
        substance in prop::option::of(0u32..3),
    ) {
        let file = LevelFile {
            voxels: vec![VoxelRecord {
                position: [0, 0, 0],
                substance,
                faces: faces
                    .iter()
                    .map(|&(dir, orientation, selected, known)| FaceRecord {
                        dir,
                        material: Some(if known { "grass" } else { "basalt" }.to_string()),
                        overlay: None,
                        orientation,
                        selected,
                    })
                    .collect(),
            }],
            ..LevelFile::default()
        };
        let level = level_from_file(file, &catalog(), &Registries::default()).unwrap();
        let v = level.voxels.voxel_at((0, 0, 0)).unwrap();
        let voxel = level.voxels.voxel(v).unwrap();
        prop_assert!(voxel.substance().is_none());
        for face in voxel.faces.iter() {
            prop_assert!(face.orientation < 8);
            prop_assert!(!face.add_selected);
            prop_assert!(face.material.is_none() || face.material == catalog().get_id("grass"));
        }
    }
}
