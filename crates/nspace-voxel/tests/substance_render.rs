use nspace_voxel::{
    ColliderState, EditorMode, FaceDir, MaterialId, RenderContext, SubmeshLayer, SubstanceFlags,
    VoxelArray, VoxelFace,
};

const STONE: MaterialId = MaterialId(0);
const MOSS: MaterialId = MaterialId(1);
const SELECTED: MaterialId = MaterialId(2);
const XRAY: MaterialId = MaterialId(3);

fn ctx(mode: EditorMode) -> RenderContext {
    RenderContext {
        mode,
        selected_material: SELECTED,
        x_ray_material: XRAY,
    }
}

#[test]
fn set_then_clear_substance_restores_membership() {
    let mut arr = VoxelArray::new();
    let glass = arr.add_substance("glass", SubstanceFlags::default());
    let water = arr.add_substance("water", SubstanceFlags::default());
    let v = arr.get_or_create((2, 3, 4));

    assert!(arr.set_substance(v, Some(glass)));
    assert!(arr.substance(glass).unwrap().contains(v));
    let tag = arr.voxel(v).unwrap().substance_debug();
    assert_ne!(tag, 0);

    // Moving between substances updates both sides.
    assert!(arr.set_substance(v, Some(water)));
    assert!(!arr.substance(glass).unwrap().contains(v));
    assert!(arr.substance(water).unwrap().contains(v));
    assert_ne!(arr.voxel(v).unwrap().substance_debug(), tag);

    assert!(arr.set_substance(v, None));
    assert!(!arr.substance(water).unwrap().contains(v));
    assert_eq!(arr.voxel(v).unwrap().substance(), None);
    assert_eq!(arr.voxel(v).unwrap().substance_debug(), 0);
    assert!(!arr.set_substance(v, None));
}

#[test]
fn voxel_with_substance_is_not_empty() {
    let mut arr = VoxelArray::new();
    let s = arr.add_substance("air", SubstanceFlags::default());
    let v = arr.get_or_create((0, 0, 0));
    assert!(arr.voxel(v).unwrap().is_empty());
    arr.set_substance(v, Some(s));
    assert!(!arr.voxel(v).unwrap().is_empty());
    assert!(arr.clear_voxel(v));
    assert!(arr.voxel(v).unwrap().is_empty());
    assert!(arr.substance(s).unwrap().voxels().is_empty());
}

#[test]
fn removing_voxel_or_substance_detaches() {
    let mut arr = VoxelArray::new();
    let s = arr.add_substance("lava", SubstanceFlags::default());
    let a = arr.get_or_create((0, 0, 0));
    let b = arr.get_or_create((0, 0, 1));
    arr.set_substance(a, Some(s));
    arr.set_substance(b, Some(s));

    arr.remove_voxel(a);
    assert_eq!(arr.substance(s).unwrap().voxels().len(), 1);

    let removed = arr.remove_substance(s).unwrap();
    assert!(removed.voxels().is_empty());
    assert_eq!(arr.voxel(b).unwrap().substance_debug(), 0);
    assert!(arr.substance(s).is_none());
    // Unknown substance is refused.
    assert!(!arr.set_substance(b, Some(s)));
}

#[test]
fn edit_mode_uses_mesh_collider() {
    let mut arr = VoxelArray::new();
    let v = arr.get_or_create((0, 0, 0));
    arr.set_face(v, FaceDir::PosY, VoxelFace::with_material(STONE));
    let out = arr.render(v, &ctx(EditorMode::Edit)).unwrap();
    assert!(out.renderer_enabled);
    assert_eq!(
        out.collider,
        ColliderState {
            mesh_collider: true,
            box_collider: false,
            box_is_trigger: false,
        }
    );
    assert_eq!(out.materials, vec![STONE]);
}

#[test]
fn play_mode_follows_substance_flags() {
    let mut arr = VoxelArray::new();
    let plain = arr.get_or_create((0, 0, 0));
    let ghost = arr.get_or_create((1, 0, 0));
    let s = arr.add_substance(
        "ghost",
        SubstanceFlags {
            solid: false,
            visible: false,
            x_ray: true,
        },
    );
    arr.set_substance(ghost, Some(s));
    for v in [plain, ghost] {
        arr.set_face(v, FaceDir::NegY, VoxelFace::with_material(STONE));
    }

    let play = ctx(EditorMode::Play);
    let out = arr.render(plain, &play).unwrap();
    assert!(out.renderer_enabled);
    assert!(out.collider.box_collider && !out.collider.mesh_collider);
    assert!(!out.collider.box_is_trigger);

    let out = arr.render(ghost, &play).unwrap();
    assert!(!out.renderer_enabled);
    assert!(out.collider.box_is_trigger);
    // X-ray is editor-only.
    assert_eq!(out.materials, vec![STONE]);
}

#[test]
fn x_ray_replaces_all_but_selection_in_edit_mode() {
    let mut arr = VoxelArray::new();
    let v = arr.get_or_create((0, 0, 0));
    let s = arr.add_substance(
        "window",
        SubstanceFlags {
            x_ray: true,
            ..SubstanceFlags::default()
        },
    );
    arr.set_substance(v, Some(s));
    arr.set_face(
        v,
        FaceDir::PosX,
        VoxelFace {
            material: Some(STONE),
            overlay: Some(MOSS),
            add_selected: true,
            ..VoxelFace::EMPTY
        },
    );
    let out = arr.render(v, &ctx(EditorMode::Edit)).unwrap();
    assert_eq!(out.materials, vec![XRAY, XRAY, SELECTED]);
    assert_eq!(out.mesh.submeshes[2].layer, SubmeshLayer::Selection);
}

#[test]
fn empty_voxel_renders_nothing() {
    let mut arr = VoxelArray::new();
    let v = arr.get_or_create((7, 7, 7));
    for mode in [EditorMode::Edit, EditorMode::Play] {
        let out = arr.render(v, &ctx(mode)).unwrap();
        assert!(out.mesh.is_empty());
        assert_eq!(out.mesh.triangle_count(), 0);
        assert!(out.materials.is_empty());
    }
    // Rendering is a pure rebuild from state.
    let c = ctx(EditorMode::Edit);
    assert_eq!(arr.render(v, &c), arr.render(v, &c));
}
