use serde::{Deserialize, Serialize};

use crate::material::MaterialId;
use crate::mesh::{SubmeshLayer, VoxelMesh, build_voxel_mesh};
use crate::substance::Substance;
use crate::voxel::Voxel;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Edit,
    Play,
}

/// Everything voxel rendering reads besides the voxel itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: EditorMode,
    pub selected_material: MaterialId,
    pub x_ray_material: MaterialId,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ColliderState {
    /// Concave collider over the mesh (editor picking).
    pub mesh_collider: bool,
    /// Unit box collider (play physics).
    pub box_collider: bool,
    pub box_is_trigger: bool,
}

/// Output handed to the geometry/physics host.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelRender {
    pub mesh: VoxelMesh,
    pub materials: Vec<MaterialId>,
    pub renderer_enabled: bool,
    pub collider: ColliderState,
}

/// Rebuilds mesh, materials and collider flags from scratch.
pub fn update_voxel(voxel: &Voxel, substance: Option<&Substance>, ctx: &RenderContext) -> VoxelRender {
    let mut mesh = build_voxel_mesh(&voxel.faces, voxel.world_position(), ctx.selected_material);

    let x_ray = ctx.mode == EditorMode::Edit && substance.is_some_and(|s| s.flags.x_ray);
    if x_ray {
        for sm in mesh.submeshes.iter_mut() {
            if sm.layer != SubmeshLayer::Selection {
                sm.material = ctx.x_ray_material;
            }
        }
    }

    let (renderer_enabled, collider) = match ctx.mode {
        EditorMode::Edit => (
            true,
            ColliderState {
                mesh_collider: true,
                box_collider: false,
                box_is_trigger: false,
            },
        ),
        EditorMode::Play => {
            let (visible, trigger) = match substance {
                Some(s) => (s.flags.visible, !s.flags.solid),
                None => (true, false),
            };
            (
                visible,
                ColliderState {
                    mesh_collider: false,
                    box_collider: true,
                    box_is_trigger: trigger,
                },
            )
        }
    };

    let materials = mesh.materials();
    VoxelRender {
        mesh,
        materials,
        renderer_enabled,
        collider,
    }
}
