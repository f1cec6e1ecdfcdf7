use nspace_geom::{Vec2, Vec3};

use crate::face::{FaceDir, VoxelFace};
use crate::material::MaterialId;

/// Corners of a unit face in (u, v) order.
pub const SQUARE_LOOP: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubmeshLayer {
    Base,
    Overlay,
    Selection,
}

/// One material's triangles over a single face's four vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Submesh {
    pub face: FaceDir,
    pub layer: SubmeshLayer,
    pub material: MaterialId,
    pub triangles: Vec<u32>,
}

/// Voxel-local geometry. Vertices are never shared between faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoxelMesh {
    pub vertices: Vec<Vec3>,
    pub uv: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub submeshes: Vec<Submesh>,
}

impl VoxelMesh {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.submeshes.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangles.len() / 3).sum()
    }

    /// Submesh materials in submesh order.
    pub fn materials(&self) -> Vec<MaterialId> {
        self.submeshes.iter().map(|s| s.material).collect()
    }

    /// Flat `[x, y, z, ...]` positions for physics hosts.
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            out.extend_from_slice(&v.to_array());
        }
        out
    }

    /// Area-weighted vertex normals from the current triangles.
    pub fn recalculate_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for sm in &self.submeshes {
            for tri in sm.triangles.chunks_exact(3) {
                let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
                let (a, b, c) = (self.vertices[ia], self.vertices[ib], self.vertices[ic]);
                let n = (b - a).cross(c - a);
                acc[ia] += n;
                acc[ib] += n;
                acc[ic] += n;
            }
        }
        self.normals = acc.into_iter().map(Vec3::normalized).collect();
    }
}

/// Texture coordinate index for corner `i` of face `f`.
#[inline]
fn uv_index(f: usize, i: usize, rotation: usize, mirror: bool) -> usize {
    let face_shift = if matches!(f, 1 | 2 | 4) { 1 } else { 0 };
    let corner = if mirror ^ (f % 2 == 1) { i } else { 4 - i };
    (rotation + face_shift + corner) % 4
}

/// World-space UV origin so neighbouring faces tile without seams.
#[inline]
fn uv_origin(f: usize, rotation: usize, position: Vec3) -> Vec2 {
    let a = f / 2;
    let swap = (rotation % 2 == 1) ^ (f == 0 || f == 1);
    if swap {
        Vec2::new(position[(a + 2) % 3], position[(a + 1) % 3])
    } else {
        Vec2::new(position[(a + 1) % 3], position[(a + 2) % 3])
    }
}

/// Builds the mesh of one voxel from its six faces.
///
/// Per filled face: four vertices, then base, overlay and selection submeshes (each only when
/// present) sharing them. Normals are recomputed from the finished triangles.
pub fn build_voxel_mesh(
    faces: &[VoxelFace; 6],
    position: Vec3,
    selected_material: MaterialId,
) -> VoxelMesh {
    let filled = faces.iter().filter(|f| !f.is_empty()).count();
    let mut mesh = VoxelMesh {
        vertices: Vec::with_capacity(filled * 4),
        uv: Vec::with_capacity(filled * 4),
        normals: Vec::new(),
        submeshes: Vec::new(),
    };

    for dir in FaceDir::ALL {
        let face = &faces[dir.index()];
        if face.is_empty() {
            continue;
        }
        let f = dir.index();
        let a = dir.axis();
        let rotation = face.rotation() as usize;
        let mirror = face.mirror();
        let origin = uv_origin(f, rotation, position);
        let base = mesh.vertices.len() as u32;

        for i in 0..4 {
            let mut p = [0.0f32; 3];
            p[a] = (f % 2) as f32;
            p[(a + 1) % 3] = SQUARE_LOOP[i].x;
            p[(a + 2) % 3] = SQUARE_LOOP[i].y;
            mesh.vertices.push(Vec3::new(p[0], p[1], p[2]));
            mesh.uv.push(origin + SQUARE_LOOP[uv_index(f, i, rotation, mirror)]);
        }

        let triangles: Vec<u32> = if dir.is_positive() {
            [0, 1, 2, 0, 2, 3].iter().map(|k| base + k).collect()
        } else {
            [0, 2, 1, 0, 3, 2].iter().map(|k| base + k).collect()
        };

        let layers = [
            (SubmeshLayer::Base, face.material),
            (SubmeshLayer::Overlay, face.overlay),
            (
                SubmeshLayer::Selection,
                face.selected().then_some(selected_material),
            ),
        ];
        for (layer, material) in layers {
            if let Some(material) = material {
                mesh.submeshes.push(Submesh {
                    face: dir,
                    layer,
                    material,
                    triangles: triangles.clone(),
                });
            }
        }
    }

    mesh.recalculate_normals();
    mesh
}
