//! Voxel cells, substances, and per-cell mesh generation.
#![forbid(unsafe_code)]

pub mod array;
pub mod face;
pub mod material;
pub mod mesh;
pub mod render;
pub mod substance;
pub mod voxel;

pub use array::{VoxelArray, VoxelArrayStats};
pub use face::{FaceDir, VoxelFace};
pub use material::{MaterialCatalog, MaterialId};
pub use mesh::{Submesh, SubmeshLayer, VoxelMesh, build_voxel_mesh};
pub use render::{ColliderState, EditorMode, RenderContext, VoxelRender, update_voxel};
pub use substance::{Substance, SubstanceFlags, SubstanceId};
pub use voxel::{Voxel, VoxelId};
