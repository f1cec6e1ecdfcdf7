use criterion::{Criterion, black_box, criterion_group, criterion_main};

use nspace_geom::Vec3;
use nspace_voxel::{
    EditorMode, FaceDir, MaterialId, RenderContext, VoxelArray, VoxelFace, build_voxel_mesh,
};

fn bench_single_voxel(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_voxel_mesh");
    let mut faces = [VoxelFace::with_material(MaterialId(1)); 6];
    for (i, f) in faces.iter_mut().enumerate() {
        f.orientation = (i % 8) as u8;
        f.overlay = (i % 2 == 0).then_some(MaterialId(2));
    }
    group.bench_function("full_cube", |b| {
        b.iter(|| build_voxel_mesh(black_box(&faces), black_box(Vec3::new(3.0, 4.0, 5.0)), MaterialId(9)))
    });
    group.finish();
}

fn bench_floor_rebuild(c: &mut Criterion) {
    let mut arr = VoxelArray::new();
    for x in 0..32 {
        for z in 0..32 {
            let v = arr.get_or_create((x, 0, z));
            arr.set_face(v, FaceDir::PosY, VoxelFace::with_material(MaterialId(0)));
        }
    }
    let ctx = RenderContext {
        mode: EditorMode::Edit,
        selected_material: MaterialId(9),
        x_ray_material: MaterialId(10),
    };
    let ids = arr.ids();
    c.bench_function("render_floor_32x32", |b| {
        b.iter(|| {
            let mut tris = 0;
            for &id in &ids {
                if let Some(out) = arr.render(id, &ctx) {
                    tris += out.mesh.triangle_count();
                }
            }
            black_box(tris)
        })
    });
}

criterion_group!(benches, bench_single_voxel, bench_floor_rebuild);
criterion_main!(benches);
