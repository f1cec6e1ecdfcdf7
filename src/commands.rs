use std::error::Error;
use std::path::Path;

use nspace_io::{EditorConfig, Registries, load_level_from_path};
use nspace_runtime::{EditSession, Level, LevelStats, PlaySession};
use nspace_voxel::{EditorMode, MaterialCatalog, RenderContext, VoxelRender};

/// Everything a command needs besides the level itself.
pub struct Env {
    pub config: EditorConfig,
    pub catalog: MaterialCatalog,
    pub ctx: RenderContext,
    pub registries: Registries,
}

impl Env {
    pub fn load(config_path: &Path) -> Result<Self, Box<dyn Error>> {
        let config = EditorConfig::load(config_path)?;
        let catalog = MaterialCatalog::from_path(&config.materials)?;
        let ctx = config.render_context(&catalog)?;
        log::info!(
            "{} materials from {}, mode {:?}",
            catalog.materials.len(),
            config.materials.display(),
            config.mode
        );
        Ok(Self {
            config,
            catalog,
            ctx,
            registries: Registries::default(),
        })
    }

    fn load_level(&self, path: &Path) -> Result<Level, Box<dyn Error>> {
        Ok(load_level_from_path(path, &self.catalog, &self.registries)?)
    }
}

pub fn check(env: &Env, path: &Path) -> Result<LevelStats, Box<dyn Error>> {
    let level = env.load_level(path)?;
    let stats = level.stats();
    let sensors = level.entities().filter(|e| e.sensor.is_some()).count();
    let behaviors: usize = level.entities().map(|e| e.behaviors().len()).sum();
    println!(
        "{}: {} entities ({} sensors, {} behaviors), {} voxels, {} substances",
        path.display(),
        stats.entities,
        sensors,
        behaviors,
        stats.voxels,
        stats.substances
    );
    Ok(stats)
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshTotals {
    pub voxels: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub submeshes: usize,
    pub hidden: usize,
    pub triggers: usize,
}

impl MeshTotals {
    fn sum<'a>(renders: impl Iterator<Item = &'a VoxelRender>) -> Self {
        renders.fold(Self::default(), |mut t, r| {
            t.voxels += 1;
            t.vertices += r.mesh.vertices.len();
            t.triangles += r.mesh.triangle_count();
            t.submeshes += r.mesh.submeshes.len();
            t.hidden += usize::from(!r.renderer_enabled);
            t.triggers += usize::from(r.collider.box_is_trigger);
            t
        })
    }
}

pub fn mesh(env: &Env, path: &Path, mode: Option<EditorMode>) -> Result<MeshTotals, Box<dyn Error>> {
    let level = env.load_level(path)?;
    let ctx = RenderContext {
        mode: mode.unwrap_or(env.ctx.mode),
        ..env.ctx
    };
    let ids = level.voxels.ids();
    let totals = match ctx.mode {
        EditorMode::Edit => {
            let mut session = EditSession::new(level, ctx);
            session.rebuild_dirty();
            MeshTotals::sum(ids.iter().filter_map(|&id| session.render(id)))
        }
        EditorMode::Play => {
            let session = PlaySession::start(level, ctx);
            MeshTotals::sum(ids.iter().filter_map(|&id| session.render(id)))
        }
    };
    println!(
        "{} [{:?}]: {} voxels, {} vertices, {} triangles, {} submeshes, {} hidden, {} triggers",
        path.display(),
        ctx.mode,
        totals.voxels,
        totals.vertices,
        totals.triangles,
        totals.submeshes,
        totals.hidden,
        totals.triggers
    );
    Ok(totals)
}

pub fn play(env: &Env, path: &Path, ticks: u32) -> Result<(), Box<dyn Error>> {
    let level = env.load_level(path)?;
    let dt = env.config.tick_dt();
    let mut session = PlaySession::start(level, env.ctx);
    let (mut effects, mut rebuilt) = (0, 0);
    for _ in 0..ticks {
        let report = session.tick(dt);
        effects += report.effects;
        rebuilt += report.rebuilt;
    }
    println!(
        "{} ticks ({:.2}s): {} effects, {} voxel rebuilds",
        session.tick_count(),
        ticks as f32 * dt,
        effects,
        rebuilt
    );
    for (id, state) in session.states() {
        let Some(entity) = session.level().entity(*id) else {
            continue;
        };
        let health = state
            .health
            .map(|h| format!(" health={:.1}", h))
            .unwrap_or_default();
        println!(
            "  {} {}: on={} visible={} solid={}{}",
            id,
            entity,
            session.is_on(*id),
            state.visible,
            state.solid,
            health
        );
    }
    Ok(())
}
