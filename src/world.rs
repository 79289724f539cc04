use std::path::PathBuf;
use std::sync::Arc;

use hashbrown::HashMap;
use strata_blocks::{Block, BlockId, BlockRegistry, RegistryError, TemplateRegistry};
use strata_chunk::{BlockIter, Chunk, ChunkMap, ChunkMesh, ChunkState, InitializingChunks};
use strata_edit::{dig_block, place_block};
use strata_geom::Vec3;
use strata_io::{CodecError, SaveError, SaveStore};
use strata_lighting::{LightQueue, seed_chunk_light};
use strata_mesh_cpu::{MeshOptions, build_chunk_mesh};
use strata_runtime::{ChunkJob, JobOut, Runtime, RuntimeConfig, RuntimeError, RuntimeStats};
use strata_world::{
    CHUNK_SIZE_Z, ChunkCoord, Generator, WorldConfig, chunk_coord_for_block, chunk_coord_for_world,
    local_xy_for_block,
};
use thiserror::Error;

use crate::raycast::{RayHit, raycast};
use crate::sky::{DayCycle, SkySample};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("saved chunk {coord} at {} is unreadable: {source}", .path.display())]
    CorruptSave {
        coord: ChunkCoord,
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// What one [`World::update`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub activated: Option<ChunkCoord>,
    pub deactivated: Option<ChunkCoord>,
    /// Job results consumed, including discarded ones.
    pub completed: usize,
    pub light_updates: usize,
    pub meshes_rebuilt: usize,
}

#[derive(Clone, Debug)]
struct Poison {
    coord: ChunkCoord,
    path: PathBuf,
    source: CodecError,
}

impl Poison {
    fn error(&self) -> WorldError {
        WorldError::CorruptSave {
            coord: self.coord,
            path: self.path.clone(),
            source: self.source.clone(),
        }
    }
}

/// Streams chunks in and out around a viewpoint and keeps their light and
/// meshes current.
///
/// All structural changes, lighting and meshing happen on the thread that
/// owns the `World`. Terrain generation and disk traffic run on the
/// [`Runtime`] lanes and come back through [`World::update`].
pub struct World {
    config: WorldConfig,
    registry: Arc<BlockRegistry>,
    active: ChunkMap,
    initializing: Arc<InitializingChunks>,
    saving: HashMap<ChunkCoord, ChunkState>,
    runtime: Runtime,
    store: SaveStore,
    light: LightQueue,
    day: DayCycle,
    mesh_opts: MeshOptions,
    viewpoint: Vec3,
    poisoned: Option<Poison>,
    shut_down: bool,
}

impl World {
    pub fn new(
        config: WorldConfig,
        registry: Arc<BlockRegistry>,
        templates: &TemplateRegistry,
    ) -> Result<Self, WorldError> {
        let generator = Generator::new(&config, &registry, templates)?;
        let store = SaveStore::new(&config.save_root, config.seed);
        let initializing = Arc::new(InitializingChunks::new());
        let runtime = Runtime::new(
            RuntimeConfig::from_settings(&config.runtime),
            generator,
            store.clone(),
            Arc::clone(&initializing),
        )?;
        log::info!(
            target: "streaming",
            "world seed {} ({:?} terrain), activation range {}, {} generation threads, saves in {}",
            config.seed,
            config.generation.mode,
            config.activation_range,
            runtime.generation_threads(),
            store.dir().display()
        );
        Ok(Self {
            day: DayCycle::new(&config.sky),
            mesh_opts: MeshOptions::from_debug(&config.debug),
            config,
            registry,
            active: ChunkMap::new(),
            initializing,
            saving: HashMap::new(),
            runtime,
            store,
            light: LightQueue::new(),
            viewpoint: Vec3::ZERO,
            poisoned: None,
            shut_down: false,
        })
    }

    /// World over the embedded block catalog and templates.
    pub fn with_builtin(config: WorldConfig) -> Result<Self, WorldError> {
        let registry = Arc::new(BlockRegistry::builtin()?);
        let templates = TemplateRegistry::builtin(&registry)?;
        Self::new(config, registry, &templates)
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    #[inline]
    pub fn active(&self) -> &ChunkMap {
        &self.active
    }

    #[inline]
    pub fn viewpoint(&self) -> Vec3 {
        self.viewpoint
    }

    pub fn set_viewpoint(&mut self, viewpoint: Vec3) {
        self.viewpoint = viewpoint;
    }

    #[inline]
    pub fn day_cycle(&self) -> &DayCycle {
        &self.day
    }

    pub fn sky(&self) -> SkySample {
        self.day.sample()
    }

    pub fn runtime_stats(&self) -> RuntimeStats {
        self.runtime.stats()
    }

    #[inline]
    pub fn pending_light_updates(&self) -> usize {
        self.light.len()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        if self.active.contains(coord) {
            ChunkState::Active
        } else if let Some(state) = self.initializing.state(coord) {
            state
        } else if let Some(state) = self.saving.get(&coord) {
            *state
        } else {
            ChunkState::Missing
        }
    }

    pub fn block_at(&self, gx: i32, gy: i32, gz: i32) -> Option<Block> {
        let it = self.active.iter_at(gx, gy, gz)?;
        self.active.block(it)
    }

    /// One simulation step: at most one activation or deactivation, then job
    /// completions, lighting, meshing and the day cycle.
    ///
    /// Once a corrupt save has been seen every call fails with the same error.
    /// The step that sees it still applies the rest of its completed jobs.
    pub fn update(&mut self, dt: f32) -> Result<StepReport, WorldError> {
        self.check_poison()?;
        let mut report = StepReport::default();
        if self.shut_down {
            return Ok(report);
        }

        // Saves confirmed last step stay visible for one step.
        self.saving.retain(|_, state| *state != ChunkState::SaveComplete);

        if self.config.auto_create_chunks {
            report.activated = self.activate_nearest_missing();
        }
        if report.activated.is_none() {
            report.deactivated = self.deactivate_farthest();
        }

        while let Some(out) = self.runtime.poll_completed() {
            report.completed += 1;
            self.handle_job_out(out);
        }
        self.check_poison()?;

        let stats = if self.config.debug.step_light_propagation {
            self.light.process_limit(&mut self.active, &self.registry, 1)
        } else {
            self.light.process(&mut self.active, &self.registry)
        };
        report.light_updates = stats.processed;

        report.meshes_rebuilt = self.rebuild_meshes();
        self.day.advance(dt);

        log::trace!(
            target: "streaming",
            "step: {} active, {} initializing, {} saving, {:?}",
            self.active.len(),
            self.initializing.len(),
            self.saving.len(),
            report
        );
        Ok(report)
    }

    fn check_poison(&self) -> Result<(), WorldError> {
        match &self.poisoned {
            Some(poison) => Err(poison.error()),
            None => Ok(()),
        }
    }

    fn activation_candidate(&self) -> Option<ChunkCoord> {
        let range = self.config.activation_range;
        let radius = self.config.activation_radius_chunks();
        let center = chunk_coord_for_world(self.viewpoint.x, self.viewpoint.y);
        let mut best: Option<(f32, ChunkCoord)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = center.offset(dx, dy);
                if self.active.contains(coord)
                    || self.initializing.contains(coord)
                    || self.saving.contains_key(&coord)
                {
                    continue;
                }
                let d2 = self.distance_sq(coord);
                if d2 >= range * range {
                    continue;
                }
                if best.is_none_or(|(b, _)| d2 < b) {
                    best = Some((d2, coord));
                }
            }
        }
        best.map(|(_, coord)| coord)
    }

    fn distance_sq(&self, coord: ChunkCoord) -> f32 {
        let (x, y) = coord.center_xy();
        Vec3::new(x, y, 0.0).distance_xy_sq(self.viewpoint)
    }

    fn activate_nearest_missing(&mut self) -> Option<ChunkCoord> {
        let coord = self.activation_candidate()?;
        let job = if self.config.load_saved_chunks && self.store.has_chunk(coord) {
            self.initializing.insert(coord, ChunkState::QueuedLoad);
            ChunkJob::Load { coord }
        } else {
            self.initializing.insert(coord, ChunkState::QueuedGenerate);
            ChunkJob::Generate { coord }
        };
        log::info!(target: "streaming", "activating chunk {} ({:?})", coord, self.chunk_state(coord));
        self.runtime.submit(job);
        Some(coord)
    }

    fn deactivate_farthest(&mut self) -> Option<ChunkCoord> {
        let limit = self.config.deactivation_range();
        let limit_sq = limit * limit;
        let mut farthest: Option<(f32, ChunkCoord)> = None;
        for (&coord, _) in self.active.iter() {
            let d2 = self.distance_sq(coord);
            if d2 >= limit_sq && farthest.is_none_or(|(f, _)| d2 > f) {
                farthest = Some((d2, coord));
            }
        }
        let (_, coord) = farthest?;

        self.light.purge_chunk(&mut self.active, coord);
        let chunk = self.active.remove_unlinked(coord)?;
        if chunk.needs_saving() && self.config.save_modified_chunks {
            self.saving.insert(coord, ChunkState::QueuedSave);
            self.runtime.submit(ChunkJob::Save {
                coord,
                blocks: chunk.into_blocks(),
            });
            log::info!(target: "streaming", "deactivated chunk {}, queued save", coord);
        } else {
            log::info!(target: "streaming", "deactivated chunk {}", coord);
        }
        Some(coord)
    }

    fn handle_job_out(&mut self, out: JobOut) {
        match out {
            JobOut::Generated { coord, blocks } | JobOut::Loaded { coord, blocks } => {
                self.finish_activation(coord, blocks);
            }
            JobOut::LoadFailed {
                coord,
                error: SaveError::Corrupt { path, source },
            } => {
                log::error!(target: "streaming", "chunk {} save at {} is corrupt: {}", coord, path.display(), source);
                self.initializing.remove(coord);
                if self.poisoned.is_none() {
                    self.poisoned = Some(Poison { coord, path, source });
                }
            }
            JobOut::LoadFailed {
                coord,
                error: error @ SaveError::Io { .. },
            } => {
                if self.initializing.set_state(coord, ChunkState::QueuedGenerate) {
                    log::warn!(target: "streaming", "load of chunk {} failed ({}), generating instead", coord, error);
                    self.runtime.submit(ChunkJob::Generate { coord });
                }
            }
            JobOut::Saved { coord } => {
                self.saving.insert(coord, ChunkState::SaveComplete);
                log::debug!(target: "streaming", "chunk {} saved", coord);
            }
            JobOut::SaveFailed { coord, error } => {
                self.saving.remove(&coord);
                log::error!(target: "streaming", "saving chunk {} failed: {}", coord, error);
            }
            JobOut::Discarded { coord } => {
                log::debug!(target: "streaming", "discarded abandoned job for chunk {}", coord);
            }
        }
    }

    fn finish_activation(&mut self, coord: ChunkCoord, blocks: Box<[Block]>) {
        let Some(state) = self.initializing.remove(coord) else {
            log::debug!(target: "streaming", "dropping result for abandoned chunk {}", coord);
            return;
        };
        if !self.active.insert_linked(Chunk::new(coord, blocks)) {
            log::warn!(target: "streaming", "chunk {} completed while already active", coord);
            return;
        }
        seed_chunk_light(&mut self.light, &mut self.active, &self.registry, coord);
        log::debug!(target: "streaming", "chunk {} {:?} -> Active", coord, state);
    }

    fn rebuild_meshes(&mut self) -> usize {
        let budget = self.config.max_mesh_rebuilds_per_step;
        if budget == 0 {
            return 0;
        }
        let mut dirty: Vec<(f32, ChunkCoord)> = self
            .active
            .iter()
            .filter(|(_, chunk)| chunk.is_mesh_dirty() && chunk.has_all_neighbors())
            .map(|(&coord, _)| (self.distance_sq(coord), coord))
            .collect();
        dirty.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut rebuilt = 0;
        for &(_, coord) in dirty.iter().take(budget) {
            let Some(mesh) = build_chunk_mesh(&self.active, coord, &self.registry, self.mesh_opts) else {
                continue;
            };
            if let Some(chunk) = self.active.get_mut(coord) {
                chunk.set_mesh(mesh);
                rebuilt += 1;
            }
        }
        rebuilt
    }

    /// Meshes rebuilt since the last call, for the renderer to re-upload.
    pub fn drain_mesh_uploads(&mut self) -> Vec<(ChunkCoord, Arc<ChunkMesh>)> {
        self.active
            .iter_mut()
            .filter_map(|(&coord, chunk)| chunk.take_upload().map(|mesh| (coord, mesh)))
            .collect()
    }

    /// Blocks until the worker lanes are idle, applying every result.
    ///
    /// A poisoned world still settles its outstanding jobs before the error
    /// is returned.
    pub fn finish_pending_jobs(&mut self) -> Result<usize, WorldError> {
        let mut handled = 0;
        while !self.runtime.is_idle() {
            for out in self.runtime.await_all() {
                handled += 1;
                self.handle_job_out(out);
            }
        }
        self.check_poison()?;
        Ok(handled)
    }

    pub fn dig(&mut self, gx: i32, gy: i32, gz: i32) -> Option<BlockId> {
        let it = self.active.iter_at(gx, gy, gz)?;
        dig_block(&mut self.active, &mut self.light, &self.registry, it)
    }

    pub fn place(&mut self, gx: i32, gy: i32, gz: i32, id: BlockId) -> bool {
        let Some(it) = self.active.iter_at(gx, gy, gz) else {
            return false;
        };
        place_block(&mut self.active, &mut self.light, &self.registry, it, id)
    }

    /// First opaque block within `reach` along the ray.
    pub fn raycast(&self, start: Vec3, dir: Vec3) -> Option<RayHit> {
        raycast(&self.active, &self.registry, start, dir, self.config.reach)
    }

    /// Digs the block the ray hits. Returns the removed block and where it was.
    pub fn dig_targeted(&mut self, start: Vec3, dir: Vec3) -> Option<(BlockIter, BlockId)> {
        let hit = self.raycast(start, dir)?;
        let removed = dig_block(&mut self.active, &mut self.light, &self.registry, hit.block)?;
        Some((hit.block, removed))
    }

    /// Places `id` against the hit face of the block the ray hits.
    pub fn place_targeted(&mut self, start: Vec3, dir: Vec3, id: BlockId) -> Option<BlockIter> {
        let hit = self.raycast(start, dir)?;
        let target = self.active.step(hit.block, hit.face)?;
        place_block(&mut self.active, &mut self.light, &self.registry, target, id).then_some(target)
    }

    /// Height of the topmost non-air block in a column of an active chunk.
    pub fn highest_solid_in_column(&self, gx: i32, gy: i32) -> Option<i32> {
        let chunk = self.active.get(chunk_coord_for_block(gx, gy))?;
        let (x, y) = local_xy_for_block(gx, gy);
        chunk.highest_non_air(x, y).map(|z| z as i32)
    }

    /// Stacks `id` on the topmost non-air block of a column. Fails when the
    /// column is empty, full to the top, or not active.
    pub fn place_on_column_top(&mut self, gx: i32, gy: i32, id: BlockId) -> bool {
        let Some(top) = self.highest_solid_in_column(gx, gy) else {
            return false;
        };
        let z = top + 1;
        if z >= CHUNK_SIZE_Z as i32 {
            return false;
        }
        self.place(gx, gy, z, id)
    }

    /// Cancels queued work, waits out in-flight jobs, saves every modified
    /// chunk and drops the active set. Later updates do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.saving.retain(|_, state| *state != ChunkState::SaveComplete);

        let cancelled = self.runtime.cancel_queued();
        for job in &cancelled {
            self.initializing.remove(job.coord());
        }
        let abandoned = self.initializing.clear();
        for out in self.runtime.await_all() {
            self.settle_during_shutdown(out);
        }

        let mut saves = 0;
        let chunks: Vec<Chunk> = self.active.drain().collect();
        let dropped = chunks.len();
        if self.config.save_modified_chunks {
            for chunk in chunks.into_iter().filter(Chunk::needs_saving) {
                let coord = chunk.coord();
                self.saving.insert(coord, ChunkState::QueuedSave);
                self.runtime.submit(ChunkJob::Save {
                    coord,
                    blocks: chunk.into_blocks(),
                });
                saves += 1;
            }
        }
        for out in self.runtime.await_all() {
            self.settle_during_shutdown(out);
        }
        self.light.clear();
        log::info!(
            target: "streaming",
            "world shut down: {} jobs cancelled, {} initializing abandoned, {} chunks dropped, {} saved",
            cancelled.len(),
            abandoned.len(),
            dropped,
            saves
        );
    }

    fn settle_during_shutdown(&mut self, out: JobOut) {
        match out {
            JobOut::Saved { coord } => {
                self.saving.remove(&coord);
            }
            JobOut::SaveFailed { coord, error } => {
                self.saving.remove(&coord);
                log::error!(target: "streaming", "saving chunk {} failed: {}", coord, error);
            }
            JobOut::LoadFailed { coord, error } => {
                log::warn!(target: "streaming", "ignoring failed load of chunk {} during shutdown: {}", coord, error);
            }
            other => {
                log::debug!(target: "streaming", "discarding result for chunk {} during shutdown", other.coord());
            }
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.shutdown();
    }
}
