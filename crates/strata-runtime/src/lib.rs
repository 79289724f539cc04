//! Chunk job lanes and worker orchestration.
#![forbid(unsafe_code)]

mod job;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{ChunkState, InitializingChunks};
use strata_io::SaveStore;
use strata_world::Generator;
use strata_world::worldgen::RuntimeSettings;
use thiserror::Error;

pub use job::{ChunkJob, JobOut, TaskClass};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build the {lane} thread pool: {source}")]
    PoolBuild {
        lane: &'static str,
        #[source]
        source: ThreadPoolBuildError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub generation_threads: usize,
}

impl RuntimeConfig {
    pub fn from_settings(settings: &RuntimeSettings) -> Self {
        let generation_threads = settings.generation_threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .saturating_sub(1)
        });
        Self {
            generation_threads: generation_threads.max(1),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_settings(&RuntimeSettings::default())
    }
}

/// Snapshot of queue depth and in-flight jobs per lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub queued_disk: usize,
    pub inflight_disk: usize,
    pub queued_generation: usize,
    pub inflight_generation: usize,
    /// Submitted jobs whose result has not been taken yet.
    pub outstanding: usize,
}

/// State shared by every worker.
struct WorkerCtx {
    generator: Generator,
    store: SaveStore,
    initializing: Arc<InitializingChunks>,
}

#[derive(Default)]
struct LaneCounters {
    queued: AtomicUsize,
    inflight: AtomicUsize,
}

fn run_job(job: ChunkJob, ctx: &WorkerCtx) -> JobOut {
    match job {
        ChunkJob::Generate { coord } => {
            if !ctx.initializing.contains(coord) {
                return JobOut::Discarded { coord };
            }
            let blocks = ctx.generator.generate(coord);
            ctx.initializing.set_state(coord, ChunkState::GenerateComplete);
            JobOut::Generated { coord, blocks }
        }
        ChunkJob::Load { coord } => {
            if !ctx.initializing.contains(coord) {
                return JobOut::Discarded { coord };
            }
            match ctx.store.load(coord) {
                Ok(blocks) => {
                    ctx.initializing.set_state(coord, ChunkState::LoadComplete);
                    JobOut::Loaded { coord, blocks }
                }
                Err(error) => JobOut::LoadFailed { coord, error },
            }
        }
        ChunkJob::Save { coord, blocks } => match ctx.store.save(coord, &blocks) {
            Ok(()) => JobOut::Saved { coord },
            Err(error) => JobOut::SaveFailed { coord, error },
        },
    }
}

fn build_lane(
    lane: &'static str,
    threads: usize,
    rx: &Receiver<ChunkJob>,
    tx: &Sender<JobOut>,
    ctx: &Arc<WorkerCtx>,
    counters: &Arc<LaneCounters>,
) -> Result<ThreadPool, RuntimeError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("strata-{lane}-{i}"))
        .build()
        .map_err(|source| RuntimeError::PoolBuild { lane, source })?;
    for _ in 0..threads {
        let rx = rx.clone();
        let tx = tx.clone();
        let ctx = Arc::clone(ctx);
        let counters = Arc::clone(counters);
        pool.spawn(move || {
            while let Ok(job) = rx.recv() {
                counters.queued.fetch_sub(1, Ordering::Relaxed);
                counters.inflight.fetch_add(1, Ordering::Relaxed);
                let out = run_job(job, &ctx);
                counters.inflight.fetch_sub(1, Ordering::Relaxed);
                if tx.send(out).is_err() {
                    break;
                }
            }
        });
    }
    Ok(pool)
}

/// Two job lanes: one disk thread (`strata-disk-0`) for loads and saves, and
/// `generation_threads` workers (`strata-gen-{i}`) for terrain.
///
/// Results come back in completion order through [`poll_completed`] and
/// [`await_all`]. Every submitted job yields exactly one [`JobOut`], unless it was
/// taken back with [`cancel_queued`].
///
/// [`poll_completed`]: Runtime::poll_completed
/// [`await_all`]: Runtime::await_all
/// [`cancel_queued`]: Runtime::cancel_queued
pub struct Runtime {
    disk_tx: Sender<ChunkJob>,
    disk_rx: Receiver<ChunkJob>,
    gen_tx: Sender<ChunkJob>,
    gen_rx: Receiver<ChunkJob>,
    res_rx: Receiver<JobOut>,
    _disk_pool: ThreadPool,
    _gen_pool: ThreadPool,
    disk: Arc<LaneCounters>,
    generation: Arc<LaneCounters>,
    outstanding: AtomicUsize,
    w_gen: usize,
}

impl Runtime {
    pub fn new(
        config: RuntimeConfig,
        generator: Generator,
        store: SaveStore,
        initializing: Arc<InitializingChunks>,
    ) -> Result<Self, RuntimeError> {
        let (disk_tx, disk_rx) = unbounded::<ChunkJob>();
        let (gen_tx, gen_rx) = unbounded::<ChunkJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let ctx = Arc::new(WorkerCtx {
            generator,
            store,
            initializing,
        });
        let disk = Arc::new(LaneCounters::default());
        let generation = Arc::new(LaneCounters::default());
        let w_gen = config.generation_threads.max(1);

        let disk_pool = build_lane("disk", 1, &disk_rx, &res_tx, &ctx, &disk)?;
        let gen_pool = build_lane("gen", w_gen, &gen_rx, &res_tx, &ctx, &generation)?;
        log::info!(target: "runtime", "worker lanes up: 1 disk, {} generation", w_gen);

        Ok(Self {
            disk_tx,
            disk_rx,
            gen_tx,
            gen_rx,
            res_rx,
            _disk_pool: disk_pool,
            _gen_pool: gen_pool,
            disk,
            generation,
            outstanding: AtomicUsize::new(0),
            w_gen,
        })
    }

    #[inline]
    pub fn generation_threads(&self) -> usize {
        self.w_gen
    }

    fn lane(&self, class: TaskClass) -> (&Sender<ChunkJob>, &LaneCounters) {
        match class {
            TaskClass::Disk => (&self.disk_tx, &self.disk),
            TaskClass::Generation => (&self.gen_tx, &self.generation),
        }
    }

    pub fn submit(&self, job: ChunkJob) {
        let (tx, counters) = self.lane(job.class());
        counters.queued.fetch_add(1, Ordering::Relaxed);
        self.outstanding.fetch_add(1, Ordering::Relaxed);
        if tx.send(job).is_err() {
            counters.queued.fetch_sub(1, Ordering::Relaxed);
            self.outstanding.fetch_sub(1, Ordering::Relaxed);
        }
    }

    fn took_result(&self, out: JobOut) -> JobOut {
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        out
    }

    pub fn poll_completed(&self) -> Option<JobOut> {
        self.res_rx.try_recv().ok().map(|out| self.took_result(out))
    }

    /// Takes back every generate and load job that no worker has started.
    /// Queued saves stay queued.
    pub fn cancel_queued(&self) -> Vec<ChunkJob> {
        let mut cancelled = Vec::new();
        let mut saves = Vec::new();
        for (rx, counters) in [(&self.gen_rx, &self.generation), (&self.disk_rx, &self.disk)] {
            for job in rx.try_iter() {
                counters.queued.fetch_sub(1, Ordering::Relaxed);
                self.outstanding.fetch_sub(1, Ordering::Relaxed);
                if job.is_cancellable() {
                    cancelled.push(job);
                } else {
                    saves.push(job);
                }
            }
        }
        for job in saves {
            self.submit(job);
        }
        if !cancelled.is_empty() {
            log::debug!(target: "runtime", "cancelled {} queued jobs", cancelled.len());
        }
        cancelled
    }

    /// Blocks until every submitted job has reported back.
    pub fn await_all(&self) -> Vec<JobOut> {
        let mut out = Vec::new();
        while self.outstanding.load(Ordering::Relaxed) > 0 {
            match self.res_rx.recv() {
                Ok(res) => out.push(self.took_result(res)),
                Err(_) => break,
            }
        }
        out
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            queued_disk: self.disk.queued.load(Ordering::Relaxed),
            inflight_disk: self.disk.inflight.load(Ordering::Relaxed),
            queued_generation: self.generation.queued.load(Ordering::Relaxed),
            inflight_generation: self.generation.inflight.load(Ordering::Relaxed),
            outstanding: self.outstanding.load(Ordering::Relaxed),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding.load(Ordering::Relaxed) == 0
    }
}
