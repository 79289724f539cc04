use strata_blocks::Block;
use strata_io::SaveError;
use strata_world::ChunkCoord;

/// Which lane a job runs on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskClass {
    /// The single dedicated disk thread.
    Disk,
    /// Every other worker thread.
    Generation,
}

#[derive(Debug)]
pub enum ChunkJob {
    Generate { coord: ChunkCoord },
    Load { coord: ChunkCoord },
    Save { coord: ChunkCoord, blocks: Box<[Block]> },
}

impl ChunkJob {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            ChunkJob::Generate { coord } | ChunkJob::Load { coord } | ChunkJob::Save { coord, .. } => {
                *coord
            }
        }
    }

    pub fn class(&self) -> TaskClass {
        match self {
            ChunkJob::Generate { .. } => TaskClass::Generation,
            ChunkJob::Load { .. } | ChunkJob::Save { .. } => TaskClass::Disk,
        }
    }

    /// Generate and load jobs may be dropped before they start; saves may not.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, ChunkJob::Save { .. })
    }
}

#[derive(Debug)]
pub enum JobOut {
    Generated { coord: ChunkCoord, blocks: Box<[Block]> },
    Loaded { coord: ChunkCoord, blocks: Box<[Block]> },
    LoadFailed { coord: ChunkCoord, error: SaveError },
    Saved { coord: ChunkCoord },
    SaveFailed { coord: ChunkCoord, error: SaveError },
    /// The coordinate was no longer initializing when a worker picked the job up.
    Discarded { coord: ChunkCoord },
}

impl JobOut {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            JobOut::Generated { coord, .. }
            | JobOut::Loaded { coord, .. }
            | JobOut::LoadFailed { coord, .. }
            | JobOut::Saved { coord }
            | JobOut::SaveFailed { coord, .. }
            | JobOut::Discarded { coord } => *coord,
        }
    }
}
