use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strata_blocks::Block;
use strata_world::ChunkCoord;
use thiserror::Error;

use crate::codec::{CodecError, decode_chunk, encode_chunk};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// `<root>/World_<seed>/Chunk(<x>,<y>).chunk` files for one world seed.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
    seed: u32,
}

impl SaveStore {
    pub fn new(root: impl AsRef<Path>, seed: u32) -> Self {
        Self {
            dir: root.as_ref().join(format!("World_{seed}")),
            seed,
        }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn chunk_path(&self, coord: ChunkCoord) -> PathBuf {
        self.dir.join(format!("Chunk({},{}).chunk", coord.cx, coord.cy))
    }

    pub fn has_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunk_path(coord).is_file()
    }

    pub fn ensure_dir(&self) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir).map_err(|source| SaveError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn load(&self, coord: ChunkCoord) -> Result<Box<[Block]>, SaveError> {
        let path = self.chunk_path(coord);
        let bytes = fs::read(&path).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        decode_chunk(&bytes, self.seed).map_err(|source| SaveError::Corrupt { path, source })
    }

    pub fn save(&self, coord: ChunkCoord, blocks: &[Block]) -> Result<(), SaveError> {
        self.ensure_dir()?;
        let path = self.chunk_path(coord);
        let bytes = encode_chunk(blocks, self.seed);
        fs::write(&path, bytes).map_err(|source| SaveError::Io { path: path.clone(), source })?;
        log::debug!(target: "io", "saved chunk {} to {}", coord, path.display());
        Ok(())
    }
}
