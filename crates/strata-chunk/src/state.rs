use std::sync::{Mutex, MutexGuard};

use hashbrown::HashMap;
use strata_world::ChunkCoord;

/// Lifecycle of a chunk coordinate as tracked by the streaming manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    Missing,
    QueuedLoad,
    QueuedGenerate,
    LoadComplete,
    GenerateComplete,
    Active,
    QueuedSave,
    SaveComplete,
}

impl ChunkState {
    #[inline]
    pub fn is_initializing(self) -> bool {
        matches!(
            self,
            ChunkState::QueuedLoad
                | ChunkState::QueuedGenerate
                | ChunkState::LoadComplete
                | ChunkState::GenerateComplete
        )
    }
}

/// Coordinates with a load or generate task outstanding.
///
/// Shared between the main context and the workers. Workers only read it, to
/// skip coordinates that were abandoned while their task sat in the queue.
#[derive(Debug, Default)]
pub struct InitializingChunks {
    inner: Mutex<HashMap<ChunkCoord, ChunkState>>,
}

impl InitializingChunks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChunkCoord, ChunkState>> {
        // Poison is ignored: every operation is a single map call.
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn insert(&self, coord: ChunkCoord, state: ChunkState) -> bool {
        debug_assert!(state.is_initializing(), "{state:?} is not an initializing state");
        self.lock().insert(coord, state).is_none()
    }

    pub fn set_state(&self, coord: ChunkCoord, state: ChunkState) -> bool {
        match self.lock().get_mut(&coord) {
            Some(s) => {
                debug_assert!(state.is_initializing(), "{state:?} is not an initializing state");
                *s = state;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<ChunkState> {
        self.lock().remove(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.lock().contains_key(&coord)
    }

    pub fn state(&self, coord: ChunkCoord) -> Option<ChunkState> {
        self.lock().get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) -> Vec<ChunkCoord> {
        self.lock().drain().map(|(c, _)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_exclusive_per_coordinate() {
        let init = InitializingChunks::new();
        let c = ChunkCoord::new(1, 1);
        assert!(init.insert(c, ChunkState::QueuedGenerate));
        assert!(!init.insert(c, ChunkState::QueuedLoad));
        assert!(init.set_state(c, ChunkState::GenerateComplete));
        assert_eq!(init.state(c), Some(ChunkState::GenerateComplete));
        assert_eq!(init.remove(c), Some(ChunkState::GenerateComplete));
        assert!(!init.set_state(c, ChunkState::Active));
        assert!(init.is_empty());
    }
}
