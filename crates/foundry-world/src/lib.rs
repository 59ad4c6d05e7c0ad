//! Sparse chunked grid used as the reference host for structures and machines.
#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use foundry_blocks::{BlockId, BlockRegistry, HatchFlags, HatchKind};
use foundry_geom::BlockPos;
use foundry_machines::{EnergyBuffer, HatchEndpoints, SharedEndpoint, Simulation};
use foundry_structures::WorldView;
use hashbrown::HashMap;
use thiserror::Error;

pub const CHUNK_SIZE: i32 = 16;

type ChunkKey = (i32, i32, i32);

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unknown block `{0}`")]
    UnknownBlock(String),
    #[error("no energy hatch at {0}")]
    NoEnergyHatch(BlockPos),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStats {
    pub chunks: usize,
    pub blocks: usize,
    pub energy_buffers: usize,
}

/// Placed blocks keyed by 16³ chunk, plus the energy buffers of placed
/// energy hatches and a log of edited cells.
pub struct GridWorld {
    registry: Arc<BlockRegistry>,
    // key=(cx,cy,cz) -> placed blocks in that chunk
    chunks: HashMap<ChunkKey, HashMap<BlockPos, BlockId>>,
    energy: HashMap<BlockPos, Rc<RefCell<EnergyBuffer>>>,
    changes: Vec<BlockPos>,
}

impl GridWorld {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            chunks: HashMap::new(),
            energy: HashMap::new(),
            changes: Vec::new(),
        }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[inline]
    fn chunk_key(pos: BlockPos) -> ChunkKey {
        (
            pos.x.div_euclid(CHUNK_SIZE),
            pos.y.div_euclid(CHUNK_SIZE),
            pos.z.div_euclid(CHUNK_SIZE),
        )
    }

    pub fn get(&self, pos: BlockPos) -> Option<BlockId> {
        self.chunks
            .get(&Self::chunk_key(pos))
            .and_then(|m| m.get(&pos).copied())
    }

    /// Place `id` at `pos`, returning what was there.
    pub fn set(&mut self, pos: BlockPos, id: BlockId) -> Option<BlockId> {
        let prev = self
            .chunks
            .entry(Self::chunk_key(pos))
            .or_default()
            .insert(pos, id);
        if prev != Some(id) {
            self.energy.remove(&pos);
            if let Some(ty) = self.registry.get(id) {
                if ty.hatch == Some(HatchKind::EnergyInput) {
                    self.energy
                        .insert(pos, EnergyBuffer::new(ty.capacity).shared());
                }
            }
            self.changes.push(pos);
        }
        prev
    }

    pub fn set_by_name(&mut self, pos: BlockPos, name: &str) -> Result<Option<BlockId>, WorldError> {
        let id = self
            .registry
            .id_by_name(name)
            .ok_or_else(|| WorldError::UnknownBlock(name.to_string()))?;
        Ok(self.set(pos, id))
    }

    pub fn remove(&mut self, pos: BlockPos) -> Option<BlockId> {
        let key = Self::chunk_key(pos);
        let chunk = self.chunks.get_mut(&key)?;
        let prev = chunk.remove(&pos)?;
        if chunk.is_empty() {
            self.chunks.remove(&key);
        }
        self.energy.remove(&pos);
        self.changes.push(pos);
        Some(prev)
    }

    /// Fill the inclusive box between `a` and `b`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, id: BlockId) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    self.set(BlockPos::new(x, y, z), id);
                }
            }
        }
    }

    pub fn energy_buffer(&self, pos: BlockPos) -> Option<&Rc<RefCell<EnergyBuffer>>> {
        self.energy.get(&pos)
    }

    /// Push energy into the hatch at `pos`; returns what fit.
    pub fn charge(&mut self, pos: BlockPos, amount: u64) -> Result<u64, WorldError> {
        let buf = self
            .energy
            .get(&pos)
            .ok_or(WorldError::NoEnergyHatch(pos))?;
        let accepted = buf.borrow_mut().insert(amount, Simulation::Act);
        log::trace!(target: "energy", "charged {accepted}/{amount} into {pos}");
        Ok(accepted)
    }

    /// Cells edited since the last call, in edit order.
    pub fn drain_changes(&mut self) -> Vec<BlockPos> {
        std::mem::take(&mut self.changes)
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            chunks: self.chunks.len(),
            blocks: self.chunks.values().map(|m| m.len()).sum(),
            energy_buffers: self.energy.len(),
        }
    }
}

impl WorldView for GridWorld {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        self.get(pos)
    }

    fn hatch_at(&self, pos: BlockPos) -> Option<HatchFlags> {
        let id = self.get(pos)?;
        self.registry.get(id)?.hatch_flags()
    }
}

impl HatchEndpoints for GridWorld {
    fn energy_inputs_at(&self, pos: BlockPos, out: &mut Vec<SharedEndpoint>) {
        if let Some(buf) = self.energy.get(&pos) {
            out.push(buf.clone());
        }
    }
}
