//! Energy endpoints and the router that drains them.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use foundry_geom::BlockPos;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Simulation {
    /// Report what would happen without touching any stock.
    Simulate,
    Act,
}

impl Simulation {
    #[inline]
    pub fn is_acting(self) -> bool {
        matches!(self, Simulation::Act)
    }
}

/// A drainable stock exposed by a hatch (energy cell, tank, slot).
pub trait ResourceEndpoint {
    fn available(&self) -> u64;
    /// Take up to `max`. Never returns more than `available()`.
    fn drain(&mut self, max: u64, simulation: Simulation) -> u64;
}

/// Endpoints are owned by the host's hatch entities; structures only hold handles.
pub type SharedEndpoint = Rc<RefCell<dyn ResourceEndpoint>>;

/// Host adapter resolving matched hatch positions to their endpoints.
pub trait HatchEndpoints {
    /// Append the energy inputs exposed by the hatch at `pos`, if any.
    fn energy_inputs_at(&self, pos: BlockPos, out: &mut Vec<SharedEndpoint>);
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BufferRecord")]
pub struct EnergyBuffer {
    stored: u64,
    capacity: u64,
}

// Persisted form; loading clamps `stored` to `capacity`.
#[derive(Deserialize)]
struct BufferRecord {
    stored: u64,
    capacity: u64,
}

impl From<BufferRecord> for EnergyBuffer {
    fn from(r: BufferRecord) -> Self {
        EnergyBuffer::with_stored(r.capacity, r.stored)
    }
}

impl EnergyBuffer {
    pub fn new(capacity: u64) -> Self {
        Self {
            stored: 0,
            capacity,
        }
    }

    pub fn with_stored(capacity: u64, stored: u64) -> Self {
        Self {
            stored: stored.min(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn stored(&self) -> u64 {
        self.stored
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Accept up to `amount`; returns what fit.
    pub fn insert(&mut self, amount: u64, simulation: Simulation) -> u64 {
        let accepted = amount.min(self.capacity.saturating_sub(self.stored));
        if simulation.is_acting() {
            self.stored += accepted;
        }
        accepted
    }

    pub fn shared(self) -> Rc<RefCell<EnergyBuffer>> {
        Rc::new(RefCell::new(self))
    }
}

impl ResourceEndpoint for EnergyBuffer {
    fn available(&self) -> u64 {
        self.stored
    }

    fn drain(&mut self, max: u64, simulation: Simulation) -> u64 {
        let taken = max.min(self.stored);
        if simulation.is_acting() {
            self.stored -= taken;
        }
        taken
    }
}

/// Drains a fixed, ordered list of endpoints as if they were one supply.
///
/// Endpoints are visited in registration order and each gives what it can
/// until the request is met, so identical states always split a drain the
/// same way.
#[derive(Clone, Default)]
pub struct EnergyRouter {
    endpoints: Vec<SharedEndpoint>,
}

impl EnergyRouter {
    pub fn new(endpoints: Vec<SharedEndpoint>) -> Self {
        Self { endpoints }
    }

    pub fn set_endpoints(&mut self, endpoints: Vec<SharedEndpoint>) {
        self.endpoints = endpoints;
    }

    pub fn clear(&mut self) {
        self.endpoints.clear();
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn available(&self) -> u64 {
        self.endpoints
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.borrow().available()))
    }

    /// Withdraw up to `requested`; returns the amount actually taken.
    pub fn drain(&mut self, requested: u64, simulation: Simulation) -> u64 {
        let mut total = 0u64;
        for endpoint in &self.endpoints {
            if total == requested {
                break;
            }
            let remaining = requested - total;
            let taken = endpoint.borrow_mut().drain(remaining, simulation);
            debug_assert!(taken <= remaining, "endpoint over-drained");
            total += taken.min(remaining);
        }
        if simulation.is_acting() {
            log::trace!(target: "energy", "drained {total}/{requested} from {} endpoint(s)", self.endpoints.len());
        }
        total
    }
}

impl fmt::Debug for EnergyRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyRouter")
            .field("endpoints", &self.endpoints.len())
            .field("available", &self.available())
            .finish()
    }
}
