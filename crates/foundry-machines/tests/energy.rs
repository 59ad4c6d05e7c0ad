use std::cell::RefCell;
use std::rc::Rc;

use foundry_machines::{EnergyBuffer, EnergyRouter, ResourceEndpoint, SharedEndpoint, Simulation};
use proptest::prelude::*;

fn router(stocks: &[u64]) -> (EnergyRouter, Vec<Rc<RefCell<EnergyBuffer>>>) {
    let buffers: Vec<_> = stocks
        .iter()
        .map(|s| EnergyBuffer::with_stored(*s, *s).shared())
        .collect();
    let endpoints: Vec<SharedEndpoint> = buffers
        .iter()
        .map(|b| b.clone() as SharedEndpoint)
        .collect();
    (EnergyRouter::new(endpoints), buffers)
}

#[test]
fn drains_in_declaration_order() {
    let (mut r, bufs) = router(&[10, 5]);
    assert_eq!(r.drain(12, Simulation::Act), 12);
    assert_eq!(bufs[0].borrow().stored(), 0);
    assert_eq!(bufs[1].borrow().stored(), 3);
}

#[test]
fn short_supply_returns_what_was_there() {
    let (mut r, bufs) = router(&[10, 5]);
    assert_eq!(r.drain(40, Simulation::Act), 15);
    assert!(bufs.iter().all(|b| b.borrow().stored() == 0));
    assert_eq!(r.drain(1, Simulation::Act), 0);
}

#[test]
fn simulate_leaves_stock_untouched() {
    let (mut r, bufs) = router(&[7, 7]);
    assert_eq!(r.drain(9, Simulation::Simulate), 9);
    assert_eq!(r.available(), 14);
    assert_eq!(bufs[1].borrow().stored(), 7);
}

#[test]
fn zero_request_is_a_no_op() {
    let (mut r, _) = router(&[3]);
    assert_eq!(r.drain(0, Simulation::Act), 0);
    assert_eq!(r.available(), 3);
}

/// Counts how often the router asks it for energy.
struct Counting {
    stock: u64,
    calls: u32,
}

impl ResourceEndpoint for Counting {
    fn available(&self) -> u64 {
        self.stock
    }

    fn drain(&mut self, max: u64, simulation: Simulation) -> u64 {
        self.calls += 1;
        let t = max.min(self.stock);
        if simulation.is_acting() {
            self.stock -= t;
        }
        t
    }
}

#[test]
fn each_endpoint_asked_at_most_once() {
    let a = Rc::new(RefCell::new(Counting { stock: 4, calls: 0 }));
    let b = Rc::new(RefCell::new(Counting { stock: 4, calls: 0 }));
    let c = Rc::new(RefCell::new(Counting { stock: 4, calls: 0 }));
    let mut r = EnergyRouter::new(vec![
        a.clone() as SharedEndpoint,
        b.clone() as SharedEndpoint,
        c.clone() as SharedEndpoint,
    ]);
    assert_eq!(r.drain(6, Simulation::Act), 6);
    assert_eq!(a.borrow().calls, 1);
    assert_eq!(b.borrow().calls, 1);
    // Request met before reaching the third endpoint
    assert_eq!(c.borrow().calls, 0);
}

proptest! {
    #[test]
    fn drained_is_min_of_request_and_supply(
        stocks in prop::collection::vec(0u64..1_000, 0..6),
        requested in 0u64..5_000,
    ) {
        let (mut r, bufs) = router(&stocks);
        let before: u64 = stocks.iter().sum();
        let got = r.drain(requested, Simulation::Act);
        prop_assert_eq!(got, requested.min(before));
        let after: u64 = bufs.iter().map(|b| b.borrow().stored()).sum();
        prop_assert_eq!(before - after, got);
    }

    #[test]
    fn identical_states_split_identically(
        stocks in prop::collection::vec(0u64..500, 1..5),
        requested in 0u64..2_000,
    ) {
        let (mut r1, b1) = router(&stocks);
        let (mut r2, b2) = router(&stocks);
        prop_assert_eq!(r1.drain(requested, Simulation::Act), r2.drain(requested, Simulation::Act));
        let s1: Vec<u64> = b1.iter().map(|b| b.borrow().stored()).collect();
        let s2: Vec<u64> = b2.iter().map(|b| b.borrow().stored()).collect();
        prop_assert_eq!(s1, s2);
    }

    #[test]
    fn simulate_matches_act(
        stocks in prop::collection::vec(0u64..500, 0..5),
        requested in 0u64..2_000,
    ) {
        let (mut r, _) = router(&stocks);
        let sim = r.drain(requested, Simulation::Simulate);
        prop_assert_eq!(sim, r.drain(requested, Simulation::Act));
    }
}
