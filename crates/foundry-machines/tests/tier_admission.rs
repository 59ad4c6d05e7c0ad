use std::collections::BTreeSet;

use foundry_blocks::{BlockId, CoilSpec};
use foundry_machines::{AdmissionRejected, TierState, TierTable, check_admission, is_admissible};
use proptest::prelude::*;

const CUPRONICKEL: BlockId = 10;
const KANTHAL: BlockId = 11;
const CASING: BlockId = 3;

fn table() -> TierTable {
    TierTable::new()
        .with(CUPRONICKEL, CoilSpec { base_rate: 32, max_rate: 16 })
        .with(KANTHAL, CoilSpec { base_rate: 128, max_rate: 64 })
}

fn set(ids: &[BlockId]) -> BTreeSet<BlockId> {
    ids.iter().copied().collect()
}

#[test]
fn single_coil_sets_the_envelope() {
    let t = table().resolve(&set(&[KANTHAL]), 0).unwrap();
    assert_eq!(
        t,
        TierState { coil: KANTHAL, base_rate: 128, max_rate: 64 }
    );
}

#[test]
fn mixed_coils_take_the_weakest() {
    let t = table().resolve(&set(&[KANTHAL, CUPRONICKEL]), 0).unwrap();
    assert_eq!(t.coil, CUPRONICKEL);
    assert_eq!(t.max_rate, 16);
}

#[test]
fn upgrades_add_to_max_only() {
    let t = table().resolve(&set(&[CUPRONICKEL]), 100).unwrap();
    assert_eq!(t.base_rate, 32);
    assert_eq!(t.max_rate, 116);
}

#[test]
fn no_known_coil_is_no_tier() {
    assert_eq!(table().resolve(&set(&[CASING]), 0), None);
    assert_eq!(table().resolve(&BTreeSet::new(), 500), None);
}

#[test]
fn admission_checks_both_ceilings() {
    let t = TierState { coil: KANTHAL, base_rate: 128, max_rate: 64 };
    assert_eq!(check_admission(64, &t), Ok(()));
    assert_eq!(
        check_admission(100, &t),
        Err(AdmissionRejected::AboveMaxRate { required: 100, max_rate: 64 })
    );
    // Upgrades cannot stand in for the coil
    let boosted = TierState { max_rate: 1_000, ..t };
    assert_eq!(check_admission(100, &boosted), Ok(()));
    assert_eq!(
        check_admission(200, &boosted),
        Err(AdmissionRejected::AboveCoilBase { required: 200, base_rate: 128 })
    );
}

#[test]
fn upgrade_bonus_admits_a_rejected_recipe() {
    let discovered = set(&[KANTHAL]);
    let bare = table().resolve(&discovered, 0).unwrap();
    assert_eq!(
        check_admission(128, &bare),
        Err(AdmissionRejected::AboveMaxRate { required: 128, max_rate: 64 })
    );
    let upgraded = table().resolve(&discovered, 64).unwrap();
    assert_eq!(check_admission(128, &upgraded), Ok(()));
    // Past the coil cap no bonus helps
    let maxed = table().resolve(&discovered, 10_000).unwrap();
    assert!(!is_admissible(129, &maxed));
}

proptest! {
    #[test]
    fn more_upgrades_never_lower_max(a in 0u64..10_000, b in 0u64..10_000) {
        let (lo, hi) = (a.min(b), a.max(b));
        let discovered = set(&[CUPRONICKEL]);
        let t_lo = table().resolve(&discovered, lo).unwrap();
        let t_hi = table().resolve(&discovered, hi).unwrap();
        prop_assert!(t_hi.max_rate >= t_lo.max_rate);
        prop_assert_eq!(t_hi.base_rate, t_lo.base_rate);
    }

    #[test]
    fn weaker_coil_strictly_lowers_max(bonus in 0u64..10_000) {
        let strong = table().resolve(&set(&[KANTHAL]), bonus).unwrap();
        let weak = table().resolve(&set(&[CUPRONICKEL]), bonus).unwrap();
        prop_assert!(weak.max_rate < strong.max_rate);
    }

    #[test]
    fn admission_is_pure(required in 0u64..1_000, base in 0u64..500, max in 0u64..500) {
        let t = TierState { coil: 0, base_rate: base, max_rate: max };
        let copy = t;
        prop_assert_eq!(is_admissible(required, &t), is_admissible(required, &copy));
        prop_assert_eq!(is_admissible(required, &t), required <= base.min(max));
    }

    #[test]
    fn upgrades_only_ever_widen_admission(required in 0u64..300, bonus in 0u64..300) {
        let discovered = set(&[CUPRONICKEL]);
        let bare = table().resolve(&discovered, 0).unwrap();
        let boosted = table().resolve(&discovered, bonus).unwrap();
        if is_admissible(required, &bare) {
            prop_assert!(is_admissible(required, &boosted));
        }
    }
}
