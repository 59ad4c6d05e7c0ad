use foundry_geom::{BlockPos, Facing};
use proptest::prelude::*;

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

fn arb_pos() -> impl Strategy<Value = BlockPos> {
    (small_i32(), small_i32(), small_i32()).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

fn arb_horizontal() -> impl Strategy<Value = Facing> {
    prop::sample::select(Facing::HORIZONTAL.to_vec())
}

proptest! {
    // Four quarter turns bring every position back to itself
    #[test]
    fn four_turns_is_identity(p in arb_pos()) {
        prop_assert_eq!(p.rotate_y_cw(1).rotate_y_cw(1).rotate_y_cw(1).rotate_y_cw(1), p);
        prop_assert_eq!(p.rotate_y_cw(4), p);
    }

    // Rotation never touches the vertical axis
    #[test]
    fn rotation_preserves_y(p in arb_pos(), turns in 0u8..4) {
        prop_assert_eq!(p.rotate_y_cw(turns).y, p.y);
    }

    // Rotation is linear: rot(a + b) == rot(a) + rot(b)
    #[test]
    fn rotation_is_linear(a in arb_pos(), b in arb_pos(), turns in 0u8..4) {
        prop_assert_eq!((a + b).rotate_y_cw(turns), a.rotate_y_cw(turns) + b.rotate_y_cw(turns));
    }

    // Composing turns adds them modulo four
    #[test]
    fn turns_compose(p in arb_pos(), a in 0u8..4, b in 0u8..4) {
        prop_assert_eq!(p.rotate_y_cw(a).rotate_y_cw(b), p.rotate_y_cw(a + b));
    }

    // turns_to agrees with stepping rotate_cw
    #[test]
    fn turns_to_matches_rotate_cw(from in arb_horizontal(), to in arb_horizontal()) {
        let n = from.turns_to(to).unwrap();
        let mut f = from;
        for _ in 0..n {
            f = f.rotate_cw();
        }
        prop_assert_eq!(f, to);
    }
}
