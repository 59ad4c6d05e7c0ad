use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use foundry_blocks::{BlockId, Content, HatchFlags, ItemStack};
use foundry_geom::{BlockPos, Facing};
use foundry_machines::{
    BlastFurnace, CraftStep, EnergyBuffer, FormError, FurnaceState, HatchEndpoints, Recipe,
    SharedEndpoint, TagRecord, TierTable, UseOutcome, blast_furnace_template,
};
use foundry_structures::{MatchFailure, WorldView};

const CONTENT: &str = r#"
[[blocks]]
name = "casing"

[[blocks]]
name = "cupronickel_coil"
coil = { base_rate = 32, max_rate = 16 }

[[blocks]]
name = "kanthal_coil"
coil = { base_rate = 128, max_rate = 64 }

[[blocks]]
name = "energy_input_hatch"
hatch = "energy_input"
capacity = 1000

[[blocks]]
name = "item_output_hatch"
hatch = "item_output"

[upgrades]
basic_upgrade = 16
"#;

struct TestWorld {
    content: Content,
    blocks: HashMap<BlockPos, BlockId>,
    energy: HashMap<BlockPos, Rc<RefCell<EnergyBuffer>>>,
}

impl TestWorld {
    fn new() -> Self {
        Self {
            content: Content::from_toml_str(CONTENT).unwrap(),
            blocks: HashMap::new(),
            energy: HashMap::new(),
        }
    }

    fn id(&self, name: &str) -> BlockId {
        self.content.blocks.id_by_name(name).unwrap()
    }

    fn set(&mut self, pos: BlockPos, name: &str) {
        let id = self.id(name);
        self.blocks.insert(pos, id);
        if name == "energy_input_hatch" {
            self.energy
                .insert(pos, EnergyBuffer::with_stored(1_000, 1_000).shared());
        }
    }

    fn remove(&mut self, pos: BlockPos) {
        self.blocks.remove(&pos);
        self.energy.remove(&pos);
    }

    /// Builds the furnace for a north-facing controller at the origin.
    fn build_furnace(&mut self, coil: &str) {
        for y in 0..=3 {
            for z in 0..=2 {
                for x in -1..=1 {
                    let p = BlockPos::new(x, y, z);
                    if p == BlockPos::ORIGIN {
                        continue;
                    }
                    match y {
                        0 | 3 => self.set(p, "casing"),
                        _ if x == 0 && z == 1 => {}
                        _ => self.set(p, coil),
                    }
                }
            }
        }
        self.set(BlockPos::new(-1, 0, 0), "energy_input_hatch");
        self.set(BlockPos::new(1, 3, 2), "energy_input_hatch");
        self.set(BlockPos::new(1, 0, 0), "item_output_hatch");
    }
}

impl WorldView for TestWorld {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        self.blocks.get(&pos).copied()
    }

    fn hatch_at(&self, pos: BlockPos) -> Option<HatchFlags> {
        let id = self.block_at(pos)?;
        self.content.blocks.get(id)?.hatch_flags()
    }
}

impl HatchEndpoints for TestWorld {
    fn energy_inputs_at(&self, pos: BlockPos, out: &mut Vec<SharedEndpoint>) {
        if let Some(b) = self.energy.get(&pos) {
            out.push(b.clone());
        }
    }
}

fn furnace(world: &TestWorld) -> BlastFurnace {
    let reg = &world.content.blocks;
    let tiers = TierTable::from_registry(reg);
    let template = blast_furnace_template(world.id("casing"), tiers.coil_ids()).unwrap();
    BlastFurnace::new(
        Arc::new(template),
        Arc::new(tiers),
        Arc::new(world.content.upgrades.clone()),
        BlockPos::ORIGIN,
        Facing::North,
    )
}

#[test]
fn template_has_expected_cells() {
    let t = blast_furnace_template(0, [1, 2]).unwrap();
    // 8 + 8 + 8 + 9 cells, controller excluded, ring centres hollow
    assert_eq!(t.len(), 33);
    assert_eq!(t.hatch_slot_count(), 17);
}

#[test]
fn forms_and_crafts() {
    let mut world = TestWorld::new();
    world.build_furnace("cupronickel_coil");
    let mut f = furnace(&world);
    assert!(matches!(f.state(), FurnaceState::Unformed(FormError::Pending)));

    f.enqueue(Recipe::new("steel", 15, 2));
    assert!(matches!(f.tick(&world), Some(CraftStep::Progress { done: 1, .. })));
    let tier = *f.tier().unwrap();
    assert_eq!(tier.coil, world.id("cupronickel_coil"));
    assert_eq!((tier.base_rate, tier.max_rate), (32, 16));
    assert_eq!(f.tick(&world), Some(CraftStep::Finished { recipe: "steel".into() }));

    // First energy hatch in template order pays
    let first = &world.energy[&BlockPos::new(-1, 0, 0)];
    let second = &world.energy[&BlockPos::new(1, 3, 2)];
    assert_eq!(first.borrow().stored(), 1_000 - 30);
    assert_eq!(second.borrow().stored(), 1_000);
    if let FurnaceState::Formed(formed) = f.state() {
        assert_eq!(formed.hatches.len(), 3);
        assert_eq!(formed.energy().len(), 2);
    }
}

#[test]
fn breaking_a_block_unforms_next_tick() {
    let mut world = TestWorld::new();
    world.build_furnace("kanthal_coil");
    let mut f = furnace(&world);
    f.enqueue(Recipe::new("steel", 60, 10));
    f.tick(&world);
    assert!(f.is_formed());

    let corner = BlockPos::new(1, 3, 0);
    world.remove(corner);
    assert!(f.on_block_changed(corner));
    assert!(!f.on_block_changed(BlockPos::new(5, 0, 0)));
    assert_eq!(f.tick(&world), None);
    match f.state() {
        FurnaceState::Unformed(FormError::Mismatch(MatchFailure::Mismatch { pos, .. })) => {
            assert_eq!(*pos, corner)
        }
        other => panic!("unexpected state {other}"),
    }
    // Recipe is kept but frozen
    assert_eq!(f.crafter().active().map(|(_, p)| p), Some(1));

    world.set(corner, "casing");
    f.on_block_changed(corner);
    assert!(matches!(f.tick(&world), Some(CraftStep::Progress { done: 2, .. })));
}

#[test]
fn mixed_coils_run_at_the_weakest() {
    let mut world = TestWorld::new();
    world.build_furnace("kanthal_coil");
    world.set(BlockPos::new(-1, 2, 2), "cupronickel_coil");
    let mut f = furnace(&world);
    f.enqueue(Recipe::new("kanthal_ingot", 120, 4));
    assert!(matches!(f.tick(&world), Some(CraftStep::Rejected { .. })));
    assert_eq!(f.tier().map(|t| t.max_rate), Some(16));
}

#[test]
fn upgrades_raise_max_and_drop() {
    let mut world = TestWorld::new();
    world.build_furnace("cupronickel_coil");
    let mut f = furnace(&world);
    f.tick(&world);

    let mut held = ItemStack::new("basic_upgrade", 4);
    assert_eq!(f.on_use(&mut held), UseOutcome::Accepted);
    assert_eq!(f.tier().map(|t| (t.base_rate, t.max_rate)), Some((32, 16 + 64)));

    let mut tags = TagRecord::new();
    f.save(&mut tags);
    assert_eq!(tags.get_ints("coils"), vec![world.id("cupronickel_coil") as i64]);

    let mut restored = furnace(&world);
    restored.load(&tags);
    restored.tick(&world);
    assert_eq!(restored.tier().map(|t| t.max_rate), Some(80));

    assert_eq!(f.drops(), vec![ItemStack::new("basic_upgrade", 4)]);
    assert!(f.drops().is_empty());
}

#[test]
fn upgrades_unlock_a_rejected_recipe() {
    let mut world = TestWorld::new();
    world.build_furnace("kanthal_coil");
    let mut f = furnace(&world);

    f.enqueue(Recipe::new("stainless_steel", 128, 2));
    assert!(matches!(f.tick(&world), Some(CraftStep::Rejected { .. })));

    let mut held = ItemStack::new("basic_upgrade", 4);
    assert_eq!(f.on_use(&mut held), UseOutcome::Accepted);
    assert_eq!(f.tier().map(|t| t.max_rate), Some(128));

    f.enqueue(Recipe::new("stainless_steel", 128, 2));
    assert!(matches!(f.tick(&world), Some(CraftStep::Progress { done: 1, .. })));
}

#[test]
fn declined_use_passes_untouched() {
    let mut world = TestWorld::new();
    world.build_furnace("cupronickel_coil");
    let mut f = furnace(&world);
    f.tick(&world);

    let mut bucket = ItemStack::new("lubricant_bucket", 1);
    assert_eq!(f.on_use(&mut bucket), UseOutcome::Pass);
    assert_eq!(bucket, ItemStack::new("lubricant_bucket", 1));
    assert!(f.upgrade().stack().is_none());
    assert_eq!(f.tier().map(|t| t.max_rate), Some(16));
}

#[test]
fn every_facing_forms_when_rotated() {
    for facing in Facing::HORIZONTAL {
        let mut world = TestWorld::new();
        let turns = Facing::North.turns_to(facing).unwrap();
        let mut north = TestWorld::new();
        north.build_furnace("cupronickel_coil");
        for (p, id) in &north.blocks {
            let name = north.content.blocks.name_of(*id).to_string();
            world.set(p.rotate_y_cw(turns), &name);
        }
        let mut f = furnace(&world);
        f.set_facing(facing);
        f.tick(&world);
        assert!(f.is_formed(), "{facing}: {}", f.state());
    }
}

#[test]
fn no_coil_means_no_tier() {
    let mut world = TestWorld::new();
    world.build_furnace("casing");
    let reg = &world.content.blocks;
    let casing = world.id("casing");
    // A template whose ring also accepts casing
    let template = blast_furnace_template(casing, [casing]).unwrap();
    let mut f = BlastFurnace::new(
        Arc::new(template),
        Arc::new(TierTable::from_registry(reg)),
        Arc::new(world.content.upgrades.clone()),
        BlockPos::ORIGIN,
        Facing::North,
    );
    assert_eq!(f.tick(&world), None);
    assert!(matches!(f.state(), FurnaceState::Unformed(FormError::MissingTier)));
}
