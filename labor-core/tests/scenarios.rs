//! End-to-end rebalance scenarios against the in-memory colony.

use labor_core::{
    Colony, Host, LaborBounds, LaborId, LaborRegistry, RebalanceEngine, SkillId, Unit, UnitId,
    UnitStatus,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// === TEST FIXTURES ===

fn engine(seed: u64) -> RebalanceEngine<StdRng> {
    RebalanceEngine::new(StdRng::seed_from_u64(seed))
}

/// Every labor at 0..=40, so nothing is in deficit unless a test says so.
fn quiet_registry() -> LaborRegistry {
    let mut registry = LaborRegistry::initialize();
    for labor in LaborId::ALL {
        registry.set_bounds(labor, LaborBounds::new(0, 40)).unwrap();
    }
    registry
}

/// Holds one skilled and one unskilled labor, so the safety net skips them.
fn covered(name: String) -> Unit {
    Unit::new(name)
        .with_labor(LaborId::Carpenter)
        .with_labor(LaborId::Cleaning)
}

fn is_skilled(registry: &LaborRegistry, labor: LaborId) -> bool {
    registry.get(labor).is_skilled()
}

// === SCENARIOS ===

#[test]
fn deficit_assigns_minimum_to_best_workers() {
    let mut colony = Colony::new();
    let ratings = [3, 0, 7, 1, 12, 5, 2, 9, 4, 6];
    let ids: Vec<UnitId> = ratings
        .iter()
        .enumerate()
        .map(|(i, &rating)| {
            colony.add_unit(covered(format!("dwarf{i}")).with_skill(SkillId::Weaving, rating))
        })
        .collect();

    let mut registry = quiet_registry();
    registry.set_bounds(LaborId::Weaver, LaborBounds::new(2, 4)).unwrap();

    let report = engine(1).run_pass(&mut registry, &mut colony);

    assert_eq!(report.eligible, 10);
    assert_eq!(report.enabled, 2);
    // Ratings 12 and 9.
    assert_eq!(colony.holders(LaborId::Weaver), vec![ids[4], ids[7]]);
    assert_eq!(registry.get(LaborId::Weaver).active, 2);
}

#[test]
fn deficit_tie_breaks_on_fewer_skilled_duties() {
    let mut colony = Colony::new();
    let busy = colony.add_unit(
        covered("busy".into())
            .with_skill(SkillId::Brewing, 4)
            .with_labor(LaborId::Mason)
            .with_labor(LaborId::Cook),
    );
    let free = colony.add_unit(covered("free".into()).with_skill(SkillId::Brewing, 4));

    let mut registry = quiet_registry();
    registry.set_bounds(LaborId::Brewer, LaborBounds::new(1, 4)).unwrap();

    engine(1).run_pass(&mut registry, &mut colony);

    assert_eq!(colony.holders(LaborId::Brewer), vec![free]);
    assert!(!colony.has_labor(busy, LaborId::Brewer));
}

#[test]
fn surplus_drops_lowest_ranked_holders() {
    let mut colony = Colony::new();
    let ratings = [6, 2, 9, 1, 4];
    let ids: Vec<UnitId> = ratings
        .iter()
        .enumerate()
        .map(|(i, &rating)| {
            colony.add_unit(
                covered(format!("fisher{i}"))
                    .with_skill(SkillId::Fishing, rating)
                    .with_labor(LaborId::Fish),
            )
        })
        .collect();

    let mut registry = quiet_registry();
    registry.set_bounds(LaborId::Fish, LaborBounds::new(0, 3)).unwrap();

    let report = engine(1).run_pass(&mut registry, &mut colony);

    assert_eq!(report.disabled, 2);
    // Ratings 2 and 1 lose the labor; 9, 6 and 4 keep it.
    assert_eq!(colony.holders(LaborId::Fish), vec![ids[0], ids[2], ids[4]]);
    assert!(!colony.has_labor(ids[1], LaborId::Fish));
    assert!(!colony.has_labor(ids[3], LaborId::Fish));
}

#[test]
fn idle_worker_gets_one_skilled_and_all_open_unskilled_labors() {
    let mut colony = Colony::new();
    for i in 0..3 {
        colony.add_unit(covered(format!("worker{i}")));
    }
    let idle = colony.add_unit(Unit::new("idle").with_skill(SkillId::Cooking, 3));
    let mut registry = quiet_registry();

    let report = engine(21).run_pass(&mut registry, &mut colony);

    let labors = colony.labors_of(idle);
    let skilled: Vec<_> = labors.iter().filter(|l| is_skilled(&registry, **l)).collect();
    let unskilled = labors.len() - skilled.len();
    let open_unskilled = LaborId::ALL
        .iter()
        .filter(|l| !is_skilled(&registry, **l))
        .count();

    assert_eq!(skilled.len(), 1);
    assert_eq!(unskilled, open_unskilled);
    assert_eq!(report.fallback as usize, labors.len());
}

#[test]
fn idle_worker_skips_capped_unskilled_labors() {
    let mut colony = Colony::new();
    let idle = colony.add_unit(Unit::new("idle"));
    let mut registry = quiet_registry();
    registry.set_bounds(LaborId::HaulStone, LaborBounds::new(0, 0)).unwrap();

    engine(4).run_pass(&mut registry, &mut colony);

    let labors = colony.labors_of(idle);
    assert!(!labors.contains(&LaborId::HaulStone));
    assert!(labors.contains(&LaborId::HaulWood));
}

#[test]
fn ineligible_workers_are_neither_counted_nor_changed() {
    let mut colony = Colony::new();
    for i in 0..6 {
        colony.add_unit(Unit::new(format!("adult{i}")).with_skill(SkillId::Mining, i));
    }
    let child = colony.add_unit(
        Unit::new("child")
            .with_status(UnitStatus {
                adult: false,
                ..Default::default()
            })
            .with_skill(SkillId::Mining, 20)
            .with_labor(LaborId::Mine)
            .with_labor(LaborId::Fish),
    );
    let soldier = colony.add_unit(
        Unit::new("soldier")
            .with_status(UnitStatus {
                military_duty: true,
                ..Default::default()
            })
            .with_labor(LaborId::Hunt),
    );

    let mut registry = LaborRegistry::initialize();
    let report = engine(8).run_pass(&mut registry, &mut colony);

    assert_eq!(report.eligible, 6);
    assert_eq!(colony.labors_of(child), vec![LaborId::Mine, LaborId::Fish]);
    assert_eq!(colony.labors_of(soldier), vec![LaborId::Hunt]);

    // The child's mining flag doesn't count toward the headcount.
    let adult_miners = colony
        .holders(LaborId::Mine)
        .into_iter()
        .filter(|id| *id != child)
        .count() as u32;
    assert_eq!(registry.get(LaborId::Mine).active, adult_miners);
    assert_eq!(adult_miners, 2);
}

#[test]
fn military_duty_is_never_written() {
    let mut colony = Colony::new();
    let soldier = colony.add_unit(Unit::new("soldier").with_status(UnitStatus {
        military_duty: true,
        ..Default::default()
    }));
    for i in 0..4 {
        colony.add_unit(Unit::new(format!("dwarf{i}")));
    }

    let mut registry = LaborRegistry::initialize();
    engine(2).run_pass(&mut registry, &mut colony);

    assert!(colony.status(soldier).military_duty);
    assert!(colony.labors_of(soldier).is_empty());
}

#[test]
fn uniformed_labors_can_be_filled_like_any_other() {
    let mut colony = Colony::new();
    let ids: Vec<UnitId> = (0..4)
        .map(|i| colony.add_unit(covered(format!("dwarf{i}")).with_skill(SkillId::Woodcutting, i)))
        .collect();
    let mut registry = quiet_registry();
    registry.set_bounds(LaborId::CutWood, LaborBounds::new(1, 2)).unwrap();

    engine(1).run_pass(&mut registry, &mut colony);

    assert_eq!(colony.holders(LaborId::CutWood), vec![ids[3]]);
    assert!(registry.get(LaborId::CutWood).uniformed);
}
