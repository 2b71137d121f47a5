use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

pub mod colony;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod host;
pub mod plugin;
pub mod profile;
pub mod registry;
pub mod skills;
pub mod types;

#[cfg(feature = "instrument")]
pub use instrument;

pub use colony::{Colony, Unit, UnitId};
pub use config::{ConfigError, LaborBounds, LaborOverrides, LazyLaborConfig};
pub use eligibility::{Restriction, UnitStatus, can_work};
pub use engine::{ChangeReason, PassReport, RebalanceEngine, reservoir_pick};
pub use host::Host;
pub use plugin::{LazyLabor, SkipReason, TickOutcome};
pub use profile::{WorkerProfile, sort_by_suitability};
pub use registry::{LaborInfo, LaborRegistry, LaborSnapshot};
pub use skills::{SkillRecord, SortOrder, compare_skills, more_skilled};
pub use types::{LaborId, SkillId, UnitKey};

// ============================================================================
// WASM API - Fortress
// ============================================================================

/// A unit as described by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct UnitSpec {
    pub name: String,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
    #[serde(default)]
    pub labors: Vec<LaborId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct FortressSnapshot {
    pub tick: u64,
    pub enabled: bool,
    pub last_run: u64,
    pub labors: Vec<LaborSnapshot>,
}

/// A colony driven by the labor controller, for running in the browser.
#[wasm_bindgen]
pub struct Fortress {
    colony: Colony,
    autolabor: LazyLabor<StdRng>,
}

#[wasm_bindgen]
impl Fortress {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        Self {
            colony: Colony::new(),
            autolabor: LazyLabor::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a fortress whose controller is configured from JSON
    /// (see `LazyLaborConfig::from_json`).
    #[wasm_bindgen]
    pub fn with_config(seed: u64, config_json: &str) -> Result<Fortress, JsError> {
        console_error_panic_hook::set_once();

        let config = LazyLaborConfig::from_json(config_json)?;
        let autolabor = LazyLabor::initialize(&config, StdRng::seed_from_u64(seed))?;
        Ok(Self {
            colony: Colony::new(),
            autolabor,
        })
    }

    /// Add a unit, returning its id.
    #[wasm_bindgen]
    pub fn add_unit(&mut self, spec: UnitSpec) -> u64 {
        let mut unit = Unit::new(spec.name).with_status(spec.status);
        for record in spec.skills {
            unit = unit.with_skill_record(record);
        }
        unit.labors.extend(spec.labors);
        self.colony.add_unit(unit).to_u64()
    }

    #[wasm_bindgen]
    pub fn remove_unit(&mut self, id: u64) -> bool {
        self.colony.remove_unit(UnitId::from_u64(id)).is_some()
    }

    /// Advance one tick. Returns whether a rebalance pass ran.
    #[wasm_bindgen]
    pub fn advance_tick(&mut self) -> bool {
        self.colony.advance(1);
        self.autolabor.on_scheduled_tick(&mut self.colony).ran()
    }

    #[wasm_bindgen]
    pub fn get_tick(&self) -> u64 {
        self.colony.tick()
    }

    #[wasm_bindgen]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.autolabor.set_enabled(enabled);
    }

    #[wasm_bindgen]
    pub fn set_colony_mode(&mut self, colony_mode: bool) {
        self.colony.set_colony_mode(colony_mode);
    }

    #[wasm_bindgen]
    pub fn get_snapshot(&self) -> FortressSnapshot {
        FortressSnapshot {
            tick: self.colony.tick(),
            enabled: self.autolabor.is_enabled(),
            last_run: self.autolabor.last_run(),
            labors: self.autolabor.registry().snapshot(),
        }
    }

    /// Labors held by a unit, as an array of labor names.
    #[wasm_bindgen]
    pub fn get_unit_labors(&self, id: u64) -> Result<JsValue, JsError> {
        let labors = self.colony.labors_of(UnitId::from_u64(id));
        Ok(serde_wasm_bindgen::to_value(&labors)?)
    }
}

impl Fortress {
    pub fn colony(&self) -> &Colony {
        &self.colony
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dwarf(name: &str, skills: &[(SkillId, i32)]) -> UnitSpec {
        UnitSpec {
            name: name.to_string(),
            status: UnitStatus::default(),
            skills: skills
                .iter()
                .map(|&(skill, rating)| SkillRecord::new(skill, rating))
                .collect(),
            labors: Vec::new(),
        }
    }

    #[test]
    fn fortress_runs_once_a_day() {
        let mut fortress = Fortress::new(11);
        for i in 0..12 {
            fortress.add_unit(dwarf(&format!("dwarf{i}"), &[(SkillId::Mining, i)]));
        }

        let runs = (0..2400).filter(|_| fortress.advance_tick()).count();

        assert_eq!(runs, 2);
        let snapshot = fortress.get_snapshot();
        assert_eq!(snapshot.tick, 2400);
        assert_eq!(snapshot.last_run, 2400);
    }

    #[test]
    fn fortress_satisfies_bounds_after_a_pass() {
        let mut fortress = Fortress::new(3);
        for i in 0..25 {
            fortress.add_unit(dwarf(&format!("dwarf{i}"), &[(SkillId::Cooking, i % 7)]));
        }
        for _ in 0..1200 {
            fortress.advance_tick();
        }

        for labor in fortress.get_snapshot().labors {
            assert!(labor.active <= labor.maximum, "{:?} over cap", labor.labor);
            assert!(labor.active >= labor.minimum, "{:?} under minimum", labor.labor);
        }
        let colony = fortress.colony();
        for id in colony.unit_ids() {
            assert!(!colony.labors_of(id).is_empty());
        }
    }

    #[test]
    fn with_config_applies_overrides() {
        let fortress = Fortress::with_config(
            1,
            r#"{"interval_ticks": 10, "overrides": {"cook": {"minimum": 1, "maximum": 3}}}"#,
        )
        .unwrap_or_else(|_| panic!("valid config"));
        let cook = fortress
            .get_snapshot()
            .labors
            .into_iter()
            .find(|l| l.labor == LaborId::Cook)
            .unwrap();
        assert_eq!((cook.minimum, cook.maximum), (1, 3));
    }

    #[test]
    fn removed_units_are_forgotten() {
        let mut fortress = Fortress::new(1);
        let id = fortress.add_unit(dwarf("Urist", &[]));
        assert!(fortress.remove_unit(id));
        assert!(!fortress.remove_unit(id));
    }
}
