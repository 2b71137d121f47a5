//! Per-labor configuration and live headcounts.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::{ConfigError, LaborBounds, LaborOverrides};
use crate::types::{LaborId, SkillId};

// === DEFAULTS ===

const UNSKILLED_MINIMUM: u32 = 20;
const UNSKILLED_MAXIMUM: u32 = 40;
const SKILLED_MINIMUM: u32 = 2;
const SKILLED_MAXIMUM: u32 = 7;

/// Labors that physically exclude each other on one worker.
const UNIFORMED: [LaborId; 3] = [LaborId::Mine, LaborId::CutWood, LaborId::Hunt];

// === LABOR INFO ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaborInfo {
    /// Skill exercised by this labor; `None` for unskilled labors.
    pub skill: Option<SkillId>,
    /// Member of the single-slot exclusive group (needs its own uniform/tool).
    pub uniformed: bool,
    pub minimum: u32,
    pub maximum: u32,
    /// Eligible workers currently holding this labor.
    pub active: u32,
}

impl LaborInfo {
    pub fn is_skilled(&self) -> bool {
        self.skill.is_some()
    }

    pub fn bounds(&self) -> LaborBounds {
        LaborBounds::new(self.minimum, self.maximum)
    }

    /// Whether one more worker can take this labor without exceeding the cap.
    pub fn has_room(&self) -> bool {
        self.active < self.maximum
    }
}

/// Read-only view of one labor for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct LaborSnapshot {
    pub labor: LaborId,
    pub skill: Option<SkillId>,
    pub uniformed: bool,
    pub minimum: u32,
    pub maximum: u32,
    pub active: u32,
}

// === REGISTRY ===

/// Configuration and counters for every known labor, indexed by `LaborId`.
#[derive(Debug, Clone)]
pub struct LaborRegistry {
    labors: [LaborInfo; LaborId::COUNT],
}

impl Default for LaborRegistry {
    fn default() -> Self {
        Self::initialize()
    }
}

impl LaborRegistry {
    /// Build the default table: wide bounds for unskilled labors, narrow ones
    /// for labors that exercise a skill, and the exclusive group flagged.
    pub fn initialize() -> Self {
        let mut labors = [LaborInfo {
            skill: None,
            uniformed: false,
            minimum: UNSKILLED_MINIMUM,
            maximum: UNSKILLED_MAXIMUM,
            active: 0,
        }; LaborId::COUNT];

        for skill in SkillId::ALL {
            if let Some(labor) = skill.labor() {
                let info = &mut labors[labor.index()];
                info.skill = Some(skill);
                info.minimum = SKILLED_MINIMUM;
                info.maximum = SKILLED_MAXIMUM;
            }
        }

        for labor in UNIFORMED {
            labors[labor.index()].uniformed = true;
        }

        Self { labors }
    }

    /// Defaults with `overrides` applied on top.
    pub fn with_overrides(overrides: &LaborOverrides) -> Result<Self, ConfigError> {
        let mut registry = Self::initialize();
        registry.apply_overrides(overrides)?;
        Ok(registry)
    }

    pub fn apply_overrides(&mut self, overrides: &LaborOverrides) -> Result<(), ConfigError> {
        for (&labor, &bounds) in overrides {
            self.set_bounds(labor, bounds)?;
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, labor: LaborId, bounds: LaborBounds) -> Result<(), ConfigError> {
        if bounds.minimum > bounds.maximum {
            return Err(ConfigError::InvertedBounds {
                labor,
                minimum: bounds.minimum,
                maximum: bounds.maximum,
            });
        }
        let info = &mut self.labors[labor.index()];
        info.minimum = bounds.minimum;
        info.maximum = bounds.maximum;
        Ok(())
    }

    /// Zero every live counter ahead of a recount.
    pub fn reset_counts(&mut self) {
        for info in &mut self.labors {
            info.active = 0;
        }
    }

    pub fn get(&self, labor: LaborId) -> &LaborInfo {
        &self.labors[labor.index()]
    }

    pub(crate) fn get_mut(&mut self, labor: LaborId) -> &mut LaborInfo {
        &mut self.labors[labor.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LaborId, &LaborInfo)> {
        LaborId::ALL.into_iter().zip(self.labors.iter())
    }

    pub fn snapshot(&self) -> Vec<LaborSnapshot> {
        self.iter()
            .map(|(labor, info)| LaborSnapshot {
                labor,
                skill: info.skill,
                uniformed: info.uniformed,
                minimum: info.minimum,
                maximum: info.maximum,
                active: info.active,
            })
            .collect()
    }
}
