//! In-memory host: a colony of units kept in a slotmap.

use std::collections::HashSet;

use slotmap::{SlotMap, new_key_type};

use crate::eligibility::UnitStatus;
use crate::host::Host;
use crate::skills::SkillRecord;
use crate::types::{LaborId, SkillId, UnitKey};

new_key_type! {
    pub struct UnitId;
}

impl UnitKey for UnitId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl UnitId {
    pub fn from_u64(id: u64) -> Self {
        UnitId::from(slotmap::KeyData::from_ffi(id))
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub status: UnitStatus,
    pub skills: Vec<SkillRecord>,
    pub labors: HashSet<LaborId>,
}

impl Unit {
    /// An eligible adult citizen with no skills and no labors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: UnitStatus::default(),
            skills: Vec::new(),
            labors: HashSet::new(),
        }
    }

    pub fn with_status(mut self, status: UnitStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_skill(self, skill: SkillId, rating: i32) -> Self {
        self.with_skill_record(SkillRecord::new(skill, rating))
    }

    pub fn with_skill_record(mut self, record: SkillRecord) -> Self {
        self.skills.retain(|s| s.skill != record.skill);
        self.skills.push(record);
        self
    }

    pub fn with_labor(mut self, labor: LaborId) -> Self {
        self.labors.insert(labor);
        self
    }
}

/// A colony the controller can run against directly.
#[derive(Debug, Clone)]
pub struct Colony {
    units: SlotMap<UnitId, Unit>,
    tick: u64,
    colony_mode: bool,
}

impl Default for Colony {
    fn default() -> Self {
        Self::new()
    }
}

impl Colony {
    pub fn new() -> Self {
        Self {
            units: SlotMap::with_key(),
            tick: 0,
            colony_mode: true,
        }
    }

    // === Unit Management ===

    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        self.units.insert(unit)
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(id)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Labors held by a unit, in enumeration order.
    pub fn labors_of(&self, id: UnitId) -> Vec<LaborId> {
        let Some(unit) = self.units.get(id) else {
            return Vec::new();
        };
        LaborId::ALL
            .into_iter()
            .filter(|labor| unit.labors.contains(labor))
            .collect()
    }

    /// Units holding `labor`, eligible or not, in insertion order.
    pub fn holders(&self, labor: LaborId) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.labors.contains(&labor))
            .map(|(id, _)| id)
            .collect()
    }

    // === Time ===

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self, ticks: u64) {
        self.tick += ticks;
    }

    pub fn set_colony_mode(&mut self, colony_mode: bool) {
        self.colony_mode = colony_mode;
    }
}

impl Host for Colony {
    type Unit = UnitId;

    fn units(&self) -> Vec<UnitId> {
        self.units.keys().collect()
    }

    fn status(&self, unit: UnitId) -> UnitStatus {
        self.units
            .get(unit)
            .map(|u| u.status)
            .unwrap_or(UnitStatus {
                has_soul: false,
                ..Default::default()
            })
    }

    fn skills(&self, unit: UnitId) -> Vec<SkillRecord> {
        self.units
            .get(unit)
            .map(|u| u.skills.clone())
            .unwrap_or_default()
    }

    fn has_labor(&self, unit: UnitId, labor: LaborId) -> bool {
        self.units
            .get(unit)
            .is_some_and(|u| u.labors.contains(&labor))
    }

    fn set_labor(&mut self, unit: UnitId, labor: LaborId, enabled: bool) {
        if let Some(u) = self.units.get_mut(unit) {
            if enabled {
                u.labors.insert(labor);
            } else {
                u.labors.remove(&labor);
            }
        }
    }

    fn current_tick(&self) -> u64 {
        self.tick
    }

    fn is_colony_mode(&self) -> bool {
        self.colony_mode
    }
}
