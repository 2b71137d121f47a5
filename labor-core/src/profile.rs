//! Per-pass worker snapshots and the two suitability orderings.

use std::cmp::Ordering;

use crate::registry::LaborInfo;
use crate::skills::{SkillRecord, SortOrder, compare_skills, more_skilled};
use crate::types::{LaborId, SkillId};

/// One eligible worker as seen by a single pass.
#[derive(Debug, Clone)]
pub struct WorkerProfile<U> {
    pub unit: U,
    /// Skill records snapshotted at recount.
    pub skills: Vec<SkillRecord>,
    /// Enabled labors that exercise a skill.
    pub skilled: u32,
    /// Enabled labors that need no skill.
    pub unskilled: u32,
    /// Sum of ratings over every known skill.
    pub total_skill: i32,
    /// The exclusive-group labor this worker holds, if any.
    pub uniform: Option<LaborId>,
    /// Record for the skill of the labor being sorted for.
    pub this_skill: Option<SkillRecord>,
    /// Best record among the worker's other skills.
    pub other_skill: Option<SkillRecord>,
}

impl<U> WorkerProfile<U> {
    pub fn new(unit: U, skills: Vec<SkillRecord>) -> Self {
        Self {
            unit,
            skills,
            skilled: 0,
            unskilled: 0,
            total_skill: 0,
            uniform: None,
            this_skill: None,
            other_skill: None,
        }
    }

    /// Count a held labor toward this worker's tallies.
    pub fn record_held(&mut self, labor: LaborId, info: &LaborInfo) {
        self.record_enabled(info);
        if info.uniformed {
            self.uniform = Some(labor);
        }
    }

    pub fn record_enabled(&mut self, info: &LaborInfo) {
        if info.is_skilled() {
            self.skilled += 1;
        } else {
            self.unskilled += 1;
        }
    }

    pub fn record_disabled(&mut self, info: &LaborInfo) {
        if info.is_skilled() {
            self.skilled = self.skilled.saturating_sub(1);
        } else {
            self.unskilled = self.unskilled.saturating_sub(1);
        }
    }

    /// Find this worker's record for `target` and their best other skill.
    fn profile_skills(&mut self, target: Option<SkillId>) {
        self.this_skill = None;
        self.other_skill = None;
        self.total_skill = 0;

        for record in &self.skills {
            self.total_skill += record.rating;
            if target == Some(record.skill) {
                self.this_skill = Some(*record);
            } else if more_skilled(Some(record), self.other_skill.as_ref()) {
                self.other_skill = Some(*record);
            }
        }
    }
}

/// Suitability for a skilled labor, best first.
///
/// - skill in this labor (higher is better)
/// - enabled skilled labors (fewer is better)
/// - best other skill (lower is better)
/// - enabled unskilled labors (fewer is better)
/// - total skill (lower is better)
pub fn skilled_order<U>(w1: &WorkerProfile<U>, w2: &WorkerProfile<U>) -> Ordering {
    compare_skills(w1.this_skill.as_ref(), w2.this_skill.as_ref())
        .then(w1.skilled.cmp(&w2.skilled))
        .then_with(|| compare_skills(w2.other_skill.as_ref(), w1.other_skill.as_ref()))
        .then(w1.unskilled.cmp(&w2.unskilled))
        .then(w1.total_skill.cmp(&w2.total_skill))
}

/// Suitability for an unskilled labor, best first. Mostly a measure of being
/// useless elsewhere.
///
/// - enabled unskilled labors (fewer is better)
/// - best skill (lower is better)
/// - enabled skilled labors (fewer is better)
/// - total skill (lower is better)
pub fn unskilled_order<U>(w1: &WorkerProfile<U>, w2: &WorkerProfile<U>) -> Ordering {
    w1.unskilled
        .cmp(&w2.unskilled)
        .then_with(|| compare_skills(w2.other_skill.as_ref(), w1.other_skill.as_ref()))
        .then(w1.skilled.cmp(&w2.skilled))
        .then(w1.total_skill.cmp(&w2.total_skill))
}

/// Refresh the per-labor skill fields of every worker, then stable-sort them
/// from most to least suitable for a labor exercising `skill`.
pub fn sort_by_suitability<U>(workers: &mut [WorkerProfile<U>], skill: Option<SkillId>) {
    for worker in workers.iter_mut() {
        worker.profile_skills(skill);
    }

    match SortOrder::for_skill(skill) {
        SortOrder::Skilled => workers.sort_by(skilled_order),
        SortOrder::Unskilled => workers.sort_by(unskilled_order),
    }
}
