//! Skill records and the ranking between them.
//!
//! `more_skilled` is the single primitive every worker ordering is built on.
//! It is a strict weak ordering: two records with identical rating,
//! experience, rust flag and rust counter are interchangeable even when they
//! belong to different skills.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::SkillId;

/// A worker's competency in one skill, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct SkillRecord {
    pub skill: SkillId,
    pub rating: i32,
    pub experience: i32,
    #[serde(default)]
    pub rusty: bool,
    #[serde(default)]
    pub rust_counter: i32,
}

impl SkillRecord {
    pub fn new(skill: SkillId, rating: i32) -> Self {
        Self {
            skill,
            rating,
            experience: 0,
            rusty: false,
            rust_counter: 0,
        }
    }

    pub fn with_experience(mut self, experience: i32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_rust(mut self, rusty: bool, rust_counter: i32) -> Self {
        self.rusty = rusty;
        self.rust_counter = rust_counter;
        self
    }
}

/// Whether `a` should replace `b` as the higher skill.
///
/// A missing record never outranks anything; a present one always outranks a
/// missing one. Otherwise the first unequal field decides:
/// - rating (higher wins)
/// - experience (higher wins)
/// - rust (not rusty wins)
/// - rust counter (higher wins)
pub fn more_skilled(a: Option<&SkillRecord>, b: Option<&SkillRecord>) -> bool {
    let Some(a) = a else {
        return false;
    };
    let Some(b) = b else {
        return true;
    };

    if a.rating != b.rating {
        return a.rating > b.rating;
    }
    if a.experience != b.experience {
        return a.experience > b.experience;
    }
    if a.rusty != b.rusty {
        return !a.rusty;
    }
    if a.rust_counter != b.rust_counter {
        return a.rust_counter > b.rust_counter;
    }

    // Identically skilled.
    false
}

/// Sort ordering derived from `more_skilled`: the better record sorts first.
pub fn compare_skills(a: Option<&SkillRecord>, b: Option<&SkillRecord>) -> Ordering {
    if more_skilled(a, b) {
        Ordering::Less
    } else if more_skilled(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Which composite worker ordering applies to a labor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// The labor exercises a skill: prefer the best practitioner with the
    /// fewest other skilled duties.
    Skilled,
    /// The labor needs no skill: prefer whoever is least valuable elsewhere.
    Unskilled,
}

impl SortOrder {
    pub fn for_skill(skill: Option<SkillId>) -> Self {
        match skill {
            Some(_) => SortOrder::Skilled,
            None => SortOrder::Unskilled,
        }
    }
}
