use crate::eligibility::UnitStatus;
use crate::skills::SkillRecord;
use crate::types::{LaborId, UnitKey};

/// The simulation the controller rebalances.
///
/// Everything here is read at the start of a pass except `set_labor`, which
/// is the only mutation the controller ever performs.
pub trait Host {
    type Unit: UnitKey;

    /// Every unit currently present, eligible or not.
    fn units(&self) -> Vec<Self::Unit>;

    fn status(&self, unit: Self::Unit) -> UnitStatus;

    fn skills(&self, unit: Self::Unit) -> Vec<SkillRecord>;

    fn has_labor(&self, unit: Self::Unit, labor: LaborId) -> bool;

    /// Enable or disable a labor. Setting a flag to its current value is a no-op.
    fn set_labor(&mut self, unit: Self::Unit, labor: LaborId, enabled: bool);

    fn current_tick(&self) -> u64;

    /// Passes only run while the host is in its colony-management mode.
    fn is_colony_mode(&self) -> bool;
}
