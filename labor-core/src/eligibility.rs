//! Which workers take part in a pass.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

/// Host-reported flags consulted by the eligibility filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct UnitStatus {
    /// The unit has a soul, and therefore skill data.
    pub has_soul: bool,
    pub citizen: bool,
    pub adult: bool,
    /// Incapacitated by drink.
    pub drunk: bool,
    /// On active military duty; the host owns this designation.
    pub military_duty: bool,
    /// Number of burrows the unit is restricted to.
    pub burrows: u32,
}

impl Default for UnitStatus {
    fn default() -> Self {
        Self {
            has_soul: true,
            citizen: true,
            adult: true,
            drunk: false,
            military_duty: false,
            burrows: 0,
        }
    }
}

/// Extra eligibility predicate layered on top of `can_work`, e.g. to keep
/// burrowed workers out of a pass.
pub type Restriction = Box<dyn Fn(&UnitStatus) -> bool>;

/// Whether a unit is an eligible worker.
///
/// Ineligible units neither count toward a labor's headcount nor receive
/// changes.
pub fn can_work(status: &UnitStatus) -> bool {
    if !status.has_soul {
        return false;
    }

    if !status.citizen || !status.adult {
        return false;
    }

    if status.drunk {
        return false;
    }

    // Burrowed workers are left eligible unless a `Restriction` says otherwise.

    if status.military_duty {
        // TODO: include soldiers whose squad is inactive or only training.
        return false;
    }

    true
}
