//! One rebalance pass over every labor and eligible worker.
//!
//! Pass sequence:
//! 1. Recount: rebuild every labor's headcount from eligible workers only
//! 2. Deficit: labors below their minimum go to the most suitable non-holders
//! 3. Surplus: labors above their maximum are taken from the least suitable holders
//! 4. Safety net: workers without a skilled (or unskilled) labor get one
//!
//! The pass is greedy and makes as few changes as it can; a second pass over
//! an unchanged population changes nothing.

use rand::Rng;

use crate::eligibility::{Restriction, can_work};
use crate::host::Host;
use crate::profile::{WorkerProfile, sort_by_suitability};
use crate::registry::LaborRegistry;
use crate::types::{LaborId, UnitKey};

/// Why a flag was flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    Deficit,
    Surplus,
    Fallback,
}

impl ChangeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeReason::Deficit => "deficit",
            ChangeReason::Surplus => "surplus",
            ChangeReason::Fallback => "fallback",
        }
    }
}

/// Summary of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Workers that passed the eligibility filter.
    pub eligible: usize,
    /// Labors enabled to cover a deficit.
    pub enabled: u32,
    /// Labors disabled to trim a surplus.
    pub disabled: u32,
    /// Labors enabled by the idle-worker safety net.
    pub fallback: u32,
}

impl PassReport {
    pub fn changes(&self) -> u32 {
        self.enabled + self.disabled + self.fallback
    }

    pub fn is_noop(&self) -> bool {
        self.changes() == 0
    }
}

/// Pick one item uniformly at random from a stream of unknown length.
///
/// The n-th item replaces the current pick with probability 1/n.
pub fn reservoir_pick<R: Rng, T>(rng: &mut R, items: impl IntoIterator<Item = T>) -> Option<T> {
    let mut selected = None;
    let mut found = 0u32;
    for item in items {
        found += 1;
        if rng.random_range(0..found) == 0 {
            selected = Some(item);
        }
    }
    selected
}

pub struct RebalanceEngine<R> {
    rng: R,
    restriction: Option<Restriction>,
}

impl<R: Rng> RebalanceEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            restriction: None,
        }
    }

    /// Exclude workers rejected by `restriction` in addition to `can_work`.
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = Some(restriction);
        self
    }

    pub fn set_restriction(&mut self, restriction: Option<Restriction>) {
        self.restriction = restriction;
    }

    /// Run one full pass, mutating labor flags through `host` and headcounts
    /// in `registry`.
    pub fn run_pass<H: Host>(&mut self, registry: &mut LaborRegistry, host: &mut H) -> PassReport {
        let tick = host.current_tick();
        let mut workers = self.recount(registry, host);
        let mut report = PassReport {
            eligible: workers.len(),
            ..Default::default()
        };

        for labor in LaborId::ALL {
            let info = *registry.get(labor);
            if info.active < info.minimum {
                report.enabled += fill_deficit(registry, host, &mut workers, labor, tick);
            } else if info.active > info.maximum {
                report.disabled += trim_surplus(registry, host, &mut workers, labor, tick);
            }
        }

        report.fallback = self.cover_idle_workers(registry, host, &mut workers, tick);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "pass",
            tick = tick,
            eligible = report.eligible as u64,
            enabled = report.enabled,
            disabled = report.disabled,
            fallback = report.fallback,
        );

        report
    }

    fn is_eligible<H: Host>(&self, host: &H, unit: H::Unit) -> bool {
        let status = host.status(unit);
        can_work(&status) && self.restriction.as_ref().is_none_or(|allow| allow(&status))
    }

    /// Reset every headcount and rebuild it, along with a profile per eligible
    /// worker.
    fn recount<H: Host>(
        &self,
        registry: &mut LaborRegistry,
        host: &H,
    ) -> Vec<WorkerProfile<H::Unit>> {
        registry.reset_counts();

        let mut workers = Vec::new();
        for unit in host.units() {
            if !self.is_eligible(host, unit) {
                continue;
            }

            let mut worker = WorkerProfile::new(unit, host.skills(unit));
            for labor in LaborId::ALL {
                if host.has_labor(unit, labor) {
                    let info = registry.get_mut(labor);
                    info.active += 1;
                    worker.record_held(labor, info);
                }
            }
            workers.push(worker);
        }

        workers
    }

    /// Make sure every worker has at least one skilled and one unskilled labor.
    fn cover_idle_workers<H: Host>(
        &mut self,
        registry: &mut LaborRegistry,
        host: &mut H,
        workers: &mut [WorkerProfile<H::Unit>],
        tick: u64,
    ) -> u32 {
        let mut changes = 0;

        for worker in workers.iter_mut() {
            // TODO: check whether the unit actually lacks a job; nobles and
            // need-driven units may hold labors they never get to.
            if worker.skilled == 0 {
                // Uniformed labors are all skilled, and this worker holds none
                // of those, so exclusivity cannot be broken here.
                if let Some(labor) = self.pick_open_labor(registry, true) {
                    enable(registry, host, worker, labor, ChangeReason::Fallback, tick);
                    changes += 1;
                }

                if worker.unskilled == 0 {
                    // Nothing at all was enabled. We can't tell whether the
                    // skilled pick is useful, so hand out every open chore.
                    for labor in LaborId::ALL {
                        let info = registry.get(labor);
                        if !info.is_skilled() && info.has_room() {
                            enable(registry, host, worker, labor, ChangeReason::Fallback, tick);
                            changes += 1;
                        }
                    }
                }
            } else if worker.unskilled == 0 {
                if let Some(labor) = self.pick_open_labor(registry, false) {
                    enable(registry, host, worker, labor, ChangeReason::Fallback, tick);
                    changes += 1;
                }
            }
        }

        changes
    }

    /// Uniformly pick a skilled (or unskilled) labor that is below its maximum.
    fn pick_open_labor(&mut self, registry: &LaborRegistry, skilled: bool) -> Option<LaborId> {
        let open = registry
            .iter()
            .filter(|(_, info)| info.is_skilled() == skilled && info.has_room())
            .map(|(labor, _)| labor);
        reservoir_pick(&mut self.rng, open)
    }
}

/// Add `labor` to the most suitable workers lacking it until the minimum is
/// met or nobody is left.
fn fill_deficit<H: Host>(
    registry: &mut LaborRegistry,
    host: &mut H,
    workers: &mut [WorkerProfile<H::Unit>],
    labor: LaborId,
    tick: u64,
) -> u32 {
    let info = *registry.get(labor);
    sort_by_suitability(workers, info.skill);

    let mut needed = info.minimum - info.active;
    let mut changes = 0;
    for worker in workers.iter_mut() {
        if needed == 0 {
            break;
        }
        if host.has_labor(worker.unit, labor) {
            continue;
        }
        enable(registry, host, worker, labor, ChangeReason::Deficit, tick);
        changes += 1;
        needed -= 1;
    }

    changes
}

/// Remove `labor` from holders beyond the best `maximum` of them.
///
/// Only holders consume the retention quota; dropped slots are not handed to
/// anyone else in the same step.
fn trim_surplus<H: Host>(
    registry: &mut LaborRegistry,
    host: &mut H,
    workers: &mut [WorkerProfile<H::Unit>],
    labor: LaborId,
    tick: u64,
) -> u32 {
    let info = *registry.get(labor);
    sort_by_suitability(workers, info.skill);

    let mut remaining = info.maximum;
    let mut excess = info.active - info.maximum;
    let mut changes = 0;
    for worker in workers.iter_mut() {
        if excess == 0 {
            break;
        }
        if !host.has_labor(worker.unit, labor) {
            continue;
        }
        if remaining > 0 {
            remaining -= 1;
            continue;
        }
        disable(registry, host, worker, labor, tick);
        changes += 1;
        excess -= 1;
    }

    changes
}

fn enable<H: Host>(
    registry: &mut LaborRegistry,
    host: &mut H,
    worker: &mut WorkerProfile<H::Unit>,
    labor: LaborId,
    reason: ChangeReason,
    tick: u64,
) {
    host.set_labor(worker.unit, labor, true);
    let info = registry.get_mut(labor);
    info.active += 1;
    worker.record_enabled(info);
    log_change(tick, worker.unit, labor, true, reason);
}

fn disable<H: Host>(
    registry: &mut LaborRegistry,
    host: &mut H,
    worker: &mut WorkerProfile<H::Unit>,
    labor: LaborId,
    tick: u64,
) {
    host.set_labor(worker.unit, labor, false);
    let info = registry.get_mut(labor);
    info.active -= 1;
    worker.record_disabled(info);
    log_change(tick, worker.unit, labor, false, ChangeReason::Surplus);
}

fn log_change<U: UnitKey>(tick: u64, unit: U, labor: LaborId, enabled: bool, reason: ChangeReason) {
    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "assignment",
        tick = tick,
        unit = unit.to_u64(),
        labor = labor.name(),
        enabled = enabled,
        reason = reason.as_str(),
    );
    let _ = (tick, unit, labor, enabled, reason); // Suppress unused warnings
}
