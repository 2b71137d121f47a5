//! Lifecycle and scheduling around the rebalance engine.

use rand::Rng;

use crate::config::{ConfigError, LazyLaborConfig};
use crate::eligibility::Restriction;
use crate::engine::{PassReport, RebalanceEngine};
use crate::host::Host;
use crate::registry::LaborRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NotColonyMode,
    /// Fewer than `interval_ticks` ticks since the last pass.
    NotDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Ran(PassReport),
}

impl TickOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, TickOutcome::Ran(_))
    }
}

/// The labor controller as a host plugin: registry, engine, on/off switch and
/// the tick of the last pass.
pub struct LazyLabor<R> {
    registry: LaborRegistry,
    engine: RebalanceEngine<R>,
    enabled: bool,
    interval_ticks: u64,
    last_run: u64,
}

impl<R: Rng> LazyLabor<R> {
    /// Default bounds, default interval, enabled.
    pub fn new(rng: R) -> Self {
        let config = LazyLaborConfig::default();
        Self {
            registry: LaborRegistry::initialize(),
            engine: RebalanceEngine::new(rng),
            enabled: config.enabled,
            interval_ticks: config.interval_ticks,
            last_run: 0,
        }
    }

    /// Build the registry defaults and apply the configured overrides.
    pub fn initialize(config: &LazyLaborConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: LaborRegistry::with_overrides(&config.overrides)?,
            engine: RebalanceEngine::new(rng),
            enabled: config.enabled,
            interval_ticks: config.interval_ticks,
            last_run: 0,
        })
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Same as disabling; any later tick is a no-op until re-enabled.
    pub fn shutdown(&mut self) {
        self.set_enabled(false);
    }

    pub fn set_restriction(&mut self, restriction: Option<Restriction>) {
        self.engine.set_restriction(restriction);
    }

    pub fn registry(&self) -> &LaborRegistry {
        &self.registry
    }

    pub fn last_run(&self) -> u64 {
        self.last_run
    }

    /// Host update hook: run a pass if enabled, in colony mode and due.
    pub fn on_scheduled_tick<H: Host>(&mut self, host: &mut H) -> TickOutcome {
        if !self.enabled {
            return self.skip(SkipReason::Disabled);
        }
        if !host.is_colony_mode() {
            return self.skip(SkipReason::NotColonyMode);
        }

        let now = host.current_tick();
        if now.saturating_sub(self.last_run) < self.interval_ticks {
            return self.skip(SkipReason::NotDue);
        }

        self.last_run = now;
        TickOutcome::Ran(self.run_now(host))
    }

    /// Run a pass immediately, ignoring the schedule and the enabled flag.
    pub fn run_now<H: Host>(&mut self, host: &mut H) -> PassReport {
        self.engine.run_pass(&mut self.registry, host)
    }

    fn skip(&self, reason: SkipReason) -> TickOutcome {
        #[cfg(feature = "instrument")]
        tracing::debug!(target: "schedule", reason = ?reason, last_run = self.last_run);
        TickOutcome::Skipped(reason)
    }
}
