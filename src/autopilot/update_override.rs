use super::ui;
use crate::flight_data::AirspeedCalculator;
use crate::host::{AutopilotAccess, Host};
use crate::info;
use crate::interception::{InterceptionHarness, WrapOutcome};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Off→on edge detector over consecutive autopilot updates.
#[derive(Debug, Default)]
pub struct EngagementEdge {
    was_on: AtomicBool,
}

impl EngagementEdge {
    pub fn new() -> Self { Self::default() }

    /// Records the current engagement and reports whether it just switched on.
    pub fn rising(&self, on: bool) -> bool {
        let was_on = self.was_on.swap(on, Ordering::SeqCst);
        on && !was_on
    }
}

/// Wraps the autopilot's per-frame update. Besides the airspeed override of every
/// wrapped call, the first update after the autopilot is engaged sets the target
/// speed to the current indicated airspeed.
pub struct AutopilotUpdateOverride {
    host: Arc<dyn Host>,
    calc: AirspeedCalculator,
    edge: EngagementEdge,
}

impl AutopilotUpdateOverride {
    pub const ENTRY_POINT: &'static str = "update";

    /// Creates the override with the autopilot assumed off.
    ///
    /// # Arguments
    /// - `host`: The host whose autopilot is corrected.
    /// - `calc`: The source of the target speed set on engagement.
    pub fn new(host: Arc<dyn Host>, calc: AirspeedCalculator) -> Self {
        Self { host, calc, edge: EngagementEdge::new() }
    }

    /// Installs the override on the host autopilot. Without an autopilot nothing happens.
    pub fn install(self, harness: &InterceptionHarness) -> WrapOutcome {
        let Some(owner) = self.host.autopilot_methods() else {
            return WrapOutcome::NotCallable;
        };
        let this = Arc::new(self);
        harness.wrap_with_hook(&owner, Self::ENTRY_POINT, Some(Arc::new(move || this.before_update())))
    }

    /// Runs ahead of every wrapped update, outside the override.
    pub fn before_update(&self) {
        let on = self.host.engaged().unwrap_or(false);
        if self.edge.rising(on) {
            self.align_target();
        }
    }

    fn align_target(&self) {
        let ias = self.calc.indicated_airspeed();
        if self.host.set_target_value(ias).is_err() {
            return;
        }
        ui::show_target_speed(&*self.host, ias);
        info!("Autopilot ON. Initialized target to IAS: {ias:.0}");
    }
}
