use super::boot_state::{BootSignal, BootState, InstallReport};
use crate::autopilot::{AutopilotUpdateOverride, SpeedModeConverter};
use crate::config::HarnessConfig;
use crate::host::{FlightStateAccess, Host, InstrumentAccess};
use crate::interception::WrapOutcome;
use crate::keychain::Keychain;
use crate::{info, log, warn};
use std::sync::Arc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Waits for the host to finish loading, then installs every correction exactly once.
pub struct Bootstrap {
    host: Arc<dyn Host>,
    config: HarnessConfig,
    state: BootState,
}

impl Bootstrap {
    /// Creates an initializer in [`BootState::Uninitialized`].
    ///
    /// # Arguments
    /// - `host`: The host to wait for. It may still be loading.
    /// - `config`: Probe and overlay refresh periods.
    pub fn new(host: Arc<dyn Host>, config: HarnessConfig) -> Self {
        Self { host, config, state: BootState::Uninitialized }
    }

    #[cfg(test)]
    pub fn state(&self) -> BootState { self.state }

    /// One probe. Installs everything on the first probe that finds the host's
    /// animation state; later probes report [`BootSignal::AlreadyReady`].
    pub fn probe(&mut self) -> BootSignal {
        match self.state {
            BootState::Ready => return BootSignal::AlreadyReady,
            BootState::Uninitialized => self.state = BootState::Polling,
            BootState::Polling => (),
        }
        if !self.host.has_flight_state() {
            return BootSignal::Waiting;
        }
        info!("Initializing...");
        let keychain = Keychain::new(Arc::clone(&self.host));
        let report = Self::install(&keychain);
        self.state = BootState::Ready;
        info!(
            "Ready: {} entry points wrapped, overlay {}, speed mode switch {}",
            report.wrapped(),
            if report.overlay_created { "created" } else { "already present" },
            if report.speed_mode_replaced { "replaced" } else { "untouched" }
        );
        BootSignal::BecameReady(keychain, report)
    }

    fn install(keychain: &Keychain) -> InstallReport {
        let host = keychain.host();
        let harness = keychain.harness();
        let overlay_created = keychain.overlay().ensure_panel();

        let autopilot_update =
            AutopilotUpdateOverride::new(Arc::clone(&host), keychain.calc().clone()).install(harness);
        let speed_mode_replaced =
            SpeedModeConverter::new(Arc::clone(&host), keychain.calc().physics().clone()).install();
        if !speed_mode_replaced {
            warn!("No autopilot found, speed mode switch left as is");
        }

        let mut instruments = Vec::new();
        if let Some(owner) = host.instrument_methods() {
            let outcome = harness.wrap(&owner, "update");
            instruments.push((format!("{}.update", owner.id()), outcome));
        }
        if let Some(owner) = host.renderer_methods() {
            instruments.extend(
                harness.wrap_all(&owner).into_iter().map(|(key, o)| (format!("{}.{key}", owner.id()), o)),
            );
        }
        for (name, outcome) in &instruments {
            if *outcome != WrapOutcome::Installed {
                log!("{name}: {outcome}");
            }
        }
        InstallReport { overlay_created, autopilot_update, speed_mode_replaced, instruments }
    }

    /// Probes every probe interval until the host is ready, then starts the overlay
    /// refresh timer and returns the installed subsystems.
    pub async fn run(mut self) -> Keychain {
        let period = self.config.probe_interval();
        log!("Waiting for host, probing every {} ms", period.as_millis());
        let mut probe = interval_at(Instant::now() + period, period);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            probe.tick().await;
            if let BootSignal::BecameReady(keychain, _) = self.probe() {
                let overlay = keychain.overlay().clone();
                tokio::spawn(overlay.run(self.config.refresh_interval()));
                return keychain;
            }
        }
    }
}
