#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod autopilot;
mod boot_control;
mod config;
mod flight_data;
mod host;
mod interception;
mod keychain;
mod logger;
mod overlay;

use crate::autopilot::ui;
use crate::boot_control::Bootstrap;
use crate::config::HarnessConfig;
use crate::host::{AutopilotAccess, Host, HostValue, SimHost};
use crate::keychain::Keychain;
use crate::overlay::{PANEL_ID, PanelDrag};
use std::{sync::Arc, time::Duration};

/// Time the simulated host needs before its animation state exists.
const HOST_LOAD_DELAY: Duration = Duration::from_secs(3);
const CRUISE_ALT_FT: f64 = 35_000.0;
const CRUISE_TAS_KT: f64 = 460.0;
/// Pointer travel of the overlay drag after start-up.
const OVERLAY_SHIFT: (f64, f64) = (420.0, 40.0);
/// Pause between the steps of the scripted flight.
const SCRIPT_STEP: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = HarnessConfig::from_env();
    let sim = SimHost::new();

    let frame_sim = Arc::clone(&sim);
    let frame_period = config.demo_frame_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(frame_period);
        loop {
            ticker.tick().await;
            frame_sim.frame(frame_period.as_secs_f64());
        }
    });
    let load_sim = Arc::clone(&sim);
    tokio::spawn(async move {
        tokio::time::sleep(HOST_LOAD_DELAY).await;
        load_sim.populate(CRUISE_ALT_FT, CRUISE_TAS_KT);
        log!("Host loaded at FL{:.0}", CRUISE_ALT_FT / 100.0);
    });

    let host: Arc<dyn Host> = sim.clone();
    let keychain = Bootstrap::new(host, config).run().await;
    drag_overlay(&sim);
    fly(&sim, &keychain).await;
}

/// Engages the autopilot and toggles its speed mode back and forth, forever.
async fn fly(sim: &SimHost, keychain: &Keychain) {
    let host = keychain.host();
    let Some(autopilot) = host.autopilot_methods() else {
        error!("Host has no autopilot, nothing to fly");
        return;
    };
    loop {
        sim.set_engaged(true);
        report(sim, keychain, "autopilot engaged").await;
        for _ in 0..2 {
            let next = host.speed_mode().unwrap_or_default().other();
            let name: &'static str = next.into();
            if let Err(e) = autopilot.call("setSpeedMode", &[HostValue::from(name)]) {
                warn!("setSpeedMode({name}) failed: {e}");
            }
            report(sim, keychain, name).await;
        }
        sim.set_engaged(false);
        report(sim, keychain, "autopilot off").await;
    }
}

/// Moves the overlay out of the way the way a pilot would, with one pointer drag.
fn drag_overlay(sim: &SimHost) {
    let Some(origin) = sim.panel_position(PANEL_ID) else {
        warn!("Overlay panel missing, nothing to drag");
        return;
    };
    let grab = (origin.0 + 10.0, origin.1 + 5.0);
    let mut drag = PanelDrag::new();
    drag.press(grab, origin);
    drag.drag_to(sim, PANEL_ID, (grab.0 + OVERLAY_SHIFT.0, grab.1 + OVERLAY_SHIFT.1));
    drag.release();
    if let Some((left, top)) = sim.panel_position(PANEL_ID) {
        log!("Overlay moved to {left:.0}/{top:.0}");
    }
}

async fn report(sim: &SimHost, keychain: &Keychain, step: &str) {
    tokio::time::sleep(SCRIPT_STEP).await;
    let Some(r) = keychain.overlay().readout() else {
        warn!("[{step}] no flight data");
        return;
    };
    info!(
        "[{step}] IAS {:.0} kt, TAS {:.0} kt, M{:.3}, AP target {}",
        r.ias_knots,
        r.tas_knots.unwrap_or(0.0),
        r.mach.unwrap_or(0.0),
        sim.element_value(ui::SPEED_INPUT).unwrap_or_default()
    );
    log!(
        "[{step}] airspeed gauge saw {:?} kt, autopilot saw {:?} kt",
        sim.reading("airspeed").flatten().map(f64::round),
        sim.autopilot_seen_kias().map(f64::round)
    );
}
