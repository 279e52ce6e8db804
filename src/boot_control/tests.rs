use super::{BootSignal, BootState, Bootstrap};
use crate::autopilot::{SpeedMode, ui};
use crate::config::HarnessConfig;
use crate::host::{
    AutopilotAccess, FlightField, FlightStateAccess, Host, HostValue, InstrumentAccess, SimHost, UiSurface,
};
use crate::interception::WrapOutcome;
use crate::overlay::{IAS_ID, PANEL_ID};
use std::{sync::Arc, time::Duration};

fn fast_config() -> HarnessConfig {
    HarnessConfig::new(Duration::from_millis(10), Duration::from_millis(5), Duration::from_millis(5))
}

fn bootstrap_for(sim: &Arc<SimHost>) -> Bootstrap {
    let host: Arc<dyn Host> = sim.clone();
    Bootstrap::new(host, fast_config())
}

#[test]
fn test_probe_waits_for_host() {
    let sim = SimHost::new();
    let mut boot = bootstrap_for(&sim);
    assert_eq!(boot.state(), BootState::Uninitialized);
    for _ in 0..3 {
        assert!(matches!(boot.probe(), BootSignal::Waiting));
        assert_eq!(boot.state(), BootState::Polling);
    }
    assert!(!sim.panel_exists(PANEL_ID), "nothing installed while polling");
}

#[test]
fn test_ready_transition_happens_once() {
    let sim = SimHost::new();
    let mut boot = bootstrap_for(&sim);
    boot.probe();
    sim.populate(10_000.0, 300.0);

    let BootSignal::BecameReady(keychain, report) = boot.probe() else {
        panic!("host was ready");
    };
    assert_eq!(boot.state(), BootState::Ready);
    assert!(report.overlay_created);
    assert!(report.speed_mode_replaced);
    assert_eq!(report.autopilot_update, WrapOutcome::Installed);
    // instruments.update plus three renderers; the plain value slot is skipped.
    assert_eq!(report.wrapped(), 5);
    assert!(report
        .instruments
        .contains(&("instruments.renderers.overlayCount".to_string(), WrapOutcome::NotCallable)));
    assert_eq!(keychain.harness().wrapped_count(), 5);

    assert!(matches!(boot.probe(), BootSignal::AlreadyReady));
    assert_eq!(keychain.harness().wrapped_count(), 5);
    assert_eq!(sim.panel_creations(), 1);
}

#[test]
fn test_installed_host_frame_keeps_state_and_corrects_instruments() {
    let sim = SimHost::new();
    let mut boot = bootstrap_for(&sim);
    sim.populate(35_000.0, 460.0);
    let BootSignal::BecameReady(keychain, _) = boot.probe() else {
        panic!("host was ready");
    };
    let expected = keychain.calc().indicated_airspeed();
    let before = sim.flight_values().unwrap();

    let renderers = sim.renderer_methods().unwrap();
    renderers.call("airspeed", &[]).unwrap();
    let seen = sim.reading("airspeed").flatten().unwrap();
    assert!((seen - expected).abs() < 1e-9);
    assert!(seen < 460.0 * 0.7, "high altitude IAS is well below TAS");
    assert_eq!(sim.flight_values(), Some(before));
    assert_eq!(sim.try_read(FlightField::TrueAirspeedKnots), Some(460.0));
}

#[test]
fn test_installed_mode_switch_replaces_stock_conversion() {
    let sim = SimHost::new();
    let mut boot = bootstrap_for(&sim);
    sim.populate(35_000.0, 460.0);
    assert!(matches!(boot.probe(), BootSignal::BecameReady(..)));
    sim.set_autopilot_speed(Some(250.0));

    let autopilot = sim.autopilot_methods().unwrap();
    autopilot.call("setSpeedMode", &[HostValue::from("mach")]).unwrap();
    let mach = sim.autopilot_speed().unwrap();
    assert_eq!(sim.speed_mode(), Some(SpeedMode::Mach));
    assert!(mach > 250.0 / 661.47 + 0.2, "corrected Mach {mach} above stock conversion");
    assert!(sim.element_has_class(ui::SWITCH_RIGHT, ui::ACTIVE_CLASS));
}

#[tokio::test]
async fn test_run_polls_until_host_loads() {
    let sim = SimHost::new();
    let loader = Arc::clone(&sim);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        loader.populate(5_000.0, 200.0);
    });
    let keychain = bootstrap_for(&sim).run().await;
    assert!(keychain.harness().wrapped_count() > 0);
    assert!(sim.has_flight_state());

    tokio::time::sleep(Duration::from_millis(30)).await;
    let shown = sim.text(IAS_ID).unwrap();
    assert!(shown.parse::<f64>().is_ok(), "overlay refreshed, shows {shown}");
}
