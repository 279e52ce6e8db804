use super::{InterceptionHarness, Interceptor, OVERRIDDEN_FIELDS, WrapOutcome};
use crate::flight_data::AirspeedCalculator;
use crate::host::{
    FlightField, FlightStateAccess, Host, HostCallError, HostValue, InstrumentAccess, MethodTable, SimHost,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

const TAS: f64 = 250.0;
const STORED_IAS: f64 = 248.0;
/// `250 * sqrt(0.905 / 1.22)`
const CORRECTED: f64 = 215.32;

fn setup() -> (Arc<SimHost>, InterceptionHarness) {
    let sim = SimHost::new();
    sim.populate(0.0, TAS);
    sim.write(FlightField::IndicatedAirspeedKnots, Some(STORED_IAS)).unwrap();
    sim.set_weather(Some(0.905), Some(1.22), Some(216.65));
    let host: Arc<dyn Host> = sim.clone();
    let harness = InterceptionHarness::new(Arc::clone(&host), AirspeedCalculator::new(host));
    (sim, harness)
}

fn airspeeds(sim: &SimHost) -> (Option<f64>, Option<f64>) {
    (sim.try_read(FlightField::IndicatedAirspeedKnots), sim.try_read(FlightField::TrueAirspeedKnots))
}

/// Table with one method recording the airspeeds it observes and failing on demand.
fn probe_table(sim: &Arc<SimHost>, fail: bool) -> (Arc<MethodTable>, Arc<Mutex<Vec<(Option<f64>, Option<f64>)>>>) {
    let table = Arc::new(MethodTable::new("test.owner"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    let sim_clone = Arc::clone(sim);
    table.set_method(
        "render",
        Arc::new(move |_args: &[HostValue]| {
            seen_clone.lock().unwrap().push(airspeeds(&sim_clone));
            if fail && seen_clone.lock().unwrap().len() == 1 {
                return Err(HostCallError::Thrown("gauge exploded".into()));
            }
            Ok(HostValue::Number(1.0))
        }),
    );
    (table, seen)
}

#[test]
fn test_override_visible_inside_call_and_restored_after() {
    let (sim, harness) = setup();
    let (table, seen) = probe_table(&sim, false);
    assert_eq!(harness.wrap(&table, "render"), WrapOutcome::Installed);

    let result = table.call("render", &[]).unwrap();
    assert_eq!(result, HostValue::Number(1.0));
    let (ias, tas) = seen.lock().unwrap()[0];
    assert!((ias.unwrap() - CORRECTED).abs() < 0.01);
    assert_eq!(ias, tas);
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_scenario_d_failure_restores_and_falls_back() {
    let (sim, harness) = setup();
    let (table, seen) = probe_table(&sim, true);
    harness.wrap(&table, "render");

    let result = table.call("render", &[]);
    assert_eq!(result, Ok(HostValue::Number(1.0)));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!((seen[0].0.unwrap() - CORRECTED).abs() < 0.01);
    assert_eq!(seen[1], (Some(STORED_IAS), Some(TAS)), "fallback runs on restored state");
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_absent_fields_are_restored_to_absent() {
    let (sim, harness) = setup();
    sim.write(FlightField::IndicatedAirspeedKnots, None).unwrap();
    let (table, seen) = probe_table(&sim, false);
    harness.wrap(&table, "render");
    table.call("render", &[]).unwrap();
    assert!(seen.lock().unwrap()[0].0.is_some());
    assert_eq!(airspeeds(&sim), (None, Some(TAS)));
}

#[test]
fn test_double_wrap_installs_one_layer() {
    let (sim, harness) = setup();
    let (table, seen) = probe_table(&sim, false);
    assert_eq!(harness.wrap(&table, "render"), WrapOutcome::Installed);
    assert_eq!(harness.wrap(&table, "render"), WrapOutcome::AlreadyWrapped);
    assert_eq!(harness.wrapped_count(), 1);

    for _ in 0..5 {
        table.call("render", &[]).unwrap();
    }
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    // A second layer would have corrected the already corrected value again.
    assert!(seen.iter().all(|(ias, _)| (ias.unwrap() - CORRECTED).abs() < 0.01));
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_non_callable_slots_are_skipped() {
    let (sim, harness) = setup();
    let renderers = sim.renderer_methods().unwrap();
    let outcomes = harness.wrap_all(&renderers);
    assert!(outcomes.contains(&("overlayCount".to_string(), WrapOutcome::NotCallable)));
    assert_eq!(outcomes.iter().filter(|(_, o)| *o == WrapOutcome::Installed).count(), 3);
    assert_eq!(renderers.value("overlayCount"), Some(HostValue::Number(3.0)));
    assert_eq!(harness.wrap(&renderers, "missing"), WrapOutcome::NotCallable);
}

#[test]
fn test_wrapped_renderer_sees_corrected_airspeed() {
    let (sim, harness) = setup();
    let renderers = sim.renderer_methods().unwrap();
    harness.wrap_all(&renderers);
    renderers.call("airspeed", &[]).unwrap();
    renderers.call("altimeter", &[]).unwrap();
    assert!((sim.reading("airspeed").flatten().unwrap() - CORRECTED).abs() < 0.01);
    assert_eq!(sim.reading("altimeter"), Some(Some(0.0)));
}

#[test]
fn test_passes_through_without_flight_state() {
    let sim = SimHost::new();
    let host: Arc<dyn Host> = sim.clone();
    let harness = InterceptionHarness::new(Arc::clone(&host), AirspeedCalculator::new(host));
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let table = MethodTable::new("test.owner");
    table.set_method(
        "update",
        Arc::new(move |args: &[HostValue]| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(args.first().cloned().unwrap_or_default())
        }),
    );
    harness.wrap(&table, "update");
    assert_eq!(table.call("update", &[HostValue::Number(7.0)]), Ok(HostValue::Number(7.0)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!sim.has_flight_state());
}

#[test]
fn test_nested_wrapped_calls_restore_independently() {
    let (sim, harness) = setup();
    let inner = Arc::new(MethodTable::new("test.inner"));
    let inner_seen = Arc::new(Mutex::new(None));
    let inner_seen_clone = Arc::clone(&inner_seen);
    let sim_inner = Arc::clone(&sim);
    inner.set_method(
        "draw",
        Arc::new(move |_args: &[HostValue]| {
            *inner_seen_clone.lock().unwrap() = Some(airspeeds(&sim_inner));
            Ok(HostValue::Undefined)
        }),
    );
    harness.wrap(&inner, "draw");

    let outer = MethodTable::new("test.outer");
    let after_inner = Arc::new(Mutex::new(None));
    let after_inner_clone = Arc::clone(&after_inner);
    let sim_outer = Arc::clone(&sim);
    let inner_clone = Arc::clone(&inner);
    outer.set_method(
        "update",
        Arc::new(move |_args: &[HostValue]| {
            inner_clone.call("draw", &[])?;
            *after_inner_clone.lock().unwrap() = Some(airspeeds(&sim_outer));
            Ok(HostValue::Undefined)
        }),
    );
    harness.wrap(&outer, "update");
    outer.call("update", &[]).unwrap();

    let (outer_ias, outer_tas) = after_inner.lock().unwrap().unwrap();
    assert!((outer_ias.unwrap() - CORRECTED).abs() < 0.01, "outer override back in place");
    assert_eq!(outer_ias, outer_tas);
    assert!(inner_seen.lock().unwrap().is_some());
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_guard_restores_on_panic() {
    let (sim, _) = setup();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let interceptor = Interceptor::new(&*sim, &OVERRIDDEN_FIELDS, || 99.0);
        let _guard = interceptor.engage().unwrap();
        assert_eq!(sim.try_read(FlightField::TrueAirspeedKnots), Some(99.0));
        panic!("host callback panicked");
    }));
    assert!(result.is_err());
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_guard_snapshot_and_early_restore() {
    let (sim, _) = setup();
    let interceptor = Interceptor::new(&*sim, &OVERRIDDEN_FIELDS, || 120.0);
    let guard = interceptor.engage().unwrap();
    assert_eq!(guard.value(), 120.0);
    assert_eq!(
        guard.snapshot(),
        &[
            (FlightField::IndicatedAirspeedKnots, Some(STORED_IAS)),
            (FlightField::TrueAirspeedKnots, Some(TAS))
        ]
    );
    guard.restore();
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}

#[test]
fn test_interceptor_disengaged_without_flight_state() {
    let sim = SimHost::new();
    let interceptor = Interceptor::new(&*sim, &OVERRIDDEN_FIELDS, || 120.0);
    assert!(interceptor.engage().is_none());
}

#[test]
fn test_frame_through_wrapped_instruments_leaves_state_untouched() {
    let (sim, harness) = setup();
    let renderers = sim.renderer_methods().unwrap();
    let instruments = sim.instrument_methods().unwrap();
    harness.wrap(&instruments, "update");
    harness.wrap_all(&renderers);
    assert!(harness.is_wrapped(&instruments, "update"));
    instruments.call("update", &[]).unwrap();
    let seen = sim.reading("instruments.update").flatten().unwrap();
    assert!((seen - CORRECTED).abs() < 0.01);
    assert_eq!(airspeeds(&sim), (Some(STORED_IAS), Some(TAS)));
}
