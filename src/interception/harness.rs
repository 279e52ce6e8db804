use super::{interceptor::Interceptor, wrap_registry::WrapRegistry};
use crate::flight_data::AirspeedCalculator;
use crate::host::{FlightField, Host, HostCallResult, HostMethod, HostValue, MethodTable};
use crate::{event, log, warn};
use std::sync::{Arc, Mutex, PoisonError};
use strum_macros::Display;

/// Fields receiving the corrected indicated airspeed during an intercepted call.
/// Host code reads either of them as "the" airspeed, so both carry the same value.
pub const OVERRIDDEN_FIELDS: [FlightField; 2] =
    [FlightField::IndicatedAirspeedKnots, FlightField::TrueAirspeedKnots];

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum WrapOutcome {
    Installed,
    AlreadyWrapped,
    NotCallable,
}

/// Runs before the override is applied, on every call of a wrapped entry point.
pub type PreCallHook = Arc<dyn Fn() + Send + Sync>;

/// Replaces host entry points with versions that run the original under the
/// corrected-airspeed override.
#[derive(Clone)]
pub struct InterceptionHarness {
    host: Arc<dyn Host>,
    calc: AirspeedCalculator,
    registry: Arc<Mutex<WrapRegistry>>,
}

impl InterceptionHarness {
    /// Creates a harness with an empty registry.
    ///
    /// # Arguments
    /// - `host`: The host whose flight state is overridden during wrapped calls.
    /// - `calc`: The source of the value written into the overridden fields.
    pub fn new(host: Arc<dyn Host>, calc: AirspeedCalculator) -> Self {
        Self { host, calc, registry: Arc::new(Mutex::new(WrapRegistry::new())) }
    }

    pub fn calc(&self) -> &AirspeedCalculator { &self.calc }

    /// Number of entry points replaced so far.
    #[cfg(test)]
    pub fn wrapped_count(&self) -> usize {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[cfg(test)]
    pub fn is_wrapped(&self, owner: &MethodTable, key: &str) -> bool {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner).contains(owner.id(), key)
    }

    /// Wraps `owner.key`. A second call for the same entry point, or a call for a slot
    /// that does not hold a method, changes nothing.
    pub fn wrap(&self, owner: &MethodTable, key: &str) -> WrapOutcome {
        self.wrap_with_hook(owner, key, None)
    }

    /// Wraps every callable slot of `owner` independently.
    pub fn wrap_all(&self, owner: &MethodTable) -> Vec<(String, WrapOutcome)> {
        owner
            .keys()
            .into_iter()
            .map(|key| {
                let outcome = self.wrap(owner, &key);
                (key, outcome)
            })
            .collect()
    }

    pub(crate) fn wrap_with_hook(&self, owner: &MethodTable, key: &str, hook: Option<PreCallHook>) -> WrapOutcome {
        let Some(original) = owner.method(key) else {
            event!("Skipping {}.{key}: not callable", owner.id());
            return WrapOutcome::NotCallable;
        };
        if !self.registry.lock().unwrap_or_else(PoisonError::into_inner).register(owner.id(), key) {
            return WrapOutcome::AlreadyWrapped;
        }
        let harness = self.clone();
        owner.set_method(
            key,
            Arc::new(move |args: &[HostValue]| {
                if let Some(hook) = &hook {
                    hook();
                }
                harness.run_with_overrides(&original, args)
            }),
        );
        log!("Wrapped {}.{key}", owner.id());
        WrapOutcome::Installed
    }

    /// Calls `original` with the corrected airspeed in place and restores the previous
    /// values before returning. If `original` fails it is called once more on the restored
    /// state and that result is returned instead. Without flight state the call passes
    /// straight through.
    pub fn run_with_overrides(&self, original: &HostMethod, args: &[HostValue]) -> HostCallResult {
        let calc = &self.calc;
        let interceptor = Interceptor::new(&*self.host, &OVERRIDDEN_FIELDS, || calc.indicated_airspeed());
        let Some(guard) = interceptor.engage() else {
            return original(args);
        };
        event!("Override active: {:.1} kt, saved {:?}", guard.value(), guard.snapshot());
        let result = original(args);
        guard.restore();
        result.or_else(|e| {
            warn!("Intercepted call failed ({e}), retrying without override");
            original(args)
        })
    }
}
