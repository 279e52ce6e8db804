use super::physics::{PhysicsAdapter, PhysicsFactors};
use crate::host::{FlightField, FlightStateAccess, Host};
use std::sync::Arc;

/// Derives the indicated airspeed the host should have shown from its true airspeed.
#[derive(Clone)]
pub struct AirspeedCalculator {
    host: Arc<dyn Host>,
    physics: PhysicsAdapter,
}

impl AirspeedCalculator {
    /// Creates a calculator reading flight values and atmosphere from `host`.
    pub fn new(host: Arc<dyn Host>) -> Self {
        let physics = PhysicsAdapter::new(Arc::clone(&host));
        Self { host, physics }
    }

    pub fn physics(&self) -> &PhysicsAdapter { &self.physics }

    /// Corrected indicated airspeed in knots.
    ///
    /// Without a true airspeed the host's stored indicated airspeed is returned as is,
    /// and `0.0` if the host has neither, has no flight state at all, or stores a
    /// non-finite value.
    pub fn indicated_airspeed(&self) -> f64 {
        if !self.host.has_flight_state() {
            return 0.0;
        }
        let Some(tas) = self.host.try_read(FlightField::TrueAirspeedKnots) else {
            return self
                .host
                .try_read(FlightField::IndicatedAirspeedKnots)
                .filter(|kias| kias.is_finite())
                .unwrap_or(0.0);
        };
        Self::correct(tas, &self.physics.factors())
    }

    /// `tas * density_ratio`, with degenerate results mapped to `0.0`.
    pub fn correct(tas: f64, factors: &PhysicsFactors) -> f64 {
        let ias = tas * factors.density_ratio;
        if ias.is_finite() { ias } else { 0.0 }
    }
}
