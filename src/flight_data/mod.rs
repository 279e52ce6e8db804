//! Air data derived from the host's atmosphere and animation values.

mod airspeed;
mod physics;

pub use airspeed::AirspeedCalculator;
pub use physics::{AtmosphereSample, PhysicsAdapter, PhysicsFactors};

/// Metres per second to knots.
pub const MPS_TO_KNOTS: f64 = 1.94384;
