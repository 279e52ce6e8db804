use crate::host::{AtmosphereAccess, AtmosphereField, Host};
use std::sync::Arc;

/// Atmosphere inputs of the host with fallbacks resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereSample {
    /// Local air density (kg/m³), `None` until the host's weather model runs.
    pub air_density_at_altitude: Option<f64>,
    /// Reference density (kg/m³), host override or [`AtmosphereSample::SEA_LEVEL_DENSITY`].
    pub sea_level_density: f64,
    /// Local static air temperature (K), `None` when the host reports none.
    pub air_temperature_kelvin: Option<f64>,
}

impl AtmosphereSample {
    pub const SEA_LEVEL_DENSITY: f64 = 1.22;

    /// Builds a sample from raw host readings. Zero, negative and non-finite inputs
    /// count as missing.
    pub fn from_raw(density: Option<f64>, sea_level_override: Option<f64>, temp_k: Option<f64>) -> Self {
        Self {
            air_density_at_altitude: usable(density),
            sea_level_density: usable(sea_level_override).unwrap_or(Self::SEA_LEVEL_DENSITY),
            air_temperature_kelvin: usable(temp_k),
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> { value.filter(|v| v.is_finite() && *v > 0.0) }

/// Ratios derived from the atmosphere, recomputed on every use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsFactors {
    /// `sqrt(rho / rho0)`, converts true to (equivalent) indicated airspeed.
    pub density_ratio: f64,
    /// Local speed of sound in knots.
    pub speed_of_sound_knots: f64,
}

impl PhysicsFactors {
    /// Knots per square-root Kelvin: `sqrt(gamma * R) / 0.514444`.
    pub const SOUND_SPEED_COEFF: f64 = 38.96785;
    /// Speed of sound at ISA sea level, in knots.
    pub const SEA_LEVEL_SOUND_KNOTS: f64 = 661.47;

    /// Factors of the ISA sea-level atmosphere.
    pub fn standard() -> Self {
        Self { density_ratio: 1.0, speed_of_sound_knots: Self::SEA_LEVEL_SOUND_KNOTS }
    }

    /// Derives the factors from `sample`. Each factor the sample lacks an input for
    /// keeps its [`PhysicsFactors::standard`] value.
    pub fn from_sample(sample: &AtmosphereSample) -> Self {
        let standard = Self::standard();
        Self {
            density_ratio: sample
                .air_density_at_altitude
                .map_or(standard.density_ratio, |rho| (rho / sample.sea_level_density).sqrt()),
            speed_of_sound_knots: sample
                .air_temperature_kelvin
                .map_or(standard.speed_of_sound_knots, |t| Self::SOUND_SPEED_COEFF * t.sqrt()),
        }
    }
}

/// Read-only view on the host's atmosphere model.
#[derive(Clone)]
pub struct PhysicsAdapter {
    host: Arc<dyn Host>,
}

impl PhysicsAdapter {
    pub fn new(host: Arc<dyn Host>) -> Self { Self { host } }

    pub fn sample(&self) -> AtmosphereSample {
        AtmosphereSample::from_raw(
            self.host.try_read_atmosphere(AtmosphereField::AirDensityAtAltitude),
            self.host.try_read_atmosphere(AtmosphereField::SeaLevelDensityOverride),
            self.host.try_read_atmosphere(AtmosphereField::AirTemperatureKelvin),
        )
    }

    pub fn factors(&self) -> PhysicsFactors { PhysicsFactors::from_sample(&self.sample()) }
}
