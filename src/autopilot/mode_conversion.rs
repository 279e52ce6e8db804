use super::{SpeedMode, ui};
use crate::flight_data::{PhysicsAdapter, PhysicsFactors};
use crate::host::{AutopilotAccess, Host, HostValue};
use crate::{error, info, warn};
use std::sync::Arc;
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq)]
pub enum ConversionOutcome {
    /// Requested mode is already active.
    Unchanged,
    Converted { from: f64, to: f64 },
    /// The autopilot refused the new target value; the mode stays as it was.
    TargetUnavailable,
    /// The autopilot refused the new mode; the previous target value is back in place.
    ModeRejected,
}

/// Replacement for the host autopilot's knots/Mach switch that converts the target
/// value with the local density ratio and speed of sound instead of sea-level values.
pub struct SpeedModeConverter {
    host: Arc<dyn Host>,
    physics: PhysicsAdapter,
}

impl SpeedModeConverter {
    pub const ENTRY_POINT: &'static str = "setSpeedMode";

    /// Creates a converter. Nothing is replaced until [`SpeedModeConverter::install`].
    ///
    /// # Arguments
    /// - `host`: The host whose autopilot target and mode are converted.
    /// - `physics`: Atmosphere source, read fresh on every switch.
    pub fn new(host: Arc<dyn Host>, physics: PhysicsAdapter) -> Self { Self { host, physics } }

    /// Indicated airspeed to Mach, rounded to three decimals.
    pub fn knots_to_mach(ias: f64, factors: &PhysicsFactors) -> f64 {
        let mach = (ias / factors.density_ratio) / factors.speed_of_sound_knots;
        if mach.is_finite() { (mach * 1000.0).round() / 1000.0 } else { 0.0 }
    }

    /// Mach to indicated airspeed, rounded to whole knots.
    pub fn mach_to_knots(mach: f64, factors: &PhysicsFactors) -> f64 {
        let ias = (mach * factors.speed_of_sound_knots) * factors.density_ratio;
        if ias.is_finite() { ias.round() } else { 0.0 }
    }

    /// Switches the autopilot to `new_mode`, converting its target value with the
    /// current atmosphere.
    ///
    /// # Arguments
    /// - `new_mode`: The representation the target value should be held in.
    ///
    /// # Returns
    /// `ConversionOutcome::Converted` carrying the old and new target value, or why
    /// nothing changed. An absent target converts as `0`.
    pub fn set_speed_mode(&self, new_mode: SpeedMode) -> ConversionOutcome {
        let current_mode = self.host.speed_mode().unwrap_or_default();
        if new_mode == current_mode {
            return ConversionOutcome::Unchanged;
        }
        let factors = self.physics.factors();
        let previous = self.host.target_value();
        let from = previous.unwrap_or(0.0);
        let to = match new_mode {
            SpeedMode::Mach => Self::knots_to_mach(from, &factors),
            SpeedMode::Knots => Self::mach_to_knots(from, &factors),
        };
        if let Err(e) = self.host.set_target_value(to) {
            warn!("Speed mode switch to {new_mode} skipped: {e}");
            return ConversionOutcome::TargetUnavailable;
        }
        if let Err(e) = self.host.set_speed_mode(new_mode) {
            warn!("Speed mode switch to {new_mode} rejected: {e}");
            if let Some(value) = previous {
                if let Err(e) = self.host.set_target_value(value) {
                    error!("Could not restore target value {value}: {e}");
                }
            }
            return ConversionOutcome::ModeRejected;
        }
        ui::show_speed_mode(&*self.host, new_mode, to);
        match new_mode {
            SpeedMode::Mach => info!("Mode -> Mach. IAS {from} -> M{to:.3}"),
            SpeedMode::Knots => info!("Mode -> Speed. M{from} -> IAS {to:.0}"),
        }
        ConversionOutcome::Converted { from, to }
    }

    /// Replaces the autopilot's mode switch entry point. `false` without an autopilot.
    pub fn install(self) -> bool {
        let Some(owner) = self.host.autopilot_methods() else {
            return false;
        };
        let this = Arc::new(self);
        owner.set_method(
            Self::ENTRY_POINT,
            Arc::new(move |args: &[HostValue]| {
                let mode = args.first().and_then(HostValue::as_text).map_or(SpeedMode::Knots, SpeedMode::from);
                this.set_speed_mode(mode);
                Ok(HostValue::Undefined)
            }),
        );
        true
    }
}
