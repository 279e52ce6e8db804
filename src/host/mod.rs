//! Interfaces of the host simulator as seen by the harness. The host owns all of
//! this state; the harness only holds transient references through these traits.
//! Absence is the normal state until the host has finished loading, so every read
//! is `Option`-typed and every write reports whether the target existed.

mod host_value;
mod method_table;
pub(crate) mod sim_host;

pub use host_value::{HostCallError, HostCallResult, HostError, HostValue};
pub use method_table::{HostMethod, MethodTable, OwnerId};
pub use sim_host::SimHost;

use crate::autopilot::SpeedMode;
use std::sync::Arc;
use strum_macros::Display;

/// Animation values of the aircraft, as published by the host every frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum FlightField {
    #[strum(serialize = "ktas")]
    TrueAirspeedKnots,
    #[strum(serialize = "kias")]
    IndicatedAirspeedKnots,
    #[strum(serialize = "groundSpeed")]
    GroundSpeedMps,
    #[strum(serialize = "mach")]
    MachNumber,
    #[strum(serialize = "altitude")]
    AltitudeFeet,
}

/// Inputs of the host's atmosphere model.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum AtmosphereField {
    #[strum(serialize = "airDensityAtAltitude")]
    AirDensityAtAltitude,
    #[strum(serialize = "AIR_DENSITY_SL")]
    SeaLevelDensityOverride,
    #[strum(serialize = "airTempAtAltitudeKelvin")]
    AirTemperatureKelvin,
}

pub trait FlightStateAccess: Send + Sync {
    /// `true` once the host has created its animation value object.
    fn has_flight_state(&self) -> bool;
    fn try_read(&self, field: FlightField) -> Option<f64>;
    /// Writes `value` into `field`; `None` clears the field back to "absent".
    fn write(&self, field: FlightField, value: Option<f64>) -> Result<(), HostError>;
}

pub trait AtmosphereAccess: Send + Sync {
    fn try_read_atmosphere(&self, field: AtmosphereField) -> Option<f64>;
}

/// The host autopilot. Its entry points (`update`, `setSpeedMode`) live in [`MethodTable`]
/// returned by [`AutopilotAccess::autopilot_methods`], its data behind the accessors.
pub trait AutopilotAccess: Send + Sync {
    fn autopilot_methods(&self) -> Option<Arc<MethodTable>>;
    fn engaged(&self) -> Option<bool>;
    fn target_value(&self) -> Option<f64>;
    /// Writes the autopilot's target speed (and its separate target field, where the host has one).
    fn set_target_value(&self, value: f64) -> Result<(), HostError>;
    fn speed_mode(&self) -> Option<SpeedMode>;
    fn set_speed_mode(&self, mode: SpeedMode) -> Result<(), HostError>;
}

pub trait InstrumentAccess: Send + Sync {
    /// Owner of the instrument subsystem's `update` entry point.
    fn instrument_methods(&self) -> Option<Arc<MethodTable>>;
    /// Named per-instrument render entry points.
    fn renderer_methods(&self) -> Option<Arc<MethodTable>>;
}

/// Layout of a floating panel handed to [`UiSurface::create_panel`].
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub left_px: f64,
    pub top_px: f64,
    pub width_px: f64,
    /// `(label, field element id, initial text, unit suffix)` per row.
    pub rows: Vec<(&'static str, &'static str, &'static str, &'static str)>,
}

/// The host page's UI. Selectors address existing host elements, ids address
/// elements created through this surface.
pub trait UiSurface: Send + Sync {
    /// Sets the value of every element matching `selector`; `false` if none matched.
    fn set_element_value(&self, selector: &str, value: &str) -> bool;
    /// Adds (`present`) or removes `class` on every element matching `selector`.
    fn set_element_class(&self, selector: &str, class: &str, present: bool) -> bool;
    fn panel_exists(&self, id: &str) -> bool;
    fn create_panel(&self, panel: &PanelSpec);
    fn set_text(&self, id: &str, text: &str) -> bool;
    fn move_panel(&self, id: &str, left_px: f64, top_px: f64) -> bool;
}

/// Everything the harness needs from a host.
pub trait Host: FlightStateAccess + AtmosphereAccess + AutopilotAccess + InstrumentAccess + UiSurface {}

impl<T> Host for T where T: FlightStateAccess + AtmosphereAccess + AutopilotAccess + InstrumentAccess + UiSurface
{}
