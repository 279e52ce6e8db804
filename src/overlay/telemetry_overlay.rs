use crate::flight_data::{AirspeedCalculator, MPS_TO_KNOTS};
use crate::host::{FlightField, FlightStateAccess, Host, PanelSpec, UiSurface};
use crate::{event, log};
use itertools::Itertools;
use std::{sync::Arc, time::Duration};

pub const PANEL_ID: &str = "geofs-flight-data-display";
pub const IAS_ID: &str = "fd-ias";
pub const TAS_ID: &str = "fd-tas";
pub const GS_ID: &str = "fd-gs";
pub const MACH_ID: &str = "fd-mach";
pub const ALT_ID: &str = "fd-alt";
pub const PLACEHOLDER: &str = "---";
pub const MACH_PLACEHOLDER: &str = "-.---";

/// One refresh worth of displayed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReadout {
    pub ias_knots: f64,
    pub tas_knots: Option<f64>,
    pub ground_speed_knots: f64,
    pub mach: Option<f64>,
    pub altitude_ft: Option<f64>,
}

impl TelemetryReadout {
    /// `(element id, text)` for every field of the panel.
    pub fn texts(&self) -> [(&'static str, String); 5] {
        [
            (IAS_ID, format_value(Some(self.ias_knots), 0)),
            (TAS_ID, format_value(self.tas_knots, 0)),
            (GS_ID, format_value(Some(self.ground_speed_knots), 0)),
            (MACH_ID, format_value(self.mach, 3)),
            (ALT_ID, format_value(self.altitude_ft, 0)),
        ]
    }
}

/// `value` with `decimals` places, the placeholder if absent or not a finite number.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.decimals$}"))
}

/// Floating flight data panel. Reads host state, never writes it.
#[derive(Clone)]
pub struct TelemetryOverlay {
    host: Arc<dyn Host>,
    calc: AirspeedCalculator,
}

impl TelemetryOverlay {
    pub fn new(host: Arc<dyn Host>, calc: AirspeedCalculator) -> Self { Self { host, calc } }

    pub fn panel_spec() -> PanelSpec {
        PanelSpec {
            id: PANEL_ID,
            title: "FLIGHT DATA",
            left_px: 100.0,
            top_px: 100.0,
            width_px: 200.0,
            rows: vec![
                ("IAS", IAS_ID, PLACEHOLDER, "kt"),
                ("TAS", TAS_ID, PLACEHOLDER, "kt"),
                ("GS", GS_ID, PLACEHOLDER, "kt"),
                ("M", MACH_ID, MACH_PLACEHOLDER, ""),
                ("Alt", ALT_ID, PLACEHOLDER, "ft"),
            ],
        }
    }

    /// Creates the panel unless the page already has it. `true` if it was created.
    pub fn ensure_panel(&self) -> bool {
        if self.host.panel_exists(PANEL_ID) {
            return false;
        }
        self.host.create_panel(&Self::panel_spec());
        true
    }

    /// Current values, `None` while the host has no flight state.
    pub fn readout(&self) -> Option<TelemetryReadout> {
        if !self.host.has_flight_state() {
            return None;
        }
        Some(TelemetryReadout {
            ias_knots: self.calc.indicated_airspeed(),
            tas_knots: self.host.try_read(FlightField::TrueAirspeedKnots),
            ground_speed_knots: self.host.try_read(FlightField::GroundSpeedMps).unwrap_or(0.0) * MPS_TO_KNOTS,
            mach: self.host.try_read(FlightField::MachNumber),
            altitude_ft: self.host.try_read(FlightField::AltitudeFeet),
        })
    }

    /// One refresh tick: recreates a removed panel and shows the current values.
    /// Before the host has flight state the fields keep their placeholders.
    pub fn refresh(&self) -> Option<TelemetryReadout> {
        self.ensure_panel();
        let readout = self.readout()?;
        for (id, text) in readout.texts() {
            self.host.set_text(id, &text);
        }
        event!("Overlay {}", readout.texts().iter().map(|(id, t)| format!("{id}={t}")).join(" "));
        Some(readout)
    }

    /// Refreshes every `period` for the rest of the page's lifetime.
    pub async fn run(self, period: Duration) {
        log!("Overlay refresh every {} ms", period.as_millis());
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.refresh();
        }
    }
}
