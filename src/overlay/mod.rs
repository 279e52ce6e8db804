//! Floating telemetry panel showing corrected and raw host air data.

mod drag;
mod telemetry_overlay;

pub use drag::PanelDrag;
pub use telemetry_overlay::{
    ALT_ID, GS_ID, IAS_ID, MACH_ID, MACH_PLACEHOLDER, PANEL_ID, PLACEHOLDER, TAS_ID, TelemetryOverlay,
    TelemetryReadout, format_value,
};
