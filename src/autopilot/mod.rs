//! Autopilot corrections: target alignment on engagement and the knots/Mach switch.

mod mode_conversion;
mod speed_mode;
pub(crate) mod ui;
mod update_override;

pub use mode_conversion::{ConversionOutcome, SpeedModeConverter};
pub use speed_mode::SpeedMode;
pub use update_override::{AutopilotUpdateOverride, EngagementEdge};
