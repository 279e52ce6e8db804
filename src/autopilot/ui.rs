use super::SpeedMode;
use crate::event;
use crate::host::UiSurface;

/// Autopilot speed input of the host page.
pub const SPEED_INPUT: &str = ".geofs-autopilot-speed-input";
pub const KNOTS_INPUT: &str = ".geofs-autopilot-knots";
pub const MACH_INPUT: &str = ".geofs-autopilot-mach";
pub const SWITCH_LEFT: &str = ".geofs-speed-mode .switchLeft";
pub const SWITCH_RIGHT: &str = ".geofs-speed-mode .switchRight";
/// Marks the input the host reads the target value from.
pub const VALUE_CLASS: &str = "numberValue";
/// Highlights the active half of the knots/Mach switch.
pub const ACTIVE_CLASS: &str = "green-pad";

/// Shows `value` in the input belonging to `mode` and flips the knots/Mach switch to it.
pub fn show_speed_mode<U: UiSurface + ?Sized>(ui: &U, mode: SpeedMode, value: f64) {
    let (active, inactive) = match mode {
        SpeedMode::Knots => (KNOTS_INPUT, MACH_INPUT),
        SpeedMode::Mach => (MACH_INPUT, KNOTS_INPUT),
    };
    let text = format!("{value:.prec$}", prec = mode.decimals());
    let updated = ui.set_element_class(active, VALUE_CLASS, true)
        & ui.set_element_value(active, &text)
        & ui.set_element_class(inactive, VALUE_CLASS, false)
        & ui.set_element_class(SWITCH_LEFT, ACTIVE_CLASS, mode == SpeedMode::Knots)
        & ui.set_element_class(SWITCH_RIGHT, ACTIVE_CLASS, mode == SpeedMode::Mach);
    if !updated {
        event!("Speed mode controls incomplete, UI only partially updated");
    }
}

/// Shows the rounded target speed in the autopilot speed input.
pub fn show_target_speed<U: UiSurface + ?Sized>(ui: &U, knots: f64) {
    if !ui.set_element_value(SPEED_INPUT, &format!("{}", knots.round())) {
        event!("Autopilot speed input not present");
    }
}
