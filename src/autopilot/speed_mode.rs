use strum_macros::{Display, EnumIter};

/// Representation of the autopilot's target speed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, Default)]
pub enum SpeedMode {
    /// Target value is indicated airspeed in knots.
    #[default]
    #[strum(serialize = "speed")]
    Knots,
    /// Target value is a Mach number.
    #[strum(serialize = "mach")]
    Mach,
}

impl SpeedMode {
    /// Decimal places the host displays for a target value in this mode.
    pub fn decimals(self) -> usize {
        match self {
            SpeedMode::Knots => 0,
            SpeedMode::Mach => 3,
        }
    }

    pub fn other(self) -> Self {
        match self {
            SpeedMode::Knots => SpeedMode::Mach,
            SpeedMode::Mach => SpeedMode::Knots,
        }
    }
}

impl From<&str> for SpeedMode {
    /// The host only distinguishes `"mach"`; every other name means knots.
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("mach") { SpeedMode::Mach } else { SpeedMode::Knots }
    }
}

impl From<SpeedMode> for &'static str {
    fn from(value: SpeedMode) -> Self {
        match value {
            SpeedMode::Knots => "speed",
            SpeedMode::Mach => "mach",
        }
    }
}
