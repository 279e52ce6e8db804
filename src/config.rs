use std::{env, time::Duration};

/// Timer periods of the harness and of the bundled simulated host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Period of the initialization probe while waiting for the host.
    probe_interval: Duration,
    /// Period of the telemetry overlay refresh.
    refresh_interval: Duration,
    /// Frame period of the simulated host driven by `main`.
    demo_frame_interval: Duration,
}

impl HarnessConfig {
    const DEF_PROBE_INTERVAL: Duration = Duration::from_millis(1000);
    const DEF_REFRESH_INTERVAL: Duration = Duration::from_millis(100);
    const DEF_FRAME_INTERVAL: Duration = Duration::from_millis(50);

    pub const PROBE_VAR: &'static str = "IAS_PROBE_MS";
    pub const REFRESH_VAR: &'static str = "IAS_REFRESH_MS";
    pub const FRAME_VAR: &'static str = "IAS_FRAME_MS";

    pub fn new(probe_interval: Duration, refresh_interval: Duration, demo_frame_interval: Duration) -> Self {
        Self { probe_interval, refresh_interval, demo_frame_interval }
    }

    /// Reads the millisecond overrides from the environment, keeping the
    /// default for every variable that is unset, unparsable or zero.
    pub fn from_env() -> Self {
        Self {
            probe_interval: Self::millis_var(Self::PROBE_VAR, Self::DEF_PROBE_INTERVAL),
            refresh_interval: Self::millis_var(Self::REFRESH_VAR, Self::DEF_REFRESH_INTERVAL),
            demo_frame_interval: Self::millis_var(Self::FRAME_VAR, Self::DEF_FRAME_INTERVAL),
        }
    }

    fn millis_var(name: &str, default: Duration) -> Duration {
        Self::parse_millis(env::var(name).ok().as_deref()).unwrap_or(default)
    }

    fn parse_millis(raw: Option<&str>) -> Option<Duration> {
        raw.and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn probe_interval(&self) -> Duration { self.probe_interval }
    pub fn refresh_interval(&self) -> Duration { self.refresh_interval }
    pub fn demo_frame_interval(&self) -> Duration { self.demo_frame_interval }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(
            Self::DEF_PROBE_INTERVAL,
            Self::DEF_REFRESH_INTERVAL,
            Self::DEF_FRAME_INTERVAL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::HarnessConfig;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_host_timing() {
        let config = HarnessConfig::default();
        assert_eq!(config.probe_interval(), Duration::from_millis(1000));
        assert_eq!(config.refresh_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_parse_millis_rejects_garbage_and_zero() {
        assert_eq!(HarnessConfig::parse_millis(Some(" 250 ")), Some(Duration::from_millis(250)));
        assert_eq!(HarnessConfig::parse_millis(Some("0")), None);
        assert_eq!(HarnessConfig::parse_millis(Some("fast")), None);
        assert_eq!(HarnessConfig::parse_millis(None), None);
    }
}
