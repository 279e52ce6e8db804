use crate::flight_data::AirspeedCalculator;
use crate::host::Host;
use crate::interception::InterceptionHarness;
use crate::overlay::TelemetryOverlay;
use std::sync::Arc;

/// Struct bundling the installed subsystems of the harness, handed out once the
/// host is ready.
#[derive(Clone)]
pub struct Keychain {
    /// The host all subsystems operate on.
    host: Arc<dyn Host>,
    /// Corrected indicated airspeed source shared by every subsystem.
    calc: AirspeedCalculator,
    /// The harness owning the registry of wrapped entry points.
    harness: InterceptionHarness,
    /// The telemetry panel.
    overlay: TelemetryOverlay,
}

impl Keychain {
    /// Creates the subsystems for `host`. Nothing is installed on the host yet.
    ///
    /// # Arguments
    /// - `host`: The loaded host every subsystem reads from and installs into.
    ///
    /// # Returns
    /// A new `Keychain` whose subsystems share one `AirspeedCalculator`.
    pub fn new(host: Arc<dyn Host>) -> Self {
        let calc = AirspeedCalculator::new(Arc::clone(&host));
        let harness = InterceptionHarness::new(Arc::clone(&host), calc.clone());
        let overlay = TelemetryOverlay::new(Arc::clone(&host), calc.clone());
        Self { host, calc, harness, overlay }
    }

    /// Provides a cloned reference to the host.
    pub fn host(&self) -> Arc<dyn Host> { Arc::clone(&self.host) }

    /// Provides the corrected indicated airspeed source.
    pub fn calc(&self) -> &AirspeedCalculator { &self.calc }

    /// Provides the harness that owns the wrapped entry points.
    pub fn harness(&self) -> &InterceptionHarness { &self.harness }

    /// Provides the telemetry panel.
    pub fn overlay(&self) -> &TelemetryOverlay { &self.overlay }
}
