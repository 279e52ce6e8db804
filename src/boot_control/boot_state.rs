use crate::interception::WrapOutcome;
use crate::keychain::Keychain;
use strum_macros::Display;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum BootState {
    Uninitialized,
    /// Probing for the host's animation state.
    Polling,
    /// Everything installed. Terminal for the page's lifetime.
    Ready,
}

/// Result of one initialization probe.
pub enum BootSignal {
    Waiting,
    BecameReady(Keychain, InstallReport),
    AlreadyReady,
}

/// What the ready transition installed on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    pub overlay_created: bool,
    pub autopilot_update: WrapOutcome,
    pub speed_mode_replaced: bool,
    pub instruments: Vec<(String, WrapOutcome)>,
}

impl InstallReport {
    /// Number of entry points wrapped during this transition.
    pub fn wrapped(&self) -> usize {
        std::iter::once(&self.autopilot_update)
            .chain(self.instruments.iter().map(|(_, o)| o))
            .filter(|o| **o == WrapOutcome::Installed)
            .count()
    }
}
