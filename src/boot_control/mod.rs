//! One-shot initialization: `Uninitialized -> Polling -> Ready`.

mod boot_state;
mod bootstrap;
#[cfg(test)]
mod tests;

pub use boot_state::{BootSignal, BootState, InstallReport};
pub use bootstrap::Bootstrap;
