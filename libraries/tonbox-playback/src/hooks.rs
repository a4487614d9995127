//! Platform collaborator hooks
//!
//! A few commands address collaborators outside the audio core: the power
//! manager's debug voltage override and the status network interface. The
//! transport acknowledges them audibly and forwards them here; the
//! enclosing application decides what, if anything, they do.

/// Receiver for the non-audio command variants.
pub trait PlatformHooks: Send {
    /// Override the measured battery voltage (millivolts).
    fn set_debug_voltage(&mut self, millivolts: u32) {
        let _ = millivolts;
    }

    /// Bring up the status network interface.
    fn start_network(&mut self) {}

    /// Take down the status network interface.
    fn stop_network(&mut self) {}
}

/// Hooks for builds without power or network collaborators.
pub struct NoHooks;

impl PlatformHooks for NoHooks {}
