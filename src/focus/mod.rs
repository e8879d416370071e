//! Focus reaction core.
//!
//! Decides, on each focus-lost/focus-gained transition, whether to pause the
//! host, whether to mute it, whether to arm the auto-unpause deadline, and
//! whether a later refocus should be honored as a resume trigger. The host
//! itself is reached only through the abstract capability traits in
//! [`capability`].

pub mod capability;
pub mod controller;

pub use capability::{HostCapabilities, MuteCapability, PauseCapability, PauseOutcome};
pub use controller::{ControllerStatus, FocusReactionController};
