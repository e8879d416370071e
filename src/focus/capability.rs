use std::sync::{Arc, RwLock};

/// Result of asking the host to change its pause state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The host applied the change synchronously.
    Applied,
    /// The host accepted the request but completes it over several steps
    /// (e.g. a fade-out); the caller learns the result by polling
    /// `is_paused` later.
    InFlight,
    /// The capability is absent or the call failed. Never an error.
    Unavailable,
}

impl PauseOutcome {
    pub fn accepted(self) -> bool {
        matches!(self, PauseOutcome::Applied | PauseOutcome::InFlight)
    }
}

/// Ability to query and drive the host's pause state.
///
/// Implementations swallow every probing failure at this boundary: a failed
/// query reports `false` ("assume not paused") and a failed request reports
/// `Unavailable`.
pub trait PauseCapability: Send + Sync {
    fn is_paused(&self) -> bool;
    fn request_pause(&self) -> PauseOutcome;
    fn request_unpause(&self) -> PauseOutcome;
}

/// Ability to mute the host's audio output. Fire-and-forget.
pub trait MuteCapability: Send + Sync {
    fn set_muted(&self, muted: bool);
}

/// Late-binding slots for the host's pause and mute implementations.
///
/// The host's control objects may not exist yet when the controller starts,
/// so capabilities are bound whenever they become available and every
/// operation degrades to a safe no-op while a slot is empty. Rebinding
/// replaces the previous implementation.
pub struct HostCapabilities {
    pause: RwLock<Option<Arc<dyn PauseCapability>>>,
    mute: RwLock<Option<Arc<dyn MuteCapability>>>,
}

impl HostCapabilities {
    pub fn new() -> Self {
        Self {
            pause: RwLock::new(None),
            mute: RwLock::new(None),
        }
    }

    pub fn bind_pause(&self, capability: Arc<dyn PauseCapability>) {
        match self.pause.write() {
            Ok(mut slot) => *slot = Some(capability),
            Err(poisoned) => *poisoned.into_inner() = Some(capability),
        }
        log::info!("Pause capability bound");
    }

    pub fn bind_mute(&self, capability: Arc<dyn MuteCapability>) {
        match self.mute.write() {
            Ok(mut slot) => *slot = Some(capability),
            Err(poisoned) => *poisoned.into_inner() = Some(capability),
        }
        log::info!("Mute capability bound");
    }

    fn pause_slot(&self) -> Option<Arc<dyn PauseCapability>> {
        match self.pause.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn mute_slot(&self) -> Option<Arc<dyn MuteCapability>> {
        match self.mute.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseCapability for HostCapabilities {
    fn is_paused(&self) -> bool {
        self.pause_slot().map(|cap| cap.is_paused()).unwrap_or(false)
    }

    fn request_pause(&self) -> PauseOutcome {
        match self.pause_slot() {
            Some(cap) => cap.request_pause(),
            None => {
                log::debug!("Pause capability not bound; pause request dropped");
                PauseOutcome::Unavailable
            }
        }
    }

    fn request_unpause(&self) -> PauseOutcome {
        match self.pause_slot() {
            Some(cap) => cap.request_unpause(),
            None => {
                log::debug!("Pause capability not bound; unpause request dropped");
                PauseOutcome::Unavailable
            }
        }
    }
}

impl MuteCapability for HostCapabilities {
    fn set_muted(&self, muted: bool) {
        match self.mute_slot() {
            Some(cap) => cap.set_muted(muted),
            None => log::debug!("Mute capability not bound; ignoring set_muted({})", muted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubPause {
        paused: AtomicBool,
        requests: AtomicUsize,
    }

    impl PauseCapability for StubPause {
        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }

        fn request_pause(&self) -> PauseOutcome {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.paused.store(true, Ordering::SeqCst);
            PauseOutcome::Applied
        }

        fn request_unpause(&self) -> PauseOutcome {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.paused.store(false, Ordering::SeqCst);
            PauseOutcome::Applied
        }
    }

    #[derive(Default)]
    struct StubMute {
        last: AtomicBool,
        calls: AtomicUsize,
    }

    impl MuteCapability for StubMute {
        fn set_muted(&self, muted: bool) {
            self.last.store(muted, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_unbound_slots_degrade_to_safe_defaults() {
        let caps = HostCapabilities::new();

        assert!(!caps.is_paused());
        assert_eq!(caps.request_pause(), PauseOutcome::Unavailable);
        assert_eq!(caps.request_unpause(), PauseOutcome::Unavailable);

        // Must not panic with no mute bound.
        caps.set_muted(true);
    }

    #[test]
    fn test_bound_slots_delegate() {
        let caps = HostCapabilities::new();
        let pause = Arc::new(StubPause::default());
        let mute = Arc::new(StubMute::default());

        caps.bind_pause(pause.clone());
        caps.bind_mute(mute.clone());

        assert_eq!(caps.request_pause(), PauseOutcome::Applied);
        assert!(caps.is_paused());
        assert!(pause.is_paused());

        caps.set_muted(true);
        assert!(mute.last.load(Ordering::SeqCst));
        assert_eq!(mute.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rebinding_replaces_previous_implementation() {
        let caps = HostCapabilities::new();
        let first = Arc::new(StubPause::default());
        let second = Arc::new(StubPause::default());

        caps.bind_pause(first.clone());
        caps.request_pause();
        assert_eq!(first.requests.load(Ordering::SeqCst), 1);

        caps.bind_pause(second.clone());
        caps.request_pause();
        assert_eq!(first.requests.load(Ordering::SeqCst), 1);
        assert_eq!(second.requests.load(Ordering::SeqCst), 1);
    }
}
