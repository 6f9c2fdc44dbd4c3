//! Autoplay gate: `Locked -> Unlocking -> Active`.
//!
//! Browsers refuse audio output until the page has seen a user gesture, and
//! resuming the audio context is asynchronous and may fail or never settle.
//! This machine only decides *when* to ask for a resume; the host performs
//! the request and reports back with the attempt id it was given.
//!
//! Input handlers stay attached for the whole session and call
//! [`AudioUnlock::handle_input`]; the state guard makes the first transition
//! happen exactly once no matter how many events race in the same tick.

use crate::constants::{MAX_RESUME_ATTEMPTS, RESUME_RETRY_DELAY_SEC, RESUME_TIMEOUT_SEC};
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnlockState {
    Locked,
    Unlocking,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    PointerMove,
    PointerDown,
    KeyDown,
    Click,
}

/// Which user inputs count as the unlocking gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum UnlockTrigger {
    Any(SmallVec<[InputKind; 4]>),
    Only(InputKind),
}

impl UnlockTrigger {
    /// Start on the first pointer move, pointer press or key press.
    pub fn first_interaction() -> Self {
        UnlockTrigger::Any(smallvec![
            InputKind::PointerMove,
            InputKind::PointerDown,
            InputKind::KeyDown
        ])
    }

    /// Start only when the enter screen is clicked.
    pub fn click_to_enter() -> Self {
        UnlockTrigger::Only(InputKind::Click)
    }

    pub fn accepts(&self, kind: InputKind) -> bool {
        match self {
            UnlockTrigger::Any(kinds) => kinds.contains(&kind),
            UnlockTrigger::Only(k) => *k == kind,
        }
    }
}

impl Default for UnlockTrigger {
    fn default() -> Self {
        Self::first_interaction()
    }
}

/// Bounded retry for resume requests that fail or hang.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResumePolicy {
    pub timeout_sec: f64,
    pub retry_delay_sec: f64,
    pub max_attempts: u32,
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self {
            timeout_sec: RESUME_TIMEOUT_SEC,
            retry_delay_sec: RESUME_RETRY_DELAY_SEC,
            max_attempts: MAX_RESUME_ATTEMPTS,
        }
    }
}

/// What the host should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockStep {
    /// Call resume on the platform audio context and report the outcome
    /// with this attempt id.
    Resume { attempt: u32 },
    /// Retries are exhausted; offer the user an explicit control.
    Stalled,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    attempt: u32,
    started_at: f64,
}

#[derive(Clone, Debug)]
pub struct AudioUnlock {
    state: UnlockState,
    trigger: UnlockTrigger,
    policy: ResumePolicy,
    last_attempt: u32,
    attempts_in_series: u32,
    pending: Option<Pending>,
    retry_at: Option<f64>,
    stalled: bool,
}

impl AudioUnlock {
    pub fn new(trigger: UnlockTrigger, policy: ResumePolicy) -> Self {
        Self {
            state: UnlockState::Locked,
            trigger,
            policy,
            last_attempt: 0,
            attempts_in_series: 0,
            pending: None,
            retry_at: None,
            stalled: false,
        }
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Total resume requests issued so far.
    pub fn attempts(&self) -> u32 {
        self.last_attempt
    }

    /// A user input arrived. Returns a resume request the first time a
    /// qualifying input is seen, and again only when retries have stalled.
    pub fn handle_input(&mut self, kind: InputKind, now: f64) -> Option<UnlockStep> {
        if !self.trigger.accepts(kind) {
            return None;
        }
        match self.state {
            UnlockState::Locked => {
                self.state = UnlockState::Unlocking;
                log::info!("[audio] unlock requested by {:?}", kind);
                Some(self.begin_series(now))
            }
            UnlockState::Unlocking if self.stalled => Some(self.begin_series(now)),
            _ => None,
        }
    }

    /// Explicit user request (fallback control) to try again while unlocking.
    pub fn retry_now(&mut self, now: f64) -> Option<UnlockStep> {
        match self.state {
            UnlockState::Unlocking if self.pending.is_none() => Some(self.begin_series(now)),
            _ => None,
        }
    }

    /// The platform confirmed output is running. Any attempt may confirm,
    /// including one that already timed out. Returns true on the transition.
    pub fn resume_succeeded(&mut self, attempt: u32) -> bool {
        if self.state != UnlockState::Unlocking {
            return false;
        }
        log::info!("[audio] context resumed (attempt {})", attempt);
        self.state = UnlockState::Active;
        self.pending = None;
        self.retry_at = None;
        self.stalled = false;
        true
    }

    /// The platform rejected the attempt. Stale attempts are ignored.
    pub fn resume_failed(&mut self, attempt: u32, now: f64) -> Option<UnlockStep> {
        if self.state != UnlockState::Unlocking {
            return None;
        }
        match self.pending {
            Some(p) if p.attempt == attempt => {
                log::warn!("[audio] resume attempt {} failed", attempt);
                self.pending = None;
                self.schedule_retry(now, self.policy.retry_delay_sec)
            }
            _ => None,
        }
    }

    /// Called once per frame: times out hung attempts and fires due retries.
    pub fn poll(&mut self, now: f64) -> Option<UnlockStep> {
        if self.state != UnlockState::Unlocking || self.stalled {
            return None;
        }
        if let Some(p) = self.pending {
            if now - p.started_at >= self.policy.timeout_sec {
                log::warn!(
                    "[audio] resume attempt {} unresolved after {:.1}s",
                    p.attempt,
                    self.policy.timeout_sec
                );
                self.pending = None;
                return self.schedule_retry(now, 0.0);
            }
            return None;
        }
        match self.retry_at {
            Some(at) if now >= at => {
                self.retry_at = None;
                Some(self.issue(now))
            }
            _ => None,
        }
    }

    fn begin_series(&mut self, now: f64) -> UnlockStep {
        self.stalled = false;
        self.retry_at = None;
        self.attempts_in_series = 0;
        self.issue(now)
    }

    fn issue(&mut self, now: f64) -> UnlockStep {
        self.last_attempt += 1;
        self.attempts_in_series += 1;
        self.pending = Some(Pending {
            attempt: self.last_attempt,
            started_at: now,
        });
        UnlockStep::Resume {
            attempt: self.last_attempt,
        }
    }

    fn schedule_retry(&mut self, now: f64, delay: f64) -> Option<UnlockStep> {
        if self.attempts_in_series >= self.policy.max_attempts {
            log::warn!(
                "[audio] giving up after {} resume attempts; waiting for user",
                self.attempts_in_series
            );
            self.stalled = true;
            return Some(UnlockStep::Stalled);
        }
        if delay <= 0.0 {
            return Some(self.issue(now));
        }
        self.retry_at = Some(now + delay);
        None
    }
}
