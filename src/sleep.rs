//! Idle tracking and screen sleep.
//!
//! Two states, evaluated on the main loop tick:
//!
//! ```text
//!            idle > timeout
//!   Awake ───────────────────▶ Asleep
//!     ▲                          │
//!     └──────── touch / wake ────┘
//! ```
//!
//! The tracker only decides *when* to switch; the caller turns the backlight
//! off or restores it.

/// Power state of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Awake,
    Asleep,
}

/// Last-interaction clock plus the two-state sleep machine.
pub struct ActivityTracker {
    state: PowerState,
    last_activity_ms: u64,
    timeout_ms: u64,
}

impl ActivityTracker {
    /// Start awake, with `now_ms` as the last interaction.
    pub const fn new(
        now_ms: u64,
        timeout_ms: u64,
    ) -> Self {
        Self {
            state: PowerState::Awake,
            last_activity_ms: now_ms,
            timeout_ms,
        }
    }

    #[inline]
    pub const fn state(&self) -> PowerState { self.state }

    #[inline]
    pub const fn is_awake(&self) -> bool { matches!(self.state, PowerState::Awake) }

    #[inline]
    pub const fn last_activity_ms(&self) -> u64 { self.last_activity_ms }

    /// Milliseconds since the last interaction.
    #[inline]
    pub const fn idle_ms(
        &self,
        now_ms: u64,
    ) -> u64 {
        now_ms.saturating_sub(self.last_activity_ms)
    }

    /// Record an interaction. Wakes the screen if it was asleep.
    ///
    /// Returns `true` if this call woke the screen.
    pub fn record_activity(
        &mut self,
        now_ms: u64,
    ) -> bool {
        self.last_activity_ms = now_ms;
        if self.is_awake() {
            false
        } else {
            self.state = PowerState::Awake;
            true
        }
    }

    /// Explicit wake (wake tap). Same as [`record_activity`](Self::record_activity).
    #[inline]
    pub fn wake(
        &mut self,
        now_ms: u64,
    ) -> bool {
        self.record_activity(now_ms)
    }

    /// Evaluate the idle timeout.
    ///
    /// Returns `true` on the tick the screen goes to sleep.
    pub fn check_timeout(
        &mut self,
        now_ms: u64,
    ) -> bool {
        if self.is_awake() && self.idle_ms(now_ms) > self.timeout_ms {
            self.state = PowerState::Asleep;
            true
        } else {
            false
        }
    }
}
