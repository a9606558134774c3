//! Check-in countdown.
//!
//! The user starts a timer when heading somewhere; if they do not cancel it
//! before it runs out, the caller raises an SOS. The timer holds no clock of
//! its own: every call takes `now`, so it can be driven by an interval task
//! or by tests alike.

use chrono::{DateTime, Duration, Utc};

use crate::SosError;

/// Countdown length shown before a timer is started, in seconds.
pub const DEFAULT_CHECK_IN_SECS: u64 = 300;

/// What [`CheckInTimer::poll`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown in progress.
    Idle,
    /// Counting down.
    Running {
        /// Whole seconds left, rounded up.
        remaining_secs: u64,
    },
    /// The countdown just ran out. Reported once; the timer is idle again
    /// afterwards.
    Expired,
}

/// A single-shot check-in countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInTimer {
    deadline: Option<DateTime<Utc>>,
    seconds_left: u64,
}

impl Default for CheckInTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckInTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadline: None,
            seconds_left: DEFAULT_CHECK_IN_SECS,
        }
    }

    /// Starts a countdown of `minutes`, returning its deadline.
    ///
    /// # Errors
    ///
    /// * [`SosError::InvalidDuration`] if `minutes` is zero
    /// * [`SosError::TimerAlreadyRunning`] if a countdown is in progress
    pub fn start(&mut self, minutes: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>, SosError> {
        if self.deadline.is_some() {
            return Err(SosError::TimerAlreadyRunning);
        }
        if minutes == 0 {
            return Err(SosError::InvalidDuration { minutes });
        }

        let total_secs = u64::from(minutes) * 60;
        let deadline = now + Duration::minutes(i64::from(minutes));

        self.deadline = Some(deadline);
        self.seconds_left = total_secs;

        log::info!("Check-in timer started for {minutes} minutes");

        Ok(deadline)
    }

    /// Advances the countdown to `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> TimerState {
        let Some(deadline) = self.deadline else {
            return TimerState::Idle;
        };

        let remaining_ms = deadline.signed_duration_since(now).num_milliseconds();
        if remaining_ms <= 0 {
            log::warn!("Check-in timer expired");
            self.reset();
            return TimerState::Expired;
        }

        let remaining_secs = remaining_ms.unsigned_abs().div_ceil(1000);
        self.seconds_left = remaining_secs;

        TimerState::Running { remaining_secs }
    }

    /// Stops the countdown without expiring it.
    pub fn cancel(&mut self) {
        if self.deadline.is_some() {
            log::info!("Check-in timer cancelled");
        }
        self.reset();
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Seconds left as of the last [`poll`](Self::poll), or the default
    /// countdown length when idle.
    #[must_use]
    pub const fn seconds_left(&self) -> u64 {
        self.seconds_left
    }

    const fn reset(&mut self) {
        self.deadline = None;
        self.seconds_left = DEFAULT_CHECK_IN_SECS;
    }
}

/// Formats seconds as `m:ss`.
#[must_use]
pub fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
