//! Countdown state for a timed attempt.
//!
//! This is the pure half of the timer: it knows how many seconds are left and
//! guarantees the expiry signal is produced once. Scheduling the ticks is the
//! job of the services layer.

use std::fmt;

/// Remaining-time threshold at or below which the timer turns `Warning`.
pub const WARNING_THRESHOLD_SECS: u32 = 5 * 60;
/// Remaining-time threshold at or below which the timer turns `Danger`.
pub const DANGER_THRESHOLD_SECS: u32 = 60;

/// Outcome of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; carries the new remaining value (always > 0).
    Running(u32),
    /// Remaining just reached zero. Produced exactly once.
    Expired,
    /// Already expired earlier; nothing to do.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    expired: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(budget_secs: u32) -> Self {
        Self {
            remaining: budget_secs,
            expired: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

/// Formats whole seconds as zero-padded `MM:SS`.
#[must_use]
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Normal,
    Warning,
    Danger,
}

impl Severity {
    #[must_use]
    pub fn classify(remaining_secs: u32) -> Self {
        if remaining_secs <= DANGER_THRESHOLD_SECS {
            Severity::Danger
        } else if remaining_secs <= WARNING_THRESHOLD_SECS {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::classify(301), Severity::Normal);
        assert_eq!(Severity::classify(300), Severity::Warning);
        assert_eq!(Severity::classify(61), Severity::Warning);
        assert_eq!(Severity::classify(60), Severity::Danger);
        assert_eq!(Severity::classify(0), Severity::Danger);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn expires_exactly_once_and_never_goes_negative() {
        let budget = 3;
        let mut countdown = Countdown::new(budget);
        let ticks: Vec<Tick> = (0..6).map(|_| countdown.tick()).collect();

        assert_eq!(
            ticks,
            vec![
                Tick::Running(2),
                Tick::Running(1),
                Tick::Expired,
                Tick::Idle,
                Tick::Idle,
                Tick::Idle,
            ]
        );
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn zero_budget_expires_on_first_tick() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 0);
    }
}
