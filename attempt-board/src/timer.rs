use board_common::widgets::{ClockReading, TimerWidget};
use coarsetime::Instant;
use log::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped {
        clock_time: Duration,
    },
    CountingDown {
        start_time: Instant,
        time_remaining_at_start: Duration,
    },
}

impl Default for ClockState {
    fn default() -> Self {
        ClockState::Stopped {
            clock_time: Duration::default(),
        }
    }
}

impl ClockState {
    fn is_running(&self) -> bool {
        match self {
            ClockState::CountingDown { .. } => true,
            ClockState::Stopped { .. } => false,
        }
    }

    /// Saturates at zero once the time has run out
    fn clock_time(&self, now: Instant) -> Duration {
        match self {
            ClockState::CountingDown {
                start_time,
                time_remaining_at_start,
            } => {
                let elapsed: Duration = now.duration_since(*start_time).into();
                time_remaining_at_start.saturating_sub(elapsed)
            }
            ClockState::Stopped { clock_time } => *clock_time,
        }
    }
}

/// Counts down from the last time set
#[derive(Debug, Clone, Default)]
pub struct CountdownTimer {
    /// `None` while the timer has no end time
    set: Option<Duration>,
    clock_state: ClockState,
}

impl CountdownTimer {
    fn start_at(&mut self, now: Instant) {
        if self.set.is_none() {
            debug!("Not starting a timer without an end time");
            return;
        }
        if let ClockState::Stopped { clock_time } = self.clock_state {
            self.clock_state = ClockState::CountingDown {
                start_time: now,
                time_remaining_at_start: clock_time,
            };
        }
    }

    fn stop_at(&mut self, now: Instant) {
        self.clock_state = ClockState::Stopped {
            clock_time: self.clock_state.clock_time(now),
        };
    }

    fn reading_at(&self, now: Instant) -> ClockReading {
        if self.set.is_none() {
            return ClockReading::Indefinite;
        }
        let millis = self.clock_state.clock_time(now).as_millis();
        ClockReading::Remaining {
            // Round up so the clock shows 0:00 only once time is up
            secs: millis.div_ceil(1000).try_into().unwrap_or(u32::MAX),
            running: self.clock_state.is_running(),
        }
    }
}

impl TimerWidget for CountdownTimer {
    fn start(&mut self) {
        self.start_at(Instant::now());
    }

    fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    fn reset(&mut self) {
        self.clock_state = ClockState::Stopped {
            clock_time: self.set.unwrap_or_default(),
        };
    }

    fn set_time(&mut self, time: Option<Duration>) {
        self.set = time;
        self.reset();
    }

    fn reading(&self) -> ClockReading {
        self.reading_at(Instant::now())
    }
}
