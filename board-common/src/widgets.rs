//! The widgets embedded in the attempt board. The board invokes them but their
//! internals (countdown, vote aggregation) belong to whoever supplies them.

use core::{
    fmt::{Display, Formatter},
    time::Duration,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerRole {
    Athlete,
    Break,
}

impl Display for TimerRole {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match *self {
            TimerRole::Athlete => write!(f, "Athlete Timer"),
            TimerRole::Break => write!(f, "Break Timer"),
        }
    }
}

/// What a timer currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockReading {
    /// No end time, shown as `--:--`
    Indefinite,
    Remaining { secs: u32, running: bool },
}

impl Default for ClockReading {
    fn default() -> Self {
        Self::Remaining {
            secs: 0,
            running: false,
        }
    }
}

pub trait TimerWidget {
    fn start(&mut self);

    fn stop(&mut self);

    /// Stop and go back to the last time set
    fn reset(&mut self);

    /// Stops the timer and sets the time it counts down from. `None` makes it indefinite.
    fn set_time(&mut self, time: Option<Duration>);

    fn reading(&self) -> ClockReading;
}

/// Signals emitted by the decision widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSignal {
    /// The bar is down, decision lights are about to be shown
    Down,
    /// The decision has been displayed long enough
    Hide,
}

/// Referee lights. `Some(true)` is a good lift, `Some(false)` a no-lift and
/// `None` a referee who has not decided yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionLights {
    pub refs: [Option<bool>; 3],
    pub decision: Option<bool>,
    pub down: bool,
}

impl DecisionLights {
    /// Starts a new decision, dropping any lights left from the previous lift
    pub fn down(&mut self) -> DecisionSignal {
        self.refs = [None; 3];
        self.decision = None;
        self.down = true;
        DecisionSignal::Down
    }

    pub fn set(&mut self, refs: [Option<bool>; 3], decision: Option<bool>) {
        self.refs = refs;
        self.decision = decision;
    }

    pub fn reset(&mut self) -> DecisionSignal {
        *self = Self::default();
        DecisionSignal::Hide
    }

    /// Lights in the left to right order seen by the viewer. Athletes face the
    /// referees, so the athlete-facing board mirrors the public one.
    pub fn ordered(&self, public_facing: bool) -> [Option<bool>; 3] {
        let mut refs = self.refs;
        if !public_facing {
            refs.reverse();
        }
        refs
    }
}
