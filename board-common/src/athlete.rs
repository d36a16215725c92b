use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

pub const ATTEMPTS_PER_LIFT: u8 = 3;
pub const TOTAL_ATTEMPTS: u8 = 2 * ATTEMPTS_PER_LIFT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiftKind {
    Snatch,
    CleanAndJerk,
}

impl LiftKind {
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Snatch => "SNATCH",
            Self::CleanAndJerk => "C&J",
        }
    }
}

impl Display for LiftKind {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match *self {
            Self::Snatch => write!(f, "Snatch"),
            Self::CleanAndJerk => write!(f, "Clean & Jerk"),
        }
    }
}

/// Which attempt of which lift is being made. `attempt` counts from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptDescription {
    pub lift: LiftKind,
    pub attempt: u8,
    pub total: u8,
}

impl AttemptDescription {
    /// The attempt an athlete makes next, or `None` once all six are done
    pub fn next_after(attempts_done: u8) -> Option<Self> {
        if attempts_done >= TOTAL_ATTEMPTS {
            return None;
        }
        let lift = if attempts_done < ATTEMPTS_PER_LIFT {
            LiftKind::Snatch
        } else {
            LiftKind::CleanAndJerk
        };
        Some(Self {
            lift,
            attempt: attempts_done % ATTEMPTS_PER_LIFT + 1,
            total: ATTEMPTS_PER_LIFT,
        })
    }
}

impl Display for AttemptDescription {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "Attempt {} of {}", self.attempt, self.total)
    }
}

/// The athlete data pushed by the competition engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub start_number: i32,
    #[serde(default)]
    pub attempts_done: u8,
    /// Kilograms requested for the next attempt
    #[serde(default)]
    pub next_weight: i32,
}

impl AthleteInfo {
    pub fn is_finished(&self) -> bool {
        self.attempts_done >= TOTAL_ATTEMPTS
    }

    pub fn next_attempt(&self) -> Option<AttemptDescription> {
        AttemptDescription::next_after(self.attempts_done)
    }
}
