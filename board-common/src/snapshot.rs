use crate::{
    athlete::AttemptDescription,
    board::BoardPhase,
    plates::Loading,
    regions::{Region, RegionSet},
    widgets::{ClockReading, DecisionLights},
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Everything needed to draw the board at one instant
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub phase: BoardPhase,
    pub visible: RegionSet,
    pub last_name: String,
    pub first_name: String,
    pub team_name: String,
    pub start_number: i32,
    pub attempt: Option<AttemptDescription>,
    pub weight_text: String,
    pub athlete_clock: ClockReading,
    pub break_clock: ClockReading,
    pub decision: DecisionLights,
    pub barbell: Loading,
    #[derivative(Default(value = "true"))]
    pub public_facing: bool,
}

impl BoardSnapshot {
    pub fn shows(&self, region: Region) -> bool {
        self.visible.contains(region)
    }
}
