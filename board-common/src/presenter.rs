use crate::{
    athlete::AthleteInfo,
    board::{AttemptBoard, BoardObserver, LogObserver},
    config::{Barbell, Config, Labels},
    plates::Loading,
    widgets::{TimerRole, TimerWidget},
};
use core::{
    fmt::{Display, Formatter},
    time::Duration,
};
use log::*;
use serde::{Deserialize, Serialize};

/// State of the field of play, as reported by the competition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FopState {
    Inactive,
    Break,
    CurrentAthleteDisplayed,
    TimeRunning,
    TimeStopped,
    DownSignaled,
    DecisionVisible,
}

impl Display for FopState {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match *self {
            FopState::Inactive => write!(f, "Inactive"),
            FopState::Break => write!(f, "Break"),
            FopState::CurrentAthleteDisplayed => write!(f, "Current Athlete Displayed"),
            FopState::TimeRunning => write!(f, "Time Running"),
            FopState::TimeStopped => write!(f, "Time Stopped"),
            FopState::DownSignaled => write!(f, "Down Signaled"),
            FopState::DecisionVisible => write!(f, "Decision Visible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakType {
    BeforeIntroduction,
    DuringIntroduction,
    FirstSnatch,
    FirstCleanAndJerk,
    Technical,
    Jury,
}

/// Messages sent by the competition engine, one JSON object per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Full state, sent when the engine connects
    Sync {
        fop_state: FopState,
        #[serde(default)]
        group: String,
        athlete: Option<AthleteInfo>,
        break_type: Option<BreakType>,
        break_remaining_ms: Option<u64>,
    },
    LiftingOrderUpdated {
        fop_state: FopState,
        athlete: Option<AthleteInfo>,
        #[serde(default)]
        display_toggle: bool,
        #[serde(default = "affected_by_default")]
        current_display_affected: bool,
    },
    BreakStarted {
        #[serde(default)]
        group: String,
        break_type: BreakType,
        /// `None` for a break without an end time
        remaining_ms: Option<u64>,
    },
    BreakDone {
        athlete: Option<AthleteInfo>,
    },
    StartLifting,
    DownSignal,
    Decision {
        origin: Option<String>,
        refs: [Option<bool>; 3],
        decision: Option<bool>,
    },
    DecisionReset,
    GroupDone {
        group: String,
    },
    SwitchGroup {
        fop_state: FopState,
        group: String,
        athlete: Option<AthleteInfo>,
        break_type: Option<BreakType>,
    },
    BarbellOrPlatesChanged,
    SetTime {
        remaining_ms: Option<u64>,
    },
    StartTime {
        remaining_ms: Option<u64>,
    },
    StopTime,
    /// Operator request to blank the screen
    Blank,
}

fn affected_by_default() -> bool {
    true
}

/// Drives an `AttemptBoard` from competition engine events
#[derive(Debug)]
pub struct BoardPresenter<T: TimerWidget, O: BoardObserver = LogObserver> {
    board: AttemptBoard<T, O>,
    labels: Labels,
    barbell: Barbell,
    show_barbell: bool,
    fop_state: FopState,
    group: String,
}

impl<T: TimerWidget, O: BoardObserver> BoardPresenter<T, O> {
    pub fn new(config: &Config, athlete_timer: T, break_timer: T, observer: O) -> Self {
        let mut board = AttemptBoard::new(
            config.board.component_id.clone(),
            config.labels.weight_unit.clone(),
            athlete_timer,
            break_timer,
            observer,
        );
        board.set_public_facing(config.board.public_facing);
        board.initialize();

        Self {
            board,
            labels: config.labels.clone(),
            barbell: config.barbell.clone(),
            show_barbell: config.board.show_barbell,
            fop_state: FopState::Inactive,
            group: String::new(),
        }
    }

    pub fn board(&self) -> &AttemptBoard<T, O> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut AttemptBoard<T, O> {
        &mut self.board
    }

    pub fn fop_state(&self) -> FopState {
        self.fop_state
    }

    pub fn handle(&mut self, event: BoardEvent) {
        trace!("Handling event: {event:?}");
        match event {
            BoardEvent::Sync {
                fop_state,
                group,
                athlete,
                break_type,
                break_remaining_ms,
            } => {
                self.fop_state = fop_state;
                self.group = group;
                match fop_state {
                    FopState::Inactive => self.show_empty(),
                    FopState::Break => {
                        if athlete.as_ref().is_some_and(AthleteInfo::is_finished) {
                            self.show_group_done();
                        } else {
                            self.set_break_time(break_remaining_ms);
                            self.show_break(break_type);
                        }
                    }
                    _ => self.athlete_update(athlete),
                }
            }
            BoardEvent::LiftingOrderUpdated {
                fop_state,
                athlete,
                display_toggle,
                current_display_affected,
            } => {
                self.fop_state = fop_state;
                match fop_state {
                    FopState::Break => {
                        if display_toggle {
                            self.athlete_update(athlete);
                        }
                    }
                    FopState::Inactive => {}
                    _ if !current_display_affected => {
                        debug!("Lifting order change does not affect the current athlete");
                    }
                    _ => self.athlete_update(athlete),
                }
            }
            BoardEvent::BreakStarted {
                group,
                break_type,
                remaining_ms,
            } => {
                self.fop_state = FopState::Break;
                if !group.is_empty() {
                    self.group = group;
                }
                self.set_break_time(remaining_ms);
                self.show_break(Some(break_type));
            }
            BoardEvent::BreakDone { athlete } => {
                self.fop_state = FopState::CurrentAthleteDisplayed;
                self.board.timer_mut(TimerRole::Break).stop();
                self.athlete_update(athlete);
            }
            BoardEvent::StartLifting => self.board.enter_active_attempt(),
            BoardEvent::DownSignal => {
                let signal = self.board.decision_mut().down();
                self.board.on_decision_signal(signal);
            }
            BoardEvent::Decision {
                origin,
                refs,
                decision,
            } => {
                if origin.as_deref() == Some(self.board.component_id()) {
                    debug!("Ignoring decision that originated from this board");
                    return;
                }
                self.board.decision_mut().set(refs, decision);
                self.board.show_decision();
            }
            BoardEvent::DecisionReset => {
                let signal = self.board.decision_mut().reset();
                self.board.on_decision_signal(signal);
            }
            BoardEvent::GroupDone { group } => {
                self.fop_state = FopState::Break;
                self.group = group;
                self.show_group_done();
            }
            BoardEvent::SwitchGroup {
                fop_state,
                group,
                athlete,
                break_type,
            } => {
                self.fop_state = fop_state;
                self.group = group;
                match fop_state {
                    FopState::Inactive => self.show_empty(),
                    FopState::Break => self.show_break(break_type),
                    _ => self.athlete_update(athlete),
                }
            }
            BoardEvent::BarbellOrPlatesChanged => self.show_plates(),
            BoardEvent::SetTime { remaining_ms } => {
                self.board
                    .timer_mut(TimerRole::Athlete)
                    .set_time(remaining_ms.map(Duration::from_millis));
            }
            BoardEvent::StartTime { remaining_ms } => {
                if let Some(ms) = remaining_ms {
                    self.board
                        .timer_mut(TimerRole::Athlete)
                        .set_time(Some(Duration::from_millis(ms)));
                }
                self.board.start_clock();
            }
            BoardEvent::StopTime => self.board.timer_mut(TimerRole::Athlete).stop(),
            BoardEvent::Blank => self.board.clear(),
        }
    }

    /// The engine went away, nothing on screen can be trusted anymore
    pub fn connection_lost(&mut self) {
        warn!("Lost the competition engine, blanking the board");
        self.board.clear();
    }

    fn athlete_update(&mut self, athlete: Option<AthleteInfo>) {
        let Some(athlete) = athlete else {
            self.show_empty();
            return;
        };
        if athlete.is_finished() {
            self.show_group_done();
            return;
        }
        if self.fop_state == FopState::Inactive {
            self.show_empty();
            return;
        }

        let attempt = athlete.next_attempt();
        let AthleteInfo {
            last_name,
            first_name,
            team,
            start_number,
            next_weight,
            ..
        } = athlete;
        self.board.set_last_name(last_name);
        self.board.set_first_name(first_name);
        self.board.set_team_name(team);
        self.board.set_start_number(start_number);
        self.board.set_attempt(attempt);
        self.board.set_weight(next_weight);
        self.show_plates();
        self.board.enter_active_attempt();
    }

    fn set_break_time(&mut self, remaining_ms: Option<u64>) {
        let timer = self.board.timer_mut(TimerRole::Break);
        timer.set_time(remaining_ms.map(Duration::from_millis));
        if remaining_ms.is_some() {
            timer.start();
        }
    }

    fn show_break(&mut self, break_type: Option<BreakType>) {
        let message = break_type
            .map(|bt| self.labels.break_message(bt).to_string())
            .unwrap_or_default();
        self.board.set_last_name(self.labels.group_name(&self.group));
        self.board.set_first_name(message);
        self.board.set_team_name("");
        self.board.set_attempt(None);
        self.board.enter_break();
    }

    fn show_group_done(&mut self) {
        self.board.set_last_name(self.labels.group_done(&self.group));
        self.hide_plates();
        self.board.enter_group_done();
    }

    fn show_empty(&mut self) {
        self.hide_plates();
        self.board.clear();
    }

    fn show_plates(&mut self) {
        if self.show_barbell {
            let loading = Loading::for_weight(self.board.weight(), &self.barbell);
            self.board.set_barbell(loading);
        } else {
            self.hide_plates();
        }
    }

    fn hide_plates(&mut self) {
        self.board.set_barbell(Loading::default());
    }
}
