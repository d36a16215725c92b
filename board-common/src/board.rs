use crate::{
    athlete::AttemptDescription,
    plates::Loading,
    regions::{Region, RegionSet},
    snapshot::BoardSnapshot,
    widgets::{DecisionLights, DecisionSignal, TimerRole, TimerWidget},
};
use core::fmt::{Display, Formatter};
use derivative::Derivative;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    Break,
    ActiveAttempt,
    DecisionShown,
    GroupDone,
    #[derivative(Default)]
    Cleared,
}

impl BoardPhase {
    /// The regions visible in each phase. Every phase operation replaces the
    /// whole set, so the board is never in a mix of two phases.
    pub fn regions(self) -> RegionSet {
        use Region::*;
        match self {
            Self::Break => RegionSet::from([Container, Name, BreakTimer]),
            Self::ActiveAttempt => RegionSet::from([
                Container,
                Name,
                Team,
                StartNumber,
                Attempt,
                Weight,
                Barbell,
                AthleteTimer,
            ]),
            Self::DecisionShown => RegionSet::from([
                Container,
                Name,
                Team,
                StartNumber,
                Attempt,
                Weight,
                Decision,
            ]),
            Self::GroupDone => RegionSet::from([Container]),
            Self::Cleared => RegionSet::EMPTY,
        }
    }
}

pub fn regions_for(phase: BoardPhase) -> RegionSet {
    phase.regions()
}

impl Display for BoardPhase {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match *self {
            BoardPhase::Break => write!(f, "Break"),
            BoardPhase::ActiveAttempt => write!(f, "Active Attempt"),
            BoardPhase::DecisionShown => write!(f, "Decision Shown"),
            BoardPhase::GroupDone => write!(f, "Group Done"),
            BoardPhase::Cleared => write!(f, "Cleared"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTransition<'a> {
    pub component_id: &'a str,
    pub phase: BoardPhase,
}

/// Receives every phase change of a board
pub trait BoardObserver {
    fn transition(&mut self, transition: BoardTransition<'_>);
}

/// Reports transitions to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BoardObserver for LogObserver {
    fn transition(&mut self, transition: BoardTransition<'_>) {
        debug!(
            "attempt board {}: {}",
            transition.component_id, transition.phase
        );
    }
}

#[derive(Debug)]
pub struct AttemptBoard<T: TimerWidget, O: BoardObserver = LogObserver> {
    component_id: String,
    weight_unit: String,
    public_facing: bool,
    phase: BoardPhase,
    last_name: String,
    first_name: String,
    team_name: String,
    start_number: i32,
    attempt: Option<AttemptDescription>,
    weight: i32,
    barbell: Loading,
    decision: DecisionLights,
    athlete_timer: T,
    break_timer: T,
    observer: O,
}

impl<T: TimerWidget, O: BoardObserver> AttemptBoard<T, O> {
    /// Creates a board showing the break view. Call `initialize` before the
    /// first event to report the starting phase.
    pub fn new(
        component_id: impl Into<String>,
        weight_unit: impl Into<String>,
        athlete_timer: T,
        break_timer: T,
        observer: O,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            weight_unit: weight_unit.into(),
            public_facing: true,
            phase: BoardPhase::Break,
            last_name: String::new(),
            first_name: String::new(),
            team_name: String::new(),
            start_number: 0,
            attempt: None,
            weight: 0,
            barbell: Loading::default(),
            decision: DecisionLights::default(),
            athlete_timer,
            break_timer,
            observer,
        }
    }

    fn set_phase(&mut self, phase: BoardPhase) {
        self.phase = phase;
        self.observer.transition(BoardTransition {
            component_id: &self.component_id,
            phase,
        });
    }

    /// The break view with the athlete timer hidden
    pub fn initialize(&mut self) {
        self.enter_break();
        debug_assert!(!self.is_visible(Region::AthleteTimer));
    }

    pub fn start_clock(&mut self) {
        self.athlete_timer.start();
    }

    /// An athlete has been announced, show everything about the attempt and
    /// the athlete's clock
    pub fn enter_active_attempt(&mut self) {
        self.athlete_timer.reset();
        self.set_phase(BoardPhase::ActiveAttempt);
    }

    /// The bar is down, replace the clock and barbell with the decision
    pub fn show_decision(&mut self) {
        self.set_phase(BoardPhase::DecisionShown);
    }

    pub fn enter_break(&mut self) {
        self.set_phase(BoardPhase::Break);
    }

    pub fn enter_group_done(&mut self) {
        self.set_phase(BoardPhase::GroupDone);
    }

    /// Blanks the whole board
    pub fn clear(&mut self) {
        self.set_phase(BoardPhase::Cleared);
    }

    pub fn on_decision_signal(&mut self, signal: DecisionSignal) {
        match signal {
            DecisionSignal::Down => self.show_decision(),
            DecisionSignal::Hide => self.enter_active_attempt(),
        }
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn visible_regions(&self) -> RegionSet {
        regions_for(self.phase)
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.visible_regions().contains(region)
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn set_public_facing(&mut self, public_facing: bool) {
        self.public_facing = public_facing;
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_team_name(&mut self, team_name: impl Into<String>) {
        self.team_name = team_name.into();
    }

    pub fn set_start_number(&mut self, start_number: i32) {
        self.start_number = start_number;
    }

    pub fn set_attempt(&mut self, attempt: Option<AttemptDescription>) {
        self.attempt = attempt;
    }

    pub fn set_weight(&mut self, weight: i32) {
        self.weight = weight;
    }

    /// Fills the barbell slot
    pub fn set_barbell(&mut self, barbell: Loading) {
        self.barbell = barbell;
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn start_number(&self) -> i32 {
        self.start_number
    }

    pub fn attempt(&self) -> Option<AttemptDescription> {
        self.attempt
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn barbell(&self) -> &Loading {
        &self.barbell
    }

    pub fn weight_text(&self) -> String {
        format!("{}{}", self.weight, self.weight_unit)
    }

    pub fn decision(&self) -> &DecisionLights {
        &self.decision
    }

    pub fn decision_mut(&mut self) -> &mut DecisionLights {
        &mut self.decision
    }

    pub fn timer(&self, role: TimerRole) -> &T {
        match role {
            TimerRole::Athlete => &self.athlete_timer,
            TimerRole::Break => &self.break_timer,
        }
    }

    pub fn timer_mut(&mut self, role: TimerRole) -> &mut T {
        match role {
            TimerRole::Athlete => &mut self.athlete_timer,
            TimerRole::Break => &mut self.break_timer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            phase: self.phase,
            visible: self.visible_regions(),
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            team_name: self.team_name.clone(),
            start_number: self.start_number,
            attempt: self.attempt,
            weight_text: self.weight_text(),
            athlete_clock: self.athlete_timer.reading(),
            break_clock: self.break_timer.reading(),
            decision: self.decision,
            barbell: self.barbell.clone(),
            public_facing: self.public_facing,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::{athlete::LiftKind, plates::Plate, widgets::ClockReading};
    use core::time::Duration;
    use enum_iterator::all;

    /// Counts calls instead of keeping time
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub(crate) struct MockTimer {
        pub starts: u32,
        pub stops: u32,
        pub resets: u32,
        pub time: Option<Duration>,
        pub running: bool,
    }

    impl TimerWidget for MockTimer {
        fn start(&mut self) {
            self.starts += 1;
            self.running = true;
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.running = false;
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.running = false;
        }

        fn set_time(&mut self, time: Option<Duration>) {
            self.running = false;
            self.time = time;
        }

        fn reading(&self) -> ClockReading {
            match self.time {
                Some(time) => ClockReading::Remaining {
                    secs: time.as_secs() as u32,
                    running: self.running,
                },
                None => ClockReading::Indefinite,
            }
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub transitions: Vec<(String, BoardPhase)>,
    }

    impl BoardObserver for RecordingObserver {
        fn transition(&mut self, transition: BoardTransition<'_>) {
            self.transitions
                .push((transition.component_id.to_string(), transition.phase));
        }
    }

    pub(crate) fn new_board() -> AttemptBoard<MockTimer, RecordingObserver> {
        AttemptBoard::new(
            "board-1",
            "kg",
            MockTimer::default(),
            MockTimer::default(),
            RecordingObserver::default(),
        )
    }

    fn apply(board: &mut AttemptBoard<MockTimer, RecordingObserver>, phase: BoardPhase) {
        match phase {
            BoardPhase::Break => board.enter_break(),
            BoardPhase::ActiveAttempt => board.enter_active_attempt(),
            BoardPhase::DecisionShown => board.show_decision(),
            BoardPhase::GroupDone => board.enter_group_done(),
            BoardPhase::Cleared => board.clear(),
        }
    }

    const PHASES: [BoardPhase; 5] = [
        BoardPhase::Break,
        BoardPhase::ActiveAttempt,
        BoardPhase::DecisionShown,
        BoardPhase::GroupDone,
        BoardPhase::Cleared,
    ];

    #[test]
    fn test_initialize() {
        let mut board = new_board();
        board.initialize();

        assert!(board.is_visible(Region::Container));
        assert!(board.is_visible(Region::Name));
        assert!(board.is_visible(Region::BreakTimer));
        assert!(!board.is_visible(Region::AthleteTimer));
        for region in [
            Region::Team,
            Region::Attempt,
            Region::Weight,
            Region::StartNumber,
            Region::Barbell,
            Region::Decision,
        ] {
            assert!(!board.is_visible(region), "{region} should be hidden");
        }
        assert_eq!(
            board.observer().transitions,
            vec![("board-1".to_string(), BoardPhase::Break)]
        );
    }

    #[test]
    fn test_every_sequence_ends_in_one_profile() {
        // All sequences of three operations
        for a in PHASES {
            for b in PHASES {
                for c in PHASES {
                    let mut board = new_board();
                    board.initialize();
                    apply(&mut board, a);
                    apply(&mut board, b);
                    apply(&mut board, c);
                    assert_eq!(board.phase(), c);
                    assert_eq!(board.visible_regions(), regions_for(c));
                    let matching = PHASES
                        .iter()
                        .filter(|p| regions_for(**p) == board.visible_regions())
                        .count();
                    assert_eq!(matching, 1);
                }
            }
        }
    }

    #[test]
    fn test_profiles_are_distinct() {
        for (i, a) in PHASES.iter().enumerate() {
            for b in &PHASES[i + 1..] {
                assert_ne!(regions_for(*a), regions_for(*b), "{a} and {b}");
            }
        }
    }

    #[test]
    fn test_active_decision_active_round_trip() {
        let mut board = new_board();
        board.initialize();
        board.enter_active_attempt();
        let active = board.visible_regions();

        board.show_decision();
        assert!(!board.is_visible(Region::Barbell));
        assert!(!board.is_visible(Region::AthleteTimer));
        assert!(!board.is_visible(Region::BreakTimer));
        assert!(board.is_visible(Region::Decision));

        board.enter_active_attempt();
        assert_eq!(board.visible_regions(), active);
        assert!(board.is_visible(Region::Barbell));
        assert!(board.is_visible(Region::AthleteTimer));
        assert!(!board.is_visible(Region::Decision));
    }

    #[test]
    fn test_clear_hides_container_from_anywhere() {
        for phase in PHASES {
            let mut board = new_board();
            apply(&mut board, phase);
            board.clear();
            assert!(!board.is_visible(Region::Container));
            assert!(board.visible_regions().is_empty());
        }
    }

    #[test]
    fn test_group_done_hides_content() {
        let mut board = new_board();
        board.enter_active_attempt();
        board.enter_group_done();
        assert!(board.is_visible(Region::Container));
        for region in all::<Region>().filter(|r| *r != Region::Container) {
            assert!(!board.is_visible(region), "{region} should be hidden");
        }
    }

    #[test]
    fn test_operations_are_idempotent() {
        for phase in PHASES {
            let mut board = new_board();
            apply(&mut board, phase);
            let once = board.visible_regions();
            apply(&mut board, phase);
            assert_eq!(board.visible_regions(), once);
        }
    }

    #[test]
    fn test_decision_from_break_is_allowed() {
        let mut board = new_board();
        board.initialize();
        board.show_decision();
        assert_eq!(board.phase(), BoardPhase::DecisionShown);
    }

    #[test]
    fn test_weight_text() {
        let mut board = new_board();
        board.set_weight(105);
        assert_eq!(board.weight_text(), "105kg");
        board.set_weight(-3);
        assert_eq!(board.weight_text(), "-3kg");

        let mut board = AttemptBoard::new(
            "board-2",
            " lb",
            MockTimer::default(),
            MockTimer::default(),
            LogObserver,
        );
        board.set_weight(225);
        assert_eq!(board.weight_text(), "225 lb");
    }

    #[test]
    fn test_timers() {
        let mut board = new_board();
        board.start_clock();
        assert_eq!(board.timer(TimerRole::Athlete).starts, 1);
        assert_eq!(board.timer(TimerRole::Break).starts, 0);
        assert_eq!(board.phase(), BoardPhase::Break);

        board.enter_active_attempt();
        assert_eq!(board.timer(TimerRole::Athlete).resets, 1);
        assert_eq!(board.timer(TimerRole::Break).resets, 0);
    }

    #[test]
    fn test_decision_signals() {
        let mut board = new_board();
        board.on_decision_signal(DecisionSignal::Down);
        assert_eq!(board.phase(), BoardPhase::DecisionShown);
        board.on_decision_signal(DecisionSignal::Hide);
        assert_eq!(board.phase(), BoardPhase::ActiveAttempt);
    }

    #[test]
    fn test_snapshot_reflects_fields() {
        let mut board = new_board();
        board.set_last_name("LAMY");
        board.set_first_name("Jean");
        board.set_team_name("CAN");
        board.set_start_number(7);
        board.set_attempt(AttemptDescription::next_after(1));
        board.set_weight(81);
        board.set_barbell(Loading {
            per_side: vec![Plate::Kg25],
            collars: true,
            exact: true,
        });
        board.timer_mut(TimerRole::Athlete).set_time(Some(Duration::from_secs(60)));
        board.enter_active_attempt();

        let snapshot = board.snapshot();
        assert_eq!(snapshot.phase, BoardPhase::ActiveAttempt);
        assert_eq!(snapshot.visible, regions_for(BoardPhase::ActiveAttempt));
        assert_eq!(snapshot.last_name, "LAMY");
        assert_eq!(snapshot.first_name, "Jean");
        assert_eq!(snapshot.team_name, "CAN");
        assert_eq!(snapshot.start_number, 7);
        assert_eq!(
            snapshot.attempt.map(|a| (a.lift, a.attempt)),
            Some((LiftKind::Snatch, 2))
        );
        assert_eq!(snapshot.weight_text, "81kg");
        assert_eq!(snapshot.barbell.per_side, vec![Plate::Kg25]);
        assert_eq!(
            snapshot.athlete_clock,
            ClockReading::Remaining {
                secs: 60,
                running: false
            }
        );
        assert_eq!(snapshot.break_clock, ClockReading::Indefinite);
    }
}
