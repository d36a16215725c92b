use crate::{plates::Plate, presenter::BreakType};
use log::*;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Identifies this board in logs and in the origin of referee decisions
    pub component_id: String,
    /// The public board shows referee 1 on the left, the athlete-facing board mirrors it
    pub public_facing: bool,
    pub show_barbell: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            component_id: "attempt-board".to_string(),
            public_facing: true,
            show_barbell: true,
        }
    }
}

/// Text shown on the board. `{group}` is replaced by the group name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub weight_unit: String,
    pub group: String,
    /// Carried in the snapshot's last name. The group done board only shows
    /// its frame, so only renderers that draw it themselves use this.
    pub group_done: String,
    pub before_introduction: String,
    pub during_introduction: String,
    pub first_snatch: String,
    pub first_clean_and_jerk: String,
    pub technical: String,
    pub jury: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            weight_unit: "kg".to_string(),
            group: "Group {group}".to_string(),
            group_done: "Group {group} done".to_string(),
            before_introduction: "Competition starts soon".to_string(),
            during_introduction: "Introduction of athletes".to_string(),
            first_snatch: "Time before first snatch".to_string(),
            first_clean_and_jerk: "Time before first clean & jerk".to_string(),
            technical: "Technical break".to_string(),
            jury: "Jury deliberation".to_string(),
        }
    }
}

impl Labels {
    pub fn group_name(&self, group: &str) -> String {
        self.group.replace("{group}", group)
    }

    pub fn group_done(&self, group: &str) -> String {
        self.group_done.replace("{group}", group)
    }

    pub fn break_message(&self, break_type: BreakType) -> &str {
        match break_type {
            BreakType::BeforeIntroduction => &self.before_introduction,
            BreakType::DuringIntroduction => &self.during_introduction,
            BreakType::FirstSnatch => &self.first_snatch,
            BreakType::FirstCleanAndJerk => &self.first_clean_and_jerk,
            BreakType::Technical => &self.technical,
            BreakType::Jury => &self.jury,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barbell {
    pub bar_kg: u32,
    pub use_collars: bool,
    pub plates: Vec<Plate>,
}

impl Default for Barbell {
    fn default() -> Self {
        Self {
            bar_kg: 20,
            use_collars: true,
            plates: Plate::full_set(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub listen_port: u16,
}

impl Default for Network {
    fn default() -> Self {
        Self { listen_port: 8300 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Width of the rendered board in pixels, before scaling to the window
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            width: 384,
            height: 216,
            fullscreen: false,
        }
    }
}

impl Display {
    /// Largest width or height the board is rendered at
    pub const MAX_DIMENSION: u32 = 4096;

    /// The configured size, kept between 1 and `MAX_DIMENSION` on each axis
    pub fn size(&self) -> (u32, u32) {
        let clamp = |len: u32| len.clamp(1, Self::MAX_DIMENSION);
        let size = (clamp(self.width), clamp(self.height));
        if size != (self.width, self.height) {
            warn!(
                "Display size {}x{} is out of range, using {}x{}",
                self.width, self.height, size.0, size.1
            );
        }
        size
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub board: Board,
    pub labels: Labels,
    pub barbell: Barbell,
    pub network: Network,
    pub display: Display,
}

impl Config {
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&config_file)?;
        info!("Read config from {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ser_board() {
        let board: Board = Default::default();
        let serialized = toml::to_string(&board).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(board));
    }

    #[test]
    fn test_ser_barbell() {
        let barbell: Barbell = Default::default();
        let serialized = toml::to_string(&barbell).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(barbell));
    }

    #[test]
    fn test_ser_config() {
        let config: Config = Default::default();
        let serialized = toml::to_string(&config).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(config));
    }

    #[test]
    fn test_labels() {
        let labels = Labels::default();
        assert_eq!(labels.group_name("M1"), "Group M1");
        assert_eq!(labels.group_done("M1"), "Group M1 done");
        assert_eq!(labels.break_message(BreakType::Jury), "Jury deliberation");
    }

    #[test]
    fn test_display_size() {
        assert_eq!(Display::default().size(), (384, 216));

        let display = Display {
            width: u32::MAX,
            height: 0,
            ..Default::default()
        };
        let (width, height) = display.size();
        assert_eq!(width, Display::MAX_DIMENSION);
        assert_eq!(height, 1);
        assert!(width.checked_mul(height * 4).is_some());
        assert!(
            Display::MAX_DIMENSION
                .checked_mul(Display::MAX_DIMENSION * 4)
                .is_some()
        );
    }

    #[test]
    fn test_new_from_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("board-common-config-{}.toml", std::process::id()));
        let config = Config {
            network: Network { listen_port: 9123 },
            ..Default::default()
        };
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();
        let read = Config::new_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read, config);
    }
}
