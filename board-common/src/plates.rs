use crate::config::Barbell;
use core::fmt::{Display, Formatter};
use enum_iterator::{Sequence, all};
use log::*;
use serde::{Deserialize, Serialize};

pub const COLLAR_GRAMS: u32 = 2_500;
/// More plates than this don't fit on a competition sleeve
pub const MAX_PLATES_PER_SIDE: usize = 16;

/// Competition plate denominations, heaviest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize,
)]
pub enum Plate {
    Kg25,
    Kg20,
    Kg15,
    Kg10,
    Kg5,
    Kg2_5,
    Kg2,
    Kg1_5,
    Kg1,
    Kg0_5,
}

impl Plate {
    pub fn grams(self) -> u32 {
        match self {
            Self::Kg25 => 25_000,
            Self::Kg20 => 20_000,
            Self::Kg15 => 15_000,
            Self::Kg10 => 10_000,
            Self::Kg5 => 5_000,
            Self::Kg2_5 => 2_500,
            Self::Kg2 => 2_000,
            Self::Kg1_5 => 1_500,
            Self::Kg1 => 1_000,
            Self::Kg0_5 => 500,
        }
    }

    /// Bumper plates (10 kg and up) are full diameter, the rest are change plates
    pub fn is_bumper(self) -> bool {
        self.grams() >= 10_000
    }

    pub fn full_set() -> Vec<Self> {
        all::<Self>().collect()
    }
}

impl Display for Plate {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        let grams = self.grams();
        if grams % 1_000 == 0 {
            write!(f, "{}kg", grams / 1_000)
        } else {
            write!(f, "{}.{}kg", grams / 1_000, (grams % 1_000) / 100)
        }
    }
}

/// The plates on one sleeve of the bar, from the centre outwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loading {
    pub per_side: Vec<Plate>,
    pub collars: bool,
    /// False when the available plates can't make up the requested weight
    pub exact: bool,
}

impl Loading {
    pub fn for_weight(weight_kg: i32, barbell: &Barbell) -> Self {
        let bar_grams = i64::from(barbell.bar_kg) * 1_000;
        let total_grams = i64::from(weight_kg) * 1_000;

        if total_grams < bar_grams {
            debug!("Requested weight {weight_kg}kg is lighter than the bar");
            return Self::default();
        }

        let mut remaining = total_grams - bar_grams;
        let collars = barbell.use_collars && remaining >= 2 * i64::from(COLLAR_GRAMS);
        if collars {
            remaining -= 2 * i64::from(COLLAR_GRAMS);
        }

        let mut plates = barbell.plates.clone();
        plates.sort_unstable();
        plates.dedup();

        let mut side = remaining / 2;
        let mut per_side = Vec::new();
        for plate in plates {
            let grams = i64::from(plate.grams());
            while side >= grams && per_side.len() < MAX_PLATES_PER_SIDE {
                per_side.push(plate);
                side -= grams;
            }
        }

        if per_side.len() == MAX_PLATES_PER_SIDE && side > 0 {
            warn!("{weight_kg}kg does not fit on the sleeves, showing a full bar");
        }

        let exact = side == 0 && remaining % 2 == 0;
        if !exact {
            warn!("Could not load {weight_kg}kg exactly with the available plates");
        }

        Self {
            per_side,
            collars,
            exact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.per_side.is_empty() && !self.collars
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use more_asserts::*;

    fn barbell() -> Barbell {
        Barbell::default()
    }

    #[test]
    fn test_plate_display() {
        assert_eq!(Plate::Kg25.to_string(), "25kg");
        assert_eq!(Plate::Kg2_5.to_string(), "2.5kg");
        assert_eq!(Plate::Kg0_5.to_string(), "0.5kg");
    }

    #[test]
    fn test_standard_loading() {
        let loading = Loading::for_weight(100, &barbell());
        assert_eq!(loading.per_side, vec![Plate::Kg25, Plate::Kg10, Plate::Kg2_5]);
        assert!(loading.collars);
        assert!(loading.exact);
    }

    #[test]
    fn test_heavy_loading() {
        let loading = Loading::for_weight(231, &barbell());
        // 231 - 20 - 5 = 206, 103 per side
        assert_eq!(
            loading.per_side,
            vec![
                Plate::Kg25,
                Plate::Kg25,
                Plate::Kg25,
                Plate::Kg25,
                Plate::Kg2_5,
                Plate::Kg0_5
            ]
        );
        assert!(loading.exact);
    }

    #[test]
    fn test_empty_bar() {
        let loading = Loading::for_weight(20, &barbell());
        assert!(loading.is_empty());
        assert!(loading.exact);
    }

    #[test]
    fn test_lighter_than_bar() {
        let loading = Loading::for_weight(15, &barbell());
        assert!(loading.is_empty());
        assert!(!loading.exact);

        let loading = Loading::for_weight(-40, &barbell());
        assert!(loading.is_empty());
        assert!(!loading.exact);
    }

    #[test]
    fn test_no_collars_on_light_loads() {
        let loading = Loading::for_weight(23, &barbell());
        assert!(!loading.collars);
        assert_eq!(loading.per_side, vec![Plate::Kg1_5]);
        assert!(loading.exact);
    }

    #[test]
    fn test_missing_change_plates() {
        let barbell = Barbell {
            plates: vec![Plate::Kg25, Plate::Kg20, Plate::Kg10],
            ..Default::default()
        };
        let loading = Loading::for_weight(66, &barbell);
        // 66 - 20 - 5 = 41, 20.5 per side
        assert_eq!(loading.per_side, vec![Plate::Kg20]);
        assert!(!loading.exact);
    }

    #[test]
    fn test_womens_bar_without_collars() {
        let barbell = Barbell {
            bar_kg: 15,
            use_collars: false,
            ..Default::default()
        };
        let loading = Loading::for_weight(55, &barbell);
        assert_eq!(loading.per_side, vec![Plate::Kg20]);
        assert!(!loading.collars);
        assert!(loading.exact);
    }

    #[test]
    fn test_loadings_add_up() {
        let barbell = barbell();
        for weight in 20..=300 {
            let loading = Loading::for_weight(weight, &barbell);
            assert!(loading.exact, "{weight}kg");
            let side: u32 = loading.per_side.iter().map(|p| p.grams()).sum();
            let collars = if loading.collars { 2 * COLLAR_GRAMS } else { 0 };
            assert_eq!(20_000 + collars + 2 * side, weight as u32 * 1_000);
            assert_le!(loading.per_side.len(), 12);
        }
    }

    #[test]
    fn test_absurd_weight_fills_the_sleeve() {
        let loading = Loading::for_weight(i32::MAX, &barbell());
        assert_eq!(loading.per_side.len(), MAX_PLATES_PER_SIDE);
        assert!(loading.per_side.iter().all(|p| *p == Plate::Kg25));
        assert!(loading.collars);
        assert!(!loading.exact);

        // Exactly a full sleeve of 25s still loads
        let full = 20 + 5 + 2 * 25 * MAX_PLATES_PER_SIDE as i32;
        let loading = Loading::for_weight(full, &barbell());
        assert_eq!(loading.per_side.len(), MAX_PLATES_PER_SIDE);
        assert!(loading.exact);

        let loading = Loading::for_weight(full + 1, &barbell());
        assert_le!(loading.per_side.len(), MAX_PLATES_PER_SIDE);
        assert!(!loading.exact);
    }
}
