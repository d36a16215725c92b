use core::fmt::{Display, Formatter};
use enum_iterator::{Sequence, all};
use serde::{Deserialize, Serialize};

/// The independently shown or hidden areas of the attempt board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize)]
pub enum Region {
    /// The board itself. When it is hidden the whole screen is blank.
    Container,
    /// Last name and first name lines
    Name,
    Team,
    StartNumber,
    Attempt,
    Weight,
    Barbell,
    AthleteTimer,
    BreakTimer,
    Decision,
}

impl Region {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match *self {
            Region::Container => write!(f, "Container"),
            Region::Name => write!(f, "Name"),
            Region::Team => write!(f, "Team"),
            Region::StartNumber => write!(f, "Start Number"),
            Region::Attempt => write!(f, "Attempt"),
            Region::Weight => write!(f, "Weight"),
            Region::Barbell => write!(f, "Barbell"),
            Region::AthleteTimer => write!(f, "Athlete Timer"),
            Region::BreakTimer => write!(f, "Break Timer"),
            Region::Decision => write!(f, "Decision"),
        }
    }
}

/// A set of visible regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionSet(u16);

impl RegionSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, region: Region) -> bool {
        self.0 & region.bit() != 0
    }

    pub fn insert(&mut self, region: Region) {
        self.0 |= region.bit();
    }

    pub fn remove(&mut self, region: Region) {
        self.0 &= !region.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Region> {
        all::<Region>().filter(move |r| self.contains(*r))
    }
}

impl<const N: usize> From<[Region; N]> for RegionSet {
    fn from(regions: [Region; N]) -> Self {
        regions.into_iter().collect()
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for region in iter {
            set.insert(region);
        }
        set
    }
}

impl Display for RegionSet {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "[")?;
        for (i, region) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{region}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = RegionSet::EMPTY;
        assert!(set.is_empty());
        set.insert(Region::Weight);
        set.insert(Region::Decision);
        assert!(set.contains(Region::Weight));
        assert!(set.contains(Region::Decision));
        assert!(!set.contains(Region::Container));
        assert_eq!(set.len(), 2);
        set.remove(Region::Weight);
        assert!(!set.contains(Region::Weight));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let set = RegionSet::from([Region::BreakTimer, Region::Container, Region::Name]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Region::Container, Region::Name, Region::BreakTimer]
        );
        assert_eq!(set.to_string(), "[Container, Name, Break Timer]");
    }

    #[test]
    fn test_every_region_fits() {
        let set: RegionSet = all::<Region>().collect();
        assert_eq!(set.len(), enum_iterator::cardinality::<Region>());
    }
}
