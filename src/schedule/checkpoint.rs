//! Named points in the daily light cycle.

use serde::{Deserialize, Serialize};

/// One of the four fixed checkpoints of a day, in daylight order.
///
/// The cycle is `Sunrise → Morning → LateAfternoon → Sunset → Sunrise` of the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    Sunrise,
    Morning,
    LateAfternoon,
    Sunset,
}

impl Checkpoint {
    /// All checkpoints in cycle order, starting at sunrise.
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::Sunrise,
        Checkpoint::Morning,
        Checkpoint::LateAfternoon,
        Checkpoint::Sunset,
    ];

    /// Returns the checkpoint that follows this one in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Sunrise => Self::Morning,
            Self::Morning => Self::LateAfternoon,
            Self::LateAfternoon => Self::Sunset,
            Self::Sunset => Self::Sunrise,
        }
    }

    /// Number of single steps needed to walk the cycle from `self` to `other`.
    pub fn steps_to(self, other: Self) -> usize {
        let from = self.index();
        let to = other.index();
        (to + Self::ALL.len() - from) % Self::ALL.len()
    }

    fn index(self) -> usize {
        match self {
            Self::Sunrise => 0,
            Self::Morning => 1,
            Self::LateAfternoon => 2,
            Self::Sunset => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sunrise => "Sunrise",
            Self::Morning => "Morning",
            Self::LateAfternoon => "Late afternoon",
            Self::Sunset => "Sunset",
        }
    }

    /// Returns the icon/symbol for this checkpoint.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Sunrise => "󰖜 ",
            Self::Morning => "󰖨 ",
            Self::LateAfternoon => "󰖕 ",
            Self::Sunset => "󰖛 ",
        }
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_full_cycle() {
        let mut checkpoint = Checkpoint::Sunrise;
        for expected in Checkpoint::ALL.iter().cycle().skip(1).take(4) {
            checkpoint = checkpoint.next();
            assert_eq!(checkpoint, *expected);
        }
        assert_eq!(checkpoint, Checkpoint::Sunrise);
    }

    #[test]
    fn test_steps_to_wraps_around() {
        assert_eq!(Checkpoint::Sunrise.steps_to(Checkpoint::Sunrise), 0);
        assert_eq!(Checkpoint::Sunrise.steps_to(Checkpoint::Morning), 1);
        assert_eq!(Checkpoint::Sunset.steps_to(Checkpoint::Sunrise), 1);
        assert_eq!(Checkpoint::LateAfternoon.steps_to(Checkpoint::Morning), 3);
    }

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&Checkpoint::LateAfternoon).unwrap();
        assert_eq!(json, "\"late_afternoon\"");
    }
}
