//! IEEE 754 rounding modes as they appear in SMT-LIB.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoundingMode {
    /// roundNearestTiesToEven
    RNE,
    /// roundNearestTiesToAway
    RNA,
    /// roundTowardPositive
    RTP,
    /// roundTowardNegative
    RTN,
    /// roundTowardZero
    RTZ,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 5] = [
        RoundingMode::RNE,
        RoundingMode::RNA,
        RoundingMode::RTP,
        RoundingMode::RTN,
        RoundingMode::RTZ,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RoundingMode::RNE => "RNE",
            RoundingMode::RNA => "RNA",
            RoundingMode::RTP => "RTP",
            RoundingMode::RTN => "RTN",
            RoundingMode::RTZ => "RTZ",
        }
    }

    pub fn is_directed(self) -> bool {
        matches!(self, RoundingMode::RTP | RoundingMode::RTN | RoundingMode::RTZ)
    }

    /// Decide whether a magnitude that lies strictly between two adjacent
    /// representable magnitudes is rounded to the larger one.
    ///
    /// `cmp_half` is the ordering of the discarded fraction against one half,
    /// `lower_is_odd` tells whether the smaller candidate has an odd last
    /// significand bit, and `negative` is the sign of the value being rounded.
    pub(crate) fn rounds_away(
        self,
        cmp_half: std::cmp::Ordering,
        lower_is_odd: bool,
        negative: bool,
    ) -> bool {
        use std::cmp::Ordering::*;
        match self {
            RoundingMode::RNE => cmp_half == Greater || (cmp_half == Equal && lower_is_odd),
            RoundingMode::RNA => cmp_half != Less,
            RoundingMode::RTP => !negative,
            RoundingMode::RTN => negative,
            RoundingMode::RTZ => false,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_nearest_modes_split_on_ties() {
        assert!(!RoundingMode::RNE.rounds_away(Ordering::Equal, false, false));
        assert!(RoundingMode::RNE.rounds_away(Ordering::Equal, true, false));
        assert!(RoundingMode::RNA.rounds_away(Ordering::Equal, false, false));
        assert!(!RoundingMode::RNA.rounds_away(Ordering::Less, true, true));
    }

    #[test]
    fn test_directed_modes_follow_sign() {
        assert!(RoundingMode::RTP.rounds_away(Ordering::Less, false, false));
        assert!(!RoundingMode::RTP.rounds_away(Ordering::Greater, false, true));
        assert!(RoundingMode::RTN.rounds_away(Ordering::Less, false, true));
        assert!(!RoundingMode::RTZ.rounds_away(Ordering::Greater, true, true));
        assert!(RoundingMode::RTZ.is_directed());
        assert!(!RoundingMode::RNA.is_directed());
    }
}
