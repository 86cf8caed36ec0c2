use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One experience option from the filter sidebar, in years
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bracket {
    pub min: u32,
    pub max: u32,
}

impl Bracket {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Brackets offered to the user, with their display labels
pub const EXPERIENCE_BRACKETS: [(&str, Bracket); 4] = [
    ("Under 1 Year", Bracket::new(0, 1)),
    ("1 - 2 Years", Bracket::new(1, 2)),
    ("2 - 6 Years", Bracket::new(2, 6)),
    ("Over 6 Years", Bracket::new(6, 100)),
];

/// Single min-max interval sent to the backend as `exp=<min>-<max>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    pub min: u32,
    pub max: u32,
}

impl fmt::Display for ExperienceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for ExperienceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <min>-<max>, got '{}'", s))?;
        let min: u32 = min.trim().parse().map_err(|_| format!("bad lower bound in '{}'", s))?;
        let max: u32 = max.trim().parse().map_err(|_| format!("bad upper bound in '{}'", s))?;
        if min > max {
            return Err(format!("lower bound exceeds upper bound in '{}'", s));
        }
        Ok(Self { min, max })
    }
}

impl From<Bracket> for ExperienceRange {
    fn from(b: Bracket) -> Self {
        Self { min: b.min, max: b.max }
    }
}

/// Reduce the selected brackets to their envelope.
///
/// Disjoint selections collapse into one contiguous range: `[0,1]` and
/// `[3,5]` give `[0,5]`, so years 2-3 are included even though no selected
/// bracket covers them.
pub fn effective_range(selected: &BTreeSet<Bracket>) -> Option<ExperienceRange> {
    let min = selected.iter().flat_map(|b| [b.min, b.max]).min()?;
    let max = selected.iter().flat_map(|b| [b.min, b.max]).max()?;
    Some(ExperienceRange { min, max })
}

/// Look up a predefined bracket by label (case-insensitive) or by `min-max`.
pub fn parse_bracket(s: &str) -> Option<Bracket> {
    let wanted = s.trim();
    EXPERIENCE_BRACKETS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(wanted))
        .map(|(_, b)| *b)
        .or_else(|| {
            wanted
                .parse::<ExperienceRange>()
                .ok()
                .map(|r| Bracket::new(r.min, r.max))
        })
}
