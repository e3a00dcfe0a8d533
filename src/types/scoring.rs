use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade. Variants are declared worst to best so the derived ordering
/// matches the grade scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const GRADE_THRESHOLDS: [(f64, Grade); 6] = [
    (97.0, Grade::APlus),
    (90.0, Grade::A),
    (80.0, Grade::B),
    (70.0, Grade::C),
    (60.0, Grade::D),
    (50.0, Grade::E),
];

/// Maps a 0-100 percentage to a grade. NaN falls through to `F`.
pub fn grade_from_percentage(percentage: f64) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| percentage >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

/// `Σ(percentage/100 × weight) / Σ(weight)`. Every entry counts in the
/// denominator, failed checks included.
pub fn weighted_average<I>(entries: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (total, total_weight) = entries
        .into_iter()
        .fold((0.0, 0.0), |(total, total_weight), (percentage, weight)| {
            (total + percentage / 100.0 * weight, total_weight + weight)
        });
    if total_weight <= 0.0 {
        return 0.0;
    }
    total / total_weight
}
