// src/domain/grade.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Best Available Rate tier. `Bar1` is the highest-demand (most expensive)
/// tier, `Bar8` the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BarGrade {
    #[serde(rename = "BAR1")]
    Bar1,
    #[serde(rename = "BAR2")]
    Bar2,
    #[serde(rename = "BAR3")]
    Bar3,
    #[serde(rename = "BAR4")]
    Bar4,
    #[serde(rename = "BAR5")]
    Bar5,
    #[serde(rename = "BAR6")]
    Bar6,
    #[serde(rename = "BAR7")]
    Bar7,
    #[serde(rename = "BAR8")]
    Bar8,
}

/// Lower occupancy bounds (inclusive), scanned from the highest-demand tier down.
const THRESHOLDS: [(f64, BarGrade); 7] = [
    (90.0, BarGrade::Bar1),
    (80.0, BarGrade::Bar2),
    (70.0, BarGrade::Bar3),
    (60.0, BarGrade::Bar4),
    (50.0, BarGrade::Bar5),
    (40.0, BarGrade::Bar6),
    (30.0, BarGrade::Bar7),
];

impl BarGrade {
    pub const ALL: [BarGrade; 8] = [
        BarGrade::Bar1,
        BarGrade::Bar2,
        BarGrade::Bar3,
        BarGrade::Bar4,
        BarGrade::Bar5,
        BarGrade::Bar6,
        BarGrade::Bar7,
        BarGrade::Bar8,
    ];

    /// The first threshold the occupancy reaches wins; anything below 30% is `Bar8`.
    pub fn from_occupancy(occupancy: f64) -> BarGrade {
        THRESHOLDS
            .iter()
            .find(|(floor, _)| occupancy >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(BarGrade::Bar8)
    }

    pub fn label(self) -> &'static str {
        match self {
            BarGrade::Bar1 => "BAR1",
            BarGrade::Bar2 => "BAR2",
            BarGrade::Bar3 => "BAR3",
            BarGrade::Bar4 => "BAR4",
            BarGrade::Bar5 => "BAR5",
            BarGrade::Bar6 => "BAR6",
            BarGrade::Bar7 => "BAR7",
            BarGrade::Bar8 => "BAR8",
        }
    }

    /// Alert background used when a cell's grade moved since the baseline.
    pub fn color(self) -> &'static str {
        match self {
            BarGrade::Bar1 => "#FF0000",
            BarGrade::Bar2 => "#FF8C00",
            BarGrade::Bar3 => "#FFD166",
            BarGrade::Bar4 => "#DAF7A6",
            BarGrade::Bar5 => "#2ECC71",
            BarGrade::Bar6 => "#3498DB",
            BarGrade::Bar7 => "#0000FF",
            BarGrade::Bar8 => "#BDC3C7",
        }
    }

    /// Foreground that stays readable on top of `color()`.
    pub fn text_color(self) -> &'static str {
        match self {
            BarGrade::Bar1 | BarGrade::Bar2 | BarGrade::Bar5 | BarGrade::Bar6 | BarGrade::Bar7 => {
                "white"
            }
            BarGrade::Bar3 | BarGrade::Bar4 | BarGrade::Bar8 => "black",
        }
    }
}

/// Share of inventory already sold, in percent. A room type without capacity counts as empty.
pub fn occupancy(available: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (total - available) as f64 / total as f64 * 100.0
}

impl fmt::Display for BarGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BarGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        BarGrade::ALL
            .into_iter()
            .find(|g| g.label() == normalized)
            .ok_or_else(|| format!("unknown BAR grade '{s}'"))
    }
}
