// src/domain/rate_card.rs

use crate::domain::grade::{occupancy, BarGrade};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// How a special period forces the grade, regardless of occupancy.
#[derive(Debug, Clone, PartialEq)]
pub enum GradeOverride {
    Fixed(BarGrade),
    WeekSplit { weekday: BarGrade, weekend: BarGrade },
}

/// A holiday or season window. `start` and `end` are both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialPeriod {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub grade: GradeOverride,
    /// Season token used by season-priced rooms while the period is active.
    pub season: Option<String>,
}

impl SpecialPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomPricing {
    /// Price follows the BAR grade.
    Grade(BTreeMap<BarGrade, i64>),
    /// Price follows the season code (`PEAK-WE`, `OFF-WD`, ...), not the grade.
    Season(BTreeMap<String, i64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: String,
    pub pricing: RoomPricing,
}

/// Result of pricing one room on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Determination {
    pub occupancy: f64,
    pub grade: BarGrade,
    pub base_price: i64,
    /// Name of the special period that forced the grade, if any.
    pub period: Option<String>,
}

/// Room prices plus the calendar overrides that apply on top of the occupancy rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    pub rooms: Vec<Room>,
    /// Checked in order; the first period containing the date wins.
    pub periods: Vec<SpecialPeriod>,
    pub weekend_days: Vec<Weekday>,
    pub default_season: String,
}

impl RateCard {
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|r| r.id.as_str())
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend_days.contains(&date.weekday())
    }

    pub fn period_for(&self, date: NaiveDate) -> Option<&SpecialPeriod> {
        self.periods.iter().find(|p| p.contains(date))
    }

    /// `{season}-WE` or `{season}-WD`.
    pub fn season_code(&self, date: NaiveDate) -> String {
        let season = self
            .period_for(date)
            .and_then(|p| p.season.as_deref())
            .unwrap_or(&self.default_season);
        let suffix = if self.is_weekend(date) { "WE" } else { "WD" };
        format!("{season}-{suffix}")
    }

    /// Grade for a date: a matching special period beats the occupancy thresholds.
    pub fn grade_for(&self, date: NaiveDate, occupancy: f64) -> (BarGrade, Option<&SpecialPeriod>) {
        match self.period_for(date) {
            Some(period) => {
                let grade = match period.grade {
                    GradeOverride::Fixed(g) => g,
                    GradeOverride::WeekSplit { weekday, weekend } => {
                        if self.is_weekend(date) {
                            weekend
                        } else {
                            weekday
                        }
                    }
                };
                (grade, Some(period))
            }
            None => (BarGrade::from_occupancy(occupancy), None),
        }
    }

    /// Unknown rooms and missing table entries price at zero.
    pub fn base_price(&self, room_id: &str, date: NaiveDate, grade: BarGrade) -> i64 {
        match self.room(room_id).map(|r| &r.pricing) {
            Some(RoomPricing::Grade(prices)) => prices.get(&grade).copied().unwrap_or(0),
            Some(RoomPricing::Season(prices)) => {
                prices.get(&self.season_code(date)).copied().unwrap_or(0)
            }
            None => 0,
        }
    }

    pub fn determine(
        &self,
        room_id: &str,
        date: NaiveDate,
        available: i64,
        total: i64,
    ) -> Determination {
        let occ = occupancy(available, total);
        let (grade, period) = self.grade_for(date, occ);
        Determination {
            occupancy: occ,
            grade,
            base_price: self.base_price(room_id, date, grade),
            period: period.map(|p| p.name.clone()),
        }
    }
}
