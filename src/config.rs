// src/config.rs
use crate::domain::grade::BarGrade;
use crate::domain::rate_card::{GradeOverride, RateCard, Room, RoomPricing, SpecialPeriod};
use crate::errors::ServerError;
use crate::spreadsheets::ReportLayout;
use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RMS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "rms.toml";

/// Validated runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rate_card: RateCard,
    pub layout: ReportLayout,
    /// Channel every fresh install starts with.
    pub default_channel: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_workers: usize,
    pub database: String,
    pub schema: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            database: "rms.sqlite3".to_string(),
            schema: "sql/schema.sql".to_string(),
        }
    }
}

// ---- file shape ----

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    server: ServerConfig,
    layout: ReportLayout,
    default_channel: String,
    default_season: String,
    weekend_days: Vec<Weekday>,
    rooms: Vec<RawRoom>,
    special_periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
struct RawRoom {
    id: String,
    #[serde(default)]
    grade_prices: BTreeMap<String, i64>,
    #[serde(default)]
    season_prices: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    name: String,
    start: NaiveDate,
    end: NaiveDate,
    grade: Option<String>,
    weekday_grade: Option<String>,
    weekend_grade: Option<String>,
    season: Option<String>,
}

/// Price tables of the five room types the hotel runs on the BAR ladder.
const DEFAULT_ROOMS: [(&str, [i64; 8]); 5] = [
    ("FDB", [728000, 642000, 567000, 502000, 445000, 396000, 353000, 315000]),
    ("FDE", [765000, 679000, 604000, 539000, 482000, 433000, 390000, 352000]),
    ("HDP", [663000, 577000, 502000, 437000, 380000, 331000, 288000, 250000]),
    ("HDT", [663000, 577000, 502000, 437000, 380000, 331000, 288000, 250000]),
    ("HDF", [833000, 747000, 672000, 607000, 550000, 501000, 458000, 420000]),
];

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            layout: ReportLayout::default(),
            default_channel: "Naver".to_string(),
            default_season: "OFF".to_string(),
            weekend_days: vec![Weekday::Fri, Weekday::Sat],
            rooms: DEFAULT_ROOMS
                .iter()
                .map(|(id, prices)| RawRoom {
                    id: id.to_string(),
                    grade_prices: BarGrade::ALL
                        .iter()
                        .zip(prices)
                        .map(|(g, p)| (g.label().to_string(), *p))
                        .collect(),
                    season_prices: BTreeMap::new(),
                })
                .collect(),
            special_periods: Vec::new(),
        }
    }
}

fn parse_grade(field: &str, value: &str) -> Result<BarGrade, ServerError> {
    value
        .parse()
        .map_err(|e| ServerError::Config(format!("{field}: {e}")))
}

impl RawRoom {
    fn into_room(self) -> Result<Room, ServerError> {
        let id = self.id.trim().to_uppercase();
        if id.is_empty() {
            return Err(ServerError::Config("room id must not be empty".into()));
        }

        let pricing = match (self.grade_prices.is_empty(), self.season_prices.is_empty()) {
            (false, true) => {
                let mut prices = BTreeMap::new();
                for (label, price) in self.grade_prices {
                    let grade = parse_grade(&format!("rooms.{id}.grade_prices"), &label)?;
                    prices.insert(grade, price);
                }
                RoomPricing::Grade(prices)
            }
            (true, false) => RoomPricing::Season(self.season_prices),
            (true, true) => {
                return Err(ServerError::Config(format!("room {id} has no prices")));
            }
            (false, false) => {
                return Err(ServerError::Config(format!(
                    "room {id} mixes grade_prices and season_prices"
                )));
            }
        };

        let prices: Vec<i64> = match &pricing {
            RoomPricing::Grade(p) => p.values().copied().collect(),
            RoomPricing::Season(p) => p.values().copied().collect(),
        };
        if prices.iter().any(|p| *p <= 0) {
            return Err(ServerError::Config(format!("room {id} has a non-positive price")));
        }

        Ok(Room { id, pricing })
    }
}

impl RawPeriod {
    fn into_period(self) -> Result<SpecialPeriod, ServerError> {
        let field = format!("special_periods.{}", self.name);
        if self.start > self.end {
            return Err(ServerError::Config(format!("{field}: start is after end")));
        }

        let grade = match (self.grade, self.weekday_grade, self.weekend_grade) {
            (Some(g), None, None) => GradeOverride::Fixed(parse_grade(&field, &g)?),
            (None, Some(wd), Some(we)) => GradeOverride::WeekSplit {
                weekday: parse_grade(&field, &wd)?,
                weekend: parse_grade(&field, &we)?,
            },
            _ => {
                return Err(ServerError::Config(format!(
                    "{field}: set either grade or both weekday_grade and weekend_grade"
                )));
            }
        };

        Ok(SpecialPeriod {
            name: self.name,
            start: self.start,
            end: self.end,
            grade,
            season: self.season,
        })
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ServerError> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Falls back to built-in defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Self::from_raw(RawConfig::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Path from `RMS_CONFIG`, else `rms.toml`.
    pub fn load_from_env() -> Result<Self, ServerError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ServerError> {
        let rooms = raw
            .rooms
            .into_iter()
            .map(RawRoom::into_room)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        if let Some(dup) = rooms.iter().find(|r| !seen.insert(r.id.clone())) {
            return Err(ServerError::Config(format!("room {} is listed twice", dup.id)));
        }

        let periods = raw
            .special_periods
            .into_iter()
            .map(RawPeriod::into_period)
            .collect::<Result<Vec<_>, _>>()?;

        if raw.default_channel.trim().is_empty() {
            return Err(ServerError::Config("default_channel must not be empty".into()));
        }

        Ok(Self {
            server: raw.server,
            rate_card: RateCard {
                rooms,
                periods,
                weekend_days: raw.weekend_days,
                default_season: raw.default_season,
            },
            layout: raw.layout,
            default_channel: raw.default_channel.trim().to_string(),
        })
    }
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default()).expect("built-in defaults are valid")
    }
}
