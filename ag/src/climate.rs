//! Climate snapshot collaborator
//!
//! Planting decisions need a climate summary for the field location. The
//! weather service is an external collaborator; [`StaticClimate`] provides the
//! regional default used when no live source is wired in.

use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Continental,
}

impl ClimateZone {
    /// Zone by absolute latitude
    pub fn from_latitude(latitude: f64) -> Self {
        let lat = latitude.abs();
        if lat < 23.5 {
            Self::Tropical
        } else if lat < 40.0 {
            Self::Subtropical
        } else if lat < 60.0 {
            Self::Temperate
        } else {
            Self::Continental
        }
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tropical => "Tropical",
            Self::Subtropical => "Subtropical",
            Self::Temperate => "Temperate",
            Self::Continental => "Continental",
        };
        write!(f, "{}", s)
    }
}

/// Climate summary for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSnapshot {
    pub climate_zone: ClimateZone,
    /// Average minimum temperature (°C)
    pub avg_temp_min: f64,
    /// Average maximum temperature (°C)
    pub avg_temp_max: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Annual rainfall (mm)
    pub annual_rainfall: f64,
    /// First frost-free day of the year
    pub frost_free_start: u32,
    /// Last frost-free day of the year
    pub frost_free_end: u32,
    /// Growing season length (days)
    pub growing_season_length: u32,
    /// Soil temperature (°C)
    pub soil_temp: f64,
    pub weather_pattern: String,
}

/// Source of climate snapshots
pub trait ClimateSource: Send + Sync {
    fn get_climate(&self, latitude: f64, longitude: f64) -> ClimateSnapshot;
}

/// Moderate seasonal defaults with the zone taken from latitude
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticClimate;

impl ClimateSource for StaticClimate {
    fn get_climate(&self, latitude: f64, _longitude: f64) -> ClimateSnapshot {
        ClimateSnapshot {
            climate_zone: ClimateZone::from_latitude(latitude),
            avg_temp_min: 10.0,
            avg_temp_max: 25.0,
            humidity: 65.0,
            annual_rainfall: 800.0,
            frost_free_start: 90,
            frost_free_end: 300,
            growing_season_length: 180,
            soil_temp: 15.0,
            weather_pattern: "Moderate seasonal variation".to_string(),
        }
    }
}

/// Render a day-of-year as "Month DD"; days past the year end roll over
pub fn day_of_year_to_date(day_of_year: u32, year: i32) -> Option<String> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = start.checked_add_signed(TimeDelta::days(i64::from(day_of_year) - 1))?;
    Some(date.format("%B %d").to_string())
}
