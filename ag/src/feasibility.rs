//! Subsoiling feasibility and decompaction method selection

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{Keyed, KeyedTable};
use crate::texture::SoilComposition;

/// Fallback crop of the decompaction methods table
pub const GENERAL_CROP: &str = "General";

/// Texture family used for moisture and tillage decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilFamily {
    Sandy,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
    Clay,
    #[serde(rename = "Clay Loam")]
    ClayLoam,
    Silt,
    #[serde(rename = "Silt Loam")]
    SiltLoam,
    Loam,
}

impl SoilFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandy => "Sandy",
            Self::SandyLoam => "Sandy Loam",
            Self::Clay => "Clay",
            Self::ClayLoam => "Clay Loam",
            Self::Silt => "Silt",
            Self::SiltLoam => "Silt Loam",
            Self::Loam => "Loam",
        }
    }
}

impl fmt::Display for SoilFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive soil-moisture window (%) suitable for subsoiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureBand {
    pub min: f64,
    pub max: f64,
}

impl MoistureBand {
    pub fn contains(&self, moisture: f64) -> bool {
        self.min <= moisture && moisture <= self.max
    }
}

impl fmt::Display for MoistureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}%", self.min, self.max)
    }
}

/// Soil family and moisture window, from ordered sand/clay/silt checks
pub fn optimal_moisture(composition: &SoilComposition) -> (SoilFamily, MoistureBand) {
    let SoilComposition { sand, silt, clay } = *composition;
    let (family, min, max) = if sand > 85.0 {
        (SoilFamily::Sandy, 8.0, 12.0)
    } else if sand > 70.0 {
        (SoilFamily::SandyLoam, 10.0, 14.0)
    } else if clay > 40.0 {
        (SoilFamily::Clay, 15.0, 22.0)
    } else if clay > 27.0 {
        (SoilFamily::ClayLoam, 14.0, 20.0)
    } else if silt > 80.0 {
        (SoilFamily::Silt, 12.0, 18.0)
    } else if silt > 50.0 {
        (SoilFamily::SiltLoam, 12.0, 18.0)
    } else {
        (SoilFamily::Loam, 12.0, 18.0)
    };
    (family, MoistureBand { min, max })
}

/// Field conditions that decide on subsoiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConditions {
    /// Volumetric soil moisture (%)
    pub soil_moisture: f64,
    /// Bulk density (g/cm3)
    pub bulk_density: f64,
    /// Penetration resistance (MPa)
    pub penetration_resistance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub soil_type: SoilFamily,
    pub optimal_moisture: MoistureBand,
    pub moisture_suitable: bool,
    pub compaction_severe: bool,
    pub penetration_severe: bool,
    pub subsoiling_recommended: bool,
}

/// Subsoiling is recommended when moisture is in range and compaction is severe
pub fn check_feasibility(composition: &SoilComposition, conditions: &FieldConditions) -> FeasibilityResult {
    let (soil_type, band) = optimal_moisture(composition);
    let moisture_suitable = band.contains(conditions.soil_moisture);

    let density_limit = if composition.sand > 70.0 {
        1.6
    } else if composition.clay > 30.0 {
        1.3
    } else {
        1.4
    };
    let compaction_severe = conditions.bulk_density > density_limit;
    let penetration_severe = conditions.penetration_resistance > 2.0;
    let subsoiling_recommended = moisture_suitable && (compaction_severe || penetration_severe);

    debug!(
        "check_feasibility: soil_type={} moisture_suitable={} compaction_severe={} penetration_severe={}",
        soil_type, moisture_suitable, compaction_severe, penetration_severe
    );

    FeasibilityResult {
        soil_type,
        optimal_moisture: band,
        moisture_suitable,
        compaction_severe,
        penetration_severe,
        subsoiling_recommended,
    }
}

/// Timing advice for decompaction work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoistureAdvice {
    pub soil_type: SoilFamily,
    pub optimal_moisture_range: String,
    pub subsoiling_timing: String,
    pub avoid_conditions: String,
}

pub fn moisture_recommendation(composition: &SoilComposition) -> MoistureAdvice {
    let (soil_type, band) = optimal_moisture(composition);
    MoistureAdvice {
        soil_type,
        optimal_moisture_range: band.to_string(),
        subsoiling_timing: "Implement subsoiling when soil moisture is within optimal range".to_string(),
        avoid_conditions: "Avoid when soil is too wet (above range) or too dry (below range)".to_string(),
    }
}

/// A decompaction method row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompactionMethod {
    pub crop: String,
    pub method: String,
    /// Comma separated soil families, or "All"
    pub suitable_soil_types: String,
    pub optimal_moisture_min: f64,
    pub optimal_moisture_max: f64,
    pub effectiveness_rating: f64,
    #[serde(default)]
    pub implementation_notes: String,
}

impl Keyed for DecompactionMethod {
    fn key(&self) -> &str {
        &self.crop
    }
}

impl DecompactionMethod {
    pub fn suits(&self, soil_type: SoilFamily) -> bool {
        self.suitable_soil_types == "All" || self.suitable_soil_types.contains(soil_type.as_str())
    }
}

/// Decompaction methods by crop
#[derive(Debug, Clone)]
pub struct DecompactionMethods {
    table: KeyedTable<DecompactionMethod>,
}

impl DecompactionMethods {
    pub fn new(rows: Vec<DecompactionMethod>) -> Self {
        Self {
            table: KeyedTable::new("decompaction methods", GENERAL_CROP, rows),
        }
    }

    /// Methods for the crop (or "General") that suit the soil family
    pub fn filter(&self, crop: &str, soil_type: SoilFamily) -> Result<Vec<&DecompactionMethod>> {
        let methods: Vec<&DecompactionMethod> = self
            .table
            .lookup_all(crop)?
            .into_iter()
            .filter(|m| m.suits(soil_type))
            .collect();
        debug!("filter: crop={} soil_type={} -> {} methods", crop, soil_type, methods.len());
        Ok(methods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(soil_moisture: f64, bulk_density: f64, penetration_resistance: f64) -> FieldConditions {
        FieldConditions {
            soil_moisture,
            bulk_density,
            penetration_resistance,
        }
    }

    #[test]
    fn test_optimal_moisture_order() {
        let cases = [
            ((90.0, 5.0, 5.0), SoilFamily::Sandy, 8.0),
            ((75.0, 10.0, 45.0), SoilFamily::SandyLoam, 10.0),
            ((20.0, 30.0, 50.0), SoilFamily::Clay, 15.0),
            ((30.0, 40.0, 30.0), SoilFamily::ClayLoam, 14.0),
            ((5.0, 85.0, 10.0), SoilFamily::Silt, 12.0),
            ((30.0, 60.0, 10.0), SoilFamily::SiltLoam, 12.0),
            ((40.0, 40.0, 20.0), SoilFamily::Loam, 12.0),
        ];
        for ((sand, silt, clay), family, min) in cases {
            let (got, band) = optimal_moisture(&SoilComposition::new(sand, silt, clay));
            assert_eq!(got, family);
            assert_eq!(band.min, min);
        }
    }

    #[test]
    fn test_moisture_band_is_inclusive() {
        let loam = SoilComposition::new(40.0, 40.0, 20.0);
        assert!(check_feasibility(&loam, &conditions(12.0, 1.5, 1.0)).moisture_suitable);
        assert!(check_feasibility(&loam, &conditions(18.0, 1.5, 1.0)).moisture_suitable);
        assert!(!check_feasibility(&loam, &conditions(18.5, 1.5, 1.0)).moisture_suitable);
    }

    #[test]
    fn test_density_limit_by_family() {
        let sandy = SoilComposition::new(80.0, 10.0, 10.0);
        assert!(!check_feasibility(&sandy, &conditions(12.0, 1.55, 1.0)).compaction_severe);
        let clay = SoilComposition::new(20.0, 40.0, 35.0);
        assert!(check_feasibility(&clay, &conditions(16.0, 1.35, 1.0)).compaction_severe);
        let loam = SoilComposition::new(40.0, 40.0, 20.0);
        assert!(!check_feasibility(&loam, &conditions(15.0, 1.4, 1.0)).compaction_severe);
    }

    #[test]
    fn test_recommendation_requires_moisture_and_severity() {
        let loam = SoilComposition::new(40.0, 40.0, 20.0);
        assert!(check_feasibility(&loam, &conditions(15.0, 1.2, 2.5)).subsoiling_recommended);
        assert!(!check_feasibility(&loam, &conditions(25.0, 1.6, 2.5)).subsoiling_recommended);
        assert!(!check_feasibility(&loam, &conditions(15.0, 1.2, 1.5)).subsoiling_recommended);
    }

    #[test]
    fn test_moisture_recommendation_range_text() {
        let advice = moisture_recommendation(&SoilComposition::new(90.0, 5.0, 5.0));
        assert_eq!(advice.soil_type, SoilFamily::Sandy);
        assert_eq!(advice.optimal_moisture_range, "8-12%");
    }

    fn method(crop: &str, name: &str, soils: &str) -> DecompactionMethod {
        DecompactionMethod {
            crop: crop.to_string(),
            method: name.to_string(),
            suitable_soil_types: soils.to_string(),
            optimal_moisture_min: 12.0,
            optimal_moisture_max: 18.0,
            effectiveness_rating: 4.0,
            implementation_notes: String::new(),
        }
    }

    #[test]
    fn test_filter_methods() {
        let methods = DecompactionMethods::new(vec![
            method("maize", "Subsoiling", "Loam, Clay Loam"),
            method("maize", "Strip tillage", "Sandy"),
            method("General", "Deep-rooted cover crops", "All"),
        ]);
        let found = methods.filter("maize", SoilFamily::Loam).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].method, "Subsoiling");

        let fallback = methods.filter("cotton", SoilFamily::Clay).unwrap();
        assert_eq!(fallback[0].method, "Deep-rooted cover crops");
    }
}
