//! Compaction severity ranking
//!
//! A measured compaction value is ranked Green/Orange/Red against the
//! texture-specific band from the thresholds table. Without a measurement the
//! assessment carries the field history instead and leaves the qualitative
//! ranking to the text generator.

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{AgronomyError, Result};
use crate::table::{Keyed, KeyedTable};
use crate::texture::{SoilComposition, SoilTexture};

/// Fallback key of the compaction thresholds table
pub const GENERAL_TEXTURE: &str = "General";

/// Cut points for one soil texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub soil_texture: String,
    pub green_max: f64,
    pub orange_max: f64,
    pub red_min: f64,
}

impl Keyed for ThresholdBand {
    fn key(&self) -> &str {
        &self.soil_texture
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompactionLevel {
    #[serde(rename = "Good/Acceptable")]
    Good,
    Concerning,
    Alarming,
}

impl CompactionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good/Acceptable",
            Self::Concerning => "Concerning",
            Self::Alarming => "Alarming",
        }
    }
}

impl fmt::Display for CompactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandColor {
    Green,
    Orange,
    Red,
}

impl fmt::Display for BandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Green => "Green",
            Self::Orange => "Orange",
            Self::Red => "Red",
        };
        write!(f, "{}", s)
    }
}

/// Ranked compaction value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactionClassification {
    pub level: CompactionLevel,
    pub color: BandColor,
    pub description: String,
}

impl CompactionClassification {
    /// Two-cut partition; band edges belong to the lower classification
    pub fn from_band(value: f64, band: &ThresholdBand) -> Self {
        let (level, color, description) = if value <= band.green_max {
            (
                CompactionLevel::Good,
                BandColor::Green,
                "Compaction level is within acceptable range",
            )
        } else if value <= band.orange_max {
            (
                CompactionLevel::Concerning,
                BandColor::Orange,
                "Compaction level is concerning and may affect crop growth",
            )
        } else {
            (
                CompactionLevel::Alarming,
                BandColor::Red,
                "Compaction level is alarming and requires immediate attention",
            )
        };
        Self {
            level,
            color,
            description: description.to_string(),
        }
    }
}

/// Field history used when no direct measurement exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHistory {
    /// Past ploughing depth in cm
    pub plough_depth: f64,
    /// Whether the soil was left bare between crops
    pub bare_soil_history: bool,
    /// Machine used for ploughing
    pub machine_type: String,
}

/// Inputs of a compaction assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactionQuery {
    pub measurement: Option<f64>,
    pub plough_depth: Option<f64>,
    pub bare_soil_history: Option<bool>,
    pub machine_type: Option<String>,
}

impl CompactionQuery {
    pub fn measured(value: f64) -> Self {
        Self {
            measurement: Some(value),
            ..Default::default()
        }
    }

    pub fn from_history(history: FieldHistory) -> Self {
        Self {
            measurement: None,
            plough_depth: Some(history.plough_depth),
            bare_soil_history: Some(history.bare_soil_history),
            machine_type: Some(history.machine_type),
        }
    }

    /// Field history, required when no measurement is given
    pub fn history(&self) -> Result<FieldHistory> {
        match (&self.plough_depth, &self.bare_soil_history, &self.machine_type) {
            (Some(plough_depth), Some(bare_soil_history), Some(machine_type)) => Ok(FieldHistory {
                plough_depth: *plough_depth,
                bare_soil_history: *bare_soil_history,
                machine_type: machine_type.clone(),
            }),
            _ => Err(AgronomyError::InvalidArgument(
                "When compaction measurement is not available, plough_depth, bare_soil_history, \
                 and machine_type are required"
                    .to_string(),
            )),
        }
    }
}

/// How the compaction level was established
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method")]
pub enum AssessmentMethod {
    #[serde(rename = "Direct measurement")]
    Measured {
        value: f64,
        classification: CompactionClassification,
    },
    #[serde(rename = "Estimation based on field history")]
    Estimated { history: FieldHistory },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactionAssessment {
    pub composition: SoilComposition,
    pub texture: SoilTexture,
    #[serde(flatten)]
    pub method: AssessmentMethod,
}

impl CompactionAssessment {
    pub fn measurement_available(&self) -> bool {
        matches!(self.method, AssessmentMethod::Measured { .. })
    }

    pub fn method_label(&self) -> &'static str {
        match self.method {
            AssessmentMethod::Measured { .. } => "Direct measurement",
            AssessmentMethod::Estimated { .. } => "Estimation based on field history",
        }
    }

    pub fn classification(&self) -> Option<&CompactionClassification> {
        match &self.method {
            AssessmentMethod::Measured { classification, .. } => Some(classification),
            AssessmentMethod::Estimated { .. } => None,
        }
    }
}

/// Fixed action list attached to a compaction band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationBundle {
    pub action_required: String,
    pub recommendations: Vec<String>,
}

impl RecommendationBundle {
    fn new(action_required: &str, recommendations: &[&str]) -> Self {
        Self {
            action_required: action_required.to_string(),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn for_color(color: BandColor) -> Self {
        match color {
            BandColor::Green => Self::new("None", &["Continue current soil management practices"]),
            BandColor::Orange => Self::new(
                "Preventive measures",
                &[
                    "Monitor soil moisture before field operations",
                    "Consider controlled traffic farming",
                    "Implement cover crops to improve soil structure",
                ],
            ),
            BandColor::Red => Self::new(
                "Immediate intervention",
                &[
                    "Implement deep tillage or subsoiling",
                    "Avoid field operations when soil is wet",
                    "Consider using low ground pressure equipment",
                    "Establish permanent traffic lanes",
                ],
            ),
        }
    }

    pub fn assessment_needed() -> Self {
        Self::new(
            "Assessment needed",
            &[
                "Conduct direct compaction measurement",
                "Monitor based on field history assessment",
                "Implement preventive measures as precaution",
            ],
        )
    }
}

/// Ranks compaction against texture-specific thresholds
#[derive(Debug, Clone)]
pub struct CompactionAssessor {
    thresholds: KeyedTable<ThresholdBand>,
}

impl CompactionAssessor {
    pub fn new(rows: Vec<ThresholdBand>) -> Self {
        Self {
            thresholds: KeyedTable::new("compaction thresholds", GENERAL_TEXTURE, rows),
        }
    }

    /// Band for a texture label, falling back to "General"
    pub fn thresholds(&self, texture: &str) -> Result<&ThresholdBand> {
        self.thresholds.lookup(texture)
    }

    pub fn classify(&self, value: f64, texture: SoilTexture) -> Result<CompactionClassification> {
        let band = self.thresholds(texture.as_str())?;
        let classification = CompactionClassification::from_band(value, band);
        debug!(
            "classify: value={} texture={} -> {}",
            value, texture, classification.level
        );
        Ok(classification)
    }

    /// Assess compaction from a measurement, or validate the history path
    pub fn assess(&self, composition: SoilComposition, query: &CompactionQuery) -> Result<CompactionAssessment> {
        let texture = composition.texture();
        let method = match query.measurement {
            Some(value) => AssessmentMethod::Measured {
                value,
                classification: self.classify(value, texture)?,
            },
            None => AssessmentMethod::Estimated {
                history: query.history()?,
            },
        };
        let assessment = CompactionAssessment {
            composition,
            texture,
            method,
        };
        info!("assess: texture={} method={}", texture, assessment.method_label());
        Ok(assessment)
    }

    pub fn recommendations(&self, assessment: &CompactionAssessment) -> RecommendationBundle {
        match assessment.classification() {
            Some(c) => RecommendationBundle::for_color(c.color),
            None => RecommendationBundle::assessment_needed(),
        }
    }
}
