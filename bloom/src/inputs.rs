//! Field inputs supplied by the form or a YAML field file

use std::fs;
use std::path::Path;

use agronomy::{ClimateSnapshot, CompactionQuery, FieldConditions, NpkLevels, Rotation, SoilComposition, SoilValues};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the six recommendation modules read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInputs {
    pub crops: CropPlan,
    pub soil: SoilSample,
    #[serde(default)]
    pub management: Management,
    pub location: Location,
    /// Caller-supplied climate; the climate source is used when absent
    #[serde(default)]
    pub climate: Option<ClimateSnapshot>,
}

/// Cash-crop rotation and seed choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPlan {
    pub current: String,
    pub next: String,
    pub after_next: String,
    /// Seed variety to plant; the current crop name when unset
    #[serde(default)]
    pub seed_variety: Option<String>,
    /// Season year for planting dates; the current year when unset
    #[serde(default)]
    pub season: Option<i32>,
}

/// Soil test results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    /// Nitrogen (kg/ha)
    #[serde(rename = "N")]
    pub n: f64,
    /// Phosphorus (kg/ha)
    #[serde(rename = "P")]
    pub p: f64,
    /// Potassium (kg/ha)
    #[serde(rename = "K")]
    pub k: f64,
    pub ph: f64,
    /// Cation exchange capacity (cmol/kg)
    pub cec: f64,
    /// Soil organic carbon (g/kg)
    pub soc: f64,
    pub sand: f64,
    pub silt: f64,
    pub clay: f64,
    /// Volumetric moisture (%)
    pub moisture: f64,
    /// g/cm³
    pub bulk_density: f64,
    /// MPa
    pub penetration_resistance: f64,
    /// Organic matter (%)
    pub organic_matter: f64,
    /// Depth of the compacted layer (cm)
    pub depth: f64,
}

/// Field management history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Management {
    pub traffic_intensity: String,
    pub compaction_history: String,
    /// Direct compaction reading (bulk density, g/cm³)
    pub compaction_measurement: Option<f64>,
    /// Plough depth (cm)
    pub plough_depth: Option<f64>,
    pub bare_soil_history: Option<bool>,
    pub machine_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl FieldInputs {
    /// Load a YAML field file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context(format!("Failed to read field file {}", path.display()))?;
        Self::from_yaml(&content).context(format!("Failed to parse field file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut inputs: Self = serde_yaml::from_str(content)?;
        inputs.normalize();
        Ok(inputs)
    }

    /// Crop names are matched against lowercase table keys
    pub fn normalize(&mut self) {
        debug!("normalize: called");
        for crop in [&mut self.crops.current, &mut self.crops.next, &mut self.crops.after_next] {
            *crop = crop.trim().to_lowercase();
        }
        if let Some(variety) = &mut self.crops.seed_variety {
            *variety = variety.trim().to_string();
        }
    }

    /// The crop being advised on
    pub fn crop_type(&self) -> &str {
        &self.crops.current
    }

    pub fn seed_variety(&self) -> &str {
        self.crops.seed_variety.as_deref().unwrap_or(&self.crops.current)
    }

    pub fn composition(&self) -> SoilComposition {
        SoilComposition::new(self.soil.sand, self.soil.silt, self.soil.clay)
    }

    pub fn npk(&self) -> NpkLevels {
        NpkLevels::new(self.soil.n, self.soil.p, self.soil.k)
    }

    pub fn rotation(&self) -> Rotation {
        Rotation {
            current: self.crops.current.clone(),
            next: self.crops.next.clone(),
            after_next: self.crops.after_next.clone(),
        }
    }

    pub fn soil_values(&self) -> SoilValues {
        SoilValues::nutrients_and_texture(
            self.soil.n,
            self.soil.p,
            self.soil.k,
            self.soil.sand,
            self.soil.silt,
            self.soil.clay,
        )
    }

    pub fn conditions(&self) -> FieldConditions {
        FieldConditions {
            soil_moisture: self.soil.moisture,
            bulk_density: self.soil.bulk_density,
            penetration_resistance: self.soil.penetration_resistance,
        }
    }

    pub fn compaction_query(&self) -> CompactionQuery {
        CompactionQuery {
            measurement: self.management.compaction_measurement,
            plough_depth: self.management.plough_depth,
            bare_soil_history: self.management.bare_soil_history,
            machine_type: self.management.machine_type.clone(),
        }
    }
}
