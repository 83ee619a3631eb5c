//! Seed treatment and seed variety reference lookups

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AgronomyError, Result};
use crate::table::{Keyed, KeyedTable};

/// Fallback crop of the seed tables
pub const GENERAL_CROP: &str = "General";

/// One inoculant/method option for a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTreatment {
    pub crop: String,
    pub inoculant: String,
    pub method: String,
}

impl Keyed for SeedTreatment {
    fn key(&self) -> &str {
        &self.crop
    }
}

#[derive(Debug, Clone)]
pub struct SeedTreatments {
    table: KeyedTable<SeedTreatment>,
}

impl SeedTreatments {
    pub fn new(rows: Vec<SeedTreatment>) -> Self {
        Self {
            table: KeyedTable::new("seed treatments", GENERAL_CROP, rows),
        }
    }

    /// Inoculant options for the crop, or the "General" options
    pub fn inoculants(&self, crop: &str) -> Result<Vec<&SeedTreatment>> {
        self.table.lookup_all(crop)
    }
}

/// Agronomic traits of a seed variety
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedVariety {
    pub variety: String,
    pub crop_type: String,
    pub days_to_maturity: u32,
    /// Minimum soil temperature for germination (°C)
    pub min_soil_temp: f64,
    pub frost_tolerance: String,
    pub drought_tolerance: String,
}

#[derive(Debug, Clone, Default)]
pub struct SeedVarieties {
    rows: Vec<SeedVariety>,
}

impl SeedVarieties {
    pub fn new(rows: Vec<SeedVariety>) -> Self {
        Self { rows }
    }

    /// Exact variety, then the crop named by the variety's first word, then "General"
    pub fn lookup(&self, variety: &str) -> Result<&SeedVariety> {
        if let Some(row) = self.rows.iter().find(|r| r.variety == variety) {
            return Ok(row);
        }
        let crop_type = variety.split_whitespace().next().unwrap_or_default();
        if let Some(row) = self.rows.iter().find(|r| r.crop_type == crop_type) {
            debug!("lookup: variety '{}' not found, using crop type '{}'", variety, crop_type);
            return Ok(row);
        }
        debug!("lookup: variety '{}' not found, using '{}'", variety, GENERAL_CROP);
        self.rows
            .iter()
            .find(|r| r.crop_type == GENERAL_CROP)
            .ok_or_else(|| AgronomyError::LookupMiss {
                table: "seed varieties",
                key: variety.to_string(),
                fallback: GENERAL_CROP.to_string(),
            })
    }
}
