//! Fertilizer gap calculation against per-crop nutrient bands

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{Keyed, KeyedTable};

/// Fallback crop of the NPK targets table
pub const GENERAL_CROP: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nutrient {
    N,
    P,
    K,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::N, Nutrient::P, Nutrient::K];
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::N => "N",
            Self::P => "P",
            Self::K => "K",
        };
        write!(f, "{}", s)
    }
}

/// Acceptable band for one nutrient (kg/ha)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientBand {
    pub min: f64,
    pub max: f64,
}

impl NutrientBand {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Amount that lifts `current` to the band midpoint, zero when already at min
    pub fn gap(&self, current: f64) -> f64 {
        if current < self.min {
            self.midpoint() - current
        } else {
            0.0
        }
    }
}

/// NPK target row for a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpkTarget {
    pub crop: String,
    pub n: NutrientBand,
    pub p: NutrientBand,
    pub k: NutrientBand,
}

impl NpkTarget {
    pub fn band(&self, nutrient: Nutrient) -> &NutrientBand {
        match nutrient {
            Nutrient::N => &self.n,
            Nutrient::P => &self.p,
            Nutrient::K => &self.k,
        }
    }
}

impl Keyed for NpkTarget {
    fn key(&self) -> &str {
        &self.crop
    }
}

/// Current or recommended N, P and K amounts (kg/ha)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NpkLevels {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
}

impl NpkLevels {
    pub fn new(n: f64, p: f64, k: f64) -> Self {
        Self { n, p, k }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::N => self.n,
            Nutrient::P => self.p,
            Nutrient::K => self.k,
        }
    }

    fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::N => self.n = value,
            Nutrient::P => self.p = value,
            Nutrient::K => self.k = value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NutrientGapCalculator {
    targets: KeyedTable<NpkTarget>,
}

impl NutrientGapCalculator {
    pub fn new(rows: Vec<NpkTarget>) -> Self {
        Self {
            targets: KeyedTable::new("npk targets", GENERAL_CROP, rows),
        }
    }

    pub fn target(&self, crop: &str) -> Result<&NpkTarget> {
        self.targets.lookup(crop)
    }

    /// Per-nutrient deltas for the crop, falling back to the "general" row
    pub fn gap(&self, crop: &str, current: NpkLevels) -> Result<NpkLevels> {
        let target = self.target(crop)?;
        let mut deltas = NpkLevels::default();
        for nutrient in Nutrient::ALL {
            deltas.set(nutrient, target.band(nutrient).gap(current.get(nutrient)));
        }
        debug!("gap: crop={} target={} deltas={:?}", crop, target.crop, deltas);
        Ok(deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(crop: &str, n: (f64, f64), p: (f64, f64), k: (f64, f64)) -> NpkTarget {
        NpkTarget {
            crop: crop.to_string(),
            n: NutrientBand { min: n.0, max: n.1 },
            p: NutrientBand { min: p.0, max: p.1 },
            k: NutrientBand { min: k.0, max: k.1 },
        }
    }

    fn calculator() -> NutrientGapCalculator {
        NutrientGapCalculator::new(vec![
            target("maize", (40.0, 80.0), (20.0, 40.0), (100.0, 160.0)),
            target(GENERAL_CROP, (30.0, 60.0), (15.0, 30.0), (80.0, 120.0)),
        ])
    }

    #[test]
    fn test_gap_targets_midpoint() {
        let deltas = calculator().gap("maize", NpkLevels::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(deltas.n, 60.0);
        assert_eq!(deltas.p, 30.0);
        assert_eq!(deltas.k, 130.0);
    }

    #[test]
    fn test_no_gap_at_or_above_min() {
        let deltas = calculator().gap("maize", NpkLevels::new(90.0, 20.0, 99.0)).unwrap();
        assert_eq!(deltas.n, 0.0);
        assert_eq!(deltas.p, 0.0);
        assert_eq!(deltas.k, 31.0);
    }

    #[test]
    fn test_unknown_crop_uses_general() {
        let deltas = calculator().gap("quinoa", NpkLevels::new(10.0, 15.0, 200.0)).unwrap();
        assert_eq!(deltas.n, 35.0);
        assert_eq!(deltas.p, 0.0);
        assert_eq!(deltas.k, 0.0);
    }

    #[test]
    fn test_missing_general_row_fails() {
        let calc = NutrientGapCalculator::new(vec![target("maize", (40.0, 80.0), (20.0, 40.0), (100.0, 160.0))]);
        assert!(calc.gap("rice", NpkLevels::default()).unwrap_err().is_lookup_miss());
    }

    #[test]
    fn test_gap_is_positive_below_min() {
        let band = NutrientBand { min: 10.0, max: 10.0 };
        assert!(band.gap(9.99) > 0.0);
        assert_eq!(band.gap(10.0), 0.0);
    }
}
