//! USDA soil texture classification
//!
//! Maps sand/silt/clay percentages onto a texture class with a fixed decision
//! tree: clay bands first (>=40, >=27, >=20, >=7), sand/silt splits inside each
//! band, then silt- or sand-dominant classes below 7% clay. Every input,
//! including out-of-range values, lands on some class.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sand, silt and clay percentages of a soil sample
///
/// The three values are not required to sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilComposition {
    pub sand: f64,
    pub silt: f64,
    pub clay: f64,
}

impl SoilComposition {
    pub fn new(sand: f64, silt: f64, clay: f64) -> Self {
        Self { sand, silt, clay }
    }

    /// Texture class of this composition
    pub fn texture(&self) -> SoilTexture {
        classify_soil_texture(self.sand, self.silt, self.clay)
    }
}

/// Texture classes produced by [`classify_soil_texture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilTexture {
    #[serde(rename = "Clay")]
    Clay,
    #[serde(rename = "Silty clay")]
    SiltyClay,
    #[serde(rename = "Clay loam")]
    ClayLoam,
    #[serde(rename = "Silty clay loam")]
    SiltyClayLoam,
    #[serde(rename = "Loam")]
    Loam,
    #[serde(rename = "Sandy clay loam")]
    SandyClayLoam,
    #[serde(rename = "Silt loam")]
    SiltLoam,
    #[serde(rename = "Silt")]
    Silt,
    #[serde(rename = "Sand")]
    Sand,
    #[serde(rename = "Loamy sand")]
    LoamySand,
    #[serde(rename = "Sandy loam")]
    SandyLoam,
}

impl SoilTexture {
    /// Label used as the reference-table key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clay => "Clay",
            Self::SiltyClay => "Silty clay",
            Self::ClayLoam => "Clay loam",
            Self::SiltyClayLoam => "Silty clay loam",
            Self::Loam => "Loam",
            Self::SandyClayLoam => "Sandy clay loam",
            Self::SiltLoam => "Silt loam",
            Self::Silt => "Silt",
            Self::Sand => "Sand",
            Self::LoamySand => "Loamy sand",
            Self::SandyLoam => "Sandy loam",
        }
    }
}

impl fmt::Display for SoilTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a sample by its sand/silt/clay percentages
pub fn classify_soil_texture(sand: f64, silt: f64, clay: f64) -> SoilTexture {
    if clay >= 40.0 {
        SoilTexture::Clay
    } else if clay >= 27.0 {
        if sand >= 20.0 {
            SoilTexture::ClayLoam
        } else {
            SoilTexture::SiltyClay
        }
    } else if clay >= 20.0 {
        if sand >= 45.0 {
            SoilTexture::ClayLoam
        } else if silt >= 28.0 {
            SoilTexture::SiltyClayLoam
        } else {
            SoilTexture::Loam
        }
    } else if clay >= 7.0 {
        if sand >= 52.0 {
            SoilTexture::SandyClayLoam
        } else if silt >= 50.0 {
            SoilTexture::SiltLoam
        } else {
            SoilTexture::Loam
        }
    } else if silt >= 80.0 {
        SoilTexture::Silt
    } else if silt >= 50.0 {
        SoilTexture::SiltLoam
    } else if sand >= 85.0 {
        SoilTexture::Sand
    } else if sand >= 70.0 {
        SoilTexture::LoamySand
    } else {
        SoilTexture::SandyLoam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clay_band_boundary() {
        assert_eq!(classify_soil_texture(20.0, 30.0, 50.0), SoilTexture::Clay);
        assert_eq!(classify_soil_texture(10.0, 51.0, 39.0), SoilTexture::SiltyClay);
        assert_eq!(classify_soil_texture(30.0, 31.0, 39.0), SoilTexture::ClayLoam);
    }

    #[test]
    fn test_mid_clay_bands() {
        assert_eq!(classify_soil_texture(50.0, 25.0, 25.0), SoilTexture::ClayLoam);
        assert_eq!(classify_soil_texture(30.0, 45.0, 25.0), SoilTexture::SiltyClayLoam);
        assert_eq!(classify_soil_texture(44.0, 27.0, 25.0), SoilTexture::Loam);
        assert_eq!(classify_soil_texture(65.0, 20.0, 15.0), SoilTexture::SandyClayLoam);
        assert_eq!(classify_soil_texture(20.0, 65.0, 15.0), SoilTexture::SiltLoam);
        assert_eq!(classify_soil_texture(45.0, 40.0, 15.0), SoilTexture::Loam);
    }

    #[test]
    fn test_low_clay_classes() {
        assert_eq!(classify_soil_texture(5.0, 90.0, 5.0), SoilTexture::Silt);
        assert_eq!(classify_soil_texture(35.0, 60.0, 5.0), SoilTexture::SiltLoam);
        assert_eq!(classify_soil_texture(92.0, 5.0, 3.0), SoilTexture::Sand);
        assert_eq!(classify_soil_texture(75.0, 20.0, 5.0), SoilTexture::LoamySand);
        assert_eq!(classify_soil_texture(60.0, 35.0, 5.0), SoilTexture::SandyLoam);
    }

    #[test]
    fn test_out_of_range_still_classifies() {
        assert_eq!(classify_soil_texture(-10.0, -10.0, -10.0), SoilTexture::SandyLoam);
        assert_eq!(classify_soil_texture(500.0, 0.0, 0.0), SoilTexture::Sand);
    }

    #[test]
    fn test_display_matches_table_key() {
        assert_eq!(SoilTexture::SiltyClayLoam.to_string(), "Silty clay loam");
        let json = serde_json::to_string(&SoilTexture::LoamySand).unwrap();
        assert_eq!(json, "\"Loamy sand\"");
    }

    proptest! {
        #[test]
        fn prop_high_clay_is_always_clay(clay in 40.0f64..100.0, sand in -50.0f64..150.0, silt in -50.0f64..150.0) {
            prop_assert_eq!(classify_soil_texture(sand, silt, clay), SoilTexture::Clay);
        }
    }
}
