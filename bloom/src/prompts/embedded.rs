//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when no override file exists.

/// Shared answer layout, registered as the `answer-format` partial
pub const ANSWER_FORMAT: &str = r#"Structure your answer in exactly two sections:

### Reasoning Section
Explain how the measurements and the calculated values lead to your advice.

### Conclusion Section
State the final, actionable recommendation for the farmer in a few short bullet points.
"#;

pub const NPK_SYSTEM: &str = r#"You are an agronomist and soil fertility advisor. You turn soil test results and calculated nutrient gaps into a fertilizer plan (product, rate in kg/ha, timing and split applications) that a farmer can follow.

{{> answer-format}}"#;

pub const NPK_USER: &str = r#"Crop: {{crop_type}} (nutrient targets taken from the "{{target_crop}}" row)

Soil test:
- Nitrogen (N): {{soil.N}} kg/ha
- Phosphorus (P): {{soil.P}} kg/ha
- Potassium (K): {{soil.K}} kg/ha
- pH: {{soil.ph}}
- CEC: {{soil.cec}} cmol/kg
- Soil organic carbon: {{soil.soc}} g/kg
- Texture: {{texture}} (sand {{soil.sand}}%, silt {{soil.silt}}%, clay {{soil.clay}}%)

Calculated amounts needed to reach the middle of the target band (kg/ha):
- N: {{recommended.N}}
- P: {{recommended.P}}
- K: {{recommended.K}}

Recommend a fertilizer plan for this field.
"#;

pub const SEED_TREATMENT_SYSTEM: &str = r#"You are a seed health and inoculant specialist. You choose seed treatments and biological inoculants, and explain how to apply them, for the crop and soil described.

{{> answer-format}}"#;

pub const SEED_TREATMENT_USER: &str = r#"Crop: {{crop_type}}

Available inoculants and application methods:
{{#each inoculants}}
- {{this.inoculant}} ({{this.method}})
{{/each}}

Soil:
- N {{soil.N}} kg/ha, P {{soil.P}} kg/ha, K {{soil.K}} kg/ha
- pH {{soil.ph}}, CEC {{soil.cec}} cmol/kg, SOC {{soil.soc}} g/kg
- Texture: {{texture}} (sand {{soil.sand}}%, silt {{soil.silt}}%, clay {{soil.clay}}%)

Recommend which options to use and how to apply them.
"#;

pub const DECOMPACTION_SYSTEM: &str = r#"You are a soil physics and tillage advisor. You decide whether and how a compacted field should be loosened, choosing among mechanical and biological decompaction methods and timing the work to soil moisture.

{{> answer-format}}"#;

pub const DECOMPACTION_USER: &str = r#"Crop: {{crop_type}}

Soil:
- Texture: {{texture}} (sand {{soil.sand}}%, silt {{soil.silt}}%, clay {{soil.clay}}%)
- Moisture: {{soil.moisture}}%
- Bulk density: {{soil.bulk_density}} g/cm³
- Penetration resistance: {{soil.penetration_resistance}} MPa
- Organic matter: {{soil.organic_matter}}%
- Compacted layer depth: {{soil.depth}} cm

Management:
- Traffic intensity: {{management.traffic_intensity}}
- Compaction history: {{management.compaction_history}}

Subsoiling feasibility:
- Soil type: {{feasibility.soil_type}}
- Optimal moisture for subsoiling: {{moisture.optimal_moisture_range}}
- Current moisture suitable: {{feasibility.moisture_suitable}}
- Bulk density indicates severe compaction: {{feasibility.compaction_severe}}
- Penetration resistance indicates severe compaction: {{feasibility.penetration_severe}}
- Subsoiling recommended now: {{feasibility.subsoiling_recommended}}
- Timing: {{moisture.subsoiling_timing}}. {{moisture.avoid_conditions}}.

Candidate methods for this crop and soil type:
{{#each methods}}
- {{this.method}}: effectiveness {{this.effectiveness_rating}}/10, moisture {{this.optimal_moisture_min}}-{{this.optimal_moisture_max}}%. {{this.implementation_notes}}
{{else}}
- No listed method suits this soil type.
{{/each}}

Recommend a decompaction plan.
"#;

pub const COVER_CROP_MIX_SYSTEM: &str = r#"You are a cover crop and rotation advisor. You design cover crop mixes that fit between cash crops and address the soil goals identified for the field.

{{> answer-format}}"#;

pub const COVER_CROP_MIX_USER: &str = r#"Rotation: {{rotation.current}} (current) -> {{rotation.next}} (next) -> {{rotation.after_next}} (after next)

Cover crops that fit the rotation, best first:
{{#each candidates}}
- {{this.name}} (fit score {{this.score}})
{{/each}}

Soil goals: {{#each goals}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}

Suggested mix:
{{#each mix}}
- {{this.name}}: serves {{#each this.matched_goals}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}
{{else}}
- No candidate serves the soil goals.
{{/each}}

Recommend a cover crop mix with seeding rates and termination timing.
"#;

pub const PLANT_TIMING_SYSTEM: &str = r#"You are a crop establishment advisor. You choose sowing windows from seed variety traits and local climate, balancing frost risk, soil temperature and season length.

{{> answer-format}}"#;

pub const PLANT_TIMING_USER: &str = r#"Seed variety: {{seed_variety}} (crop: {{crop_type}})
Variety traits (from the "{{variety.variety}}" row):
- Days to maturity: {{variety.days_to_maturity}}
- Minimum soil temperature for germination: {{variety.min_soil_temp}} °C
- Frost tolerance: {{variety.frost_tolerance}}
- Drought tolerance: {{variety.drought_tolerance}}

Location: {{location.latitude}}, {{location.longitude}}
Climate ({{climate_source}}):
- Zone: {{climate.climate_zone}}
- Average temperature: {{climate.avg_temp_min}} to {{climate.avg_temp_max}} °C
- Humidity: {{climate.humidity}}%
- Annual rainfall: {{climate.annual_rainfall}} mm
- Frost-free period: day {{climate.frost_free_start}} ({{frost_free_start_date}}) to day {{climate.frost_free_end}} ({{frost_free_end_date}})
- Growing season: {{climate.growing_season_length}} days
- Soil temperature: {{climate.soil_temp}} °C
- Weather pattern: {{climate.weather_pattern}}

Recommend a planting window and the signs to wait for before sowing.
"#;

pub const COMPACTION_RANKING_SYSTEM: &str = r#"You are a soil compaction assessor. You interpret compaction readings against texture-specific thresholds and explain the risk to root growth and yield.

{{> answer-format}}"#;

pub const COMPACTION_RANKING_USER: &str = r#"Soil: {{texture}} (sand {{composition.sand}}%, silt {{composition.silt}}%, clay {{composition.clay}}%)
Measured bulk density: {{measurement}} g/cm³ ({{method}})
Classification: {{classification.level}} ({{classification.color}}) - {{classification.description}}

Action required: {{bundle.action_required}}
{{#each bundle.recommendations}}
- {{this}}
{{/each}}

Explain the compaction risk and prioritise the actions.
"#;

pub const COMPACTION_ESTIMATE_SYSTEM: &str = r#"You are a soil compaction assessor. No direct reading is available, so you estimate the compaction risk qualitatively from texture and field history and rank it as Good/Acceptable, Concerning or Alarming.

{{> answer-format}}"#;

pub const COMPACTION_ESTIMATE_USER: &str = r#"Soil: {{texture}} (sand {{composition.sand}}%, silt {{composition.silt}}%, clay {{composition.clay}}%)
Method: {{method}}

Field history:
- Plough depth: {{history.plough_depth}} cm
- Bare soil history: {{history.bare_soil_history}}
- Machinery: {{history.machine_type}}

{{bundle.action_required}}
{{#each bundle.recommendations}}
- {{this}}
{{/each}}

Estimate the compaction level and recommend how to confirm it in the field.
"#;

pub const FINAL_SYSTEM: &str = r#"You are a senior farm advisor. You merge the conclusions of several specialists into one consistent field plan, resolving conflicts and ordering the work through the season.

Write the plan as markdown with one heading per topic and a short season calendar at the end."#;

pub const FINAL_USER: &str = r#"Crop: {{crop_type}}

Specialist conclusions:
{{#each sections}}

## {{this.title}}
{{this.conclusion}}
{{/each}}

Combine these into a single field plan.
"#;

/// Get embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "npk-system" => Some(NPK_SYSTEM),
        "npk-user" => Some(NPK_USER),
        "seed-treatment-system" => Some(SEED_TREATMENT_SYSTEM),
        "seed-treatment-user" => Some(SEED_TREATMENT_USER),
        "decompaction-system" => Some(DECOMPACTION_SYSTEM),
        "decompaction-user" => Some(DECOMPACTION_USER),
        "cover-crop-mix-system" => Some(COVER_CROP_MIX_SYSTEM),
        "cover-crop-mix-user" => Some(COVER_CROP_MIX_USER),
        "plant-timing-system" => Some(PLANT_TIMING_SYSTEM),
        "plant-timing-user" => Some(PLANT_TIMING_USER),
        "compaction-ranking-system" => Some(COMPACTION_RANKING_SYSTEM),
        "compaction-ranking-user" => Some(COMPACTION_RANKING_USER),
        "compaction-estimate-system" => Some(COMPACTION_ESTIMATE_SYSTEM),
        "compaction-estimate-user" => Some(COMPACTION_ESTIMATE_USER),
        "final-system" => Some(FINAL_SYSTEM),
        "final-user" => Some(FINAL_USER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_has_system_and_user() {
        for base in [
            "npk",
            "seed-treatment",
            "decompaction",
            "cover-crop-mix",
            "plant-timing",
            "compaction-ranking",
            "compaction-estimate",
            "final",
        ] {
            assert!(get_embedded(&format!("{}-system", base)).is_some(), "{} system", base);
            assert!(get_embedded(&format!("{}-user", base)).is_some(), "{} user", base);
        }
    }

    #[test]
    fn test_module_prompts_request_sections() {
        assert!(NPK_SYSTEM.contains("{{> answer-format}}"));
        assert!(ANSWER_FORMAT.contains("### Conclusion Section"));
        assert!(get_embedded("nonexistent").is_none());
    }
}
