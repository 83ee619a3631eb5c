use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use agronomy::cli::{Cli, Command, NpkArgs, SoilArgs};
use agronomy::{
    BandColor, CompactionQuery, FieldConditions, NpkLevels, ReferenceData, Rotation, SoilComposition, SoilValues,
    check_feasibility,
};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn composition(soil: SoilArgs) -> SoilComposition {
    SoilComposition::new(soil.sand, soil.silt, soil.clay)
}

fn soil_values(levels: NpkArgs, soil: SoilArgs) -> SoilValues {
    SoilValues::nutrients_and_texture(levels.n, levels.p, levels.k, soil.sand, soil.silt, soil.clay)
}

fn paint(text: &str, color: BandColor) -> ColoredString {
    match color {
        BandColor::Green => text.green(),
        BandColor::Orange => text.yellow(),
        BandColor::Red => text.red(),
    }
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("ag starting");

    match cli.command {
        Command::Texture { soil } => {
            println!("{}", composition(soil).texture().to_string().cyan());
        }
        Command::Compaction {
            soil,
            measurement,
            plough_depth,
            bare_soil,
            machine_type,
        } => {
            let data = ReferenceData::load(&cli.data)?;
            let query = CompactionQuery {
                measurement,
                plough_depth,
                bare_soil_history: bare_soil,
                machine_type,
            };
            let assessment = data.compaction.assess(composition(soil), &query)?;
            println!("Texture: {}", assessment.texture.to_string().cyan());
            println!("Method:  {}", assessment.method_label());
            if let Some(c) = assessment.classification() {
                println!("Level:   {} ({})", paint(c.level.as_str(), c.color), c.description);
            }
            let bundle = data.compaction.recommendations(&assessment);
            println!("Action:  {}", bundle.action_required.bold());
            for r in bundle.recommendations {
                println!("  - {}", r);
            }
        }
        Command::Feasibility {
            soil,
            moisture,
            bulk_density,
            penetration_resistance,
            crop,
        } => {
            let composition = composition(soil);
            let result = check_feasibility(
                &composition,
                &FieldConditions {
                    soil_moisture: moisture,
                    bulk_density,
                    penetration_resistance,
                },
            );
            println!("Soil type:          {}", result.soil_type.to_string().cyan());
            println!("Optimal moisture:   {}", result.optimal_moisture);
            println!("Moisture suitable:  {}", result.moisture_suitable);
            println!("Compaction severe:  {}", result.compaction_severe);
            println!("Penetration severe: {}", result.penetration_severe);
            let verdict = if result.subsoiling_recommended {
                "recommended".green()
            } else {
                "not recommended".yellow()
            };
            println!("Subsoiling:         {}", verdict);

            if let Some(crop) = crop {
                let data = ReferenceData::load(&cli.data)?;
                let methods = data.decompaction_methods.filter(&crop, result.soil_type)?;
                if methods.is_empty() {
                    println!("No decompaction methods for {} on {}", crop, result.soil_type);
                }
                for m in methods {
                    println!(
                        "{} {} ({}-{}%): {}",
                        format!("[{:.1}]", m.effectiveness_rating).dimmed(),
                        m.method.bold(),
                        m.optimal_moisture_min,
                        m.optimal_moisture_max,
                        m.implementation_notes
                    );
                }
            }
        }
        Command::Npk { crop, levels } => {
            let data = ReferenceData::load(&cli.data)?;
            let deltas = data.nutrients.gap(&crop, NpkLevels::new(levels.n, levels.p, levels.k))?;
            println!("{} N={:.1} P={:.1} K={:.1} kg/ha", crop.cyan(), deltas.n, deltas.p, deltas.k);
        }
        Command::Goals { levels, soil } => {
            let data = ReferenceData::load(&cli.data)?;
            let goals = data.cover_crop_goals.classify(&soil_values(levels, soil));
            if goals.is_empty() {
                println!("No goals matched");
            }
            for goal in goals {
                println!("{}", goal);
            }
        }
        Command::CoverCrops {
            current,
            next,
            after_next,
            levels,
            soil,
            top_k,
        } => {
            let data = ReferenceData::load(&cli.data)?;
            let rotation = Rotation {
                current,
                next,
                after_next,
            };
            let candidates: Vec<String> = data
                .cover_crop_timing
                .score(&rotation, agronomy::DEFAULT_TARGET_TOP_K)
                .into_iter()
                .map(|c| c.name)
                .collect();
            let goals = data.cover_crop_goals.classify(&soil_values(levels, soil));
            let mix = data.cover_crop_tags.rank(&candidates, &goals, top_k);
            if mix.is_empty() {
                println!("No cover crop matched the soil goals");
            }
            for m in mix {
                println!("{} {}", m.name.green(), m.matched_goals.join(", ").dimmed());
            }
        }
    }

    Ok(())
}
