use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use thali_id::{cli, color, config, error, label_source, pipeline};
use thali_id::scanner::dataset::{self, DatasetIndex};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, ThaliError};
use label_source::{cloud, LocalLabelSource, StaticClassifier};
use pipeline::SourceKind;
use thali_id_common::parse_nutrition_response;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Detect { input, vision, prompt, output, json } => {
            let taxonomy = config.load_taxonomy()?;
            let outcome = pipeline::read_labels(&input, vision, config.min_score)?;
            let labels = pipeline::usable_labels(outcome)?;
            let source = if vision { SourceKind::Vision } else { SourceKind::Labels };
            let report = pipeline::build_report(&taxonomy, &config, source, labels, prompt);

            emit(&report, output.as_deref(), json)?;
        }

        Commands::Request { image, output } => {
            if !image.exists() {
                return Err(ThaliError::FileNotFound(image.display().to_string()));
            }
            let bytes = std::fs::read(&image)?;
            let request = cloud::build_request(&STANDARD.encode(bytes), config.max_results);
            match output {
                Some(output) => {
                    pipeline::write_json(&request, &output)?;
                    println!("✔ request written: {}", output.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&request)?),
            }
        }

        Commands::Local { image, predictions, dataset, prompt, output, json } => {
            let taxonomy = config.load_taxonomy()?;
            let classifier = StaticClassifier::from_file(&predictions)?;
            let index = dataset.as_deref().map(DatasetIndex::load).transpose()?;

            let mut source = LocalLabelSource::new(classifier, taxonomy.correlations())
                .with_top_k(config.top_k)
                .with_max_candidates(config.max_candidates)
                .with_sampling(config.sample_size, config.sample_stride);
            if let Some(index) = &index {
                source = source.with_dataset(index);
            }
            let detection = source.detect_path(&image)?;
            let report = pipeline::build_local_report(&taxonomy, &config, detection, prompt)?;

            emit(&report, output.as_deref(), json)?;
        }

        Commands::Index { root, output } => {
            println!("📂 thali-id - dataset index\n");
            let build = dataset::build_index(&root)?;
            pipeline::write_json(&build.index, &output)?;
            println!("✔ {} images indexed", build.index.len());
            if build.skipped > 0 {
                println!("  {} file names shared by several folders skipped", build.skipped);
            }
            println!("✔ saved: {}", output.display());
        }

        Commands::Profile { path, output } => {
            if path.is_dir() {
                println!("🎨 thali-id - colour profiles\n");
                let profiles =
                    color::profile_folder(&path, config.sample_size, config.sample_stride)?;
                for entry in &profiles {
                    println!(
                        "  {}: {} ({}, {}, {})",
                        entry.file_name,
                        entry.profile.dominant_bucket,
                        entry.profile.rgb.r,
                        entry.profile.rgb.g,
                        entry.profile.rgb.b
                    );
                }
                println!("\n✔ {} images profiled", profiles.len());
                if let Some(output) = output {
                    pipeline::write_json(&profiles, &output)?;
                    println!("✔ saved: {}", output.display());
                }
            } else {
                let profile =
                    color::profile_file(&path, config.sample_size, config.sample_stride)?;
                println!(
                    "{}: {} ({}, {}, {})",
                    path.display(),
                    profile.dominant_bucket,
                    profile.rgb.r,
                    profile.rgb.g,
                    profile.rgb.b
                );
                if let Some(output) = output {
                    pipeline::write_json(&profile, &output)?;
                    println!("✔ saved: {}", output.display());
                }
            }
        }

        Commands::Taxonomy { export, check } => {
            if let Some(check) = check {
                let checked = config::load_taxonomy_file(&check)?;
                println!(
                    "✔ {} is valid: {} dishes, {} breads",
                    check.display(),
                    checked.dishes().len(),
                    checked.breads().len()
                );
            }

            let taxonomy = config.load_taxonomy()?;
            if let Some(export) = export {
                std::fs::write(&export, taxonomy.to_json()?)?;
                println!("✔ taxonomy written: {}", export.display());
            } else {
                let source = config
                    .effective_taxonomy_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string());
                println!("Taxonomy ({}):", source);
                println!("  dishes: {}", taxonomy.dishes().len());
                println!("  breads: {}", taxonomy.breads().len());
                println!("  stop terms: {}", taxonomy.vocabulary().stoplist.len());
                println!("  colour families: {}", taxonomy.correlations().families.len());
            }
        }

        Commands::Nutrition { input, meal, output } => {
            if !input.exists() {
                return Err(ThaliError::FileNotFound(input.display().to_string()));
            }
            let reply = std::fs::read_to_string(&input)?;
            let info = parse_nutrition_response(&reply, &meal)?;

            match output {
                Some(output) => {
                    pipeline::write_json(&info, &output)?;
                    println!("✔ saved: {}", output.display());
                }
                None => {
                    println!("🍽  {} ({})", info.food_name, info.serving);
                    println!("  calories: {}", info.calories);
                    println!(
                        "  protein {}g / carbs {}g / fat {}g / fiber {}g",
                        info.protein, info.carbs, info.fat, info.fiber
                    );
                    println!("  health score: {}", info.health_score);
                    if !info.insight.is_empty() {
                        println!("  {}", info.insight);
                    }
                }
            }
        }

        Commands::Config { show, set_min_score, set_taxonomy } => {
            let mut config = config;

            if let Some(score) = set_min_score {
                config.set_min_score(score)?;
                println!("✔ min score set to {}", score);
            }

            if let Some(path) = set_taxonomy {
                config.set_taxonomy_path(path)?;
                println!("✔ taxonomy path set");
            }

            if show {
                println!("Settings ({}):", Config::config_path()?.display());
                println!("  min score: {}", config.min_score);
                println!("  max results: {}", config.max_results);
                println!("  top k: {}", config.top_k);
                println!("  max candidates: {}", config.max_candidates);
                println!("  max alternatives: {}", config.max_alternatives);
                println!("  sampling: {}px grid, every {} px", config.sample_size, config.sample_stride);
                println!(
                    "  taxonomy: {}",
                    config
                        .effective_taxonomy_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in".to_string())
                );
            }
        }
    }

    Ok(())
}

/// `--verbose` forces debug; otherwise RUST_LOG, defaulting to warn
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(report: &pipeline::DetectionReport, output: Option<&std::path::Path>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        pipeline::print_summary(report);
    }
    if let Some(output) = output {
        pipeline::write_json(report, output)?;
        if !json {
            println!("✔ saved: {}", output.display());
        }
    }
    Ok(())
}
