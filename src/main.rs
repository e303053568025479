use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use netmapper::config::PipelineConfig;
use netmapper::config_loader;
use netmapper::orchestrator::Pipeline;

/// Classify network devices and lay them out as a layered topology
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON file with devices and connections
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the pipeline configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the result JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run the spacing pass after layout
    #[arg(long)]
    optimize: bool,

    /// Stop after classification and print the classified devices
    #[arg(long)]
    classify_only: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting netmapper");
    info!("Input file: {:?}", args.input);

    let config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => {
            info!("No configuration file given, using defaults");
            PipelineConfig::default()
        }
    };

    let pipeline = Pipeline::from_config(&config)
        .wrap_err("Failed to build classification pipeline")?
        .with_optimize(config.optimize || args.optimize);

    let input = config_loader::load_input(&args.input)?;

    let json = if args.classify_only {
        let classified = pipeline.classify(&input.devices);
        serde_json::to_string_pretty(&classified)?
    } else {
        let output = pipeline.run(input);
        if !output.validation.valid {
            warn!(
                "Topology has {} validation errors",
                output.validation.errors.len()
            );
        }
        serde_json::to_string_pretty(&output)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .wrap_err_with(|| format!("Failed to write output file '{}'", path.display()))?;
            info!("Wrote result to: {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
