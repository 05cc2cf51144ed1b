mod cli;

use agroforecast::config::Config;
use agroforecast::logic::FieldRequest;
use agroforecast::models::{PestHistoryRecord, SoilSample, WeatherDay};
use agroforecast::AnalyticsEngine;
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SoilArg};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Check => check(cli.config),
        Commands::Yield { weather, soil } => {
            let config = load_config(cli.config)?;
            let mut field = config.field_request();
            field.weather_history = read_optional::<Vec<WeatherDay>>(weather.as_deref())?
                .unwrap_or_default();
            apply_soil(&mut field, &soil)?;

            let estimate = AnalyticsEngine::new().predict_yield(&field.yield_request(), as_of)?;
            print_json(&estimate)
        }
        Commands::Pests {
            forecast,
            history,
            soil,
        } => {
            let config = load_config(cli.config)?;
            let mut field = config.field_request();
            field.weather_forecast = read_optional::<Vec<WeatherDay>>(forecast.as_deref())?
                .unwrap_or_default();
            field.pest_history = read_optional::<Vec<PestHistoryRecord>>(history.as_deref())?
                .unwrap_or_default();
            apply_soil(&mut field, &soil)?;

            let report =
                AnalyticsEngine::new().predict_pest_outbreaks(&field.pest_request(), as_of)?;
            print_json(&report)
        }
        Commands::Irrigation { forecast, soil } => {
            let config = load_config(cli.config)?;
            let mut field = config.field_request();
            field.weather_forecast = read_optional::<Vec<WeatherDay>>(forecast.as_deref())?
                .unwrap_or_default();
            apply_soil(&mut field, &soil)?;

            let plan = AnalyticsEngine::new()
                .generate_irrigation_schedule(&field.irrigation_request(), as_of)?;
            print_json(&plan)
        }
        Commands::Report {
            weather,
            forecast,
            history,
            soil,
        } => {
            let config = load_config(cli.config)?;
            let mut field = config.field_request();
            field.weather_history = read_optional::<Vec<WeatherDay>>(weather.as_deref())?
                .unwrap_or_default();
            field.weather_forecast = read_optional::<Vec<WeatherDay>>(forecast.as_deref())?
                .unwrap_or_default();
            field.pest_history = read_optional::<Vec<PestHistoryRecord>>(history.as_deref())?
                .unwrap_or_default();
            apply_soil(&mut field, &soil)?;

            let report = AnalyticsEngine::new().report(&field, as_of);
            for failure in &report.failures {
                tracing::warn!("{}", failure);
            }
            print_json(&report)
        }
    }
}

fn load_config(config_override: Option<PathBuf>) -> Result<Config> {
    Config::load(config_override).context("Could not load configuration")
}

fn check(config_override: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_override)?;
    let farm = &config.farm;

    println!("Farm:          {}", farm.name);
    println!("Crop:          {}", farm.crop);
    println!("Location:      {:.4}, {:.4}", farm.latitude, farm.longitude);
    println!("Area:          {} ha", farm.area_hectares);
    println!("Planted:       {}", farm.planting_date);
    println!(
        "Soil type:     {}",
        farm.soil_type().map(|s| s.as_str()).unwrap_or("not set")
    );
    println!(
        "Soil sample:   {}",
        if config.soil.is_some() { "configured" } else { "none" }
    );

    println!();
    println!("Predictors:");
    for (id, name) in AnalyticsEngine::new().list_predictors() {
        println!("  {:<20} {}", id, name);
    }

    let warnings = config.warnings();
    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn apply_soil(field: &mut FieldRequest, arg: &SoilArg) -> Result<()> {
    if let Some(soil) = read_optional::<SoilSample>(arg.soil.as_deref())? {
        field.soil = Some(soil);
    }
    Ok(())
}

fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
