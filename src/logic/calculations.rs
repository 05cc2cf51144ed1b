use crate::models::{SoilSample, WeatherDay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily rainfall above which a day counts as a heavy-rain period (mm)
pub const HEAVY_RAIN_DAY_MM: f64 = 15.0;

/// Rainfall is "even" when its standard deviation stays below this share of the mean
pub const EVEN_RAIN_MAX_CV: f64 = 0.5;

/// Nutrient levels (ppm) treated as fully sufficient
pub const NITROGEN_TARGET_PPM: f64 = 150.0;
pub const PHOSPHORUS_TARGET_PPM: f64 = 35.0;
pub const POTASSIUM_TARGET_PPM: f64 = 150.0;

pub fn mean(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        None
    } else {
        Some(series.iter().sum::<f64>() / series.len() as f64)
    }
}

/// Population variance (divides by N). Stability thresholds downstream are
/// calibrated against this definition.
pub fn variance(series: &[f64]) -> Option<f64> {
    let m = mean(series)?;
    Some(series.iter().map(|v| (v - m).powi(2)).sum::<f64>() / series.len() as f64)
}

pub fn std_dev(series: &[f64]) -> Option<f64> {
    variance(series).map(f64::sqrt)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainDistribution {
    pub even: bool,
    pub heavy_periods: usize,
}

pub fn rain_distribution(series: &[WeatherDay]) -> RainDistribution {
    let rainfall: Vec<f64> = series.iter().map(|d| d.rainfall_mm).collect();

    let even = match (mean(&rainfall), std_dev(&rainfall)) {
        (Some(m), Some(sd)) => sd < m * EVEN_RAIN_MAX_CV,
        _ => false,
    };

    let heavy_periods = rainfall.iter().filter(|r| **r > HEAVY_RAIN_DAY_MM).count();

    RainDistribution {
        even,
        heavy_periods,
    }
}

/// Geometric mean of N, P and K sufficiency ratios, each capped at 1.0.
/// A zero nutrient level zeroes the balance.
pub fn nutrient_balance(soil: &SoilSample) -> f64 {
    let ratio = |value: f64, target: f64| (value / target).clamp(0.0, 1.0);

    let product = ratio(soil.nitrogen_ppm, NITROGEN_TARGET_PPM)
        * ratio(soil.phosphorus_ppm, PHOSPHORUS_TARGET_PPM)
        * ratio(soil.potassium_ppm, POTASSIUM_TARGET_PPM);

    if product <= 0.0 {
        0.0
    } else {
        product.cbrt()
    }
}

pub fn days_since(planting_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - planting_date).num_days()
}

/// Coarse yield multiplier for crop development stage
pub fn yield_growth_stage_factor(days_since_planting: i64) -> f64 {
    if days_since_planting < 30 {
        0.3
    } else if days_since_planting < 60 {
        0.6
    } else if days_since_planting < 90 {
        0.9
    } else {
        1.0
    }
}

/// Water demand multiplier for crop development stage
pub fn irrigation_growth_stage_factor(days_since_planting: i64) -> f64 {
    if days_since_planting < 30 {
        0.7
    } else if days_since_planting < 60 {
        1.0
    } else if days_since_planting < 90 {
        1.3
    } else {
        1.1
    }
}

pub fn average_temperature(series: &[WeatherDay]) -> Option<f64> {
    let temps: Vec<f64> = series.iter().map(|d| d.temperature.avg).collect();
    mean(&temps)
}

pub fn temperature_variance(series: &[WeatherDay]) -> Option<f64> {
    let temps: Vec<f64> = series.iter().map(|d| d.temperature.avg).collect();
    variance(&temps)
}

pub fn average_humidity(series: &[WeatherDay]) -> Option<f64> {
    let humidity: Vec<f64> = series.iter().map(|d| d.humidity_pct).collect();
    mean(&humidity)
}

pub fn average_rainfall(series: &[WeatherDay]) -> Option<f64> {
    let rainfall: Vec<f64> = series.iter().map(|d| d.rainfall_mm).collect();
    mean(&rainfall)
}

pub fn total_rainfall(series: &[WeatherDay]) -> f64 {
    series.iter().map(|d| d.rainfall_mm).sum()
}
