use super::pest::PestHistoryRecord;
use super::soil::{SoilSample, SoilType};
use super::weather::{Location, WeatherDay};
use crate::error::{AgroError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldRequest {
    pub crop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub area_hectares: f64,
    pub planting_date: NaiveDate,
    #[serde(default)]
    pub weather_history: Vec<WeatherDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSample>,
}

impl YieldRequest {
    pub fn new(crop: impl Into<String>, area_hectares: f64, planting_date: NaiveDate) -> Self {
        Self {
            crop: crop.into(),
            location: None,
            area_hectares,
            planting_date,
            weather_history: Vec::new(),
            soil: None,
        }
    }

    pub fn with_weather_history(mut self, history: Vec<WeatherDay>) -> Self {
        self.weather_history = history;
        self
    }

    pub fn with_soil(mut self, soil: SoilSample) -> Self {
        self.soil = Some(soil);
        self
    }

    pub fn validate(&self, as_of: NaiveDate) -> Result<()> {
        if !self.area_hectares.is_finite() || self.area_hectares < 0.0 {
            return Err(AgroError::InvalidData(format!(
                "area must be a non-negative number of hectares, got {}",
                self.area_hectares
            )));
        }
        validate_inputs(
            self.planting_date,
            as_of,
            &self.weather_history,
            self.soil.as_ref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestRequest {
    pub crop: String,
    pub planting_date: NaiveDate,
    #[serde(default)]
    pub weather_forecast: Vec<WeatherDay>,
    #[serde(default)]
    pub pest_history: Vec<PestHistoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSample>,
}

impl PestRequest {
    pub fn new(crop: impl Into<String>, planting_date: NaiveDate) -> Self {
        Self {
            crop: crop.into(),
            planting_date,
            weather_forecast: Vec::new(),
            pest_history: Vec::new(),
            soil: None,
        }
    }

    pub fn with_forecast(mut self, forecast: Vec<WeatherDay>) -> Self {
        self.weather_forecast = forecast;
        self
    }

    pub fn with_history(mut self, history: Vec<PestHistoryRecord>) -> Self {
        self.pest_history = history;
        self
    }

    pub fn with_soil(mut self, soil: SoilSample) -> Self {
        self.soil = Some(soil);
        self
    }

    pub fn validate(&self, as_of: NaiveDate) -> Result<()> {
        validate_inputs(
            self.planting_date,
            as_of,
            &self.weather_forecast,
            self.soil.as_ref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationRequest {
    pub crop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    pub planting_date: NaiveDate,
    #[serde(default)]
    pub weather_forecast: Vec<WeatherDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSample>,
}

impl IrrigationRequest {
    pub fn new(crop: impl Into<String>, planting_date: NaiveDate) -> Self {
        Self {
            crop: crop.into(),
            soil_type: None,
            planting_date,
            weather_forecast: Vec::new(),
            soil: None,
        }
    }

    pub fn with_soil_type(mut self, soil_type: SoilType) -> Self {
        self.soil_type = Some(soil_type);
        self
    }

    pub fn with_forecast(mut self, forecast: Vec<WeatherDay>) -> Self {
        self.weather_forecast = forecast;
        self
    }

    pub fn with_soil(mut self, soil: SoilSample) -> Self {
        self.soil = Some(soil);
        self
    }

    pub fn validate(&self, as_of: NaiveDate) -> Result<()> {
        validate_inputs(
            self.planting_date,
            as_of,
            &self.weather_forecast,
            self.soil.as_ref(),
        )
    }
}

fn validate_inputs(
    planting_date: NaiveDate,
    as_of: NaiveDate,
    weather: &[WeatherDay],
    soil: Option<&SoilSample>,
) -> Result<()> {
    if planting_date > as_of {
        return Err(AgroError::InvalidData(format!(
            "planting date {} is after the analysis date {}",
            planting_date, as_of
        )));
    }

    if let Some(day) = weather.iter().find(|d| !d.is_finite()) {
        return Err(AgroError::InvalidData(format!(
            "weather record for {} contains non-numeric values",
            day.date
        )));
    }

    if soil.is_some_and(|s| !s.is_finite()) {
        return Err(AgroError::InvalidData(
            "soil sample contains non-numeric values".into(),
        ));
    }

    Ok(())
}
