use super::{IrrigationScheduler, PestOutbreakPredictor, Predictor, YieldPredictor};
use crate::error::{AgroError, Result};
use crate::models::{
    IrrigationPlan, IrrigationRequest, Location, PestHistoryRecord, PestRequest, PestRiskReport,
    SoilSample, SoilType, WeatherDay, YieldEstimate, YieldRequest,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything known about one field, from which each predictor's request is derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRequest {
    pub crop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub area_hectares: f64,
    pub planting_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    #[serde(default)]
    pub weather_history: Vec<WeatherDay>,
    #[serde(default)]
    pub weather_forecast: Vec<WeatherDay>,
    #[serde(default)]
    pub pest_history: Vec<PestHistoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSample>,
}

impl FieldRequest {
    pub fn new(crop: impl Into<String>, area_hectares: f64, planting_date: NaiveDate) -> Self {
        Self {
            crop: crop.into(),
            location: None,
            area_hectares,
            planting_date,
            soil_type: None,
            weather_history: Vec::new(),
            weather_forecast: Vec::new(),
            pest_history: Vec::new(),
            soil: None,
        }
    }

    pub fn yield_request(&self) -> YieldRequest {
        YieldRequest {
            crop: self.crop.clone(),
            location: self.location,
            area_hectares: self.area_hectares,
            planting_date: self.planting_date,
            weather_history: self.weather_history.clone(),
            soil: self.soil,
        }
    }

    pub fn pest_request(&self) -> PestRequest {
        PestRequest {
            crop: self.crop.clone(),
            planting_date: self.planting_date,
            weather_forecast: self.weather_forecast.clone(),
            pest_history: self.pest_history.clone(),
            soil: self.soil,
        }
    }

    pub fn irrigation_request(&self) -> IrrigationRequest {
        IrrigationRequest {
            crop: self.crop.clone(),
            soil_type: self.soil_type,
            planting_date: self.planting_date,
            weather_forecast: self.weather_forecast.clone(),
            soil: self.soil,
        }
    }
}

/// Combined output of all predictors for one field
///
/// A failing predictor leaves its slot empty and records the error message in
/// `failures`; the other predictors still run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_estimate: Option<YieldEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pest_risk: Option<PestRiskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_plan: Option<IrrigationPlan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl FieldReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct AnalyticsEngine {
    yield_predictor: YieldPredictor,
    pest_predictor: PestOutbreakPredictor,
    irrigation_scheduler: IrrigationScheduler,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            yield_predictor: YieldPredictor,
            pest_predictor: PestOutbreakPredictor,
            irrigation_scheduler: IrrigationScheduler,
        }
    }

    /// Run a single predictor, converting any failure into `PredictionFailed`
    fn run<P: Predictor>(
        &self,
        predictor: &P,
        request: &P::Request,
        as_of: NaiveDate,
    ) -> Result<P::Output> {
        tracing::info!(predictor = predictor.id(), %as_of, "Running {}", predictor.name());

        predictor.predict(request, as_of).map_err(|e| {
            let reason = match e {
                AgroError::PredictionFailed { reason, .. } => reason,
                other => other.to_string(),
            };
            tracing::warn!(predictor = predictor.id(), %reason, "Prediction failed");
            AgroError::PredictionFailed {
                predictor: predictor.id(),
                reason,
            }
        })
    }

    pub fn predict_yield(&self, request: &YieldRequest, as_of: NaiveDate) -> Result<YieldEstimate> {
        self.run(&self.yield_predictor, request, as_of)
    }

    pub fn predict_pest_outbreaks(
        &self,
        request: &PestRequest,
        as_of: NaiveDate,
    ) -> Result<PestRiskReport> {
        self.run(&self.pest_predictor, request, as_of)
    }

    pub fn generate_irrigation_schedule(
        &self,
        request: &IrrigationRequest,
        as_of: NaiveDate,
    ) -> Result<IrrigationPlan> {
        self.run(&self.irrigation_scheduler, request, as_of)
    }

    /// Run every predictor against one field
    pub fn report(&self, field: &FieldRequest, as_of: NaiveDate) -> FieldReport {
        let mut report = FieldReport::default();

        match self.predict_yield(&field.yield_request(), as_of) {
            Ok(estimate) => report.yield_estimate = Some(estimate),
            Err(e) => report.failures.push(e.to_string()),
        }

        match self.predict_pest_outbreaks(&field.pest_request(), as_of) {
            Ok(risk) => report.pest_risk = Some(risk),
            Err(e) => report.failures.push(e.to_string()),
        }

        match self.generate_irrigation_schedule(&field.irrigation_request(), as_of) {
            Ok(plan) => report.irrigation_plan = Some(plan),
            Err(e) => report.failures.push(e.to_string()),
        }

        report
    }

    pub fn list_predictors(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (self.yield_predictor.id(), self.yield_predictor.name()),
            (self.pest_predictor.id(), self.pest_predictor.name()),
            (
                self.irrigation_scheduler.id(),
                self.irrigation_scheduler.name(),
            ),
        ]
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
