use super::Predictor;
use crate::error::Result;
use crate::logic::calculations::{average_humidity, average_rainfall, average_temperature};
use crate::models::{
    find_profile, profiles_for, Crop, Factor, Impact, MonitoringTask, PestOutbreakForecast,
    PestProfile, PestRequest, PestRiskReport, PestSeverity, WeatherDay,
};
use chrono::{Days, NaiveDate};

const BASE_PROBABILITY: f64 = 20.0;

/// Probability above which a pest gets its own recommendation and checks
const HIGH_RISK_PROBABILITY: f64 = 70.0;

/// Outbreak horizon in days when no forecast day is favorable
const MAX_OUTBREAK_HORIZON_DAYS: u64 = 10;
const MIN_OUTBREAK_HORIZON_DAYS: u64 = 5;

/// Pest outbreak predictor - scores each candidate pest for a crop
///
/// Scoring (starting from a baseline of 20%):
/// - Forecast average temperature in the pest's band: +30 (within 5°C: +15)
/// - Forecast average humidity in band: +25 (within 10%: +10)
/// - Forecast average daily rainfall in band: +20 (within 5mm: +10)
/// - Pest recorded in field history: +25
/// - Crop listed as susceptible host: +20
///
/// Severity levels:
/// - Low: 50% or less
/// - Moderate: above 50%
/// - High: above 70%
/// - Severe: above 85%
pub struct PestOutbreakPredictor;

impl Predictor for PestOutbreakPredictor {
    type Request = PestRequest;
    type Output = PestRiskReport;

    fn id(&self) -> &'static str {
        "pest_outbreak"
    }

    fn name(&self) -> &'static str {
        "Pest Outbreak Predictor"
    }

    fn predict(&self, request: &PestRequest, as_of: NaiveDate) -> Result<PestRiskReport> {
        request.validate(as_of)?;

        let crop = Crop::from_str(&request.crop);
        let conditions = ForecastConditions::from_forecast(&request.weather_forecast);

        let forecasts: Vec<PestOutbreakForecast> = profiles_for(crop)
            .into_iter()
            .map(|profile| self.score_pest(profile, crop, &conditions, request, as_of))
            .collect();

        let mut report = PestRiskReport {
            crop: request.crop.clone(),
            as_of,
            risk_level: PestSeverity::Low,
            recommendations: self.recommendations(crop, &forecasts, request),
            monitoring_schedule: self.monitoring_schedule(&forecasts, &request.weather_forecast),
            forecasts,
        };
        let max_probability = report.max_probability();
        report.risk_level = PestSeverity::from_probability(max_probability);

        tracing::debug!(
            crop = %request.crop,
            pests = report.forecasts.len(),
            max_probability,
            risk_level = %report.risk_level,
            "Pest outbreak risk assessed"
        );

        Ok(report)
    }
}

/// Forecast averages used for band matching
#[derive(Debug, Clone, Copy)]
struct ForecastConditions {
    temperature: Option<f64>,
    humidity: Option<f64>,
    rainfall: Option<f64>,
}

impl ForecastConditions {
    fn from_forecast(forecast: &[WeatherDay]) -> Self {
        Self {
            temperature: average_temperature(forecast),
            humidity: average_humidity(forecast),
            rainfall: average_rainfall(forecast),
        }
    }
}

impl PestOutbreakPredictor {
    fn score_pest(
        &self,
        profile: &PestProfile,
        crop: Option<Crop>,
        conditions: &ForecastConditions,
        request: &PestRequest,
        as_of: NaiveDate,
    ) -> PestOutbreakForecast {
        let mut probability = BASE_PROBABILITY;
        let mut factors = vec![Factor::new(
            "Baseline Pressure",
            Impact::Neutral,
            BASE_PROBABILITY / 100.0,
            format!("Background pressure from {} in the region", profile.pest_name),
        )];

        let mut add = |name: &str, points: f64, description: String| {
            probability += points;
            factors.push(Factor::new(name, Impact::Negative, points / 100.0, description));
        };

        if let Some(temp) = conditions.temperature {
            let band = profile.optimal_temperature;
            if band.contains(temp) {
                add(
                    "Favorable Temperature",
                    30.0,
                    format!("Forecast average {:.1}°C is within {}°C", temp, band),
                );
            } else if band.within_margin(temp, 5.0) {
                add(
                    "Near-Favorable Temperature",
                    15.0,
                    format!("Forecast average {:.1}°C is within 5°C of {}°C", temp, band),
                );
            }
        }

        if let Some(humidity) = conditions.humidity {
            let band = profile.optimal_humidity;
            if band.contains(humidity) {
                add(
                    "Favorable Humidity",
                    25.0,
                    format!("Forecast humidity {:.0}% is within {}%", humidity, band),
                );
            } else if band.within_margin(humidity, 10.0) {
                add(
                    "Near-Favorable Humidity",
                    10.0,
                    format!("Forecast humidity {:.0}% is within 10% of {}%", humidity, band),
                );
            }
        }

        if let Some(rainfall) = conditions.rainfall {
            let band = profile.optimal_rainfall;
            if band.contains(rainfall) {
                add(
                    "Favorable Rainfall",
                    20.0,
                    format!("Forecast rainfall {:.1}mm/day is within {}mm", rainfall, band),
                );
            } else if band.within_margin(rainfall, 5.0) {
                add(
                    "Near-Favorable Rainfall",
                    10.0,
                    format!(
                        "Forecast rainfall {:.1}mm/day is within 5mm of {}mm",
                        rainfall, band
                    ),
                );
            }
        }

        let past = request
            .pest_history
            .iter()
            .filter(|h| h.pest_name.trim().eq_ignore_ascii_case(profile.pest_name))
            .max_by_key(|h| h.date);
        if let Some(record) = past {
            add(
                "Infestation History",
                25.0,
                format!(
                    "{} was recorded on {} ({} severity)",
                    profile.pest_name, record.date, record.severity
                ),
            );
        }

        if profile.is_susceptible(crop) {
            add(
                "Susceptible Crop",
                20.0,
                format!("{} is a preferred host of {}", request.crop, profile.pest_name),
            );
        }

        let probability = probability.clamp(0.0, 100.0);

        PestOutbreakForecast {
            pest_name: profile.pest_name.to_string(),
            predicted_date: self.predicted_date(profile, &request.weather_forecast, as_of),
            probability_pct: probability,
            severity: PestSeverity::from_probability(probability),
            factors,
        }
    }

    /// Outbreaks are expected sooner the more forecast days fall inside both
    /// the temperature and humidity bands: 10 days out with none, 5 days out
    /// with five or more.
    fn predicted_date(
        &self,
        profile: &PestProfile,
        forecast: &[WeatherDay],
        as_of: NaiveDate,
    ) -> NaiveDate {
        let favorable_days = forecast
            .iter()
            .filter(|d| {
                profile.optimal_temperature.contains(d.temperature.avg)
                    && profile.optimal_humidity.contains(d.humidity_pct)
            })
            .count() as u64;

        let lead = MAX_OUTBREAK_HORIZON_DAYS
            - favorable_days.min(MAX_OUTBREAK_HORIZON_DAYS - MIN_OUTBREAK_HORIZON_DAYS);
        as_of + Days::new(lead)
    }

    fn recommendations(
        &self,
        crop: Option<Crop>,
        forecasts: &[PestOutbreakForecast],
        request: &PestRequest,
    ) -> Vec<String> {
        let mut recs = vec![
            "Follow integrated pest management: combine cultural, biological and chemical controls"
                .to_string(),
            "Scout the field regularly and record pest counts before spraying".to_string(),
        ];

        for forecast in forecasts
            .iter()
            .filter(|f| f.probability_pct > HIGH_RISK_PROBABILITY)
        {
            let control = find_profile(&forecast.pest_name)
                .map(|p| p.control_measure)
                .unwrap_or("Prepare control measures");
            recs.push(format!(
                "High {} risk ({:.0}%): {}",
                forecast.pest_name, forecast.probability_pct, control
            ));
        }

        let forecast = &request.weather_forecast;
        if forecast.iter().any(|d| d.humidity_pct > 75.0) {
            recs.push(
                "Humid days ahead favor sap-sucking pests and fungal infections; increase scouting"
                    .to_string(),
            );
        }
        if forecast.iter().any(|d| d.rainfall_mm > 20.0) {
            recs.push(
                "Heavy rain expected; inspect for pest resurgence once the field drains"
                    .to_string(),
            );
        }

        if let Some(crop) = crop {
            recs.extend(crop.pest_tips().iter().map(|t| t.to_string()));
        }

        if let Some(soil) = &request.soil {
            if soil.organic_matter_pct < 2.0 {
                recs.push(
                    "Low organic matter weakens plant vigor; add compost to improve pest tolerance"
                        .to_string(),
                );
            }
            if soil.ph < 5.5 {
                recs.push("Acidic soil stresses plants; apply lime to improve resilience".to_string());
            }
        }

        recs
    }

    fn monitoring_schedule(
        &self,
        forecasts: &[PestOutbreakForecast],
        weather: &[WeatherDay],
    ) -> Vec<MonitoringTask> {
        let mut schedule = vec![
            MonitoringTask::recurring("Visual inspection of leaves, stems and fruit", "Daily"),
            MonitoringTask::recurring("Pheromone and sticky trap counts", "Weekly"),
        ];

        schedule.extend(
            forecasts
                .iter()
                .filter(|f| f.probability_pct > HIGH_RISK_PROBABILITY)
                .map(|f| {
                    MonitoringTask::recurring(format!("Check for {}", f.pest_name), "Twice daily")
                }),
        );

        for day in weather {
            let mut reasons = Vec::new();
            if day.humidity_pct > 80.0 {
                reasons.push(format!("humidity {:.0}%", day.humidity_pct));
            }
            if day.rainfall_mm > 25.0 {
                reasons.push(format!("rainfall {:.0}mm", day.rainfall_mm));
            }
            if !reasons.is_empty() {
                schedule.push(MonitoringTask::on(
                    day.date,
                    format!("Intensive monitoring ({})", reasons.join(", ")),
                ));
            }
        }

        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PestHistoryRecord, Temperature};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn forecast(days: u64, avg_temp: f64, humidity: f64, rain: f64) -> Vec<WeatherDay> {
        (0..days)
            .map(|i| {
                WeatherDay::new(
                    date(2024, 3, 1) + Days::new(i),
                    Temperature {
                        min: avg_temp - 5.0,
                        max: avg_temp + 5.0,
                        avg: avg_temp,
                    },
                    rain,
                    humidity,
                    10.0,
                )
            })
            .collect()
    }

    fn aphid_history() -> Vec<PestHistoryRecord> {
        vec![PestHistoryRecord {
            pest_name: "aphids".into(),
            date: date(2023, 2, 14),
            severity: PestSeverity::Moderate,
        }]
    }

    #[test]
    fn wheat_aphids_saturate_at_100() {
        let req = PestRequest::new("Wheat", date(2024, 1, 1))
            .with_forecast(forecast(7, 22.0, 75.0, 5.0))
            .with_history(aphid_history());
        let report = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();

        let aphids = report.forecast_for("Aphids").unwrap();
        assert_eq!(aphids.probability_pct, 100.0);
        assert_eq!(aphids.severity, PestSeverity::Severe);
        assert_eq!(report.risk_level, PestSeverity::Severe);

        let names: Vec<_> = aphids.factors.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Favorable Temperature"));
        assert!(names.contains(&"Favorable Humidity"));
        assert!(names.contains(&"Near-Favorable Rainfall"));
        assert!(names.contains(&"Infestation History"));
        assert!(names.contains(&"Susceptible Crop"));
    }

    #[test]
    fn baseline_without_forecast_or_history() {
        let req = PestRequest::new("Wheat", date(2024, 1, 1));
        let report = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();

        // Aphids: baseline + susceptible host
        assert_eq!(report.forecast_for("Aphids").unwrap().probability_pct, 40.0);
        // Termites: wheat is only a secondary host
        assert_eq!(report.forecast_for("Termites").unwrap().probability_pct, 20.0);
        assert_eq!(report.risk_level, PestSeverity::Low);
        assert_eq!(report.monitoring_schedule.len(), 2);
    }

    #[test]
    fn unknown_crop_uses_general_profile() {
        let req = PestRequest::new("Dragonfruit", date(2024, 1, 1))
            .with_forecast(forecast(5, 25.0, 60.0, 5.0));
        let report = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();

        assert_eq!(report.forecasts.len(), 1);
        let general = &report.forecasts[0];
        assert_eq!(general.pest_name, "General Pests");
        // 20 + 30 + 25 + 20, never susceptible
        assert_eq!(general.probability_pct, 95.0);
    }

    #[test]
    fn high_risk_pests_get_recommendations_and_checks() {
        let req = PestRequest::new("Rice", date(2024, 1, 1))
            .with_forecast(forecast(7, 27.0, 85.0, 10.0));
        let report = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();

        let bph = report.forecast_for("Brown Planthopper").unwrap();
        assert!(bph.probability_pct > 70.0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("High Brown Planthopper risk")));
        assert!(report
            .monitoring_schedule
            .iter()
            .any(|t| t.activity == "Check for Brown Planthopper" && t.frequency == "Twice daily"));
        // Every forecast day is above 80% humidity
        assert_eq!(
            report
                .monitoring_schedule
                .iter()
                .filter(|t| t.date.is_some())
                .count(),
            7
        );
        assert!(report.recommendations.iter().any(|r| r.contains("Humid days")));
    }

    #[test]
    fn predicted_date_stays_in_five_to_ten_day_window() {
        let as_of = date(2024, 3, 1);

        let none = PestRequest::new("Wheat", date(2024, 1, 1))
            .with_forecast(forecast(7, 5.0, 20.0, 0.0));
        let report = PestOutbreakPredictor.predict(&none, as_of).unwrap();
        for f in &report.forecasts {
            assert_eq!(f.predicted_date, as_of + Days::new(10));
        }

        let all = PestRequest::new("Wheat", date(2024, 1, 1))
            .with_forecast(forecast(7, 22.0, 70.0, 0.0));
        let report = PestOutbreakPredictor.predict(&all, as_of).unwrap();
        let aphids = report.forecast_for("Aphids").unwrap();
        assert_eq!(aphids.predicted_date, as_of + Days::new(5));
    }

    #[test]
    fn storm_days_get_intensive_monitoring() {
        let mut weather = forecast(3, 20.0, 50.0, 0.0);
        weather[1].rainfall_mm = 30.0;
        let req = PestRequest::new("Tomato", date(2024, 1, 1)).with_forecast(weather);
        let report = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();

        let dated: Vec<_> = report
            .monitoring_schedule
            .iter()
            .filter_map(|t| t.date)
            .collect();
        assert_eq!(dated, vec![date(2024, 3, 2)]);
        assert!(report.recommendations.iter().any(|r| r.contains("Heavy rain")));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let req = PestRequest::new("Cotton", date(2024, 1, 1))
            .with_forecast(forecast(6, 28.0, 65.0, 1.0));
        let a = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();
        let b = PestOutbreakPredictor.predict(&req, date(2024, 3, 1)).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn factor_weights_sum_to_unclamped_probability() {
        let as_of = date(2024, 3, 1);
        let weight_points =
            |f: &PestOutbreakForecast| f.factors.iter().map(|x| x.weight).sum::<f64>() * 100.0;

        let baseline = PestRequest::new("Wheat", date(2024, 1, 1));
        let report = PestOutbreakPredictor.predict(&baseline, as_of).unwrap();
        for f in &report.forecasts {
            assert!((weight_points(f) - f.probability_pct).abs() < 1e-9, "{}", f.pest_name);
        }
        assert_eq!(report.risk_level, PestSeverity::from_probability(report.max_probability()));

        let saturated = PestRequest::new("Wheat", date(2024, 1, 1))
            .with_forecast(forecast(7, 22.0, 75.0, 5.0))
            .with_history(aphid_history());
        let report = PestOutbreakPredictor.predict(&saturated, as_of).unwrap();
        let aphids = report.forecast_for("Aphids").unwrap();
        assert_eq!(aphids.probability_pct, 100.0);
        assert!(weight_points(aphids) > 100.0);
    }
}
