use super::Predictor;
use crate::error::Result;
use crate::logic::calculations::{
    average_humidity, average_temperature, days_since, nutrient_balance, rain_distribution,
    temperature_variance, total_rainfall, yield_growth_stage_factor,
};
use crate::models::{
    base_yield_for, Crop, Factor, SoilSample, WeatherDay, YieldEstimate, YieldRequest,
};
use chrono::NaiveDate;

const BASE_CONFIDENCE: i32 = 75;
const MIN_CONFIDENCE: i32 = 60;
const MAX_CONFIDENCE: i32 = 95;

/// Days of history needed before stability and distribution are scored
const MIN_DAYS_FOR_TRENDS: usize = 7;

/// Yield predictor - estimates harvest from crop, stage, weather and soil
///
/// Weather signals (history):
/// - Average temperature 18-30°C favorable, below 10°C or above 35°C extreme
/// - Season rainfall 500-1500mm adequate, <300mm drought, >2000mm excess
/// - Daily temperature variance <5 is stable
/// - Evenly distributed rainfall
/// - Average humidity 40-70% favorable, >80% disease-prone
///
/// Soil signals: pH, organic matter, moisture and N-P-K balance.
///
/// Every multiplier applied to the estimate is recorded as a [`Factor`].
pub struct YieldPredictor;

impl Predictor for YieldPredictor {
    type Request = YieldRequest;
    type Output = YieldEstimate;

    fn id(&self) -> &'static str {
        "yield_estimate"
    }

    fn name(&self) -> &'static str {
        "Yield Predictor"
    }

    fn predict(&self, request: &YieldRequest, as_of: NaiveDate) -> Result<YieldEstimate> {
        request.validate(as_of)?;

        let crop = Crop::from_str(&request.crop);
        if crop.is_none() {
            tracing::debug!(crop = %request.crop, "Unknown crop, using default base yield");
        }

        let base_yield = base_yield_for(crop);
        let days = days_since(request.planting_date, as_of);
        let growth_stage_factor = yield_growth_stage_factor(days);

        let mut adjustments = Adjustments::default();
        self.apply_weather(&request.weather_history, &mut adjustments);
        if let Some(soil) = &request.soil {
            self.apply_soil(soil, &mut adjustments);
        }

        let predicted =
            (base_yield * request.area_hectares * adjustments.value * growth_stage_factor).round();

        let confidence = self.confidence(request, &adjustments.factors);
        let recommendations = self.recommendations(crop, &adjustments.factors);

        tracing::debug!(
            crop = %request.crop,
            predicted,
            adjustment = adjustments.value,
            growth_stage_factor,
            confidence,
            "Yield estimated"
        );

        Ok(YieldEstimate {
            crop: request.crop.clone(),
            as_of,
            predicted_yield_kg: predicted,
            range_min_kg: (predicted * 0.8).round(),
            range_max_kg: (predicted * 1.2).round(),
            confidence_pct: confidence,
            base_yield_kg_per_ha: base_yield,
            yield_adjustment: adjustments.value,
            growth_stage_factor,
            days_since_planting: days,
            factors: adjustments.factors,
            recommendations,
        })
    }
}

/// Running multiplicative adjustment paired with its explanation
#[derive(Debug)]
struct Adjustments {
    value: f64,
    factors: Vec<Factor>,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            value: 1.0,
            factors: Vec::new(),
        }
    }
}

impl Adjustments {
    fn apply(&mut self, name: &str, multiplier: f64, description: String) {
        self.value *= multiplier;
        self.factors
            .push(Factor::from_multiplier(name, multiplier, description));
    }
}

impl YieldPredictor {
    fn apply_weather(&self, history: &[WeatherDay], adj: &mut Adjustments) {
        let Some(avg_temp) = average_temperature(history) else {
            return;
        };

        if (18.0..=30.0).contains(&avg_temp) {
            adj.apply(
                "Optimal Temperature",
                1.15,
                format!(
                    "Average temperature {:.1}°C is within the optimal 18-30°C range",
                    avg_temp
                ),
            );
        } else if !(10.0..=35.0).contains(&avg_temp) {
            adj.apply(
                "Extreme Temperature",
                0.7,
                format!(
                    "Average temperature {:.1}°C is outside the tolerable 10-35°C range",
                    avg_temp
                ),
            );
        }

        let rainfall = total_rainfall(history);
        if (500.0..=1500.0).contains(&rainfall) {
            adj.apply(
                "Adequate Rainfall",
                1.12,
                format!("Total rainfall of {:.0}mm meets crop water needs", rainfall),
            );
        } else if rainfall < 300.0 {
            adj.apply(
                "Drought Stress",
                0.65,
                format!("Total rainfall of {:.0}mm is below 300mm", rainfall),
            );
        } else if rainfall > 2000.0 {
            adj.apply(
                "Excess Rainfall",
                0.75,
                format!(
                    "Total rainfall of {:.0}mm exceeds 2000mm, risking waterlogging",
                    rainfall
                ),
            );
        }

        if history.len() >= MIN_DAYS_FOR_TRENDS {
            if let Some(var) = temperature_variance(history) {
                if var < 5.0 {
                    adj.apply(
                        "Stable Temperatures",
                        1.08,
                        format!("Daily temperature variance of {:.2} is low", var),
                    );
                }
            }

            let distribution = rain_distribution(history);
            if distribution.even {
                adj.apply(
                    "Even Rainfall Distribution",
                    1.05,
                    format!(
                        "Rain fell evenly across the period with {} heavy-rain day(s)",
                        distribution.heavy_periods
                    ),
                );
            }
        }

        if let Some(humidity) = average_humidity(history) {
            if (40.0..=70.0).contains(&humidity) {
                adj.apply(
                    "Optimal Humidity",
                    1.05,
                    format!("Average humidity of {:.0}% suits crop growth", humidity),
                );
            } else if humidity > 80.0 {
                adj.apply(
                    "High Humidity",
                    0.95,
                    format!(
                        "Average humidity of {:.0}% favors fungal disease",
                        humidity
                    ),
                );
            }
        }
    }

    fn apply_soil(&self, soil: &SoilSample, adj: &mut Adjustments) {
        if (6.0..=7.5).contains(&soil.ph) {
            adj.apply(
                "Optimal Soil pH",
                1.1,
                format!("Soil pH {:.1} is within the optimal 6.0-7.5 range", soil.ph),
            );
        } else if soil.ph < 5.5 || soil.ph > 8.0 {
            adj.apply(
                "Soil pH Imbalance",
                0.8,
                format!("Soil pH {:.1} limits nutrient availability", soil.ph),
            );
        }

        let om = soil.organic_matter_pct;
        if om >= 3.0 {
            adj.apply(
                "Rich Organic Matter",
                1.08,
                format!("Organic matter at {:.1}% supports soil structure", om),
            );
        } else if om >= 2.0 {
            adj.apply(
                "Moderate Organic Matter",
                1.04,
                format!("Organic matter at {:.1}% is adequate", om),
            );
        } else {
            adj.apply(
                "Low Organic Matter",
                0.92,
                format!("Organic matter at {:.1}% is below 2%", om),
            );
        }

        let moisture = soil.moisture_pct;
        if (30.0..=70.0).contains(&moisture) {
            adj.apply(
                "Good Soil Moisture",
                1.08,
                format!("Soil moisture of {:.0}% is in the 30-70% range", moisture),
            );
        } else if moisture < 20.0 {
            adj.apply(
                "Low Soil Moisture",
                0.85,
                format!("Soil moisture of {:.0}% is below 20%", moisture),
            );
        } else if moisture > 80.0 {
            adj.apply(
                "Waterlogged Soil",
                0.9,
                format!("Soil moisture of {:.0}% exceeds 80%", moisture),
            );
        }

        let balance = nutrient_balance(soil);
        if balance >= 0.8 {
            adj.apply(
                "Balanced Nutrition",
                1.12,
                format!("N-P-K balance index of {:.2} is well balanced", balance),
            );
        } else if balance >= 0.6 {
            adj.apply(
                "Adequate Nutrition",
                1.05,
                format!("N-P-K balance index of {:.2} is adequate", balance),
            );
        } else {
            adj.apply(
                "Nutrient Deficiency",
                0.8,
                format!("N-P-K balance index of {:.2} indicates deficiency", balance),
            );
        }
    }

    fn confidence(&self, request: &YieldRequest, factors: &[Factor]) -> u8 {
        let mut confidence = BASE_CONFIDENCE;

        let history_days = request.weather_history.len();
        if history_days >= 30 {
            confidence += 10;
        } else if history_days >= 15 {
            confidence += 5;
        }

        if request.soil.is_some() {
            confidence += 10;
        }

        let positive = factors.iter().filter(|f| f.is_positive()).count() as i32;
        let negative = factors.iter().filter(|f| f.is_negative()).count() as i32;
        confidence += 3 * positive - 4 * negative;

        confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8
    }

    fn recommendations(&self, crop: Option<Crop>, factors: &[Factor]) -> Vec<String> {
        let mut recs: Vec<String> = factors
            .iter()
            .filter(|f| f.is_negative())
            .map(|f| corrective_action(&f.name))
            .collect();

        if let Some(crop) = crop {
            recs.extend(crop.yield_tips().iter().map(|t| t.to_string()));
        }

        recs
    }
}

fn corrective_action(factor_name: &str) -> String {
    let action = match factor_name {
        "Extreme Temperature" => "Use mulch or shade nets to buffer extreme temperatures",
        "Drought Stress" => "Rainfall is well below crop needs; plan supplemental irrigation",
        "Excess Rainfall" => "Improve field drainage to prevent waterlogging",
        "High Humidity" => "Improve airflow and scout for fungal disease during humid spells",
        "Soil pH Imbalance" => {
            "Correct soil pH toward 6.0-7.5 with lime (acidic) or gypsum (alkaline)"
        }
        "Low Organic Matter" => "Add compost or farmyard manure to build organic matter",
        "Low Soil Moisture" => "Irrigate to bring soil moisture above 30%",
        "Waterlogged Soil" => "Open drainage channels to relieve saturated soil",
        "Nutrient Deficiency" => "Apply balanced N-P-K fertilizer according to the soil test",
        other => return format!("Address {}", other.to_lowercase()),
    };
    action.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Impact, Temperature};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(days: u64, min: f64, max: f64, rain: f64, humidity: f64) -> Vec<WeatherDay> {
        (0..days)
            .map(|i| {
                WeatherDay::new(
                    date(2024, 1, 1) + chrono::Days::new(i),
                    Temperature::new(min, max),
                    rain,
                    humidity,
                    8.0,
                )
            })
            .collect()
    }

    fn balanced_soil() -> SoilSample {
        SoilSample {
            ph: 6.5,
            moisture_pct: 45.0,
            organic_matter_pct: 3.2,
            nitrogen_ppm: 120.0,
            phosphorus_ppm: 35.0,
            potassium_ppm: 150.0,
        }
    }

    #[test]
    fn no_signals_gives_base_yield_times_area() {
        let req = YieldRequest::new("Wheat", 2.5, date(2024, 1, 1));
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        assert!(est.factors.is_empty());
        assert_eq!(est.yield_adjustment, 1.0);
        assert_eq!(est.growth_stage_factor, 1.0);
        assert_eq!(est.predicted_yield_kg, (3500.0_f64 * 2.5).round());
        assert_eq!(est.range_min_kg, (est.predicted_yield_kg * 0.8).round());
        assert_eq!(est.range_max_kg, (est.predicted_yield_kg * 1.2).round());
        assert_eq!(est.confidence_pct, 75);
    }

    #[test]
    fn unknown_crop_uses_default_base_yield() {
        let req = YieldRequest::new("Quinoa", 1.0, date(2024, 1, 1));
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();
        assert_eq!(est.predicted_yield_kg, 3000.0);
        assert!(est.recommendations.is_empty());
    }

    #[test]
    fn growth_stage_scales_estimate() {
        let req = YieldRequest::new("Maize", 1.0, date(2024, 5, 1));
        let est = YieldPredictor.predict(&req, date(2024, 5, 20)).unwrap();
        assert_eq!(est.days_since_planting, 19);
        assert_eq!(est.growth_stage_factor, 0.3);
        assert_eq!(est.predicted_yield_kg, (5500.0_f64 * 0.3).round());
    }

    #[test]
    fn balanced_soil_produces_balanced_nutrition_factor() {
        let req = YieldRequest::new("Wheat", 1.0, date(2024, 1, 1)).with_soil(balanced_soil());
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        let factor = est.factor("Balanced Nutrition").unwrap();
        assert_eq!(factor.impact, Impact::Positive);
        assert_relative_eq!(factor.weight, 0.12, epsilon = 1e-9);

        // pH, organic matter, moisture and nutrition are all favorable
        assert_eq!(est.positive_factor_count(), 4);
        assert_eq!(est.negative_factor_count(), 0);
        assert_relative_eq!(
            est.yield_adjustment,
            1.1 * 1.08 * 1.08 * 1.12,
            epsilon = 1e-9
        );
    }

    #[test]
    fn factors_reconstruct_adjustment() {
        let req = YieldRequest::new("Rice", 3.0, date(2024, 1, 1))
            .with_weather_history(history(40, 22.0, 30.0, 15.0, 60.0))
            .with_soil(SoilSample {
                ph: 5.0,
                moisture_pct: 15.0,
                organic_matter_pct: 1.0,
                nitrogen_ppm: 40.0,
                phosphorus_ppm: 10.0,
                potassium_ppm: 60.0,
            });
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        assert!(!est.factors.is_empty());
        assert_relative_eq!(
            est.adjustment_from_factors(),
            est.yield_adjustment,
            epsilon = 1e-9
        );
    }

    #[test]
    fn favorable_history_scores_weather_factors() {
        // 40 days at 26°C average, 15mm/day = 600mm, 60% humidity
        let req = YieldRequest::new("Rice", 1.0, date(2024, 1, 1))
            .with_weather_history(history(40, 22.0, 30.0, 15.0, 60.0));
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        for name in [
            "Optimal Temperature",
            "Adequate Rainfall",
            "Stable Temperatures",
            "Even Rainfall Distribution",
            "Optimal Humidity",
        ] {
            assert!(est.factor(name).is_some(), "missing factor {}", name);
        }
        // 75 + 10 (history) + 5 positives * 3
        assert_eq!(est.confidence_pct, 95);
    }

    #[test]
    fn dry_cold_history_is_penalized() {
        let req = YieldRequest::new("Wheat", 1.0, date(2024, 1, 1))
            .with_weather_history(history(20, 0.0, 8.0, 0.5, 85.0));
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        assert!(est.factor("Extreme Temperature").is_some());
        assert!(est.factor("Drought Stress").is_some());
        assert!(est.factor("High Humidity").is_some());
        // Rainfall is constant, so distribution is even
        assert!(est.factor("Even Rainfall Distribution").is_some());
        assert!(est
            .recommendations
            .iter()
            .any(|r| r.contains("supplemental irrigation")));
        assert!(est.predicted_yield_kg < 3500.0);
    }

    #[test]
    fn short_history_skips_trend_factors() {
        let req = YieldRequest::new("Wheat", 1.0, date(2024, 1, 1))
            .with_weather_history(history(5, 18.0, 26.0, 2.0, 55.0));
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();
        assert!(est.factor("Stable Temperatures").is_none());
        assert!(est.factor("Even Rainfall Distribution").is_none());
    }

    #[test]
    fn confidence_is_clamped_low() {
        let req = YieldRequest::new("Wheat", 1.0, date(2024, 1, 1))
            .with_weather_history(history(3, 36.0, 44.0, 0.0, 90.0))
            .with_soil(SoilSample {
                ph: 9.0,
                moisture_pct: 90.0,
                organic_matter_pct: 0.5,
                nitrogen_ppm: 0.0,
                phosphorus_ppm: 0.0,
                potassium_ppm: 0.0,
            });
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();
        // 75 + 10 (soil) - 4 * 7 negatives = 57, clamped to 60
        assert_eq!(est.negative_factor_count(), 7);
        assert_eq!(est.confidence_pct, 60);
    }

    #[test]
    fn negative_factors_drive_recommendations() {
        let req = YieldRequest::new("Maize", 1.0, date(2024, 1, 1)).with_soil(SoilSample {
            ph: 5.0,
            moisture_pct: 50.0,
            organic_matter_pct: 2.5,
            nitrogen_ppm: 150.0,
            phosphorus_ppm: 35.0,
            potassium_ppm: 150.0,
        });
        let est = YieldPredictor.predict(&req, date(2024, 6, 1)).unwrap();

        assert_eq!(est.negative_factor_count(), 1);
        assert!(est.recommendations[0].contains("lime"));
        assert!(est
            .recommendations
            .iter()
            .any(|r| r.contains("Side-dress nitrogen")));
    }
}
