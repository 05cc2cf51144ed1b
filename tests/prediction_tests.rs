//! Prediction integration tests
//!
//! Exercises the public engine API with field scenarios and checks the
//! invariants every prediction must hold over random inputs.

use agroforecast::logic::calculations::nutrient_balance;
use agroforecast::logic::{AnalyticsEngine, FieldRequest};
use agroforecast::models::{
    Impact, IrrigationRequest, PestRequest, SoilSample, SoilType, Temperature, WeatherDay,
    YieldRequest,
};
use agroforecast::AgroError;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_soil() -> SoilSample {
    SoilSample {
        ph: 6.5,
        moisture_pct: 45.0,
        organic_matter_pct: 3.2,
        nitrogen_ppm: 120.0,
        phosphorus_ppm: 35.0,
        potassium_ppm: 150.0,
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn neutral_yield_is_base_times_area() {
    let engine = AnalyticsEngine::new();
    let as_of = date(2024, 9, 1);
    let request = YieldRequest::new("Maize", 2.0, as_of - Days::new(120));

    let estimate = engine.predict_yield(&request, as_of).unwrap();
    assert_eq!(estimate.growth_stage_factor, 1.0);
    assert_eq!(estimate.yield_adjustment, 1.0);
    assert_eq!(estimate.predicted_yield_kg, 11000.0);
    assert!(estimate.factors.is_empty());
}

#[test]
fn balanced_soil_is_positive_factor() {
    assert_abs_diff_eq!(nutrient_balance(&sample_soil()), 0.928, epsilon = 0.001);

    let engine = AnalyticsEngine::new();
    let as_of = date(2024, 9, 1);
    let request = YieldRequest::new("Wheat", 1.0, date(2024, 5, 1)).with_soil(sample_soil());

    let estimate = engine.predict_yield(&request, as_of).unwrap();
    let balanced = estimate.factor("Balanced Nutrition").unwrap();
    assert_eq!(balanced.impact, Impact::Positive);
    assert_relative_eq!(
        estimate.yield_adjustment,
        estimate.adjustment_from_factors(),
        max_relative = 1e-9
    );
}

#[test]
fn rice_irrigation_follows_four_day_cadence() {
    let engine = AnalyticsEngine::new();
    let as_of = date(2024, 7, 15);
    let request = IrrigationRequest::new("Rice", as_of - Days::new(14));

    let plan = engine.generate_irrigation_schedule(&request, as_of).unwrap();
    let days: Vec<i64> = plan
        .decisions
        .iter()
        .filter(|d| d.irrigate)
        .map(|d| d.days_since_planting)
        .collect();
    assert_eq!(days, vec![16, 20, 24]);
    assert_eq!(plan.events.len(), 3);
}

#[test]
fn wheat_aphids_with_history_reach_certainty() {
    let engine = AnalyticsEngine::new();
    let as_of = date(2024, 3, 1);
    let forecast = (0..7)
        .map(|i| {
            WeatherDay::new(
                as_of + Days::new(i),
                Temperature::new(17.0, 27.0),
                5.0,
                75.0,
                8.0,
            )
        })
        .collect();
    let history = serde_json::from_str(
        r#"[{"pest_name": "Aphids", "date": "2023-03-10", "severity": "High"}]"#,
    )
    .unwrap();
    let request = PestRequest::new("Wheat", date(2024, 1, 1))
        .with_forecast(forecast)
        .with_history(history);

    let report = engine.predict_pest_outbreaks(&request, as_of).unwrap();
    assert_eq!(report.forecast_for("Aphids").unwrap().probability_pct, 100.0);
}

#[test]
fn field_request_from_json_runs_full_report() {
    let json = r#"{
        "crop": "cotton",
        "area_hectares": 3.0,
        "planting_date": "2024-05-01",
        "soil_type": "Sandy",
        "weather_forecast": [
            {"date": "2024-07-15", "temperature": {"min": 24.0, "max": 33.0, "avg": 28.5},
             "rainfall_mm": 0.0, "humidity_pct": 35.0, "wind_kmh": 12.0}
        ],
        "soil": {"ph": 7.2, "moisture_pct": 18.0, "organic_matter_pct": 1.1,
                 "nitrogen_ppm": 60.0, "phosphorus_ppm": 12.0, "potassium_ppm": 90.0}
    }"#;
    let field: FieldRequest = serde_json::from_str(json).unwrap();
    assert_eq!(field.soil_type, Some(SoilType::Sandy));

    let report = AnalyticsEngine::new().report(&field, date(2024, 7, 15));
    assert!(report.is_complete());

    let plan = report.irrigation_plan.unwrap();
    let first = &plan.decisions[0];
    // Hot (x1.2) and dry soil (x1.5)
    assert_relative_eq!(first.weather_factor, 1.8, epsilon = 1e-9);
    assert_eq!(first.day_stress, 2.0 + 1.0 + 3.0);

    let estimate = report.yield_estimate.unwrap();
    assert!(estimate.factor("Nutrient Deficiency").is_some());
    assert!(estimate.factor("Low Soil Moisture").is_some());
}

#[test]
fn planting_after_as_of_fails_every_predictor() {
    let field = FieldRequest::new("Wheat", 1.0, date(2024, 8, 1));
    let report = AnalyticsEngine::new().report(&field, date(2024, 7, 1));

    assert!(report.yield_estimate.is_none());
    assert!(report.pest_risk.is_none());
    assert!(report.irrigation_plan.is_none());
    assert_eq!(report.failures.len(), 3);

    let err = AnalyticsEngine::new()
        .generate_irrigation_schedule(&field.irrigation_request(), date(2024, 7, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        AgroError::PredictionFailed {
            predictor: "irrigation_schedule",
            ..
        }
    ));
}

// ============================================================================
// Property Tests
// ============================================================================

fn crop_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Wheat", "Rice", "Maize", "Cotton", "Sugarcane", "Soybean", "Potato", "Tomato", "Millet",
    ])
    .prop_map(String::from)
}

fn weather_strategy(start: NaiveDate, max_days: usize) -> impl Strategy<Value = Vec<WeatherDay>> {
    prop::collection::vec(
        (-10.0..40.0f64, 0.0..15.0f64, 0.0..60.0f64, 0.0..100.0f64, 0.0..60.0f64),
        0..max_days,
    )
    .prop_map(move |days| {
        days.into_iter()
            .enumerate()
            .map(|(i, (min, spread, rain, humidity, wind))| {
                WeatherDay::new(
                    start + Days::new(i as u64),
                    Temperature::new(min, min + spread),
                    rain,
                    humidity,
                    wind,
                )
            })
            .collect()
    })
}

fn soil_strategy() -> impl Strategy<Value = Option<SoilSample>> {
    prop::option::of(
        (
            3.0..10.0f64,
            0.0..100.0f64,
            0.0..10.0f64,
            0.0..300.0f64,
            0.0..80.0f64,
            0.0..300.0f64,
        )
            .prop_map(|(ph, moisture, om, n, p, k)| SoilSample {
                ph,
                moisture_pct: moisture,
                organic_matter_pct: om,
                nitrogen_ppm: n,
                phosphorus_ppm: p,
                potassium_ppm: k,
            }),
    )
}

fn soil_type_strategy() -> impl Strategy<Value = Option<SoilType>> {
    prop::option::of(prop::sample::select(vec![
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Silty,
    ]))
}

fn as_of() -> NaiveDate {
    date(2024, 6, 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_yield_confidence_and_range(
        crop in crop_strategy(),
        area in 0.0..500.0f64,
        age in 0u64..200,
        history in weather_strategy(date(2024, 4, 1), 30),
        soil in soil_strategy(),
    ) {
        let mut request = YieldRequest::new(crop, area, as_of() - Days::new(age))
            .with_weather_history(history);
        request.soil = soil;

        let estimate = AnalyticsEngine::new().predict_yield(&request, as_of()).unwrap();
        prop_assert!((60..=95).contains(&estimate.confidence_pct));
        prop_assert!(estimate.range_min_kg <= estimate.predicted_yield_kg);
        prop_assert!(estimate.predicted_yield_kg <= estimate.range_max_kg);
        prop_assert!(
            (estimate.yield_adjustment - estimate.adjustment_from_factors()).abs() < 1e-9
        );
    }

    #[test]
    fn prop_pest_probability_bounded(
        crop in crop_strategy(),
        forecast in weather_strategy(as_of(), 14),
        soil in soil_strategy(),
    ) {
        let mut request = PestRequest::new(crop, date(2024, 3, 1)).with_forecast(forecast);
        request.soil = soil;

        let report = AnalyticsEngine::new().predict_pest_outbreaks(&request, as_of()).unwrap();
        prop_assert!(!report.forecasts.is_empty());
        for f in &report.forecasts {
            prop_assert!((0.0..=100.0).contains(&f.probability_pct));
            prop_assert!(f.predicted_date >= as_of() + Days::new(5));
            prop_assert!(f.predicted_date <= as_of() + Days::new(10));
        }
    }

    #[test]
    fn prop_irrigation_plan_consistent(
        crop in crop_strategy(),
        age in 0u64..150,
        soil_type in soil_type_strategy(),
        forecast in weather_strategy(as_of(), 14),
        soil in soil_strategy(),
    ) {
        let mut request = IrrigationRequest::new(crop, as_of() - Days::new(age))
            .with_forecast(forecast);
        request.soil_type = soil_type;
        request.soil = soil;

        let engine = AnalyticsEngine::new();
        let plan = engine.generate_irrigation_schedule(&request, as_of()).unwrap();
        prop_assert_eq!(plan.decisions.len(), 14);
        prop_assert!(plan.events.len() <= 14);
        prop_assert!((0.0..=100.0).contains(&plan.efficiency_score));

        let total: f64 = plan.events.iter().map(|e| e.water_liters).sum();
        prop_assert!((plan.water_requirement_liters - total).abs() < 1e-6);

        for pair in plan.events.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }

        let again = engine.generate_irrigation_schedule(&request, as_of()).unwrap();
        prop_assert_eq!(plan.events, again.events);
    }
}
