use super::Predictor;
use crate::error::Result;
use crate::logic::calculations::{days_since, irrigation_growth_stage_factor};
use crate::models::{
    day_for, Crop, Intensity, IrrigationDecision, IrrigationEvent, IrrigationMethod,
    IrrigationPlan, IrrigationRequest, Priority, WeatherDay, DEFAULT_IRRIGATION_BASE_LITERS,
};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};

/// Number of consecutive days simulated per schedule
pub const SCHEDULE_DAYS: u64 = 14;

/// Irrigation interval under neutral conditions
pub const BASE_INTERVAL_DAYS: i64 = 4;

/// Carried-in stress above which the next day is treated as overdue
pub const STRESS_OVERRIDE_THRESHOLD: f64 = 10.0;

const STRESS_OVERRIDE_MULTIPLIER: f64 = 1.3;

/// Irrigation scheduler - plans two weeks of watering day by day
///
/// Each day gets a weather factor from that day's forecast and the soil
/// sample:
/// - Max temp >35°C: x1.4 (+3 stress), >30°C: x1.2 (+2 stress), <15°C: x0.8
/// - Rain >15mm: x0.5, >5mm: x0.8, none: +1 stress
/// - Humidity <30%: x1.3 (+2 stress), >70%: x0.8
/// - Wind >20km/h: x1.2 (+1 stress)
/// - Soil moisture <20%: x1.5 (+3 stress), >60%: x0.7
/// - Carried stress above 10: x1.3
///
/// The base 4-day interval shrinks as the weather factor and growth stage
/// rise. A day with no forecast entry, no soil moisture band and no stress
/// override keeps the plain 4-day cadence counted from planting. Skipped days add their stress to the running total; watering
/// resets it.
pub struct IrrigationScheduler;

impl Predictor for IrrigationScheduler {
    type Request = IrrigationRequest;
    type Output = IrrigationPlan;

    fn id(&self) -> &'static str {
        "irrigation_schedule"
    }

    fn name(&self) -> &'static str {
        "Irrigation Scheduler"
    }

    fn predict(&self, request: &IrrigationRequest, as_of: NaiveDate) -> Result<IrrigationPlan> {
        request.validate(as_of)?;

        let crop = Crop::from_str(&request.crop);

        let decisions: Vec<IrrigationDecision> = (0..SCHEDULE_DAYS)
            .map(|offset| as_of + Days::new(offset))
            .scan(0.0_f64, |stress, date| {
                let decision = self.decide(date, request, *stress);
                *stress = decision.cumulative_stress;
                Some(decision)
            })
            .collect();

        let events: Vec<IrrigationEvent> = decisions
            .iter()
            .filter(|d| d.irrigate)
            .map(|d| self.build_event(d, crop, request))
            .collect();

        let water_requirement_liters = events.iter().map(|e| e.water_liters).sum();
        let efficiency_score = efficiency_score(&events, &request.weather_forecast);
        let recommendations =
            self.recommendations(&events, &decisions, efficiency_score, &request.weather_forecast);

        tracing::debug!(
            crop = %request.crop,
            events = events.len(),
            water_requirement_liters,
            efficiency_score,
            "Irrigation schedule generated"
        );

        Ok(IrrigationPlan {
            crop: request.crop.clone(),
            as_of,
            events,
            water_requirement_liters,
            efficiency_score,
            decisions,
            recommendations,
        })
    }
}

impl IrrigationScheduler {
    /// Decide a single day given the stress carried in from previous days
    fn decide(
        &self,
        date: NaiveDate,
        request: &IrrigationRequest,
        carried_stress: f64,
    ) -> IrrigationDecision {
        let days = days_since(request.planting_date, date);
        let growth_stage_factor = irrigation_growth_stage_factor(days);
        let forecast = day_for(&request.weather_forecast, date);

        let mut weather_factor = 1.0;
        let mut day_stress = 0.0;

        if let Some(day) = forecast {
            let max_temp = day.temperature.max;
            if max_temp > 35.0 {
                weather_factor *= 1.4;
                day_stress += 3.0;
            } else if max_temp > 30.0 {
                weather_factor *= 1.2;
                day_stress += 2.0;
            } else if max_temp < 15.0 {
                weather_factor *= 0.8;
            }

            if day.rainfall_mm > 15.0 {
                weather_factor *= 0.5;
            } else if day.rainfall_mm > 5.0 {
                weather_factor *= 0.8;
            } else if day.rainfall_mm == 0.0 {
                day_stress += 1.0;
            }

            if day.humidity_pct < 30.0 {
                weather_factor *= 1.3;
                day_stress += 2.0;
            } else if day.humidity_pct > 70.0 {
                weather_factor *= 0.8;
            }

            if day.wind_kmh > 20.0 {
                weather_factor *= 1.2;
                day_stress += 1.0;
            }
        }

        let mut soil_adjusted = false;
        if let Some(soil) = &request.soil {
            if soil.moisture_pct < 20.0 {
                weather_factor *= 1.5;
                day_stress += 3.0;
                soil_adjusted = true;
            } else if soil.moisture_pct > 60.0 {
                weather_factor *= 0.7;
                soil_adjusted = true;
            }
        }

        let stress_override = carried_stress > STRESS_OVERRIDE_THRESHOLD;
        if stress_override {
            weather_factor *= STRESS_OVERRIDE_MULTIPLIER;
        }

        // The base cadence applies only when nothing adjusted the day
        let adjusted = forecast.is_some() || soil_adjusted || stress_override;
        let (interval_days, irrigate) = if adjusted {
            let interval = (BASE_INTERVAL_DAYS as f64 / (weather_factor * growth_stage_factor))
                .round()
                .max(1.0) as i64;
            let stage_day = (days as f64 * growth_stage_factor).round() as i64;
            (interval, stage_day.rem_euclid(interval) == 0)
        } else {
            (
                BASE_INTERVAL_DAYS,
                days.rem_euclid(BASE_INTERVAL_DAYS) == 0,
            )
        };

        let cumulative_stress = if irrigate {
            0.0
        } else {
            carried_stress + day_stress
        };

        let decision = IrrigationDecision {
            date,
            days_since_planting: days,
            growth_stage_factor,
            weather_factor,
            interval_days,
            irrigate,
            intensity: Intensity::from_weather_factor(weather_factor),
            stress_override,
            day_stress,
            cumulative_stress,
        };

        tracing::trace!(?decision, "Irrigation day evaluated");
        decision
    }

    fn build_event(
        &self,
        decision: &IrrigationDecision,
        crop: Option<Crop>,
        request: &IrrigationRequest,
    ) -> IrrigationEvent {
        let water_liters = self.water_amount(decision.date, crop, request);

        let soil_duration = request
            .soil_type
            .map(|s| s.duration_multiplier())
            .unwrap_or(1.0);
        let duration_minutes = (water_liters / 10.0
            * soil_duration
            * decision.intensity.duration_multiplier())
        .round()
        .max(0.0) as u32;

        let mut method = request
            .soil_type
            .map(|s| s.default_method())
            .unwrap_or(IrrigationMethod::Drip);
        if crop == Some(Crop::Rice) || water_liters > 2000.0 {
            method = IrrigationMethod::Flood;
        } else if water_liters > 1500.0 {
            method = IrrigationMethod::Furrow;
        }

        let priority = if decision.intensity == Intensity::Heavy || water_liters > 1200.0 {
            Priority::High
        } else if decision.intensity == Intensity::Moderate || water_liters > 800.0 {
            Priority::Medium
        } else {
            Priority::Low
        };

        IrrigationEvent {
            date: decision.date,
            start_time: start_time(day_for(&request.weather_forecast, decision.date)),
            duration_minutes,
            water_liters,
            method,
            priority,
            intensity: decision.intensity,
        }
    }

    fn water_amount(&self, date: NaiveDate, crop: Option<Crop>, request: &IrrigationRequest) -> f64 {
        let mut liters = crop
            .map(|c| c.irrigation_base_liters())
            .unwrap_or(DEFAULT_IRRIGATION_BASE_LITERS);

        if let Some(soil_type) = request.soil_type {
            liters *= soil_type.water_multiplier();
        }

        if let Some(soil) = &request.soil {
            // Organic matter holds water between events
            if soil.organic_matter_pct >= 3.0 {
                liters *= 0.9;
            } else if soil.organic_matter_pct >= 2.0 {
                liters *= 0.95;
            }

            if soil.ph < 5.5 || soil.ph > 8.0 {
                liters *= 1.1;
            }
        }

        (liters * seasonal_multiplier(date.month())).round()
    }

    fn recommendations(
        &self,
        events: &[IrrigationEvent],
        decisions: &[IrrigationDecision],
        efficiency: f64,
        forecast: &[WeatherDay],
    ) -> Vec<String> {
        let mut recs = Vec::new();

        if events.is_empty() {
            recs.push(
                "No irrigation needed in the next 14 days; keep monitoring soil moisture"
                    .to_string(),
            );
            return recs;
        }

        if decisions.iter().any(|d| d.stress_override) {
            recs.push(
                "Water stress has built up over several dry days; do not postpone the next irrigation"
                    .to_string(),
            );
        }

        if events.iter().any(|e| e.method == IrrigationMethod::Flood) {
            recs.push(
                "Flood irrigation scheduled; level the field and repair bunds to limit runoff"
                    .to_string(),
            );
        }

        if efficiency < 75.0 {
            recs.push(format!(
                "Schedule efficiency is {:.0}%; consider drip irrigation where feasible",
                efficiency
            ));
        }

        for event in events {
            if day_for(forecast, event.date).is_some_and(|d| d.rainfall_mm > 10.0) {
                recs.push(format!(
                    "Rain is forecast on {}; skip or shorten that irrigation",
                    event.date
                ));
            }
        }

        recs
    }
}

fn at_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Early starts on hot or windy days limit evaporation and drift; cool days
/// start later.
fn start_time(forecast: Option<&WeatherDay>) -> NaiveTime {
    match forecast {
        Some(day) if day.temperature.max > 35.0 => at_hour(4),
        Some(day) if day.temperature.max > 30.0 || day.wind_kmh > 20.0 => at_hour(5),
        Some(day) if day.temperature.max < 15.0 => at_hour(7),
        _ => at_hour(6),
    }
}

/// Seasonal water demand by month (northern hemisphere calendar)
fn seasonal_multiplier(month: u32) -> f64 {
    match month {
        4..=6 => 1.3,
        9..=11 => 1.1,
        12 | 1 | 2 => 0.8,
        _ => 1.0,
    }
}

/// Mean method efficiency scaled to 0-100, with bonuses for early-morning
/// starts and penalties for watering on rainy days.
pub fn efficiency_score(events: &[IrrigationEvent], forecast: &[WeatherDay]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }

    let mean_efficiency =
        events.iter().map(|e| e.method.efficiency()).sum::<f64>() / events.len() as f64;
    let mut score = mean_efficiency * 100.0;

    for event in events {
        if (at_hour(4)..=at_hour(7)).contains(&event.start_time) {
            score += 2.0;
        }

        let rainfall = day_for(forecast, event.date)
            .map(|d| d.rainfall_mm)
            .unwrap_or(0.0);
        if rainfall > 10.0 {
            score -= 5.0;
        } else if rainfall > 0.0 {
            score -= 2.0;
        }
    }

    score.clamp(0.0, 100.0)
}
