use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrigationMethod {
    Drip,
    Sprinkler,
    Flood,
    Furrow,
}

impl IrrigationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "Drip",
            IrrigationMethod::Sprinkler => "Sprinkler",
            IrrigationMethod::Flood => "Flood",
            IrrigationMethod::Furrow => "Furrow",
        }
    }

    /// Fraction of applied water that reaches the root zone
    pub fn efficiency(&self) -> f64 {
        match self {
            IrrigationMethod::Drip => 0.95,
            IrrigationMethod::Sprinkler => 0.85,
            IrrigationMethod::Flood => 0.65,
            IrrigationMethod::Furrow => 0.70,
        }
    }
}

impl std::fmt::Display for IrrigationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
}

impl Intensity {
    pub fn from_weather_factor(weather_factor: f64) -> Self {
        if weather_factor > 1.3 {
            Intensity::Heavy
        } else if weather_factor < 0.8 {
            Intensity::Light
        } else {
            Intensity::Moderate
        }
    }

    pub fn duration_multiplier(&self) -> f64 {
        match self {
            Intensity::Light => 0.8,
            Intensity::Moderate => 1.0,
            Intensity::Heavy => 1.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "Light",
            Intensity::Moderate => "Moderate",
            Intensity::Heavy => "Heavy",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEvent {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub water_liters: f64,
    pub method: IrrigationMethod,
    pub priority: Priority,
    pub intensity: Intensity,
}

/// Trace of one simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationDecision {
    pub date: NaiveDate,
    pub days_since_planting: i64,
    pub growth_stage_factor: f64,
    pub weather_factor: f64,
    pub interval_days: i64,
    pub irrigate: bool,
    pub intensity: Intensity,
    /// Carried-in stress exceeded the override threshold
    pub stress_override: bool,
    /// Stress contributed by this day's conditions
    pub day_stress: f64,
    /// Accumulated stress carried into the next day
    pub cumulative_stress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationPlan {
    pub crop: String,
    pub as_of: NaiveDate,
    pub events: Vec<IrrigationEvent>,
    pub water_requirement_liters: f64,
    pub efficiency_score: f64,
    pub decisions: Vec<IrrigationDecision>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_thresholds() {
        assert_eq!(Intensity::from_weather_factor(1.31), Intensity::Heavy);
        assert_eq!(Intensity::from_weather_factor(1.3), Intensity::Moderate);
        assert_eq!(Intensity::from_weather_factor(0.8), Intensity::Moderate);
        assert_eq!(Intensity::from_weather_factor(0.79), Intensity::Light);
    }

    #[test]
    fn method_efficiencies() {
        assert_eq!(IrrigationMethod::Drip.efficiency(), 0.95);
        assert_eq!(IrrigationMethod::Sprinkler.efficiency(), 0.85);
        assert_eq!(IrrigationMethod::Flood.efficiency(), 0.65);
        assert_eq!(IrrigationMethod::Furrow.efficiency(), 0.70);
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
