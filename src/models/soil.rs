use super::irrigation::IrrigationMethod;
use serde::{Deserialize, Serialize};

/// Laboratory soil test for a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub ph: f64,
    pub moisture_pct: f64,
    pub organic_matter_pct: f64,
    pub nitrogen_ppm: f64,
    pub phosphorus_ppm: f64,
    pub potassium_ppm: f64,
}

impl SoilSample {
    pub fn is_finite(&self) -> bool {
        [
            self.ph,
            self.moisture_pct,
            self.organic_matter_pct,
            self.nitrogen_ppm,
            self.phosphorus_ppm,
            self.potassium_ppm,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilType {
    Clay,
    Sandy,
    Loamy,
    Silty,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Silty => "Silty",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clay" | "clay loam" | "clayloam" | "black" | "black cotton" => Some(SoilType::Clay),
            "sandy" | "sand" | "sandy loam" | "sandyloam" => Some(SoilType::Sandy),
            "loamy" | "loam" | "alluvial" => Some(SoilType::Loamy),
            "silty" | "silt" | "silt loam" | "siltloam" => Some(SoilType::Silty),
            _ => None,
        }
    }

    /// Water requirement scaling relative to loam
    pub fn water_multiplier(&self) -> f64 {
        match self {
            SoilType::Clay => 0.8,
            SoilType::Sandy => 1.4,
            SoilType::Loamy => 1.0,
            SoilType::Silty => 0.9,
        }
    }

    /// Run-time scaling; clay infiltrates slowly, sand drains fast
    pub fn duration_multiplier(&self) -> f64 {
        match self {
            SoilType::Clay => 1.2,
            SoilType::Sandy => 0.8,
            SoilType::Loamy => 1.0,
            SoilType::Silty => 1.1,
        }
    }

    pub fn default_method(&self) -> IrrigationMethod {
        match self {
            SoilType::Clay => IrrigationMethod::Furrow,
            SoilType::Sandy | SoilType::Loamy => IrrigationMethod::Drip,
            SoilType::Silty => IrrigationMethod::Sprinkler,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
