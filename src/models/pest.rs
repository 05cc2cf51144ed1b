use super::crop::Crop;
use super::factor::Factor;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed numeric range of favorable conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when `value` lies within `margin` of either end of the band
    pub fn within_margin(&self, value: f64, margin: f64) -> bool {
        value >= self.min - margin && value <= self.max + margin
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Environmental envelope in which a pest thrives
#[derive(Debug, Clone, Serialize)]
pub struct PestProfile {
    pub pest_name: &'static str,
    /// Daily average temperature, °C
    pub optimal_temperature: Band,
    /// Relative humidity, %
    pub optimal_humidity: Band,
    /// Daily rainfall, mm
    pub optimal_rainfall: Band,
    pub crops_susceptible: &'static [Crop],
    pub control_measure: &'static str,
}

impl PestProfile {
    pub fn is_susceptible(&self, crop: Option<Crop>) -> bool {
        crop.map(|c| self.crops_susceptible.contains(&c))
            .unwrap_or(false)
    }
}

static PEST_PROFILES: &[PestProfile] = &[
    PestProfile {
        pest_name: "Aphids",
        optimal_temperature: Band::new(15.0, 25.0),
        optimal_humidity: Band::new(60.0, 80.0),
        optimal_rainfall: Band::new(0.0, 3.0),
        crops_susceptible: &[Crop::Wheat, Crop::Cotton, Crop::Potato, Crop::Soybean],
        control_measure: "Spray neem oil (1500 ppm) or release ladybird beetles",
    },
    PestProfile {
        pest_name: "Armyworm",
        optimal_temperature: Band::new(20.0, 30.0),
        optimal_humidity: Band::new(60.0, 85.0),
        optimal_rainfall: Band::new(2.0, 10.0),
        crops_susceptible: &[Crop::Wheat, Crop::Rice],
        control_measure: "Hand-pick larvae at dusk and apply Bacillus thuringiensis",
    },
    PestProfile {
        pest_name: "Termites",
        optimal_temperature: Band::new(25.0, 35.0),
        optimal_humidity: Band::new(30.0, 60.0),
        optimal_rainfall: Band::new(0.0, 2.0),
        crops_susceptible: &[Crop::Sugarcane, Crop::Maize],
        control_measure: "Irrigate lightly and treat soil around affected rows",
    },
    PestProfile {
        pest_name: "Brown Planthopper",
        optimal_temperature: Band::new(25.0, 30.0),
        optimal_humidity: Band::new(80.0, 95.0),
        optimal_rainfall: Band::new(5.0, 20.0),
        crops_susceptible: &[Crop::Rice],
        control_measure: "Drain the field for 3-4 days and avoid excess nitrogen",
    },
    PestProfile {
        pest_name: "Stem Borer",
        optimal_temperature: Band::new(22.0, 32.0),
        optimal_humidity: Band::new(70.0, 90.0),
        optimal_rainfall: Band::new(3.0, 15.0),
        crops_susceptible: &[Crop::Rice, Crop::Maize, Crop::Sugarcane],
        control_measure: "Release Trichogramma egg parasitoids and remove dead hearts",
    },
    PestProfile {
        pest_name: "Leaf Folder",
        optimal_temperature: Band::new(25.0, 29.0),
        optimal_humidity: Band::new(75.0, 90.0),
        optimal_rainfall: Band::new(2.0, 12.0),
        crops_susceptible: &[Crop::Rice],
        control_measure: "Run a rope across the canopy to dislodge larvae",
    },
    PestProfile {
        pest_name: "Fall Armyworm",
        optimal_temperature: Band::new(22.0, 32.0),
        optimal_humidity: Band::new(60.0, 85.0),
        optimal_rainfall: Band::new(0.0, 10.0),
        crops_susceptible: &[Crop::Maize, Crop::Sugarcane],
        control_measure: "Apply sand and lime into whorls or spray spinetoram",
    },
    PestProfile {
        pest_name: "Pink Bollworm",
        optimal_temperature: Band::new(20.0, 32.0),
        optimal_humidity: Band::new(50.0, 80.0),
        optimal_rainfall: Band::new(0.0, 5.0),
        crops_susceptible: &[Crop::Cotton],
        control_measure: "Use pheromone mating disruption and destroy rosette flowers",
    },
    PestProfile {
        pest_name: "Whitefly",
        optimal_temperature: Band::new(25.0, 33.0),
        optimal_humidity: Band::new(50.0, 75.0),
        optimal_rainfall: Band::new(0.0, 4.0),
        crops_susceptible: &[Crop::Cotton, Crop::Tomato, Crop::Soybean],
        control_measure: "Install yellow sticky traps and spray neem seed kernel extract",
    },
    PestProfile {
        pest_name: "Early Shoot Borer",
        optimal_temperature: Band::new(28.0, 35.0),
        optimal_humidity: Band::new(40.0, 70.0),
        optimal_rainfall: Band::new(0.0, 5.0),
        crops_susceptible: &[Crop::Sugarcane],
        control_measure: "Apply trash mulch and irrigate frequently during tillering",
    },
    PestProfile {
        pest_name: "Girdle Beetle",
        optimal_temperature: Band::new(24.0, 30.0),
        optimal_humidity: Band::new(70.0, 90.0),
        optimal_rainfall: Band::new(3.0, 15.0),
        crops_susceptible: &[Crop::Soybean],
        control_measure: "Remove and burn girdled plant parts",
    },
    PestProfile {
        pest_name: "Potato Tuber Moth",
        optimal_temperature: Band::new(20.0, 30.0),
        optimal_humidity: Band::new(40.0, 70.0),
        optimal_rainfall: Band::new(0.0, 3.0),
        crops_susceptible: &[Crop::Potato, Crop::Tomato],
        control_measure: "Earth up to cover exposed tubers and use pheromone traps",
    },
    PestProfile {
        pest_name: "Fruit Borer",
        optimal_temperature: Band::new(22.0, 30.0),
        optimal_humidity: Band::new(50.0, 80.0),
        optimal_rainfall: Band::new(0.0, 5.0),
        crops_susceptible: &[Crop::Tomato, Crop::Cotton],
        control_measure: "Plant marigold trap crops and collect damaged fruit",
    },
];

/// Wide-tolerance profile used for crops without specific entries
pub static GENERAL_PESTS: PestProfile = PestProfile {
    pest_name: "General Pests",
    optimal_temperature: Band::new(15.0, 35.0),
    optimal_humidity: Band::new(40.0, 90.0),
    optimal_rainfall: Band::new(0.0, 20.0),
    crops_susceptible: &[],
    control_measure: "Follow integrated pest management and scout regularly",
};

/// Pests tracked for each crop. A pest may appear for a crop that is a
/// secondary host and not in the pest's susceptibility list.
fn pest_names_for(crop: Crop) -> &'static [&'static str] {
    match crop {
        Crop::Wheat => &["Aphids", "Armyworm", "Termites"],
        Crop::Rice => &["Brown Planthopper", "Stem Borer", "Leaf Folder"],
        Crop::Maize => &["Fall Armyworm", "Stem Borer", "Aphids"],
        Crop::Cotton => &["Pink Bollworm", "Whitefly", "Aphids"],
        Crop::Sugarcane => &["Early Shoot Borer", "Termites"],
        Crop::Soybean => &["Girdle Beetle", "Whitefly"],
        Crop::Potato => &["Potato Tuber Moth", "Aphids"],
        Crop::Tomato => &["Fruit Borer", "Whitefly", "Potato Tuber Moth"],
    }
}

pub fn find_profile(pest_name: &str) -> Option<&'static PestProfile> {
    PEST_PROFILES
        .iter()
        .find(|p| p.pest_name.eq_ignore_ascii_case(pest_name.trim()))
}

/// Candidate pests for a crop, or the general profile when none are known
pub fn profiles_for(crop: Option<Crop>) -> Vec<&'static PestProfile> {
    let profiles: Vec<&'static PestProfile> = crop
        .map(|c| {
            pest_names_for(c)
                .iter()
                .filter_map(|name| find_profile(name))
                .collect()
        })
        .unwrap_or_default();

    if profiles.is_empty() {
        vec![&GENERAL_PESTS]
    } else {
        profiles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PestSeverity {
    Low,
    Moderate,
    High,
    Severe,
}

impl PestSeverity {
    pub fn from_probability(probability_pct: f64) -> Self {
        if probability_pct > 85.0 {
            PestSeverity::Severe
        } else if probability_pct > 70.0 {
            PestSeverity::High
        } else if probability_pct > 50.0 {
            PestSeverity::Moderate
        } else {
            PestSeverity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PestSeverity::Low => "Low",
            PestSeverity::Moderate => "Moderate",
            PestSeverity::High => "High",
            PestSeverity::Severe => "Severe",
        }
    }

}

impl std::fmt::Display for PestSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A past infestation observed on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestHistoryRecord {
    pub pest_name: String,
    pub date: NaiveDate,
    pub severity: PestSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestOutbreakForecast {
    pub pest_name: String,
    pub predicted_date: NaiveDate,
    pub probability_pct: f64,
    pub severity: PestSeverity,
    /// Factor weights are percentage points / 100, so their sum x100 is the
    /// probability before clamping to 100
    pub factors: Vec<Factor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringTask {
    pub activity: String,
    pub frequency: String,
    /// Set for tasks tied to a specific forecast day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl MonitoringTask {
    pub fn recurring(activity: impl Into<String>, frequency: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            frequency: frequency.into(),
            date: None,
        }
    }

    pub fn on(date: NaiveDate, activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            frequency: "Once".to_string(),
            date: Some(date),
        }
    }
}

/// Field-level pest outlook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestRiskReport {
    pub crop: String,
    pub as_of: NaiveDate,
    pub risk_level: PestSeverity,
    pub forecasts: Vec<PestOutbreakForecast>,
    pub recommendations: Vec<String>,
    pub monitoring_schedule: Vec<MonitoringTask>,
}

impl PestRiskReport {
    pub fn forecast_for(&self, pest_name: &str) -> Option<&PestOutbreakForecast> {
        self.forecasts
            .iter()
            .find(|f| f.pest_name.eq_ignore_ascii_case(pest_name))
    }

    pub fn max_probability(&self) -> f64 {
        self.forecasts
            .iter()
            .map(|f| f.probability_pct)
            .fold(0.0, f64::max)
    }
}
