use serde::{Deserialize, Serialize};

/// Base yield used when a crop is not in the reference table
pub const DEFAULT_BASE_YIELD_KG_PER_HA: f64 = 3000.0;

/// Per-event irrigation volume used when a crop is not in the reference table
pub const DEFAULT_IRRIGATION_BASE_LITERS: f64 = 1000.0;

/// Crops with agronomic reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    Wheat,
    Rice,
    Maize,
    Cotton,
    Sugarcane,
    Soybean,
    Potato,
    Tomato,
}

impl Crop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Wheat => "Wheat",
            Crop::Rice => "Rice",
            Crop::Maize => "Maize",
            Crop::Cotton => "Cotton",
            Crop::Sugarcane => "Sugarcane",
            Crop::Soybean => "Soybean",
            Crop::Potato => "Potato",
            Crop::Tomato => "Tomato",
        }
    }

    /// Normalize a free-form crop name. Unknown crops return `None` and
    /// callers fall back to default reference values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "wheat" => Some(Crop::Wheat),
            "rice" | "paddy" => Some(Crop::Rice),
            "maize" | "corn" => Some(Crop::Maize),
            "cotton" => Some(Crop::Cotton),
            "sugarcane" | "sugar cane" => Some(Crop::Sugarcane),
            "soybean" | "soybeans" | "soya" | "soy" => Some(Crop::Soybean),
            "potato" | "potatoes" => Some(Crop::Potato),
            "tomato" | "tomatoes" => Some(Crop::Tomato),
            _ => None,
        }
    }

    pub fn all() -> &'static [Crop] {
        &[
            Crop::Wheat,
            Crop::Rice,
            Crop::Maize,
            Crop::Cotton,
            Crop::Sugarcane,
            Crop::Soybean,
            Crop::Potato,
            Crop::Tomato,
        ]
    }

    pub fn base_yield_kg_per_ha(&self) -> f64 {
        match self {
            Crop::Wheat => 3500.0,
            Crop::Rice => 4500.0,
            Crop::Maize => 5500.0,
            Crop::Cotton => 1800.0,
            Crop::Sugarcane => 70000.0,
            Crop::Soybean => 2800.0,
            Crop::Potato => 22000.0,
            Crop::Tomato => 25000.0,
        }
    }

    /// Liters applied per irrigation event before soil and season adjustments
    pub fn irrigation_base_liters(&self) -> f64 {
        match self {
            Crop::Wheat => 800.0,
            Crop::Rice => 1500.0,
            Crop::Maize => 1000.0,
            Crop::Cotton => 900.0,
            Crop::Sugarcane => 1400.0,
            Crop::Soybean => 700.0,
            Crop::Potato => 850.0,
            Crop::Tomato => 750.0,
        }
    }

    pub fn yield_tips(&self) -> &'static [&'static str] {
        match self {
            Crop::Wheat => &[
                "Split nitrogen: apply at sowing and again at crown root initiation (20-25 days)",
                "Irrigate at crown root initiation, tillering, flowering and grain filling",
            ],
            Crop::Rice => &[
                "Maintain 2-5 cm standing water during tillering and flowering",
                "Drain the field 10-15 days before harvest to improve grain quality",
            ],
            Crop::Maize => &[
                "Side-dress nitrogen at knee-high stage (V6-V8)",
                "Keep soil moist during tasseling and silking",
            ],
            Crop::Cotton => &[
                "Avoid excess nitrogen after flowering to limit vegetative growth",
                "Monitor square and boll retention weekly",
            ],
            Crop::Sugarcane => &[
                "Earth up at 90-120 days to prevent lodging",
                "Apply potash in split doses to improve sucrose content",
            ],
            Crop::Soybean => &[
                "Inoculate seed with Rhizobium before sowing",
                "Avoid waterlogging during pod formation",
            ],
            Crop::Potato => &[
                "Earth up 25-30 days after planting to protect tubers",
                "Stop irrigation 10 days before haulm cutting",
            ],
            Crop::Tomato => &[
                "Stake plants to keep fruit off the ground",
                "Apply calcium to prevent blossom end rot",
            ],
        }
    }

    pub fn pest_tips(&self) -> &'static [&'static str] {
        match self {
            Crop::Wheat => &["Inspect flag leaves and ears for aphid colonies during heading"],
            Crop::Rice => &[
                "Avoid excessive nitrogen, which favors planthopper build-up",
                "Inspect the base of tillers for planthoppers",
            ],
            Crop::Maize => &["Check whorls for fall armyworm frass and window-pane feeding"],
            Crop::Cotton => &["Install pheromone traps for pink bollworm at 5 per hectare"],
            Crop::Sugarcane => &["Remove and destroy dead hearts caused by shoot borer"],
            Crop::Soybean => &["Remove plants showing girdle beetle damage"],
            Crop::Potato => &["Store seed tubers in cool, clean stores to limit tuber moth"],
            Crop::Tomato => &["Use yellow sticky traps to monitor whitefly"],
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base yield for a crop name, falling back to the default for unknown crops
pub fn base_yield_for(crop: Option<Crop>) -> f64 {
    crop.map(|c| c.base_yield_kg_per_ha())
        .unwrap_or(DEFAULT_BASE_YIELD_KG_PER_HA)
}
