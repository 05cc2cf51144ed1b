use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Positive => "Positive",
            Impact::Negative => "Negative",
            Impact::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explainability record attached to every prediction.
///
/// `weight` is always within [0, 1]. For multiplicative adjustments the
/// weight is the distance of the multiplier from 1, so the multiplier can be
/// recovered with [`Factor::implied_multiplier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: Impact,
    pub weight: f64,
    pub description: String,
}

impl Factor {
    pub fn new(
        name: impl Into<String>,
        impact: Impact,
        weight: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            impact,
            weight: weight.clamp(0.0, 1.0),
            description: description.into(),
        }
    }

    /// Build a factor from a multiplier applied to a running adjustment
    pub fn from_multiplier(
        name: impl Into<String>,
        multiplier: f64,
        description: impl Into<String>,
    ) -> Self {
        let impact = if multiplier > 1.0 {
            Impact::Positive
        } else if multiplier < 1.0 {
            Impact::Negative
        } else {
            Impact::Neutral
        };
        Self::new(name, impact, (multiplier - 1.0).abs(), description)
    }

    pub fn implied_multiplier(&self) -> f64 {
        match self.impact {
            Impact::Positive => 1.0 + self.weight,
            Impact::Negative => 1.0 - self.weight,
            Impact::Neutral => 1.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.impact == Impact::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.impact == Impact::Negative
    }
}
