use super::factor::Factor;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Harvest estimate for a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldEstimate {
    pub crop: String,
    pub as_of: NaiveDate,
    pub predicted_yield_kg: f64,
    pub range_min_kg: f64,
    pub range_max_kg: f64,
    pub confidence_pct: u8,
    pub base_yield_kg_per_ha: f64,
    /// Product of every factor's implied multiplier
    pub yield_adjustment: f64,
    pub growth_stage_factor: f64,
    pub days_since_planting: i64,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
}

impl YieldEstimate {
    pub fn positive_factor_count(&self) -> usize {
        self.factors.iter().filter(|f| f.is_positive()).count()
    }

    pub fn negative_factor_count(&self) -> usize {
        self.factors.iter().filter(|f| f.is_negative()).count()
    }

    /// Re-derive the adjustment from the factor list
    pub fn adjustment_from_factors(&self) -> f64 {
        self.factors
            .iter()
            .map(|f| f.implied_multiplier())
            .product()
    }

    pub fn factor(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name == name)
    }
}
