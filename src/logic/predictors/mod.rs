pub mod engine;
pub mod irrigation;
pub mod pest_outbreak;
pub mod yield_estimate;

pub use engine::{AnalyticsEngine, FieldReport, FieldRequest};
pub use irrigation::IrrigationScheduler;
pub use pest_outbreak::PestOutbreakPredictor;
pub use yield_estimate::YieldPredictor;

use crate::error::Result;
use chrono::NaiveDate;

/// Trait for agronomic predictors
///
/// Predictors are pure: the same request and as-of date always produce the
/// same output, and no state survives between calls.
pub trait Predictor: Send + Sync {
    type Request;
    type Output;

    /// Unique identifier for this predictor
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Run the prediction as of the given date
    fn predict(&self, request: &Self::Request, as_of: NaiveDate) -> Result<Self::Output>;
}
