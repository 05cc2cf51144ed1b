pub mod calculations;
pub mod predictors;

pub use predictors::{AnalyticsEngine, FieldReport, FieldRequest, Predictor};
