pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{AgroError, Result};
pub use logic::AnalyticsEngine;
