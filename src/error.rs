use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Prediction failed ({predictor}): {reason}")]
    PredictionFailed {
        predictor: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, AgroError>;
