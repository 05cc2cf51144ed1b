use crate::error::{AgroError, Result};
use crate::logic::FieldRequest;
use crate::models::{Crop, Location, SoilSample, SoilType};
use chrono::NaiveDate;
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub farm: FarmConfig,
    /// Default soil sample used when no `--soil` file is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<SoilSample>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FarmConfig {
    pub name: String,
    pub crop: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area_hectares: f64,
    pub planting_date: NaiveDate,
    pub soil_type: Option<String>,
}

impl FarmConfig {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn soil_type(&self) -> Option<SoilType> {
        self.soil_type.as_deref().and_then(SoilType::from_str)
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AgroError::Config(format!(
                "Config file not found at {:?}. Run `agroforecast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgroError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml_str(&config_str)
    }

    /// Parse a config document, substituting `${VAR}` references first
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Default path for writing new config files (~/.config/agroforecast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroError::Config("Cannot determine config directory".into()))?
            .join("agroforecast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Field inputs derived from the farm profile; weather and history are
    /// left empty for the caller to fill in.
    pub fn field_request(&self) -> FieldRequest {
        let mut field = FieldRequest::new(
            self.farm.crop.clone(),
            self.farm.area_hectares,
            self.farm.planting_date,
        );
        field.location = Some(self.farm.location());
        field.soil_type = self.farm.soil_type();
        field.soil = self.soil;
        field
    }

    /// Problems that will not stop a prediction but degrade it
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if Crop::from_str(&self.farm.crop).is_none() {
            warnings.push(format!(
                "Unknown crop '{}': default yield and irrigation tables will be used",
                self.farm.crop
            ));
        }

        if let Some(soil_type) = &self.farm.soil_type {
            if SoilType::from_str(soil_type).is_none() {
                warnings.push(format!(
                    "Unknown soil type '{}': soil type adjustments will be skipped",
                    soil_type
                ));
            }
        }

        if !(-90.0..=90.0).contains(&self.farm.latitude)
            || !(-180.0..=180.0).contains(&self.farm.longitude)
        {
            warnings.push(format!(
                "Coordinates ({}, {}) are out of range",
                self.farm.latitude, self.farm.longitude
            ));
        }

        if self.soil.is_none() {
            warnings.push("No default soil sample configured".to_string());
        }

        warnings
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up AgroForecast!");
        println!();

        println!("Farm Profile");
        let name: String = Input::new()
            .with_prompt("  Farm name")
            .default("Home Farm".into())
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let crop: String = Input::new()
            .with_prompt("  Crop (Wheat, Rice, Maize, Cotton, ...)")
            .default("Wheat".into())
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(28.61)
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(77.21)
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let area_hectares: f64 = Input::new()
            .with_prompt("  Area (hectares)")
            .default(1.0)
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        let planting_date: String = Input::new()
            .with_prompt("  Planting date (YYYY-MM-DD)")
            .validate_with(|input: &String| {
                NaiveDate::parse_from_str(input, "%Y-%m-%d")
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;
        let planting_date = NaiveDate::parse_from_str(&planting_date, "%Y-%m-%d")
            .map_err(|e| AgroError::Config(format!("Invalid planting date: {}", e)))?;

        let soil_type: String = Input::new()
            .with_prompt("  Soil type (Clay, Sandy, Loamy, Silty; blank to skip)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AgroError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            farm: FarmConfig {
                name,
                crop,
                latitude,
                longitude,
                area_hectares,
                planting_date,
                soil_type: (!soil_type.is_empty()).then_some(soil_type),
            },
            soil: None,
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)?;

        let content = format!(
            "# AgroForecast Configuration\n# Generated by `agroforecast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AgroError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}
