use crate::color::{hex_to_rgb, Shade};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "COMPLEXION";

/// Top-level settings, layered as defaults -> optional file -> environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub pipeline: PipelineSettings,
    pub quality: QualitySettings,
    pub coordinator: CoordinatorSettings,
    pub catalogue: CatalogueSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub detection_timeout_ms: u64,
    pub white_balance_timeout_ms: u64,
    pub lighting_timeout_ms: u64,
    pub glcm_levels: u8,
    pub glcm_distance: u32,
    /// Seed for the mock landmark detector, so fallback output is reproducible.
    pub mock_seed: u64,
    pub apply_white_balance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    pub enforce: bool,
    pub min_dimension: u32,
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub min_sharpness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorSettings {
    pub request_buffer_size: usize,
}

/// Product shades ranked against each measured skin tone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueSettings {
    pub shades: Vec<Shade>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings::default(),
            pipeline: PipelineSettings::default(),
            quality: QualitySettings::default(),
            coordinator: CoordinatorSettings::default(),
            catalogue: CatalogueSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            detection_timeout_ms: 3_000,
            white_balance_timeout_ms: 500,
            lighting_timeout_ms: 500,
            glcm_levels: 16,
            glcm_distance: 1,
            mock_seed: 42,
            apply_white_balance: true,
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            enforce: true,
            min_dimension: 64,
            min_brightness: 40.0,
            max_brightness: 220.0,
            min_sharpness: 10.0,
        }
    }
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            request_buffer_size: 32,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, then `COMPLEXION__*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if !(2..=64).contains(&self.pipeline.glcm_levels) {
            return Err(AppError::Settings(
                "GLCM levels must be between 2 and 64".to_string(),
            ));
        }

        if self.pipeline.glcm_distance == 0 {
            return Err(AppError::Settings(
                "GLCM distance must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.detection_timeout_ms == 0 {
            return Err(AppError::Settings(
                "Detection timeout must be greater than 0".to_string(),
            ));
        }

        if self.quality.min_brightness >= self.quality.max_brightness {
            return Err(AppError::Settings(
                "Minimum brightness must be below maximum brightness".to_string(),
            ));
        }

        if self.coordinator.request_buffer_size == 0 {
            return Err(AppError::Settings(
                "Request buffer size must be greater than 0".to_string(),
            ));
        }

        for shade in &self.catalogue.shades {
            hex_to_rgb(&shade.hex).map_err(|e| {
                AppError::Settings(format!("Shade '{}' has an invalid color: {}", shade.name, e))
            })?;
        }

        Ok(())
    }

    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.pipeline.detection_timeout_ms)
    }

    pub fn white_balance_timeout(&self) -> Duration {
        Duration::from_millis(self.pipeline.white_balance_timeout_ms)
    }

    pub fn lighting_timeout(&self) -> Duration {
        Duration::from_millis(self.pipeline.lighting_timeout_ms)
    }

    /// Relaxed quality gates, handy for synthetic frames.
    pub fn lenient() -> Self {
        let mut settings = Self::default();
        settings.quality.enforce = false;
        settings.quality.min_sharpness = 0.0;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_glcm_levels() {
        let mut settings = Settings::default();
        settings.pipeline.glcm_levels = 1;
        assert!(matches!(settings.validate(), Err(AppError::Settings(_))));
    }

    #[test]
    fn rejects_inverted_brightness_range() {
        let mut settings = Settings::default();
        settings.quality.min_brightness = 230.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let settings = Settings::load(None).expect("defaults should load");
        assert_eq!(settings.pipeline.glcm_levels, 16);
        assert_eq!(settings.detection_timeout(), Duration::from_millis(3_000));
        assert!(settings.catalogue.shades.is_empty());
    }

    #[test]
    fn rejects_shades_with_bad_colors() {
        let mut settings = Settings::default();
        settings.catalogue.shades = vec![Shade::new("sand", "#d2a98a"), Shade::new("mud", "brown")];
        assert!(matches!(settings.validate(), Err(AppError::Settings(_))));
    }

    #[test]
    fn load_reads_shades_from_file() {
        let path = std::env::temp_dir().join(format!("complexion-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[[catalogue.shades]]\nname = \"sand\"\nhex = \"#d2a98a\"\n\n\
             [[catalogue.shades]]\nname = \"cocoa\"\nhex = \"#6b4530\"\n",
        )
        .unwrap();
        let settings = Settings::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(
            settings.catalogue.shades,
            vec![Shade::new("sand", "#d2a98a"), Shade::new("cocoa", "#6b4530")]
        );
    }
}
