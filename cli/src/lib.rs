use contours::{FinderConfig, Pipeline, PipelineBuilder};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Smoothing applied to each frame before thresholding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlurConfig {
    Gaussian { sigma: f32 },
    Box { radius: u32 },
}

/// Everything a tracking run needs besides its input
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub finder: FinderConfig,
    pub blur: Option<BlurConfig>,
}

impl SessionConfig {
    pub fn pipeline(&self) -> Pipeline {
        let builder = PipelineBuilder::new().with_config(self.finder.clone());
        let builder = match self.blur {
            Some(BlurConfig::Gaussian { sigma }) => builder.with_gaussian_blur(sigma),
            Some(BlurConfig::Box { radius }) => builder.with_box_blur(radius),
            None => builder,
        };
        builder.build()
    }

    /// Load SessionConfig configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load SessionConfig configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Load from `path`, or fall back to the defaults when none is given
    pub fn from_optional_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contours::{AreaBound, ContourMode};

    #[test]
    fn test_from_toml() {
        let config = SessionConfig::from_toml(
            r#"
            [finder]
            threshold = 90
            invert = true
            mode = "list"
            sort_by_size = true
            min_area = { unit = "radius", value = 10.0 }
            max_area = { unit = "normalized", value = 0.5 }

            [blur]
            kind = "gaussian"
            sigma = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.finder.threshold, 90);
        assert!(config.finder.invert);
        assert_eq!(config.finder.mode, ContourMode::List);
        assert!(config.finder.sort_by_size);
        assert_eq!(config.finder.min_area, Some(AreaBound::Radius(10.0)));
        assert_eq!(config.finder.max_area, Some(AreaBound::Normalized(0.5)));
        assert_eq!(config.blur, Some(BlurConfig::Gaussian { sigma: 2.0 }));
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = SessionConfig::from_json(r#"{ "blur": { "kind": "box", "radius": 3 } }"#).unwrap();
        assert_eq!(config.finder, FinderConfig::default());
        assert_eq!(config.blur, Some(BlurConfig::Box { radius: 3 }));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            finder: FinderConfig::default().with_threshold(42),
            blur: Some(BlurConfig::Box { radius: 2 }),
        };

        let toml_path = dir.path().join("session.toml");
        fs::write(&toml_path, config.to_toml().unwrap()).unwrap();
        assert_eq!(SessionConfig::from_file(&toml_path).unwrap(), config);

        let json_path = dir.path().join("session.json");
        fs::write(&json_path, config.to_json().unwrap()).unwrap();
        assert_eq!(SessionConfig::from_file(&json_path).unwrap(), config);

        let yaml_path = dir.path().join("session.yaml");
        fs::write(&yaml_path, "finder: {}").unwrap();
        assert!(matches!(
            SessionConfig::from_file(&yaml_path),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_pipeline_from_config() {
        let config = SessionConfig {
            finder: FinderConfig::default().with_threshold(7),
            blur: Some(BlurConfig::Gaussian { sigma: 1.0 }),
        };
        let pipeline = config.pipeline();
        assert_eq!(pipeline.config().threshold, 7);
        assert!(pipeline.info().starts_with("Pipeline: 1 preprocessors"));
        assert!(SessionConfig::from_optional_file(None::<&Path>).unwrap().blur.is_none());
    }
}
