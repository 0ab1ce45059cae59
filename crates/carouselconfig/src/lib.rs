use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettleCurveSetting {
    Linear,
    Smoothstep,
    #[default]
    EaseInOut,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CarouselConfig {
    pub version: u32,
    pub images: Vec<PathBuf>,
    pub transitions: Vec<String>,
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub gesture: GestureSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ViewportSettings {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GestureSettings {
    #[serde(
        default = "default_settle_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub settle_duration: Duration,
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f32,
    #[serde(default = "default_snap_deceleration")]
    pub snap_deceleration: f32,
    #[serde(default)]
    pub settle_curve: SettleCurveSetting,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            settle_duration: default_settle_duration(),
            activation_threshold: default_activation_threshold(),
            snap_deceleration: default_snap_deceleration(),
            settle_curve: SettleCurveSetting::default(),
        }
    }
}

fn default_settle_duration() -> Duration {
    Duration::from_millis(100)
}

fn default_activation_threshold() -> f32 {
    5.0
}

fn default_snap_deceleration() -> f32 {
    0.2
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be finite and non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl CarouselConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: CarouselConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads `path` and resolves relative image paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&input)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        for image in &mut self.images {
            if image.is_relative() {
                *image = base.join(&*image);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.images.is_empty() {
            return Err(ConfigError::Invalid(
                "config must list at least one image".into(),
            ));
        }

        if self.images.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("images may not contain empty paths".into()));
        }

        if self.transitions.is_empty() {
            return Err(ConfigError::Invalid(
                "config must list at least one transition".into(),
            ));
        }

        if let Some(index) = self.transitions.iter().position(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "transition #{index} has an empty name"
            )));
        }

        let ViewportSettings { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport {width}x{height} must have positive dimensions"
            )));
        }

        let gesture = &self.gesture;
        if !gesture.activation_threshold.is_finite() || gesture.activation_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "gesture.activation_threshold must be >= 0".into(),
            ));
        }

        if !gesture.snap_deceleration.is_finite() || gesture.snap_deceleration < 0.0 {
            return Err(ConfigError::Invalid(
                "gesture.snap_deceleration must be finite and >= 0".into(),
            ));
        }

        Ok(())
    }
}
