//! Engine configuration.
//!
//! Resolved once before a session starts and passed in; the engine never
//! reads the environment while a run is in progress. Sources, lowest
//! priority first: defaults, a TOML file, `EMTSIM_*` environment variables,
//! then whatever the driver sets explicitly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENV_PACING: &str = "EMTSIM_PACING";
pub const ENV_INPUT_POLICY: &str = "EMTSIM_INPUT_POLICY";
pub const ENV_HALT_ON_DEATH: &str = "EMTSIM_HALT_ON_DEATH";
pub const ENV_HALT_ON_PLACEHOLDER: &str = "EMTSIM_HALT_ON_PLACEHOLDER";

/// Upper bound on `pace_scale`; a 400 ms header stays under a minute.
pub const MAX_PACE_SCALE: f64 = 100.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// How the session treats an answer that is not among the offered options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputPolicy {
    /// Reject the answer and keep the request pending.
    #[default]
    Strict,
    /// Forward any token; steps fall through to their else-branch.
    PassThrough,
}

impl std::str::FromStr for InputPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(InputPolicy::Strict),
            "pass-through" | "passthrough" | "pass_through" => Ok(InputPolicy::PassThrough),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_INPUT_POLICY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Which step outcomes stop the sequence. With both off the run
/// continues after a death or an unbuilt branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HaltPolicy {
    pub on_death: bool,
    pub on_placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Honor narration delay hints.
    pub pacing: bool,
    /// Multiplier applied to delay hints when pacing.
    pub pace_scale: f64,
    pub input_policy: InputPolicy,
    pub halt: HaltPolicy,
    /// Buffer size of the narration broadcast channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing: true,
            pace_scale: 1.0,
            input_policy: InputPolicy::Strict,
            halt: HaltPolicy::default(),
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Defaults with pacing disabled; what tests and scripted drivers want.
    pub fn instant() -> Self {
        Self {
            pacing: false,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply `EMTSIM_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(std::env::vars())
    }

    /// Apply `EMTSIM_*` overrides from an explicit set of variables.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_PACING => self.pacing = parse_flag(key, value)?,
                ENV_INPUT_POLICY => self.input_policy = value.parse()?,
                ENV_HALT_ON_DEATH => self.halt.on_death = parse_flag(key, value)?,
                ENV_HALT_ON_PLACEHOLDER => self.halt.on_placeholder = parse_flag(key, value)?,
                _ => {}
            }
        }
        self.validated()
    }

    /// Check value ranges. Every constructor that reads external input
    /// calls this; [`crate::Session::new`] calls it for hand-built configs.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=MAX_PACE_SCALE).contains(&self.pace_scale) {
            return Err(ConfigError::InvalidValue {
                key: "pace_scale".to_string(),
                value: self.pace_scale.to_string(),
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event_capacity".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self)
    }

    /// Effective wait for a narration delay hint.
    pub fn pace(&self, hint: Duration) -> Option<Duration> {
        if !self.pacing || hint.is_zero() {
            return None;
        }
        Duration::try_from_secs_f64(hint.as_secs_f64() * self.pace_scale)
            .ok()
            .filter(|d| !d.is_zero())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
