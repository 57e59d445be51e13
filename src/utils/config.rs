//! Engine configuration

use crate::error::{ForecastError, Result};
use crate::forecast::{CancelToken, DriftConfig, VerdictConfig};
use crate::indicators::IndicatorConfig;
use crate::model::ModelConfig;
use crate::preprocessing::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Every tunable of the engine. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub model: ModelConfig,
    pub drift: DriftConfig,
    pub verdict: VerdictConfig,
    pub indicators: IndicatorConfig,
    /// Per-symbol time limit for training and forecasting
    pub request_timeout_secs: Option<u64>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        self.model.validate()?;
        self.drift.validate()?;
        self.verdict.validate()?;
        self.indicators.validate()?;
        Ok(())
    }

    /// Fresh token carrying the request timeout, if any
    pub fn cancel_token(&self) -> CancelToken {
        match self.request_timeout_secs {
            Some(secs) => CancelToken::with_timeout(Duration::from_secs(secs)),
            None => CancelToken::new(),
        }
    }
}

/// Loads and validates a `.toml` or `.json` configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ForecastError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let config: EngineConfig = match ext {
        "json" => serde_json::from_str(&content)
            .map_err(|e| ForecastError::InvalidInput(format!("config parse error: {}", e)))?,
        "toml" => toml::from_str(&content)
            .map_err(|e| ForecastError::InvalidInput(format!("config parse error: {}", e)))?,
        _ => {
            return Err(ForecastError::InvalidInput(format!(
                "unsupported config format: '{}'",
                ext
            )))
        }
    };

    config.validate()?;
    Ok(config)
}

/// Writes a configuration as `.toml` or `.json`
pub fn save_config<P: AsRef<Path>>(config: &EngineConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let content = match ext {
        "json" => serde_json::to_string_pretty(config)
            .map_err(|e| ForecastError::InvalidInput(e.to_string()))?,
        "toml" => toml::to_string_pretty(config)
            .map_err(|e| ForecastError::InvalidInput(e.to_string()))?,
        _ => {
            return Err(ForecastError::InvalidInput(format!(
                "unsupported config format: '{}'",
                ext
            )))
        }
    };

    std::fs::write(path, content)
        .map_err(|e| ForecastError::InvalidInput(format!("cannot write {}: {}", path.display(), e)))
}
