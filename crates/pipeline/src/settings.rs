//! Pipeline settings

use crate::PipelineError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use rgb_producer::ProducerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Prefix for environment overrides, e.g. `RGB_PIPELINE__TICK_PERIOD_MS=8`
pub const ENV_PREFIX: &str = "RGB_PIPELINE";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tick period in milliseconds; sets calibration granularity
    pub tick_period_ms: u64,

    /// Starting cadence. Once a stable value has been observed it can be
    /// pinned here to skip the warm-up calibration.
    pub initial_ticks_per_attempt: u32,

    /// Extra ticks added to every cadence
    pub manual_slowdown: u32,

    /// Upper bound of the per-item producer pause, in delay units
    pub max_delay_units: u32,

    /// Length of one delay unit in milliseconds
    pub delay_unit_ms: u64,

    /// Seed for the producer pause generator
    pub seed: Option<u64>,

    /// Transmit a line for every produced triple
    pub trace_produced: bool,

    /// Read slowdown commands from stdin
    pub stdin_control: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 4,
            initial_ticks_per_attempt: 1,
            manual_slowdown: 0,
            max_delay_units: 15,
            delay_unit_ms: 1,
            seed: None,
            trace_produced: false,
            stdin_control: true,
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load from an optional file, overridden by `RGB_PIPELINE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    /// Build, deserialize and validate
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, PipelineError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.tick_period_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "tick_period_ms must be at least 1".to_string(),
            ));
        }
        if self.initial_ticks_per_attempt == 0 {
            return Err(PipelineError::InvalidConfig(
                "initial_ticks_per_attempt must be at least 1".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }

    /// Tick period as a duration
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Parsed log level
    pub fn log_level(&self) -> Result<Level, PipelineError> {
        Level::from_str(&self.log_level).map_err(|_| {
            PipelineError::InvalidConfig(format!("unknown log level {:?}", self.log_level))
        })
    }

    /// Producer settings derived from this configuration
    pub fn producer_config(&self) -> ProducerConfig {
        ProducerConfig {
            max_delay_units: self.max_delay_units,
            delay_unit: Duration::from_millis(self.delay_unit_ms),
            seed: self.seed,
            trace_produced: self.trace_produced,
        }
    }
}
