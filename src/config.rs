// config.rs

use crate::error::{Result, TransportError};
use crate::state::{DEFAULT_TEMPO, DEFAULT_TIME_SIGNATURE};
use config::{Config, Environment, File};
use log::{debug, info};
use std::path::Path;

/// Looked up in the working directory when no explicit file is given.
pub const DEFAULT_CONFIG_NAME: &str = "transport";
pub const ENV_PREFIX: &str = "TRANSPORT";

/// Initial transport values supplied at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub running: bool,
    pub tempo: f64,
    pub beat_time: f64,
    pub time_sig_num: u16,
    pub time_sig_denom: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let (num, den) = DEFAULT_TIME_SIGNATURE;
        Self {
            running: true,
            tempo: DEFAULT_TEMPO,
            beat_time: 0.0,
            time_sig_num: num,
            time_sig_denom: den,
        }
    }
}

impl TransportConfig {
    /// Layers defaults, then the file at `path` (which must exist) or
    /// `transport.{toml,json,...}` from the working directory if present,
    /// then `TRANSPORT_*` environment variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("running", defaults.running)?
            .set_default("tempo", defaults.tempo)?
            .set_default("beat_time", defaults.beat_time)?
            .set_default("time_sig_num", i64::from(defaults.time_sig_num))?
            .set_default("time_sig_denom", i64::from(defaults.time_sig_denom))?;

        builder = match path {
            Some(path) => {
                info!("Loading transport configuration from {}", path.display());
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config = TransportConfig {
            running: settings.get_bool("running")?,
            tempo: settings.get_float("tempo")?,
            beat_time: settings.get_float("beat_time")?,
            time_sig_num: signature_part("time_sig_num", settings.get_int("time_sig_num")?)?,
            time_sig_denom: signature_part("time_sig_denom", settings.get_int("time_sig_denom")?)?,
        };
        config.validate()?;

        debug!("Resolved transport configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return Err(TransportError::InvalidArgument(format!(
                "configured tempo must be positive, got {}",
                self.tempo
            )));
        }
        if self.time_sig_num == 0 || self.time_sig_denom == 0 {
            return Err(TransportError::InvalidArgument(format!(
                "configured time signature {}/{} has a zero component",
                self.time_sig_num, self.time_sig_denom
            )));
        }
        if !self.beat_time.is_finite() {
            return Err(TransportError::InvalidArgument(format!(
                "configured beat time must be finite, got {}",
                self.beat_time
            )));
        }
        Ok(())
    }
}

fn signature_part(key: &str, value: i64) -> Result<u16> {
    u16::try_from(value).map_err(|_| {
        TransportError::InvalidArgument(format!("{} out of range: {}", key, value))
    })
}
