//! Application configuration.
//!
//! Settings persist in the platform config directory via `confy`.

use cube_gesture::ControllerConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

const CONFIG_NAME: &str = "leap_cube";

pub const MAX_SCRAMBLE_LENGTH: usize = 200;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version:         u32,
    pub controller:      ControllerConfig,
    /// Moves per scramble.
    pub scramble_length: usize,
    /// Fixed seed for reproducible scrambles; random when absent.
    pub scramble_seed:   Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version:         1,
            controller:      ControllerConfig::default(),
            scramble_length: 20,
            scramble_seed:   None,
        }
    }
}

impl AppConfig {
    /// Pull out-of-range values back to something usable.
    pub fn validated(mut self) -> Self {
        self.scramble_length = self.scramble_length.clamp(1, MAX_SCRAMBLE_LENGTH);
        self.controller = self.controller.validated();
        self
    }
}

pub fn load_config() -> AppConfig {
    match confy::load::<AppConfig>(CONFIG_NAME, None) {
        Ok(cfg) => cfg.validated(),
        Err(e)  => {
            warn!("could not load config, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
