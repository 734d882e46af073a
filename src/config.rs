use std::path::Path;
use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

/// Settings of a single round's countdown. The defaults are the canonical
/// game: a 60 second round, one tick per second, panic cues for the last 10.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RoundSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub total_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub tick_interval_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub panic_threshold_seconds: u64,
}

impl RoundSettings {
    pub fn from_file(path: &Path) -> Result<RoundSettings, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        settings.try_deserialize::<RoundSettings>()
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        RoundSettings {
            total_seconds: 60,
            tick_interval_seconds: 1,
            panic_threshold_seconds: 10,
        }
    }
}
