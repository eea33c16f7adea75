use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::{deserialize_number_from_string, deserialize_option_number_from_string};

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub application: ApplicationSettings,
    pub allow_cors: bool,
    pub quiz: QuizSettings,
    pub speech: SpeechSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct QuizSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub total_rounds: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_delay_millis: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub advance_delay_millis: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub client_inactivity_timeout_seconds: u64,
}

impl QuizSettings {
    /// Delay between entering a round and speaking its target word.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_millis)
    }

    /// Delay between an answer and the transition to the next round.
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_millis)
    }

    pub fn client_inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.client_inactivity_timeout_seconds)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SpeechSettings {
    pub locale: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub rate: f32,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub pitch: Option<f32>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct CatalogSettings {
    /// Word list replacing the built-in one. Same `word<TAB>jyutping` format.
    pub path: Option<String>,
}

impl Config {
    pub fn get() -> Result<Config, ConfigError> {
        let base_path = std::env::current_dir().map_err(|error| {
            ConfigError::Message(format!(
                "Failed to determine the current directory. Error: '{error}'."
            ))
        })?;
        let configuration_directory = base_path.join("config");

        let environment: Environment = std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| DEV.to_string())
            .try_into()
            .map_err(ConfigError::Message)?;

        let environment_filename = format!("{}.yaml", environment.as_str());

        let config = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .build()?;

        config.try_deserialize::<Config>()
    }
}

enum Environment {
    Dev,
    Prod,
}

const DEV: &str = "dev";
const PROD: &str = "prod";

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => DEV,
            Environment::Prod => PROD,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        match string.to_lowercase().as_str() {
            DEV => Ok(Self::Dev),
            PROD => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `{DEV}` or `{PROD}`.",
            )),
        }
    }
}
