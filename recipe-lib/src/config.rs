use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Without a database the in-memory repositories are used.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_signups_enabled")]
    pub signups_enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    #[serde(default = "default_media_url")]
    pub media_url: String,
    #[serde(default)]
    pub honeycomb_api_key: Option<String>,
    #[serde(default)]
    pub ssl: Option<SSLConfig>,
}

fn default_signups_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_owned()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_media_url() -> String {
    "/media/".to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            signups_enabled: default_signups_enabled(),
            bind_address: default_bind_address(),
            media_root: default_media_root(),
            media_url: default_media_url(),
            honeycomb_api_key: None,
            ssl: None,
        }
    }
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        Config::from_toml(&config)
    }

    pub fn from_toml(config: &str) -> Result<Config, anyhow::Error> {
        toml::from_str(config).with_context(|| "Unable to parse config")
    }

    /// Reads the same keys from upper-cased environment variables. Unset variables keep their
    /// defaults.
    pub fn from_env() -> Result<Config, anyhow::Error> {
        let mut config = Config::default();

        config.database_url = read_env("DATABASE_URL");
        if let Some(signups_enabled) = read_env("SIGNUPS_ENABLED") {
            config.signups_enabled = signups_enabled
                .parse()
                .context("Unable to parse SIGNUPS_ENABLED value")?;
        }
        if let Some(bind_address) = read_env("BIND_ADDRESS") {
            config.bind_address = bind_address;
        }
        if let Some(media_root) = read_env("MEDIA_ROOT") {
            config.media_root = PathBuf::from(media_root);
        }
        if let Some(media_url) = read_env("MEDIA_URL") {
            config.media_url = media_url;
        }
        config.honeycomb_api_key = read_env("HONEYCOMB_API_KEY");

        Ok(config)
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
