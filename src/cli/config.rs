use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{env, fs::File, path::Path};

pub const DEFAULT_HOST: &str = "https://free.teambeam.de";
pub const ENV_HOST: &str = "TEAMBEAM_HOST";
pub const ENV_ID_TOKEN: &str = "TEAMBEAM_ID_TOKEN";

// as found in config.yml
#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    host: Option<String>,
    email: Option<String>,
    id_token: Option<String>,
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub email: Option<String>,
    pub id_token: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            email: None,
            id_token: None,
        }
    }
}

impl Config {
    /// Load the config file, a missing file is an empty config. The
    /// environment overrides the file.
    ///
    /// # Errors
    /// Will return an error if the file exists but can not be parsed
    pub fn new(config_path: &Path) -> Result<Self> {
        let file = if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("unable to open {}", config_path.display()))?;

            serde_yaml_ng::from_reader::<_, Option<ConfigFile>>(file)
                .context("unable to parse config file")?
                .unwrap_or_default()
        } else {
            log::info!("no config file found: {}", config_path.display());
            ConfigFile::default()
        };

        let host = env::var(ENV_HOST)
            .ok()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let id_token = env::var(ENV_ID_TOKEN)
            .ok()
            .or(file.id_token)
            .filter(|t| !t.trim().is_empty())
            .map(|t| SecretString::new(t.into_boxed_str()));

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            email: file.email,
            id_token,
        })
    }

    /// # Errors
    /// Will return an error if there is no ID token in the file or the environment
    pub fn id_token(&self, config_path: &Path) -> Result<SecretString> {
        self.id_token
            .as_ref()
            .map(|t| SecretString::new(t.expose_secret().into()))
            .ok_or_else(|| {
                anyhow!(
                    "No \"id_token\" found, add it to {} or set {ENV_ID_TOKEN}",
                    config_path.display()
                )
            })
    }
}
