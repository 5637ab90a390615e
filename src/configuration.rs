use config::{Config, ConfigError, Environment as EnvSource, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String,
    pub max_pool_size: u32
}

impl DatabaseSettings {
    // Url of the postgres server itself, used to create databases
    pub fn get_database_url(&self) -> String{
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    // Url of the application database
    pub fn get_database_table_url(&self) -> String{
        format!("{}/{}", self.get_database_url(), self.name)
    }
}

#[derive(Deserialize, Debug)]
pub struct SessionSettings{
    pub secret_key: SecretString,
    pub secure_cookie: bool
}

/// Runtime environment, picked with the `APP_ENVIRONMENT` variable.
#[derive(Debug, PartialEq)]
pub enum Environment{
    Local,
    Production
}

impl Environment {
    pub fn as_str(&self) -> &'static str{
        match self {
            Environment::Local => "local",
            Environment::Production => "production"
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`",
                other
            ))
        }
    }
}

impl Settings{
    /// Layers `configuration/base.yaml`, the environment specific file and
    /// `APP_*` variables (`APP_DATABASE__PORT=5433`).
    pub fn get() -> Result<Self, ConfigError>{
        let base_path = std::env::current_dir()
            .map_err(|e| ConfigError::Message(format!("Failed to determine current directory: {}", e)))?;
        let configuration_directory = base_path.join("configuration");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        Settings::from_directory(&configuration_directory, environment)
    }

    /// Production carries no session key in its files, it must come from
    /// `APP_SESSION__SECRET_KEY`.
    pub fn from_directory(configuration_directory: &std::path::Path, environment: Environment) -> Result<Self, ConfigError>{
        Config::builder()
            .add_source(File::from(configuration_directory.join("base.yaml")))
            .add_source(File::from(
                configuration_directory.join(format!("{}.yaml", environment.as_str()))
            ))
            .add_source(
                EnvSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
