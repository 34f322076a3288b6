//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` in the working directory
//! and can be overridden by `FICHA__*` environment variables, e.g.
//! `FICHA__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("FICHA").separator("__"))
                .build()?,
        )
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_config(
            Config::builder()
                .add_source(File::from_str(toml, FileFormat::Toml))
                .build()?,
        )
    }

    #[test]
    fn sqlite_database() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 3000
            database = { sqlite = "ficha.db" }
            "#,
        )
        .unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("ficha.db".to_string())
        );
    }

    #[test]
    fn memory_database_and_default_level() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, None);
        assert_eq!(settings.server.database, Database::Memory);
    }

    #[test]
    fn server_section_is_required() {
        assert!(parse("[app]\nlevel = \"info\"\n").is_err());
    }
}
