use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/solar-system";
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct PlanetConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
    /// Runtime environment label reported by `/os`. Never empty.
    pub environment: String,
    /// When false the binary validates configuration and exits without
    /// binding a listener.
    pub autostart: bool,
    /// Directory holding `index.html` and `oas.json`.
    pub static_dir: PathBuf,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown STORE_BACKEND '{}'. Must be one of: mongo, memory",
                other
            ))),
        }
    }
}

impl PlanetConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common = core_config::Config::load()?;
        if let Some(level) = non_empty_env("LOG_LEVEL") {
            common.log_level = level;
        }

        let environment =
            non_empty_env("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let is_prod = environment == "prod";

        let autostart = match non_empty_env("AUTOSTART") {
            Some(value) => parse_flag("AUTOSTART", &value)?,
            None => environment != "test",
        };

        let static_dir = match non_empty_env("STATIC_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_static_dir(),
        };

        Ok(PlanetConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env("MONGO_URI", Some(DEFAULT_MONGO_URI), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("solar-system"), false)?,
            },
            store: get_env("STORE_BACKEND", Some("mongo"), false)?.parse()?,
            autostart,
            environment,
            static_dir,
            otlp_endpoint: non_empty_env("OTLP_ENDPOINT"),
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }

    pub fn api_docs_path(&self) -> PathBuf {
        self.static_dir.join("oas.json")
    }
}

/// `static` under the working directory when present, otherwise the crate's
/// own `static` directory so `cargo run` works from the workspace root.
fn default_static_dir() -> PathBuf {
    let local = Path::new("static");
    if local.join("index.html").is_file() {
        local.to_path_buf()
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid {} '{}'. Must be true or false",
            key,
            other
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match non_empty_env(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // The process environment is shared by every test thread.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: &[&str] = &[
        "ENVIRONMENT",
        "AUTOSTART",
        "MONGO_URI",
        "MONGODB_DATABASE",
        "STORE_BACKEND",
        "STATIC_DIR",
        "LOG_LEVEL",
        "OTLP_ENDPOINT",
    ];

    fn clean_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for key in KEYS {
            env::remove_var(key);
        }
        guard
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<PlanetConfig, AppError> {
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = PlanetConfig::load();
        for (key, _) in vars {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn defaults_point_at_local_solar_system_database() {
        let _guard = clean_env();

        let config = load_with(&[]).unwrap();

        assert_eq!(config.mongodb.uri, DEFAULT_MONGO_URI);
        assert_eq!(config.mongodb.database, "solar-system");
        assert_eq!(config.store, StoreBackend::Mongo);
        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
        assert!(config.autostart);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn empty_environment_falls_back_to_default_label() {
        let _guard = clean_env();

        let config = load_with(&[("ENVIRONMENT", ""), ("OTLP_ENDPOINT", " ")]).unwrap();

        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
        assert!(!config.environment.is_empty());
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_environment_suppresses_autostart() {
        let _guard = clean_env();

        let config = load_with(&[("ENVIRONMENT", "test")]).unwrap();

        assert_eq!(config.environment, "test");
        assert!(!config.autostart);
    }

    #[test]
    fn explicit_autostart_overrides_environment_default() {
        let _guard = clean_env();

        let config = load_with(&[("ENVIRONMENT", "test"), ("AUTOSTART", "true")]).unwrap();
        assert!(config.autostart);

        let config = load_with(&[("AUTOSTART", "off")]).unwrap();
        assert!(!config.autostart);
    }

    #[test]
    fn misspelled_autostart_is_rejected() {
        let _guard = clean_env();

        let result = load_with(&[("AUTOSTART", "flase")]);

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn production_requires_mongo_uri() {
        let _guard = clean_env();

        let result = load_with(&[("ENVIRONMENT", "prod")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let config = load_with(&[
            ("ENVIRONMENT", "prod"),
            ("MONGO_URI", "mongodb://db.internal:27017/solar-system"),
        ])
        .unwrap();
        assert_eq!(config.mongodb.uri, "mongodb://db.internal:27017/solar-system");
        assert!(config.autostart);
    }

    #[test]
    fn unknown_store_backend_is_rejected() {
        let _guard = clean_env();

        let result = load_with(&[("STORE_BACKEND", "redis")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let config = load_with(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn default_static_dir_holds_the_landing_page() {
        let _guard = clean_env();

        let config = load_with(&[]).unwrap();

        assert!(config.index_path().is_file());
        assert!(config.api_docs_path().is_file());
    }

    #[test]
    fn explicit_static_dir_wins() {
        let _guard = clean_env();

        let config = load_with(&[("STATIC_DIR", "/srv/planets")]).unwrap();

        assert_eq!(config.index_path(), PathBuf::from("/srv/planets/index.html"));
        assert_eq!(config.api_docs_path(), PathBuf::from("/srv/planets/oas.json"));
    }

    #[test]
    fn parses_store_backend_names() {
        assert_eq!("mongo".parse::<StoreBackend>().unwrap(), StoreBackend::Mongo);
        assert_eq!("MongoDB".parse::<StoreBackend>().unwrap(), StoreBackend::Mongo);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn parses_boolean_flags() {
        assert!(parse_flag("AUTOSTART", "true").unwrap());
        assert!(!parse_flag("AUTOSTART", "0").unwrap());
        assert!(!parse_flag("AUTOSTART", "OFF").unwrap());
        assert!(parse_flag("AUTOSTART", "maybe").is_err());
    }
}
