use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Empty means any origin is allowed
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseSettings {
    /// Defaults for everything but the connection string
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Largest radius a client may ask for, in miles
    #[serde(default = "default_max_radius_miles")]
    pub max_radius_miles: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_radius_miles: default_max_radius_miles(),
        }
    }
}

// Roughly half the Earth's circumference, so any point is reachable
fn default_max_radius_miles() -> f64 {
    12_500.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Environment variable prefix, e.g. `FACILITIES__SERVER__PORT`
const ENV_PREFIX: &str = "FACILITIES";

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FACILITIES__)
    /// 5. Deployment variables `DSN`/`DATABASE_URL` and `APP_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source(None))
            .build()?;

        apply_deployment_overrides(settings, |key| std::env::var(key).ok())?.try_deserialize()
    }
}

/// Keys read as comma-separated lists from the environment
const ENV_LIST_KEYS: [&str; 1] = ["server.allowed_origins"];

/// `vars` replaces the process environment when given
fn env_source(vars: Option<Map<String, String>>) -> Environment {
    ENV_LIST_KEYS
        .iter()
        .fold(Environment::with_prefix(ENV_PREFIX), |env, key| env.with_list_parse_key(key))
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .try_parsing(true)
        .source(vars)
}

/// Honor the plain variables deployments already set
///
/// `DSN` wins over `DATABASE_URL`; `APP_PORT` sets the listen port.
fn apply_deployment_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let database_url = non_empty("DSN").or_else(|| non_empty("DATABASE_URL"));

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }
    if let Some(port) = non_empty("APP_PORT") {
        let port: u16 = port
            .parse()
            .map_err(|e| ConfigError::Message(format!("APP_PORT must be a port number: {}", e)))?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert!(server.allowed_origins.is_empty());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_database_defaults() {
        let db = DatabaseSettings::with_url("postgres://localhost/facilities");
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.min_connections, 1);
        assert!(db.run_migrations);
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let settings: Settings = Config::builder()
            .set_override("database.url", "postgres://localhost/facilities")
            .unwrap()
            .set_override("search.max_radius_miles", 100.0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.url, "postgres://localhost/facilities");
        assert_eq!(settings.search.max_radius_miles, 100.0);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_environment_overrides_with_origin_list() {
        let vars = Map::from([
            (
                "FACILITIES__DATABASE__URL".to_string(),
                "postgres://env-host/facilities".to_string(),
            ),
            ("FACILITIES__SERVER__PORT".to_string(), "9090".to_string()),
            (
                "FACILITIES__SERVER__ALLOWED_ORIGINS".to_string(),
                "https://a.example,https://b.example".to_string(),
            ),
        ]);

        let settings: Settings = Config::builder()
            .add_source(env_source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.url, "postgres://env-host/facilities");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(
            settings.server.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    fn base_config() -> Config {
        Config::builder()
            .set_override("database.url", "postgres://from-file/facilities")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_deployment_variables_override_config() {
        let vars = Map::from([
            ("DATABASE_URL".to_string(), "postgres://database-url/facilities".to_string()),
            ("DSN".to_string(), "postgres://dsn/facilities".to_string()),
            ("APP_PORT".to_string(), "3000".to_string()),
        ]);

        let settings: Settings = apply_deployment_overrides(base_config(), |key| vars.get(key).cloned())
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.url, "postgres://dsn/facilities");
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_deployment_variables_fall_back_and_validate() {
        let settings: Settings = apply_deployment_overrides(base_config(), |key| match key {
            "DSN" => Some(String::new()),
            "DATABASE_URL" => Some("postgres://database-url/facilities".to_string()),
            _ => None,
        })
        .unwrap()
        .try_deserialize()
        .unwrap();
        assert_eq!(settings.database.url, "postgres://database-url/facilities");

        let unset: Settings = apply_deployment_overrides(base_config(), |_| None)
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(unset.database.url, "postgres://from-file/facilities");

        let bad_port = apply_deployment_overrides(base_config(), |key| {
            (key == "APP_PORT").then(|| "not-a-port".to_string())
        });
        assert!(bad_port.is_err());
    }
}
