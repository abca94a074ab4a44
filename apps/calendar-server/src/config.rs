//! Layered server configuration.
//!
//! Sources, later ones winning: built-in defaults, the YAML file given with
//! `--config`, `CALENDAR__*` environment variables (`__` separates nested
//! keys, e.g. `CALENDAR__SERVER__BIND_ADDR`), then command-line overrides.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calendar::config::{CalendarConfig, StoreBackend};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CALENDAR__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// No CORS headers are sent when absent.
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            cors: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE"]
                .map(str::to_owned)
                .to_vec(),
            allowed_headers: vec!["authorization".to_owned(), "content-type".to_owned()],
            allow_credentials: false,
            max_age_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Command-line values that override every other source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a source cannot be parsed or holds unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// # Errors
    ///
    /// Returns an error when `--port` is given but `server.bind_addr` is not
    /// a socket address.
    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) -> Result<()> {
        if let Some(port) = cli.port {
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }

        if cli.mock {
            self.calendar.backend = StoreBackend::Memory;
            self.calendar.database = None;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when `server.bind_addr` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr address '{}'", self.server.bind_addr))
    }

    /// Checks that need more than deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        for user in &self.calendar.users {
            calendar::domain::timezone::validate(&user.timezone)
                .with_context(|| format!("calendar.users: user '{}'", user.login))?;
        }

        if self.calendar.backend == StoreBackend::Database && self.calendar.database.is_none() {
            bail!("calendar.database is required when calendar.backend is 'database'");
        }

        let wildcard_with_credentials = self.server.cors.as_ref().is_some_and(|cors| {
            cors.allow_credentials && cors.allowed_origins.iter().any(|o| o == "*")
        });
        if wildcard_with_credentials {
            bail!("server.cors: allowed_origins '*' cannot be combined with allow_credentials");
        }
        Ok(())
    }

    /// Copy safe to print: the signing secret and DSN password are hidden.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        "***REDACTED***".clone_into(&mut copy.calendar.auth.jwt_secret);
        if let Some(db) = copy.calendar.database.as_mut() {
            db.dsn = calendar::infra::storage::db::redact_dsn(&db.dsn);
        }
        copy
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use calendar::domain::window::TimeToPrecision;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.calendar.backend, StoreBackend::Memory);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "calendar.yaml",
                r#"
server:
  bind_addr: "0.0.0.0:9000"
logging:
  format: json
calendar:
  backend: database
  time_to_precision: hour
  database:
    dsn: "sqlite::memory:"
    acquire_timeout: 5s
  users:
    - id: "0191a3c8-8b1e-7a4e-9c55-5d2f2b1e0001"
      login: alice
      timezone: Europe/Riga
  auth:
    token_ttl: 2h
"#,
            )?;
            jail.set_env("CALENDAR__SERVER__BIND_ADDR", "127.0.0.1:9100");
            jail.set_env("CALENDAR__LOGGING__LEVEL", "debug");

            let cfg = AppConfig::load(Some(Path::new("calendar.yaml"))).unwrap();
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:9100");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.calendar.backend, StoreBackend::Database);
            assert_eq!(cfg.calendar.time_to_precision, TimeToPrecision::Hour);

            let db = cfg.calendar.database.as_ref().unwrap();
            assert_eq!(db.acquire_timeout, Some(Duration::from_secs(5)));
            assert_eq!(cfg.calendar.users[0].login, "alice");
            assert_eq!(cfg.calendar.auth.token_ttl, Duration::from_secs(7200));
            assert!(cfg.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("calendar.yaml", "server:\n  listen: \"0.0.0.0:1\"\n")?;
            assert!(AppConfig::load(Some(Path::new("calendar.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides() {
        let mut cfg = AppConfig::default();
        cfg.calendar.backend = StoreBackend::Database;

        cfg.apply_cli_overrides(CliOverrides {
            port: Some(9999),
            verbose: 2,
            mock: true,
        })
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.calendar.backend, StoreBackend::Memory);
        assert!(cfg.calendar.database.is_none());
    }

    #[test]
    fn test_port_override_needs_socket_address() {
        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "localhost".to_owned();

        let err = cfg
            .apply_cli_overrides(CliOverrides {
                port: Some(1),
                ..CliOverrides::default()
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("address"));
    }

    #[test]
    fn test_validate_catches_semantic_errors() {
        let mut cfg = AppConfig::default();
        cfg.calendar.backend = StoreBackend::Database;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.server.cors = Some(CorsConfig {
            allow_credentials: true,
            ..CorsConfig::default()
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let mut cfg = AppConfig::default();
        cfg.calendar.auth.jwt_secret = "s3cret".to_owned();
        cfg.calendar.database = Some(calendar::config::DatabaseConfig {
            dsn: "postgres://app:hunter2@db/calendar".to_owned(),
            ..Default::default()
        });

        let out = cfg.redacted().to_pretty_string().unwrap();
        assert!(!out.contains("s3cret"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("***REDACTED***"));
    }
}
