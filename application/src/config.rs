//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use service::domain::booking::Policy;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,

    /// Bootstrap configuration.
    pub bootstrap: Bootstrap,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, including booking
    /// hours outside the `0..=23` range.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Duration a user session stays valid for.
    #[default(time::Duration::from_secs(30 * 60))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,

    /// Booking configuration.
    pub booking: Booking,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            jwt_secret,
            session_ttl,
            booking,
        } = value;
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            session_ttl,
            booking: booking.into(),
        }
    }
}

/// Booking configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Booking {
    /// Hour of a day (in UTC) guests check in at.
    #[default(Hour(Policy::default().check_in))]
    pub check_in_hour: Hour,

    /// Hour of a day (in UTC) guests check out at.
    #[default(Hour(Policy::default().check_out))]
    pub check_out_hour: Hour,
}

impl From<Booking> for Policy {
    fn from(value: Booking) -> Self {
        let Booking {
            check_in_hour,
            check_out_hour,
        } = value;
        Self {
            check_in: check_in_hour.0,
            check_out: check_out_hour.0,
        }
    }
}

/// Whole hour of a day.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "u8")]
pub struct Hour(::time::Time);

impl TryFrom<u8> for Hour {
    type Error = ::time::error::ComponentRange;

    fn try_from(hour: u8) -> Result<Self, Self::Error> {
        ::time::Time::from_hms(hour, 0, 0).map(Self)
    }
}

/// Bootstrap configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Bootstrap {
    /// Hotel owner to create on startup, if missing.
    pub owner: Option<Owner>,
}

/// Credentials of a hotel owner.
#[derive(Clone, Debug, Deserialize)]
pub struct Owner {
    /// Email of the owner.
    pub email: String,

    /// Name of the owner.
    pub name: String,

    /// Password of the owner.
    pub password: SecretString,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs};

    use secrecy::ExposeSecret as _;
    use time::macros::time;

    use super::{Booking, Config, Hour, Policy};

    /// Writes the provided TOML `contents` into a temporary file named after
    /// the provided `test`, and loads a [`Config`] from it.
    fn load(test: &str, contents: &str) -> Result<Config, config::ConfigError> {
        let path = env::temp_dir().join(format!("hotel-config-{test}.toml"));
        fs::write(&path, contents).unwrap();
        let config = Config::new(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
        config
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::new("nonexistent.toml").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.service.session_ttl.as_secs(), 30 * 60);
        assert_eq!(Policy::from(config.service.booking), Policy::default());
        assert!(config.bootstrap.owner.is_none());
    }

    #[test]
    fn converts_booking_hours_into_policy() {
        let policy = Policy::from(Booking {
            check_in_hour: Hour::try_from(15).unwrap(),
            check_out_hour: Hour::try_from(11).unwrap(),
        });

        assert_eq!(policy.check_in, time!(15:00));
        assert_eq!(policy.check_out, time!(11:00));
    }

    #[test]
    fn loads_booking_hours_from_file() {
        let config = load(
            "booking-hours",
            "[service.booking]\ncheck_in_hour = 15\ncheck_out_hour = 0\n",
        )
        .unwrap();

        let policy = Policy::from(config.service.booking);
        assert_eq!(policy.check_in, time!(15:00));
        assert_eq!(policy.check_out, time!(0:00));
    }

    #[test]
    fn rejects_out_of_range_hours() {
        assert!(Hour::try_from(24).is_err());

        assert!(load(
            "check-in-hour",
            "[service.booking]\ncheck_in_hour = 24\n",
        )
        .is_err());
        assert!(load(
            "check-out-hour",
            "[service.booking]\ncheck_out_hour = 99\n",
        )
        .is_err());
    }

    #[test]
    fn loads_bootstrap_owner() {
        let config = load(
            "bootstrap-owner",
            "[bootstrap.owner]\n\
             email = \"owner@hotel.example\"\n\
             name = \"Hotel Owner\"\n\
             password = \"correct horse\"\n",
        )
        .unwrap();

        let owner = config.bootstrap.owner.unwrap();
        assert_eq!(owner.email, "owner@hotel.example");
        assert_eq!(owner.password.expose_secret(), "correct horse");
        assert!(!format!("{owner:?}").contains("correct horse"));
    }
}
