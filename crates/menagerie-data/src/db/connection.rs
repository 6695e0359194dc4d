use std::fmt;
use std::time::Duration;

use menagerie::config::env_value;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use super::RelationalError;

pub const DEFAULT_PORT: u16 = 5432;

/// How long [`connect`] waits for the first connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to find the database.
///
/// `DATABASE_URL` wins when set. Otherwise every `MENAGERIE_DB_*` part is
/// required except the port.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionSettings {
    Url(String),
    Params {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: String,
    },
}

impl ConnectionSettings {
    pub fn from_env() -> Result<Self, RelationalError> {
        Self::from_lookup(env_value)
    }

    /// Resolves settings through `lookup`, which returns `None` for unset names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelationalError> {
        if let Some(url) = lookup("DATABASE_URL") {
            return Ok(ConnectionSettings::Url(url));
        }

        let required =
            |name: &'static str| lookup(name).ok_or(RelationalError::MissingSetting(name));

        let port = match lookup("MENAGERIE_DB_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| RelationalError::InvalidSetting {
                    name: "MENAGERIE_DB_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(ConnectionSettings::Params {
            host: required("MENAGERIE_DB_HOST")?,
            port,
            database: required("MENAGERIE_DB_NAME")?,
            user: required("MENAGERIE_DB_USER")?,
            password: required("MENAGERIE_DB_PASSWORD")?,
        })
    }

    fn connect_options(&self) -> Result<PgConnectOptions, RelationalError> {
        match self {
            ConnectionSettings::Url(url) => url.parse().map_err(RelationalError::Connection),
            ConnectionSettings::Params {
                host,
                port,
                database,
                user,
                password,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(database)
                .username(user)
                .password(password)),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionSettings::Url(_) => f.debug_tuple("Url").field(&"<redacted>").finish(),
            ConnectionSettings::Params {
                host,
                port,
                database,
                user,
                ..
            } => f
                .debug_struct("Params")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .field("user", user)
                .finish_non_exhaustive(),
        }
    }
}

/// Opens a single-connection pool. Fails before any schema or data work.
pub async fn connect(settings: &ConnectionSettings) -> Result<PgPool, RelationalError> {
    connect_within(settings, CONNECT_TIMEOUT).await
}

async fn connect_within(
    settings: &ConnectionSettings,
    timeout: Duration,
) -> Result<PgPool, RelationalError> {
    let options = settings.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
        .map_err(RelationalError::Connection)?;

    info!("Connected to database");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const PARTS: [(&str, &str); 4] = [
        ("MENAGERIE_DB_HOST", "db.local"),
        ("MENAGERIE_DB_NAME", "menagerie"),
        ("MENAGERIE_DB_USER", "scott"),
        ("MENAGERIE_DB_PASSWORD", "tiger"),
    ];

    #[test]
    fn test_database_url_wins() {
        let mut vars = PARTS.to_vec();
        vars.push(("DATABASE_URL", "postgres://u:p@localhost/db"));

        let settings = ConnectionSettings::from_lookup(lookup_in(&vars)).unwrap();
        assert_eq!(
            settings,
            ConnectionSettings::Url("postgres://u:p@localhost/db".to_string())
        );
    }

    #[test]
    fn test_params_with_default_port() {
        let settings = ConnectionSettings::from_lookup(lookup_in(&PARTS)).unwrap();
        assert_eq!(
            settings,
            ConnectionSettings::Params {
                host: "db.local".to_string(),
                port: DEFAULT_PORT,
                database: "menagerie".to_string(),
                user: "scott".to_string(),
                password: "tiger".to_string(),
            }
        );
        assert!(!format!("{settings:?}").contains("tiger"));
    }

    #[test]
    fn test_missing_setting() {
        let err = ConnectionSettings::from_lookup(lookup_in(&PARTS[..3])).unwrap_err();
        assert!(matches!(
            err,
            RelationalError::MissingSetting("MENAGERIE_DB_PASSWORD")
        ));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = PARTS.to_vec();
        vars.push(("MENAGERIE_DB_PORT", "fifty"));

        let err = ConnectionSettings::from_lookup(lookup_in(&vars)).unwrap_err();
        assert!(matches!(
            err,
            RelationalError::InvalidSetting {
                name: "MENAGERIE_DB_PORT",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_error() {
        // nothing listens on port 1
        let settings = ConnectionSettings::Url("postgres://u:p@127.0.0.1:1/db".to_string());

        let result = connect_within(&settings, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(RelationalError::Connection(_))));
    }

    #[tokio::test]
    async fn test_malformed_url_is_connection_error() {
        let settings = ConnectionSettings::Url("not a url".to_string());
        assert!(matches!(
            connect(&settings).await,
            Err(RelationalError::Connection(_))
        ));
    }
}
