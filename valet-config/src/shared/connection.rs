use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::SerializableSecretString;

/// Postgres connection configuration shared by all valet services.
#[derive(Debug, Clone, Deserialize)]
pub struct PgConnectionConfig {
    /// Host on which Postgres is running.
    pub host: String,
    /// Port on which Postgres is listening.
    pub port: u16,
    /// Name of the database to connect to.
    pub name: String,
    /// Username used for authentication.
    pub username: String,
    /// Optional password used for authentication.
    pub password: Option<SerializableSecretString>,
    /// TLS settings for the connection.
    #[serde(default)]
    pub tls: TlsConfig,
}

/// TLS settings for a Postgres connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is required for the connection.
    pub enabled: bool,
    /// PEM-encoded trusted root certificates, if any.
    #[serde(default)]
    pub trusted_root_certs: String,
}

/// Conversion into sqlx [`PgConnectOptions`].
pub trait IntoConnectOptions {
    /// Builds connect options targeting the configured database.
    fn with_db(&self) -> PgConnectOptions;

    /// Builds connect options without selecting a database.
    ///
    /// Useful for administrative operations such as creating or dropping databases.
    fn without_db(&self) -> PgConnectOptions;
}

impl IntoConnectOptions for PgConnectionConfig {
    fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.name)
    }

    fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.tls.enabled {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        let mut options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .ssl_mode(ssl_mode);

        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }

        options
    }
}
