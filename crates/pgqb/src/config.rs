//! Connection settings for the execution layer.

use std::time::Duration;

use crate::error::{QbError, QbResult};

/// Canonical PostgreSQL driver name.
pub const DRIVER_POSTGRES: &str = "postgres";
/// Canonical MySQL driver name.
pub const DRIVER_MYSQL: &str = "mysql";

/// Settings for the connection pool that executes built statements.
///
/// The builder itself performs no I/O; this struct exists so the whole
/// database configuration lives next to the schemas that describe it and
/// travels to the execution layer as one value.
#[derive(Debug, Clone)]
pub struct ConnConfig {
    /// Driver name. `pg` and `postgresql` normalize to `postgres`,
    /// `mariadb` to `mysql`.
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Connections kept idle in the pool.
    pub max_idle_conns: u32,
    /// Upper bound on open connections.
    pub max_open_conns: u32,
    /// Age after which a pooled connection is recycled.
    pub max_conn_lifetime: Duration,
}

impl Default for ConnConfig {
    fn default() -> Self {
        Self {
            driver: DRIVER_POSTGRES.to_string(),
            host: "localhost".to_string(),
            port: 5432,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            max_idle_conns: 10,
            max_open_conns: 10,
            max_conn_lifetime: Duration::from_secs(1),
        }
    }
}

impl ConnConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver name.
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Set the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login user.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set how many idle connections the pool keeps.
    pub fn max_idle_conns(mut self, count: u32) -> Self {
        self.max_idle_conns = count;
        self
    }

    /// Set the open-connection ceiling.
    pub fn max_open_conns(mut self, count: u32) -> Self {
        self.max_open_conns = count;
        self
    }

    /// Set the pooled-connection lifetime.
    pub fn max_conn_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_conn_lifetime = lifetime;
        self
    }

    /// The driver name with common aliases folded to their canonical form.
    pub fn normalized_driver(&self) -> &str {
        match self.driver.as_str() {
            "pg" | "postgresql" => DRIVER_POSTGRES,
            "mariadb" => DRIVER_MYSQL,
            other => other,
        }
    }

    /// Build the driver-specific connection string.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dsn = ConnConfig::new()
    ///     .host("db.internal")
    ///     .username("svc")
    ///     .password("secret")
    ///     .database("core")
    ///     .dsn()?;
    /// assert!(dsn.starts_with("host=db.internal port=5432"));
    /// ```
    pub fn dsn(&self) -> QbResult<String> {
        match self.normalized_driver() {
            DRIVER_POSTGRES => Ok(format!(
                "host={} port={} user={} password={} dbname={} sslmode=disable",
                self.host, self.port, self.username, self.password, self.database
            )),
            DRIVER_MYSQL => Ok(format!(
                "{}:{}@tcp({}:{})/{}?parseTime=true",
                self.username, self.password, self.host, self.port, self.database
            )),
            other => Err(QbError::unsupported_driver(other)),
        }
    }
}
