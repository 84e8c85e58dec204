//! Database connection descriptors, consumed by the Flyway emitter's
//! `[environments.*]` config sections.

use serde::{Deserialize, Serialize};

fn default_driver() -> String {
    Database::DRIVER_POSTGRESQL.to_string()
}

fn is_zero(n: &u16) -> bool {
    *n == 0
}

/// One database environment: a name, driver, and connection parameters.
///
/// `env_name` defaults to `"default"` and `driver` to `"PostgreSql"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default = "Database::default_env_name")]
    pub env_name: String,

    #[serde(default = "default_driver")]
    pub driver: String,

    pub host: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u16,

    pub db_name: String,
    pub username: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl Database {
    pub const DRIVER_POSTGRESQL: &'static str = "PostgreSql";

    fn default_env_name() -> String {
        "default".to_string()
    }

    pub fn new(db_name: impl Into<String>) -> Database {
        Database {
            env_name: Self::default_env_name(),
            driver: default_driver(),
            host: String::new(),
            port: 0,
            db_name: db_name.into(),
            username: String::new(),
            password: String::new(),
        }
    }

    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = env_name.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// The `jdbc:<driver>://host:port/dbName` connection URL used in the
    /// Flyway config, with the driver lower-cased.
    pub fn jdbc_url(&self) -> String {
        format!(
            "jdbc:{}://{}:{}/{}",
            self.driver.to_ascii_lowercase(),
            self.host,
            self.port,
            self.db_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original() {
        let db = Database::new("app");
        assert_eq!(db.env_name, "default");
        assert_eq!(db.driver, Database::DRIVER_POSTGRESQL);
    }

    #[test]
    fn jdbc_url_lowercases_driver() {
        let db = Database::new("app")
            .with_host("localhost")
            .with_port(5432)
            .with_username("app_user");
        assert_eq!(db.jdbc_url(), "jdbc:postgresql://localhost:5432/app");
    }
}
