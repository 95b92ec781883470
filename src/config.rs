//! Connection configuration.
//!
//! Read from the `[connection]` table of `sqlany.toml`:
//!
//! ```toml
//! [connection]
//! database = "demo"
//! server = "demo_srv"
//! username = "dba"
//! password = "sql"
//! commlinks = "tcpip{host=db.internal}"
//! encoding = "utf8"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AdapterError, SqlaResult};
use crate::parser::parse_connection_string;
use crate::types::TextEncoding;

pub const CONFIG_FILE: &str = "sqlany.toml";

const DEFAULT_USERNAME: &str = "dba";
const DEFAULT_PASSWORD: &str = "sql";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub database: Option<String>,
    /// Defaults to the database name
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub commlinks: Option<String>,
    pub connection_name: Option<String>,
    /// Character set of the connection, e.g. `utf8` or `iso_1`
    pub encoding: Option<String>,
    /// Used verbatim instead of the fields above
    pub connection_string: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    connection: ConnectionConfig,
}

impl ConnectionConfig {
    /// Parse the `[connection]` table from TOML text.
    pub fn from_toml(content: &str) -> SqlaResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| AdapterError::Config(e.to_string()))?;
        Ok(file.connection)
    }

    pub fn load(path: impl AsRef<Path>) -> SqlaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            AdapterError::Config(msg) => AdapterError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Candidate config files, in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlany").join("config.toml"));
        }
        paths
    }

    /// Load the first config file that exists.
    pub fn discover() -> SqlaResult<Self> {
        let paths = Self::search_paths();
        match paths.iter().find(|p| p.exists()) {
            Some(path) => Self::load(path),
            None => Err(AdapterError::Config(format!(
                "no configuration found (looked in {})",
                paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
            ))),
        }
    }

    /// Driver connection string.
    pub fn connection_string(&self) -> SqlaResult<String> {
        if let Some(verbatim) = &self.connection_string {
            return Ok(verbatim.clone());
        }

        let database = self
            .database
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AdapterError::Config("missing 'database' in connection settings".to_string()))?;

        let mut s = format!(
            "ServerName={};DatabaseName={};UserID={};Password={};",
            self.server.as_deref().unwrap_or(database),
            database,
            self.username.as_deref().unwrap_or(DEFAULT_USERNAME),
            self.password.as_deref().unwrap_or(DEFAULT_PASSWORD),
        );
        if let Some(links) = &self.commlinks {
            s.push_str(&format!("CommLinks={};", links));
        }
        if let Some(name) = &self.connection_name {
            s.push_str(&format!("ConnectionName={};", name));
        }
        if let Some(charset) = &self.encoding {
            s.push_str(&format!("CharSet={};", charset));
        }
        s.push_str("Idle=0");
        Ok(s)
    }

    /// Encoding for fetched character data, if one is configured.
    pub fn text_encoding(&self) -> SqlaResult<Option<TextEncoding>> {
        let name = match (&self.encoding, &self.connection_string) {
            (Some(name), _) => Some(name.clone()),
            (None, Some(cs)) => parse_connection_string(cs)?.charset().map(str::to_string),
            (None, None) => None,
        };
        match name {
            Some(name) => TextEncoding::from_charset(&name)
                .map(Some)
                .ok_or_else(|| AdapterError::Config(format!("unsupported encoding '{}'", name))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig {
            database: Some("demo".into()),
            ..Default::default()
        };
        assert_eq!(
            config.connection_string().unwrap(),
            "ServerName=demo;DatabaseName=demo;UserID=dba;Password=sql;Idle=0"
        );
    }

    #[test]
    fn test_all_fields() {
        let config = ConnectionConfig::from_toml(
            r#"
            [connection]
            database = "sales"
            server = "srv1"
            username = "app"
            password = "pw"
            commlinks = "tcpip{host=10.0.0.5}"
            connection_name = "worker"
            encoding = "iso_1"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.connection_string().unwrap(),
            "ServerName=srv1;DatabaseName=sales;UserID=app;Password=pw;\
             CommLinks=tcpip{host=10.0.0.5};ConnectionName=worker;CharSet=iso_1;Idle=0"
        );
        assert_eq!(config.text_encoding().unwrap(), Some(TextEncoding::Latin1));
    }

    #[test]
    fn test_missing_database() {
        let err = ConnectionConfig::default().connection_string().unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));
    }

    #[test]
    fn test_verbatim_connection_string() {
        let config = ConnectionConfig {
            connection_string: Some("UID=dba;PWD=sql;DBN=demo;CharSet=utf-8".into()),
            ..Default::default()
        };
        assert_eq!(config.connection_string().unwrap(), "UID=dba;PWD=sql;DBN=demo;CharSet=utf-8");
        assert_eq!(config.text_encoding().unwrap(), Some(TextEncoding::Utf8));
    }

    #[test]
    fn test_missing_table_is_config_error() {
        assert!(matches!(
            ConnectionConfig::from_toml("[other]\nx = 1"),
            Err(AdapterError::Config(_))
        ));
    }
}
