//! Session struct and connection lifecycle.

use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::error::{AdapterError, SqlaResult};
use crate::native::NativeApi;
use crate::parser::parse_connection_string;
use crate::types::TextEncoding;

use super::interface::Interface;

/// Options applied right after connecting. Failures are ignored.
const CONNECTION_OPTIONS: [&str; 3] = [
    "SET TEMPORARY OPTION non_keywords = 'LOGIN'",
    "SET TEMPORARY OPTION timestamp_format = 'YYYY-MM-DD HH:NN:SS'",
    // Target of the liveness probe
    "CREATE VARIABLE liveness INT",
];

const LIVENESS_PROBE: &str = "SET liveness = 1";

/// One native connection plus its transaction mode.
///
/// Statements on a session run one at a time. Sessions are independent;
/// they share only the [`Interface`].
pub struct Session<A: NativeApi> {
    pub(super) interface: Arc<Interface<A>>,
    pub(super) conn: A::Connection,
    connection_string: String,
    pub(super) encoding: TextEncoding,
    pub(super) auto_commit: bool,
    pub(super) affected_rows: u64,
    connected: bool,
}

impl<A: NativeApi> Session<A> {
    /// Open a session with a driver connection string.
    ///
    /// The `CharSet` parameter, if present, selects the encoding applied to
    /// fetched character data.
    pub fn connect(interface: Arc<Interface<A>>, connection_string: &str) -> SqlaResult<Self> {
        let parsed = parse_connection_string(connection_string)?;
        let encoding = match parsed.charset() {
            Some(name) => TextEncoding::from_charset(name).unwrap_or_else(|| {
                tracing::warn!(charset = name, "unsupported CharSet, decoding text as UTF-8");
                TextEncoding::Utf8
            }),
            None => TextEncoding::Utf8,
        };

        let conn = interface
            .api()
            .new_connection()
            .ok_or_else(|| AdapterError::Connection("could not allocate a native connection".to_string()))?;

        let mut session = Self {
            interface,
            conn,
            connection_string: connection_string.to_string(),
            encoding,
            auto_commit: true,
            affected_rows: 0,
            connected: false,
        };
        session.establish()?;
        tracing::info!(connection = %parsed.masked(), "connected");
        Ok(session)
    }

    /// Open a session from configuration.
    pub fn from_config(interface: Arc<Interface<A>>, config: &ConnectionConfig) -> SqlaResult<Self> {
        let mut session = Self::connect(interface, &config.connection_string()?)?;
        if let Some(encoding) = config.text_encoding()? {
            session.encoding = encoding;
        }
        Ok(session)
    }

    fn establish(&mut self) -> SqlaResult<()> {
        let api = self.interface.api();
        if !api.connect(&mut self.conn, &self.connection_string) {
            let (code, message) = api.error(&self.conn);
            return Err(AdapterError::Connection(format!(
                "{} (code {}): Cannot Establish Connection",
                message, code
            )));
        }
        self.connected = true;
        self.auto_commit = true;
        self.set_connection_options();
        Ok(())
    }

    fn set_connection_options(&mut self) {
        let api = self.interface.api();
        for sql in CONNECTION_OPTIONS {
            if !api.execute_immediate(&mut self.conn, sql) {
                let (code, message) = api.error(&self.conn);
                tracing::debug!(sql, code, %message, "connection option not applied");
            }
        }
    }

    /// Cheap round trip to check the connection is alive.
    pub fn is_active(&mut self) -> bool {
        self.connected && self.interface.api().execute_immediate(&mut self.conn, LIVENESS_PROBE)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            self.interface.api().disconnect(&mut self.conn);
            self.connected = false;
            tracing::info!("disconnected");
        }
    }

    /// Disconnect, then connect again with the same connection string.
    /// Any open transaction is lost.
    pub fn reconnect(&mut self) -> SqlaResult<()> {
        self.disconnect();
        self.establish()?;
        tracing::info!("reconnected");
        Ok(())
    }

    pub fn interface(&self) -> &Arc<Interface<A>> {
        &self.interface
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Rows touched by the last statement; `0` after a failure.
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }
}

impl<A: NativeApi> Drop for Session<A> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
