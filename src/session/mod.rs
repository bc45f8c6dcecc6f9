//! Session configuration handed to a transport
//!
//! Missive doesn't connect to anything. A [`Session`] is the string keyed
//! set of properties (host, port, timeouts, ...) plus the [`Credentials`]
//! a deliverer needs, derived from a typed [`SessionConfig`].
//!
//! ```rust
//! use std::time::Duration;
//!
//! use missive::session::{SessionConfig, MAIL_HOST, MAIL_PORT, MAIL_SMTP_AUTH};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let session = SessionConfig::new()
//!     .host_name("smtp.example.com")
//!     .smtp_port(2525)
//!     .credentials(("user", "pass").into())
//!     .connection_timeout(Duration::from_secs(30))
//!     .to_session()?;
//!
//! assert_eq!(session.property(MAIL_HOST), Some("smtp.example.com"));
//! assert_eq!(session.property(MAIL_PORT), Some("2525"));
//! assert_eq!(session.property(MAIL_SMTP_AUTH), Some("true"));
//! assert_eq!(session.credentials().map(|c| c.username()), Some("user"));
//! # Ok(())
//! # }
//! ```

use std::collections::{btree_map, BTreeMap};

pub use self::{authentication::Credentials, config::SessionConfig};

mod authentication;
mod config;
mod connection_url;

/// Transport protocol, always `smtp`
pub const MAIL_TRANSPORT_PROTOCOL: &str = "mail.transport.protocol";
/// Host of the SMTP server
pub const MAIL_HOST: &str = "mail.smtp.host";
/// Port of the SMTP server
pub const MAIL_PORT: &str = "mail.smtp.port";
/// `true` when the session carries credentials
pub const MAIL_SMTP_AUTH: &str = "mail.smtp.auth";
/// User name to authenticate as
pub const MAIL_SMTP_USER: &str = "mail.smtp.user";
/// Whether the deliverer should log the conversation
pub const MAIL_DEBUG: &str = "mail.debug";
/// Socket connection timeout, in milliseconds
pub const MAIL_SMTP_CONNECTIONTIMEOUT: &str = "mail.smtp.connectiontimeout";
/// Socket I/O timeout, in milliseconds
pub const MAIL_SMTP_TIMEOUT: &str = "mail.smtp.timeout";
/// Upgrade the connection with `STARTTLS` when offered
pub const MAIL_SMTP_STARTTLS_ENABLE: &str = "mail.smtp.starttls.enable";
/// Fail when the server doesn't offer `STARTTLS`
pub const MAIL_SMTP_STARTTLS_REQUIRED: &str = "mail.smtp.starttls.required";
/// Connect over TLS from the start
pub const MAIL_SMTP_SSL_ENABLE: &str = "mail.smtp.ssl.enable";
/// Envelope sender, where bounces are delivered
pub const MAIL_SMTP_FROM: &str = "mail.smtp.from";

/// Properties and credentials for delivering messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    properties: BTreeMap<String, String>,
    credentials: Option<Credentials>,
}

impl Session {
    /// Creates a session holding `properties`, without credentials
    ///
    /// ```rust
    /// use missive::{session::MAIL_HOST, Session};
    ///
    /// let session = Session::new([(MAIL_HOST, "smtp.example.com")]);
    /// assert_eq!(session.property("mail.smtp.host"), Some("smtp.example.com"));
    /// assert_eq!(session.property("mail.smtp.port"), None);
    /// ```
    pub fn new<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        properties.into_iter().collect()
    }

    /// Adds the credentials used to authenticate
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets a property, overriding any previous value
    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Value of the property `key`
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Iterates over all properties, ordered by key
    pub fn properties(&self) -> btree_map::Iter<'_, String, String> {
        self.properties.iter()
    }

    /// The credentials used to authenticate, if any
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Session {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            credentials: None,
        }
    }
}

impl Extend<(String, String)> for Session {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.properties.extend(iter);
    }
}
