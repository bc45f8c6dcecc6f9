//! The stub transport logs message envelopes and keeps the messages in
//! memory instead of delivering them. It can be useful for testing purposes.
//!
//! ```rust
//! use missive::{transport::stub::StubTransport, Email, Transport};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut email = Email::new();
//! email
//!     .set_from("nobody@domain.tld")?
//!     .add_to("hei@domain.tld")?
//!     .set_content("Be happy!", "text/plain")?;
//! let message = email.build_mime_message()?;
//!
//! let sender = StubTransport::new_error();
//! assert!(sender.send(message).is_err());
//! assert_eq!(sender.messages().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::{
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{address::Envelope, Transport};

/// An error returned by the stub transport
#[non_exhaustive]
#[derive(Debug, Copy, Clone)]
pub struct Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stub error")
    }
}

impl StdError for Error {}

/// This transport logs the message envelope and returns the given response
#[derive(Debug, Clone)]
pub struct StubTransport {
    response: Result<(), Error>,
    message_log: Arc<Mutex<Vec<(Envelope, String)>>>,
}

impl StubTransport {
    /// Creates a new transport that always returns the given `Result`
    pub fn new(response: Result<(), Error>) -> Self {
        Self {
            response,
            message_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a new transport that always returns a success response
    pub fn new_ok() -> Self {
        Self::new(Ok(()))
    }

    /// Creates a new transport that always returns an error
    pub fn new_error() -> Self {
        Self::new(Err(Error))
    }

    /// Return all logged messages sent using [`Transport::send_raw`]
    ///
    /// Clones share the log.
    pub fn messages(&self) -> Vec<(Envelope, String)> {
        self.message_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for StubTransport {
    type Ok = ();
    type Error = Error;

    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            from = ?envelope.from(),
            to = ?envelope.to(),
            bytes = email.len(),
            "stub transport received a message"
        );

        self.message_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((envelope.clone(), String::from_utf8_lossy(email).into()));
        self.response
    }
}
