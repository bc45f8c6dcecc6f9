//! Transports hand built messages over to a deliverer
//!
//! Missive doesn't deliver messages itself. A [`Transport`] receives the
//! [`Message`] produced by an [`Email`](crate::Email), with its
//! [`Envelope`]; SMTP or any other delivery mechanism lives behind it.
//!
//! The [`StubTransport`](stub::StubTransport) records what it is given,
//! which is handy in tests:
//!
//! ```rust
//! use missive::{transport::stub::StubTransport, Email};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut email = Email::new();
//! email
//!     .set_from("nobody@domain.tld")?
//!     .add_to("hei@domain.tld")?
//!     .set_subject("Happy new year")
//!     .set_content("Be happy!", "text/plain")?;
//!
//! let sender = StubTransport::new_ok();
//! let message_id = email.send(&sender)?;
//!
//! let messages = sender.messages();
//! assert_eq!(messages.len(), 1);
//! assert!(messages[0].1.contains(&message_id));
//! # Ok(())
//! # }
//! ```

use crate::{address::Envelope, message::Message};

pub mod stub;

/// Blocking Transport method for emails
pub trait Transport {
    /// Response produced by the Transport
    type Ok;
    /// Error produced by the Transport
    type Error;

    /// Sends the email
    fn send(&self, message: &Message) -> Result<Self::Ok, Self::Error> {
        let raw = message.formatted();
        self.send_raw(message.envelope(), &raw)
    }

    /// Sends an already formatted email
    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error>;
}
