//! The immutable message produced by an [`Email`](crate::Email) draft
//!
//! A [`Message`] holds the headers, the envelope and the charset encoded
//! body of a single part email. It is only created by
//! [`Email::build_mime_message`](crate::Email::build_mime_message) and can
//! then be read back or formatted for a transport.
//!
//! ```rust
//! use missive::{Email, RecipientType};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut email = Email::new();
//! email
//!     .set_from_named("nobody@domain.tld", "NoBody")?
//!     .add_to("hei@domain.tld")?
//!     .add_bcc("yuin@domain.tld")?
//!     .set_subject("Happy new year")
//!     .set_content("Be happy!", "text/plain")?;
//!
//! let message = email.build_mime_message()?;
//! assert_eq!(message.subject(), Some("Happy new year"));
//! assert_eq!(message.recipients(RecipientType::Bcc).len(), 1);
//! assert_eq!(message.envelope().to().len(), 2);
//!
//! let formatted = String::from_utf8(message.formatted())?;
//! assert!(formatted.contains("To: hei@domain.tld\r\n"));
//! assert!(!formatted.contains("Bcc:"));
//! assert!(formatted.ends_with("\r\n\r\nBe happy!"));
//! # Ok(())
//! # }
//! ```

pub use self::{charset::Charset, mailbox::*};

mod charset;
pub(crate) mod encoded_word;
pub mod header;
mod mailbox;

use std::{
    fmt::{self, Display, Formatter},
    time::SystemTime,
};

use uuid::Uuid;

use crate::address::Envelope;
use header::{ContentTransferEncoding, ContentType, Header, Headers, MessageId};

const DEFAULT_MESSAGE_ID_DOMAIN: &str = "localhost";

/// The role of a recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientType {
    /// Primary recipients, `To` header
    To,
    /// Carbon copy, `Cc` header
    Cc,
    /// Blind carbon copy, `Bcc` header
    Bcc,
}

impl Display for RecipientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecipientType::To => "to",
            RecipientType::Cc => "cc",
            RecipientType::Bcc => "bcc",
        })
    }
}

/// Email message which can be formatted
#[derive(Clone, Debug)]
pub struct Message {
    headers: Headers,
    envelope: Envelope,
    body: Vec<u8>,
}

impl Message {
    pub(crate) fn new(headers: Headers, envelope: Envelope, body: Vec<u8>) -> Self {
        Self {
            headers,
            envelope,
            body,
        }
    }

    /// Get the headers from the Message
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw value of the header named `name`, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_raw(name)
    }

    /// Get `Message` envelope
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The sender, from the `From` header
    pub fn from(&self) -> Option<Mailbox> {
        self.headers
            .get::<header::From>()
            .and_then(|header::From(mailboxes)| mailboxes.into_single())
    }

    /// The recipients of the given role, empty when there are none
    pub fn recipients(&self, kind: RecipientType) -> Mailboxes {
        match kind {
            RecipientType::To => self.mailboxes::<header::To>(),
            RecipientType::Cc => self.mailboxes::<header::Cc>(),
            RecipientType::Bcc => self.mailboxes::<header::Bcc>(),
        }
    }

    /// The `Reply-To` mailboxes, empty when there are none
    pub fn reply_to(&self) -> Mailboxes {
        self.mailboxes::<header::ReplyTo>()
    }

    /// The subject, as given to the builder
    pub fn subject(&self) -> Option<&str> {
        self.header("Subject")
    }

    /// The `Content-Type` of the body
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers.get::<ContentType>()
    }

    /// The `Date` header
    pub fn sent_date(&self) -> Option<SystemTime> {
        self.headers.get::<header::Date>().map(SystemTime::from)
    }

    /// The `Message-ID` header
    pub fn message_id(&self) -> Option<&str> {
        self.header(&MessageId::name())
    }

    /// The body, encoded in the message charset
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get message content formatted for SMTP
    ///
    /// The `Bcc` header is left out.
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 512);

        for value in self.headers.iter() {
            if value.name() != &header::Bcc::name() {
                out.extend_from_slice(value.to_string().as_bytes());
            }
        }
        out.extend_from_slice(b"\r\n");

        let encoding = self
            .headers
            .get::<ContentTransferEncoding>()
            .unwrap_or_else(|| ContentTransferEncoding::for_body(&self.body));
        match encoding {
            ContentTransferEncoding::SevenBit => out.extend_from_slice(&self.body),
            ContentTransferEncoding::Base64 => write_base64(&mut out, &self.body),
        }

        out
    }

    fn mailboxes<H>(&self) -> Mailboxes
    where
        H: Header + Into<Mailboxes>,
    {
        self.headers.get::<H>().map(Into::into).unwrap_or_default()
    }
}

fn write_base64(out: &mut Vec<u8>, body: &[u8]) {
    let len = email_encoding::body::base64::encoded_len(body.len());

    let mut encoded = String::with_capacity(len);
    email_encoding::body::base64::encode(body, &mut encoded).expect("encode body as base64");
    out.extend_from_slice(encoded.as_bytes());
}

/// Generates a `<UUID@HOSTNAME>` message id
///
/// `localhost` is used when the hostname is unknown.
pub(crate) fn make_message_id() -> MessageId {
    #[cfg(feature = "hostname")]
    let hostname = hostname::get()
        .ok()
        .and_then(|s| s.into_string().ok())
        .unwrap_or_else(|| DEFAULT_MESSAGE_ID_DOMAIN.to_owned());
    #[cfg(not(feature = "hostname"))]
    let hostname = DEFAULT_MESSAGE_ID_DOMAIN.to_owned();

    // https://tools.ietf.org/html/rfc5322#section-3.6.4
    MessageId::from(format!("<{}@{}>", Uuid::new_v4(), hostname))
}
