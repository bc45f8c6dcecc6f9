//! Missive is an email message builder.
//!
//! It accumulates a sender, recipients, headers and content into an [`Email`]
//! draft and turns that draft, exactly once, into an immutable [`Message`]
//! that can be handed to a [`Transport`]. The SMTP session parameters needed
//! to later deliver the message (host, port, credentials, timeouts) are kept
//! alongside as plain configuration, see [`SessionConfig`] and [`Session`].
//!
//! Missive does not speak SMTP itself.
//!
//! ## Usage
//!
//! ```rust
//! use missive::Email;
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut email = Email::new();
//! email
//!     .set_host_name("smtp.example.com")
//!     .set_from("sender@example.com")?
//!     .add_to("recipient@example.com")?
//!     .add_reply_to_named("replyto@example.com", "Reply To")?
//!     .add_header("X-Custom-Header", "CustomValue")?
//!     .set_subject("Test Subject")
//!     .set_content("This is a test email.", "text/plain")?;
//!
//! let message = email.build_mime_message()?;
//! assert_eq!(message.header("X-Custom-Header"), Some("CustomValue"));
//! assert_eq!(message.reply_to().iter().count(), 1);
//!
//! let session = email.mail_session()?;
//! assert_eq!(session.property("mail.smtp.host"), Some("smtp.example.com"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! * **hostname** (default): use the local hostname as the domain of generated `Message-ID`s
//! * **tracing** (default): log through the [`tracing`] crate
//! * **serde**: serialize and deserialize [`SessionConfig`], [`Address`] and friends
//!
//! [`tracing`]: https://docs.rs/tracing

#![doc(html_root_url = "https://docs.rs/crate/missive/0.1.0")]
#![forbid(unsafe_code)]
#![deny(
    unstable_features,
    unused_import_braces,
    rust_2018_idioms,
    clippy::string_add,
    clippy::string_add_assign,
    clippy::clone_on_ref_ptr,
    clippy::verbose_file_reads,
    clippy::unnecessary_self_imports,
    clippy::string_to_string,
    clippy::mem_forget,
    clippy::cast_lossless,
    clippy::inefficient_to_string,
    clippy::inline_always,
    clippy::linkedlist,
    clippy::macro_use_imports,
    clippy::manual_assert,
    clippy::unnecessary_join,
    clippy::wildcard_imports,
    clippy::zero_sized_map_values
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
mod email;
pub mod error;
pub mod message;
pub mod session;
pub mod transport;

use std::error::Error as StdError;

pub use crate::{
    address::{Address, Envelope},
    email::Email,
    error::Error,
    message::{Mailbox, Mailboxes, Message, RecipientType},
    session::{Credentials, Session, SessionConfig},
    transport::Transport,
};

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;
