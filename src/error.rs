//! Error type for email composition

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

use crate::{address::AddressError, BoxError};

/// Error type for email composition
///
/// Every variant names the field it was raised for, so that callers can
/// report which part of the draft needs fixing.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A single address argument was absent
    ///
    /// This signals a programming error in the caller, unlike
    /// [`Error::InvalidAddress`] which reports bad data.
    NullArgument {
        /// The address field being written, e.g. `"reply-to"`
        field: &'static str,
    },
    /// An address, or a list of addresses, could not be accepted
    InvalidAddress {
        /// The address field being written, e.g. `"bcc"`
        field: &'static str,
        /// The offending input, absent when a whole list was missing or empty
        value: Option<String>,
        /// Why the input was rejected
        source: AddressError,
    },
    /// A header or content argument was missing, empty or malformed
    IllegalInput {
        /// The argument that was rejected
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },
    /// A field required to build the message has not been set
    MissingField(&'static str),
    /// The message has already been built from this draft
    AlreadyBuilt,
    /// The mail session could not be configured
    Configuration(String),
    /// The charset label is not known
    UnsupportedCharset(String),
    /// The transport failed to deliver the message
    Transport(BoxError),
}

impl Error {
    pub(crate) fn invalid_address(field: &'static str, value: &str, source: AddressError) -> Self {
        Error::InvalidAddress {
            field,
            value: Some(value.to_owned()),
            source,
        }
    }

    pub(crate) fn empty_address_list(field: &'static str) -> Self {
        Error::InvalidAddress {
            field,
            value: None,
            source: AddressError::EmptyList,
        }
    }

    pub(crate) fn configuration<S: Into<String>>(reason: S) -> Self {
        Error::Configuration(reason.into())
    }

    /// Returns true if the caller passed an absent argument
    pub fn is_null_argument(&self) -> bool {
        matches!(self, Error::NullArgument { .. })
    }

    /// Returns true if an address or address list was rejected
    pub fn is_invalid_address(&self) -> bool {
        matches!(self, Error::InvalidAddress { .. })
    }

    /// Returns true if a header or content argument was rejected
    pub fn is_illegal_input(&self) -> bool {
        matches!(self, Error::IllegalInput { .. })
    }

    /// Returns true if the message lacked a required field at build time
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Error::MissingField(_))
    }

    /// Returns true if the draft had already been built
    pub fn is_already_built(&self) -> bool {
        matches!(self, Error::AlreadyBuilt)
    }

    /// Returns true if the session configuration was incomplete or malformed
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::NullArgument { field } => write!(f, "{field} address must not be null"),
            Error::InvalidAddress {
                field,
                value: Some(value),
                source,
            } => write!(f, "invalid {field} address `{value}`: {source}"),
            Error::InvalidAddress {
                field,
                value: None,
                source,
            } => write!(f, "invalid {field} address list: {source}"),
            Error::IllegalInput { field, reason } => write!(f, "{field} {reason}"),
            Error::MissingField(field) => write!(f, "missing {field}, cannot build message"),
            Error::AlreadyBuilt => f.write_str("the message has already been built"),
            Error::Configuration(reason) => write!(f, "invalid mail session: {reason}"),
            Error::UnsupportedCharset(label) => write!(f, "unsupported charset `{label}`"),
            Error::Transport(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidAddress { source, .. } => Some(source),
            Error::Transport(err) => Some(&**err),
            _ => None,
        }
    }
}
