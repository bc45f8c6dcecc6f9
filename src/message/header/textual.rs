use super::{Header, HeaderName, HeaderValue};
use crate::{message::Charset, BoxError};

/// `Subject` of the message, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.5)
///
/// Non ASCII subjects are sent as an encoded word in the subject's charset,
/// `UTF-8` unless another one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    text: String,
    charset: Option<Charset>,
}

impl Subject {
    /// Creates a subject encoded in `charset`
    pub fn with_charset(text: String, charset: Charset) -> Self {
        Self {
            text,
            charset: Some(charset),
        }
    }

    /// The charset the subject is encoded with, if one was set
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }
}

impl Header for Subject {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Subject")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self::from(String::from(s)))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new_with_charset(
            Self::name(),
            self.text.clone(),
            self.charset.unwrap_or_default(),
        )
    }
}

impl From<String> for Subject {
    #[inline]
    fn from(text: String) -> Self {
        Self {
            text,
            charset: None,
        }
    }
}

impl AsRef<str> for Subject {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// `Message-ID` header. Contains a unique message identifier,
/// defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl Header for MessageId {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Message-ID")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(String::from(s.trim())))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

impl From<String> for MessageId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for MessageId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}
