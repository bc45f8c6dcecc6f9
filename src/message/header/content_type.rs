use std::{
    error::Error as StdError,
    fmt::{self, Display},
    str::FromStr,
};

use mime::Mime;

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// `Content-Type` of the body
///
/// Defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-5)
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType(Mime);

impl ContentType {
    /// A `ContentType` of type `text/plain`
    pub const TEXT_PLAIN: ContentType = Self::from_mime(mime::TEXT_PLAIN);

    /// A `ContentType` of type `text/html`
    pub const TEXT_HTML: ContentType = Self::from_mime(mime::TEXT_HTML);

    /// Parse `s` into `ContentType`
    pub fn parse(s: &str) -> Result<ContentType, ContentTypeErr> {
        Ok(Self::from_mime(s.parse().map_err(ContentTypeErr)?))
    }

    pub(crate) const fn from_mime(mime: Mime) -> Self {
        Self(mime)
    }

    /// The underlying MIME type
    pub fn mime(&self) -> &Mime {
        &self.0
    }

    /// `type/subtype`, without parameters
    pub fn essence(&self) -> &str {
        self.0.essence_str()
    }

    /// The `charset` parameter, if any
    pub fn charset(&self) -> Option<&str> {
        self.0.get_param(mime::CHARSET).map(|charset| charset.as_str())
    }

    /// Adds a `charset` parameter to `text/*` types that don't already have one
    pub(crate) fn with_default_charset(self, charset: &str) -> Self {
        if self.0.type_() != mime::TEXT || self.charset().is_some() {
            return self;
        }

        match format!("{}; charset={}", self.0, charset).parse() {
            Ok(mime) => Self(mime),
            Err(_) => self,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Header for ContentType {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Type")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(s.parse()?))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Mime> for ContentType {
    fn from(mime: Mime) -> Self {
        Self::from_mime(mime)
    }
}

/// An error occurred while trying to [`ContentType::parse`].
#[derive(Debug)]
pub struct ContentTypeErr(mime::FromStrError);

impl StdError for ContentTypeErr {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl Display for ContentTypeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
