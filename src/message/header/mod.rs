//! Headers widely used in email messages
// https://tools.ietf.org/html/rfc5322#section-2.2

use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{self, Display, Formatter, Write},
    ops::Deref,
};

use email_encoding::headers::writer::EmailWriter;

pub use self::{content::*, content_type::*, date::*, mailbox::*, textual::*};
use super::{encoded_word, Charset};
use crate::BoxError;

mod content;
mod content_type;
mod date;
mod mailbox;
mod textual;

/// Represents an email header
///
/// Email header as defined in [RFC5322](https://datatracker.ietf.org/doc/html/rfc5322) and extensions.
pub trait Header: Clone {
    /// Name of the header, e.g. `Subject`
    fn name() -> HeaderName;

    /// Parses the raw (unencoded) header value
    fn parse(s: &str) -> Result<Self, BoxError>;

    /// Renders the header, both raw and encoded for the wire
    fn display(&self) -> HeaderValue;
}

/// A set of email headers
///
/// Lookups are case-insensitive. Headers keep the order in which they were
/// first set.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<HeaderValue>,
}

impl Headers {
    /// Create an empty `Headers`
    #[inline]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Create an empty `Headers` with a pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            headers: Vec::with_capacity(capacity),
        }
    }

    /// Returns a copy of a `Header` present in `Headers`
    ///
    /// Returns `None` if the header is missing or its value can't be parsed.
    pub fn get<H: Header>(&self) -> Option<H> {
        self.get_raw(&H::name()).and_then(|raw| H::parse(raw).ok())
    }

    /// Sets `header` into `Headers`, overriding `header` if it was already present
    pub fn set<H: Header>(&mut self, header: H) {
        self.set_raw(header.display());
    }

    /// Remove `H` from `Headers`, returning the value if present
    pub fn remove<H: Header>(&mut self) -> Option<H> {
        self.remove_raw(&H::name())
            .and_then(|value| H::parse(&value.raw_value).ok())
    }

    /// Returns `true` if a header named `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.find_header(name).is_some()
    }

    /// Returns the raw value of a header named `name`, if present
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.find_header(name).map(|value| value.raw_value.as_str())
    }

    /// Sets a raw header, overriding a header of the same name
    pub fn set_raw(&mut self, value: HeaderValue) {
        match self.find_header_mut(&value.name) {
            Some(current) => *current = value,
            None => self.headers.push(value),
        }
    }

    /// Remove a raw header named `name`, returning it if present
    pub fn remove_raw(&mut self, name: &str) -> Option<HeaderValue> {
        self.find_header_index(name).map(|i| self.headers.remove(i))
    }

    /// Iterates over the headers, in order
    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.iter()
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if there is no header
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn find_header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|value| name.eq_ignore_ascii_case(&value.name))
    }

    fn find_header_mut(&mut self, name: &str) -> Option<&mut HeaderValue> {
        self.headers
            .iter_mut()
            .find(|value| name.eq_ignore_ascii_case(&value.name))
    }

    fn find_header_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|value| name.eq_ignore_ascii_case(&value.name))
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for value in &self.headers {
            value.fmt(f)?;
        }

        Ok(())
    }
}

/// A possible error when converting a `HeaderName` from another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct InvalidHeaderName;

impl Display for InvalidHeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid header name")
    }
}

impl StdError for InvalidHeaderName {}

/// A valid header name
///
/// Header names are printable US-ASCII, without spaces or colons.
#[derive(Debug, Clone)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    /// Creates a new header name
    pub fn new_from_ascii(ascii: String) -> Result<Self, InvalidHeaderName> {
        if !ascii.is_empty() && ascii.bytes().all(is_header_name_byte) {
            Ok(Self(Cow::Owned(ascii)))
        } else {
            Err(InvalidHeaderName)
        }
    }

    /// Creates a new header name, panics on invalid name
    pub const fn new_from_ascii_str(ascii: &'static str) -> Self {
        let bytes = ascii.as_bytes();
        if bytes.is_empty() {
            panic!("header name must not be empty");
        }

        let mut i = 0;
        while i < bytes.len() {
            if !is_header_name_byte(bytes[i]) {
                panic!("header name must be printable ascii without colon");
            }
            i += 1;
        }

        Self(Cow::Borrowed(ascii))
    }
}

const fn is_header_name_byte(b: u8) -> bool {
    b >= 33 && b <= 126 && b != b':'
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl Deref for HeaderName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for HeaderName {
    #[inline]
    fn as_ref(&self) -> &str {
        self
    }
}

impl PartialEq<HeaderName> for HeaderName {
    fn eq(&self, other: &HeaderName) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl Eq for HeaderName {}

/// A header with its raw value and the form it takes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValue {
    name: HeaderName,
    raw_value: String,
    encoded_value: String,
}

impl HeaderValue {
    /// Creates a header from its raw value
    ///
    /// Text that isn't plain ASCII is sent as a `UTF-8` encoded word.
    pub fn new(name: HeaderName, raw_value: String) -> Self {
        Self::new_with_charset(name, raw_value, Charset::utf_8())
    }

    /// Creates a header from its raw value, encoding non ASCII text in `charset`
    pub fn new_with_charset(name: HeaderName, raw_value: String, charset: Charset) -> Self {
        let mut encoded_value = String::with_capacity(raw_value.len());
        HeaderValueEncoder::encode(&name, &raw_value, charset, &mut encoded_value)
            .expect("encode header value");
        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Creates a header whose wire form has already been computed
    ///
    /// `encoded_value` is written as is, it must be valid header text.
    pub fn dangerous_new_pre_encoded(
        name: HeaderName,
        raw_value: String,
        encoded_value: String,
    ) -> Self {
        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Name of the header
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Value of the header before encoding
    pub fn get_raw(&self) -> &str {
        &self.raw_value
    }

    /// Value of the header as it is written on the wire
    pub fn get_encoded(&self) -> &str {
        &self.encoded_value
    }
}

/// Writes a header value, turning runs of non plain words into encoded words
/// and folding long lines
struct HeaderValueEncoder<'a> {
    writer: EmailWriter<'a>,
    charset: Charset,
    encode_buf: String,
}

impl<'a> HeaderValueEncoder<'a> {
    fn encode(
        name: &str,
        value: &str,
        charset: Charset,
        out: &'a mut dyn Write,
    ) -> fmt::Result {
        let mut encoder = Self {
            writer: EmailWriter::new(out, name.len() + ": ".len(), 0, false),
            charset,
            encode_buf: String::new(),
        };

        for word in value.split_inclusive(' ') {
            if encoded_word::is_plain(word) {
                encoder.flush_encode_buf()?;
                encoder.write_plain(word)?;
            } else {
                encoder.encode_buf.push_str(word);
            }
        }

        encoder.flush_encode_buf()
    }

    fn write_plain(&mut self, word: &str) -> fmt::Result {
        match word.strip_suffix(' ') {
            Some(word) => {
                self.writer.folding().write_str(word)?;
                self.writer.space();
            }
            None => self.writer.folding().write_str(word)?,
        }

        Ok(())
    }

    fn flush_encode_buf(&mut self) -> fmt::Result {
        if self.encode_buf.is_empty() {
            return Ok(());
        }

        let buf = std::mem::take(&mut self.encode_buf);
        match buf.strip_suffix(' ') {
            Some(text) => {
                encoded_word::encode(text, self.charset, &mut self.writer)?;
                self.writer.space();
            }
            None => encoded_word::encode(&buf, self.charset, &mut self.writer)?,
        }

        Ok(())
    }
}

impl Display for HeaderValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\r\n", self.name, self.encoded_value)
    }
}
