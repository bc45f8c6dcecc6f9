use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use encoding_rs::Encoding;

use crate::Error;

/// A character set used to encode header text and message bodies
///
/// Any label known to the [WHATWG Encoding Standard](https://encoding.spec.whatwg.org/#names-and-labels)
/// is accepted. The charset remembers its canonical name, so `utf8` and `UTF-8`
/// compare equal.
///
/// ```
/// use missive::message::Charset;
///
/// let charset: Charset = "utf8".parse().unwrap();
/// assert_eq!(charset.name(), "UTF-8");
/// assert!("no-such-charset".parse::<Charset>().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Charset(&'static Encoding);

impl Charset {
    /// The `UTF-8` charset
    pub fn utf_8() -> Self {
        Charset(encoding_rs::UTF_8)
    }

    /// Looks up a charset by label
    pub fn for_label(label: &str) -> Result<Self, Error> {
        Encoding::for_label_no_replacement(label.trim().as_bytes())
            .map(|encoding| Charset(encoding.output_encoding()))
            .ok_or_else(|| Error::UnsupportedCharset(label.to_owned()))
    }

    /// Canonical name of the charset
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Encodes `text` in this charset
    ///
    /// Characters the charset cannot represent are replaced with numeric
    /// character references.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _, _) = self.0.encode(text);
        bytes
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::utf_8()
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Charset {}

impl Hash for Charset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}
