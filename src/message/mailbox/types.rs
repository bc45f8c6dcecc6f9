use std::{
    fmt::{Display, Formatter, Result as FmtResult, Write},
    slice::Iter,
    str::FromStr,
};

use chumsky::prelude::*;
use email_encoding::headers::writer::EmailWriter;

use super::parsers;
use crate::{
    address::{Address, AddressError},
    message::{encoded_word, Charset},
};

/// An email address with an optional display name
///
/// Written as _Some Name \<user@domain.tld\>_ or _withoutname@domain.tld_.
/// A mailbox may also carry the charset its display name is encoded with
/// when it goes on the wire; names are sent as `UTF-8` otherwise.
///
/// ```
/// # use missive::{Address, Mailbox};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mailbox: Mailbox = "John Smith <example@email.com>".parse()?;
/// assert_eq!(mailbox.name.as_deref(), Some("John Smith"));
/// assert_eq!(mailbox.email, Address::new("example", "email.com")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// The name associated with the address.
    pub name: Option<String>,

    /// The email address itself.
    pub email: Address,

    charset: Option<Charset>,
}

impl Mailbox {
    /// Creates a new `Mailbox` from an address and an optional name
    pub fn new(name: Option<String>, email: Address) -> Self {
        Mailbox {
            name,
            email,
            charset: None,
        }
    }

    /// Sets the charset the display name is encoded with
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    /// The charset of the display name, if one was set
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    /// The display name, trimmed, if it isn't blank
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Writes the wire form of the mailbox
    ///
    /// Non ASCII names become encoded words in the mailbox charset.
    pub(crate) fn encode(&self, w: &mut EmailWriter<'_>) -> FmtResult {
        if let Some(name) = self.display_name() {
            match self.charset {
                Some(charset) if charset != Charset::utf_8() && !encoded_word::is_plain(name) => {
                    encoded_word::encode(name, charset, w)?;
                }
                _ => email_encoding::headers::quoted_string::encode(name, w)?,
            }
            w.space();
            w.write_char('<')?;
        }

        w.write_str(self.email.as_ref())?;

        if self.display_name().is_some() {
            w.write_char('>')?;
        }

        Ok(())
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.display_name() {
            Some(name) => {
                write_word(f, name)?;
                write!(f, " <{}>", self.email)
            }
            None => self.email.fmt(f),
        }
    }
}

impl<S: Into<String>, T: Into<String>> TryFrom<(S, T)> for Mailbox {
    type Error = AddressError;

    fn try_from((name, address): (S, T)) -> Result<Self, Self::Error> {
        Ok(Mailbox::new(Some(name.into()), address.into().parse()?))
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Mailbox, Self::Err> {
        let (name, (user, domain)) = parsers::mailbox()
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?;

        Ok(Mailbox::new(name, Address::new(user, domain)?))
    }
}

impl From<Address> for Mailbox {
    fn from(email: Address) -> Self {
        Self::new(None, email)
    }
}

/// An ordered list of [`Mailbox`]es
///
/// Written as _Some Name \<user@domain.tld\>, withoutname@domain.tld, ..._
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mailboxes(Vec<Mailbox>);

impl Mailboxes {
    /// Creates an empty list
    pub fn new() -> Self {
        Mailboxes(Vec::new())
    }

    /// Adds a [`Mailbox`] to the list, in a builder style pattern
    ///
    /// ```
    /// use missive::{Address, Mailbox, Mailboxes};
    ///
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let mailboxes = Mailboxes::new()
    ///     .with(Mailbox::new(None, Address::new("a", "example.com")?))
    ///     .with("B <b@example.com>".parse()?);
    /// assert_eq!(mailboxes.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with(mut self, mbox: Mailbox) -> Self {
        self.0.push(mbox);
        self
    }

    /// Adds a [`Mailbox`] at the end of the list
    pub fn push(&mut self, mbox: Mailbox) {
        self.0.push(mbox);
    }

    /// Extracts the first [`Mailbox`], if any
    pub fn into_single(self) -> Option<Mailbox> {
        self.0.into_iter().next()
    }

    /// Iterates over the mailboxes, in order
    pub fn iter(&self) -> Iter<'_, Mailbox> {
        self.0.iter()
    }

    /// Number of mailboxes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn encode(&self, w: &mut EmailWriter<'_>) -> FmtResult {
        for (i, mailbox) in self.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
                w.space();
            }
            mailbox.encode(w)?;
        }

        Ok(())
    }
}

impl From<Mailbox> for Mailboxes {
    fn from(mailbox: Mailbox) -> Self {
        Mailboxes(vec![mailbox])
    }
}

impl From<Vec<Mailbox>> for Mailboxes {
    fn from(vec: Vec<Mailbox>) -> Self {
        Mailboxes(vec)
    }
}

impl From<Mailboxes> for Vec<Mailbox> {
    fn from(mailboxes: Mailboxes) -> Vec<Mailbox> {
        mailboxes.0
    }
}

impl AsRef<[Mailbox]> for Mailboxes {
    fn as_ref(&self) -> &[Mailbox] {
        &self.0
    }
}

impl FromIterator<Mailbox> for Mailboxes {
    fn from_iter<T: IntoIterator<Item = Mailbox>>(iter: T) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl Extend<Mailbox> for Mailboxes {
    fn extend<T: IntoIterator<Item = Mailbox>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Mailboxes {
    type Item = Mailbox;
    type IntoIter = ::std::vec::IntoIter<Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mailboxes {
    type Item = &'a Mailbox;
    type IntoIter = Iter<'a, Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Mailboxes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut iter = self.iter();

        if let Some(mbox) = iter.next() {
            mbox.fmt(f)?;

            for mbox in iter {
                f.write_str(", ")?;
                mbox.fmt(f)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Mailboxes {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parsers::mailbox_list()
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?
            .into_iter()
            .map(|(name, (user, domain))| {
                Address::new(user, domain).map(|email| Mailbox::new(name, email))
            })
            .collect()
    }
}

// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.6
fn write_word(f: &mut Formatter<'_>, s: &str) -> FmtResult {
    if s.bytes().all(is_valid_atom_char) {
        f.write_str(s)
    } else {
        // Quoted string: https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.5
        f.write_char('"')?;
        for c in s.chars() {
            write_quoted_string_char(f, c)?;
        }
        f.write_char('"')
    }
}

// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.4
fn is_valid_atom_char(c: u8) -> bool {
    matches!(c,
        // Allowed between atoms
        b'\t' | b' ' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'/' |
        b'0'..=b'9' | b'=' | b'?' | b'A'..=b'Z' | b'^' | b'_' | b'`' |
        b'a'..=b'z' | b'{' | b'|' | b'}' | b'~' |
        // UTF-8 bytes, encoded later on
        128..=255)
}

// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.5
fn write_quoted_string_char(f: &mut Formatter<'_>, c: char) -> FmtResult {
    match c {
        // Can't be quoted, unfold
        '\n' | '\r' => f.write_char(' '),

        // qtext, or white space around qcontent
        c if matches!(
            u32::from(c),
            9 | 32 | 1..=8 | 11 | 12 | 14..=31 | 127 | 33 | 35..=91 | 93..=126 | 128..
        ) =>
        {
            f.write_char(c)
        }

        // quoted-pair https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.2
        _ => {
            f.write_char('\\')?;
            f.write_char(c)
        }
    }
}
