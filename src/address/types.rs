//! Bare `user@domain` addresses, as used for envelopes and bounce addresses

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    net::IpAddr,
    str::FromStr,
};

use email_address::EmailAddress;
use idna::domain_to_ascii;

/// An email address without display name
///
/// Kept as the text it was given in, split at the last `@`. International
/// domains are checked through their ASCII form but stored unchanged.
///
/// ```
/// use missive::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let bounce = "bounce+list@example.com".parse::<Address>()?;
/// assert_eq!(bounce.user(), "bounce+list");
/// assert_eq!(bounce.domain(), "example.com");
/// assert_eq!(bounce, Address::new("bounce+list", "example.com")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    text: String,
    at: usize,
}

impl Address {
    /// Joins a user and a domain, checking both
    pub fn new<U: AsRef<str>, D: AsRef<str>>(user: U, domain: D) -> Result<Self, AddressError> {
        (user, domain).try_into()
    }

    /// The part before the `@`
    pub fn user(&self) -> &str {
        &self.text[..self.at]
    }

    /// The part after the `@`
    pub fn domain(&self) -> &str {
        &self.text[self.at + 1..]
    }
}

fn check_user(user: &str) -> Result<(), AddressError> {
    if EmailAddress::is_valid_local_part(user) {
        Ok(())
    } else {
        Err(AddressError::InvalidUser)
    }
}

fn check_domain(domain: &str) -> Result<(), AddressError> {
    if is_ascii_domain(domain) {
        return Ok(());
    }
    match domain_to_ascii(domain) {
        Ok(ascii) if is_ascii_domain(&ascii) => Ok(()),
        _ => Err(AddressError::InvalidDomain),
    }
}

// `[2001:db8::1]`, `[192.0.2.1]` and bare IPs are accepted as literals
fn is_ascii_domain(domain: &str) -> bool {
    let literal = domain
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(domain);

    EmailAddress::is_valid_domain(domain) || literal.parse::<IpAddr>().is_ok()
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Self, AddressError> {
        let (user, domain) = text.rsplit_once('@').ok_or(AddressError::MissingParts)?;
        check_user(user)?;
        check_domain(domain)?;

        Ok(Address {
            text: text.to_owned(),
            at: user.len(),
        })
    }
}

impl<U, D> TryFrom<(U, D)> for Address
where
    U: AsRef<str>,
    D: AsRef<str>,
{
    type Error = AddressError;

    fn try_from((user, domain): (U, D)) -> Result<Self, Self::Error> {
        let (user, domain) = (user.as_ref(), domain.as_ref());
        check_user(user)?;
        check_domain(domain)?;

        Ok(Address {
            text: format!("{user}@{domain}"),
            at: user.len(),
        })
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Why a string was refused as an address
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum AddressError {
    /// No `@` separating user and domain
    MissingParts,
    /// The user part is not a valid local part
    InvalidUser,
    /// The domain is neither a host name nor an IP literal
    InvalidDomain,
    /// The text is not a mailbox at all
    InvalidInput,
    /// A list held no address
    EmptyList,
}

impl Error for AddressError {}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            AddressError::MissingParts => "missing `@` between user and domain",
            AddressError::InvalidUser => "invalid user part",
            AddressError::InvalidDomain => "invalid domain part",
            AddressError::InvalidInput => "not a mailbox",
            AddressError::EmptyList => "no address given",
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Address, AddressError};

    #[test]
    fn bounce_address_parts() {
        let bounce: Address = "bounce+list@example.com".parse().unwrap();
        assert_eq!(bounce.user(), "bounce+list");
        assert_eq!(bounce.domain(), "example.com");
        assert_eq!(bounce, Address::new("bounce+list", "example.com").unwrap());
        assert_eq!(bounce.to_string(), "bounce+list@example.com");
    }

    #[test]
    fn builder_rejects() {
        assert_eq!("invalid-email".parse::<Address>(), Err(AddressError::MissingParts));
        assert_eq!("@example.com".parse::<Address>(), Err(AddressError::InvalidUser));
        assert_eq!(
            "reply to@example.com".parse::<Address>(),
            Err(AddressError::InvalidUser)
        );
        assert_eq!(
            "bounce@exa mple.com".parse::<Address>(),
            Err(AddressError::InvalidDomain)
        );
        assert_eq!(
            Address::new("a".repeat(100), "example.com"),
            Err(AddressError::InvalidUser)
        );
    }

    #[test]
    fn literal_and_international_domains() {
        assert_eq!(
            "postmaster@[2001:db8::1]".parse::<Address>().unwrap().domain(),
            "[2001:db8::1]"
        );
        assert!("postmaster@192.0.2.1".parse::<Address>().is_ok());

        let address: Address = "kontakt@bücher.example".parse().unwrap();
        assert_eq!(address.domain(), "bücher.example");
    }

    #[test]
    fn error_text() {
        assert_eq!(
            AddressError::MissingParts.to_string(),
            "missing `@` between user and domain"
        );
        assert_eq!(AddressError::EmptyList.to_string(), "no address given");
    }
}
