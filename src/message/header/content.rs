use std::{
    fmt::{Display, Formatter as FmtFormatter, Result as FmtResult},
    str::FromStr,
};

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// `Content-Transfer-Encoding` of the body
///
/// The builder picks the encoding from the body, so this header
/// shouldn't need to be set manually.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentTransferEncoding {
    /// Short lines of US-ASCII, sent unchanged
    SevenBit,
    /// Anything else
    Base64,
}

impl ContentTransferEncoding {
    /// Chooses the encoding for a body
    pub fn for_body(body: &[u8]) -> Self {
        let seven_bit = body.is_ascii()
            && !body.contains(&0)
            && body.split(|&b| b == b'\n').all(|line| line.len() <= 998);
        if seven_bit {
            Self::SevenBit
        } else {
            Self::Base64
        }
    }
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.write_str(match *self {
            Self::SevenBit => "7bit",
            Self::Base64 => "base64",
        })
    }
}

impl FromStr for ContentTransferEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("7bit") => Ok(Self::SevenBit),
            s if s.eq_ignore_ascii_case("base64") => Ok(Self::Base64),
            _ => Err(s.into()),
        }
    }
}

impl Header for ContentTransferEncoding {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Transfer-Encoding")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(s.parse()?)
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.to_string())
    }
}

/// `MIME-Version` header
///
/// Only version `1.0` exists.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MimeVersion;

/// `MIME-Version: 1.0`
pub const MIME_VERSION_1_0: MimeVersion = MimeVersion;

impl Header for MimeVersion {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("MIME-Version")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        match s.trim() {
            "1.0" => Ok(MimeVersion),
            other => Err(format!("unsupported MIME version {other}").into()),
        }
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), String::from("1.0"))
    }
}
