use std::time::SystemTime;

use httpdate::HttpDate;

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// `Date` header, the time a draft was built or the date set on it
///
/// Written in the RFC 5322 form with a `-0000` zone, whole seconds only.
/// <https://tools.ietf.org/html/rfc5322#section-3.3>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(HttpDate);

impl Date {
    /// Date of `time`, truncated to the second
    pub fn new(time: SystemTime) -> Self {
        Self(HttpDate::from(time))
    }
}

// httpdate speaks `GMT`, an obsolete zone per RFC 5322 section 4.3
const HTTP_ZONE: &str = " GMT";
const MAIL_ZONE: &str = " -0000";

impl Header for Date {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Date")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        let date = match s.trim().strip_suffix(MAIL_ZONE) {
            Some(date) => format!("{date}{HTTP_ZONE}").parse::<HttpDate>()?,
            None => s.trim().parse::<HttpDate>()?,
        };
        Ok(Self(date))
    }

    fn display(&self) -> HeaderValue {
        let http = self.0.to_string();
        let value = match http.strip_suffix(HTTP_ZONE) {
            Some(date) => format!("{date}{MAIL_ZONE}"),
            None => http,
        };
        HeaderValue::new(Self::name(), value)
    }
}

impl From<SystemTime> for Date {
    fn from(time: SystemTime) -> Self {
        Self::new(time)
    }
}

impl From<Date> for SystemTime {
    fn from(date: Date) -> SystemTime {
        date.0.into()
    }
}
