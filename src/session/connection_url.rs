use std::borrow::Cow;

use url::Url;

use super::{
    config::{SMTP_PORT, SUBMISSIONS_PORT, SUBMISSION_PORT},
    Credentials, SessionConfig,
};
use crate::Error;

/// Create a new `SessionConfig` from a connection URL
pub(crate) fn from_connection_url(connection_url: &str) -> Result<SessionConfig, Error> {
    let connection_url = Url::parse(connection_url)
        .map_err(|err| Error::configuration(format!("invalid connection url: {err}")))?;
    let tls: Option<String> = connection_url
        .query_pairs()
        .find(|(k, _)| k == "tls")
        .map(|(_, v)| v.to_string());

    let host = connection_url
        .host_str()
        .ok_or_else(|| Error::configuration("smtp host undefined"))?;

    let mut config = SessionConfig::new().host_name(host);

    match (connection_url.scheme(), tls.as_deref()) {
        ("smtp", None) => {
            config = config.smtp_port(connection_url.port().unwrap_or(SMTP_PORT));
        }
        ("smtp", Some("required")) => {
            config = config
                .smtp_port(connection_url.port().unwrap_or(SUBMISSION_PORT))
                .start_tls_enabled(true)
                .start_tls_required(true);
        }
        ("smtp", Some("opportunistic")) => {
            config = config
                .smtp_port(connection_url.port().unwrap_or(SUBMISSION_PORT))
                .start_tls_enabled(true);
        }
        ("smtps", _) => {
            config = config
                .ssl_smtp_port(connection_url.port().unwrap_or(SUBMISSIONS_PORT))
                .ssl_on_connect(true);
        }
        (scheme, tls) => {
            return Err(Error::configuration(format!(
                "unknown scheme '{scheme}' or tls parameter '{tls:?}'"
            )))
        }
    }

    if !connection_url.username().is_empty() || connection_url.password().is_some() {
        let percent_decode = |s: &str| {
            percent_encoding::percent_decode_str(s)
                .decode_utf8()
                .map(Cow::into_owned)
                .map_err(|err| Error::configuration(format!("invalid credentials: {err}")))
        };
        let credentials = Credentials::new(
            percent_decode(connection_url.username())?,
            percent_decode(connection_url.password().unwrap_or_default())?,
        );
        config = config.credentials(credentials);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        host,
        scheme = connection_url.scheme(),
        "session configured from connection url"
    );

    Ok(config)
}
