//! The email draft, turned once into a [`Message`]

use std::{
    collections::BTreeMap,
    error::Error as StdError,
    time::{Duration, SystemTime},
};

use crate::{
    address::{Address, Envelope},
    message::{
        header::{
            self, ContentTransferEncoding, ContentType, HeaderName, HeaderValue, Headers,
            Subject, MIME_VERSION_1_0,
        },
        make_message_id, Charset, Mailbox, Mailboxes, Message,
    },
    session::{Credentials, Session, SessionConfig, MAIL_HOST},
    Error, Transport,
};

/// Address lists of a draft
#[derive(Debug, Clone, Copy)]
enum Role {
    To,
    Cc,
    Bcc,
    ReplyTo,
}

impl Role {
    fn field(self) -> &'static str {
        match self {
            Role::To => "to",
            Role::Cc => "cc",
            Role::Bcc => "bcc",
            Role::ReplyTo => "reply-to",
        }
    }
}

/// An email draft
///
/// Collects the sender, recipients, headers and content of a message,
/// validating every value as it is set, plus the configuration of the
/// session it is going to be delivered with. The draft is then turned into
/// an immutable [`Message`] by [`Email::build_mime_message`], which can
/// only happen once.
///
/// Single addresses are passed as `Option<&str>`: `None` is a
/// [`Error::NullArgument`]. Address lists are any iterable of strings, an
/// empty list (or `None`) is an [`Error::InvalidAddress`].
///
/// ```rust
/// use missive::{Email, Error};
///
/// let mut email = Email::new();
/// assert!(matches!(
///     email.add_reply_to(None),
///     Err(Error::NullArgument { field: "reply-to" })
/// ));
/// assert!(email.add_bcc_list(Vec::<&str>::new()).unwrap_err().is_invalid_address());
/// assert!(email.add_reply_to("not-an-address").unwrap_err().is_invalid_address());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Email {
    config: SessionConfig,
    session: Option<Session>,
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    subject: Option<String>,
    content: Option<(String, ContentType)>,
    charset: Option<Charset>,
    sent_date: Option<SystemTime>,
    headers: BTreeMap<String, String>,
    message: Option<Message>,
}

impl Email {
    /// Creates an empty draft with the default session configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty draft delivered with `config`
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // Session configuration

    /// The session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sets the host of the SMTP server
    pub fn set_host_name<S: Into<String>>(&mut self, host_name: S) -> &mut Self {
        self.config.host_name = Some(host_name.into());
        self
    }

    /// The host of the SMTP server
    ///
    /// Falls back to the `mail.smtp.host` property of the session given to
    /// [`Email::set_mail_session`].
    pub fn host_name(&self) -> Option<&str> {
        self.config.host_name.as_deref().or_else(|| {
            self.session
                .as_ref()
                .and_then(|session| session.property(MAIL_HOST))
        })
    }

    /// Sets the port of the SMTP server, 25 by default
    pub fn set_smtp_port(&mut self, port: u16) -> &mut Self {
        self.config.smtp_port = port;
        self
    }

    /// The port of the SMTP server
    pub fn smtp_port(&self) -> u16 {
        self.config.smtp_port
    }

    /// Sets the port used when connecting over TLS, 465 by default
    pub fn set_ssl_smtp_port(&mut self, port: u16) -> &mut Self {
        self.config.ssl_smtp_port = port;
        self
    }

    /// The port used when connecting over TLS
    pub fn ssl_smtp_port(&self) -> u16 {
        self.config.ssl_smtp_port
    }

    /// Sets the credentials to authenticate with
    pub fn set_authentication<U, P>(&mut self, user_name: U, password: P) -> &mut Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        self.config.credentials = Some(Credentials::new(user_name.into(), password.into()));
        self
    }

    /// The credentials to authenticate with
    pub fn authentication(&self) -> Option<&Credentials> {
        self.config.credentials.as_ref()
    }

    /// Sets the socket connection timeout, 60 seconds by default
    pub fn set_socket_connection_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.socket_connection_timeout = timeout;
        self
    }

    /// The socket connection timeout
    pub fn socket_connection_timeout(&self) -> Duration {
        self.config.socket_connection_timeout
    }

    /// Sets the socket I/O timeout, 60 seconds by default
    pub fn set_socket_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.socket_timeout = timeout;
        self
    }

    /// The socket I/O timeout
    pub fn socket_timeout(&self) -> Duration {
        self.config.socket_timeout
    }

    /// Connect over TLS from the start
    pub fn set_ssl_on_connect(&mut self, ssl_on_connect: bool) -> &mut Self {
        self.config.ssl_on_connect = ssl_on_connect;
        self
    }

    /// Whether the connection is made over TLS from the start
    pub fn is_ssl_on_connect(&self) -> bool {
        self.config.ssl_on_connect
    }

    /// Upgrade the connection with `STARTTLS` when the server offers it
    pub fn set_start_tls_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.start_tls_enabled = enabled;
        self
    }

    /// Whether `STARTTLS` is used when offered
    pub fn is_start_tls_enabled(&self) -> bool {
        self.config.start_tls_enabled
    }

    /// Refuse to deliver when the server doesn't offer `STARTTLS`
    pub fn set_start_tls_required(&mut self, required: bool) -> &mut Self {
        self.config.start_tls_required = required;
        self
    }

    /// Whether `STARTTLS` is required
    pub fn is_start_tls_required(&self) -> bool {
        self.config.start_tls_required
    }

    /// Ask the deliverer to log the conversation
    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.config.debug = debug;
        self
    }

    /// Sets the envelope sender, where bounces are delivered
    ///
    /// `None` goes back to using the `From` address.
    pub fn set_bounce_address<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.config.bounce_address = match email.into() {
            Some(email) => Some(
                email
                    .trim()
                    .parse::<Address>()
                    .map_err(|err| Error::invalid_address("bounce", email, err))?,
            ),
            None => None,
        };
        Ok(self)
    }

    /// The envelope sender, if one was set
    pub fn bounce_address(&self) -> Option<&Address> {
        self.config.bounce_address.as_ref()
    }

    /// Uses `session` instead of deriving one from the configuration
    pub fn set_mail_session(&mut self, session: Session) -> &mut Self {
        self.session = Some(session);
        self
    }

    /// The session the message is delivered with
    ///
    /// Returns the session given to [`Email::set_mail_session`] if there is
    /// one, otherwise derives a new one from the configuration, which fails
    /// if no host was set.
    pub fn mail_session(&self) -> Result<Session, Error> {
        match &self.session {
            Some(session) => Ok(session.clone()),
            None => self.config.to_session(),
        }
    }

    // Addresses

    /// Sets the sender
    pub fn set_from<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.set_from_with(email.into(), None, None)
    }

    /// Sets the sender, with a display name
    pub fn set_from_named<'a, E>(&mut self, email: E, name: &str) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.set_from_with(email.into(), Some(name), None)
    }

    /// Sets the sender, with a display name encoded in `charset`
    pub fn set_from_with_charset<'a, E>(
        &mut self,
        email: E,
        name: &str,
        charset: &str,
    ) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.set_from_with(email.into(), Some(name), Some(charset))
    }

    fn set_from_with(
        &mut self,
        email: Option<&str>,
        name: Option<&str>,
        charset: Option<&str>,
    ) -> Result<&mut Self, Error> {
        self.from = Some(self.create_mailbox("from", email, name, charset)?);
        Ok(self)
    }

    /// The sender
    pub fn from_address(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// Adds a `To` recipient
    pub fn add_to<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::To, email.into(), None, None)
    }

    /// Adds a `To` recipient, with a display name
    pub fn add_to_named<'a, E>(&mut self, email: E, name: &str) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::To, email.into(), Some(name), None)
    }

    /// Adds a `To` recipient, with a display name encoded in `charset`
    pub fn add_to_with_charset<'a, E>(
        &mut self,
        email: E,
        name: &str,
        charset: &str,
    ) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::To, email.into(), Some(name), Some(charset))
    }

    /// Adds several `To` recipients, all of them or none
    pub fn add_to_list<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::To, emails, false)
    }

    /// Replaces the `To` recipients
    pub fn set_to<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::To, emails, true)
    }

    /// The `To` recipients
    pub fn to_addresses(&self) -> &[Mailbox] {
        &self.to
    }

    /// Adds a `Cc` recipient
    pub fn add_cc<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Cc, email.into(), None, None)
    }

    /// Adds a `Cc` recipient, with a display name
    pub fn add_cc_named<'a, E>(&mut self, email: E, name: &str) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Cc, email.into(), Some(name), None)
    }

    /// Adds a `Cc` recipient, with a display name encoded in `charset`
    pub fn add_cc_with_charset<'a, E>(
        &mut self,
        email: E,
        name: &str,
        charset: &str,
    ) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Cc, email.into(), Some(name), Some(charset))
    }

    /// Adds several `Cc` recipients, all of them or none
    pub fn add_cc_list<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::Cc, emails, false)
    }

    /// Replaces the `Cc` recipients
    pub fn set_cc<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::Cc, emails, true)
    }

    /// The `Cc` recipients
    pub fn cc_addresses(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Adds a `Bcc` recipient
    pub fn add_bcc<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Bcc, email.into(), None, None)
    }

    /// Adds a `Bcc` recipient, with a display name
    pub fn add_bcc_named<'a, E>(&mut self, email: E, name: &str) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Bcc, email.into(), Some(name), None)
    }

    /// Adds a `Bcc` recipient, with a display name encoded in `charset`
    pub fn add_bcc_with_charset<'a, E>(
        &mut self,
        email: E,
        name: &str,
        charset: &str,
    ) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::Bcc, email.into(), Some(name), Some(charset))
    }

    /// Adds several `Bcc` recipients, all of them or none
    ///
    /// ```rust
    /// use missive::Email;
    ///
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let mut email = Email::new();
    /// email.add_bcc_list(["a@x.com", "b@x.com"])?;
    /// assert_eq!(email.bcc_addresses().len(), 2);
    ///
    /// assert!(email.add_bcc_list(["c@x.com", "invalid"]).is_err());
    /// assert!(email.add_bcc_list(None::<&str>).is_err());
    /// assert_eq!(email.bcc_addresses().len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_bcc_list<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::Bcc, emails, false)
    }

    /// Replaces the `Bcc` recipients
    pub fn set_bcc<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::Bcc, emails, true)
    }

    /// The `Bcc` recipients
    pub fn bcc_addresses(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Adds a `Reply-To` address
    pub fn add_reply_to<'a, E>(&mut self, email: E) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::ReplyTo, email.into(), None, None)
    }

    /// Adds a `Reply-To` address, with a display name
    pub fn add_reply_to_named<'a, E>(&mut self, email: E, name: &str) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::ReplyTo, email.into(), Some(name), None)
    }

    /// Adds a `Reply-To` address, with a display name encoded in `charset`
    pub fn add_reply_to_with_charset<'a, E>(
        &mut self,
        email: E,
        name: &str,
        charset: &str,
    ) -> Result<&mut Self, Error>
    where
        E: Into<Option<&'a str>>,
    {
        self.add_mailbox(Role::ReplyTo, email.into(), Some(name), Some(charset))
    }

    /// Adds several `Reply-To` addresses, all of them or none
    pub fn add_reply_to_list<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::ReplyTo, emails, false)
    }

    /// Replaces the `Reply-To` addresses
    pub fn set_reply_to<I, S>(&mut self, emails: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_mailboxes(Role::ReplyTo, emails, true)
    }

    /// The `Reply-To` addresses
    pub fn reply_to_addresses(&self) -> &[Mailbox] {
        &self.reply_to
    }

    fn mailboxes_mut(&mut self, role: Role) -> &mut Vec<Mailbox> {
        match role {
            Role::To => &mut self.to,
            Role::Cc => &mut self.cc,
            Role::Bcc => &mut self.bcc,
            Role::ReplyTo => &mut self.reply_to,
        }
    }

    fn add_mailbox(
        &mut self,
        role: Role,
        email: Option<&str>,
        name: Option<&str>,
        charset: Option<&str>,
    ) -> Result<&mut Self, Error> {
        let mailbox = self.create_mailbox(role.field(), email, name, charset)?;
        self.mailboxes_mut(role).push(mailbox);
        Ok(self)
    }

    fn add_mailboxes<I, S>(
        &mut self,
        role: Role,
        emails: I,
        replace: bool,
    ) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let field = role.field();
        let mailboxes = emails
            .into_iter()
            .map(|email| self.create_mailbox(field, Some(email.as_ref()), None, None))
            .collect::<Result<Vec<_>, _>>()?;
        if mailboxes.is_empty() {
            return Err(Error::empty_address_list(field));
        }

        let list = self.mailboxes_mut(role);
        if replace {
            list.clear();
        }
        list.extend(mailboxes);
        Ok(self)
    }

    fn create_mailbox(
        &self,
        field: &'static str,
        email: Option<&str>,
        name: Option<&str>,
        charset: Option<&str>,
    ) -> Result<Mailbox, Error> {
        let email = email.ok_or(Error::NullArgument { field })?;
        let mut mailbox = email
            .parse::<Mailbox>()
            .map_err(|err| Error::invalid_address(field, email, err))?;

        if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
            mailbox.name = Some(unfold(name));
        }

        let charset = match charset {
            Some(label) => Some(Charset::for_label(label)?),
            None => self.charset.filter(|_| mailbox.display_name().is_some()),
        };
        if let Some(charset) = charset {
            mailbox = mailbox.with_charset(charset);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(field, email = %mailbox.email, "address accepted");

        Ok(mailbox)
    }

    // Headers

    /// Adds a custom header, replacing any header of the same name
    ///
    /// Both the name and the value are required and can't be empty.
    /// Address headers (`From`, `Sender`, `To`, `Cc`, `Bcc`, `Reply-To`)
    /// are rejected, recipients only come from the address methods.
    ///
    /// ```rust
    /// use missive::Email;
    ///
    /// let mut email = Email::new();
    /// assert!(email.add_header(None, "v").unwrap_err().is_illegal_input());
    /// assert!(email.add_header("n", "").unwrap_err().is_illegal_input());
    /// assert!(email.add_header("To", "a@b.c").unwrap_err().is_illegal_input());
    ///
    /// email.add_header("X-Test-Header", "HeaderValue").unwrap();
    /// assert_eq!(
    ///     email.headers().get("X-Test-Header").map(String::as_str),
    ///     Some("HeaderValue")
    /// );
    /// ```
    pub fn add_header<'a, 'b, N, V>(&mut self, name: N, value: V) -> Result<&mut Self, Error>
    where
        N: Into<Option<&'a str>>,
        V: Into<Option<&'b str>>,
    {
        let (name, value) = check_header(name.into(), value.into())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Replaces all custom headers, after checking every one of them
    pub fn set_headers<I, N, V>(&mut self, headers: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let headers = headers
            .into_iter()
            .map(|(name, value)| check_header(Some(name.as_ref()), Some(value.as_ref())))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        self.headers = headers;
        Ok(self)
    }

    /// The custom headers
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    // Content

    /// Sets the subject
    ///
    /// Line breaks are replaced with spaces.
    pub fn set_subject<S: Into<String>>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(unfold(&subject.into()));
        self
    }

    /// The subject
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Sets the body and its MIME type
    ///
    /// A `charset` parameter of the MIME type becomes the charset of the
    /// draft.
    pub fn set_content<B: Into<String>>(
        &mut self,
        body: B,
        mime_type: &str,
    ) -> Result<&mut Self, Error> {
        let content_type = ContentType::parse(mime_type).map_err(|_| Error::IllegalInput {
            field: "content type",
            reason: "must be a valid MIME type",
        })?;
        if let Some(label) = content_type.charset() {
            self.charset = Some(Charset::for_label(label)?);
        }

        self.content = Some((body.into(), content_type));
        Ok(self)
    }

    /// The body
    pub fn content(&self) -> Option<&str> {
        self.content.as_ref().map(|(body, _)| body.as_str())
    }

    /// The MIME type of the body
    pub fn content_type(&self) -> Option<&ContentType> {
        self.content.as_ref().map(|(_, content_type)| content_type)
    }

    /// Sets the charset used for the subject, display names and text bodies
    pub fn set_charset(&mut self, label: &str) -> Result<&mut Self, Error> {
        self.charset = Some(Charset::for_label(label)?);
        Ok(self)
    }

    /// The charset, if one was set
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    /// Sets the `Date` of the message, the time it is built by default
    pub fn set_sent_date(&mut self, date: SystemTime) -> &mut Self {
        self.sent_date = Some(date);
        self
    }

    /// The date set with [`Email::set_sent_date`]
    pub fn sent_date(&self) -> Option<SystemTime> {
        self.sent_date
    }

    // Message

    /// Builds the message
    ///
    /// Requires a sender and at least one recipient, either `To`, `Cc` or
    /// `Bcc`. A draft can only be built once, later calls fail with
    /// [`Error::AlreadyBuilt`].
    pub fn build_mime_message(&mut self) -> Result<&Message, Error> {
        if self.message.is_some() {
            return Err(Error::AlreadyBuilt);
        }
        let from = self.from.clone().ok_or(Error::MissingField("from"))?;
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(Error::MissingField("recipients"));
        }

        let mut headers = Headers::with_capacity(12 + self.headers.len());
        headers.set(header::Date::new(
            self.sent_date.unwrap_or_else(SystemTime::now),
        ));
        headers.set(header::From(Mailboxes::from(from.clone())));
        if !self.reply_to.is_empty() {
            headers.set(header::ReplyTo(self.reply_to.iter().cloned().collect()));
        }
        if !self.to.is_empty() {
            headers.set(header::To(self.to.iter().cloned().collect()));
        }
        if !self.cc.is_empty() {
            headers.set(header::Cc(self.cc.iter().cloned().collect()));
        }
        if !self.bcc.is_empty() {
            headers.set(header::Bcc(self.bcc.iter().cloned().collect()));
        }
        if let Some(subject) = &self.subject {
            headers.set(match self.charset {
                Some(charset) => Subject::with_charset(subject.clone(), charset),
                None => Subject::from(subject.clone()),
            });
        }
        headers.set(make_message_id());
        headers.set(MIME_VERSION_1_0);

        let (text, content_type) = match &self.content {
            Some((text, content_type)) => (text.as_str(), content_type.clone()),
            None => ("", ContentType::TEXT_PLAIN),
        };
        let content_type = match self.charset {
            Some(charset) => content_type.with_default_charset(charset.name()),
            None => content_type,
        };
        let body_charset = content_type
            .charset()
            .and_then(|label| Charset::for_label(label).ok())
            .or(self.charset)
            .unwrap_or_default();
        let body = body_charset.encode(text).into_owned();
        headers.set(content_type);
        headers.set(ContentTransferEncoding::for_body(&body));

        let header_charset = self.charset.unwrap_or_default();
        for (name, value) in &self.headers {
            let name = HeaderName::new_from_ascii(name.clone()).map_err(|_| Error::IllegalInput {
                field: "header name",
                reason: "must be printable ASCII without colon",
            })?;
            headers.set_raw(HeaderValue::new_with_charset(
                name,
                value.clone(),
                header_charset,
            ));
        }

        let reverse_path = self
            .config
            .bounce_address
            .clone()
            .unwrap_or_else(|| from.email.clone());
        let forward_path = self
            .to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(|mailbox| mailbox.email.clone())
            .collect();
        let envelope = Envelope::new(Some(reverse_path), forward_path)?;
        let message = Message::new(headers, envelope, body);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message_id = message.message_id(),
            recipients = message.envelope().to().len(),
            "message built"
        );

        let message: &Message = self.message.insert(message);
        Ok(message)
    }

    /// The message, once built
    pub fn mime_message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Builds the message and hands it to `transport`
    ///
    /// Returns the `Message-ID` of the sent message.
    pub fn send<T>(&mut self, transport: &T) -> Result<String, Error>
    where
        T: Transport,
        T::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let message = self.build_mime_message()?;
        let message_id = message.message_id().unwrap_or_default().to_owned();

        transport
            .send(message)
            .map_err(|err| Error::Transport(err.into()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(message_id = message_id.as_str(), "message sent");

        Ok(message_id)
    }
}

/// Headers only the address methods may set, they also feed the envelope
const ADDRESS_HEADERS: [&str; 6] = ["From", "Sender", "To", "Cc", "Bcc", "Reply-To"];

fn check_header(name: Option<&str>, value: Option<&str>) -> Result<(String, String), Error> {
    let name = name.filter(|name| !name.is_empty()).ok_or(Error::IllegalInput {
        field: "header name",
        reason: "must not be null or empty",
    })?;
    let value = value.filter(|value| !value.is_empty()).ok_or(Error::IllegalInput {
        field: "header value",
        reason: "must not be null or empty",
    })?;

    HeaderName::new_from_ascii(name.to_owned()).map_err(|_| Error::IllegalInput {
        field: "header name",
        reason: "must be printable ASCII without colon",
    })?;
    if ADDRESS_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return Err(Error::IllegalInput {
            field: "header name",
            reason: "address headers are set through the address methods",
        });
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::IllegalInput {
            field: "header value",
            reason: "must not contain line breaks",
        });
    }

    Ok((name.to_owned(), value.to_owned()))
}

/// Replaces line breaks, which can't appear in header text, with spaces
fn unfold(s: &str) -> String {
    s.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{check_header, unfold, Email};
    use crate::message::Charset;

    #[test]
    fn unfold_line_breaks() {
        assert_eq!(unfold("Test Subject"), "Test Subject");
        assert_eq!(unfold("Test\r\nSubject"), "Test Subject");
        assert_eq!(unfold("Test\nSubject\r"), "Test Subject");
    }

    #[test]
    fn header_checks() {
        assert!(check_header(Some("X-Test"), Some("value")).is_ok());
        assert!(check_header(Some("X Test"), Some("value")).is_err());
        assert!(check_header(Some("X-Test:"), Some("value")).is_err());
        assert!(check_header(Some("X-Test"), Some("a\r\nBcc: evil@example.com")).is_err());
    }

    #[test]
    fn address_header_names_are_reserved() {
        for name in ["From", "sender", "TO", "Cc", "bcc", "Reply-To"] {
            let err = check_header(Some(name), Some("attacker@evil.com")).unwrap_err();
            assert!(err.is_illegal_input(), "{name} accepted");
        }
        assert!(check_header(Some("Return-Path"), Some("<bounce@example.com>")).is_ok());
        assert!(check_header(Some("X-To"), Some("value")).is_ok());
    }

    #[test]
    fn name_overrides_parsed_name() {
        let mut email = Email::new();
        email
            .add_to_named("Old Name <to@example.com>", "New Name")
            .unwrap()
            .add_to_named("Kept <kept@example.com>", "  ")
            .unwrap();

        assert_eq!(email.to_addresses()[0].name.as_deref(), Some("New Name"));
        assert_eq!(email.to_addresses()[1].name.as_deref(), Some("Kept"));
    }

    #[test]
    fn builder_charset_applies_to_named_addresses() {
        let mut email = Email::new();
        email
            .set_charset("ISO-8859-2")
            .unwrap()
            .add_cc("cc@example.com")
            .unwrap()
            .add_cc_named("named@example.com", "Łódź")
            .unwrap()
            .add_cc_with_charset("utf@example.com", "Łódź", "utf-8")
            .unwrap();

        let latin2 = Charset::for_label("ISO-8859-2").unwrap();
        assert_eq!(email.cc_addresses()[0].charset(), None);
        assert_eq!(email.cc_addresses()[1].charset(), Some(latin2));
        assert_eq!(email.cc_addresses()[2].charset(), Some(Charset::utf_8()));
    }

    #[test]
    fn unknown_address_charset() {
        let mut email = Email::new();
        let err = email
            .add_to_with_charset("to@example.com", "Name", "klingon")
            .unwrap_err();

        assert_eq!(err.to_string(), "unsupported charset `klingon`");
        assert!(email.to_addresses().is_empty());
    }

    #[test]
    fn content_charset_is_adopted() {
        let mut email = Email::new();
        email
            .set_content("Łódź", "text/plain; charset=ISO-8859-2")
            .unwrap();

        assert_eq!(email.charset().map(|c| c.name()), Some("ISO-8859-2"));
        assert!(email
            .set_content("body", "not a mime type")
            .unwrap_err()
            .is_illegal_input());
        assert_eq!(email.content(), Some("Łódź"));
    }
}
