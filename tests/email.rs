use std::time::{Duration, SystemTime};

use missive::{
    message::{
        header::{self, ContentTransferEncoding},
        Charset,
    },
    session::{MAIL_HOST, MAIL_PORT, MAIL_SMTP_AUTH, MAIL_SMTP_CONNECTIONTIMEOUT},
    Email, Error, RecipientType, Session,
};
use pretty_assertions::assert_eq;

fn draft() -> Email {
    let mut email = Email::new();
    email
        .set_from("sender@example.com")
        .unwrap()
        .add_to("recipient@example.com")
        .unwrap();
    email
}

#[test]
fn host_name_round_trip() {
    let mut email = Email::new();
    assert_eq!(email.host_name(), None);

    email.set_host_name("smtp.example.com");
    assert_eq!(email.host_name(), Some("smtp.example.com"));
}

#[test]
fn smtp_port_in_session() {
    let mut email = Email::new();
    email.set_host_name("smtp.example.com").set_smtp_port(587);

    assert_eq!(email.smtp_port(), 587);
    let session = email.mail_session().unwrap();
    assert_eq!(session.property(MAIL_PORT), Some("587"));
}

#[test]
fn authentication_in_session() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .set_authentication("user", "password");

    let session = email.mail_session().unwrap();
    assert_eq!(session.property(MAIL_SMTP_AUTH), Some("true"));
    assert_eq!(email.authentication().map(|c| c.username()), Some("user"));
}

#[test]
fn socket_connection_timeout() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .set_socket_connection_timeout(Duration::from_millis(5000));

    assert_eq!(email.socket_connection_timeout(), Duration::from_millis(5000));
    let session = email.mail_session().unwrap();
    assert_eq!(session.property(MAIL_SMTP_CONNECTIONTIMEOUT), Some("5000"));
}

#[test]
fn session_requires_host_name() {
    let err = Email::new().mail_session().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn injected_session() {
    let mut email = Email::new();
    email.set_mail_session(Session::new([(MAIL_HOST, "injected.example.com")]));

    assert_eq!(email.host_name(), Some("injected.example.com"));
    assert_eq!(
        email.mail_session().unwrap().property(MAIL_HOST),
        Some("injected.example.com")
    );

    email.set_host_name("local.example.com");
    assert_eq!(email.host_name(), Some("local.example.com"));
    // the injected session is still used as is
    assert_eq!(
        email.mail_session().unwrap().property(MAIL_HOST),
        Some("injected.example.com")
    );
}

#[test]
fn add_reply_to() {
    let mut email = Email::new();
    email.add_reply_to("replyto@example.com").unwrap();

    assert_eq!(email.reply_to_addresses().len(), 1);
    assert_eq!(
        email.reply_to_addresses()[0].email.to_string(),
        "replyto@example.com"
    );
}

#[test]
fn add_reply_to_with_name() {
    let mut email = Email::new();
    email
        .add_reply_to_named("replyto@example.com", "Reply To")
        .unwrap();

    assert_eq!(
        email.reply_to_addresses()[0].name.as_deref(),
        Some("Reply To")
    );
}

#[test]
fn add_reply_to_with_charset() {
    let mut email = Email::new();
    email
        .add_reply_to_with_charset("replyto@example.com", "Reply To", "UTF-8")
        .unwrap();

    let mailbox = &email.reply_to_addresses()[0];
    assert_eq!(mailbox.name.as_deref(), Some("Reply To"));
    assert_eq!(mailbox.charset(), Some(Charset::utf_8()));
}

#[test]
fn add_reply_to_null() {
    let mut email = Email::new();
    let err = email.add_reply_to(None).unwrap_err();

    assert!(err.is_null_argument());
    assert!(matches!(err, Error::NullArgument { field: "reply-to" }));
    assert!(email.reply_to_addresses().is_empty());
}

#[test]
fn add_reply_to_invalid() {
    let mut email = Email::new();
    let err = email.add_reply_to("invalid-email").unwrap_err();

    assert!(err.is_invalid_address());
    assert!(email.reply_to_addresses().is_empty());
}

#[test]
fn add_bcc_list() {
    let mut email = Email::new();
    email
        .add_bcc_list(["bcc1@example.com", "bcc2@example.com"])
        .unwrap();

    let bcc = email
        .bcc_addresses()
        .iter()
        .map(|mailbox| mailbox.email.to_string())
        .collect::<Vec<_>>();
    assert_eq!(bcc, ["bcc1@example.com", "bcc2@example.com"]);
}

#[test]
fn add_bcc_null_list() {
    let mut email = Email::new();
    let err = email.add_bcc_list(None::<&str>).unwrap_err();

    assert!(err.is_invalid_address());
    assert!(!err.is_null_argument());
}

#[test]
fn add_bcc_empty_list() {
    let mut email = Email::new();
    let err = email.add_bcc_list(Vec::<String>::new()).unwrap_err();

    assert!(err.is_invalid_address());
    assert_eq!(err.to_string(), "invalid bcc address list: no address given");
}

#[test]
fn add_list_is_all_or_nothing() {
    let mut email = Email::new();
    email.add_cc("first@example.com").unwrap();

    let err = email
        .add_cc_list(["second@example.com", "not an address"])
        .unwrap_err();
    assert!(err.is_invalid_address());
    assert_eq!(email.cc_addresses().len(), 1);
}

#[test]
fn set_list_replaces() {
    let mut email = Email::new();
    email.add_to("a@example.com").unwrap();
    email
        .set_to(vec!["b@example.com", "c@example.com"])
        .unwrap();

    assert_eq!(email.to_addresses().len(), 2);
    assert_eq!(email.to_addresses()[0].email.to_string(), "b@example.com");

    assert!(email.set_to(Vec::<&str>::new()).is_err());
    assert_eq!(email.to_addresses().len(), 2);
}

#[test]
fn unset_lists_are_empty() {
    let email = Email::new();

    assert!(email.to_addresses().is_empty());
    assert!(email.cc_addresses().is_empty());
    assert!(email.bcc_addresses().is_empty());
    assert!(email.reply_to_addresses().is_empty());
    assert!(email.from_address().is_none());
}

#[test]
fn add_header() {
    let mut email = Email::new();
    email.add_header("X-Test-Header", "HeaderValue").unwrap();

    assert_eq!(
        email.headers().get("X-Test-Header").map(String::as_str),
        Some("HeaderValue")
    );

    email.add_header("X-Test-Header", "Other").unwrap();
    assert_eq!(email.headers().len(), 1);
    assert_eq!(
        email.headers().get("X-Test-Header").map(String::as_str),
        Some("Other")
    );
}

#[test]
fn add_header_rejects_missing_parts() {
    let mut email = Email::new();

    assert!(email.add_header(None, "value").unwrap_err().is_illegal_input());
    assert!(email.add_header("", "value").unwrap_err().is_illegal_input());
    assert!(email.add_header("name", None).unwrap_err().is_illegal_input());
    assert!(email.add_header("name", "").unwrap_err().is_illegal_input());
    assert!(email.headers().is_empty());
}

#[test]
fn set_headers_checks_every_header() {
    let mut email = Email::new();
    email.add_header("X-Kept", "kept").unwrap();

    assert!(email
        .set_headers([("X-One", "1"), ("Bad Name", "2")])
        .unwrap_err()
        .is_illegal_input());
    assert!(email.headers().contains_key("X-Kept"));

    email.set_headers([("X-One", "1"), ("X-Two", "2")]).unwrap();
    assert_eq!(
        email.headers().keys().map(String::as_str).collect::<Vec<_>>(),
        ["X-One", "X-Two"]
    );
}

#[test]
fn build_twice() {
    let mut email = draft();

    email.build_mime_message().unwrap();
    let err = email.build_mime_message().unwrap_err();
    assert!(err.is_already_built());
    assert!(email.mime_message().is_some());
}

#[test]
fn build_without_from() {
    let mut email = Email::new();
    email.add_to("recipient@example.com").unwrap();

    let err = email.build_mime_message().unwrap_err();
    assert!(matches!(err, Error::MissingField("from")));
}

#[test]
fn build_without_recipients() {
    let mut email = Email::new();
    email.set_from("sender@example.com").unwrap();
    email.add_reply_to("replyto@example.com").unwrap();

    let err = email.build_mime_message().unwrap_err();
    assert!(err.is_missing_field());
    assert!(email.mime_message().is_none());
}

#[test]
fn build_with_bcc_only() {
    let mut email = Email::new();
    email
        .set_from("sender@example.com")
        .unwrap()
        .add_bcc("hidden@example.com")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.recipients(RecipientType::Bcc).len(), 1);
    assert!(message.recipients(RecipientType::To).is_empty());
}

#[test]
fn mime_message_before_build() {
    assert!(draft().mime_message().is_none());
}

#[test]
fn build_mime_message() {
    let mut email = Email::new();
    email
        .set_host_name("smtp.example.com")
        .set_from("sender@example.com")
        .unwrap()
        .add_to("recipient@example.com")
        .unwrap()
        .add_reply_to("replyto@example.com")
        .unwrap()
        .add_header("X-Custom-Header", "CustomValue")
        .unwrap()
        .set_subject("Test Subject")
        .set_content("This is a test email.", "text/plain")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert!(!message.reply_to().is_empty());
    assert_eq!(message.header("X-Custom-Header"), Some("CustomValue"));
    assert_eq!(message.subject(), Some("Test Subject"));
    assert_eq!(
        message.from().map(|mailbox| mailbox.email.to_string()),
        Some(String::from("sender@example.com"))
    );
    assert_eq!(message.body(), b"This is a test email.");
    assert!(message.message_id().is_some());
}

#[test]
fn html_content_type() {
    let mut email = draft();
    email
        .set_content("<p>This is a test email.</p>", "text/html")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert_eq!(
        message.content_type().map(|ct| ct.essence().to_owned()),
        Some(String::from("text/html"))
    );
}

#[test]
fn cc_and_bcc_recipients() {
    let mut email = draft();
    email
        .add_cc("cc@example.com")
        .unwrap()
        .add_bcc("bcc@example.com")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert!(!message.recipients(RecipientType::Cc).is_empty());
    assert!(!message.recipients(RecipientType::Bcc).is_empty());
    assert_eq!(message.envelope().to().len(), 3);

    let formatted = String::from_utf8(message.formatted()).unwrap();
    assert!(formatted.contains("Cc: cc@example.com\r\n"));
    assert!(!formatted.contains("bcc@example.com"));
}

#[test]
fn sent_date() {
    let date = SystemTime::UNIX_EPOCH + Duration::from_secs(784887151);
    let mut email = draft();
    email.set_sent_date(date);

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.sent_date(), Some(date));
    assert_eq!(
        message.header("Date"),
        Some("Tue, 15 Nov 1994 08:12:31 -0000")
    );
}

#[test]
fn bounce_address_is_reverse_path() {
    let mut email = draft();
    assert!(email
        .set_bounce_address("not an address")
        .unwrap_err()
        .is_invalid_address());

    email.set_bounce_address("bounce@example.com").unwrap();
    let message = email.build_mime_message().unwrap();
    assert_eq!(
        message.envelope().from().map(ToString::to_string),
        Some(String::from("bounce@example.com"))
    );
}

#[test]
fn charset_encodes_subject_and_body() {
    let mut email = draft();
    email
        .set_charset("ISO-8859-2")
        .unwrap()
        .set_subject("Łódź")
        .set_content("Łódź", "text/plain")
        .unwrap();

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.body(), b"\xa3\xf3d\xbc");
    assert!(message
        .content_type()
        .and_then(|ct| ct.charset().map(|c| c.eq_ignore_ascii_case("ISO-8859-2")))
        .unwrap_or_default());
    assert_eq!(
        message.headers().get::<ContentTransferEncoding>(),
        Some(ContentTransferEncoding::Base64)
    );

    let formatted = String::from_utf8(message.formatted()).unwrap();
    assert!(formatted.contains("Subject: =?ISO-8859-2?B?o/NkvA==?=\r\n"));
}

#[test]
fn unsupported_charset() {
    let mut email = Email::new();
    assert!(matches!(
        email.set_charset("klingon"),
        Err(Error::UnsupportedCharset(_))
    ));
    assert_eq!(email.charset(), None);
}

#[test]
fn subject_line_breaks() {
    let mut email = draft();
    email.set_subject("Test\r\nBcc: evil@example.com");

    assert_eq!(email.subject(), Some("Test Bcc: evil@example.com"));
    let message = email.build_mime_message().unwrap();
    assert!(message.recipients(RecipientType::Bcc).is_empty());
}

#[test]
fn custom_headers_override_generated_ones() {
    let mut email = draft();
    email.add_header("Message-ID", "<custom@example.com>").unwrap();

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.message_id(), Some("<custom@example.com>"));
    assert_eq!(
        message
            .headers()
            .iter()
            .filter(|value| value.name().eq_ignore_ascii_case("message-id"))
            .count(),
        1
    );
}

#[test]
fn custom_headers_cannot_replace_recipients() {
    let mut email = draft();
    for name in ["To", "cc", "BCC", "From", "Sender", "Reply-To"] {
        let err = email.add_header(name, "attacker@evil.com").unwrap_err();
        assert!(err.is_illegal_input(), "{name} accepted");
    }
    assert!(email
        .set_headers([("X-Test", "ok"), ("To", "undisclosed-recipients:;")])
        .unwrap_err()
        .is_illegal_input());
    assert!(email.headers().is_empty());

    let message = email.build_mime_message().unwrap();
    let to = message
        .recipients(RecipientType::To)
        .iter()
        .map(|mailbox| mailbox.email.to_string())
        .collect::<Vec<_>>();
    assert_eq!(to, ["recipient@example.com"]);
    assert_eq!(
        message.envelope().to()[0].to_string(),
        "recipient@example.com"
    );
}

#[test]
fn recipients_match_address_lists() {
    let mut email = draft();
    email
        .add_to_named("Second <second@example.com>", "Second To")
        .unwrap()
        .add_cc("cc@example.com")
        .unwrap()
        .add_bcc_list(["bcc1@example.com", "bcc2@example.com"])
        .unwrap()
        .add_header("X-Custom", "value")
        .unwrap()
        .add_header("Message-ID", "<fixed@example.com>")
        .unwrap()
        .add_header("Return-Path", "<elsewhere@example.com>")
        .unwrap();

    fn emails<'a>(mailboxes: impl IntoIterator<Item = &'a missive::Mailbox>) -> Vec<String> {
        mailboxes
            .into_iter()
            .map(|mailbox| mailbox.email.to_string())
            .collect()
    }

    let to = emails(email.to_addresses());
    let cc = emails(email.cc_addresses());
    let bcc = emails(email.bcc_addresses());

    let message = email.build_mime_message().unwrap();
    assert_eq!(emails(message.recipients(RecipientType::To).iter()), to);
    assert_eq!(emails(message.recipients(RecipientType::Cc).iter()), cc);
    assert_eq!(emails(message.recipients(RecipientType::Bcc).iter()), bcc);

    let envelope = message
        .envelope()
        .to()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(envelope, [to, cc, bcc].concat());
    assert_eq!(
        message.envelope().from().map(ToString::to_string),
        Some(String::from("sender@example.com"))
    );
}

#[test]
fn long_non_ascii_subject_is_folded() {
    let mut email = draft();
    email.set_subject("Привет ".repeat(30));

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.subject(), Some("Привет ".repeat(30).as_str()));

    let formatted = String::from_utf8(message.formatted()).unwrap();
    let (head, _) = formatted.split_once("\r\n\r\n").unwrap();
    for line in head.split("\r\n") {
        assert!(line.len() <= 78, "line too long: {line:?}");
        for word in line.split_whitespace().filter(|word| word.starts_with("=?")) {
            assert!(word.len() <= 75, "encoded word too long: {word:?}");
        }
    }
}

#[test]
fn long_latin2_subject_is_folded() {
    let mut email = draft();
    email
        .set_charset("ISO-8859-2")
        .unwrap()
        .set_subject("Zażółć gęślą jaźń ".repeat(10));

    let formatted = String::from_utf8(email.build_mime_message().unwrap().formatted()).unwrap();
    let (head, _) = formatted.split_once("\r\n\r\n").unwrap();
    assert!(head.contains("Subject: =?ISO-8859-2?B?"));
    for line in head.split("\r\n") {
        assert!(line.len() <= 78, "line too long: {line:?}");
    }
}

#[test]
fn empty_content_defaults_to_text_plain() {
    let mut email = draft();

    let message = email.build_mime_message().unwrap();
    assert_eq!(message.content_type(), Some(header::ContentType::TEXT_PLAIN));
    assert!(message.body().is_empty());
}
