use missive::{transport::stub::StubTransport, Email, Error, Transport};
use pretty_assertions::assert_eq;

fn email() -> Email {
    let mut email = Email::new();
    email
        .set_from_named("user@localhost", "User")
        .unwrap()
        .add_to("root@localhost")
        .unwrap()
        .add_bcc("hidden@localhost")
        .unwrap()
        .set_subject("Hello")
        .set_content("Hello World!", "text/plain")
        .unwrap();
    email
}

#[test]
fn stub_transport() {
    let sender_ok = StubTransport::new_ok();
    let sender_ko = StubTransport::new_error();

    let mut email = email();
    let message = email.build_mime_message().unwrap();

    sender_ok.send(message).unwrap();
    sender_ko.send(message).unwrap_err();

    let expected = String::from_utf8(message.formatted()).unwrap();
    assert_eq!(
        sender_ok.messages(),
        vec![(message.envelope().clone(), expected)]
    );
}

#[test]
fn send_returns_message_id() {
    let sender = StubTransport::new_ok();
    let mut email = email();

    let message_id = email.send(&sender).unwrap();
    assert_eq!(
        email.mime_message().and_then(|m| m.message_id()),
        Some(message_id.as_str())
    );

    let messages = sender.messages();
    let (envelope, formatted) = &messages[0];
    assert_eq!(envelope.to().len(), 2);
    assert_eq!(
        envelope.from().map(ToString::to_string),
        Some(String::from("user@localhost"))
    );
    assert!(formatted.contains("From: User <user@localhost>\r\n"));
    assert!(!formatted.contains("hidden@localhost"));
}

#[test]
fn send_twice_fails() {
    let sender = StubTransport::new_ok();
    let mut email = email();

    email.send(&sender).unwrap();
    assert!(email.send(&sender).unwrap_err().is_already_built());
    assert_eq!(sender.messages().len(), 1);
}

#[test]
fn transport_error() {
    let mut email = email();
    let err = email.send(&StubTransport::new_error()).unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.to_string(), "transport error: stub error");
    // the message is built even though delivery failed
    assert!(email.mime_message().is_some());
}

#[test]
fn send_with_subscriber_installed() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let sender = StubTransport::new_ok();
    let mut email = email();
    let message_id = email.send(&sender).unwrap();

    assert_eq!(sender.messages().len(), 1);
    assert_eq!(email.mime_message().unwrap().message_id(), Some(message_id.as_str()));
}
