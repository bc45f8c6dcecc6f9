use std::fmt::{Formatter, Result as FmtResult};

use serde::{
    de::{Deserializer, Error as DeError, SeqAccess, Visitor},
    ser::Serializer,
    Deserialize, Serialize,
};

use crate::message::{Mailbox, Mailboxes};

impl Serialize for Mailbox {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Mailbox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MailboxVisitor;

        impl Visitor<'_> for MailboxVisitor {
            type Value = Mailbox;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
                formatter.write_str("mailbox string")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                s.parse().map_err(DeError::custom)
            }
        }

        deserializer.deserialize_str(MailboxVisitor)
    }
}

impl Serialize for Mailboxes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Mailboxes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MailboxesVisitor;

        impl<'de> Visitor<'de> for MailboxesVisitor {
            type Value = Mailboxes;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
                formatter.write_str("mailboxes string or sequence")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                s.parse().map_err(DeError::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut mailboxes = Mailboxes::new();
                while let Some(mailbox) = seq.next_element()? {
                    mailboxes.push(mailbox);
                }
                Ok(mailboxes)
            }
        }

        deserializer.deserialize_any(MailboxesVisitor)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::message::{Mailbox, Mailboxes};

    #[test]
    fn parse_mailbox_string() {
        let mailbox: Mailbox = serde_json::from_str(r#""K. <kayo@example.com>""#).unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("K."));
    }

    #[test]
    fn parse_mailboxes_string_or_seq() {
        let from_str: Mailboxes =
            serde_json::from_str(r#""a@example.com, B <b@example.com>""#).unwrap();
        let from_seq: Mailboxes =
            serde_json::from_str(r#"["a@example.com", "B <b@example.com>"]"#).unwrap();
        assert_eq!(from_str, from_seq);
        assert_eq!(
            serde_json::to_string(&from_seq).unwrap(),
            r#"["a@example.com","B <b@example.com>"]"#
        );
    }
}
